//! Startup configuration.
//!
//! Everything here is fixed once the particle table is generated. A config
//! can be built in code, or loaded from JSON:
//!
//! ```ignore
//! let config = MorphConfig::load("tree.json")?;
//! let controller = MorphController::new(config)?;
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::PaletteConfig;
use crate::error::{ConfigError, ConfigFileError};
use crate::particle::MorphState;
use crate::progress::Damping;
use crate::transform::{MotionProfile, PulseConfig};

/// Upper bound on the particle table size.
pub const MAX_PARTICLES: u32 = 1_000_000;

fn default_jitter() -> f32 {
    0.3
}

fn default_spiral_step() -> f32 {
    0.5
}

fn default_scale_range() -> (f32, f32) {
    (0.5, 1.3)
}

/// Complete morph configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MorphConfig {
    pub particle_count: u32,
    /// Total height of the tree, centered on y = 0.
    pub tree_height: f32,
    /// Radius of the tree at its base; tapers linearly to 0 at the top.
    pub tree_radius: f32,
    /// Radius of the scatter sphere.
    pub scatter_radius: f32,
    /// Probability that a particle belongs to the gold family.
    pub gold_ratio: f32,
    /// Smoothing time constant in seconds.
    pub smoothing_time: f32,
    /// Full width of the horizontal jitter applied to tree positions.
    #[serde(default = "default_jitter")]
    pub jitter: f32,
    /// Angle in radians between consecutive particles on the spiral.
    #[serde(default = "default_spiral_step")]
    pub spiral_step: f32,
    /// Base scale drawn uniformly from `[min, max)`.
    #[serde(default = "default_scale_range")]
    pub scale_range: (f32, f32),
    #[serde(default)]
    pub initial_state: MorphState,
    #[serde(default)]
    pub damping: Damping,
    #[serde(default)]
    pub palette: PaletteConfig,
    #[serde(default = "MotionProfile::scattered")]
    pub scattered_motion: MotionProfile,
    #[serde(default = "MotionProfile::formed")]
    pub formed_motion: MotionProfile,
    #[serde(default)]
    pub pulse: PulseConfig,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            particle_count: 2500,
            tree_height: 9.0,
            tree_radius: 3.5,
            scatter_radius: 18.0,
            gold_ratio: 0.6,
            smoothing_time: 1.5,
            jitter: default_jitter(),
            spiral_step: default_spiral_step(),
            scale_range: default_scale_range(),
            initial_state: MorphState::Scattered,
            damping: Damping::default(),
            palette: PaletteConfig::default(),
            scattered_motion: MotionProfile::scattered(),
            formed_motion: MotionProfile::formed(),
            pulse: PulseConfig::default(),
        }
    }
}

impl MorphConfig {
    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the state the session starts in.
    pub fn with_initial_state(mut self, state: MorphState) -> Self {
        self.initial_state = state;
        self
    }

    /// Set the progress smoothing model.
    pub fn with_damping(mut self, damping: Damping) -> Self {
        self.damping = damping;
        self
    }

    /// Reject configurations that would produce a degenerate particle table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count > MAX_PARTICLES {
            return Err(ConfigError::TooManyParticles {
                count: self.particle_count,
                max: MAX_PARTICLES,
            });
        }

        positive("scatter_radius", self.scatter_radius)?;
        positive("tree_height", self.tree_height)?;
        positive("tree_radius", self.tree_radius)?;
        positive("smoothing_time", self.smoothing_time)?;
        non_negative("jitter", self.jitter)?;
        finite("spiral_step", self.spiral_step)?;

        if !(0.0..=1.0).contains(&self.gold_ratio) {
            return Err(ConfigError::InvalidRatio {
                name: "gold_ratio",
                value: self.gold_ratio,
            });
        }

        let (min, max) = self.scale_range;
        if !(min.is_finite() && max.is_finite() && min > 0.0 && max > min) {
            return Err(ConfigError::InvalidScaleRange { min, max });
        }

        self.scattered_motion.validate()?;
        self.formed_motion.validate()?;
        self.pulse.validate()?;
        self.palette.resolve()?;

        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigFileError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigFileError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

pub(crate) fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

pub(crate) fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

pub(crate) fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { name, value })
    }
}
