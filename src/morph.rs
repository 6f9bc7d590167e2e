//! The morph controller: owns the particle table, the target state, the
//! progress tracker and both instance buffers.
//!
//! # Example
//!
//! ```ignore
//! use shardmorph::prelude::*;
//!
//! let mut morph = MorphController::new(MorphConfig::default())?;
//! let mut time = Time::new();
//!
//! // button press
//! morph.toggle_mode();
//!
//! // every frame
//! let (elapsed, delta) = time.update();
//! morph.frame(elapsed, delta);
//! upload(morph.instance_transforms());
//! ```

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::color::{assign_colors, ColorRaw};
use crate::config::MorphConfig;
use crate::error::ConfigError;
use crate::particle::{MorphState, Particle};
use crate::progress::MorphProgress;
use crate::spawn::generate_particles;
use crate::transform::{initial_transforms, InstanceRaw, InstanceUpdater};

/// Animation state for one session.
pub struct MorphController {
    particles: Vec<Particle>,
    mode: MorphState,
    progress: MorphProgress,
    updater: InstanceUpdater,
    transforms: Vec<InstanceRaw>,
    colors: Vec<ColorRaw>,
}

impl MorphController {
    /// Build the particle table and buffers with an entropy-seeded random source.
    pub fn new(config: MorphConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, &mut SmallRng::from_entropy())
    }

    /// Build the particle table and buffers from a fixed seed.
    pub fn with_seed(config: MorphConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, &mut SmallRng::seed_from_u64(seed))
    }

    /// Build the particle table and buffers from the given random source.
    ///
    /// Fails without generating anything if the config is invalid.
    pub fn with_rng<R: Rng + ?Sized>(config: MorphConfig, rng: &mut R) -> Result<Self, ConfigError> {
        let palette = config.palette.resolve()?;
        let particles = generate_particles(&config, rng)?;
        let colors = assign_colors(&particles, &palette, rng);
        let updater = InstanceUpdater::from_config(&config);

        let progress = MorphProgress::new(config.initial_state, config.smoothing_time)
            .with_damping(config.damping);

        let transforms = match config.initial_state {
            MorphState::Scattered => initial_transforms(&particles),
            MorphState::Formed => {
                let mut out = Vec::with_capacity(particles.len());
                updater.update(&particles, progress.value(), config.initial_state, 0.0, &mut out);
                out
            }
        };

        log::info!(
            "morph ready: {} particles, starting {:?}, {:?} smoothing over {}s",
            particles.len(),
            config.initial_state,
            config.damping,
            config.smoothing_time
        );

        Ok(Self {
            particles,
            mode: config.initial_state,
            progress,
            updater,
            transforms,
            colors,
        })
    }

    /// Flip the target state. Calling it twice restores the original target.
    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// Set the target state directly.
    pub fn set_mode(&mut self, mode: MorphState) {
        if mode != self.mode {
            log::debug!("morph target {:?} -> {:?} at progress {:.3}", self.mode, mode, self.progress.value());
            self.mode = mode;
        }
    }

    /// Advance progress by `delta` seconds and recompute every transform at
    /// `elapsed` seconds since start.
    pub fn frame(&mut self, elapsed: f32, delta: f32) {
        let progress = self.progress.advance(self.mode, delta);
        self.updater
            .update(&self.particles, progress, self.mode, elapsed, &mut self.transforms);
    }

    #[inline]
    pub fn mode(&self) -> MorphState {
        self.mode
    }

    /// Current blend factor between scattered (0) and formed (1).
    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Transform buffer, rewritten by every [`frame`](Self::frame).
    #[inline]
    pub fn instance_transforms(&self) -> &[InstanceRaw] {
        &self.transforms
    }

    /// Color buffer, fixed since construction.
    #[inline]
    pub fn instance_colors(&self) -> &[ColorRaw] {
        &self.colors
    }
}
