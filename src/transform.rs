//! Per-frame instance transforms.
//!
//! Each frame every particle gets a position blended between its two layouts,
//! a hover bob on Y, a slow spin and a scale pulse. The particle index is the
//! phase offset for the bob and the pulse, so neighbours never move in lockstep.
//!
//! Hover and spin constants switch on the *target* state, not on progress.
//! Toggling therefore changes the bob and spin speed at once while the
//! positions are still gliding.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{finite, non_negative, MorphConfig};
use crate::error::ConfigError;
use crate::particle::{MorphState, Particle};

/// Hover and spin constants for one target state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Peak vertical offset of the hover bob.
    pub hover_amplitude: f32,
    /// Angular frequency of the hover bob, radians per second.
    pub hover_frequency: f32,
    /// Spin rate around X and Y, radians per second.
    pub rotation_speed: f32,
}

impl MotionProfile {
    /// Wide, slow drift for the free cloud.
    pub fn scattered() -> Self {
        Self {
            hover_amplitude: 0.5,
            hover_frequency: 0.5,
            rotation_speed: 0.5,
        }
    }

    /// Small, quick shimmer once the tree has formed.
    pub fn formed() -> Self {
        Self {
            hover_amplitude: 0.1,
            hover_frequency: 2.0,
            rotation_speed: 0.2,
        }
    }

    /// Vertical hover offset for a particle with the given phase.
    #[inline]
    pub fn hover(&self, phase: f32, time: f32) -> f32 {
        (time * self.hover_frequency + phase).sin() * self.hover_amplitude
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        non_negative("hover_amplitude", self.hover_amplitude)?;
        finite("hover_frequency", self.hover_frequency)?;
        finite("rotation_speed", self.rotation_speed)
    }
}

/// Scale pulsation shared by both states.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PulseConfig {
    /// Relative scale swing, 0.1 = ±10%.
    pub amplitude: f32,
    /// Angular frequency, radians per second.
    pub frequency: f32,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            amplitude: 0.1,
            frequency: 3.0,
        }
    }
}

impl PulseConfig {
    /// Scale multiplier for a particle with the given phase.
    #[inline]
    pub fn factor(&self, phase: f32, time: f32) -> f32 {
        1.0 + (time * self.frequency + phase).sin() * self.amplitude
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        non_negative("pulse_amplitude", self.amplitude)?;
        finite("pulse_frequency", self.frequency)
    }
}

/// Decomposed world transform of one instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceTransform {
    pub position: Vec3,
    /// Euler angles applied in XYZ order.
    pub rotation: Vec3,
    /// Uniform scale.
    pub scale: f32,
}

impl InstanceTransform {
    /// Pose before the first frame: scatter position, base rotation and
    /// base scale.
    pub fn initial(particle: &Particle) -> Self {
        Self {
            position: particle.scatter_position,
            rotation: particle.base_rotation,
            scale: particle.scale,
        }
    }

    /// Rotation as a quaternion, `Rx · Ry · Rz`.
    #[inline]
    pub fn quat(&self) -> Quat {
        Quat::from_rotation_x(self.rotation.x)
            * Quat::from_rotation_y(self.rotation.y)
            * Quat::from_rotation_z(self.rotation.z)
    }

    /// `T · R · S` model matrix.
    #[inline]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.quat(), self.position)
    }

    #[inline]
    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            model: self.to_matrix().to_cols_array_2d(),
        }
    }
}

/// One entry of the instance transform buffer: a column-major model matrix.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

impl InstanceRaw {
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }

    /// Translation part of the model matrix.
    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.model[3][0], self.model[3][1], self.model[3][2])
    }
}

/// Computes instance transforms from the particle table, progress and time.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceUpdater {
    scattered: MotionProfile,
    formed: MotionProfile,
    pulse: PulseConfig,
}

impl Default for InstanceUpdater {
    fn default() -> Self {
        Self {
            scattered: MotionProfile::scattered(),
            formed: MotionProfile::formed(),
            pulse: PulseConfig::default(),
        }
    }
}

impl InstanceUpdater {
    pub fn new(scattered: MotionProfile, formed: MotionProfile, pulse: PulseConfig) -> Self {
        Self {
            scattered,
            formed,
            pulse,
        }
    }

    pub fn from_config(config: &MorphConfig) -> Self {
        Self::new(config.scattered_motion, config.formed_motion, config.pulse)
    }

    /// Motion constants used while heading towards `mode`.
    #[inline]
    pub fn motion(&self, mode: MorphState) -> &MotionProfile {
        match mode {
            MorphState::Scattered => &self.scattered,
            MorphState::Formed => &self.formed,
        }
    }

    /// Transform of particle `index` at `progress`, heading for `mode`, at
    /// `time` seconds since start.
    pub fn transform(
        &self,
        index: usize,
        particle: &Particle,
        progress: f32,
        mode: MorphState,
        time: f32,
    ) -> InstanceTransform {
        let motion = self.motion(mode);
        let phase = index as f32;

        let mut position = particle.base_position(progress);
        position.y += motion.hover(phase, time);

        let spin = time * motion.rotation_speed;
        let rotation = Vec3::new(
            particle.base_rotation.x + spin,
            particle.base_rotation.y + spin,
            particle.base_rotation.z,
        );

        InstanceTransform {
            position,
            rotation,
            scale: particle.scale * self.pulse.factor(phase, time),
        }
    }

    /// Recompute every instance into `out`, resizing it to the table length.
    pub fn update(
        &self,
        particles: &[Particle],
        progress: f32,
        mode: MorphState,
        time: f32,
        out: &mut Vec<InstanceRaw>,
    ) {
        out.resize(particles.len(), InstanceRaw::zeroed());
        if particles.is_empty() {
            return;
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            out.par_iter_mut()
                .zip(particles.par_iter())
                .enumerate()
                .for_each(|(i, (slot, p))| {
                    *slot = self.transform(i, p, progress, mode, time).to_raw();
                });
        }

        #[cfg(not(feature = "parallel"))]
        for (i, (slot, p)) in out.iter_mut().zip(particles).enumerate() {
            *slot = self.transform(i, p, progress, mode, time).to_raw();
        }
    }
}

/// Pre-first-frame transforms for the whole table.
pub fn initial_transforms(particles: &[Particle]) -> Vec<InstanceRaw> {
    particles
        .iter()
        .map(|p| InstanceTransform::initial(p).to_raw())
        .collect()
}
