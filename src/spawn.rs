//! Particle table generation.
//!
//! Every particle gets two homes: a point in the scatter sphere and a point on
//! the tree spiral. The table is built once and never changes afterwards.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::MorphConfig;
use crate::error::ConfigError;
use crate::particle::{ColorClass, Particle};

/// Context handed out per particle while the table is generated.
///
/// Wraps the shared random source with the sampling helpers the layouts need.
pub struct SpawnContext<'a, R: Rng + ?Sized> {
    /// Index of the particle being spawned; drives the spiral angle.
    pub index: u32,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> SpawnContext<'a, R> {
    pub fn new(index: u32, rng: &'a mut R) -> Self {
        Self { index, rng }
    }

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// `true` with probability `p`.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.random() < p
    }

    /// Random point inside a sphere of given radius, centered at origin.
    ///
    /// Uniform by volume: the polar angle comes from `acos(2u - 1)` and the
    /// radius from a cube root, so neither the poles nor the center clump.
    pub fn random_in_sphere(&mut self, radius: f32) -> Vec3 {
        let theta = self.rng.gen_range(0.0..TAU);
        let phi = (self.rng.gen::<f32>() * 2.0 - 1.0).clamp(-1.0, 1.0).acos();
        let r = radius * self.rng.gen::<f32>().cbrt();

        Vec3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin(),
            r * phi.cos(),
        )
    }

    /// Point on a cone spiral around the Y axis.
    ///
    /// Height is random, the angle advances by `step` per particle index, and
    /// the radius tapers from `base_radius` at the bottom to zero at the top.
    /// X and Z receive independent jitter in `[-jitter/2, jitter/2)`.
    pub fn cone_spiral(&mut self, height: f32, base_radius: f32, step: f32, jitter: f32) -> Vec3 {
        let h_norm = self.random();
        let y = (h_norm - 0.5) * height;
        let radius = (1.0 - h_norm) * base_radius;
        let angle = self.index as f32 * step;

        let jx = (self.random() - 0.5) * jitter;
        let jz = (self.random() - 0.5) * jitter;

        Vec3::new(angle.cos() * radius + jx, y, angle.sin() * radius + jz)
    }

    /// Euler orientation seed with x and y in `[0, π)` and no roll.
    pub fn random_rotation(&mut self) -> Vec3 {
        Vec3::new(self.random() * PI, self.random() * PI, 0.0)
    }
}

/// Generate the particle table from a validated config and a random source.
///
/// Fails fast on an invalid config; nothing is generated in that case.
pub fn generate_particles<R: Rng + ?Sized>(
    config: &MorphConfig,
    rng: &mut R,
) -> Result<Vec<Particle>, ConfigError> {
    config.validate()?;

    let count = config.particle_count;
    let (scale_min, scale_max) = config.scale_range;
    let mut particles = Vec::with_capacity(count as usize);

    for i in 0..count {
        let mut ctx = SpawnContext::new(i, &mut *rng);

        let scatter_position = ctx.random_in_sphere(config.scatter_radius);
        let tree_position = ctx.cone_spiral(
            config.tree_height,
            config.tree_radius,
            config.spiral_step,
            config.jitter,
        );
        let base_rotation = ctx.random_rotation();
        let scale = ctx.random_range(scale_min, scale_max);
        let color_class = if ctx.chance(config.gold_ratio) {
            ColorClass::Primary
        } else {
            ColorClass::Secondary
        };

        particles.push(Particle {
            scatter_position,
            tree_position,
            base_rotation,
            scale,
            color_class,
        });
    }

    log::debug!(
        "generated {} particles (scatter radius {}, tree {}x{})",
        count,
        config.scatter_radius,
        config.tree_height,
        config.tree_radius
    );

    Ok(particles)
}

/// Generate the particle table with an entropy-seeded random source.
pub fn generate_particles_random(config: &MorphConfig) -> Result<Vec<Particle>, ConfigError> {
    generate_particles(config, &mut SmallRng::from_entropy())
}

/// Recover the normalized height (0 bottom, 1 top) of a tree position.
#[inline]
pub fn normalized_height(tree_position: Vec3, tree_height: f32) -> f32 {
    tree_position.y / tree_height + 0.5
}
