//! # Shardmorph
//!
//! A few thousand metallic shards that drift in a loose cloud and, on
//! command, assemble into a spiralling cone-shaped tree. Toggle again and
//! they release back into the cloud.
//!
//! ## Quick Start
//!
//! ```ignore
//! use shardmorph::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     let config = MorphConfig::default().with_particle_count(5_000);
//!     shardmorph::run(config, None)
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Particles
//!
//! Every shard is generated once, up front, by [`generate_particles`]. A
//! [`Particle`] carries two anchors:
//! - `scatter_position` - uniform point inside the scatter sphere
//! - `tree_position` - point on a tapering spiral around the y axis
//!
//! plus a base rotation, a base scale and a [`ColorClass`]. Nothing about a
//! particle changes after generation.
//!
//! ### Progress
//!
//! [`MorphProgress`] is a single scalar in `[0, 1]` shared by every shard:
//! 0 is the cloud, 1 is the tree. Each frame it moves toward the current
//! [`MorphState`] target with frame-rate independent damping.
//!
//! ### Transforms
//!
//! [`InstanceUpdater`] turns `(particle, progress, mode, time)` into a
//! model matrix: interpolated anchor, a vertical hover, a slow spin and a
//! scale pulse. Matrices go straight into a GPU instance buffer.
//!
//! ### Colors
//!
//! [`assign_colors`] picks one of two shades per particle from its class.
//! Colors are computed once and never rewritten.
//!
//! ## Headless use
//!
//! [`MorphController`] bundles all of the above without any window:
//!
//! ```ignore
//! let mut morph = MorphController::with_seed(MorphConfig::default(), 7)?;
//! morph.toggle_mode();
//! for frame in 1..=120 {
//!     morph.frame(frame as f32 / 60.0, 1.0 / 60.0);
//! }
//! let matrices: &[InstanceRaw] = morph.instance_transforms();
//! ```
//!
//! ## Features
//!
//! - `parallel` - update instance transforms on the rayon thread pool.

mod app;
pub mod color;
pub mod config;
pub mod error;
pub mod gpu;
mod morph;
pub mod particle;
pub mod progress;
pub mod spawn;
pub mod time;
pub mod transform;

pub use app::run;
pub use bytemuck;
pub use color::{assign_colors, ColorRaw, PaletteConfig, ShardPalette};
pub use config::{MorphConfig, MAX_PARTICLES};
pub use error::{ConfigError, ConfigFileError, GpuError, RunError};
pub use glam::{Mat4, Quat, Vec3};
pub use morph::MorphController;
pub use particle::{ColorClass, MorphState, Particle};
pub use progress::{Damping, MorphProgress};
pub use spawn::{generate_particles, SpawnContext};
pub use time::Time;
pub use transform::{InstanceRaw, InstanceTransform, InstanceUpdater, MotionProfile, PulseConfig};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use shardmorph::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::{assign_colors, ColorRaw, PaletteConfig};
    pub use crate::config::MorphConfig;
    pub use crate::error::{ConfigError, RunError};
    pub use crate::morph::MorphController;
    pub use crate::particle::{ColorClass, MorphState, Particle};
    pub use crate::progress::{Damping, MorphProgress};
    pub use crate::spawn::generate_particles;
    pub use crate::transform::{InstanceRaw, InstanceUpdater};
    pub use crate::{Mat4, Vec3};
}
