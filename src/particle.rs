//! Static per-particle data and the two morph states.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Which palette family a particle draws its color from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorClass {
    /// Gold family.
    Primary,
    /// Emerald family.
    Secondary,
}

/// The discrete shape the particles are heading towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MorphState {
    /// Free-floating spherical cloud.
    #[default]
    Scattered,
    /// Assembled cone-spiral tree.
    Formed,
}

impl MorphState {
    /// The other state.
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            MorphState::Scattered => MorphState::Formed,
            MorphState::Formed => MorphState::Scattered,
        }
    }

    /// Progress value this state pulls towards (0 scattered, 1 formed).
    #[inline]
    pub fn target(self) -> f32 {
        match self {
            MorphState::Scattered => 0.0,
            MorphState::Formed => 1.0,
        }
    }

    /// Short status line for overlays and the window title.
    pub fn status_label(self) -> &'static str {
        match self {
            MorphState::Scattered => "STATUS: SCATTERED",
            MorphState::Formed => "STATUS: CONVERGED",
        }
    }

    /// Label for the control that toggles away from this state.
    pub fn action_label(self) -> &'static str {
        match self {
            MorphState::Scattered => "ASSEMBLE TREE",
            MorphState::Formed => "RELEASE MAGIC",
        }
    }
}

/// One shard instance. Generated once, read-only afterwards.
///
/// The particle's index in its table doubles as its animation phase, so the
/// table order must not change after generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position inside the scatter sphere.
    pub scatter_position: Vec3,
    /// Position on the tree spiral, jitter included.
    pub tree_position: Vec3,
    /// Euler XYZ orientation seed. `z` is always zero.
    pub base_rotation: Vec3,
    /// Base uniform scale.
    pub scale: f32,
    pub color_class: ColorClass,
}

impl Particle {
    /// Position blended between the two layouts, before any hover offset.
    ///
    /// `progress` 0 returns the scatter position and 1 the tree position,
    /// both exactly.
    #[inline]
    pub fn base_position(&self, progress: f32) -> Vec3 {
        if progress <= 0.0 {
            self.scatter_position
        } else if progress >= 1.0 {
            self.tree_position
        } else {
            self.scatter_position.lerp(self.tree_position, progress)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Particle {
        Particle {
            scatter_position: Vec3::new(1.0, 2.0, 3.0),
            tree_position: Vec3::new(-1.0, 0.0, 5.0),
            base_rotation: Vec3::new(0.3, 0.6, 0.0),
            scale: 1.0,
            color_class: ColorClass::Primary,
        }
    }

    #[test]
    fn test_toggle_is_involution() {
        for state in [MorphState::Scattered, MorphState::Formed] {
            assert_ne!(state.toggled(), state);
            assert_eq!(state.toggled().toggled(), state);
        }
    }

    #[test]
    fn test_state_targets_and_labels() {
        assert_eq!(MorphState::default(), MorphState::Scattered);
        assert_eq!(MorphState::Scattered.target(), 0.0);
        assert_eq!(MorphState::Formed.target(), 1.0);
        assert_eq!(MorphState::Formed.status_label(), "STATUS: CONVERGED");
        assert_eq!(MorphState::Scattered.action_label(), "ASSEMBLE TREE");
    }

    #[test]
    fn test_base_position_endpoints_are_exact() {
        let p = sample();
        assert_eq!(p.base_position(0.0), p.scatter_position);
        assert_eq!(p.base_position(1.0), p.tree_position);
    }

    #[test]
    fn test_base_position_midpoint() {
        let p = sample();
        let mid = p.base_position(0.5);
        assert!((mid - Vec3::new(0.0, 1.0, 4.0)).length() < 1e-6);
    }
}
