//! Morph progress: a single scalar relaxing towards 0 or 1.
//!
//! Both smoothing models integrate the underlying continuous-time system
//! exactly, so one step of `dt` lands where two steps of `dt / 2` do. The
//! frame rate changes how often the value is sampled, not how fast it moves.
//!
//! ```ignore
//! let mut progress = MorphProgress::new(MorphState::Scattered, 1.5);
//! let t = progress.advance(MorphState::Formed, time.delta());
//! ```

use serde::{Deserialize, Serialize};

use crate::particle::MorphState;

/// Smallest accepted smoothing time, in seconds.
const MIN_SMOOTHING_TIME: f32 = 1e-4;

/// How progress approaches its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Damping {
    /// First-order decay: the remaining distance shrinks by `e^(-dt/τ)`.
    ///
    /// Monotonic towards the target from any starting point, including
    /// right after a redirect.
    #[default]
    Exponential,

    /// Critically damped spring with `ω = 2/τ`.
    ///
    /// Starts slowly and eases in. Redirecting mid-transition drops the
    /// velocity that points away from the new target, so progress eases in
    /// again from where it is. Never passes the target and never leaves [0, 1].
    CriticallyDamped,
}

/// Tracks the morph blend factor between the scattered (0) and formed (1)
/// layouts.
#[derive(Clone, Debug)]
pub struct MorphProgress {
    value: f32,
    /// Only used by [`Damping::CriticallyDamped`].
    velocity: f32,
    /// Target value of the last `advance`.
    goal: f32,
    smoothing_time: f32,
    damping: Damping,
}

impl MorphProgress {
    /// Start at rest on the given state's target value.
    pub fn new(initial: MorphState, smoothing_time: f32) -> Self {
        Self {
            value: initial.target(),
            velocity: 0.0,
            goal: initial.target(),
            smoothing_time: smoothing_time.max(MIN_SMOOTHING_TIME),
            damping: Damping::default(),
        }
    }

    /// Use a different smoothing model.
    pub fn with_damping(mut self, damping: Damping) -> Self {
        self.damping = damping;
        self.velocity = 0.0;
        self
    }

    /// Current progress in [0, 1].
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Current rate of change per second. Always zero for exponential damping.
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    #[inline]
    pub fn smoothing_time(&self) -> f32 {
        self.smoothing_time
    }

    #[inline]
    pub fn damping(&self) -> Damping {
        self.damping
    }

    /// Whether progress is within `epsilon` of `state`'s target and at rest.
    pub fn is_settled(&self, state: MorphState, epsilon: f32) -> bool {
        (self.value - state.target()).abs() <= epsilon && self.velocity.abs() <= epsilon
    }

    /// Move towards `target` by `delta` seconds and return the new value.
    ///
    /// A non-positive or non-finite `delta` leaves progress unchanged.
    pub fn advance(&mut self, target: MorphState, delta: f32) -> f32 {
        if !(delta.is_finite() && delta > 0.0) {
            return self.value;
        }

        let goal = target.target();
        if goal != self.goal {
            if self.velocity * (goal - self.value) < 0.0 {
                self.velocity = 0.0;
            }
            self.goal = goal;
        }

        match self.damping {
            Damping::Exponential => self.advance_exponential(goal, delta),
            Damping::CriticallyDamped => self.advance_critical(goal, delta),
        }

        if !(0.0..=1.0).contains(&self.value) {
            self.value = self.value.clamp(0.0, 1.0);
            self.velocity = 0.0;
        }
        self.value
    }

    fn advance_exponential(&mut self, goal: f32, delta: f32) {
        // 1 - e^(-dt/τ), accurate for tiny dt
        let alpha = -(-delta / self.smoothing_time).exp_m1();
        self.value += (goal - self.value) * alpha;
        self.velocity = 0.0;
    }

    fn advance_critical(&mut self, goal: f32, delta: f32) {
        let omega = 2.0 / self.smoothing_time;
        let offset = self.value - goal;
        let decay = (-omega * delta).exp();

        // x(t) = (c + (v + ωc)t)e^(-ωt)
        let velocity = self.velocity;
        let temp = velocity + omega * offset;
        let mut next = (offset + temp * delta) * decay;
        self.velocity = (velocity - omega * temp * delta) * decay;

        // Never drift away from the goal unless already moving away
        if velocity * offset <= 0.0 && next.abs() > offset.abs() {
            next = offset;
        }

        if offset != 0.0 && next.signum() != offset.signum() {
            self.value = goal;
            self.velocity = 0.0;
        } else {
            self.value = goal + next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TAU: f32 = 1.5;

    #[test]
    fn test_starts_at_initial_state() {
        assert_eq!(MorphProgress::new(MorphState::Scattered, TAU).value(), 0.0);
        assert_eq!(MorphProgress::new(MorphState::Formed, TAU).value(), 1.0);
    }

    #[test]
    fn test_one_time_constant() {
        let mut p = MorphProgress::new(MorphState::Scattered, TAU);
        let v = p.advance(MorphState::Formed, TAU);
        let expected = 1.0 - (-1.0f32).exp();
        assert!((v - expected).abs() < 1e-5, "{v} vs {expected}");
    }

    #[test]
    fn test_zero_or_invalid_delta_is_noop() {
        let mut p = MorphProgress::new(MorphState::Scattered, TAU);
        p.advance(MorphState::Formed, 0.5);
        let before = p.value();

        for dt in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert_eq!(p.advance(MorphState::Scattered, dt), before);
        }
    }

    #[test]
    fn test_resting_on_target_stays_put() {
        let mut p = MorphProgress::new(MorphState::Formed, TAU);
        for _ in 0..100 {
            assert_eq!(p.advance(MorphState::Formed, 1.0 / 60.0), 1.0);
        }
        assert!(p.is_settled(MorphState::Formed, 0.0));
    }

    #[test]
    fn test_larger_step_moves_further() {
        let mut a = MorphProgress::new(MorphState::Scattered, TAU);
        let mut b = MorphProgress::new(MorphState::Scattered, TAU);
        assert!(b.advance(MorphState::Formed, 0.2) > a.advance(MorphState::Formed, 0.1));
    }

    #[test]
    fn test_converges_at_60_and_144_hz() {
        for hz in [60.0f32, 144.0] {
            let mut p = MorphProgress::new(MorphState::Scattered, TAU);
            let frames = (20.0 * TAU * hz) as usize;
            for _ in 0..frames {
                p.advance(MorphState::Formed, 1.0 / hz);
            }
            assert!((p.value() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_redirect_mid_transition() {
        let mut p = MorphProgress::new(MorphState::Scattered, TAU);
        for _ in 0..60 {
            p.advance(MorphState::Formed, 1.0 / 60.0);
        }
        let peak = p.value();
        assert!(peak > 0.0 && peak < 1.0);

        let mut last = peak;
        for _ in 0..60 {
            let v = p.advance(MorphState::Scattered, 1.0 / 60.0);
            assert!(v <= last);
            last = v;
        }
        assert!(last < peak);
    }

    #[test]
    fn test_critically_damped_eases_in() {
        let mut exp = MorphProgress::new(MorphState::Scattered, TAU);
        let mut crit =
            MorphProgress::new(MorphState::Scattered, TAU).with_damping(Damping::CriticallyDamped);

        let a = exp.advance(MorphState::Formed, 0.05);
        let b = crit.advance(MorphState::Formed, 0.05);
        assert!(b > 0.0);
        assert!(b < a);
        assert!(crit.velocity() > 0.0);
    }

    #[test]
    fn test_critically_damped_converges() {
        let mut p =
            MorphProgress::new(MorphState::Scattered, TAU).with_damping(Damping::CriticallyDamped);
        for _ in 0..(30.0 * TAU * 60.0) as usize {
            p.advance(MorphState::Formed, 1.0 / 60.0);
        }
        assert!((p.value() - 1.0).abs() < 1e-3);
        assert!(p.is_settled(MorphState::Formed, 1e-3));
    }

    #[test]
    fn test_critically_damped_redirect_stays_in_range() {
        let mut p =
            MorphProgress::new(MorphState::Scattered, TAU).with_damping(Damping::CriticallyDamped);
        let mut target = MorphState::Formed;
        for frame in 0..2000 {
            if frame % 37 == 0 {
                target = target.toggled();
            }
            let v = p.advance(target, 1.0 / 30.0);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_critically_damped_redirect_never_backs_off() {
        let mut p =
            MorphProgress::new(MorphState::Scattered, TAU).with_damping(Damping::CriticallyDamped);
        for _ in 0..60 {
            p.advance(MorphState::Formed, 1.0 / 60.0);
        }

        let mut last = p.value();
        for _ in 0..60 {
            let v = p.advance(MorphState::Scattered, 1.0 / 60.0);
            assert!(v <= last, "{v} > {last}");
            last = v;
        }
        assert!(p.velocity() <= 0.0);

        for _ in 0..60 {
            let v = p.advance(MorphState::Formed, 1.0 / 60.0);
            assert!(v >= last, "{v} < {last}");
            last = v;
        }
    }

    proptest! {
        #[test]
        fn prop_monotonic_after_redirects(
            critical in any::<bool>(),
            legs in prop::collection::vec(0.0f32..2.0, 0..4),
            steps in prop::collection::vec(1e-5f32..0.5, 1..200),
        ) {
            let damping = if critical { Damping::CriticallyDamped } else { Damping::Exponential };
            let mut p = MorphProgress::new(MorphState::Scattered, TAU).with_damping(damping);
            let mut target = MorphState::Scattered;
            for leg in legs {
                target = target.toggled();
                for _ in 0..30 {
                    p.advance(target, leg / 30.0);
                }
            }

            let mut last = p.value();
            for dt in steps {
                let v = p.advance(MorphState::Formed, dt);
                prop_assert!(v >= last, "{} < {}", v, last);
                last = v;
            }
        }

        #[test]
        fn prop_exponential_is_monotonic(
            steps in prop::collection::vec(1e-5f32..0.5, 1..200),
            warmup in 0.0f32..3.0,
        ) {
            let mut p = MorphProgress::new(MorphState::Scattered, TAU);
            p.advance(MorphState::Formed, warmup);
            p.advance(MorphState::Scattered, warmup / 2.0);

            let mut last = p.value();
            for dt in steps {
                let v = p.advance(MorphState::Formed, dt);
                prop_assert!(v >= last);
                prop_assert!(v <= 1.0);
                last = v;
            }
        }

        #[test]
        fn prop_frame_rate_invariant(
            dt in 1e-3f32..2.0,
            start in 0.0f32..3.0,
            critical in any::<bool>(),
        ) {
            let damping = if critical { Damping::CriticallyDamped } else { Damping::Exponential };
            let mut whole = MorphProgress::new(MorphState::Scattered, TAU).with_damping(damping);
            whole.advance(MorphState::Formed, start);
            let mut halves = whole.clone();

            whole.advance(MorphState::Formed, dt);
            halves.advance(MorphState::Formed, dt / 2.0);
            halves.advance(MorphState::Formed, dt / 2.0);

            prop_assert!((whole.value() - halves.value()).abs() < 1e-4);
        }
    }
}
