//! Frame clock for the morph loop.
//!
//! The morph needs two numbers per frame: seconds since start (drives hover,
//! spin and pulse) and seconds since the previous frame (drives progress).
//!
//! ```ignore
//! let mut time = Time::new();
//! loop {
//!     let (elapsed, delta) = time.update();
//!     morph.frame(elapsed, delta);
//! }
//! ```

use std::time::{Duration, Instant};

/// Longest frame step handed to the animation, in seconds.
///
/// A stalled window (drag, minimise, debugger) would otherwise collapse the
/// whole morph into a single frame.
pub const DEFAULT_MAX_DELTA: f32 = 0.25;

/// Elapsed/delta time tracking with pause and FPS.
#[derive(Debug)]
pub struct Time {
    start: Instant,
    last_frame: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
    /// Wall time spent paused, excluded from `elapsed`.
    pause_elapsed: Duration,
    /// Fixed step for deterministic playback.
    fixed_delta: Option<f32>,
    max_delta: f32,
}

impl Time {
    /// Create a new clock starting now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            pause_elapsed: Duration::ZERO,
            fixed_delta: None,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }

    /// Advance the clock. Call once per frame.
    ///
    /// Returns `(elapsed, delta)` in seconds.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();

        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed_secs, self.delta_secs);
        }

        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.delta_secs = self.fixed_delta.unwrap_or(raw_delta).min(self.max_delta);
        self.last_frame = now;

        self.elapsed_secs = match self.fixed_delta {
            Some(step) => self.elapsed_secs + step,
            None => (now.duration_since(self.start) - self.pause_elapsed).as_secs_f32(),
        };

        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Seconds since start, pauses excluded.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Seconds since the previous frame.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freeze the animation. `delta()` is 0 and `elapsed()` stops.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            let now = Instant::now();
            self.pause_elapsed += now.duration_since(self.last_frame);
            self.last_frame = now;
            self.paused = false;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Use a fixed step instead of wall time. `None` restores wall time.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Cap for a single frame step. Negative values are treated as 0.
    pub fn set_max_delta(&mut self, max: f32) {
        self.max_delta = max.max(0.0);
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.elapsed(), 0.0);
        assert!(!time.is_paused());
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = time.update();

        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_time_pause() {
        let mut time = Time::new();
        time.update();

        time.pause();
        assert!(time.is_paused());

        let elapsed_before = time.elapsed();
        thread::sleep(Duration::from_millis(10));
        time.update();

        assert_eq!(time.elapsed(), elapsed_before);
        assert_eq!(time.delta(), 0.0);

        time.toggle_pause();
        assert!(!time.is_paused());
    }

    #[test]
    fn test_fixed_delta_drives_elapsed() {
        let mut time = Time::new();
        time.set_fixed_delta(Some(1.0 / 60.0));

        thread::sleep(Duration::from_millis(50));
        for _ in 0..60 {
            time.update();
        }

        assert!((time.delta() - 1.0 / 60.0).abs() < 1e-6);
        assert!((time.elapsed() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_delta_is_capped() {
        let mut time = Time::new();
        time.set_max_delta(0.005);
        thread::sleep(Duration::from_millis(20));
        time.update();
        assert!(time.delta() <= 0.005);
    }
}
