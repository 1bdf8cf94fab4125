//! Frame clock
//!
//! Hosts that drive their own frame loop use a [`FrameClock`] to turn wall
//! time into per-frame deltas for `tick(dt)` calls.

use std::time::{Duration, Instant};

/// Largest delta handed out, so a stalled frame does not teleport animations
const MAX_FRAME_DELTA: f32 = 0.25;

/// Measures time between frames
#[derive(Clone, Debug)]
pub struct FrameClock {
    last_frame: Instant,
    frame_duration: Duration,
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        Self {
            last_frame: Instant::now(),
            frame_duration: Duration::from_micros(1_000_000 / u64::from(target_fps.max(1))),
        }
    }

    /// Target length of one frame
    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Restart timing from now, e.g. after the loop was idle
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
    }

    /// Seconds since the previous call, capped at [`MAX_FRAME_DELTA`]
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt.min(MAX_FRAME_DELTA)
    }

    /// Time left in the current frame budget
    pub fn remaining(&self) -> Duration {
        self.frame_duration.saturating_sub(self.last_frame.elapsed())
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_duration() {
        let clock = FrameClock::new(120);
        assert_eq!(clock.frame_duration(), Duration::from_micros(8333));
    }

    #[test]
    fn test_delta_is_capped() {
        let mut clock = FrameClock::default();
        clock.last_frame = Instant::now() - Duration::from_secs(2);
        assert_eq!(clock.delta(), MAX_FRAME_DELTA);
        assert!(clock.delta() < MAX_FRAME_DELTA);
    }

    #[test]
    fn test_zero_fps_does_not_divide_by_zero() {
        let clock = FrameClock::new(0);
        assert_eq!(clock.frame_duration(), Duration::from_secs(1));
    }
}
