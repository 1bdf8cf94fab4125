//! Pointer input
//!
//! Press / move / release events in page coordinates with a timestamp, and a
//! small tracker that estimates horizontal release velocity from the most
//! recent samples.

use smallvec::SmallVec;

/// Phase of a pointer gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Move,
    Release,
}

/// A single pointer sample
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub x: f32,
    pub y: f32,
    /// Timestamp in seconds
    pub time: f64,
}

impl PointerEvent {
    pub fn press(x: f32, time: f64) -> Self {
        Self {
            phase: PointerPhase::Press,
            x,
            y: 0.0,
            time,
        }
    }

    pub fn moved(x: f32, time: f64) -> Self {
        Self {
            phase: PointerPhase::Move,
            x,
            y: 0.0,
            time,
        }
    }

    pub fn release(x: f32, time: f64) -> Self {
        Self {
            phase: PointerPhase::Release,
            x,
            y: 0.0,
            time,
        }
    }
}

/// Samples older than this (seconds) do not contribute to release velocity
const VELOCITY_WINDOW: f64 = 0.1;

/// Upper bound on retained samples
const MAX_SAMPLES: usize = 16;

/// Estimates horizontal velocity (px/s) over a short trailing window
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    samples: SmallVec<[(f64, f32); MAX_SAMPLES]>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    pub fn add(&mut self, time: f64, x: f32) {
        if self.samples.len() == MAX_SAMPLES {
            self.samples.remove(0);
        }
        self.samples.push((time, x));
    }

    /// Velocity across the samples inside the trailing window
    ///
    /// Returns 0 when fewer than two samples fall inside the window.
    pub fn velocity(&self) -> f32 {
        let Some(&(last_time, last_x)) = self.samples.last() else {
            return 0.0;
        };
        let Some(&(first_time, first_x)) = self
            .samples
            .iter()
            .find(|(time, _)| last_time - *time <= VELOCITY_WINDOW)
        else {
            return 0.0;
        };

        let dt = (last_time - first_time) as f32;
        if dt <= f32::EPSILON {
            return 0.0;
        }
        (last_x - first_x) / dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_from_recent_samples() {
        let mut tracker = VelocityTracker::new();
        tracker.add(0.00, 100.0);
        tracker.add(0.05, 90.0);
        tracker.add(0.10, 80.0);

        assert!((tracker.velocity() - -200.0).abs() < 0.5);
    }

    #[test]
    fn test_stale_samples_are_ignored() {
        let mut tracker = VelocityTracker::new();
        tracker.add(0.0, 300.0);
        tracker.add(0.1, 60.0);
        tracker.add(1.0, 60.0);

        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn test_empty_tracker_is_still() {
        let tracker = VelocityTracker::new();
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn test_sample_capacity_is_bounded() {
        let mut tracker = VelocityTracker::new();
        for i in 0..40 {
            tracker.add(i as f64 * 0.01, i as f32);
        }
        assert_eq!(tracker.samples.len(), MAX_SAMPLES);
        assert!((tracker.velocity() - 100.0).abs() < 0.5);
    }
}
