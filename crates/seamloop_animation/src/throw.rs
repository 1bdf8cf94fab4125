//! Inertial throws
//!
//! When a drag is released with velocity, the dragged value keeps moving and
//! decelerates to rest. The resting point is computed up front from a
//! constant deceleration, passed through a caller-supplied snap function, and
//! the value then eases out toward the snapped point. A quadratic ease-out
//! starts at twice the average speed and ends at zero, which reads as
//! uniform deceleration.

use crate::easing::Easing;
use serde::{Deserialize, Serialize};

/// Configuration for inertial throws
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrowConfig {
    /// Deceleration in pixels per second squared
    pub resistance: f32,
    /// Shortest throw, in seconds, whenever the value has to move
    pub min_duration: f32,
    /// Longest throw, in seconds
    pub max_duration: f32,
}

impl Default for ThrowConfig {
    fn default() -> Self {
        Self {
            resistance: 1500.0,
            min_duration: 0.2,
            max_duration: 3.0,
        }
    }
}

impl ThrowConfig {
    /// Where a value released at `start` with `velocity` comes to rest
    pub fn natural_end(&self, start: f32, velocity: f32) -> f32 {
        if self.resistance <= 0.0 {
            return start;
        }
        start + velocity * velocity.abs() / (2.0 * self.resistance)
    }

    /// Time to decelerate from `velocity`, clamped to the configured range
    pub fn duration_for(&self, velocity: f32) -> f32 {
        let natural = if self.resistance > 0.0 {
            velocity.abs() / self.resistance
        } else {
            0.0
        };
        natural.clamp(self.min_duration, self.max_duration.max(self.min_duration))
    }
}

/// An in-flight throw
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Throw {
    start: f32,
    end: f32,
    duration: f32,
    elapsed: f32,
}

impl Throw {
    pub fn new(start: f32, end: f32, duration: f32) -> Self {
        Self {
            start,
            end,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Launch from `start` with `velocity`, resting wherever `snap` moves the natural end
    pub fn launch(
        config: &ThrowConfig,
        start: f32,
        velocity: f32,
        snap: impl FnOnce(f32) -> f32,
    ) -> Self {
        let natural = config.natural_end(start, velocity);
        let end = snap(natural);
        let duration = if (end - start).abs() <= f32::EPSILON {
            0.0
        } else {
            config.duration_for(velocity)
        };
        tracing::debug!(
            "Throw: start={:.1} velocity={:.1} natural_end={:.1} snapped_end={:.1} duration={:.3}s",
            start,
            velocity,
            natural,
            end,
            duration
        );
        Self::new(start, end, duration)
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.end
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.end;
        }
        let t = Easing::QuadOut.apply(self.elapsed / self.duration);
        self.start + (self.end - self.start) * t
    }

    pub fn step(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    pub fn is_settled(&self) -> bool {
        self.elapsed >= self.duration
    }
}
