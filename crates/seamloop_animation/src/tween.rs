//! Playhead tweens
//!
//! A [`PlayheadTween`] animates a timeline's playhead from one time to
//! another. A timeline runs at most one at a time; starting another
//! overwrites it.

use crate::easing::Easing;
use serde::{Deserialize, Serialize};

/// Options for a playhead tween
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenVars {
    /// Seconds; `None` uses the time distance at unit speed
    pub duration: Option<f32>,
    /// `None` falls back to the timeline's default easing
    #[serde(rename = "ease")]
    pub easing: Option<Easing>,
    /// Wrap every tweened time into `[0, duration)` of the timeline
    #[serde(skip)]
    pub wrap_time: bool,
}

impl TweenVars {
    pub fn new(duration: f32, easing: Easing) -> Self {
        Self {
            duration: Some(duration),
            easing: Some(easing),
            wrap_time: false,
        }
    }

    /// Jump without animating
    pub fn immediate() -> Self {
        Self {
            duration: Some(0.0),
            ..Default::default()
        }
    }

    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn is_immediate(&self) -> bool {
        self.duration == Some(0.0)
    }
}

/// An in-flight tween of a timeline playhead
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayheadTween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    easing: Easing,
    wrap_time: bool,
}

impl PlayheadTween {
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing, wrap_time: bool) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
            wrap_time,
        }
    }

    pub fn from(&self) -> f32 {
        self.from
    }

    pub fn to(&self) -> f32 {
        self.to
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn wraps_time(&self) -> bool {
        self.wrap_time
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Seconds left before the tween reaches `to`
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    /// Unwrapped playhead time at the current elapsed time
    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = self.easing.apply(self.elapsed / self.duration);
        self.from + (self.to - self.from) * t
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}
