//! seamloop Animation Engine
//!
//! The timeline primitives the carousel is a client of.
//!
//! # Features
//!
//! - **Labelled Timelines**: Per-target tracks of timed segments with named labels
//! - **Seekable Playhead**: `time`, `progress` and `total_time` with repeat and reverse
//! - **Playhead Tweens**: `tween_to` with easing and an optional time-wrap modifier
//! - **Inertial Throws**: Decelerating motion toward a snapped resting point
//! - **Frame Clock**: Wall-clock frame deltas for hosts that drive their own loop
//!
//! Nothing in this crate keeps global state. Defaults such as the fallback
//! easing travel in [`TimelineOptions`].

pub mod clock;
pub mod easing;
pub mod throw;
pub mod timeline;
pub mod tween;
pub mod utils;

pub use clock::FrameClock;
pub use easing::{Easing, EasingParseError};
pub use throw::{Throw, ThrowConfig};
pub use timeline::{Repeat, Segment, TargetId, Timeline, TimelineOptions, Track};
pub use tween::{PlayheadTween, TweenVars};
pub use utils::{snap, wrap, wrap_index};
