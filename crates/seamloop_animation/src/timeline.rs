//! Labelled timeline
//!
//! A timeline owns one [`Track`] per registered target. Each track is a list
//! of timed segments; sampling a track at time `t` picks exactly one segment,
//! the latest-starting one that has begun. Two segments that meet at the
//! same instant therefore hand over atomically: the later segment's `from`
//! value is observed the moment the playhead reaches its start, and never
//! before.
//!
//! The playhead is stored as total time across repeats. [`Timeline::time`]
//! and [`Timeline::progress`] are local to the current iteration.
//!
//! ```rust
//! use seamloop_animation::{Timeline, TimelineOptions};
//!
//! let mut tl = Timeline::new(TimelineOptions::paused());
//! let target = tl.add_target(0.0);
//! tl.from_to(target, 0.0, -100.0, 1.0, 0.0)
//!     .from_to(target, 400.0, 0.0, 4.0, 1.0)
//!     .add_label("second", 1.0);
//!
//! tl.set_time(0.5);
//! assert_eq!(tl.sample(target), Some(-50.0));
//! tl.set_time(1.0);
//! assert_eq!(tl.sample(target), Some(400.0));
//! assert_eq!(tl.label("second"), Some(1.0));
//! ```

use crate::easing::Easing;
use crate::tween::{PlayheadTween, TweenVars};
use crate::utils::wrap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a target registered on a timeline
    pub struct TargetId;
}

/// Number of cycles the playhead jumps forward when reversed playback reaches
/// the start and rewinding is enabled
const REWIND_CYCLES: f32 = 100.0;

/// How many times a timeline plays after its first iteration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Repeat {
    #[default]
    Never,
    /// Extra iterations after the first
    Count(u32),
    Infinite,
}

impl From<i32> for Repeat {
    /// Negative counts repeat forever
    fn from(count: i32) -> Self {
        match count {
            0 => Repeat::Never,
            n if n < 0 => Repeat::Infinite,
            n => Repeat::Count(n as u32),
        }
    }
}

impl From<Repeat> for i32 {
    fn from(repeat: Repeat) -> Self {
        match repeat {
            Repeat::Never => 0,
            Repeat::Count(n) => n.min(i32::MAX as u32) as i32,
            Repeat::Infinite => -1,
        }
    }
}

impl Repeat {
    fn extra_iterations(self) -> Option<u32> {
        match self {
            Repeat::Never => Some(0),
            Repeat::Count(n) => Some(n),
            Repeat::Infinite => None,
        }
    }
}

/// Construction options for a timeline
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineOptions {
    pub paused: bool,
    pub reversed: bool,
    pub repeat: Repeat,
    /// Easing for segments and playhead tweens that do not name one
    pub default_easing: Easing,
    /// On reaching the start while reversed, jump forward by many cycles and
    /// keep playing instead of stopping
    pub rewind_on_reverse_complete: bool,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            paused: false,
            reversed: false,
            repeat: Repeat::Never,
            default_easing: Easing::Linear,
            rewind_on_reverse_complete: false,
        }
    }
}

impl TimelineOptions {
    pub fn paused() -> Self {
        Self {
            paused: true,
            ..Default::default()
        }
    }
}

/// A timed transition of one target value
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: f32,
    pub duration: f32,
    pub from: f32,
    pub to: f32,
    pub easing: Easing,
}

impl Segment {
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    /// Value at timeline time `time`, holding `to` once the segment has ended
    pub fn sample(&self, time: f32) -> f32 {
        if self.duration <= 0.0 || time >= self.end() {
            return self.to;
        }
        let t = ((time - self.start) / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * self.easing.apply(t)
    }
}

/// All segments animating one target, ordered by start time
#[derive(Clone, Debug, Default)]
pub struct Track {
    base: f32,
    segments: SmallVec<[Segment; 2]>,
}

impl Track {
    pub fn new(base: f32) -> Self {
        Self {
            base,
            segments: SmallVec::new(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Insert keeping start order; equal starts keep insertion order
    fn insert(&mut self, segment: Segment) {
        let at = self
            .segments
            .iter()
            .position(|s| s.start > segment.start)
            .unwrap_or(self.segments.len());
        self.segments.insert(at, segment);
    }

    pub fn end(&self) -> f32 {
        self.segments.iter().map(Segment::end).fold(0.0, f32::max)
    }

    pub fn sample(&self, time: f32) -> f32 {
        match self.segments.iter().rev().find(|s| s.start <= time) {
            Some(segment) => segment.sample(time),
            None => self.segments.first().map_or(self.base, |s| s.from),
        }
    }
}

/// A labelled, seekable timeline
#[derive(Clone, Debug)]
pub struct Timeline {
    tracks: SlotMap<TargetId, Track>,
    labels: IndexMap<String, f32>,
    duration: f32,
    total_time: f32,
    paused: bool,
    reversed: bool,
    repeat: Repeat,
    time_scale: f32,
    default_easing: Easing,
    rewind_on_reverse_complete: bool,
    tween: Option<PlayheadTween>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(TimelineOptions::default())
    }
}

impl Timeline {
    pub fn new(options: TimelineOptions) -> Self {
        Self {
            tracks: SlotMap::with_key(),
            labels: IndexMap::new(),
            duration: 0.0,
            total_time: 0.0,
            paused: options.paused,
            reversed: options.reversed,
            repeat: options.repeat,
            time_scale: 1.0,
            default_easing: options.default_easing,
            rewind_on_reverse_complete: options.rewind_on_reverse_complete,
            tween: None,
        }
    }

    // =========================================================================
    // Targets and segments
    // =========================================================================

    /// Register a target whose value is `initial` until a segment animates it
    pub fn add_target(&mut self, initial: f32) -> TargetId {
        self.tracks.insert(Track::new(initial))
    }

    pub fn remove_target(&mut self, id: TargetId) -> Option<Track> {
        let track = self.tracks.remove(id);
        self.recompute_duration();
        track
    }

    pub fn track(&self, id: TargetId) -> Option<&Track> {
        self.tracks.get(id)
    }

    /// Set a target's resting value outside any segment
    pub fn set(&mut self, id: TargetId, value: f32) {
        if let Some(track) = self.tracks.get_mut(id) {
            track.base = value;
        }
    }

    /// Animate from the value the target has at `at` to `to`
    pub fn to(&mut self, id: TargetId, to: f32, duration: f32, at: f32) -> &mut Self {
        if let Some(from) = self.tracks.get(id).map(|track| track.sample(at)) {
            self.from_to(id, from, to, duration, at);
        }
        self
    }

    /// Animate from `from` to `to`, starting at `at`
    ///
    /// The `from` value is not rendered before the playhead reaches `at`.
    pub fn from_to(
        &mut self,
        id: TargetId,
        from: f32,
        to: f32,
        duration: f32,
        at: f32,
    ) -> &mut Self {
        let easing = self.default_easing;
        if let Some(track) = self.tracks.get_mut(id) {
            track.insert(Segment {
                start: at.max(0.0),
                duration: duration.max(0.0),
                from,
                to,
                easing,
            });
            self.duration = self.duration.max(at.max(0.0) + duration.max(0.0));
        }
        self
    }

    pub fn add_label(&mut self, name: impl Into<String>, time: f32) -> &mut Self {
        self.labels.insert(name.into(), time);
        self
    }

    pub fn label(&self, name: &str) -> Option<f32> {
        self.labels.get(name).copied()
    }

    /// Labels in insertion order
    pub fn labels(&self) -> impl Iterator<Item = (&str, f32)> {
        self.labels.iter().map(|(name, time)| (name.as_str(), *time))
    }

    /// Remove every segment and label; targets stay registered
    pub fn clear(&mut self) {
        for (_, track) in self.tracks.iter_mut() {
            track.segments.clear();
        }
        self.labels.clear();
        self.tween = None;
        self.duration = 0.0;
    }

    fn recompute_duration(&mut self) {
        self.duration = self
            .tracks
            .iter()
            .map(|(_, track)| track.end())
            .fold(0.0, f32::max);
    }

    /// Current value of a target at the playhead
    pub fn sample(&self, id: TargetId) -> Option<f32> {
        let time = self.time();
        self.tracks.get(id).map(|track| track.sample(time))
    }

    // =========================================================================
    // Playhead
    // =========================================================================

    /// Length of one iteration
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Length of all iterations; infinite when repeating forever
    pub fn total_duration(&self) -> f32 {
        match self.repeat.extra_iterations() {
            Some(extra) => self.duration * (extra as f32 + 1.0),
            None => f32::INFINITY,
        }
    }

    /// Map any time into `[0, duration)`
    pub fn wrap_time(&self, time: f32) -> f32 {
        wrap(0.0, self.duration, time)
    }

    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    pub fn set_total_time(&mut self, total_time: f32) -> bool {
        let clamped = total_time.clamp(0.0, self.total_duration().max(0.0));
        let changed = clamped != self.total_time;
        self.total_time = clamped;
        changed
    }

    /// Playhead time within the current iteration
    pub fn time(&self) -> f32 {
        let d = self.duration;
        if d <= 0.0 {
            return 0.0;
        }
        match self.repeat {
            Repeat::Never => self.total_time.clamp(0.0, d),
            _ if self.total_time >= self.total_duration() => d,
            _ => wrap(0.0, d, self.total_time.max(0.0)),
        }
    }

    /// Seek within the current iteration
    ///
    /// Returns whether the playhead moved.
    pub fn set_time(&mut self, time: f32) -> bool {
        let d = self.duration;
        if d <= 0.0 {
            return self.set_total_time(0.0);
        }
        let local = time.clamp(0.0, d);
        let iteration = match self.repeat.extra_iterations() {
            Some(0) => 0.0,
            Some(extra) => (self.total_time / d).floor().clamp(0.0, extra as f32),
            None => (self.total_time / d).floor().max(0.0),
        };
        self.set_total_time(iteration * d + local)
    }

    /// Fraction of the current iteration, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            0.0
        } else {
            self.time() / self.duration
        }
    }

    pub fn set_progress(&mut self, progress: f32) -> bool {
        self.set_time(progress * self.duration)
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale.max(0.0);
    }

    // =========================================================================
    // Playback
    // =========================================================================

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Play forward from the current position
    pub fn play(&mut self) {
        self.reversed = false;
        self.paused = false;
    }

    /// Unpause, keeping the current direction
    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Play backward from the current position
    pub fn reverse(&mut self) {
        self.reversed = true;
        self.paused = false;
    }

    /// Jump forward by [`REWIND_CYCLES`] iterations, clamped to the total duration
    ///
    /// Keeps reversed playback from running out of room.
    pub fn rewind_cycles(&mut self) -> bool {
        self.set_total_time(self.total_time + self.duration * REWIND_CYCLES)
    }

    /// Whether ticking would move the playhead
    pub fn is_active(&self) -> bool {
        if self.tween.is_some() {
            return true;
        }
        if self.paused || self.duration <= 0.0 {
            return false;
        }
        if self.reversed {
            self.total_time > 0.0 || self.rewind_on_reverse_complete
        } else {
            self.total_time < self.total_duration()
        }
    }

    // =========================================================================
    // Playhead tweens
    // =========================================================================

    /// Pause and animate the playhead to `time`
    ///
    /// Overwrites any in-flight playhead tween. An immediate tween seeks right
    /// away and returns whether the playhead moved.
    pub fn tween_to(&mut self, time: f32, vars: TweenVars) -> bool {
        self.paused = true;
        let from = self.time();
        let scale = if self.time_scale > 0.0 { self.time_scale } else { 1.0 };
        let duration = vars
            .duration
            .unwrap_or_else(|| (time - from).abs() / scale);
        let easing = vars.easing.unwrap_or(self.default_easing);
        let tween = PlayheadTween::new(from, time, duration, easing, vars.wrap_time);

        if tween.is_done() {
            self.tween = None;
            return self.apply_tween_value(&tween);
        }

        tracing::trace!(
            "Timeline: tween playhead {:.3} -> {:.3} over {:.3}s (wrap={})",
            from,
            time,
            duration,
            vars.wrap_time
        );
        self.tween = Some(tween);
        false
    }

    pub fn active_tween(&self) -> Option<&PlayheadTween> {
        self.tween.as_ref()
    }

    pub fn is_tweening(&self) -> bool {
        self.tween.is_some()
    }

    pub fn kill_tweens(&mut self) {
        self.tween = None;
    }

    fn apply_tween_value(&mut self, tween: &PlayheadTween) -> bool {
        let value = tween.value();
        if tween.wraps_time() {
            self.set_time(self.wrap_time(value))
        } else {
            self.set_time(value)
        }
    }

    /// Advance by `dt` seconds
    ///
    /// A playhead tween, when present, drives the playhead instead of
    /// playback. Returns whether the playhead moved.
    pub fn tick(&mut self, dt: f32) -> bool {
        if let Some(mut tween) = self.tween.take() {
            tween.advance(dt);
            let moved = self.apply_tween_value(&tween);
            if !tween.is_done() {
                self.tween = Some(tween);
            }
            return moved;
        }

        if self.paused || self.duration <= 0.0 || dt <= 0.0 {
            return false;
        }

        let direction = if self.reversed { -1.0 } else { 1.0 };
        let mut total = self.total_time + dt * self.time_scale * direction;

        if self.reversed && total <= 0.0 {
            if self.rewind_on_reverse_complete {
                total += self.duration * REWIND_CYCLES;
            } else {
                total = 0.0;
            }
        }

        self.set_total_time(total)
    }
}
