//! Loop core
//!
//! Owns the items, the timeline built over them and the index bookkeeping.
//! Every playhead movement funnels through [`LoopCore::after_playhead_change`],
//! which writes the sampled translation to each item and, unless the
//! movement is a silent re-seat, reports label crossings to `on_change`.
//!
//! # Timeline layout
//!
//! Item `i` gets two segments on its track:
//!
//! 1. from time 0, slide from its canonical translation to just past the
//!    container's leading edge (`distance_to_loop`)
//! 2. at `distance_to_loop / pps`, jump one full cycle to the far end and
//!    slide back to canonical for the rest of the cycle
//!
//! The label `label{i}` marks `distance_to_start / pps`, the moment item `i`
//! reaches the leading edge.

use crate::config::LoopConfig;
use crate::error::{CarouselError, Result};
use crate::geometry::LoopGeometry;
use seamloop_animation::{
    wrap, wrap_index, Easing, TargetId, Timeline, TimelineOptions, TweenVars,
};
use seamloop_core::Element;

/// Called with the newly active item and its index
pub type ChangeCallback<E> = Box<dyn FnMut(&E, usize)>;

/// Index of the value circularly closest to `value` on a cycle of length `cycle`
///
/// Scans from the highest index down and keeps the first strictly smaller
/// distance, so equidistant candidates resolve to the highest index.
pub fn closest_label(values: &[f32], value: f32, cycle: f32) -> usize {
    let mut closest = f32::INFINITY;
    let mut index = 0;
    for (i, candidate) in values.iter().enumerate().rev() {
        let mut distance = (candidate - value).abs();
        if distance > cycle / 2.0 {
            distance = cycle - distance;
        }
        if distance < closest {
            closest = distance;
            index = i;
        }
    }
    index
}

fn label_name(index: usize) -> String {
    format!("label{}", index)
}

/// Items, timeline and index state of one carousel
pub struct LoopCore<E: Element> {
    items: Vec<E>,
    container: E,
    config: LoopConfig,
    timeline: Timeline,
    targets: Vec<TargetId>,
    geometry: LoopGeometry,
    start_x: f32,
    times: Vec<f32>,
    time_offset: f32,
    current: usize,
    index_dirty: bool,
    last_index: usize,
    drag_attached: bool,
    on_change: Option<ChangeCallback<E>>,
}

impl<E: Element> LoopCore<E> {
    /// Measure, build the timeline and pre-render
    ///
    /// Does not announce the initial item; see [`LoopCore::announce`].
    pub fn new(
        mut items: Vec<E>,
        container: E,
        config: LoopConfig,
        on_change: Option<ChangeCallback<E>>,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(CarouselError::NoItems);
        }

        let mut timeline = Timeline::new(TimelineOptions {
            paused: config.paused,
            reversed: false,
            repeat: config.repeat,
            default_easing: config.default_ease,
            rewind_on_reverse_complete: true,
        });

        for item in items.iter_mut() {
            item.set_translate_x(0.0);
        }
        let targets = items
            .iter()
            .map(|item| timeline.add_target(item.x_percent()))
            .collect();
        let start_x = items[0].offset_left();

        let mut core = Self {
            items,
            container,
            config,
            timeline,
            targets,
            geometry: LoopGeometry::default(),
            start_x,
            times: Vec::new(),
            time_offset: 0.0,
            current: 0,
            index_dirty: false,
            last_index: 0,
            drag_attached: false,
            on_change,
        };

        core.populate_widths();
        core.populate_timeline();
        core.populate_offsets();

        // Pre-render both ends so the first visible frame is already laid out
        core.timeline.set_progress(1.0);
        core.timeline.set_progress(0.0);
        core.render();

        if core.config.reversed {
            core.timeline.rewind_cycles();
            core.timeline.reverse();
            core.render();
        }

        Ok(core)
    }

    /// Resolve the starting item and report it once
    pub fn announce(&mut self) {
        self.closest_index(true);
        self.last_index = self.current;
        let index = self.current;
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.items[index], index);
        }
    }

    pub(crate) fn set_drag_attached(&mut self, attached: bool) {
        self.drag_attached = attached;
    }

    /// Tear down, handing back the items
    pub fn into_items(self) -> Vec<E> {
        self.items
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    /// Mutable access for hosts that change item layout
    ///
    /// Call [`LoopCore::refresh`] afterwards so the loop picks up the change.
    pub fn items_mut(&mut self) -> &mut [E] {
        &mut self.items
    }

    pub fn container(&self) -> &E {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut E {
        &mut self.container
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn geometry(&self) -> &LoopGeometry {
        &self.geometry
    }

    /// Label time of each item, after any centring offset
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    pub fn total_width(&self) -> f32 {
        self.geometry.total_width
    }

    pub fn time_offset(&self) -> f32 {
        self.time_offset
    }

    pub fn is_index_dirty(&self) -> bool {
        self.index_dirty
    }

    // =========================================================================
    // Build passes
    // =========================================================================

    fn populate_widths(&mut self) {
        self.geometry = LoopGeometry::measure(
            &mut self.items,
            &self.container,
            self.config.snap,
            self.config.padding_right,
            self.start_x,
        );
    }

    fn populate_timeline(&mut self) {
        let pps = self.config.pixels_per_second();
        let snap = self.config.snap;
        let total = self.geometry.total_width;
        let gap0 = self.geometry.space_before[0];

        self.timeline.clear();
        self.times.clear();

        for (i, item) in self.items.iter().enumerate() {
            let target = self.targets[i];
            let width = self.geometry.widths[i];
            let x_percent = self.geometry.x_percents[i];
            let cur_x = x_percent / 100.0 * width;
            let distance_to_start = item.offset_left() + cur_x - self.start_x + gap0;
            let distance_to_loop = distance_to_start + width * item.scale_x();

            let wrapped_out = snap.apply((cur_x - distance_to_loop) / width * 100.0);
            let wrapped_in = snap.apply((cur_x - distance_to_loop + total) / width * 100.0);
            let loop_time = distance_to_loop / pps;

            self.timeline
                .from_to(target, x_percent, wrapped_out, loop_time, 0.0)
                .from_to(
                    target,
                    wrapped_in,
                    x_percent,
                    (total - distance_to_loop) / pps,
                    loop_time,
                )
                .add_label(label_name(i), distance_to_start / pps);
            self.times.push(distance_to_start / pps);
        }

        tracing::debug!(
            "Built loop timeline: {} items, duration={:.3}s",
            self.items.len(),
            self.timeline.duration()
        );
    }

    fn populate_offsets(&mut self) {
        let duration = self.timeline.duration();
        let total = self.geometry.total_width;
        if !self.config.center {
            self.time_offset = 0.0;
            return;
        }

        self.time_offset = duration * (self.geometry.container_width / 2.0) / total;
        for i in 0..self.times.len() {
            let label = self.timeline.label(&label_name(i)).unwrap_or(self.times[i]);
            let half_item = duration * self.geometry.widths[i] / 2.0 / total;
            let centred = label + half_item - self.time_offset;
            self.times[i] = self.timeline.wrap_time(centred);
        }
    }

    /// Re-measure and re-seat the playhead
    ///
    /// A deep refresh also rebuilds the timeline. With a drag capability the
    /// playhead returns to the active item's label; otherwise raw progress is
    /// kept.
    pub fn refresh(&mut self, deep: bool) {
        let progress = self.timeline.progress();
        // A rebuild clears the timeline, and with it any navigation tween
        let navigation = self.timeline.active_tween().copied();
        self.timeline.set_progress(0.0);
        self.render();

        self.populate_widths();
        if deep {
            self.populate_timeline();
        }
        self.populate_offsets();

        if deep && self.drag_attached {
            let time = self.times[self.current];
            self.timeline.set_time(time);
        } else {
            self.timeline.set_progress(progress);
            if deep {
                if let Some(tween) = navigation {
                    self.resume_navigation(tween.remaining(), tween.easing());
                }
            }
        }
        self.after_playhead_change(false);

        tracing::debug!(
            "Refreshed loop (deep={}): total_width={:.1} time={:.3}",
            deep,
            self.geometry.total_width,
            self.timeline.time()
        );
    }

    /// Finish a navigation interrupted by a rebuild, heading for the
    /// current item's new label the short way round
    fn resume_navigation(&mut self, remaining: f32, easing: Easing) {
        let duration = self.timeline.duration();
        let now = self.timeline.time();
        let mut time = self.times[self.current];
        if time - now > duration / 2.0 {
            time -= duration;
        } else if now - time > duration / 2.0 {
            time += duration;
        }

        let vars = TweenVars {
            duration: Some(remaining),
            easing: Some(easing),
            wrap_time: time < 0.0 || time > duration,
        };
        tracing::debug!(
            "Resuming navigation to {} at time {:.3} over {:.3}s",
            self.current,
            time,
            remaining
        );
        self.timeline.tween_to(time, vars);
    }

    // =========================================================================
    // Index resolution
    // =========================================================================

    /// Item whose label is circularly closest to the playhead
    ///
    /// With `set_current`, also adopts it as the current index and clears
    /// the dirty flag.
    pub fn closest_index(&mut self, set_current: bool) -> usize {
        let index = closest_label(&self.times, self.timeline.time(), self.timeline.duration());
        if set_current {
            self.current = index;
            self.index_dirty = false;
        }
        index
    }

    /// The current index, resolved from the playhead if a drag left it dirty
    pub fn current(&mut self) -> usize {
        if self.index_dirty {
            self.closest_index(true)
        } else {
            self.current
        }
    }

    pub fn mark_index_dirty(&mut self) {
        self.index_dirty = true;
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Move the playhead to `index`'s label along the shorter direction
    pub fn to_index(&mut self, index: isize, vars: TweenVars) {
        let len = self.items.len() as isize;
        let current = self.current as isize;
        let mut index = index;
        if 2 * (index - current).abs() > len {
            index += if index > current { -len } else { len };
        }

        let new_index = wrap_index(self.items.len(), index);
        let duration = self.timeline.duration();
        let mut time = self.times[new_index];
        if (time > self.timeline.time()) != (index > current) && index != current {
            // Crossing the seam: keep travelling in the requested direction
            time += duration * if index > current { 1.0 } else { -1.0 };
        }

        let mut vars = vars;
        if time < 0.0 || time > duration {
            vars.wrap_time = true;
        }
        self.current = new_index;

        tracing::debug!(
            "to_index({}) -> {} at time {:.3} (wrap={})",
            index,
            new_index,
            time,
            vars.wrap_time
        );

        if vars.is_immediate() {
            let wrapped = wrap(0.0, duration, time);
            self.timeline.kill_tweens();
            self.timeline.set_time(wrapped);
            self.after_playhead_change(true);
        } else if self.timeline.tween_to(time, vars) {
            self.after_playhead_change(true);
        }
    }

    pub fn next(&mut self, vars: TweenVars) {
        let current = self.current() as isize;
        self.to_index(current + 1, vars);
    }

    pub fn previous(&mut self, vars: TweenVars) {
        let current = self.current() as isize;
        self.to_index(current - 1, vars);
    }

    // =========================================================================
    // Playback
    // =========================================================================

    pub fn is_playing(&self) -> bool {
        !self.timeline.is_paused()
    }

    pub fn play(&mut self) {
        self.timeline.play();
    }

    pub fn resume(&mut self) {
        self.timeline.resume();
    }

    pub fn pause(&mut self) {
        self.timeline.pause();
    }

    pub fn reverse(&mut self) {
        self.timeline.reverse();
    }

    pub fn kill_tweens(&mut self) {
        self.timeline.kill_tweens();
    }

    pub fn progress(&self) -> f32 {
        self.timeline.progress()
    }

    pub fn set_progress(&mut self, progress: f32) {
        if self.timeline.set_progress(progress) {
            self.after_playhead_change(true);
        }
    }

    pub fn time(&self) -> f32 {
        self.timeline.time()
    }

    /// Advance playback or the in-flight navigation tween
    pub fn tick(&mut self, dt: f32) -> bool {
        let moved = self.timeline.tick(dt);
        if moved {
            self.after_playhead_change(true);
        }
        moved
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Write every item's sampled translation
    pub fn render(&mut self) {
        for (item, target) in self.items.iter_mut().zip(&self.targets) {
            if let Some(x_percent) = self.timeline.sample(*target) {
                item.set_x_percent(x_percent);
            }
        }
    }

    /// Render, then report a label crossing unless `notify` is false
    pub fn after_playhead_change(&mut self, notify: bool) {
        self.render();
        if !notify || self.on_change.is_none() {
            return;
        }

        let index = self.closest_index(false);
        if index != self.last_index {
            tracing::trace!("Active item {} -> {}", self.last_index, index);
            self.last_index = index;
            if let Some(callback) = self.on_change.as_mut() {
                callback(&self.items[index], index);
            }
        }
    }
}

impl<E: Element> std::fmt::Debug for LoopCore<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopCore")
            .field("len", &self.items.len())
            .field("current", &self.current)
            .field("index_dirty", &self.index_dirty)
            .field("time", &self.timeline.time())
            .field("duration", &self.timeline.duration())
            .field("times", &self.times)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Snap;
    use seamloop_core::BoxElement;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn paused() -> LoopConfig {
        LoopConfig {
            paused: true,
            ..Default::default()
        }
    }

    fn core(count: usize, config: LoopConfig) -> LoopCore<BoxElement> {
        let items = BoxElement::row(count, 100.0, 0.0);
        let container = BoxElement::new(0.0, 300.0);
        LoopCore::new(items, container, config, None).unwrap()
    }

    fn settle(core: &mut LoopCore<BoxElement>) {
        for _ in 0..600 {
            if !core.timeline().is_tweening() {
                break;
            }
            core.tick(1.0 / 60.0);
        }
    }

    #[test]
    fn test_empty_items_rejected() {
        let result = LoopCore::new(Vec::new(), BoxElement::new(0.0, 300.0), paused(), None);
        assert!(matches!(result, Err(CarouselError::NoItems)));
    }

    #[test]
    fn test_labels_and_duration() {
        let core = core(5, paused());
        assert_eq!(core.times(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(core.timeline().duration(), 5.0);
        assert_eq!(core.timeline().label("label3"), Some(3.0));
    }

    #[test]
    fn test_speed_scales_duration() {
        let core = core(
            4,
            LoopConfig {
                speed: 2.0,
                ..paused()
            },
        );
        assert_eq!(core.timeline().duration(), 2.0);
        assert_eq!(core.times()[1], 0.5);
    }

    #[test]
    fn test_items_follow_playhead() {
        let mut core = core(5, paused());
        core.set_progress(0.2);
        // One item width travelled: item 1 sits at the leading edge
        assert_eq!(core.items()[1].bounding_rect().left(), 0.0);
        // Item 0 has wrapped to the far end
        assert_eq!(core.items()[0].bounding_rect().left(), 400.0);
    }

    #[test]
    fn test_closest_label_wraps() {
        let times = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(closest_label(&times, 4.8, 5.0), 0);
        assert_eq!(closest_label(&times, 2.4, 5.0), 2);
        assert_eq!(closest_label(&times, 3.6, 5.0), 4);
    }

    #[test]
    fn test_closest_label_ties_take_highest_index() {
        let times = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(closest_label(&times, 1.5, 5.0), 2);
        assert_eq!(closest_label(&times, 4.5, 5.0), 4);
    }

    #[test]
    fn test_next_previous_wrap() {
        let mut core = core(5, paused());
        core.previous(TweenVars::default());
        settle(&mut core);
        assert_eq!(core.current(), 4);
        assert_eq!(core.closest_index(false), 4);

        core.next(TweenVars::default());
        settle(&mut core);
        assert_eq!(core.current(), 0);
        assert_eq!(core.closest_index(false), 0);
    }

    #[test]
    fn test_immediate_jump() {
        let mut core = core(5, paused());
        core.to_index(3, TweenVars::immediate());
        assert_eq!(core.time(), 3.0);
        assert!(!core.timeline().is_tweening());
    }

    #[test]
    fn test_to_index_takes_short_way_back() {
        let mut core = core(5, paused());
        core.to_index(2, TweenVars::immediate());
        core.to_index(0, TweenVars::default());
        let tween = core.timeline().active_tween().copied().unwrap();
        assert_eq!(tween.to(), 0.0);
        assert!(!tween.wraps_time());
    }

    #[test]
    fn test_backward_seam_crossing_wraps() {
        let mut core = core(5, paused());
        core.to_index(-1, TweenVars::default());
        let tween = core.timeline().active_tween().copied().unwrap();
        assert_eq!(tween.to(), -1.0);
        assert!(tween.wraps_time());

        settle(&mut core);
        assert!((core.time() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_center_offsets_labels() {
        let core = core(
            5,
            LoopConfig {
                center: true,
                ..paused()
            },
        );
        // Half the container (150px) minus half an item (50px) earlier
        assert_eq!(core.time_offset(), 1.5);
        let expected = [4.0, 0.0, 1.0, 2.0, 3.0];
        for (time, want) in core.times().iter().zip(expected) {
            assert!((time - want).abs() < 1e-4, "{time} vs {want}");
        }
    }

    #[test]
    fn test_on_change_reports_crossings() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let items = BoxElement::row(5, 100.0, 0.0);
        let mut core = LoopCore::new(
            items,
            BoxElement::new(0.0, 300.0),
            LoopConfig::default(),
            Some(Box::new(move |_: &BoxElement, i: usize| {
                log.borrow_mut().push(i)
            })),
        )
        .unwrap();
        core.announce();

        for _ in 0..130 {
            core.tick(1.0 / 60.0);
        }
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_snap_disabled_keeps_fractions() {
        let items = vec![
            BoxElement::new(0.0, 120.0),
            BoxElement::new(120.0, 130.0),
            BoxElement::new(250.0, 110.0),
        ];
        let core = LoopCore::new(
            items,
            BoxElement::new(0.0, 300.0),
            LoopConfig {
                snap: Snap::Off,
                ..paused()
            },
            None,
        )
        .unwrap();
        let segment = core.timeline().track(core.targets[0]).unwrap().segments()[0];
        assert!((segment.to - (-100.0)).abs() < 1e-4);
        assert_eq!(core.total_width(), 360.0);
    }
}
