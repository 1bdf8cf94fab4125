//! Drag interaction
//!
//! A drag moves a virtual proxy coordinate. The proxy starts at
//! `start_progress / -ratio`, so dragging left by the full content extent
//! advances progress by exactly one cycle. On release the proxy is thrown
//! with the release velocity and its resting point is snapped so the
//! playhead lands on the nearest item label.
//!
//! The loop is driven through [`LoopControl`] and the gesture strategy is a
//! [`DragBehavior`], so hosts can swap in their own gesture handling.

use crate::config::DragConfig;
use crate::loop_core::{closest_label, LoopCore};
use seamloop_animation::{wrap, Throw};
use seamloop_core::Element;

/// The loop operations a drag strategy may use
pub trait LoopControl {
    fn total_width(&self) -> f32;
    fn duration(&self) -> f32;
    fn progress(&self) -> f32;
    /// Seek, rendering items and reporting index changes
    fn set_progress(&mut self, progress: f32);
    /// Label time of each item
    fn label_times(&self) -> &[f32];
    fn is_playing(&self) -> bool;
    fn pause(&mut self);
    fn resume(&mut self);
    fn kill_tweens(&mut self);
    fn refresh(&mut self, deep: bool);
    /// Adopt the index closest to the playhead and return it
    fn sync_index(&mut self) -> usize;
    fn mark_index_dirty(&mut self);
}

impl<E: Element> LoopControl for LoopCore<E> {
    fn total_width(&self) -> f32 {
        LoopCore::total_width(self)
    }

    fn duration(&self) -> f32 {
        self.timeline().duration()
    }

    fn progress(&self) -> f32 {
        LoopCore::progress(self)
    }

    fn set_progress(&mut self, progress: f32) {
        LoopCore::set_progress(self, progress);
    }

    fn label_times(&self) -> &[f32] {
        self.times()
    }

    fn is_playing(&self) -> bool {
        LoopCore::is_playing(self)
    }

    fn pause(&mut self) {
        LoopCore::pause(self);
    }

    fn resume(&mut self) {
        LoopCore::resume(self);
    }

    fn kill_tweens(&mut self) {
        LoopCore::kill_tweens(self);
    }

    fn refresh(&mut self, deep: bool) {
        LoopCore::refresh(self, deep);
    }

    fn sync_index(&mut self) -> usize {
        self.closest_index(true)
    }

    fn mark_index_dirty(&mut self) {
        LoopCore::mark_index_dirty(self);
    }
}

/// A pointer gesture strategy
pub trait DragBehavior {
    /// Pointer went down at `x`
    fn on_press(&mut self, control: &mut dyn LoopControl, x: f32);
    /// Pointer moved to `x`
    fn on_drag(&mut self, control: &mut dyn LoopControl, x: f32);
    /// Pointer went up with a horizontal velocity in px/s
    fn on_release(&mut self, control: &mut dyn LoopControl, velocity: f32);
    /// Advance any in-flight throw; returns whether the playhead moved
    fn tick(&mut self, control: &mut dyn LoopControl, dt: f32) -> bool;
    /// Abandon the gesture without resuming playback
    fn cancel(&mut self);
    fn is_dragging(&self) -> bool;
    fn is_throwing(&self) -> bool;
}

/// Maps a proposed proxy resting point to the one the throw should use
pub type SnapFn = Box<dyn Fn(&dyn LoopControl, &DragSession, f32) -> f32>;

/// Called with the settled index once a gesture completes
pub type CompleteFn = Box<dyn FnMut(usize)>;

/// State captured at press time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub start_progress: f32,
    /// Progress per pixel of proxy movement
    pub ratio: f32,
    /// Proxy position at press
    pub start_x: f32,
    pub pointer_start: f32,
    /// Current proxy position
    pub x: f32,
    pub last_snap: f32,
    pub was_playing: bool,
}

impl DragSession {
    /// Progress for the current proxy position, wrapped into `[0, 1)`
    pub fn aligned_progress(&self) -> f32 {
        wrap(0.0, 1.0, self.start_progress + (self.start_x - self.x) * self.ratio)
    }

    pub fn distance(&self) -> f32 {
        (self.x - self.start_x).abs()
    }
}

/// Snap a proxy position so the playhead rests on the closest label
///
/// Travels the shorter way around the cycle to reach it.
pub fn snap_to_label(control: &dyn LoopControl, session: &DragSession, value: f32) -> f32 {
    let duration = control.duration();
    if duration <= 0.0 || session.ratio <= 0.0 {
        return value;
    }
    let time = -(value * session.ratio) * duration;
    let wrapped = wrap(0.0, duration, time);
    let times = control.label_times();
    let snap_time = times[closest_label(times, wrapped, duration)];
    let mut dif = snap_time - wrapped;
    if dif.abs() > duration / 2.0 {
        dif += if dif < 0.0 { duration } else { -duration };
    }
    (time + dif) / duration / -session.ratio
}

/// Drag with momentum, settling on the nearest label
pub struct InertiaDrag {
    config: DragConfig,
    session: Option<DragSession>,
    dragging: bool,
    throw: Option<Throw>,
    snap: Option<SnapFn>,
    on_complete: Option<CompleteFn>,
}

impl InertiaDrag {
    pub fn new(config: DragConfig) -> Self {
        if !config.inertia {
            tracing::warn!("Inertia disabled: drag releases will snap immediately");
        }
        Self {
            config,
            session: None,
            dragging: false,
            throw: None,
            snap: None,
            on_complete: None,
        }
    }

    /// Replace the label snapping with a custom resting-point function
    pub fn with_snap<F>(mut self, snap: F) -> Self
    where
        F: Fn(&dyn LoopControl, &DragSession, f32) -> f32 + 'static,
    {
        self.snap = Some(Box::new(snap));
        self
    }

    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnMut(usize) + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn throw(&self) -> Option<&Throw> {
        self.throw.as_ref()
    }

    fn snapped(&self, control: &dyn LoopControl, session: &DragSession, value: f32) -> f32 {
        match &self.snap {
            Some(snap) => snap(control, session, value),
            None => snap_to_label(control, session, value),
        }
    }

    fn align(session: &DragSession, control: &mut dyn LoopControl) {
        control.set_progress(session.aligned_progress());
    }

    fn complete(&mut self, control: &mut dyn LoopControl) {
        self.throw = None;
        self.dragging = false;
        let index = control.sync_index();
        if let Some(session) = self.session.take() {
            if session.was_playing {
                control.resume();
            }
        }
        tracing::debug!("Drag settled on index {}", index);
        if let Some(callback) = self.on_complete.as_mut() {
            callback(index);
        }
    }
}

impl DragBehavior for InertiaDrag {
    fn on_press(&mut self, control: &mut dyn LoopControl, x: f32) {
        // Pressing during a throw inherits the playing state it would have restored
        let interrupted = self
            .throw
            .take()
            .and(self.session.as_ref())
            .map(|session| session.was_playing);

        let total_width = control.total_width();
        if total_width <= 0.0 || control.duration() <= 0.0 {
            self.session = None;
            return;
        }

        control.kill_tweens();
        let was_playing = interrupted.unwrap_or_else(|| control.is_playing());
        control.pause();
        let start_progress = control.progress();
        control.refresh(false);
        control.mark_index_dirty();

        let ratio = 1.0 / total_width;
        let start_x = start_progress / -ratio;
        self.session = Some(DragSession {
            start_progress,
            ratio,
            start_x,
            pointer_start: x,
            x: start_x,
            last_snap: start_x,
            was_playing,
        });
        self.dragging = true;
        tracing::trace!("Drag press at {:.1}, progress={:.4}", x, start_progress);
    }

    fn on_drag(&mut self, control: &mut dyn LoopControl, x: f32) {
        if !self.dragging {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.x = session.start_x + (x - session.pointer_start);
        Self::align(session, control);
    }

    fn on_release(&mut self, control: &mut dyn LoopControl, velocity: f32) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        let Some(mut session) = self.session else {
            return;
        };

        if session.distance() < self.config.click_threshold {
            session.x = session.start_x;
            Self::align(&session, control);
            self.session = Some(session);
            self.complete(control);
            return;
        }

        let throw = if self.config.inertia {
            Throw::launch(&self.config.throw, session.x, velocity, |natural| {
                self.snapped(&*control, &session, natural)
            })
        } else {
            Throw::new(session.x, self.snapped(&*control, &session, session.x), 0.0)
        };
        session.last_snap = throw.end();
        self.session = Some(session);

        control.sync_index();
        if throw.is_settled() {
            session.x = throw.end();
            Self::align(&session, control);
            self.session = Some(session);
            self.complete(control);
        } else {
            control.mark_index_dirty();
            self.throw = Some(throw);
        }
    }

    fn tick(&mut self, control: &mut dyn LoopControl, dt: f32) -> bool {
        let Some(throw) = self.throw.as_mut() else {
            return false;
        };
        throw.step(dt);
        let x = throw.value();
        let settled = throw.is_settled();

        if let Some(session) = self.session.as_mut() {
            session.x = x;
            Self::align(session, control);
        }
        if settled {
            self.complete(control);
        }
        true
    }

    fn cancel(&mut self) {
        if self.throw.take().is_some() {
            tracing::trace!("Drag throw interrupted");
        }
        self.session = None;
        self.dragging = false;
    }

    fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn is_throwing(&self) -> bool {
        self.throw.is_some()
    }
}

impl std::fmt::Debug for InertiaDrag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InertiaDrag")
            .field("config", &self.config)
            .field("session", &self.session)
            .field("dragging", &self.dragging)
            .field("throw", &self.throw)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Five 100px items over a 5s cycle
    struct FakeLoop {
        progress: f32,
        times: Vec<f32>,
        playing: bool,
        refreshes: usize,
        dirty: bool,
    }

    impl FakeLoop {
        fn new() -> Self {
            Self {
                progress: 0.0,
                times: vec![0.0, 1.0, 2.0, 3.0, 4.0],
                playing: false,
                refreshes: 0,
                dirty: false,
            }
        }

        fn time(&self) -> f32 {
            self.progress * 5.0
        }
    }

    impl LoopControl for FakeLoop {
        fn total_width(&self) -> f32 {
            500.0
        }
        fn duration(&self) -> f32 {
            5.0
        }
        fn progress(&self) -> f32 {
            self.progress
        }
        fn set_progress(&mut self, progress: f32) {
            self.progress = progress;
        }
        fn label_times(&self) -> &[f32] {
            &self.times
        }
        fn is_playing(&self) -> bool {
            self.playing
        }
        fn pause(&mut self) {
            self.playing = false;
        }
        fn resume(&mut self) {
            self.playing = true;
        }
        fn kill_tweens(&mut self) {}
        fn refresh(&mut self, _deep: bool) {
            self.refreshes += 1;
        }
        fn sync_index(&mut self) -> usize {
            self.dirty = false;
            closest_label(&self.times, self.time(), 5.0)
        }
        fn mark_index_dirty(&mut self) {
            self.dirty = true;
        }
    }

    fn settle(drag: &mut InertiaDrag, control: &mut FakeLoop) {
        for _ in 0..600 {
            if !drag.tick(control, 1.0 / 60.0) {
                break;
            }
        }
    }

    #[test]
    fn test_drag_maps_pixels_to_progress() {
        let mut control = FakeLoop::new();
        let mut drag = InertiaDrag::new(DragConfig::default());

        drag.on_press(&mut control, 300.0);
        assert!(drag.is_dragging());
        assert!(control.dirty);
        assert_eq!(control.refreshes, 1);

        drag.on_drag(&mut control, 200.0);
        assert!((control.progress - 0.2).abs() < 1e-5);

        // Dragging right past the start wraps backwards
        drag.on_drag(&mut control, 350.0);
        assert!((control.progress - 0.9).abs() < 1e-5);
    }

    #[test]
    fn test_release_snaps_to_nearest_label() {
        let mut control = FakeLoop::new();
        let mut drag = InertiaDrag::new(DragConfig::default());

        drag.on_press(&mut control, 300.0);
        drag.on_drag(&mut control, 60.0);
        drag.on_release(&mut control, 0.0);
        assert!(drag.is_throwing());
        assert!(control.dirty);

        let throw = *drag.throw().unwrap();
        assert!((throw.start() - -240.0).abs() < 1e-3);
        assert!((throw.end() - -200.0).abs() < 1e-3);

        settle(&mut drag, &mut control);
        assert!(!drag.is_throwing());
        assert!((control.time() - 2.0).abs() < 1e-4);
        assert!(!control.dirty);
    }

    #[test]
    fn test_snap_takes_short_way_across_seam() {
        let control = FakeLoop::new();
        let session = DragSession {
            start_progress: 0.0,
            ratio: 1.0 / 500.0,
            start_x: 0.0,
            pointer_start: 0.0,
            x: 0.0,
            last_snap: 0.0,
            was_playing: false,
        };
        // Proxy at -480px is time 4.8, nearest label is 0 one cycle on
        let snapped = snap_to_label(&control, &session, -480.0);
        assert!((snapped - -500.0).abs() < 1e-3);
    }

    #[test]
    fn test_click_does_not_throw() {
        let mut control = FakeLoop::new();
        control.progress = 0.4;
        let mut drag = InertiaDrag::new(DragConfig::default());

        drag.on_press(&mut control, 100.0);
        drag.on_drag(&mut control, 96.0);
        drag.on_release(&mut control, -800.0);

        assert!(!drag.is_throwing());
        assert!(!drag.is_dragging());
        assert!((control.progress - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_playback_resumes_after_throw() {
        let mut control = FakeLoop::new();
        control.playing = true;
        let completed = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&completed);
        let mut drag = InertiaDrag::new(DragConfig::default())
            .on_complete(move |index| log.borrow_mut().push(index));

        drag.on_press(&mut control, 300.0);
        assert!(!control.playing);
        drag.on_drag(&mut control, 150.0);
        drag.on_release(&mut control, -600.0);
        assert!(!control.playing);

        settle(&mut drag, &mut control);
        assert!(control.playing);
        assert_eq!(completed.borrow().len(), 1);
    }

    #[test]
    fn test_press_during_throw_keeps_resume() {
        let mut control = FakeLoop::new();
        control.playing = true;
        let mut drag = InertiaDrag::new(DragConfig::default());

        drag.on_press(&mut control, 300.0);
        drag.on_drag(&mut control, 100.0);
        drag.on_release(&mut control, -900.0);
        drag.tick(&mut control, 0.05);

        drag.on_press(&mut control, 100.0);
        assert!(!drag.is_throwing());
        drag.on_release(&mut control, 0.0);
        assert!(control.playing);
    }

    #[test]
    fn test_without_inertia_release_settles_at_once() {
        let mut control = FakeLoop::new();
        let mut drag = InertiaDrag::new(DragConfig {
            inertia: false,
            ..Default::default()
        });

        drag.on_press(&mut control, 300.0);
        drag.on_drag(&mut control, 160.0);
        drag.on_release(&mut control, -2000.0);

        assert!(!drag.is_throwing());
        assert!((control.time() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_custom_snap() {
        let mut control = FakeLoop::new();
        let mut drag = InertiaDrag::new(DragConfig::default())
            .with_snap(|_, session, _| session.start_x);

        drag.on_press(&mut control, 300.0);
        drag.on_drag(&mut control, 100.0);
        drag.on_release(&mut control, 0.0);
        settle(&mut drag, &mut control);

        assert!(control.progress.abs() < 1e-5);
    }
}
