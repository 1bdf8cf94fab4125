//! Carousel
//!
//! [`Carousel`] ties a [`LoopCore`] to its input sources: an optional drag
//! strategy fed from pointer events, and an optional viewport subscription
//! that triggers a deep refresh on resize. The owner calls
//! [`Carousel::tick`] once per frame.

use crate::config::LoopConfig;
use crate::drag::{DragBehavior, InertiaDrag};
use crate::error::Result;
use crate::geometry::LoopGeometry;
use crate::loop_core::{ChangeCallback, LoopCore};
use seamloop_animation::{Timeline, TweenVars};
use seamloop_core::{
    Element, PointerEvent, PointerPhase, ResizeSubscription, VelocityTracker, ViewportHandle,
};
use std::path::Path;

/// Builder for [`Carousel`]
pub struct CarouselBuilder<E: Element> {
    items: Vec<E>,
    container: E,
    config: LoopConfig,
    on_change: Option<ChangeCallback<E>>,
    drag: Option<Box<dyn DragBehavior>>,
    viewport: Option<ViewportHandle>,
}

impl<E: Element> CarouselBuilder<E> {
    pub fn config(mut self, config: LoopConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the config with one loaded from a TOML file
    pub fn config_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.config = LoopConfig::load(path)?;
        Ok(self)
    }

    /// Called with the active item whenever the resolved index changes
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&E, usize) + 'static,
    {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Use a custom drag strategy instead of [`InertiaDrag`]
    ///
    /// Only attached when the config is `draggable`.
    pub fn drag_behavior(mut self, behavior: impl DragBehavior + 'static) -> Self {
        self.drag = Some(Box::new(behavior));
        self
    }

    /// Rebuild whenever this viewport resizes
    pub fn viewport(mut self, handle: &ViewportHandle) -> Self {
        self.viewport = Some(handle.clone());
        self
    }

    pub fn build(self) -> Result<Carousel<E>> {
        let draggable = self.config.draggable;
        let drag_config = self.config.drag;
        let mut core = LoopCore::new(self.items, self.container, self.config, self.on_change)?;

        let drag = if draggable {
            Some(
                self.drag
                    .unwrap_or_else(|| Box::new(InertiaDrag::new(drag_config))),
            )
        } else {
            if self.drag.is_some() {
                tracing::debug!("Drag behavior ignored: carousel is not draggable");
            }
            None
        };
        core.set_drag_attached(drag.is_some());

        let resize = self.viewport.as_ref().and_then(ViewportHandle::subscribe);
        if self.viewport.is_some() && resize.is_none() {
            tracing::warn!("Viewport dropped before carousel was built; resize tracking disabled");
        }

        core.announce();
        tracing::debug!(
            "Carousel built: {} items, duration={:.3}s, draggable={}",
            core.len(),
            core.timeline().duration(),
            draggable
        );

        Ok(Carousel {
            core,
            drag,
            velocity: VelocityTracker::new(),
            pointer_down: false,
            resize,
        })
    }
}

/// A seamlessly looping horizontal carousel
pub struct Carousel<E: Element> {
    core: LoopCore<E>,
    drag: Option<Box<dyn DragBehavior>>,
    velocity: VelocityTracker,
    pointer_down: bool,
    resize: Option<ResizeSubscription>,
}

impl<E: Element> Carousel<E> {
    pub fn builder(items: Vec<E>, container: E) -> CarouselBuilder<E> {
        CarouselBuilder {
            items,
            container,
            config: LoopConfig::default(),
            on_change: None,
            drag: None,
            viewport: None,
        }
    }

    /// Build with `config` and no callbacks
    pub fn new(items: Vec<E>, container: E, config: LoopConfig) -> Result<Self> {
        Self::builder(items, container).config(config).build()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Navigate to `index` (wrapped) the short way around
    pub fn to_index(&mut self, index: isize, vars: TweenVars) {
        if let Some(drag) = self.drag.as_mut() {
            drag.cancel();
        }
        self.pointer_down = false;
        self.core.to_index(index, vars);
    }

    pub fn next(&mut self, vars: TweenVars) {
        let current = self.core.current() as isize;
        self.to_index(current + 1, vars);
    }

    pub fn previous(&mut self, vars: TweenVars) {
        let current = self.core.current() as isize;
        self.to_index(current - 1, vars);
    }

    /// Active index, resolved from the playhead after a drag
    pub fn current_index(&mut self) -> usize {
        self.core.current()
    }

    /// Index closest to the playhead right now
    pub fn closest_index(&mut self, set_current: bool) -> usize {
        self.core.closest_index(set_current)
    }

    // =========================================================================
    // Frame & input
    // =========================================================================

    /// Advance by `dt` seconds
    ///
    /// Handles a pending resize first, then the drag throw, then playback or
    /// navigation. Returns whether the playhead moved.
    pub fn tick(&mut self, dt: f32) -> bool {
        let resized = self
            .resize
            .as_ref()
            .is_some_and(ResizeSubscription::take_resized);
        if resized {
            self.core.refresh(true);
        }

        let mut moved = resized;
        if let Some(drag) = self.drag.as_mut() {
            moved |= drag.tick(&mut self.core, dt);
        }
        moved |= self.core.tick(dt);
        moved
    }

    /// Feed a pointer event to the drag strategy
    ///
    /// Ignored when the carousel is not draggable.
    pub fn pointer(&mut self, event: PointerEvent) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };

        match event.phase {
            PointerPhase::Press => {
                self.velocity.reset();
                self.velocity.add(event.time, event.x);
                self.pointer_down = true;
                drag.on_press(&mut self.core, event.x);
            }
            PointerPhase::Move if self.pointer_down => {
                self.velocity.add(event.time, event.x);
                drag.on_drag(&mut self.core, event.x);
            }
            PointerPhase::Release if self.pointer_down => {
                self.velocity.add(event.time, event.x);
                self.pointer_down = false;
                drag.on_drag(&mut self.core, event.x);
                drag.on_release(&mut self.core, self.velocity.velocity());
            }
            _ => {}
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(|drag| drag.is_dragging())
    }

    pub fn is_throwing(&self) -> bool {
        self.drag.as_ref().is_some_and(|drag| drag.is_throwing())
    }

    pub fn is_draggable(&self) -> bool {
        self.drag.is_some()
    }

    /// Re-measure after content changes; `deep` also rebuilds the timeline
    pub fn refresh(&mut self, deep: bool) {
        self.core.refresh(deep);
    }

    // =========================================================================
    // Playback
    // =========================================================================

    pub fn play(&mut self) {
        self.core.play();
    }

    pub fn pause(&mut self) {
        self.core.pause();
    }

    pub fn reverse(&mut self) {
        self.core.reverse();
    }

    pub fn is_playing(&self) -> bool {
        self.core.is_playing()
    }

    pub fn time(&self) -> f32 {
        self.core.time()
    }

    pub fn progress(&self) -> f32 {
        self.core.progress()
    }

    pub fn set_progress(&mut self, progress: f32) {
        self.core.set_progress(progress);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn len(&self) -> usize {
        self.core.len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }

    pub fn items(&self) -> &[E] {
        self.core.items()
    }

    pub fn items_mut(&mut self) -> &mut [E] {
        self.core.items_mut()
    }

    pub fn container_mut(&mut self) -> &mut E {
        self.core.container_mut()
    }

    pub fn timeline(&self) -> &Timeline {
        self.core.timeline()
    }

    pub fn times(&self) -> &[f32] {
        self.core.times()
    }

    pub fn geometry(&self) -> &LoopGeometry {
        self.core.geometry()
    }

    pub fn core(&self) -> &LoopCore<E> {
        &self.core
    }

    /// Stop tracking resizes and hand back the items
    pub fn destroy(self) -> Vec<E> {
        if let Some(subscription) = self.resize {
            subscription.dispose();
        }
        tracing::debug!("Carousel destroyed");
        self.core.into_items()
    }
}

impl<E: Element> std::fmt::Debug for Carousel<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Carousel")
            .field("core", &self.core)
            .field("draggable", &self.drag.is_some())
            .field("pointer_down", &self.pointer_down)
            .field("resize", &self.resize)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CarouselError, ConfigError};
    use seamloop_core::{BoxElement, Size, Viewport};

    fn draggable() -> LoopConfig {
        LoopConfig {
            paused: true,
            draggable: true,
            ..Default::default()
        }
    }

    fn carousel(config: LoopConfig) -> Carousel<BoxElement> {
        Carousel::new(
            BoxElement::row(5, 100.0, 0.0),
            BoxElement::new(0.0, 300.0),
            config,
        )
        .unwrap()
    }

    #[test]
    fn test_not_draggable_ignores_pointer() {
        let mut carousel = carousel(LoopConfig {
            paused: true,
            ..Default::default()
        });
        assert!(!carousel.is_draggable());

        carousel.pointer(PointerEvent::press(300.0, 0.0));
        carousel.pointer(PointerEvent::moved(100.0, 0.1));
        assert_eq!(carousel.progress(), 0.0);
        assert!(!carousel.is_dragging());
    }

    #[test]
    fn test_pointer_drives_drag() {
        let mut carousel = carousel(draggable());
        carousel.pointer(PointerEvent::press(300.0, 0.0));
        carousel.pointer(PointerEvent::moved(200.0, 0.05));
        assert!(carousel.is_dragging());
        assert!((carousel.time() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_navigation_interrupts_throw() {
        let mut carousel = carousel(draggable());
        carousel.pointer(PointerEvent::press(300.0, 0.0));
        carousel.pointer(PointerEvent::moved(150.0, 0.05));
        carousel.pointer(PointerEvent::release(100.0, 0.1));
        assert!(carousel.is_throwing());

        carousel.to_index(4, TweenVars::immediate());
        assert!(!carousel.is_throwing());
        assert!(!carousel.is_playing());
        assert_eq!(carousel.current_index(), 4);
        assert_eq!(carousel.time(), 4.0);
    }

    #[test]
    fn test_destroy_unsubscribes() {
        let viewport = Viewport::new(Size::new(300.0, 200.0));
        let items = BoxElement::row(3, 100.0, 0.0);
        let carousel = Carousel::builder(items, BoxElement::new(0.0, 300.0))
            .config(draggable())
            .viewport(&viewport.handle())
            .build()
            .unwrap();
        assert_eq!(viewport.subscriber_count(), 1);

        let items = carousel.destroy();
        assert_eq!(items.len(), 3);
        assert_eq!(viewport.subscriber_count(), 0);
    }

    #[test]
    fn test_playing_carousel_advances() {
        let mut carousel = carousel(LoopConfig::default());
        assert!(carousel.is_playing());
        assert!(carousel.tick(0.5));
        assert!((carousel.time() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_config_file_missing_is_config_error() {
        let result = Carousel::builder(BoxElement::row(3, 100.0, 0.0), BoxElement::new(0.0, 300.0))
            .config_file("/nonexistent/seamloop/carousel.toml");
        assert!(matches!(
            result,
            Err(CarouselError::Config(ConfigError::Io { .. }))
        ));
    }

    #[test]
    fn test_config_file_is_applied() {
        let name = format!("seamloop-config-{}.toml", std::process::id());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, "paused = true\nspeed = 2.0\n").unwrap();

        let items = BoxElement::row(5, 100.0, 0.0);
        let carousel = Carousel::builder(items, BoxElement::new(0.0, 300.0))
            .config_file(&path)
            .unwrap()
            .build()
            .unwrap();
        std::fs::remove_file(&path).ok();

        assert!(!carousel.is_playing());
        assert!((carousel.timeline().duration() - 2.5).abs() < 1e-5);
    }
}
