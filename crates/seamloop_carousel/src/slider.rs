//! Slider binding
//!
//! A paused, draggable carousel whose highlighted slide sits one place after
//! the item at the leading edge. Clicking a slide brings it into that
//! highlighted position, and the arrow buttons step with a fixed ease.

use crate::carousel::Carousel;
use crate::config::LoopConfig;
use crate::error::Result;
use seamloop_animation::{Easing, TweenVars};
use seamloop_core::{Element, PointerEvent, ViewportHandle};
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

/// Duration of button and click navigation, in seconds
pub const NAVIGATION_DURATION: f32 = 0.725;

/// Easing of button and click navigation (`power3.out`)
pub const NAVIGATION_EASING: Easing = Easing::QuartOut;

pub struct Slider<E: Element> {
    carousel: Carousel<E>,
    active: Rc<Cell<usize>>,
}

impl<E: Element> Slider<E> {
    pub fn new(items: Vec<E>, container: E) -> Result<Self> {
        Self::with_config(items, container, LoopConfig::default(), None)
    }

    /// Build from a TOML config file, see [`Slider::with_config`]
    pub fn from_config_file(
        items: Vec<E>,
        container: E,
        path: impl AsRef<Path>,
        viewport: Option<&ViewportHandle>,
    ) -> Result<Self> {
        let config = LoopConfig::load(path)?;
        Self::with_config(items, container, config, viewport)
    }

    /// Build from `config`, forcing paused, draggable and uncentred
    pub fn with_config(
        items: Vec<E>,
        container: E,
        config: LoopConfig,
        viewport: Option<&ViewportHandle>,
    ) -> Result<Self> {
        let len = items.len();
        let active = Rc::new(Cell::new(if len > 1 { 1 } else { 0 }));
        let on_change_active = Rc::clone(&active);

        let mut builder = Carousel::builder(items, container)
            .config(LoopConfig {
                paused: true,
                draggable: true,
                center: false,
                ..config
            })
            .on_change(move |_, index| {
                if len > 0 {
                    on_change_active.set((index + 1) % len);
                }
            });
        if let Some(handle) = viewport {
            builder = builder.viewport(handle);
        }

        Ok(Self {
            carousel: builder.build()?,
            active,
        })
    }

    /// Index of the highlighted slide
    pub fn active(&self) -> usize {
        self.active.get()
    }

    fn navigation() -> TweenVars {
        TweenVars::new(NAVIGATION_DURATION, NAVIGATION_EASING)
    }

    /// Bring slide `index` into the highlighted position
    pub fn click(&mut self, index: usize) {
        tracing::debug!("Slider click on slide {}", index);
        self.carousel.to_index(index as isize - 1, Self::navigation());
    }

    pub fn next_button(&mut self) {
        self.carousel.next(Self::navigation());
    }

    pub fn prev_button(&mut self) {
        self.carousel.previous(Self::navigation());
    }

    pub fn pointer(&mut self, event: PointerEvent) {
        self.carousel.pointer(event);
    }

    pub fn tick(&mut self, dt: f32) -> bool {
        self.carousel.tick(dt)
    }

    pub fn carousel(&self) -> &Carousel<E> {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut Carousel<E> {
        &mut self.carousel
    }

    pub fn destroy(self) -> Vec<E> {
        self.carousel.destroy()
    }
}
