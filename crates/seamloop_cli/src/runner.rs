//! Scenario replay
//!
//! Steps are replayed against a row of [`BoxElement`]s on a fixed simulated
//! frame step. With a real-time clock the runner also sleeps out each frame
//! and feeds measured deltas instead.

use crate::scenario::{Binding, ItemsConfig, Scenario, Step};
use anyhow::{Context, Result};
use seamloop_animation::FrameClock;
use seamloop_carousel::{Carousel, Slider};
use seamloop_core::{BoxElement, PointerEvent, Size, Viewport};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info};

/// An index change observed during replay
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ChangeEvent {
    /// Simulated seconds since the scenario started
    pub time: f64,
    pub index: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub binding: Binding,
    pub events: Vec<ChangeEvent>,
    pub final_index: usize,
    pub final_time: f32,
    pub frames: u64,
}

enum Target {
    Carousel(Carousel<BoxElement>),
    Slider(Slider<BoxElement>),
}

impl Target {
    fn carousel(&self) -> &Carousel<BoxElement> {
        match self {
            Target::Carousel(carousel) => carousel,
            Target::Slider(slider) => slider.carousel(),
        }
    }

    fn carousel_mut(&mut self) -> &mut Carousel<BoxElement> {
        match self {
            Target::Carousel(carousel) => carousel,
            Target::Slider(slider) => slider.carousel_mut(),
        }
    }
}

pub struct Runner {
    target: Target,
    viewport: Viewport,
    items: ItemsConfig,
    events: Rc<RefCell<Vec<ChangeEvent>>>,
    now: Rc<Cell<f64>>,
    frame_duration: f32,
    clock: Option<FrameClock>,
    last_active: Option<usize>,
    frames: u64,
}

impl Runner {
    /// Build the scenario's target; `config` replaces its `[carousel]` table
    pub fn new(scenario: &Scenario, realtime: bool, config: Option<&Path>) -> Result<Self> {
        let items = BoxElement::row(scenario.items.count, scenario.items.width, scenario.items.gap);
        let container = BoxElement::new(0.0, scenario.viewport.width);
        let viewport = Viewport::new(Size::new(scenario.viewport.width, scenario.viewport.height));
        let handle = viewport.handle();

        let events = Rc::new(RefCell::new(Vec::new()));
        let now = Rc::new(Cell::new(0.0));

        let target = match scenario.binding {
            Binding::Carousel => {
                let log = Rc::clone(&events);
                let clock = Rc::clone(&now);
                let mut builder =
                    Carousel::builder(items, container).config(scenario.carousel.clone());
                if let Some(path) = config {
                    builder = builder
                        .config_file(path)
                        .with_context(|| format!("Failed to load {}", path.display()))?;
                }
                let carousel = builder
                    .viewport(&handle)
                    .on_change(move |_, index| {
                        log.borrow_mut().push(ChangeEvent {
                            time: clock.get(),
                            index,
                        });
                    })
                    .build()
                    .context("Failed to build carousel")?;
                Target::Carousel(carousel)
            }
            Binding::Slider => {
                let slider = match config {
                    Some(path) => Slider::from_config_file(items, container, path, Some(&handle)),
                    None => Slider::with_config(
                        items,
                        container,
                        scenario.carousel.clone(),
                        Some(&handle),
                    ),
                }
                .context("Failed to build slider")?;
                Target::Slider(slider)
            }
        };

        let mut runner = Self {
            target,
            viewport,
            items: scenario.items,
            events,
            now,
            frame_duration: scenario.frame_duration(),
            clock: realtime.then(|| FrameClock::new(scenario.fps)),
            last_active: None,
            frames: 0,
        };
        runner.poll_active();

        debug!(
            "Runner ready: {} items, duration={:.3}s",
            runner.target.carousel().len(),
            runner.target.carousel().timeline().duration()
        );
        Ok(runner)
    }

    fn time(&self) -> f64 {
        self.now.get()
    }

    /// Slider bindings report the highlighted slide rather than on_change
    fn poll_active(&mut self) {
        if let Target::Slider(slider) = &self.target {
            let active = slider.active();
            if self.last_active != Some(active) {
                self.last_active = Some(active);
                self.events.borrow_mut().push(ChangeEvent {
                    time: self.now.get(),
                    index: active,
                });
            }
        }
    }

    fn frame(&mut self) {
        let dt = match self.clock.as_mut() {
            Some(clock) => {
                std::thread::sleep(clock.remaining());
                clock.delta()
            }
            None => self.frame_duration,
        };
        self.now.set(self.now.get() + f64::from(dt));
        self.target.carousel_mut().tick(dt);
        self.frames += 1;
        self.poll_active();
    }

    fn advance(&mut self, seconds: f32) {
        let frames = (seconds / self.frame_duration).round() as usize;
        if let Some(clock) = self.clock.as_mut() {
            clock.reset();
        }
        for _ in 0..frames {
            self.frame();
        }
    }

    fn pointer(&mut self, event: PointerEvent) {
        self.target.carousel_mut().pointer(event);
        self.poll_active();
    }

    pub fn step(&mut self, step: &Step) {
        debug!("t={:.3}s step {:?}", self.time(), step);
        match *step {
            Step::Next { duration, ease } => match &mut self.target {
                Target::Slider(slider) if duration.is_none() && ease.is_none() => {
                    slider.next_button()
                }
                target => target.carousel_mut().next(Step::tween_vars(duration, ease)),
            },
            Step::Previous { duration, ease } => match &mut self.target {
                Target::Slider(slider) if duration.is_none() && ease.is_none() => {
                    slider.prev_button()
                }
                target => target
                    .carousel_mut()
                    .previous(Step::tween_vars(duration, ease)),
            },
            Step::Goto {
                index,
                duration,
                ease,
            } => self
                .target
                .carousel_mut()
                .to_index(index, Step::tween_vars(duration, ease)),
            Step::Click { index } => {
                if let Target::Slider(slider) = &mut self.target {
                    slider.click(index);
                }
            }
            Step::Drag {
                from,
                to,
                seconds,
                hold,
            } => self.drag(from, to, seconds, hold),
            Step::Resize {
                width,
                item_width,
                gap,
            } => self.resize(width, item_width, gap),
            Step::Wait { seconds } => self.advance(seconds),
        }
        self.poll_active();
    }

    fn drag(&mut self, from: f32, to: f32, seconds: f32, hold: f32) {
        self.pointer(PointerEvent::press(from, self.time()));
        let frames = ((seconds / self.frame_duration).round() as usize).max(1);
        for frame in 1..=frames {
            self.frame();
            let x = from + (to - from) * frame as f32 / frames as f32;
            self.pointer(PointerEvent::moved(x, self.time()));
        }
        self.advance(hold);
        self.pointer(PointerEvent::release(to, self.time()));
    }

    fn resize(&mut self, width: f32, item_width: Option<f32>, gap: Option<f32>) {
        if let Some(item_width) = item_width {
            self.items.width = item_width;
        }
        if let Some(gap) = gap {
            self.items.gap = gap;
        }
        let carousel = self.target.carousel_mut();
        BoxElement::reflow_row(carousel.items_mut(), self.items.width, self.items.gap);
        carousel.container_mut().width = width;

        let height = self.viewport.size().height;
        self.viewport.resize(Size::new(width, height));
    }

    /// Replay every step, then report
    pub fn run(mut self, steps: &[Step]) -> Report {
        for step in steps {
            self.step(step);
        }
        self.finish()
    }

    pub fn finish(mut self) -> Report {
        let binding = match self.target {
            Target::Carousel(_) => Binding::Carousel,
            Target::Slider(_) => Binding::Slider,
        };
        let final_index = match &mut self.target {
            Target::Slider(slider) => slider.active(),
            Target::Carousel(carousel) => carousel.current_index(),
        };
        let final_time = self.target.carousel().time();
        let events = self.events.borrow().clone();
        info!(
            "Replayed {} frames: {} changes, final index {}",
            self.frames,
            events.len(),
            final_index
        );
        Report {
            binding,
            events,
            final_index,
            final_time,
            frames: self.frames,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(report: &Report) -> Vec<usize> {
        report.events.iter().map(|event| event.index).collect()
    }

    fn replay(source: &str) -> Report {
        let scenario = Scenario::from_toml_str(source).unwrap();
        Runner::new(&scenario, false, None).unwrap().run(&scenario.steps)
    }

    #[test]
    fn test_navigation_log() {
        let report = replay(
            r#"
            [carousel]
            paused = true

            [[steps]]
            action = "next"
            [[steps]]
            action = "wait"
            seconds = 1.2
            [[steps]]
            action = "next"
            [[steps]]
            action = "wait"
            seconds = 1.2
            [[steps]]
            action = "previous"
            [[steps]]
            action = "wait"
            seconds = 1.2
            "#,
        );
        assert_eq!(indices(&report), vec![0, 1, 2, 1]);
        assert_eq!(report.final_index, 1);
        assert_eq!(report.frames, 216);
    }

    #[test]
    fn test_drag_step_snaps() {
        let report = replay(
            r#"
            [carousel]
            paused = true
            draggable = true

            [[steps]]
            action = "drag"
            from = 300.0
            to = 60.0
            hold = 0.5

            [[steps]]
            action = "wait"
            seconds = 1.0
            "#,
        );
        assert_eq!(report.final_index, 2);
        assert!((report.final_time - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_slider_click() {
        let report = replay(
            r#"
            binding = "slider"

            [[steps]]
            action = "click"
            index = 3
            [[steps]]
            action = "wait"
            seconds = 1.0
            "#,
        );
        assert_eq!(indices(&report), vec![1, 2, 3]);
        assert_eq!(report.final_index, 3);
    }

    #[test]
    fn test_resize_step_rebuilds() {
        let report = replay(
            r#"
            [carousel]
            paused = true
            draggable = true

            [[steps]]
            action = "goto"
            index = 3
            duration = 0.0
            [[steps]]
            action = "resize"
            width = 600.0
            item_width = 200.0
            [[steps]]
            action = "wait"
            seconds = 0.1
            "#,
        );
        assert_eq!(report.final_index, 3);
        assert!((report.final_time - 6.0).abs() < 1e-3);
    }

    #[test]
    fn test_report_serializes() {
        let report = replay("[carousel]\npaused = true\n");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["binding"], "carousel");
        assert_eq!(json["events"][0]["index"], 0);
    }

    #[test]
    fn test_missing_config_file_fails() {
        let scenario = Scenario::from_toml_str("[carousel]\npaused = true\n").unwrap();
        let missing = Path::new("/nonexistent/seamloop/carousel.toml");
        let error = Runner::new(&scenario, false, Some(missing))
            .err()
            .unwrap();
        assert!(error.to_string().contains("carousel.toml"));
    }

    #[test]
    fn test_config_file_overrides_scenario() {
        let name = format!("seamloop-runner-{}.toml", std::process::id());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, "paused = true\nspeed = 2.0\n").unwrap();

        let scenario = Scenario::from_toml_str("[carousel]\nspeed = 1.0\n").unwrap();
        let steps = [Step::Wait { seconds: 0.5 }];
        let report = Runner::new(&scenario, false, Some(&path))
            .unwrap()
            .run(&steps);
        std::fs::remove_file(&path).ok();

        // Paused by the file, so the playhead never leaves the first label
        assert_eq!(report.final_index, 0);
        assert_eq!(report.final_time, 0.0);
    }
}
