//! Scenario files
//!
//! A scenario describes a row of items, the viewport around them, the
//! carousel configuration and a list of steps to replay:
//!
//! ```toml
//! binding = "slider"
//! fps = 60
//!
//! [items]
//! count = 5
//! width = 100.0
//! gap = 0.0
//!
//! [viewport]
//! width = 300.0
//!
//! [carousel]
//! draggable = true
//!
//! [[steps]]
//! action = "next"
//!
//! [[steps]]
//! action = "wait"
//! seconds = 1.0
//! ```

use anyhow::{Context, Result};
use seamloop_animation::{Easing, TweenVars};
use seamloop_carousel::LoopConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Serialize)]
pub struct Scenario {
    #[serde(default)]
    pub binding: Binding,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub items: ItemsConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub carousel: LoopConfig,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_fps() -> u32 {
    60
}

/// How the carousel is wired
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Binding {
    /// Bare carousel, reporting `on_change`
    #[default]
    Carousel,
    /// Slider binding, reporting the highlighted slide
    Slider,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ItemsConfig {
    pub count: usize,
    pub width: f32,
    pub gap: f32,
}

impl Default for ItemsConfig {
    fn default() -> Self {
        Self {
            count: 5,
            width: 100.0,
            gap: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 200.0,
        }
    }
}

/// One scripted interaction
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Step {
    Next {
        duration: Option<f32>,
        ease: Option<Easing>,
    },
    Previous {
        duration: Option<f32>,
        ease: Option<Easing>,
    },
    Goto {
        index: isize,
        duration: Option<f32>,
        ease: Option<Easing>,
    },
    /// Click a slide (slider binding only)
    Click { index: usize },
    /// Press at `from`, move to `to` over `seconds`, hold, then release
    Drag {
        from: f32,
        to: f32,
        #[serde(default = "default_drag_seconds")]
        seconds: f32,
        #[serde(default)]
        hold: f32,
    },
    /// Reflow items to a new width and resize the viewport
    Resize {
        width: f32,
        item_width: Option<f32>,
        gap: Option<f32>,
    },
    Wait { seconds: f32 },
}

fn default_drag_seconds() -> f32 {
    0.2
}

impl Step {
    /// Tween settings for navigation steps
    pub fn tween_vars(duration: Option<f32>, ease: Option<Easing>) -> TweenVars {
        TweenVars {
            duration,
            easing: ease,
            ..Default::default()
        }
    }
}

impl Scenario {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(source).context("Failed to parse scenario")?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("Invalid scenario {}", path.display()))
    }

    /// Reject geometry the carousel cannot loop over
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            anyhow::bail!("fps must be positive");
        }
        if self.items.width <= 0.0 {
            anyhow::bail!("Item width must be positive, got {}", self.items.width);
        }
        if self.viewport.width <= 0.0 {
            anyhow::bail!("Viewport width must be positive, got {}", self.viewport.width);
        }

        for (i, step) in self.steps.iter().enumerate() {
            match step {
                Step::Click { .. } if self.binding != Binding::Slider => {
                    anyhow::bail!("Step {}: click requires binding = \"slider\"", i + 1);
                }
                Step::Drag { seconds, hold, .. } if *seconds < 0.0 || *hold < 0.0 => {
                    anyhow::bail!("Step {}: drag timings must not be negative", i + 1);
                }
                Step::Resize {
                    width, item_width, ..
                } if *width <= 0.0 || item_width.is_some_and(|w| w <= 0.0) => {
                    anyhow::bail!("Step {}: resize widths must be positive", i + 1);
                }
                Step::Wait { seconds } if *seconds < 0.0 => {
                    anyhow::bail!("Step {}: wait must not be negative", i + 1);
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Simulated seconds per frame
    pub fn frame_duration(&self) -> f32 {
        1.0 / self.fps as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_scenario() {
        let scenario = Scenario::from_toml_str("").unwrap();
        assert_eq!(scenario.binding, Binding::Carousel);
        assert_eq!(scenario.fps, 60);
        assert_eq!(scenario.items.count, 5);
        assert!(scenario.steps.is_empty());
    }

    #[test]
    fn test_parse_steps() {
        let scenario = Scenario::from_toml_str(
            r#"
            binding = "slider"

            [carousel]
            draggable = true
            speed = 2.0

            [[steps]]
            action = "goto"
            index = -1
            ease = "power2.inOut"

            [[steps]]
            action = "drag"
            from = 300.0
            to = 60.0
            hold = 0.5

            [[steps]]
            action = "click"
            index = 2

            [[steps]]
            action = "wait"
            seconds = 1.5
            "#,
        )
        .unwrap();

        assert_eq!(scenario.binding, Binding::Slider);
        assert_eq!(scenario.carousel.speed, 2.0);
        assert_eq!(
            scenario.steps[0],
            Step::Goto {
                index: -1,
                duration: None,
                ease: Some(Easing::CubicInOut),
            }
        );
        assert_eq!(
            scenario.steps[1],
            Step::Drag {
                from: 300.0,
                to: 60.0,
                seconds: 0.2,
                hold: 0.5,
            }
        );
        assert_eq!(scenario.steps[3], Step::Wait { seconds: 1.5 });
    }

    #[test]
    fn test_click_needs_slider() {
        let err = Scenario::from_toml_str(
            r#"
            [[steps]]
            action = "click"
            index = 1
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("slider"));
    }

    #[test]
    fn test_rejects_zero_width() {
        let result = Scenario::from_toml_str(
            r#"
            [items]
            width = 0.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_action() {
        let result = Scenario::from_toml_str(
            r#"
            [[steps]]
            action = "spin"
            "#,
        );
        assert!(result.is_err());
    }
}
