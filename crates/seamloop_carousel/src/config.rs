//! Carousel configuration
//!
//! Every field has a default, so a TOML table only needs the options it
//! changes:
//!
//! ```toml
//! paused = true
//! draggable = true
//! speed = 1.5
//! snap = false
//! repeat = -1
//!
//! [drag.throw]
//! resistance = 2000.0
//! ```

use crate::error::ConfigError;
use seamloop_animation::{snap, Easing, Repeat, ThrowConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Pixels travelled per second at speed 1
pub const BASE_PIXELS_PER_SECOND: f32 = 100.0;

/// Quantization applied to translation percentages
///
/// Flex layouts can alternate item widths by a pixel; snapping keeps the
/// computed percentages from jittering between neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "SnapSetting", into = "SnapSetting")]
pub enum Snap {
    Off,
    Step(f32),
}

impl Default for Snap {
    fn default() -> Self {
        Snap::Step(1.0)
    }
}

impl Snap {
    pub fn apply(self, value: f32) -> f32 {
        match self {
            Snap::Off => value,
            Snap::Step(step) => snap(step, value),
        }
    }
}

/// Accepts `snap = false`, `snap = true` or `snap = <step>`
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum SnapSetting {
    Enabled(bool),
    Step(f32),
}

impl From<SnapSetting> for Snap {
    fn from(setting: SnapSetting) -> Self {
        match setting {
            SnapSetting::Enabled(false) => Snap::Off,
            SnapSetting::Enabled(true) => Snap::default(),
            SnapSetting::Step(step) if step > 0.0 => Snap::Step(step),
            SnapSetting::Step(_) => Snap::default(),
        }
    }
}

impl From<Snap> for SnapSetting {
    fn from(snap: Snap) -> Self {
        match snap {
            Snap::Off => SnapSetting::Enabled(false),
            Snap::Step(step) => SnapSetting::Step(step),
        }
    }
}

/// Pointer-drag behaviour
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Keep moving after release and settle on the nearest label
    ///
    /// When disabled a release snaps straight to the nearest label.
    pub inertia: bool,
    /// Releases that moved less than this many pixels are treated as clicks
    pub click_threshold: f32,
    pub throw: ThrowConfig,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            inertia: true,
            click_threshold: 10.0,
            throw: ThrowConfig::default(),
        }
    }
}

/// Configuration for a looping carousel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Start stopped instead of auto-playing
    pub paused: bool,
    /// Enable pointer-drag control
    pub draggable: bool,
    /// Resolve the active item against the container's centre instead of its leading edge
    pub center: bool,
    /// Scale factor on [`BASE_PIXELS_PER_SECOND`]
    pub speed: f32,
    pub snap: Snap,
    pub repeat: Repeat,
    /// Start playing backward
    pub reversed: bool,
    /// Extra trailing gap added to the total extent
    pub padding_right: f32,
    /// Easing for timeline segments and navigation that does not name one
    pub default_ease: Easing,
    pub drag: DragConfig,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            paused: false,
            draggable: false,
            center: false,
            speed: 1.0,
            snap: Snap::default(),
            repeat: Repeat::Never,
            reversed: false,
            padding_right: 0.0,
            default_ease: Easing::Linear,
            drag: DragConfig::default(),
        }
    }
}

impl LoopConfig {
    /// Travel speed; a non-positive speed falls back to 1
    pub fn pixels_per_second(&self) -> f32 {
        let speed = if self.speed > 0.0 { self.speed } else { 1.0 };
        speed * BASE_PIXELS_PER_SECOND
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}
