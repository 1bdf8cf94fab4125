//! seamloop Carousel
//!
//! An endlessly looping horizontal carousel. Items are animated along a
//! single labelled timeline; when an item scrolls past the leading edge it
//! jumps one full cycle to the far end, so the row never runs out.
//!
//! - **Navigation**: `to_index`, `next` and `previous` take the shorter way
//!   around the loop, crossing the seam when that is shorter
//! - **Drag**: Optional pointer drag with inertia, snapping to item labels
//! - **Resize**: Rebuilds the timeline when a subscribed viewport resizes
//! - **Slider**: The offset-highlight binding used by slider widgets
//!
//! # Example
//!
//! ```rust
//! use seamloop_animation::TweenVars;
//! use seamloop_carousel::{Carousel, LoopConfig};
//! use seamloop_core::BoxElement;
//!
//! let items = BoxElement::row(5, 100.0, 0.0);
//! let container = BoxElement::new(0.0, 300.0);
//! let config = LoopConfig { paused: true, ..Default::default() };
//!
//! let mut carousel = Carousel::new(items, container, config).unwrap();
//! carousel.next(TweenVars::default());
//! for _ in 0..90 {
//!     carousel.tick(1.0 / 60.0);
//! }
//! assert_eq!(carousel.current_index(), 1);
//! ```

pub mod carousel;
pub mod config;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod loop_core;
pub mod slider;

pub use carousel::{Carousel, CarouselBuilder};
pub use config::{DragConfig, LoopConfig, Snap, BASE_PIXELS_PER_SECOND};
pub use drag::{snap_to_label, DragBehavior, DragSession, InertiaDrag, LoopControl};
pub use error::{CarouselError, ConfigError, Result};
pub use geometry::LoopGeometry;
pub use loop_core::{closest_label, ChangeCallback, LoopCore};
pub use slider::Slider;
