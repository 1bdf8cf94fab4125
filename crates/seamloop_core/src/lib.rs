//! seamloop Core
//!
//! Foundational primitives shared by the seamloop crates:
//!
//! - **Geometry**: `Point`, `Size` and `Rect` with axis-edge helpers
//! - **Elements**: The [`Element`] trait through which the carousel measures
//!   and translates items, plus the in-memory [`BoxElement`]
//! - **Pointer Input**: Press/move/release events and release-velocity tracking
//! - **Viewport**: Resize notifications delivered through dirty-flag subscriptions
//!
//! # Example
//!
//! ```rust
//! use seamloop_core::{BoxElement, Element, Size, Viewport};
//!
//! let viewport = Viewport::new(Size::new(800.0, 600.0));
//! let subscription = viewport.handle().subscribe().unwrap();
//!
//! let items = BoxElement::row(4, 200.0, 16.0);
//! assert_eq!(items[1].offset_left(), 216.0);
//!
//! viewport.resize(Size::new(400.0, 600.0));
//! assert!(subscription.take_resized());
//! assert!(!subscription.take_resized());
//! ```

pub mod element;
pub mod geometry;
pub mod pointer;
pub mod viewport;

pub use element::{BoxElement, Element};
pub use geometry::{Point, Rect, Size};
pub use pointer::{PointerEvent, PointerPhase, VelocityTracker};
pub use viewport::{DirtyFlag, ResizeSubscription, SubscriptionId, Viewport, ViewportHandle};
