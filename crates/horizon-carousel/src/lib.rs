//! Horizon Carousel - a gesture-driven carousel/slider widget core.
//!
//! This is the main crate. It re-exports the core runtime
//! (signals, properties, the scheduler) alongside the carousel itself.
//!
//! The carousel is host-neutral: a UI toolkit feeds it layout and pointer
//! events, drives the [`Scheduler`] from its event loop, and draws the slide
//! strip at [`Carousel::live_offset`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use horizon_carousel::{Carousel, CarouselConfig, CaptureDecision, LayoutRect, Offset, Scheduler};
//!
//! let scheduler = Arc::new(Scheduler::new());
//! let config = CarouselConfig::default().with_autoplay_interval(3.0);
//! let carousel = Carousel::new(config, 4, scheduler.clone())?;
//! carousel.on_layout(LayoutRect::new(0.0, 0.0, 400.0, 300.0));
//! carousel.mount();
//!
//! // Swipe left by half a slide.
//! carousel.on_drag_start(Offset::new(300.0, 150.0));
//! assert_eq!(carousel.on_drag_move(Offset::new(250.0, 150.0)), CaptureDecision::Capture);
//! carousel.on_drag_end(Offset::new(100.0, 150.0));
//! assert_eq!(carousel.active_index(), 1);
//!
//! // Autoplay takes over three seconds later.
//! scheduler.advance(Duration::from_secs(3));
//! assert_eq!(carousel.active_index(), 2);
//! # Ok::<(), horizon_carousel::CarouselError>(())
//! ```

pub use horizon_carousel_core::*;

mod error;
pub mod widget;

pub use error::{CarouselError, ConfigError, Result};
pub use widget::animation::{SpringConfig, SpringMotion};
pub use widget::carousel::{
    Axis, CaptureDecision, Carousel, CarouselConfig, ControlsState, GesturePhase, LayoutDirection,
    LayoutRect, Offset, SlideInfo, StripSize, TransitionPlan, direction_sign,
};
