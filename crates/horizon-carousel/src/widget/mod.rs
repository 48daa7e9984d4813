//! Widget system for Horizon Carousel.
//!
//! - [`carousel`]: the [`Carousel`](carousel::Carousel) widget and the
//!   components it is built from
//! - [`animation`]: spring physics used by settle transitions

pub mod animation;
pub mod carousel;

pub use animation::{SpringConfig, SpringMotion};
pub use carousel::{
    Axis, Carousel, CarouselConfig, CaptureDecision, ControlsState, GesturePhase, LayoutDirection,
    LayoutRect, Offset, SlideInfo, StripSize, TransitionPlan,
};
