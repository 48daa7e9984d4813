//! Animation support for Horizon Carousel.
//!
//! Settle transitions are physical springs rather than fixed-duration tweens:
//! they start from whatever position and velocity the strip has (for
//! example, where a finger let go) and always end exactly on the target.
//!
//! # Example
//!
//! ```
//! use horizon_carousel::widget::animation::{SpringConfig, SpringMotion};
//! use horizon_carousel::widget::carousel::Offset;
//! use std::time::Duration;
//!
//! let config = SpringConfig::stiff();
//! let mut motion = SpringMotion::new(Offset::ZERO, Offset::new(-320.0, 0.0));
//! while !motion.step(&config, Duration::from_millis(16)) {}
//! assert_eq!(motion.position, Offset::new(-320.0, 0.0));
//! ```

mod spring;

pub use spring::{SpringConfig, SpringMotion};
