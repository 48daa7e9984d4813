//! Carousel configuration.

use serde::{Deserialize, Serialize};

use super::geometry::{Axis, LayoutDirection};
use crate::error::ConfigError;
use crate::widget::animation::SpringConfig;

/// Options fixed for the lifetime of a carousel.
///
/// Every field has a default, so a TOML document only needs the options it
/// changes:
///
/// ```
/// use horizon_carousel::{Axis, CarouselConfig};
///
/// let config = CarouselConfig::from_toml_str(r#"
///     axis = "vertical"
///     loop = true
///     autoplay_interval_secs = 2.5
///
///     [spring]
///     stiffness = 300.0
/// "#)?;
///
/// assert_eq!(config.axis, Axis::Vertical);
/// assert!(config.looping);
/// assert_eq!(config.spring.damping_ratio, 1.0);
/// # Ok::<(), horizon_carousel::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Dimension driving gestures and animation.
    pub axis: Axis,
    /// Host reading direction. Mirrors the horizontal axis only.
    pub layout_direction: LayoutDirection,
    /// Active index at construction. Clamped to the slide count.
    pub initial_index: usize,
    /// Wrap around at the first and last slide.
    #[serde(rename = "loop")]
    pub looping: bool,
    /// Seconds between autoplay moves. Negative retreats, zero disables.
    pub autoplay_interval_secs: f64,
    /// Distance along the axis a drag must exceed before it is claimed.
    pub min_distance_to_capture: f32,
    /// Fraction of the viewport a released drag must cover to change slide.
    pub min_distance_for_action: f32,
    /// Settle animation tuning.
    pub spring: SpringConfig,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            layout_direction: LayoutDirection::LeftToRight,
            initial_index: 0,
            looping: false,
            autoplay_interval_secs: 0.0,
            min_distance_to_capture: 5.0,
            min_distance_for_action: 0.2,
            spring: SpringConfig::default(),
        }
    }
}

impl CarouselConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Check every option is within range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_distance_to_capture.is_finite() || self.min_distance_to_capture < 0.0 {
            return Err(ConfigError::invalid(
                "min_distance_to_capture",
                format!("must be finite and non-negative, got {}", self.min_distance_to_capture),
            ));
        }
        if !self.min_distance_for_action.is_finite() || self.min_distance_for_action < 0.0 {
            return Err(ConfigError::invalid(
                "min_distance_for_action",
                format!("must be finite and non-negative, got {}", self.min_distance_for_action),
            ));
        }
        if !self.autoplay_interval_secs.is_finite() {
            return Err(ConfigError::invalid(
                "autoplay_interval_secs",
                format!("must be finite, got {}", self.autoplay_interval_secs),
            ));
        }

        let spring = &self.spring;
        for (option, value) in [
            ("spring.stiffness", spring.stiffness),
            ("spring.damping_ratio", spring.damping_ratio),
            ("spring.mass", spring.mass),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(
                    option,
                    format!("must be finite and positive, got {value}"),
                ));
            }
        }
        for (option, value) in [
            ("spring.velocity_threshold", spring.velocity_threshold),
            ("spring.position_threshold", spring.position_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    option,
                    format!("must be finite and non-negative, got {value}"),
                ));
            }
        }
        Ok(())
    }

    // =========================================================================
    // Builder Pattern Methods
    // =========================================================================

    /// Set the axis using builder pattern.
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// Set the layout direction using builder pattern.
    pub fn with_layout_direction(mut self, direction: LayoutDirection) -> Self {
        self.layout_direction = direction;
        self
    }

    /// Set the initial index using builder pattern.
    pub fn with_initial_index(mut self, index: usize) -> Self {
        self.initial_index = index;
        self
    }

    /// Enable or disable wrap-around using builder pattern.
    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Set the signed autoplay interval using builder pattern.
    pub fn with_autoplay_interval(mut self, seconds: f64) -> Self {
        self.autoplay_interval_secs = seconds;
        self
    }

    /// Set the capture distance using builder pattern.
    pub fn with_min_distance_to_capture(mut self, distance: f32) -> Self {
        self.min_distance_to_capture = distance;
        self
    }

    /// Set the release fraction using builder pattern.
    pub fn with_min_distance_for_action(mut self, fraction: f32) -> Self {
        self.min_distance_for_action = fraction;
        self
    }

    /// Set the spring tuning using builder pattern.
    pub fn with_spring(mut self, spring: SpringConfig) -> Self {
        self.spring = spring;
        self
    }
}
