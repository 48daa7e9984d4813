//! Error types for Horizon Carousel.
//!
//! Navigation and gesture handling never fail; they degrade to no-ops. Only
//! loading and validating a [`CarouselConfig`](crate::CarouselConfig) can
//! produce an error.

use thiserror::Error;

use horizon_carousel_core::CoreError;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML source could not be parsed.
    #[error("failed to parse carousel config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be written as TOML.
    #[error("failed to serialize carousel config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// An option holds a value outside its valid range.
    #[error("invalid value for `{option}`: {message}")]
    InvalidValue {
        /// Name of the offending option.
        option: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(option: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            option,
            message: message.into(),
        }
    }
}

/// Top-level error type for the carousel crate.
#[derive(Debug, Error)]
pub enum CarouselError {
    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Error from the core runtime.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for carousel operations.
pub type Result<T> = std::result::Result<T, CarouselError>;
