//! Error types for Horizon Carousel core.

use thiserror::Error;

/// The main error type for core runtime operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Timer-related error.
    #[error("timer error: {0}")]
    Timer(#[from] TimerError),
}

/// Timer-specific errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    /// The timer ID is invalid or the timer has already fired or been stopped.
    #[error("invalid or expired timer ID")]
    InvalidTimerId,
}

/// A specialized Result type for core runtime operations.
pub type Result<T> = std::result::Result<T, CoreError>;
