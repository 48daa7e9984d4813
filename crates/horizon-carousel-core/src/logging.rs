//! Logging facilities for Horizon Carousel.
//!
//! Horizon Carousel uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_carousel::gesture=debug,horizon_carousel::index=debug")
//!         .init();
//!
//!     // Your application code...
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core runtime target.
    pub const CORE: &str = "horizon_carousel_core";
    /// Signal emission target.
    pub const SIGNAL: &str = "horizon_carousel_core::signal";
    /// Virtual-clock scheduler target.
    pub const SCHEDULER: &str = "horizon_carousel_core::scheduler";
    /// Layout measurement and anchoring.
    pub const GEOMETRY: &str = "horizon_carousel::geometry";
    /// Gesture capture and release decisions.
    pub const GESTURE: &str = "horizon_carousel::gesture";
    /// Index commits, bounces and clamps.
    pub const INDEX: &str = "horizon_carousel::index";
    /// Settle animation frames and completion.
    pub const SETTLE: &str = "horizon_carousel::settle";
    /// Autoplay arming and firing.
    pub const AUTOPLAY: &str = "horizon_carousel::autoplay";
}

/// Returns `true` if `target` belongs to one of the carousel subsystems.
///
/// Useful for subscriber filters that want everything from this project
/// and nothing else.
pub fn is_carousel_target(target: &str) -> bool {
    target.starts_with(targets::CORE) || target.starts_with("horizon_carousel::")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsystem_targets_are_recognized() {
        for target in [
            targets::SIGNAL,
            targets::SCHEDULER,
            targets::GEOMETRY,
            targets::GESTURE,
            targets::INDEX,
            targets::SETTLE,
            targets::AUTOPLAY,
        ] {
            assert!(is_carousel_target(target), "{target}");
        }
        assert!(!is_carousel_target("hyper::client"));
    }
}
