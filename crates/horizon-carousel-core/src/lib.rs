//! Core systems for Horizon Carousel.
//!
//! This crate provides the host-neutral runtime the carousel is built on:
//!
//! - **Signal/Slot System**: Typed notification ports
//! - **Property System**: Values with change detection and observable cells
//! - **Scheduler**: One-shot and repeating timers on a virtual clock
//! - **Logging**: `tracing` target names for every subsystem
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_carousel_core::Signal;
//!
//! let index_changed = Signal::<usize>::new();
//! let conn_id = index_changed.connect(|index| {
//!     println!("Index changed to: {}", index);
//! });
//!
//! index_changed.emit(2);
//! index_changed.disconnect(conn_id);
//! ```
//!
//! # Scheduler Example
//!
//! ```
//! use horizon_carousel_core::Scheduler;
//! use std::time::Duration;
//!
//! let scheduler = Scheduler::new();
//! let id = scheduler.start_one_shot(Duration::from_secs(2), || {
//!     println!("Autoplay tick");
//! });
//!
//! assert!(scheduler.is_active(id));
//! scheduler.advance(Duration::from_secs(2));
//! assert!(!scheduler.is_active(id));
//! ```

mod error;
pub mod logging;
pub mod property;
mod scheduler;
pub mod signal;

pub use error::{CoreError, Result, TimerError};
pub use property::{Observable, Property, ReadOnlyProperty};
pub use scheduler::{Scheduler, TimerId, TimerKind};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
