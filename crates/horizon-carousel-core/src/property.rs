//! Property system for Horizon Carousel.
//!
//! This module provides reactive properties with change detection, and
//! observable cells that pair a property with a change signal.
//!
//! # Property Types
//!
//! - **Property<T>**: A value with change detection on `set`
//! - **ReadOnlyProperty<'_, T>**: A borrowed read-only view of a property
//! - **Observable<T>**: A single-writer cell that notifies subscribers on change
//!
//! # Example
//!
//! ```
//! use horizon_carousel_core::Observable;
//!
//! let offset = Observable::new(0.0_f32);
//! let id = offset.subscribe(|value| println!("offset is now {value}"));
//!
//! offset.set(-320.0);
//! assert_eq!(offset.get(), -320.0);
//! offset.unsubscribe(id);
//! ```

use std::fmt;

use parking_lot::RwLock;

use crate::signal::{ConnectionId, Signal};

/// A reactive property that tracks changes.
///
/// `Property<T>` wraps a value and provides change detection. When `set()` is
/// called, it compares the new value with the current one and returns whether
/// the value actually changed.
///
/// # Example
///
/// ```
/// use horizon_carousel_core::Property;
///
/// let prop = Property::new(42);
/// assert_eq!(prop.get(), 42);
///
/// // Setting same value returns false (no change)
/// assert!(!prop.set(42));
///
/// // Setting different value returns true (changed)
/// assert!(prop.set(100));
/// assert_eq!(prop.get(), 100);
/// ```
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value without change detection.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }

    /// Get a read-only view of this property.
    pub fn read_only(&self) -> ReadOnlyProperty<'_, T> {
        ReadOnlyProperty::new(self)
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Set the value, returning the old value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

/// A read-only view of a property.
///
/// Useful for exposing properties publicly while keeping the setter private.
pub struct ReadOnlyProperty<'a, T> {
    inner: &'a Property<T>,
}

impl<'a, T: Clone> ReadOnlyProperty<'a, T> {
    /// Create a read-only view of a property.
    pub fn new(property: &'a Property<T>) -> Self {
        Self { inner: property }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Access the value through a closure.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.with(f)
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for ReadOnlyProperty<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOnlyProperty")
            .field("value", &self.get())
            .finish()
    }
}

/// An observable value cell with change notification.
///
/// The owner writes through [`set`](Self::set); everyone else reads via
/// [`get`](Self::get) or subscribes to changes. Subscribers are invoked
/// synchronously after the value has been stored, with the lock released.
pub struct Observable<T> {
    value: Property<T>,
    changed: Signal<T>,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Observable<T> {
    /// Create a new observable with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: Property::new(value),
            changed: Signal::new(),
        }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.get()
    }

    /// Store a new value and notify subscribers if it changed.
    ///
    /// Returns `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        if self.value.set(value.clone()) {
            self.changed.emit(value);
            true
        } else {
            false
        }
    }

    /// Subscribe to value changes.
    pub fn subscribe<F>(&self, f: F) -> ConnectionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.changed.connect(f)
    }

    /// Remove a single subscriber.
    pub fn unsubscribe(&self, id: ConnectionId) -> bool {
        self.changed.disconnect(id)
    }

    /// Detach every subscriber.
    pub fn clear_subscribers(&self) {
        self.changed.disconnect_all();
    }

    /// Number of attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.changed.connection_count()
    }

    /// Get a read-only view of the current value.
    pub fn read_only(&self) -> ReadOnlyProperty<'_, T> {
        self.value.read_only()
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value.get())
            .field("changed", &self.changed)
            .finish()
    }
}
