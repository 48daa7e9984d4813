//! Virtual-clock scheduler for timers and animation frames.
//!
//! The scheduler keeps its own notion of "now" and only moves forward when the
//! host calls [`Scheduler::advance`]. Hosts drive it from their real event
//! loop with the elapsed frame time; tests drive it with exact durations and
//! never wait on a wall clock.
//!
//! Callbacks run on the thread that calls `advance`, one at a time, with the
//! scheduler lock released. A callback may therefore start or stop timers,
//! including the one that is currently firing.
//!
//! # Example
//!
//! ```
//! use horizon_carousel_core::Scheduler;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let scheduler = Scheduler::new();
//! let fired = Arc::new(AtomicUsize::new(0));
//!
//! let fired_clone = fired.clone();
//! scheduler.start_repeating(Duration::from_millis(100), move || {
//!     fired_clone.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! scheduler.advance(Duration::from_millis(350));
//! assert_eq!(fired.load(Ordering::SeqCst), 3);
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::time::Duration;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, TimerError};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a scheduled timer.
    pub struct TimerId;
}

/// The type of timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once after the specified delay.
    OneShot,
    /// Fires repeatedly at the specified interval.
    Repeating,
}

/// Smallest interval a repeating timer may use.
const MIN_REPEAT_INTERVAL: Duration = Duration::from_millis(1);

/// A boxed timer callback.
type TimerCallback = Box<dyn FnMut() + Send + 'static>;

/// Internal timer data.
struct TimerData {
    /// When this timer should next fire, on the virtual clock.
    next_fire: Duration,
    /// The interval for repeating timers.
    interval: Duration,
    /// The kind of timer.
    kind: TimerKind,
    /// The callback; `None` while it is running.
    callback: Option<TimerCallback>,
}

/// An entry in the timer queue (min-heap by fire time, FIFO on ties).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Duration,
    sequence: u64,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time && self.sequence == other.sequence
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other
            .fire_time
            .cmp(&self.fire_time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Mutable scheduler state, guarded by the scheduler lock.
#[derive(Default)]
struct SchedulerState {
    /// Current virtual time.
    now: Duration,
    /// All registered timers.
    timers: SlotMap<TimerId, TimerData>,
    /// Priority queue of pending timer fires.
    queue: BinaryHeap<TimerQueueEntry>,
    /// Insertion counter for queue tie-breaking.
    sequence: u64,
}

impl SchedulerState {
    fn push(&mut self, id: TimerId, fire_time: Duration) {
        self.sequence += 1;
        self.queue.push(TimerQueueEntry {
            id,
            fire_time,
            sequence: self.sequence,
        });
    }

    fn insert(&mut self, delay: Duration, kind: TimerKind, callback: TimerCallback) -> TimerId {
        let interval = match kind {
            TimerKind::OneShot => delay,
            TimerKind::Repeating => delay.max(MIN_REPEAT_INTERVAL),
        };
        let next_fire = self.now + interval;
        let id = self.timers.insert(TimerData {
            next_fire,
            interval,
            kind,
            callback: Some(callback),
        });
        self.push(id, next_fire);
        id
    }

    /// Pop the next live queue entry due at or before `deadline`.
    ///
    /// Stale entries (stopped timers, superseded fire times) are discarded.
    fn pop_due(&mut self, deadline: Duration) -> Option<(TimerId, Duration)> {
        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > deadline {
                return None;
            }
            self.queue.pop();

            let live = self
                .timers
                .get(entry.id)
                .is_some_and(|t| t.next_fire == entry.fire_time);
            if live {
                return Some((entry.id, entry.fire_time));
            }
        }
        None
    }
}

/// A single-threaded cooperative timer queue on a virtual clock.
///
/// Shared between components behind an `Arc`; every method takes `&self`.
pub struct Scheduler {
    state: Mutex<SchedulerState>,
}

impl Scheduler {
    /// Create a new scheduler with its clock at zero.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SchedulerState::default()),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Start a one-shot timer that fires once after `delay`.
    ///
    /// Returns the timer ID that can be used to cancel the timer.
    pub fn start_one_shot<F>(&self, delay: Duration, callback: F) -> TimerId
    where
        F: FnMut() + Send + 'static,
    {
        let id = self
            .state
            .lock()
            .insert(delay, TimerKind::OneShot, Box::new(callback));
        tracing::trace!(target: targets::SCHEDULER, ?id, ?delay, "one-shot timer started");
        id
    }

    /// Start a repeating timer that fires every `interval`.
    ///
    /// The first fire occurs after `interval`. Intervals shorter than one
    /// millisecond are raised to one millisecond.
    pub fn start_repeating<F>(&self, interval: Duration, callback: F) -> TimerId
    where
        F: FnMut() + Send + 'static,
    {
        let id = self
            .state
            .lock()
            .insert(interval, TimerKind::Repeating, Box::new(callback));
        tracing::trace!(target: targets::SCHEDULER, ?id, ?interval, "repeating timer started");
        id
    }

    /// Stop and remove a timer.
    ///
    /// Returns `Ok(())` if the timer was found and removed, or an error if it
    /// does not exist (already fired, already stopped, or never issued).
    pub fn stop(&self, id: TimerId) -> Result<()> {
        if self.state.lock().timers.remove(id).is_some() {
            tracing::trace!(target: targets::SCHEDULER, ?id, "timer stopped");
            Ok(())
        } else {
            Err(TimerError::InvalidTimerId.into())
        }
    }

    /// Check if a timer is still pending.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.state.lock().timers.contains_key(id)
    }

    /// Get the number of pending timers.
    pub fn active_count(&self) -> usize {
        self.state.lock().timers.len()
    }

    /// Get the virtual duration until the next timer fires, if any.
    pub fn time_until_next(&self) -> Option<Duration> {
        let state = self.state.lock();
        state
            .timers
            .values()
            .map(|t| t.next_fire)
            .min()
            .map(|next| next.saturating_sub(state.now))
    }

    /// Move the virtual clock forward by `elapsed`, firing every timer that
    /// comes due, in deadline order.
    ///
    /// While a callback runs, the clock reads as that timer's fire time.
    /// Timers started by a callback fire within the same call if their
    /// deadline falls inside the window. Returns the number of callbacks run.
    #[tracing::instrument(skip(self), target = "horizon_carousel_core::scheduler", level = "trace")]
    pub fn advance(&self, elapsed: Duration) -> usize {
        let deadline = self.now() + elapsed;
        let mut fired = 0;

        loop {
            let (id, mut callback) = {
                let mut state = self.state.lock();
                let Some((id, fire_time)) = state.pop_due(deadline) else {
                    break;
                };
                state.now = fire_time;

                let Some(timer) = state.timers.get_mut(id) else {
                    continue;
                };
                // Re-entrant advance from inside this timer's own callback.
                let Some(callback) = timer.callback.take() else {
                    continue;
                };

                let kind = timer.kind;
                match kind {
                    TimerKind::OneShot => {
                        state.timers.remove(id);
                    }
                    TimerKind::Repeating => {
                        let next_fire = fire_time + timer.interval;
                        timer.next_fire = next_fire;
                        state.push(id, next_fire);
                    }
                }
                (id, callback)
            };

            tracing::trace!(target: targets::SCHEDULER, ?id, "timer fired");
            callback();
            fired += 1;

            // Hand the callback back unless the timer was stopped meanwhile.
            if let Some(timer) = self.state.lock().timers.get_mut(id) {
                timer.callback = Some(callback);
            }
        }

        self.state.lock().now = deadline;
        fired
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Scheduler")
            .field("now", &state.now)
            .field("active_timers", &state.timers.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(Scheduler: Send, Sync);
