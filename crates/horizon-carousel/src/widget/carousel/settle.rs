//! Settle animator: owns the live strip offset and drives spring settles.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use horizon_carousel_core::logging::targets;
use horizon_carousel_core::{ConnectionId, Observable, Scheduler, Signal, TimerId};
use parking_lot::Mutex;

use super::geometry::Offset;
use crate::widget::animation::{SpringConfig, SpringMotion};

/// Interval between animation frames on the scheduler clock.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// A settle in progress.
struct Flight {
    motion: SpringMotion,
    config: SpringConfig,
    timer: TimerId,
    generation: u64,
}

#[derive(Default)]
struct SettleState {
    /// Rest position the strip is at, or heading to.
    anchor: Offset,
    flight: Option<Flight>,
    generation: u64,
}

/// Drives the strip's live offset.
///
/// The live offset is the only continuously changing value in the widget.
/// This type is its single writer; everyone else reads it with
/// [`offset`](Self::offset) or [`subscribe`](Self::subscribe).
///
/// Starting a new settle, re-anchoring, or cancelling supersedes any settle
/// in flight, and a superseded settle never emits [`settled`](Self::settled).
pub struct SettleAnimator {
    scheduler: Arc<Scheduler>,
    offset: Observable<Offset>,
    state: Mutex<SettleState>,

    /// Emitted with the rest position when a settle comes to rest.
    pub settled: Signal<Offset>,
}

impl SettleAnimator {
    /// Create an animator resting at the zero offset.
    pub fn new(scheduler: Arc<Scheduler>) -> Arc<Self> {
        Arc::new(Self {
            scheduler,
            offset: Observable::new(Offset::ZERO),
            state: Mutex::new(SettleState::default()),
            settled: Signal::new(),
        })
    }

    /// The live offset right now.
    pub fn offset(&self) -> Offset {
        self.offset.get()
    }

    /// The rest position the strip is at or heading to.
    pub fn anchor(&self) -> Offset {
        self.state.lock().anchor
    }

    /// Whether a settle is in flight.
    pub fn is_animating(&self) -> bool {
        self.state.lock().flight.is_some()
    }

    /// Observe every change of the live offset.
    pub fn subscribe<F>(&self, f: F) -> ConnectionId
    where
        F: Fn(&Offset) + Send + Sync + 'static,
    {
        self.offset.subscribe(f)
    }

    /// Stop observing the live offset.
    pub fn unsubscribe(&self, id: ConnectionId) -> bool {
        self.offset.unsubscribe(id)
    }

    /// Detach all live-offset observers.
    pub fn clear_subscribers(&self) {
        self.offset.clear_subscribers();
    }

    /// Jump to a new rest position without animating.
    pub fn set_anchor(&self, anchor: Offset) {
        {
            let mut state = self.state.lock();
            self.stop_flight(&mut state);
            state.anchor = anchor;
        }
        tracing::trace!(target: targets::SETTLE, ?anchor, "anchor set");
        self.offset.set(anchor);
    }

    /// Follow a drag: place the strip at `anchor + displacement`.
    pub fn drag_to(&self, displacement: Offset) {
        let position = {
            let mut state = self.state.lock();
            self.stop_flight(&mut state);
            state.anchor + displacement
        };
        self.offset.set(position);
    }

    /// Start a spring settle from the live offset to `target`.
    ///
    /// `target` becomes the new anchor immediately.
    pub fn animate_to(self: &Arc<Self>, target: Offset, config: SpringConfig) {
        let from = self.offset.get();
        let mut state = self.state.lock();
        self.stop_flight(&mut state);

        state.generation += 1;
        let generation = state.generation;
        let weak: Weak<Self> = Arc::downgrade(self);
        let timer = self.scheduler.start_repeating(FRAME_INTERVAL, move || {
            if let Some(animator) = weak.upgrade() {
                animator.on_frame(generation);
            }
        });

        state.anchor = target;
        state.flight = Some(Flight {
            motion: SpringMotion::new(from, target),
            config,
            timer,
            generation,
        });
        tracing::debug!(target: targets::SETTLE, ?from, ?target, generation, "settle started");
    }

    /// Cancel any settle in flight, leaving the strip where it is.
    ///
    /// Returns `true` if a settle was cancelled.
    pub fn cancel(&self) -> bool {
        let mut state = self.state.lock();
        self.stop_flight(&mut state)
    }

    fn stop_flight(&self, state: &mut SettleState) -> bool {
        let Some(flight) = state.flight.take() else {
            return false;
        };
        // Ignore the error: the timer is gone already if the scheduler was torn down.
        let _ = self.scheduler.stop(flight.timer);
        tracing::trace!(target: targets::SETTLE, generation = flight.generation, "settle superseded");
        true
    }

    fn on_frame(&self, generation: u64) {
        let (position, finished) = {
            let mut state = self.state.lock();
            let Some(flight) = state.flight.as_mut() else {
                return;
            };
            if flight.generation != generation {
                return;
            }

            let done = flight.motion.step(&flight.config, FRAME_INTERVAL);
            let position = flight.motion.position;
            if done {
                let target = flight.motion.target;
                self.stop_flight(&mut state);
                (position, Some(target))
            } else {
                (position, None)
            }
        };

        tracing::trace!(target: targets::SETTLE, ?position, "settle frame");
        self.offset.set(position);

        if let Some(target) = finished {
            tracing::debug!(target: targets::SETTLE, ?target, generation, "settle finished");
            self.settled.emit(target);
        }
    }
}

impl Drop for SettleAnimator {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if let Some(flight) = state.flight.take() {
            let _ = self.scheduler.stop(flight.timer);
        }
    }
}

impl fmt::Debug for SettleAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SettleAnimator")
            .field("offset", &self.offset.get())
            .field("anchor", &state.anchor)
            .field("animating", &state.flight.is_some())
            .finish()
    }
}
