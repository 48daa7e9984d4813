//! Autoplay scheduler.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use horizon_carousel_core::logging::targets;
use horizon_carousel_core::{Scheduler, Signal, TimerId};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct AutoplayState {
    timer: Option<TimerId>,
    mounted: bool,
    suspended: bool,
}

/// Arms a single-shot timer that asks the carousel to move one slide.
///
/// At most one timer is pending at any time: every [`start`](Self::start)
/// cancels the previous timer before arming a new one. The carousel re-arms
/// the timer after each transition, so a fired timer produces a steady
/// cadence of one move per interval.
///
/// The interval is signed: a positive interval advances, a negative interval
/// retreats, and zero disables autoplay.
pub struct Autoplay {
    scheduler: Arc<Scheduler>,
    interval_secs: f64,
    state: Mutex<AutoplayState>,

    /// Emitted with the requested delta (`+1` or `-1`) when the timer fires.
    pub fired: Signal<i64>,
}

impl Autoplay {
    /// Create an unmounted scheduler. Nothing is armed until [`mount`](Self::mount).
    pub fn new(scheduler: Arc<Scheduler>, interval_secs: f64) -> Arc<Self> {
        Arc::new(Self {
            scheduler,
            interval_secs,
            state: Mutex::new(AutoplayState::default()),
            fired: Signal::new(),
        })
    }

    /// Whether a non-zero interval is configured.
    pub fn is_enabled(&self) -> bool {
        self.interval_secs != 0.0 && self.interval_secs.is_finite()
    }

    /// The delay between moves.
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_secs.abs())
    }

    /// The delta requested on every tick.
    pub fn direction(&self) -> i64 {
        if self.interval_secs < 0.0 { -1 } else { 1 }
    }

    /// Whether a timer is currently pending.
    pub fn is_armed(&self) -> bool {
        self.state.lock().timer.is_some()
    }

    /// Allow the timer to run and arm it.
    pub fn mount(self: &Arc<Self>) {
        self.state.lock().mounted = true;
        self.start();
    }

    /// Stop the timer for good.
    pub fn unmount(&self) {
        let mut state = self.state.lock();
        state.mounted = false;
        self.cancel_timer(&mut state);
    }

    /// Arm a fresh timer, replacing any pending one.
    ///
    /// Does nothing when autoplay is disabled, unmounted, or suspended by a
    /// gesture.
    pub fn start(self: &Arc<Self>) {
        let mut state = self.state.lock();
        self.cancel_timer(&mut state);

        if !self.is_enabled() || !state.mounted || state.suspended {
            return;
        }

        let weak: Weak<Self> = Arc::downgrade(self);
        let timer = self.scheduler.start_one_shot(self.interval(), move || {
            if let Some(autoplay) = weak.upgrade() {
                autoplay.on_fire();
            }
        });
        state.timer = Some(timer);
        tracing::debug!(
            target: targets::AUTOPLAY,
            interval_secs = self.interval_secs,
            "autoplay armed"
        );
    }

    /// Cancel any pending timer. Idempotent.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        self.cancel_timer(&mut state);
    }

    /// Hold autoplay off while a gesture is captured.
    pub fn suspend(&self) {
        let mut state = self.state.lock();
        state.suspended = true;
        self.cancel_timer(&mut state);
    }

    /// Release a [`suspend`](Self::suspend) and arm exactly one fresh timer.
    pub fn resume(self: &Arc<Self>) {
        self.state.lock().suspended = false;
        self.start();
    }

    fn cancel_timer(&self, state: &mut AutoplayState) {
        if let Some(timer) = state.timer.take() {
            let _ = self.scheduler.stop(timer);
            tracing::debug!(target: targets::AUTOPLAY, "autoplay cancelled");
        }
    }

    fn on_fire(&self) {
        {
            let mut state = self.state.lock();
            // A one-shot timer is gone once it fires.
            state.timer = None;
            if !state.mounted || state.suspended {
                return;
            }
        }
        let delta = self.direction();
        tracing::debug!(target: targets::AUTOPLAY, delta, "autoplay fired");
        self.fired.emit(delta);
    }
}

impl Drop for Autoplay {
    fn drop(&mut self) {
        if let Some(timer) = self.state.get_mut().timer.take() {
            let _ = self.scheduler.stop(timer);
        }
    }
}

impl fmt::Debug for Autoplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autoplay")
            .field("interval_secs", &self.interval_secs)
            .field("state", &*self.state.lock())
            .finish()
    }
}
