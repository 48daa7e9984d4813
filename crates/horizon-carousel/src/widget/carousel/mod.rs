//! Carousel widget implementation.
//!
//! This module provides [`Carousel`], a gesture-driven slider that lays a
//! sequence of equally sized slides out in a strip, lets the user drag
//! between them, and settles on a slide with a spring animation. Looping and
//! autoplay are optional.
//!
//! The carousel does not render anything itself. The host reports layout and
//! pointer events and positions the strip at [`Carousel::live_offset`]; the
//! carousel decides what those events mean.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use horizon_carousel::{Carousel, CarouselConfig, LayoutRect, Scheduler};
//!
//! let scheduler = Arc::new(Scheduler::new());
//! let carousel = Carousel::new(CarouselConfig::default().with_loop(true), 5, scheduler.clone())?;
//!
//! carousel.index_changed().connect(|&index| {
//!     println!("Now showing slide {}", index);
//! });
//!
//! carousel.on_layout(LayoutRect::new(0.0, 0.0, 320.0, 200.0));
//! carousel.go_to_prev();
//! assert_eq!(carousel.active_index(), 4);
//!
//! // Drive the settle animation.
//! scheduler.advance(Duration::from_secs(3));
//! assert_eq!(carousel.live_offset().x, -1280.0);
//! # Ok::<(), horizon_carousel::CarouselError>(())
//! ```
//!
//! # Signals
//!
//! - `transition_started(usize)`: a drag was captured or a programmatic move began
//! - `transition_finished(usize)`: the settle animation came to rest
//! - `index_changed(usize)`: the active index changed

mod autoplay;
mod config;
mod geometry;
mod gesture;
mod index;
mod settle;

pub use autoplay::Autoplay;
pub use config::CarouselConfig;
pub use geometry::{
    Axis, GeometryTracker, LayoutDirection, LayoutRect, Offset, StripSize, direction_sign,
};
pub use gesture::{
    CaptureDecision, GestureInterpreter, GesturePhase, GestureSession, MoveOutcome,
    ReleaseDecision,
};
pub use index::{IndexStateMachine, TransitionPlan};
pub use settle::{FRAME_INTERVAL, SettleAnimator};

use std::fmt;
use std::sync::{Arc, Weak};

use horizon_carousel_core::logging::targets;
use horizon_carousel_core::{ConnectionId, Scheduler, Signal};
use parking_lot::Mutex;

use crate::error::Result;

type GesturePredicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// State a default prev/next/dots control needs to render itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlsState {
    /// The active slide.
    pub active_index: usize,
    /// Number of slides.
    pub count: usize,
    /// On the first slide with looping off.
    pub is_first: bool,
    /// On the last slide with looping off.
    pub is_last: bool,
    /// The carousel axis.
    pub axis: Axis,
}

/// Placement of one slide inside the strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideInfo {
    /// Slide index.
    pub index: usize,
    /// Rect in strip coordinates.
    pub rect: LayoutRect,
    /// Whether this is the active slide.
    pub is_active: bool,
}

struct CarouselState {
    geometry: GeometryTracker,
    index: IndexStateMachine,
    gestures: GestureInterpreter,
    gestures_enabled: Option<GesturePredicate>,
    mounted: bool,
    unmounted: bool,
}

struct CarouselInner {
    config: CarouselConfig,
    state: Mutex<CarouselState>,
    settle: Arc<SettleAnimator>,
    autoplay: Arc<Autoplay>,

    transition_started: Signal<usize>,
    transition_finished: Signal<usize>,
    index_changed: Signal<usize>,
}

/// A gesture-driven carousel.
///
/// `Carousel` is a cheap handle; clones share the same widget. All
/// notifications are delivered synchronously through signals, and no lock
/// is held while a slot runs, so slots may call back into the carousel.
///
/// # Index changes
///
/// Every move, whether it comes from a drag, autoplay, or a navigation call,
/// goes through the same path:
///
/// 1. The active index is committed immediately, before any animation.
/// 2. A spring settle starts towards the new slide's resting offset.
/// 3. The autoplay timer is re-armed.
/// 4. `index_changed` is emitted with the new index.
///
/// A move past either end without looping commits nothing and springs back
/// to the current slide instead.
#[derive(Clone)]
pub struct Carousel {
    inner: Arc<CarouselInner>,
}

impl Carousel {
    /// Create a carousel with `slide_count` slides, timed by `scheduler`.
    ///
    /// Fails only if `config` does not validate. Autoplay does not start
    /// until [`mount`](Self::mount).
    pub fn new(config: CarouselConfig, slide_count: usize, scheduler: Arc<Scheduler>) -> Result<Self> {
        config.validate()?;

        if slide_count > 0 && config.initial_index >= slide_count {
            tracing::warn!(
                target: targets::INDEX,
                initial_index = config.initial_index,
                slide_count,
                "initial index out of range; clamping"
            );
        }

        let geometry = GeometryTracker::new(config.axis, config.layout_direction);
        let gestures = GestureInterpreter::new(
            config.axis,
            geometry.sign(),
            config.min_distance_to_capture,
            config.min_distance_for_action,
        );
        let index = IndexStateMachine::new(config.initial_index, slide_count, config.looping);

        let settle = SettleAnimator::new(scheduler.clone());
        let autoplay = Autoplay::new(scheduler, config.autoplay_interval_secs);

        let inner = Arc::new(CarouselInner {
            config,
            state: Mutex::new(CarouselState {
                geometry,
                index,
                gestures,
                gestures_enabled: None,
                mounted: false,
                unmounted: false,
            }),
            settle,
            autoplay,
            transition_started: Signal::new(),
            transition_finished: Signal::new(),
            index_changed: Signal::new(),
        });

        let weak: Weak<CarouselInner> = Arc::downgrade(&inner);
        inner.settle.settled.connect(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.on_settled();
            }
        });

        let weak: Weak<CarouselInner> = Arc::downgrade(&inner);
        inner.autoplay.fired.connect(move |&delta| {
            if let Some(inner) = weak.upgrade() {
                // An ignored tick re-arms nothing on its own; keep ticking until
                // there is a layout and content to move through.
                if inner.fix_and_go(delta) == TransitionPlan::Ignored {
                    inner.autoplay.start();
                }
            }
        });

        Ok(Self { inner })
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Emitted with the active index when a drag is captured or a
    /// programmatic move begins.
    pub fn transition_started(&self) -> &Signal<usize> {
        &self.inner.transition_started
    }

    /// Emitted with the active index when a settle animation comes to rest.
    ///
    /// A settle superseded by a newer one never emits.
    pub fn transition_finished(&self) -> &Signal<usize> {
        &self.inner.transition_finished
    }

    /// Emitted with the new active index once per committed move.
    pub fn index_changed(&self) -> &Signal<usize> {
        &self.inner.index_changed
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Attach to the host and start autoplay.
    pub fn mount(&self) {
        {
            let mut state = self.inner.state.lock();
            if state.unmounted || state.mounted {
                return;
            }
            state.mounted = true;
        }
        tracing::debug!(target: targets::INDEX, "carousel mounted");
        self.inner.autoplay.mount();
    }

    /// Detach from the host.
    ///
    /// Stops autoplay, drops any settle in flight without notifying, and
    /// detaches live-offset observers. Every later call is a no-op.
    pub fn unmount(&self) {
        {
            let mut state = self.inner.state.lock();
            if state.unmounted {
                return;
            }
            state.unmounted = true;
            state.mounted = false;
        }
        tracing::debug!(target: targets::INDEX, "carousel unmounted");
        self.inner.teardown();
    }

    /// Whether [`mount`](Self::mount) was called and the carousel is live.
    pub fn is_mounted(&self) -> bool {
        self.inner.state.lock().mounted
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Report the viewport's position and size.
    ///
    /// Empty or non-finite rects are ignored. An accepted rect re-anchors the
    /// strip on the active slide without animating.
    pub fn on_layout(&self, rect: LayoutRect) {
        let anchor = {
            let mut state = self.inner.state.lock();
            if state.unmounted || !state.geometry.on_layout(rect) {
                return;
            }
            state.geometry.resting_offset(state.index.active())
        };
        if let Some(anchor) = anchor {
            self.inner.settle.set_anchor(anchor);
        }
    }

    /// The last accepted viewport rect.
    pub fn viewport(&self) -> Option<LayoutRect> {
        self.inner.state.lock().geometry.viewport()
    }

    /// Size of the strip holding every slide.
    pub fn strip_size(&self) -> Option<StripSize> {
        let state = self.inner.state.lock();
        state.geometry.strip_size(state.index.count())
    }

    /// Placement of every slide. Empty until the viewport is measured.
    pub fn slides(&self) -> Vec<SlideInfo> {
        let state = self.inner.state.lock();
        let active = state.index.active();
        (0..state.index.count())
            .filter_map(|index| {
                state.geometry.slide_rect(index).map(|rect| SlideInfo {
                    index,
                    rect,
                    is_active: index == active,
                })
            })
            .collect()
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.inner.state.lock().index.count()
    }

    /// Replace the slide count.
    ///
    /// If the active index no longer exists it is clamped to the last slide
    /// and the strip jumps there. `index_changed` is emitted unless the
    /// carousel is now empty.
    pub fn set_slide_count(&self, count: usize) {
        let (clamped, anchor) = {
            let mut state = self.inner.state.lock();
            if state.unmounted {
                return;
            }
            let clamped = state.index.set_count(count);
            let anchor = clamped.and_then(|index| state.geometry.resting_offset(index));
            (clamped, anchor)
        };

        if let Some(anchor) = anchor {
            self.inner.settle.set_anchor(anchor);
        }
        if let Some(index) = clamped.filter(|_| count > 0) {
            self.inner.index_changed.emit(index);
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// The active index.
    pub fn active_index(&self) -> usize {
        self.inner.state.lock().index.active()
    }

    /// Move to the next slide.
    pub fn go_to_next(&self) {
        self.inner.fix_and_go(1);
    }

    /// Move to the previous slide.
    pub fn go_to_prev(&self) {
        self.inner.fix_and_go(-1);
    }

    /// Move to the slide at `index`.
    ///
    /// Going to the active slide does nothing at all. Out-of-range targets
    /// wrap when looping and clamp otherwise.
    pub fn go_to(&self, index: usize) {
        let delta = self.inner.state.lock().index.delta_to(index);
        if delta != 0 {
            self.inner.fix_and_go(delta);
        }
    }

    /// Move `delta` slides from wherever the strip currently is.
    ///
    /// This is the raw entry point shared by every navigation source. Unlike
    /// [`go_to_next`](Self::go_to_next) and friends it neither re-anchors the
    /// strip first nor emits `transition_started`.
    pub fn request_transition(&self, delta: i64) -> TransitionPlan {
        self.inner.change_index(delta)
    }

    /// Inputs for a prev/next/dots control.
    pub fn controls_state(&self) -> ControlsState {
        let state = self.inner.state.lock();
        ControlsState {
            active_index: state.index.active(),
            count: state.index.count(),
            is_first: state.index.is_first(),
            is_last: state.index.is_last(),
            axis: state.geometry.axis(),
        }
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    /// Set the predicate consulted before every capture decision.
    ///
    /// Gestures are enabled when no predicate is set.
    pub fn set_gestures_enabled<F>(&self, predicate: F)
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.inner.state.lock().gestures_enabled = Some(Arc::new(predicate));
    }

    /// A pointer went down at `point`.
    ///
    /// If a captured drag never reported its release, it is treated as
    /// cancelled first.
    pub fn on_drag_start(&self, point: Offset) {
        let lost_capture = {
            let mut state = self.inner.state.lock();
            !state.unmounted && state.gestures.on_drag_start(point)
        };
        if lost_capture {
            self.inner.autoplay.resume();
            self.inner.spring_back();
        }
    }

    /// The pointer moved to `point`. Returns whether the carousel claims the
    /// gesture.
    ///
    /// On the move that claims it, autoplay is suspended, `transition_started`
    /// is emitted, and the strip is re-anchored on the active slide. From then
    /// on the strip follows the pointer along the axis.
    pub fn on_drag_move(&self, point: Offset) -> CaptureDecision {
        let predicate = {
            let state = self.inner.state.lock();
            if state.unmounted {
                return CaptureDecision::Pass;
            }
            if state.gestures.phase() == GesturePhase::Pending {
                state.gestures_enabled.clone()
            } else {
                None
            }
        };
        // Called without the lock so the predicate may query the carousel.
        let enabled = predicate.is_none_or(|predicate| predicate());

        let (outcome, active, anchor) = {
            let mut state = self.inner.state.lock();
            let measured = state.geometry.is_measured();
            let outcome = state.gestures.on_drag_move(point, enabled, measured);
            let active = state.index.active();
            (outcome, active, state.geometry.resting_offset(active))
        };

        match outcome {
            MoveOutcome::Pass => {}
            MoveOutcome::Captured(displacement) => {
                self.inner.autoplay.suspend();
                self.inner.transition_started.emit(active);
                if let Some(anchor) = anchor {
                    self.inner.settle.set_anchor(anchor);
                }
                self.inner.settle.drag_to(displacement);
            }
            MoveOutcome::Track(displacement) => self.inner.settle.drag_to(displacement),
        }
        outcome.decision()
    }

    /// The pointer was lifted at `point`.
    ///
    /// A captured drag either springs back or moves one slide, and autoplay
    /// resumes either way.
    pub fn on_drag_end(&self, point: Offset) {
        let decision = {
            let mut state = self.inner.state.lock();
            if state.unmounted {
                return;
            }
            let extent = state.geometry.extent().unwrap_or(0.0);
            state.gestures.on_drag_end(point, extent)
        };

        match decision {
            ReleaseDecision::NotCaptured => {}
            ReleaseDecision::Cancel => {
                self.inner.autoplay.resume();
                self.inner.spring_back();
            }
            ReleaseDecision::Advance(delta) => {
                self.inner.autoplay.resume();
                self.inner.change_index(delta);
            }
        }
    }

    /// The host terminated the drag. A captured drag springs back.
    pub fn on_drag_cancel(&self) {
        let cancelled = {
            let mut state = self.inner.state.lock();
            !state.unmounted && state.gestures.on_drag_cancel()
        };
        if cancelled {
            self.inner.autoplay.resume();
            self.inner.spring_back();
        }
    }

    /// An ancestor asked to take over the gesture. Refused while captured.
    pub fn on_termination_request(&self) -> bool {
        self.inner.state.lock().gestures.on_termination_request()
    }

    /// Phase of the current or most recent drag.
    pub fn gesture_phase(&self) -> GesturePhase {
        self.inner.state.lock().gestures.phase()
    }

    // =========================================================================
    // Live Offset
    // =========================================================================

    /// Where the host should draw the strip right now.
    pub fn live_offset(&self) -> Offset {
        self.inner.settle.offset()
    }

    /// Resting offset of the slide the strip is at or heading to.
    pub fn anchor_offset(&self) -> Offset {
        self.inner.settle.anchor()
    }

    /// Observe every change of the live offset.
    pub fn subscribe_offset<F>(&self, f: F) -> ConnectionId
    where
        F: Fn(&Offset) + Send + Sync + 'static,
    {
        self.inner.settle.subscribe(f)
    }

    /// Stop observing the live offset.
    pub fn unsubscribe_offset(&self, id: ConnectionId) -> bool {
        self.inner.settle.unsubscribe(id)
    }

    /// Whether a settle animation is running.
    pub fn is_animating(&self) -> bool {
        self.inner.settle.is_animating()
    }

    /// Whether an autoplay timer is pending.
    pub fn is_autoplay_armed(&self) -> bool {
        self.inner.autoplay.is_armed()
    }

    /// The configuration this carousel was built with.
    pub fn config(&self) -> &CarouselConfig {
        &self.inner.config
    }
}

impl CarouselInner {
    /// Re-anchor on the active slide, announce the move, then make it.
    fn fix_and_go(&self, delta: i64) -> TransitionPlan {
        let (active, anchor, plan) = {
            let state = self.state.lock();
            if state.unmounted {
                return TransitionPlan::Ignored;
            }
            let active = state.index.active();
            (
                active,
                state.geometry.resting_offset(active),
                state.index.plan(delta, state.geometry.is_measured()),
            )
        };

        if let Some(anchor) = anchor {
            self.settle.set_anchor(anchor);
        }
        if plan != TransitionPlan::Ignored {
            self.transition_started.emit(active);
        }
        self.change_index(delta)
    }

    #[tracing::instrument(skip(self), target = "horizon_carousel::index", level = "trace")]
    fn change_index(&self, delta: i64) -> TransitionPlan {
        let (plan, target) = {
            let mut state = self.state.lock();
            if state.unmounted {
                return TransitionPlan::Ignored;
            }
            let measured = state.geometry.is_measured();
            let plan = state.index.request(delta, measured);
            let target = match plan {
                TransitionPlan::Commit { to, .. } => state.geometry.resting_offset(to),
                _ => None,
            };
            (plan, target)
        };

        match plan {
            TransitionPlan::Ignored => {}
            TransitionPlan::Bounce => {
                self.spring_back();
                self.autoplay.start();
            }
            TransitionPlan::Commit { to, .. } => {
                if let Some(target) = target {
                    self.settle.animate_to(target, self.config.spring);
                }
                self.autoplay.start();
                self.index_changed.emit(to);
            }
        }
        plan
    }

    fn spring_back(&self) {
        self.settle.animate_to(self.settle.anchor(), self.config.spring);
    }

    fn on_settled(&self) {
        let active = {
            let state = self.state.lock();
            if state.unmounted {
                return;
            }
            state.index.active()
        };
        self.transition_finished.emit(active);
    }

    fn teardown(&self) {
        self.autoplay.unmount();
        self.settle.cancel();
        self.settle.clear_subscribers();
    }
}

impl Drop for CarouselInner {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for Carousel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Carousel")
            .field("active_index", &state.index.active())
            .field("count", &state.index.count())
            .field("viewport", &state.geometry.viewport())
            .field("gesture_phase", &state.gestures.phase())
            .field("mounted", &state.mounted)
            .field("live_offset", &self.inner.settle.offset())
            .finish()
    }
}

static_assertions::assert_impl_all!(Carousel: Send, Sync);
