//! Gesture interpretation: turns a raw drag into capture and release decisions.
//!
//! The interpreter is pure bookkeeping. It never touches the animator, the
//! index, or autoplay; it tells the [`Carousel`](super::Carousel) what a
//! pointer event means and the carousel applies the consequences.

use horizon_carousel_core::logging::targets;

use super::geometry::{Axis, Offset};

/// Where a drag session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    /// No drag has started yet.
    #[default]
    Idle,
    /// A drag is in progress but has not been claimed.
    Pending,
    /// The carousel owns the drag.
    Capturing,
    /// The captured drag ended normally.
    Released,
    /// The captured drag was terminated by the host.
    Cancelled,
}

/// Answer to the host's "should this widget claim the gesture?" question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureDecision {
    /// Leave the gesture to an ancestor.
    Pass,
    /// Claim the gesture.
    Capture,
}

/// What a drag-move event means for the carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// Not ours (yet).
    Pass,
    /// The drag was claimed on this move. Carries the axis displacement.
    Captured(Offset),
    /// A claimed drag moved. Carries the axis displacement.
    Track(Offset),
}

impl MoveOutcome {
    /// The capture decision to report to the host.
    pub fn decision(&self) -> CaptureDecision {
        match self {
            MoveOutcome::Pass => CaptureDecision::Pass,
            MoveOutcome::Captured(_) | MoveOutcome::Track(_) => CaptureDecision::Capture,
        }
    }
}

/// What releasing a drag should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseDecision {
    /// The drag was never captured; nothing to do.
    NotCaptured,
    /// Too short: spring back to the anchor.
    Cancel,
    /// Move by one slide in the given direction (`+1` or `-1`).
    Advance(i64),
}

/// Ephemeral state of one drag, from start to release or cancel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    /// Where the pointer went down.
    pub origin: Offset,
    /// Latest pointer position.
    pub current: Offset,
    /// Lifecycle phase.
    pub phase: GesturePhase,
}

impl GestureSession {
    fn new(origin: Offset) -> Self {
        Self {
            origin,
            current: origin,
            phase: GesturePhase::Pending,
        }
    }

    /// Total pointer displacement since the drag started.
    pub fn displacement(&self) -> Offset {
        self.current - self.origin
    }
}

/// Interprets drags along one axis using the capture and action thresholds.
#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    axis: Axis,
    sign: f32,
    min_distance_to_capture: f32,
    min_distance_for_action: f32,
    session: Option<GestureSession>,
}

impl GestureInterpreter {
    /// Create an idle interpreter.
    ///
    /// `sign` is the layout direction sign for the axis (see
    /// [`direction_sign`](super::direction_sign)).
    pub fn new(axis: Axis, sign: f32, min_distance_to_capture: f32, min_distance_for_action: f32) -> Self {
        Self {
            axis,
            sign,
            min_distance_to_capture,
            min_distance_for_action,
            session: None,
        }
    }

    /// Current session phase.
    pub fn phase(&self) -> GesturePhase {
        self.session.map_or(GesturePhase::Idle, |session| session.phase)
    }

    /// Whether the carousel currently owns a drag.
    pub fn is_capturing(&self) -> bool {
        self.phase() == GesturePhase::Capturing
    }

    /// A pointer went down at `point`. Replaces any previous session.
    ///
    /// Returns `true` if the replaced session was still captured, which
    /// means its release was never reported.
    pub fn on_drag_start(&mut self, point: Offset) -> bool {
        let replaced_capture = self.is_capturing();
        if replaced_capture {
            tracing::debug!(target: targets::GESTURE, "drag start while capturing; restarting session");
        }
        self.session = Some(GestureSession::new(point));
        tracing::trace!(target: targets::GESTURE, ?point, "drag start");
        replaced_capture
    }

    /// The pointer moved to `point`.
    ///
    /// `enabled` is the caller's gesture predicate and `measured` reports
    /// whether the viewport size is known. A pending drag is claimed once its
    /// displacement along the axis exceeds the capture distance.
    pub fn on_drag_move(&mut self, point: Offset, enabled: bool, measured: bool) -> MoveOutcome {
        let axis = self.axis;
        let min_distance_to_capture = self.min_distance_to_capture;
        let Some(session) = self.session.as_mut() else {
            tracing::trace!(target: targets::GESTURE, ?point, "drag move without a session");
            return MoveOutcome::Pass;
        };
        session.current = point;
        let distance = session.displacement().component(axis).abs();

        let captured_now = match session.phase {
            GesturePhase::Capturing => false,
            GesturePhase::Pending if enabled && measured && distance > min_distance_to_capture => {
                session.phase = GesturePhase::Capturing;
                tracing::debug!(target: targets::GESTURE, distance, "gesture captured");
                true
            }
            _ => return MoveOutcome::Pass,
        };

        let displacement = Offset::along(axis, session.displacement().component(axis));
        if captured_now {
            MoveOutcome::Captured(displacement)
        } else {
            tracing::trace!(target: targets::GESTURE, ?displacement, "drag tracked");
            MoveOutcome::Track(displacement)
        }
    }

    /// The pointer was lifted at `point`.
    ///
    /// `extent` is the viewport size along the axis. A captured drag commits
    /// a one-slide move once it covers `min_distance_for_action × extent`.
    pub fn on_drag_end(&mut self, point: Offset, extent: f32) -> ReleaseDecision {
        let Some(session) = self.session.as_mut() else {
            return ReleaseDecision::NotCaptured;
        };
        if session.phase != GesturePhase::Capturing {
            session.phase = GesturePhase::Idle;
            return ReleaseDecision::NotCaptured;
        }
        session.current = point;
        session.phase = GesturePhase::Released;

        let correction = session.displacement().component(self.axis);
        let threshold = extent * self.min_distance_for_action;
        let decision = if correction == 0.0 || correction.abs() < threshold {
            ReleaseDecision::Cancel
        } else if correction > 0.0 {
            ReleaseDecision::Advance(self.sign as i64)
        } else {
            ReleaseDecision::Advance(-self.sign as i64)
        };
        tracing::debug!(target: targets::GESTURE, correction, threshold, ?decision, "drag released");
        decision
    }

    /// The host terminated the drag.
    ///
    /// Returns `true` if a captured drag was cancelled.
    pub fn on_drag_cancel(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let was_capturing = session.phase == GesturePhase::Capturing;
        session.phase = if was_capturing {
            GesturePhase::Cancelled
        } else {
            GesturePhase::Idle
        };
        if was_capturing {
            tracing::debug!(target: targets::GESTURE, "captured drag cancelled");
        }
        was_capturing
    }

    /// An ancestor asked to take the gesture over.
    ///
    /// Refused while the carousel owns the drag.
    pub fn on_termination_request(&self) -> bool {
        let allow = !self.is_capturing();
        if !allow {
            tracing::trace!(target: targets::GESTURE, "termination request refused");
        }
        allow
    }
}
