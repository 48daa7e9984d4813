//! The index state machine: the only place the active index changes.

use horizon_carousel_core::logging::targets;

/// Outcome of planning a transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPlan {
    /// Nothing to do: no slides, unmeasured viewport, or a zero delta.
    Ignored,
    /// The request ran into a boundary; settle back to the current anchor.
    Bounce,
    /// The active index moves.
    Commit {
        /// Index before the transition.
        from: usize,
        /// Index after the transition.
        to: usize,
        /// Signed slide distance actually travelled, after wrap-around.
        effective_delta: i64,
    },
}

/// Owns the active index and validates every requested move against the
/// slide count and loop mode.
#[derive(Debug, Clone)]
pub struct IndexStateMachine {
    active: usize,
    count: usize,
    looping: bool,
}

impl IndexStateMachine {
    /// Create a state machine.
    ///
    /// `initial` is clamped into `[0, count - 1]`.
    pub fn new(initial: usize, count: usize, looping: bool) -> Self {
        let mut machine = Self {
            active: 0,
            count,
            looping,
        };
        machine.active = machine.clamp(initial);
        machine
    }

    /// The active index (0 when there are no slides).
    #[inline]
    pub fn active(&self) -> usize {
        self.active
    }

    /// Number of slides.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether there are no slides.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether the active slide is the first one and navigation cannot wrap.
    pub fn is_first(&self) -> bool {
        !self.looping && self.active == 0
    }

    /// Whether the active slide is the last one and navigation cannot wrap.
    pub fn is_last(&self) -> bool {
        !self.looping && self.active + 1 >= self.count
    }

    fn clamp(&self, index: usize) -> usize {
        index.min(self.count.saturating_sub(1))
    }

    /// Update the slide count.
    ///
    /// Returns the new active index if it had to be clamped.
    pub fn set_count(&mut self, count: usize) -> Option<usize> {
        self.count = count;
        let clamped = self.clamp(self.active);
        if clamped != self.active {
            tracing::debug!(
                target: targets::INDEX,
                from = self.active,
                to = clamped,
                count,
                "active index clamped after slide count change"
            );
            self.active = clamped;
            Some(clamped)
        } else {
            None
        }
    }

    /// Signed distance from the active index to `index`.
    ///
    /// Indexes too large for an `i64` are reduced modulo the count when
    /// looping and pinned past the last slide otherwise.
    pub fn delta_to(&self, index: usize) -> i64 {
        let target = match i64::try_from(index) {
            Ok(target) => target,
            Err(_) if self.looping && self.count > 0 => {
                i64::try_from(index % self.count).unwrap_or(i64::MAX)
            }
            Err(_) => i64::MAX,
        };
        target.saturating_sub(self.active as i64)
    }

    /// Work out what a request to move `delta` slides should do.
    ///
    /// `measured` reports whether the viewport size is known; nothing moves
    /// until it is.
    pub fn plan(&self, delta: i64, measured: bool) -> TransitionPlan {
        if self.count == 0 || !measured || delta == 0 {
            return TransitionPlan::Ignored;
        }

        let count = self.count as i64;
        let active = self.active as i64;
        let mut effective_delta = delta;

        if active <= 0 && delta < 0 {
            if !self.looping {
                return TransitionPlan::Bounce;
            }
            effective_delta = count + delta;
        } else if active + 1 >= count && delta > 0 {
            if !self.looping {
                return TransitionPlan::Bounce;
            }
            effective_delta = delta - active - 1;
        }

        // Requests larger than one lap still have to land on a real slide.
        // Widened so any i64 delta lands exactly.
        let mut target = i128::from(active) + i128::from(effective_delta);
        if !(0..i128::from(count)).contains(&target) {
            target = if self.looping {
                target.rem_euclid(i128::from(count))
            } else {
                target.clamp(0, i128::from(count) - 1)
            };
        }
        let target = target as i64;
        effective_delta = target - active;

        if effective_delta == 0 {
            return TransitionPlan::Bounce;
        }

        TransitionPlan::Commit {
            from: self.active,
            to: target as usize,
            effective_delta,
        }
    }

    /// Plan a move and, if it commits, apply it immediately.
    pub fn request(&mut self, delta: i64, measured: bool) -> TransitionPlan {
        let plan = self.plan(delta, measured);
        match plan {
            TransitionPlan::Commit {
                from,
                to,
                effective_delta,
            } => {
                tracing::debug!(target: targets::INDEX, from, to, effective_delta, "index committed");
                self.active = to;
            }
            TransitionPlan::Bounce => {
                tracing::debug!(target: targets::INDEX, active = self.active, delta, "boundary bounce");
            }
            TransitionPlan::Ignored => {
                tracing::trace!(target: targets::INDEX, delta, measured, count = self.count, "request ignored");
            }
        }
        plan
    }
}
