//! Spring physics for settle animations.
//!
//! A damped harmonic oscillator integrated with semi-implicit Euler at a
//! fixed step, which stays stable for the stiffness range used by UI springs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::widget::carousel::Offset;

/// Fixed integration step.
const INTEGRATION_STEP: f32 = 0.004;

/// Spring animation tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Stiffness constant. Higher values settle faster.
    pub stiffness: f32,
    /// Damping ratio. 1.0 = critically damped, < 1.0 = bouncy, > 1.0 = sluggish.
    pub damping_ratio: f32,
    /// Mass of the moving strip.
    pub mass: f32,
    /// Speed (units per second) below which the spring may come to rest.
    pub velocity_threshold: f32,
    /// Distance from the target below which the spring may come to rest.
    pub position_threshold: f32,
}

impl SpringConfig {
    /// A critically damped spring.
    pub const fn default_spring() -> Self {
        Self {
            stiffness: 170.0,
            damping_ratio: 1.0,
            mass: 1.0,
            velocity_threshold: 0.5,
            position_threshold: 0.5,
        }
    }

    /// A bouncy spring that overshoots before settling.
    pub const fn bouncy() -> Self {
        Self {
            damping_ratio: 0.5,
            ..Self::default_spring()
        }
    }

    /// A stiff spring (fast, no bounce).
    pub const fn stiff() -> Self {
        Self {
            stiffness: 600.0,
            ..Self::default_spring()
        }
    }

    /// Damping coefficient derived from the ratio, stiffness and mass.
    #[inline]
    pub fn damping(&self) -> f32 {
        2.0 * self.damping_ratio * (self.stiffness * self.mass).sqrt()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::default_spring()
    }
}

/// Position and velocity of a spring in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringMotion {
    /// Current position.
    pub position: Offset,
    /// Current velocity, in units per second.
    pub velocity: Offset,
    /// Rest position.
    pub target: Offset,
}

impl SpringMotion {
    /// Start from `position` at rest, heading for `target`.
    pub fn new(position: Offset, target: Offset) -> Self {
        Self {
            position,
            velocity: Offset::ZERO,
            target,
        }
    }

    /// Whether the spring is close enough to its target to stop.
    pub fn is_at_rest(&self, config: &SpringConfig) -> bool {
        self.velocity.length() <= config.velocity_threshold
            && (self.target - self.position).length() <= config.position_threshold
    }

    /// Advance the simulation by `dt`.
    ///
    /// Returns `true` once the spring has come to rest; the position is then
    /// snapped exactly onto the target.
    pub fn step(&mut self, config: &SpringConfig, dt: Duration) -> bool {
        let stiffness = config.stiffness;
        let damping = config.damping();
        let mass = config.mass;

        let mut remaining = dt.as_secs_f32();
        while remaining > 0.0 {
            let h = remaining.min(INTEGRATION_STEP);
            let displacement = self.position - self.target;

            // F = -k * x - c * v
            let ax = (-stiffness * displacement.x - damping * self.velocity.x) / mass;
            let ay = (-stiffness * displacement.y - damping * self.velocity.y) / mass;

            self.velocity = Offset::new(self.velocity.x + ax * h, self.velocity.y + ay * h);
            self.position = Offset::new(
                self.position.x + self.velocity.x * h,
                self.position.y + self.velocity.y * h,
            );
            remaining -= h;
        }

        if self.is_at_rest(config) {
            self.position = self.target;
            self.velocity = Offset::ZERO;
            true
        } else {
            false
        }
    }
}
