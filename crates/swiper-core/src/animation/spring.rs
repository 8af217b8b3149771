#![forbid(unsafe_code)]

//! Damped harmonic oscillator pulling an overscrolled offset back to its
//! boundary.
//!
//! Classical damped spring equation:
//!
//!   F = -stiffness × (offset - target) - damping × velocity
//!
//! The release velocity of the drag seeds the spring's initial velocity, so
//! a hard outward fling visibly stretches further before snapping back.
//!
//! # Integration
//!
//! Semi-implicit Euler. Large frame deltas are subdivided into at most 4ms
//! steps so high stiffness values stay numerically stable.
//!
//! # Invariants
//!
//! 1. A spring at rest does not resume on further ticks.
//! 2. The spring settles exactly on its target (`offset() == target` once
//!    at rest), so a settle never leaves a sub-pixel residue.
//! 3. Stiffness is clamped to a positive minimum; damping to non-negative.

use std::time::Duration;

use super::Animation;
use crate::config::SpringParams;

/// Maximum dt per integration step (4ms); larger deltas are subdivided.
const MAX_STEP_SECS: f64 = 0.004;

/// Offset delta (host units) below which the spring is considered at rest.
const REST_THRESHOLD: f64 = 0.5;

/// Velocity (host units/sec) below which, combined with the offset
/// threshold, the spring is at rest.
const VELOCITY_THRESHOLD: f64 = 4.0;

/// Minimum stiffness to prevent degenerate springs.
const MIN_STIFFNESS: f64 = 0.1;

/// A damped spring over the carousel's main-axis offset.
#[derive(Debug, Clone)]
pub struct Spring {
    offset: f64,
    velocity: f64,
    target: f64,
    initial: f64,
    stiffness: f64,
    damping: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring from `offset` toward `target`, seeded with the drag's
    /// release velocity.
    #[must_use]
    pub fn new(params: SpringParams, offset: f32, target: f32, release_velocity: f32) -> Self {
        Self {
            offset: f64::from(offset),
            velocity: f64::from(release_velocity),
            target: f64::from(target),
            initial: f64::from(offset),
            stiffness: params.stiffness.max(MIN_STIFFNESS),
            damping: params.damping.max(0.0),
            at_rest: false,
        }
    }

    /// Current main-axis offset.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> f32 {
        self.offset as f32
    }

    /// Current velocity.
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f32 {
        self.velocity as f32
    }

    /// Target offset.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f32 {
        self.target as f32
    }

    /// Force the spring to its target immediately.
    pub fn finish(&mut self) {
        self.offset = self.target;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    fn step(&mut self, dt: f64) {
        let displacement = self.offset - self.target;
        let spring_force = -self.stiffness * displacement;
        let damping_force = -self.damping * self.velocity;
        let acceleration = spring_force + damping_force;

        self.velocity += acceleration * dt;
        self.offset += self.velocity * dt;
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let total_secs = dt.as_secs_f64();
        if total_secs <= 0.0 {
            return;
        }

        let mut remaining = total_secs;
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        if (self.offset - self.target).abs() < REST_THRESHOLD
            && self.velocity.abs() < VELOCITY_THRESHOLD
        {
            self.finish();
        }
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    /// Fraction of the initial displacement recovered so far.
    fn progress(&self) -> f32 {
        let total = (self.initial - self.target).abs();
        if total < f64::EPSILON {
            return 1.0;
        }
        let remaining = (self.offset - self.target).abs();
        ((1.0 - remaining / total) as f32).clamp(0.0, 1.0)
    }
}
