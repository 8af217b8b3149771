#![forbid(unsafe_code)]

//! Discrete page-turn interpolation.
//!
//! [`Translate`] carries the offset from its release value to the chosen
//! page boundary over a configurable duration with an easing curve. Elapsed
//! time accumulates as [`Duration`] so there is no floating-point drift over
//! long animations.

use std::time::Duration;

use super::{Animation, EasingFn, ease_out_cubic};

/// Eased interpolation between two main-axis offsets.
#[derive(Debug, Clone, Copy)]
pub struct Translate {
    from: f32,
    to: f32,
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Translate {
    /// Interpolate from `from` to `to` over `duration`.
    ///
    /// A zero duration is bumped to one nanosecond so the animation
    /// completes on its first tick instead of dividing by zero.
    #[must_use]
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: ease_out_cubic,
        }
    }

    /// Set the easing curve.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Current interpolated offset.
    #[must_use]
    pub fn offset(&self) -> f32 {
        let t = (self.easing)(self.raw_progress());
        self.from + (self.to - self.from) * t
    }

    /// Destination offset.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f32 {
        self.to
    }

    /// Force completion.
    pub fn finish(&mut self) {
        self.elapsed = self.duration;
    }

    fn raw_progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }
}

impl Animation for Translate {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn progress(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }
}
