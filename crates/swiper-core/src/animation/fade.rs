#![forbid(unsafe_code)]

//! Opacity recovery for the fade edge effect.
//!
//! With [`EdgeEffect::Fade`](crate::config::EdgeEffect::Fade) the offset is
//! clamped at the boundary while overscroll dims the edge pane instead of
//! displacing it. [`EdgeFade`] plays on release, restoring full opacity.
//! The dimming applied *during* the drag is a pure function of overscroll
//! distance, computed by [`EdgeFade::opacity_for_overscroll`].

use std::time::Duration;

use super::{Animation, EasingFn, ease_out};

/// Opacity floor while overscrolling; the pane never fully vanishes.
const MIN_OPACITY: f32 = 0.3;

/// Recovery animation from a dimmed edge back to full opacity.
#[derive(Debug, Clone, Copy)]
pub struct EdgeFade {
    from: f32,
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl EdgeFade {
    /// Recover from `from` opacity back to 1.0 over `duration`.
    #[must_use]
    pub fn new(from: f32, duration: Duration) -> Self {
        Self {
            from: from.clamp(0.0, 1.0),
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: ease_out,
        }
    }

    /// Opacity applied while dragged `overscroll` units past the boundary of
    /// a page `page_extent` wide. Decays linearly to a floor at one full
    /// page of overscroll.
    #[must_use]
    pub fn opacity_for_overscroll(overscroll: f32, page_extent: f32) -> f32 {
        if page_extent <= f32::EPSILON {
            return 1.0;
        }
        let ratio = (overscroll.abs() / page_extent).min(1.0);
        1.0 - ratio * (1.0 - MIN_OPACITY)
    }

    /// Current opacity.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.from + (1.0 - self.from) * self.progress()
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

impl Animation for EdgeFade {
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
