#![forbid(unsafe_code)]

//! Tuning knobs for the carousel.
//!
//! All curves and constants that product/theming would want to tune live
//! here rather than being baked into the state machine: the rubber-band
//! attenuation, the spring constants, the fling threshold, and the terminal
//! animation duration.

use std::time::Duration;

use crate::geometry::Axis;

/// Which edge effect plays when a non-looping carousel is released while
/// dragged past its first or last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeEffect {
    /// Rubber-band back to the boundary with a damped spring.
    #[default]
    Spring,
    /// Clamp the offset at the boundary and decay opacity with overscroll.
    Fade,
    /// Hard stop: offset clamps, no animation plays.
    None,
}

/// Spring constants for the overscroll edge effect.
///
/// Defaults are slightly overdamped so the stack returns to the boundary
/// without visible oscillation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    /// Restoring force strength. Typical UI range: 100-400.
    pub stiffness: f64,
    /// Velocity drag. Critical damping is `2 * sqrt(stiffness)`.
    pub damping: f64,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: 228.0,
            damping: 30.0,
        }
    }
}

/// Thresholds for drag and fling recognition.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Displacement (in host units) below which a release is a tap, not a
    /// drag (default: 4.0).
    pub tap_slop: f32,
    /// Minimum release velocity (units/sec) for a fling to advance a page
    /// regardless of distance dragged (default: 600.0).
    pub fling_velocity_threshold: f32,
    /// Time window over which release velocity is estimated (default: 100ms).
    pub velocity_window: Duration,
    /// Number of simultaneous contacts that drive paging (default: 1).
    /// Events from additional contacts are ignored.
    pub finger_count: u8,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_slop: 4.0,
            fling_velocity_threshold: 600.0,
            velocity_window: Duration::from_millis(100),
            finger_count: 1,
        }
    }
}

/// Top-level carousel configuration.
#[derive(Debug, Clone)]
pub struct SwiperConfig {
    /// Scroll axis.
    pub axis: Axis,
    /// Whether the index space wraps around.
    pub looping: bool,
    /// Panes visible per page (>= 1).
    pub display_count: usize,
    /// When `display_count > 1`, whether navigation advances by a whole
    /// group instead of one pane.
    pub swipe_by_group: bool,
    /// Main-axis gap between adjacent panes.
    pub item_space: f32,
    /// Panes kept realized beyond the visible window on each side.
    pub cached_count: usize,
    /// Duration of the discrete translate animation (default: 300ms).
    pub translate_duration: Duration,
    /// Duration of the fade edge effect recovery (default: 250ms).
    pub fade_duration: Duration,
    /// Edge effect policy for non-looping overscroll.
    pub edge_effect: EdgeEffect,
    /// Spring constants used when `edge_effect` is [`EdgeEffect::Spring`].
    pub spring: SpringParams,
    /// Resistance applied while dragging out of bounds. The effective drag
    /// delta is `delta / (1 + resistance * overscroll / page_extent)`;
    /// higher values stiffen the rubber band sooner.
    pub overdrag_resistance: f32,
    /// Ignore pointer input entirely (programmatic navigation still works).
    pub disable_swipe: bool,
    /// Advance to the next page automatically at this interval when idle.
    pub autoplay_interval: Option<Duration>,
    /// Stop autoplay permanently after the first user drag.
    pub stop_autoplay_on_interaction: bool,
    /// Gesture thresholds.
    pub gesture: GestureConfig,
}

impl Default for SwiperConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            looping: false,
            display_count: 1,
            swipe_by_group: false,
            item_space: 0.0,
            cached_count: 1,
            translate_duration: Duration::from_millis(300),
            fade_duration: Duration::from_millis(250),
            edge_effect: EdgeEffect::Spring,
            spring: SpringParams::default(),
            overdrag_resistance: 3.0,
            disable_swipe: false,
            autoplay_interval: None,
            stop_autoplay_on_interaction: true,
            gesture: GestureConfig::default(),
        }
    }
}

impl SwiperConfig {
    /// Set the scroll axis.
    #[must_use]
    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// Enable or disable loop wraparound.
    #[must_use]
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Set panes visible per page. Clamped to a minimum of 1.
    #[must_use]
    pub fn display_count(mut self, count: usize) -> Self {
        self.display_count = count.max(1);
        self
    }

    /// Advance by whole groups when `display_count > 1`.
    #[must_use]
    pub fn swipe_by_group(mut self, by_group: bool) -> Self {
        self.swipe_by_group = by_group;
        self
    }

    /// Set the gap between adjacent panes.
    #[must_use]
    pub fn item_space(mut self, space: f32) -> Self {
        self.item_space = space.max(0.0);
        self
    }

    /// Set the edge effect policy.
    #[must_use]
    pub fn edge_effect(mut self, effect: EdgeEffect) -> Self {
        self.edge_effect = effect;
        self
    }

    /// Set the translate animation duration.
    #[must_use]
    pub fn translate_duration(mut self, duration: Duration) -> Self {
        self.translate_duration = duration;
        self
    }

    /// Enable autoplay at the given interval.
    #[must_use]
    pub fn autoplay(mut self, interval: Duration) -> Self {
        self.autoplay_interval = Some(interval);
        self
    }

    /// Disable pointer-driven paging.
    #[must_use]
    pub fn disable_swipe(mut self, disable: bool) -> Self {
        self.disable_swipe = disable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = SwiperConfig::default();
        assert_eq!(cfg.display_count, 1);
        assert!(!cfg.looping);
        assert_eq!(cfg.edge_effect, EdgeEffect::Spring);
        assert!(cfg.autoplay_interval.is_none());
    }

    #[test]
    fn display_count_clamped_to_one() {
        let cfg = SwiperConfig::default().display_count(0);
        assert_eq!(cfg.display_count, 1);
    }

    #[test]
    fn negative_item_space_clamped() {
        let cfg = SwiperConfig::default().item_space(-5.0);
        assert!((cfg.item_space - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn builder_chain() {
        let cfg = SwiperConfig::default()
            .looping(true)
            .display_count(3)
            .swipe_by_group(true)
            .autoplay(Duration::from_secs(3));
        assert!(cfg.looping);
        assert_eq!(cfg.display_count, 3);
        assert!(cfg.swipe_by_group);
        assert_eq!(cfg.autoplay_interval, Some(Duration::from_secs(3)));
    }
}
