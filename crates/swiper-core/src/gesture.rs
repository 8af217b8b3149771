#![forbid(unsafe_code)]

//! Drag recognition: transforms raw pointer events into main-axis deltas
//! and a release velocity.
//!
//! [`DragController`] is a stateful processor. During a drag it produces a
//! continuous delta per move event; on release it produces one velocity
//! sample, estimated over a rolling window of recent samples, which the core
//! uses to pick the terminal animation.
//!
//! # Invariants
//!
//! 1. At most one pointer drives a drag; events from other pointers are
//!    ignored while a drag is tracking.
//! 2. A release whose total displacement stays under the tap slop reports
//!    [`ReleaseOutcome::Tap`] with zero velocity, never a fling.
//! 3. `on_cancel` behaves like a release with zero velocity but never
//!    reports a tap.
//!
//! # Failure Modes
//!
//! - A move or up without a preceding down is a defensive no-op.
//! - Samples with non-monotonic timestamps contribute zero velocity rather
//!   than a spike.

use std::time::Duration;

use web_time::Instant;

use crate::config::GestureConfig;
use crate::event::{PointerEvent, PointerKind};
use crate::geometry::{Axis, Point};

/// Upper bound on retained velocity samples.
const MAX_SAMPLES: usize = 8;

/// What a finished drag resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleaseOutcome {
    /// Displacement stayed under the tap slop: treat as a click, not a page
    /// turn.
    Tap,
    /// A real drag ended; `velocity` is the signed main-axis release
    /// velocity in units/sec.
    Release {
        /// Signed main-axis velocity at release.
        velocity: f32,
    },
}

/// Rolling-window velocity estimate over recent pointer samples.
#[derive(Debug, Clone)]
struct VelocityTracker {
    window: Duration,
    samples: Vec<(Instant, f32)>,
}

impl VelocityTracker {
    fn new(window: Duration) -> Self {
        Self {
            window,
            samples: Vec::with_capacity(MAX_SAMPLES),
        }
    }

    fn reset(&mut self) {
        self.samples.clear();
    }

    fn push(&mut self, timestamp: Instant, position: f32) {
        if self.samples.len() == MAX_SAMPLES {
            self.samples.remove(0);
        }
        self.samples.push((timestamp, position));
        // Drop samples that have aged out of the window.
        let newest = timestamp;
        self.samples
            .retain(|(t, _)| newest.saturating_duration_since(*t) <= self.window);
    }

    fn velocity(&self) -> f32 {
        let (Some(&(t0, p0)), Some(&(t1, p1))) = (self.samples.first(), self.samples.last())
        else {
            return 0.0;
        };
        let dt = t1.saturating_duration_since(t0).as_secs_f32();
        if dt <= f32::EPSILON {
            return 0.0;
        }
        (p1 - p0) / dt
    }
}

/// An axis-aligned region (e.g. the indicator's bounds) that must not have
/// its touches stolen by the pager gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayRegion {
    /// Top-left corner.
    pub min: Point,
    /// Bottom-right corner.
    pub max: Point,
}

impl OverlayRegion {
    /// Create a region from opposite corners.
    #[must_use]
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Whether a point falls inside the region.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

#[derive(Debug)]
struct DragTracker {
    pointer_id: u32,
    start_main: f32,
    last_main: f32,
    velocity: VelocityTracker,
}

/// Converts a pointer-event stream into drag deltas and a release velocity.
#[derive(Debug)]
pub struct DragController {
    config: GestureConfig,
    axis: Axis,
    active: Option<DragTracker>,
}

impl DragController {
    /// Create a controller for the given axis.
    #[must_use]
    pub fn new(config: GestureConfig, axis: Axis) -> Self {
        Self {
            config,
            axis,
            active: None,
        }
    }

    /// Whether a drag is currently tracking.
    #[inline]
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.active.is_some()
    }

    /// Change the scroll axis. Aborts any drag in progress.
    pub fn set_axis(&mut self, axis: Axis) {
        self.axis = axis;
        self.active = None;
    }

    /// Begin tracking a drag. Returns `true` if the pointer was claimed
    /// (the caller should pre-empt any running animation).
    pub fn on_down(&mut self, event: &PointerEvent) -> bool {
        debug_assert_eq!(event.kind, PointerKind::Down);
        if self.active.is_some() {
            // Second finger: outside the configured finger count, ignored.
            return false;
        }
        let main = self.axis.main(event.position);
        let mut velocity = VelocityTracker::new(self.config.velocity_window);
        velocity.push(event.timestamp, main);
        self.active = Some(DragTracker {
            pointer_id: event.pointer_id,
            start_main: main,
            last_main: main,
            velocity,
        });
        true
    }

    /// Continue a drag. Returns the main-axis displacement since the last
    /// move, or `None` when the event does not belong to the tracked drag.
    pub fn on_move(&mut self, event: &PointerEvent) -> Option<f32> {
        let tracker = self.active.as_mut()?;
        if tracker.pointer_id != event.pointer_id {
            return None;
        }
        let main = self.axis.main(event.position);
        let delta = main - tracker.last_main;
        tracker.last_main = main;
        tracker.velocity.push(event.timestamp, main);
        Some(delta)
    }

    /// Finish a drag, producing the release outcome.
    pub fn on_up(&mut self, event: &PointerEvent) -> Option<ReleaseOutcome> {
        let tracker = self.active.as_ref()?;
        if tracker.pointer_id != event.pointer_id {
            return None;
        }
        let mut tracker = self.active.take()?;
        let main = self.axis.main(event.position);
        tracker.velocity.push(event.timestamp, main);

        if (main - tracker.start_main).abs() < self.config.tap_slop {
            return Some(ReleaseOutcome::Tap);
        }
        Some(ReleaseOutcome::Release {
            velocity: tracker.velocity.velocity(),
        })
    }

    /// Abort a drag (focus loss, host-side capture). Velocity is zero, and
    /// the outcome is never a tap.
    pub fn on_cancel(&mut self) -> Option<ReleaseOutcome> {
        self.active.take()?;
        Some(ReleaseOutcome::Release { velocity: 0.0 })
    }

    /// Whether a release at this velocity should fling to the next page
    /// rather than settling by distance.
    #[must_use]
    pub fn is_fling(&self, velocity: f32) -> bool {
        velocity.abs() >= self.config.fling_velocity_threshold
    }
}
