#![forbid(unsafe_code)]

//! Terminal-animation state machine.
//!
//! Exactly one animation drives the carousel at a time. The active driver
//! lives in a single tagged [`AnimationState`], so "one animation active"
//! is a type-level invariant rather than a convention spread across
//! boolean flags.
//!
//! # State Machine
//!
//! ```text
//! Idle ──start_translate──▶ Translate ──complete──▶ Idle (index committed)
//! Idle ──start_spring─────▶ Spring    ──rest──────▶ Idle (index unchanged)
//! Idle ──start_fade───────▶ Fade      ──complete──▶ Idle (index unchanged)
//! Idle ──start_custom─────▶ Custom    ──proxy/timeout─▶ Idle (committed
//!                                                        unless cancelled)
//! any  ──preempt (touch-down) / finish──▶ Idle
//! ```
//!
//! # Invariants
//!
//! 1. `preempt()` always lands in `Idle` and reports the offset reached, so
//!    the caller can seed the new drag baseline. No rollback.
//! 2. `finish()` resolves the active flight completely: a translate/custom
//!    flight still reports its commit target.
//! 3. Starting any animation replaces whatever was active (last-writer-wins
//!    for re-entrant requests).

use std::time::Duration;

use crate::animation::{Animation, EdgeFade, Spring, Translate};
use crate::config::SpringParams;
use crate::transition::{TransitionProxy, TransitionRegistration};

/// Discriminant-only view of the animation state, used in event payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    /// No animation active.
    None,
    /// Spring edge effect.
    Spring,
    /// Fade edge effect.
    Fade,
    /// Discrete page translate.
    Translate,
    /// User-supplied transition.
    Custom,
}

/// A translate flight toward a logical target index.
#[derive(Debug, Clone)]
pub struct TranslateFlight {
    /// Offset interpolation.
    pub anim: Translate,
    /// Logical index committed on completion.
    pub target_logical: i64,
}

/// A custom-transition flight; the handler owns timing, the core owns the
/// timeout backstop.
#[derive(Debug)]
pub struct CustomFlight {
    /// Completion channel shared with the handler.
    pub proxy: TransitionProxy,
    /// Logical index committed on completion.
    pub target_logical: i64,
    elapsed: Duration,
    timeout: Duration,
}

/// The single active animation.
#[derive(Debug, Default)]
pub enum AnimationState {
    /// Nothing active.
    #[default]
    Idle,
    /// Spring edge effect in flight.
    Spring(Spring),
    /// Fade recovery in flight.
    Fade(EdgeFade),
    /// Page translate in flight.
    Translate(TranslateFlight),
    /// Custom transition in flight.
    Custom(CustomFlight),
}

impl AnimationState {
    /// Discriminant for event payloads.
    #[must_use]
    pub fn kind(&self) -> AnimationKind {
        match self {
            Self::Idle => AnimationKind::None,
            Self::Spring(_) => AnimationKind::Spring,
            Self::Fade(_) => AnimationKind::Fade,
            Self::Translate(_) => AnimationKind::Translate,
            Self::Custom(_) => AnimationKind::Custom,
        }
    }
}

/// What one coordinator tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickResult {
    /// No animation active; nothing happened.
    Idle,
    /// The animation advanced; the carousel's visual state this frame.
    Running {
        /// Main-axis offset the stack should render at.
        offset: f32,
        /// Opacity of the edge pane (1.0 unless the fade effect is active).
        opacity: f32,
    },
    /// The animation reached its end this tick.
    Settled(Settlement),
}

/// Terminal outcome of a flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    /// Which animation settled.
    pub kind: AnimationKind,
    /// Logical index to commit, if the flight targeted one.
    pub target_logical: Option<i64>,
    /// False when a custom flight was cancelled by its handler: the core
    /// stays on the origin index.
    pub committed: bool,
}

/// Offset snapshot taken when touch input pre-empts an animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreemptSnapshot {
    /// Offset the interrupted animation had reached; the new drag baseline.
    pub offset: f32,
    /// Kind that was interrupted ([`AnimationKind::None`] if idle).
    pub interrupted: AnimationKind,
}

/// Drives exactly one of the terminal animations.
#[derive(Debug, Default)]
pub struct AnimationCoordinator {
    state: AnimationState,
    transition: Option<TransitionRegistration>,
}

impl AnimationCoordinator {
    /// Create an idle coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    /// Discriminant of the current state.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> AnimationKind {
        self.state.kind()
    }

    /// Whether any animation is in flight.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, AnimationState::Idle)
    }

    /// Register (or replace) the custom transition handler.
    pub fn set_transition(&mut self, registration: Option<TransitionRegistration>) {
        self.transition = registration;
    }

    /// Whether a custom transition handler is registered.
    #[inline]
    #[must_use]
    pub fn has_transition(&self) -> bool {
        self.transition.is_some()
    }

    /// Begin a page translate from `from_offset` to `to_offset`.
    pub fn start_translate(
        &mut self,
        from_offset: f32,
        to_offset: f32,
        target_logical: i64,
        duration: Duration,
    ) {
        self.state = AnimationState::Translate(TranslateFlight {
            anim: Translate::new(from_offset, to_offset, duration),
            target_logical,
        });
    }

    /// Begin the spring edge effect from an out-of-bounds offset.
    pub fn start_spring(&mut self, params: SpringParams, offset: f32, release_velocity: f32) {
        self.state = AnimationState::Spring(Spring::new(params, offset, 0.0, release_velocity));
    }

    /// Begin the fade recovery from a dimmed edge.
    pub fn start_fade(&mut self, from_opacity: f32, duration: Duration) {
        self.state = AnimationState::Fade(EdgeFade::new(from_opacity, duration));
    }

    /// Begin a custom flight. The handler's `begin` runs immediately; a
    /// zero timeout resolves the flight on its first tick without waiting
    /// for the handler.
    pub fn start_custom(
        &mut self,
        from_index: usize,
        target_index: usize,
        target_logical: i64,
        offset: f32,
    ) {
        let Some(registration) = self.transition.as_mut() else {
            return;
        };
        let mut proxy = TransitionProxy::new(from_index, target_index, offset);
        registration.handler.begin(&mut proxy);
        self.state = AnimationState::Custom(CustomFlight {
            proxy,
            target_logical,
            elapsed: Duration::ZERO,
            timeout: registration.timeout,
        });
    }

    /// Touch input takes over: snapshot the reached offset and go idle.
    pub fn preempt(&mut self) -> PreemptSnapshot {
        let interrupted = self.state.kind();
        let offset = match std::mem::take(&mut self.state) {
            AnimationState::Idle => 0.0,
            AnimationState::Spring(spring) => spring.offset(),
            // Fade clamps the offset at the boundary.
            AnimationState::Fade(_) => 0.0,
            AnimationState::Translate(flight) => flight.anim.offset(),
            AnimationState::Custom(flight) => {
                if let Some(registration) = self.transition.as_mut() {
                    registration.handler.end();
                }
                flight.proxy.offset()
            }
        };
        PreemptSnapshot {
            offset,
            interrupted,
        }
    }

    /// Force the active flight to complete now.
    pub fn finish(&mut self) -> Option<Settlement> {
        match std::mem::take(&mut self.state) {
            AnimationState::Idle => None,
            AnimationState::Spring(_) => Some(Settlement {
                kind: AnimationKind::Spring,
                target_logical: None,
                committed: true,
            }),
            AnimationState::Fade(_) => Some(Settlement {
                kind: AnimationKind::Fade,
                target_logical: None,
                committed: true,
            }),
            AnimationState::Translate(flight) => Some(Settlement {
                kind: AnimationKind::Translate,
                target_logical: Some(flight.target_logical),
                committed: true,
            }),
            AnimationState::Custom(flight) => {
                if let Some(registration) = self.transition.as_mut() {
                    registration.handler.end();
                }
                Some(Settlement {
                    kind: AnimationKind::Custom,
                    target_logical: Some(flight.target_logical),
                    committed: !flight.proxy.is_cancelled(),
                })
            }
        }
    }

    /// Advance the active animation by `dt`.
    pub fn tick(&mut self, dt: Duration) -> TickResult {
        match &mut self.state {
            AnimationState::Idle => TickResult::Idle,
            AnimationState::Spring(spring) => {
                spring.tick(dt);
                if spring.is_complete() {
                    self.state = AnimationState::Idle;
                    TickResult::Settled(Settlement {
                        kind: AnimationKind::Spring,
                        target_logical: None,
                        committed: true,
                    })
                } else {
                    TickResult::Running {
                        offset: spring.offset(),
                        opacity: 1.0,
                    }
                }
            }
            AnimationState::Fade(fade) => {
                fade.tick(dt);
                if fade.is_complete() {
                    self.state = AnimationState::Idle;
                    TickResult::Settled(Settlement {
                        kind: AnimationKind::Fade,
                        target_logical: None,
                        committed: true,
                    })
                } else {
                    TickResult::Running {
                        offset: 0.0,
                        opacity: fade.opacity(),
                    }
                }
            }
            AnimationState::Translate(flight) => {
                flight.anim.tick(dt);
                if flight.anim.is_complete() {
                    let target = flight.target_logical;
                    self.state = AnimationState::Idle;
                    TickResult::Settled(Settlement {
                        kind: AnimationKind::Translate,
                        target_logical: Some(target),
                        committed: true,
                    })
                } else {
                    TickResult::Running {
                        offset: flight.anim.offset(),
                        opacity: 1.0,
                    }
                }
            }
            AnimationState::Custom(flight) => {
                flight.elapsed = flight.elapsed.saturating_add(dt);
                let timed_out = flight.elapsed >= flight.timeout;
                if !timed_out
                    && !flight.proxy.is_finished()
                    && !flight.proxy.is_cancelled()
                    && let Some(registration) = self.transition.as_mut()
                {
                    registration.handler.frame(&mut flight.proxy, dt);
                }
                if flight.proxy.is_finished() || flight.proxy.is_cancelled() || timed_out {
                    let target = flight.target_logical;
                    let committed = !flight.proxy.is_cancelled();
                    self.state = AnimationState::Idle;
                    if let Some(registration) = self.transition.as_mut() {
                        registration.handler.end();
                    }
                    TickResult::Settled(Settlement {
                        kind: AnimationKind::Custom,
                        target_logical: Some(target),
                        committed,
                    })
                } else {
                    TickResult::Running {
                        offset: flight.proxy.offset(),
                        opacity: 1.0,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::CustomTransition;

    const MS_16: Duration = Duration::from_millis(16);

    #[test]
    fn idle_tick_is_noop() {
        let mut coord = AnimationCoordinator::new();
        assert_eq!(coord.tick(MS_16), TickResult::Idle);
        assert!(!coord.is_active());
    }

    #[test]
    fn translate_runs_then_settles_with_target() {
        let mut coord = AnimationCoordinator::new();
        coord.start_translate(-40.0, -100.0, 1, Duration::from_millis(100));
        assert_eq!(coord.kind(), AnimationKind::Translate);

        let mut settled = None;
        for _ in 0..20 {
            match coord.tick(MS_16) {
                TickResult::Settled(s) => {
                    settled = Some(s);
                    break;
                }
                TickResult::Running { .. } => {}
                TickResult::Idle => panic!("went idle without settling"),
            }
        }
        let s = settled.expect("translate must settle");
        assert_eq!(s.kind, AnimationKind::Translate);
        assert_eq!(s.target_logical, Some(1));
        assert!(s.committed);
        assert!(!coord.is_active());
    }

    #[test]
    fn spring_settles_without_target() {
        let mut coord = AnimationCoordinator::new();
        coord.start_spring(SpringParams::default(), 60.0, 0.0);
        let mut settled = None;
        for _ in 0..400 {
            if let TickResult::Settled(s) = coord.tick(MS_16) {
                settled = Some(s);
                break;
            }
        }
        let s = settled.expect("spring must come to rest");
        assert_eq!(s.kind, AnimationKind::Spring);
        assert_eq!(s.target_logical, None);
    }

    #[test]
    fn preempt_reports_reached_offset() {
        let mut coord = AnimationCoordinator::new();
        coord.start_translate(0.0, -100.0, 1, Duration::from_millis(300));
        coord.tick(MS_16);
        coord.tick(MS_16);
        let snapshot = coord.preempt();
        assert_eq!(snapshot.interrupted, AnimationKind::Translate);
        assert!(snapshot.offset < 0.0 && snapshot.offset > -100.0);
        assert!(!coord.is_active());
    }

    #[test]
    fn preempt_idle_is_zero() {
        let mut coord = AnimationCoordinator::new();
        let snapshot = coord.preempt();
        assert_eq!(snapshot.interrupted, AnimationKind::None);
        assert!((snapshot.offset - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn start_replaces_active_flight() {
        let mut coord = AnimationCoordinator::new();
        coord.start_translate(0.0, -100.0, 1, Duration::from_millis(300));
        coord.start_translate(-20.0, -100.0, 2, Duration::from_millis(300));
        let AnimationState::Translate(flight) = coord.state() else {
            panic!("expected translate");
        };
        assert_eq!(flight.target_logical, 2);
    }

    #[test]
    fn finish_translate_reports_commit() {
        let mut coord = AnimationCoordinator::new();
        coord.start_translate(0.0, -100.0, 3, Duration::from_millis(300));
        let s = coord.finish().expect("settlement");
        assert_eq!(s.target_logical, Some(3));
        assert!(!coord.is_active());
        assert!(coord.finish().is_none());
    }

    struct RecordingTransition {
        begun: u32,
        frames: u32,
        finish_after: Option<u32>,
        cancel_after: Option<u32>,
    }

    impl RecordingTransition {
        fn new() -> Self {
            Self {
                begun: 0,
                frames: 0,
                finish_after: None,
                cancel_after: None,
            }
        }
    }

    impl CustomTransition for RecordingTransition {
        fn begin(&mut self, _proxy: &mut TransitionProxy) {
            self.begun += 1;
        }

        fn frame(&mut self, proxy: &mut TransitionProxy, _dt: Duration) {
            self.frames += 1;
            if self.finish_after.is_some_and(|n| self.frames >= n) {
                proxy.finish();
            }
            if self.cancel_after.is_some_and(|n| self.frames >= n) {
                proxy.cancel();
            }
        }
    }

    fn register(coord: &mut AnimationCoordinator, handler: RecordingTransition, timeout: Duration) {
        coord.set_transition(Some(TransitionRegistration {
            handler: Box::new(handler),
            timeout,
        }));
    }

    #[test]
    fn custom_commits_when_handler_finishes() {
        let mut coord = AnimationCoordinator::new();
        let mut handler = RecordingTransition::new();
        handler.finish_after = Some(3);
        register(&mut coord, handler, Duration::from_secs(10));
        coord.start_custom(0, 2, 2, -10.0);

        let mut settled = None;
        for _ in 0..10 {
            if let TickResult::Settled(s) = coord.tick(MS_16) {
                settled = Some(s);
                break;
            }
        }
        let s = settled.expect("custom must settle");
        assert_eq!(s.kind, AnimationKind::Custom);
        assert_eq!(s.target_logical, Some(2));
        assert!(s.committed);
    }

    #[test]
    fn custom_cancel_does_not_commit() {
        let mut coord = AnimationCoordinator::new();
        let mut handler = RecordingTransition::new();
        handler.cancel_after = Some(2);
        register(&mut coord, handler, Duration::from_secs(10));
        coord.start_custom(0, 2, 2, 0.0);

        let mut settled = None;
        for _ in 0..10 {
            if let TickResult::Settled(s) = coord.tick(MS_16) {
                settled = Some(s);
                break;
            }
        }
        assert!(!settled.expect("must settle").committed);
    }

    #[test]
    fn custom_zero_timeout_settles_first_tick() {
        let mut coord = AnimationCoordinator::new();
        register(&mut coord, RecordingTransition::new(), Duration::ZERO);
        coord.start_custom(0, 2, 2, 0.0);
        let TickResult::Settled(s) = coord.tick(MS_16) else {
            panic!("zero timeout must settle on the first tick");
        };
        assert_eq!(s.target_logical, Some(2));
        assert!(s.committed);
    }

    #[test]
    fn custom_without_registration_stays_idle() {
        let mut coord = AnimationCoordinator::new();
        coord.start_custom(0, 2, 2, 0.0);
        assert!(!coord.is_active());
    }
}
