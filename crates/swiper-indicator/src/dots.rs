#![forbid(unsafe_code)]

//! Dot page-indicator model.
//!
//! Pure observer state: the model consumes [`SwiperEvent`]s by value and
//! exposes the data a dot renderer needs — which dot is active, and the
//! fractional hand-off between the active dot and its neighbor while a page
//! turn is in progress. It holds no reference to the carousel at all; the
//! host wires it to the hub (see [`attach`](DotIndicatorModel::attach)),
//! which keeps only a weak reference back to the model.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use swiper_core::hub::{EventKind, SubscriberToken, SwiperEvent};
use swiper_core::swiper::SwiperCore;

/// Observer model behind a dot page indicator.
#[derive(Debug, Clone)]
pub struct DotIndicatorModel {
    dot_count: usize,
    active: usize,
    fraction: f32,
    animating: bool,
    looping: bool,
}

impl DotIndicatorModel {
    /// Create a model for `dot_count` dots.
    #[must_use]
    pub fn new(dot_count: usize, looping: bool) -> Self {
        Self {
            dot_count,
            active: 0,
            fraction: 0.0,
            animating: false,
            looping,
        }
    }

    /// Number of dots.
    #[inline]
    #[must_use]
    pub fn dot_count(&self) -> usize {
        self.dot_count
    }

    /// The settled dot.
    #[inline]
    #[must_use]
    pub fn active_dot(&self) -> usize {
        self.active
    }

    /// Fractional progress toward the neighbor dot, in `[-1, 1]`.
    #[inline]
    #[must_use]
    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    /// Whether a page turn is animating.
    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Replace the dot count (content changed). Re-clamps the active dot.
    pub fn set_dot_count(&mut self, dot_count: usize) {
        self.dot_count = dot_count;
        if dot_count == 0 {
            self.active = 0;
        } else {
            self.active = self.active.min(dot_count - 1);
        }
        self.fraction = 0.0;
    }

    /// The dot the carousel is heading toward, given the current fraction.
    /// `None` while resting (fraction zero) or for an empty indicator.
    #[must_use]
    pub fn target_dot(&self) -> Option<usize> {
        if self.dot_count == 0 || self.fraction == 0.0 {
            return None;
        }
        let n = self.dot_count as i64;
        let step: i64 = if self.fraction > 0.0 { 1 } else { -1 };
        let raw = self.active as i64 + step;
        if self.looping {
            Some((((raw % n) + n) % n) as usize)
        } else if (0..n).contains(&raw) {
            Some(raw as usize)
        } else {
            None
        }
    }

    /// Highlight weight for one dot in `[0, 1]`: the active dot hands its
    /// weight to the target dot as the fraction grows.
    #[must_use]
    pub fn dot_weight(&self, dot: usize) -> f32 {
        if dot == self.active {
            return 1.0 - self.fraction.abs();
        }
        if Some(dot) == self.target_dot() {
            return self.fraction.abs();
        }
        0.0
    }

    /// Consume one carousel event.
    pub fn observe(&mut self, event: &SwiperEvent) {
        match *event {
            SwiperEvent::IndexChanged { index } => {
                self.active = self.clamp_dot(index);
                self.fraction = 0.0;
            }
            SwiperEvent::TurnPageRate { index, fraction } => {
                self.active = self.clamp_dot(index);
                self.fraction = fraction.clamp(-1.0, 1.0);
            }
            SwiperEvent::AnimationStart { .. } => self.animating = true,
            SwiperEvent::AnimationEnd { .. } => {
                self.animating = false;
                self.fraction = 0.0;
            }
        }
    }

    fn clamp_dot(&self, index: usize) -> usize {
        if self.dot_count == 0 {
            0
        } else {
            index.min(self.dot_count - 1)
        }
    }

    /// Wire a shared model to a carousel's event hub.
    ///
    /// The hub ends up holding only a [`Weak`] reference: dropping the model
    /// turns the subscriptions into no-ops, and the returned tokens let the
    /// host unsubscribe explicitly on teardown. The model itself never
    /// learns about the core — no reference cycle can form.
    pub fn attach(model: &Rc<RefCell<Self>>, core: &mut SwiperCore) -> Vec<SubscriberToken> {
        let kinds = [
            EventKind::IndexChanged,
            EventKind::TurnPageRate,
            EventKind::AnimationStart,
            EventKind::AnimationEnd,
        ];
        kinds
            .into_iter()
            .map(|kind| {
                let weak: Weak<RefCell<Self>> = Rc::downgrade(model);
                core.subscribe(kind, move |event| {
                    if let Some(model) = weak.upgrade() {
                        model.borrow_mut().observe(event);
                    }
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swiper_core::coordinator::AnimationKind;

    #[test]
    fn index_change_moves_active_dot() {
        let mut model = DotIndicatorModel::new(4, false);
        model.observe(&SwiperEvent::IndexChanged { index: 2 });
        assert_eq!(model.active_dot(), 2);
        assert!((model.fraction() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn rate_updates_fraction_and_target() {
        let mut model = DotIndicatorModel::new(4, false);
        model.observe(&SwiperEvent::TurnPageRate {
            index: 1,
            fraction: 0.4,
        });
        assert_eq!(model.active_dot(), 1);
        assert_eq!(model.target_dot(), Some(2));
        assert!((model.dot_weight(1) - 0.6).abs() < 1e-5);
        assert!((model.dot_weight(2) - 0.4).abs() < 1e-5);
        assert!((model.dot_weight(3) - 0.0).abs() < 1e-5);
    }

    #[test]
    fn backward_fraction_targets_previous_dot() {
        let mut model = DotIndicatorModel::new(4, false);
        model.observe(&SwiperEvent::TurnPageRate {
            index: 2,
            fraction: -0.3,
        });
        assert_eq!(model.target_dot(), Some(1));
    }

    #[test]
    fn looping_target_wraps() {
        let mut model = DotIndicatorModel::new(4, true);
        model.observe(&SwiperEvent::TurnPageRate {
            index: 3,
            fraction: 0.5,
        });
        assert_eq!(model.target_dot(), Some(0));

        model.observe(&SwiperEvent::TurnPageRate {
            index: 0,
            fraction: -0.5,
        });
        assert_eq!(model.target_dot(), Some(3));
    }

    #[test]
    fn non_looping_edge_has_no_target() {
        let mut model = DotIndicatorModel::new(4, false);
        model.observe(&SwiperEvent::TurnPageRate {
            index: 0,
            fraction: -0.2,
        });
        assert_eq!(model.target_dot(), None);
        // All weight stays on the active dot's neighborhood.
        assert!((model.dot_weight(0) - 0.8).abs() < 1e-5);
    }

    #[test]
    fn animation_end_resets_fraction() {
        let mut model = DotIndicatorModel::new(4, false);
        model.observe(&SwiperEvent::AnimationStart {
            kind: AnimationKind::Translate,
            from_index: 0,
            target_index: 1,
        });
        model.observe(&SwiperEvent::TurnPageRate {
            index: 0,
            fraction: 0.9,
        });
        assert!(model.is_animating());
        model.observe(&SwiperEvent::AnimationEnd {
            kind: AnimationKind::Translate,
            index: 1,
        });
        assert!(!model.is_animating());
        assert!((model.fraction() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn shrinking_count_reclamps() {
        let mut model = DotIndicatorModel::new(6, false);
        model.observe(&SwiperEvent::IndexChanged { index: 5 });
        model.set_dot_count(3);
        assert_eq!(model.active_dot(), 2);
    }

    #[test]
    fn empty_indicator_is_inert() {
        let mut model = DotIndicatorModel::new(0, false);
        model.observe(&SwiperEvent::IndexChanged { index: 3 });
        assert_eq!(model.active_dot(), 0);
        assert_eq!(model.target_dot(), None);
    }
}
