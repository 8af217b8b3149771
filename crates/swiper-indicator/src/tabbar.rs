#![forbid(unsafe_code)]

//! Tab-bar observer model.
//!
//! Mirrors the carousel's continuous offset into a tab-bar highlight
//! position: `indicator_position()` is `active + fraction` in tab units, so
//! the underline glides between tabs exactly in step with the pages. Tab
//! activation flows the other way through the host: the model only decides
//! whether a click selects a new tab, the host forwards it to the carousel's
//! controller API.

use swiper_core::hub::SwiperEvent;

/// Observer model behind a tab bar synchronized with the carousel.
#[derive(Debug, Clone)]
pub struct TabBarModel {
    tab_count: usize,
    active: usize,
    fraction: f32,
}

impl TabBarModel {
    /// Create a model for `tab_count` tabs.
    #[must_use]
    pub fn new(tab_count: usize) -> Self {
        Self {
            tab_count,
            active: 0,
            fraction: 0.0,
        }
    }

    /// Number of tabs.
    #[inline]
    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.tab_count
    }

    /// The settled tab.
    #[inline]
    #[must_use]
    pub fn active_tab(&self) -> usize {
        self.active
    }

    /// Continuous highlight position in tab units: `active + fraction`.
    /// While the carousel sits still this is exactly the active tab index.
    #[must_use]
    pub fn indicator_position(&self) -> f32 {
        self.active as f32 + self.fraction
    }

    /// Select a tab directly (user clicked it). Returns `false` when the
    /// index is out of range or already active; on `true` the host forwards
    /// the selection to the carousel's `swipe_to`.
    pub fn select(&mut self, index: usize) -> bool {
        if self.tab_count == 0 {
            self.active = 0;
            return false;
        }
        let next = index.min(self.tab_count - 1);
        if next == self.active {
            return false;
        }
        #[cfg(feature = "tracing")]
        let old = self.active;
        self.active = next;
        self.fraction = 0.0;
        #[cfg(feature = "tracing")]
        Self::log_switch("select", old, self.active);
        true
    }

    #[cfg(feature = "tracing")]
    fn log_switch(reason: &str, from: usize, to: usize) {
        tracing::debug!(message = "tabbar.switch", reason, from, to);
    }

    /// Replace the tab count (content changed). Re-clamps the active tab.
    pub fn set_tab_count(&mut self, tab_count: usize) {
        self.tab_count = tab_count;
        if tab_count == 0 {
            self.active = 0;
        } else {
            self.active = self.active.min(tab_count - 1);
        }
        self.fraction = 0.0;
    }

    /// Consume one carousel event.
    pub fn observe(&mut self, event: &SwiperEvent) {
        match *event {
            SwiperEvent::IndexChanged { index } => {
                self.active = self.clamp_tab(index);
                self.fraction = 0.0;
            }
            SwiperEvent::TurnPageRate { index, fraction } => {
                self.active = self.clamp_tab(index);
                self.fraction = fraction.clamp(-1.0, 1.0);
            }
            SwiperEvent::AnimationStart { .. } => {}
            SwiperEvent::AnimationEnd { .. } => {
                self.fraction = 0.0;
            }
        }
    }

    fn clamp_tab(&self, index: usize) -> usize {
        if self.tab_count == 0 {
            0
        } else {
            index.min(self.tab_count - 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_glides_with_fraction() {
        let mut model = TabBarModel::new(4);
        model.observe(&SwiperEvent::TurnPageRate {
            index: 1,
            fraction: 0.25,
        });
        assert_eq!(model.active_tab(), 1);
        assert!((model.indicator_position() - 1.25).abs() < 1e-5);
    }

    #[test]
    fn settle_snaps_highlight() {
        let mut model = TabBarModel::new(4);
        model.observe(&SwiperEvent::TurnPageRate {
            index: 1,
            fraction: 0.8,
        });
        model.observe(&SwiperEvent::IndexChanged { index: 2 });
        assert!((model.indicator_position() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn select_reports_change_once() {
        let mut model = TabBarModel::new(4);
        assert!(model.select(2));
        assert!(!model.select(2), "reselecting the active tab is a no-op");
        assert_eq!(model.active_tab(), 2);
    }

    #[test]
    fn select_out_of_range_clamps() {
        let mut model = TabBarModel::new(4);
        assert!(model.select(99));
        assert_eq!(model.active_tab(), 3);
    }

    #[test]
    fn empty_tab_bar_rejects_selection() {
        let mut model = TabBarModel::new(0);
        assert!(!model.select(1));
        assert_eq!(model.active_tab(), 0);
    }

    #[test]
    fn count_change_reclamps() {
        let mut model = TabBarModel::new(5);
        model.select(4);
        model.set_tab_count(2);
        assert_eq!(model.active_tab(), 1);
        assert!((model.indicator_position() - 1.0).abs() < 1e-5);
    }
}
