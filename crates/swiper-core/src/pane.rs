#![forbid(unsafe_code)]

//! Pane bookkeeping: per-pane spans and the ordered position map.
//!
//! [`PaneGeometryModel`] is the single place that knows how large panes are
//! on the main axis. It consumes measured extents from the layout
//! collaborator; the core walks slots with these strides to produce an
//! [`ItemPositionMap`] for whichever display indices are currently realized.
//! Ghost panes get their spans through the same path so a loop boundary
//! crossing renders seamlessly.
//!
//! # Invariants
//!
//! 1. For adjacent realized display indices `i`, `i+1` in a settled map:
//!    `end(i) + item_space == start(i+1)` (transiently violated mid-drag,
//!    restored on settle).
//! 2. Measured extents are stable for a display index within one settle
//!    cycle; re-measurement only happens when content changes.

use std::collections::BTreeMap;

use ahash::AHashMap;

use crate::arena::PaneHandle;
use crate::geometry::Span;

/// One realized page/child of the carousel.
#[derive(Debug, Clone, PartialEq)]
pub struct Pane {
    /// Unwrapped index; may be negative or `>= total_count` while looping.
    pub logical_index: i64,
    /// Wrapped index in `[0, total_count)`.
    pub display_index: usize,
    /// Current main-axis span.
    pub span: Span,
    /// Opacity in `[0, 1]`; only the fade edge effect lowers this.
    pub opacity: f32,
    /// Whether this pane is a ghost mirroring the opposite loop extreme.
    pub is_ghost: bool,
}

impl Pane {
    /// Create a fully opaque, non-ghost pane.
    #[must_use]
    pub fn new(logical_index: i64, display_index: usize, span: Span) -> Self {
        Self {
            logical_index,
            display_index,
            span,
            opacity: 1.0,
            is_ghost: false,
        }
    }

    /// Mark this pane as a loop-boundary ghost.
    #[must_use]
    pub fn ghost(mut self) -> Self {
        self.is_ghost = true;
        self
    }
}

/// Ordered mapping from display index to the realized pane's handle.
///
/// Ordered iteration is part of the contract: the layout collaborator walks
/// entries in display order to verify adjacency. Ghost panes are not listed
/// here; they are owned separately by the core and never exposed.
pub type ItemPositionMap = BTreeMap<usize, PaneHandle>;

/// Measured main-axis extents plus stride computation.
#[derive(Debug)]
pub struct PaneGeometryModel {
    /// Extent per display index, from the layout collaborator.
    extents: AHashMap<usize, f32>,
    /// Fallback extent for panes not yet measured.
    default_extent: f32,
    /// Gap between adjacent panes.
    item_space: f32,
}

impl PaneGeometryModel {
    /// Create a model with the given fallback extent and item spacing.
    #[must_use]
    pub fn new(default_extent: f32, item_space: f32) -> Self {
        Self {
            extents: AHashMap::new(),
            default_extent: default_extent.max(1.0),
            item_space: item_space.max(0.0),
        }
    }

    /// Record the measured extent for a display index.
    ///
    /// Non-finite or non-positive sizes are ignored (the fallback stays in
    /// effect), matching the "always prefer a valid state" policy.
    pub fn set_measured_extent(&mut self, display_index: usize, extent: f32) {
        if extent.is_finite() && extent > 0.0 {
            self.extents.insert(display_index, extent);
        }
    }

    /// Drop all measurements (content changed wholesale).
    pub fn clear_measurements(&mut self) {
        self.extents.clear();
    }

    /// Extent of one pane at `display_index`.
    #[must_use]
    pub fn extent(&self, display_index: usize) -> f32 {
        self.extents
            .get(&display_index)
            .copied()
            .unwrap_or(self.default_extent)
    }

    /// Gap between adjacent panes.
    #[inline]
    #[must_use]
    pub fn item_space(&self) -> f32 {
        self.item_space
    }

    /// Update the gap between adjacent panes.
    pub fn set_item_space(&mut self, item_space: f32) {
        self.item_space = item_space.max(0.0);
    }

    /// Distance travelled when paging past the pane at `display_index`:
    /// its extent plus one gap.
    #[must_use]
    pub fn page_stride(&self, display_index: usize) -> f32 {
        self.extent(display_index) + self.item_space
    }

    /// Span of a pane whose leading edge sits at `start`.
    #[must_use]
    pub fn span_at(&self, display_index: usize, start: f32) -> Span {
        Span::new(start, start + self.extent(display_index))
    }
}
