#![forbid(unsafe_code)]

//! Logical/display index arithmetic and ghost-pane planning.
//!
//! The carousel tracks a *logical* index that may run past either end of the
//! pane list while looping (drag past index 0 goes to -1, past the last page
//! to `total_count`). [`LoopIndexMapper`] is the single source of truth for
//! wrapping logicals into renderable *display* indices and for deciding
//! which extra ghost panes must be materialized at a loop boundary.
//!
//! # Invariants
//!
//! 1. `to_display` is idempotent: feeding its result back in returns the
//!    same value.
//! 2. With looping disabled, `next_target` never leaves `[0, total)`.
//! 3. Ghosts exist only while `looping && display_count < total_count`.
//!
//! # Failure Modes
//!
//! - `total_count == 0`: `to_display` returns 0 and no ghosts are planned;
//!   navigation degenerates to a no-op upstream.

/// Which way a page turn moves through the index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward lower indices.
    Backward,
    /// Toward higher indices.
    Forward,
}

impl Direction {
    /// Signed unit step.
    #[inline]
    #[must_use]
    pub const fn step(self) -> i64 {
        match self {
            Self::Backward => -1,
            Self::Forward => 1,
        }
    }
}

/// Ghost panes planned for the current settle position.
///
/// At most one per edge. `leading` renders before display index 0's slot;
/// `trailing` renders after the last realized slot. Each value is the
/// display index the ghost mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GhostPaneSet {
    /// Ghost ahead of the window (mirrors the ring's opposite extreme).
    pub leading: Option<usize>,
    /// Ghost behind the window.
    pub trailing: Option<usize>,
}

impl GhostPaneSet {
    /// No ghosts.
    pub const EMPTY: Self = Self {
        leading: None,
        trailing: None,
    };

    /// Number of planned ghosts.
    #[must_use]
    pub fn count(&self) -> usize {
        usize::from(self.leading.is_some()) + usize::from(self.trailing.is_some())
    }
}

/// Translates between logical and display index spaces.
#[derive(Debug, Clone)]
pub struct LoopIndexMapper {
    total_count: usize,
    looping: bool,
}

impl LoopIndexMapper {
    /// Create a mapper over `total_count` panes.
    #[must_use]
    pub fn new(total_count: usize, looping: bool) -> Self {
        Self {
            total_count,
            looping,
        }
    }

    /// Number of panes in the ring.
    #[inline]
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Whether the index space wraps.
    #[inline]
    #[must_use]
    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Replace the pane count (content changed).
    pub fn set_total_count(&mut self, total_count: usize) {
        self.total_count = total_count;
    }

    /// Enable or disable wraparound.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Wrap a logical index into `[0, total_count)`.
    ///
    /// Correct for negative logicals. Clamps instead of wrapping when
    /// looping is disabled. Returns 0 for an empty carousel.
    #[must_use]
    pub fn to_display(&self, logical: i64) -> usize {
        let n = self.total_count as i64;
        if n == 0 {
            return 0;
        }
        if self.looping {
            (((logical % n) + n) % n) as usize
        } else {
            logical.clamp(0, n - 1) as usize
        }
    }

    /// Normalize an arbitrary caller-supplied target into a valid logical
    /// index. Anything outside `[-total, 2 * total)` is clamped to the
    /// nearest end of that range before wrapping.
    #[must_use]
    pub fn clamp_target(&self, logical: i64) -> i64 {
        let n = self.total_count as i64;
        if n == 0 {
            return 0;
        }
        logical.clamp(-n, 2 * n - 1)
    }

    /// The logical index one page turn away, or `current` unchanged when a
    /// non-looping carousel is already at that boundary.
    #[must_use]
    pub fn next_target(&self, current: i64, direction: Direction) -> i64 {
        let n = self.total_count as i64;
        if n == 0 {
            return current;
        }
        let candidate = current + direction.step();
        if self.looping {
            return candidate;
        }
        if candidate < 0 || candidate >= n {
            current
        } else {
            candidate
        }
    }

    /// Like [`next_target`](Self::next_target) but stepping a whole group of
    /// `group_size` panes. The target snaps to a group start; when the group
    /// size does not evenly divide the pane count, the final group start is
    /// the last whole group's first pane.
    #[must_use]
    pub fn next_group_target(&self, current: i64, direction: Direction, group_size: usize) -> i64 {
        let n = self.total_count as i64;
        let group = group_size.max(1) as i64;
        if n == 0 || group >= n {
            return self.next_target(current, direction);
        }
        let candidate = current + direction.step() * group;
        if self.looping {
            return candidate;
        }
        let last_group_start = ((n - 1) / group) * group;
        candidate.clamp(0, last_group_start)
    }

    /// Plan ghost panes for the current settle position.
    ///
    /// The realized ring strip runs forward from `current_display`, so the
    /// seam sits at the strip boundary. The edge left short of a full ring
    /// gets one ghost: the leading edge while the visible window sits clear
    /// of the ring end, the trailing edge once the window abuts or wraps it.
    /// Only called on settle, never per animation tick: remounting ghosts is
    /// the expensive part, and the plan cannot change mid-animation.
    #[must_use]
    pub fn compute_ghost_panes(
        &self,
        current_display: usize,
        display_count: usize,
    ) -> GhostPaneSet {
        let n = self.total_count;
        if !self.looping || n == 0 || display_count == 0 || display_count >= n {
            return GhostPaneSet::EMPTY;
        }

        let current = current_display % n;
        if current + display_count < n {
            GhostPaneSet {
                leading: Some((current + n - 1) % n),
                trailing: None,
            }
        } else {
            GhostPaneSet {
                leading: None,
                trailing: Some((current + display_count) % n),
            }
        }
    }
}
