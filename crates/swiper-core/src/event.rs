#![forbid(unsafe_code)]

//! Pointer and navigation input types.
//!
//! The host delivers raw pointer events as [`PointerEvent`] values; the
//! carousel consumes the main-axis projection and a timestamp. Events are
//! deliberately minimal: hit testing, focus, and capture policies live in the
//! host, not here.

use bitflags::bitflags;
use web_time::Instant;

use crate::geometry::Point;

/// Phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Contact began.
    Down,
    /// Contact moved while held.
    Move,
    /// Contact ended normally.
    Up,
    /// Contact was taken away by the host (focus loss, palm rejection, ...).
    Cancel,
}

/// Where a pointer event originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// Direct touch contact.
    #[default]
    Touch,
    /// Mouse or trackpad.
    Mouse,
    /// Stylus / pen input.
    Pen,
}

bitflags! {
    /// Buttons held during a pointer event.
    ///
    /// Touch contacts report `PRIMARY`; mice report whichever buttons are
    /// down. Only `PRIMARY` participates in paging.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PointerButtons: u8 {
        /// Primary contact or left button.
        const PRIMARY = 1 << 0;
        /// Secondary (right) button.
        const SECONDARY = 1 << 1;
        /// Middle button.
        const MIDDLE = 1 << 2;
    }
}

impl PointerButtons {
    /// No buttons.
    pub const NONE: Self = Self::empty();
}

/// A raw pointer event delivered by the host input collaborator.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    /// Interaction phase.
    pub kind: PointerKind,
    /// Position in host coordinates.
    pub position: Point,
    /// When the event occurred.
    pub timestamp: Instant,
    /// Stable identifier of the contact (finger/stylus/mouse).
    pub pointer_id: u32,
    /// Input device class.
    pub source: SourceKind,
    /// Buttons held during the event.
    pub buttons: PointerButtons,
}

impl PointerEvent {
    /// Convenience constructor for a touch event with the primary contact.
    #[must_use]
    pub fn touch(kind: PointerKind, position: Point, timestamp: Instant) -> Self {
        Self {
            kind,
            position,
            timestamp,
            pointer_id: 0,
            source: SourceKind::Touch,
            buttons: PointerButtons::PRIMARY,
        }
    }
}

/// Navigation keys the carousel understands.
///
/// Kept local so the core does not depend on any particular input stack;
/// the host maps its own key codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    /// Navigate to the previous page.
    Previous,
    /// Navigate to the next page.
    Next,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_constructor_uses_primary_button() {
        let ev = PointerEvent::touch(PointerKind::Down, Point::new(1.0, 2.0), Instant::now());
        assert!(ev.buttons.contains(PointerButtons::PRIMARY));
        assert_eq!(ev.source, SourceKind::Touch);
        assert_eq!(ev.pointer_id, 0);
    }

    #[test]
    fn buttons_combine() {
        let b = PointerButtons::PRIMARY | PointerButtons::MIDDLE;
        assert!(b.contains(PointerButtons::PRIMARY));
        assert!(!b.contains(PointerButtons::SECONDARY));
    }
}
