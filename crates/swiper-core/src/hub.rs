#![forbid(unsafe_code)]

//! Publish/subscribe surface keeping indicator, tab-bar, and application
//! observers in lock-step with the carousel.
//!
//! Handlers are plain `FnMut` closures held in registration order per event
//! kind, with explicit unsubscribe tokens — no shared-pointer callback
//! swapping, no owning back-references. [`TurnPageRate`] is the only event
//! published every animation tick; the others fire once per logical
//! transition.
//!
//! # Invariants
//!
//! 1. Handlers for one kind run in registration order.
//! 2. A handler registered during a publish does not see that publish.
//! 3. A panicking handler never prevents later handlers from running, and
//!    never propagates into the animation tick loop: the panic is caught
//!    and the handler is dropped from the list.
//!
//! [`TurnPageRate`]: SwiperEvent::TurnPageRate

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::coordinator::AnimationKind;

/// Observable event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The settled index changed (or a jump was reported).
    IndexChanged,
    /// A terminal animation began.
    AnimationStart,
    /// A terminal animation completed or was force-finished.
    AnimationEnd,
    /// Per-tick fractional page progress.
    TurnPageRate,
}

const KIND_COUNT: usize = 4;

impl EventKind {
    #[inline]
    fn lane(self) -> usize {
        match self {
            Self::IndexChanged => 0,
            Self::AnimationStart => 1,
            Self::AnimationEnd => 2,
            Self::TurnPageRate => 3,
        }
    }
}

/// Event payloads published by the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwiperEvent {
    /// The settled display index changed.
    IndexChanged {
        /// New settled display index.
        index: usize,
    },
    /// A terminal animation began.
    AnimationStart {
        /// Which driver is running.
        kind: AnimationKind,
        /// Settled display index when the flight began.
        from_index: usize,
        /// Display index the flight is heading to (equals `from_index` for
        /// edge effects).
        target_index: usize,
    },
    /// A terminal animation completed.
    AnimationEnd {
        /// Which driver settled.
        kind: AnimationKind,
        /// Settled display index after the flight.
        index: usize,
    },
    /// Continuous page progress, published every animation or drag tick.
    TurnPageRate {
        /// Display index the fraction is relative to.
        index: usize,
        /// Fractional progress in `[-1, 1]`; positive values move toward
        /// higher indices.
        fraction: f32,
    },
}

impl SwiperEvent {
    /// The kind lane this event publishes on.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::IndexChanged { .. } => EventKind::IndexChanged,
            Self::AnimationStart { .. } => EventKind::AnimationStart,
            Self::AnimationEnd { .. } => EventKind::AnimationEnd,
            Self::TurnPageRate { .. } => EventKind::TurnPageRate,
        }
    }
}

/// Token returned by [`subscribe`](ChangeEventHub::subscribe); pass to
/// [`unsubscribe`](ChangeEventHub::unsubscribe) on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberToken {
    kind: EventKind,
    id: u64,
}

type Handler = Box<dyn FnMut(&SwiperEvent)>;

struct Entry {
    id: u64,
    handler: Handler,
}

/// Ordered subscriber lists, one lane per event kind.
#[derive(Default)]
pub struct ChangeEventHub {
    lanes: [Vec<Entry>; KIND_COUNT],
    next_id: u64,
}

impl std::fmt::Debug for ChangeEventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeEventHub")
            .field("index_changed", &self.lanes[0].len())
            .field("animation_start", &self.lanes[1].len())
            .field("animation_end", &self.lanes[2].len())
            .field("turn_page_rate", &self.lanes[3].len())
            .finish()
    }
}

impl ChangeEventHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind.
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&SwiperEvent) + 'static,
    ) -> SubscriberToken {
        let id = self.next_id;
        self.next_id += 1;
        self.lanes[kind.lane()].push(Entry {
            id,
            handler: Box::new(handler),
        });
        SubscriberToken { kind, id }
    }

    /// Remove a handler. Returns `true` if it was still registered.
    pub fn unsubscribe(&mut self, token: SubscriberToken) -> bool {
        let lane = &mut self.lanes[token.kind.lane()];
        let before = lane.len();
        lane.retain(|entry| entry.id != token.id);
        lane.len() != before
    }

    /// Number of live subscribers for a kind.
    #[must_use]
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.lanes[kind.lane()].len()
    }

    /// Deliver an event to every subscriber of its kind, in registration
    /// order. A panicking handler is caught, dropped, and the remaining
    /// handlers still run.
    pub fn publish(&mut self, event: &SwiperEvent) {
        let lane = &mut self.lanes[event.kind().lane()];
        let snapshot_len = lane.len();
        let mut poisoned: Vec<u64> = Vec::new();
        for entry in lane.iter_mut().take(snapshot_len) {
            let result = catch_unwind(AssertUnwindSafe(|| (entry.handler)(event)));
            if result.is_err() {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    message = "hub.handler_panicked",
                    kind = ?event.kind(),
                    id = entry.id,
                );
                poisoned.push(entry.id);
            }
        }
        if !poisoned.is_empty() {
            lane.retain(|entry| !poisoned.contains(&entry.id));
        }
    }
}
