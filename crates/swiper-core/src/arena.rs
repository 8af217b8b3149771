#![forbid(unsafe_code)]

//! Generation-checked pane storage.
//!
//! Panes are created and destroyed as the visible window moves, and stale
//! handles to recycled slots must never resolve to a new occupant. Each slot
//! carries a generation counter bumped on removal; a [`PaneHandle`] resolves
//! only while its generation matches. The arena is scoped to one carousel
//! instance — there is no process-wide registry.
//!
//! # Invariants
//!
//! 1. A handle returned by [`insert`](PaneArena::insert) resolves until the
//!    pane is removed, regardless of other insertions/removals.
//! 2. After [`remove`](PaneArena::remove), the handle (and any copy of it)
//!    never resolves again, even if the slot is reused.
//! 3. `len()` equals the number of live panes.

use crate::pane::Pane;

/// Stable, generation-checked reference to a pane slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaneHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    pane: Option<Pane>,
}

/// Slot arena owning every realized pane (visible, cached, and ghosts).
#[derive(Debug, Default)]
pub struct PaneArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl PaneArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arena with room for `capacity` panes before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live panes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the arena holds no panes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Insert a pane, returning its handle.
    pub fn insert(&mut self, pane: Pane) -> PaneHandle {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.pane = Some(pane);
            return PaneHandle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            pane: Some(pane),
        });
        PaneHandle {
            index,
            generation: 0,
        }
    }

    /// Remove a pane. Returns the pane if the handle was live.
    pub fn remove(&mut self, handle: PaneHandle) -> Option<Pane> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let pane = slot.pane.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        Some(pane)
    }

    /// Resolve a handle to its pane.
    #[must_use]
    pub fn get(&self, handle: PaneHandle) -> Option<&Pane> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.pane.as_ref()
    }

    /// Resolve a handle to its pane, mutably.
    pub fn get_mut(&mut self, handle: PaneHandle) -> Option<&mut Pane> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.pane.as_mut()
    }

    /// Remove every pane, invalidating all outstanding handles.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.pane.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.live = 0;
    }

    /// Iterate over live panes.
    pub fn iter(&self) -> impl Iterator<Item = (PaneHandle, &Pane)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.pane.as_ref().map(|pane| {
                (
                    PaneHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    pane,
                )
            })
        })
    }
}
