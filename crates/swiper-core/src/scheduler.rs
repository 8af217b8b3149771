#![forbid(unsafe_code)]

//! Frame-scheduler abstraction.
//!
//! The carousel never sleeps and never assumes a frame interval: when it
//! needs another tick it asks the host for one via [`FrameScheduler`], and
//! the host calls [`SwiperCore::on_frame`](crate::SwiperCore::on_frame)
//! with the elapsed delta when the frame fires. Cancellation is synchronous
//! — once [`cancel_frame`](FrameScheduler::cancel_frame) returns, the
//! request will not fire, so a torn-down core can never receive a stale
//! tick.

use std::cell::RefCell;
use std::rc::Rc;

/// Handle to one pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest(u64);

/// Host-side animation scheduler.
pub trait FrameScheduler {
    /// Ask for one frame callback.
    fn request_frame(&mut self) -> FrameRequest;

    /// Withdraw a pending request. Must take effect before returning.
    fn cancel_frame(&mut self, request: FrameRequest);
}

#[derive(Debug, Default)]
struct ManualInner {
    next: u64,
    pending: Vec<u64>,
}

/// A hand-driven scheduler for tests and simple hosts.
///
/// Clones share one request queue (the carousel owns one clone, the driver
/// another). The driver checks [`has_pending`](Self::has_pending), pops with
/// [`take_fired`](Self::take_fired), and calls the core's frame entry point
/// itself. Single-threaded by design, like everything in this crate.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualInner>>,
}

impl ManualScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any frame request is outstanding.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().pending.is_empty()
    }

    /// Number of outstanding requests.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Consume all outstanding requests, "firing" them. The caller is
    /// responsible for invoking the core's frame entry point once.
    pub fn take_fired(&self) -> usize {
        let mut inner = self.inner.borrow_mut();
        let fired = inner.pending.len();
        inner.pending.clear();
        fired
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next;
        inner.next += 1;
        inner.pending.push(id);
        FrameRequest(id)
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.inner.borrow_mut().pending.retain(|&id| id != request.0);
    }
}
