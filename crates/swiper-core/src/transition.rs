#![forbid(unsafe_code)]

//! User-supplied transition handling.
//!
//! When a custom transition is registered, the core keeps computing correct
//! pane positions but delegates visual interpolation to the handler. The
//! handler talks back through a [`TransitionProxy`]: it reads the flight
//! parameters and reports completion or cancellation. The core commits the
//! target index when the proxy reports completion *or* the configured
//! timeout elapses — the custom flight is the one animation whose timing
//! source the core does not own, so the timeout is the backstop that keeps
//! a stalled handler from wedging the carousel.

use std::time::Duration;

/// Flight parameters and completion channel handed to a custom transition.
#[derive(Debug)]
pub struct TransitionProxy {
    from_index: usize,
    target_index: usize,
    offset: f32,
    finished: bool,
    cancelled: bool,
}

impl TransitionProxy {
    pub(crate) fn new(from_index: usize, target_index: usize, offset: f32) -> Self {
        Self {
            from_index,
            target_index,
            offset,
            finished: false,
            cancelled: false,
        }
    }

    /// Display index the flight started from.
    #[inline]
    #[must_use]
    pub fn from_index(&self) -> usize {
        self.from_index
    }

    /// Display index the flight is heading to.
    #[inline]
    #[must_use]
    pub fn target_index(&self) -> usize {
        self.target_index
    }

    /// Main-axis offset at the moment the flight began.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Report the transition finished; the core commits the target index.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Abort the transition; the core stays on the origin index.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Whether the handler reported completion.
    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the handler aborted.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// A user-supplied transition driver.
///
/// `begin` runs once when a flight starts; `frame` runs every frame until
/// the proxy reports completion/cancellation or the timeout fires. Handlers
/// own their visual interpolation entirely; the core only watches the proxy.
pub trait CustomTransition {
    /// A flight is starting.
    fn begin(&mut self, proxy: &mut TransitionProxy);

    /// Advance one frame.
    fn frame(&mut self, proxy: &mut TransitionProxy, dt: Duration);

    /// The flight is being torn down (pre-emption, timeout, or unmount
    /// before completion). Informational; the proxy is already resolved.
    fn end(&mut self) {}
}

/// Registered handler plus its timeout policy.
pub struct TransitionRegistration {
    /// The driver.
    pub handler: Box<dyn CustomTransition>,
    /// How long the core waits for the proxy before committing anyway.
    /// Zero means commit immediately on start.
    pub timeout: Duration,
}

impl std::fmt::Debug for TransitionRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionRegistration")
            .field("timeout", &self.timeout)
            .finish()
    }
}
