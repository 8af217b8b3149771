#![forbid(unsafe_code)]

//! The carousel core: index/offset state machine and gesture-to-animation
//! pipeline.
//!
//! [`SwiperCore`] owns the pane geometry, the loop mapper, the drag
//! controller, the animation coordinator, and the event hub. The host feeds
//! it pointer events and frame ticks; it publishes index changes and
//! per-tick page progress for the indicator and tab-bar to mirror.
//!
//! # Frame protocol
//!
//! Within one frame the host delivers gesture input first, then calls
//! [`on_frame`](SwiperCore::on_frame) with the elapsed delta. The core
//! requests frames through its [`FrameScheduler`] only while something needs
//! ticking (an active animation, or autoplay), and withdraws the request
//! synchronously when it goes idle — a torn-down core never receives a
//! stale tick.
//!
//! # Offset convention
//!
//! `current_offset` is the main-axis translation of the pane stack relative
//! to the settled page. Dragging toward the next page moves content in the
//! negative direction, so the published turn-page-rate fraction is
//! `-offset / stride`: positive fractions move toward higher indices.

use std::time::Duration;

use crate::animation::EdgeFade;
use crate::arena::{PaneArena, PaneHandle};
use crate::config::{EdgeEffect, SwiperConfig};
use crate::coordinator::{AnimationCoordinator, AnimationKind, Settlement, TickResult};
use crate::event::{NavKey, PointerEvent, PointerKind};
use crate::gesture::{DragController, OverlayRegion, ReleaseOutcome};
use crate::hub::{ChangeEventHub, EventKind, SubscriberToken, SwiperEvent};
use crate::loop_index::{Direction, GhostPaneSet, LoopIndexMapper};
use crate::pane::{ItemPositionMap, Pane, PaneGeometryModel};
use crate::scheduler::{FrameRequest, FrameScheduler};
use crate::transition::{CustomTransition, TransitionRegistration};

/// Ghost panes currently materialized at the loop seam.
#[derive(Debug, Default, Clone, Copy)]
struct GhostHandles {
    leading: Option<PaneHandle>,
    trailing: Option<PaneHandle>,
}

/// The carousel core state machine.
pub struct SwiperCore {
    config: SwiperConfig,
    mapper: LoopIndexMapper,
    geometry: PaneGeometryModel,
    arena: PaneArena,
    positions: ItemPositionMap,
    ghost_plan: GhostPaneSet,
    ghosts: GhostHandles,
    gesture: DragController,
    coordinator: AnimationCoordinator,
    hub: ChangeEventHub,
    scheduler: Box<dyn FrameScheduler>,
    frame_request: Option<FrameRequest>,
    overlays: Vec<OverlayRegion>,

    current_index: usize,
    current_offset: f32,
    target_index: Option<i64>,
    /// Fire `IndexChanged` at the next settle even if the display index is
    /// unchanged (programmatic jump semantics).
    report_settle: bool,
    /// Virtual overscroll while the fade edge effect clamps the offset.
    overscroll_accum: f32,
    edge_opacity: f32,
    layout_dirty: bool,

    autoplay_elapsed: Duration,
    autoplay_stopped: bool,
}

impl std::fmt::Debug for SwiperCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwiperCore")
            .field("current_index", &self.current_index)
            .field("current_offset", &self.current_offset)
            .field("target_index", &self.target_index)
            .field("animation", &self.coordinator.kind())
            .field("total_count", &self.mapper.total_count())
            .finish()
    }
}

impl SwiperCore {
    /// Create a core over `total_count` panes.
    ///
    /// `default_extent` is the main-axis size assumed for panes the layout
    /// collaborator has not measured yet.
    #[must_use]
    pub fn new(
        config: SwiperConfig,
        total_count: usize,
        default_extent: f32,
        scheduler: Box<dyn FrameScheduler>,
    ) -> Self {
        let mapper = LoopIndexMapper::new(total_count, config.looping);
        let geometry = PaneGeometryModel::new(default_extent, config.item_space);
        let gesture = DragController::new(config.gesture.clone(), config.axis);
        let ghost_plan = mapper.compute_ghost_panes(0, config.display_count);
        let mut core = Self {
            config,
            mapper,
            geometry,
            arena: PaneArena::new(),
            positions: ItemPositionMap::new(),
            ghost_plan,
            ghosts: GhostHandles::default(),
            gesture,
            coordinator: AnimationCoordinator::new(),
            hub: ChangeEventHub::new(),
            scheduler,
            frame_request: None,
            overlays: Vec::new(),
            current_index: 0,
            current_offset: 0.0,
            target_index: None,
            report_settle: false,
            overscroll_accum: 0.0,
            edge_opacity: 1.0,
            layout_dirty: true,
            autoplay_elapsed: Duration::ZERO,
            autoplay_stopped: false,
        };
        core.sync_frame_request();
        core
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The settled display index.
    #[inline]
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Continuous offset not yet folded into the settled index.
    #[inline]
    #[must_use]
    pub fn current_offset(&self) -> f32 {
        self.current_offset
    }

    /// Logical target while a terminal animation is in flight.
    #[inline]
    #[must_use]
    pub fn target_index(&self) -> Option<i64> {
        self.target_index
    }

    /// Which animation is currently driving, if any.
    #[inline]
    #[must_use]
    pub fn animation_kind(&self) -> AnimationKind {
        self.coordinator.kind()
    }

    /// Whether a terminal animation is in flight.
    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.coordinator.is_active()
    }

    /// Whether a drag is tracking.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_tracking()
    }

    /// Number of panes.
    #[inline]
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.mapper.total_count()
    }

    /// Current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SwiperConfig {
        &self.config
    }

    /// Opacity of the edge pane (lowered only by the fade edge effect).
    #[inline]
    #[must_use]
    pub fn edge_opacity(&self) -> f32 {
        self.edge_opacity
    }

    /// Ghost plan for the current settle position.
    #[inline]
    #[must_use]
    pub fn ghost_plan(&self) -> GhostPaneSet {
        self.ghost_plan
    }

    /// Mutable access to the geometry model (layout collaborator boundary).
    pub fn geometry_mut(&mut self) -> &mut PaneGeometryModel {
        self.layout_dirty = true;
        &mut self.geometry
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    /// Register an observer for one event kind.
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&SwiperEvent) + 'static,
    ) -> SubscriberToken {
        self.hub.subscribe(kind, handler)
    }

    /// Remove an observer.
    pub fn unsubscribe(&mut self, token: SubscriberToken) -> bool {
        self.hub.unsubscribe(token)
    }

    // -----------------------------------------------------------------------
    // Content changes
    // -----------------------------------------------------------------------

    /// Replace the pane count. The settled index re-clamps; `IndexChanged`
    /// fires only if the clamp moved it.
    pub fn set_total_count(&mut self, total_count: usize) {
        self.finish_animation();
        self.mapper.set_total_count(total_count);
        self.geometry.clear_measurements();
        let clamped = if total_count == 0 {
            0
        } else {
            self.current_index.min(total_count - 1)
        };
        let moved = clamped != self.current_index;
        self.current_index = clamped;
        self.current_offset = 0.0;
        self.recompute_ghosts();
        self.layout_dirty = true;
        if moved {
            self.publish(SwiperEvent::IndexChanged { index: clamped });
        }
    }

    /// Enable or disable loop wraparound.
    pub fn set_looping(&mut self, looping: bool) {
        self.finish_animation();
        self.config.looping = looping;
        self.mapper.set_looping(looping);
        self.recompute_ghosts();
        self.layout_dirty = true;
    }

    /// Register (or clear) the user-supplied transition handler.
    pub fn set_custom_transition(
        &mut self,
        handler: Option<Box<dyn CustomTransition>>,
        timeout: Duration,
    ) {
        self.coordinator
            .set_transition(handler.map(|handler| TransitionRegistration { handler, timeout }));
    }

    /// Register a child overlay (e.g. the indicator's bounds) whose touches
    /// must not start a pager drag.
    pub fn register_overlay(&mut self, region: OverlayRegion) {
        self.overlays.push(region);
    }

    /// Drop all registered overlays.
    pub fn clear_overlays(&mut self) {
        self.overlays.clear();
    }

    // -----------------------------------------------------------------------
    // Pointer input
    // -----------------------------------------------------------------------

    /// Feed one raw pointer event.
    pub fn on_pointer(&mut self, event: &PointerEvent) {
        if self.config.disable_swipe {
            return;
        }
        match event.kind {
            PointerKind::Down => self.on_down(event),
            PointerKind::Move => {
                if let Some(delta) = self.gesture.on_move(event) {
                    self.update_offset(delta);
                }
            }
            PointerKind::Up => {
                if let Some(outcome) = self.gesture.on_up(event) {
                    self.on_release(outcome);
                }
            }
            PointerKind::Cancel => {
                if let Some(outcome) = self.gesture.on_cancel() {
                    self.on_release(outcome);
                }
            }
        }
    }

    fn on_down(&mut self, event: &PointerEvent) {
        if self.overlays.iter().any(|r| r.contains(event.position)) {
            // The indicator (or another overlay) owns this touch.
            return;
        }
        if !self.gesture.on_down(event) {
            return;
        }
        // Touch pre-empts whatever is animating; the reached offset becomes
        // the drag baseline.
        let snapshot = self.coordinator.preempt();
        if snapshot.interrupted != AnimationKind::None {
            self.current_offset = snapshot.offset;
            self.target_index = None;
            self.report_settle = false;
            self.publish(SwiperEvent::AnimationEnd {
                kind: snapshot.interrupted,
                index: self.current_index,
            });
        }
        if self.config.stop_autoplay_on_interaction {
            self.autoplay_stopped = true;
        }
        self.autoplay_elapsed = Duration::ZERO;
        self.layout_dirty = true;
        self.sync_frame_request();
    }

    /// Apply a continuous drag delta, with rubber-band damping once the
    /// stack is out of bounds and looping is disabled.
    pub fn update_offset(&mut self, delta: f32) {
        if self.mapper.total_count() == 0 || delta == 0.0 {
            return;
        }
        if self.config.looping {
            self.current_offset += delta;
        } else {
            self.apply_bounded_delta(delta);
        }
        self.layout_dirty = true;
        self.publish_rate();
    }

    fn apply_bounded_delta(&mut self, delta: f32) {
        let (min_off, max_off) = self.offset_bounds();
        let proposed = self.current_offset + delta;

        if proposed >= min_off && proposed <= max_off {
            self.current_offset = proposed;
            if self.overscroll_accum != 0.0 {
                self.overscroll_accum = 0.0;
                self.edge_opacity = 1.0;
            }
            return;
        }

        let stride = self.geometry.page_stride(self.current_index);
        let (bound, excess) = if proposed > max_off {
            (max_off, proposed - max_off)
        } else {
            (min_off, proposed - min_off)
        };

        match self.config.edge_effect {
            EdgeEffect::Spring => {
                // Walk up to the boundary linearly, attenuate the rest. The
                // attenuation stiffens with total overscroll, excess included.
                let current_over = (self.current_offset - max_off).max(0.0)
                    + (min_off - self.current_offset).max(0.0);
                let reach = current_over + excess.abs();
                let damping =
                    1.0 + self.config.overdrag_resistance * (reach / stride.max(1.0));
                self.current_offset = bound + excess / damping;
            }
            EdgeEffect::Fade => {
                self.current_offset = bound;
                self.overscroll_accum += excess;
                self.edge_opacity =
                    EdgeFade::opacity_for_overscroll(self.overscroll_accum, stride);
            }
            EdgeEffect::None => {
                self.current_offset = bound;
            }
        }
    }

    fn on_release(&mut self, outcome: ReleaseOutcome) {
        if self.mapper.total_count() == 0 {
            self.current_offset = 0.0;
            return;
        }
        match outcome {
            ReleaseOutcome::Tap => {
                // Effectively a click: snap the sub-slop offset away.
                self.current_offset = 0.0;
                self.overscroll_accum = 0.0;
                self.edge_opacity = 1.0;
                self.layout_dirty = true;
                self.publish_rate();
            }
            ReleaseOutcome::Release { velocity } => {
                self.fold_crossed_pages();
                if self.is_out_of_bounds() || self.overscroll_accum != 0.0 {
                    self.start_edge_recovery(velocity);
                } else {
                    self.start_page_settle(velocity);
                }
            }
        }
        self.sync_frame_request();
    }

    /// Commit pages fully crossed during the drag so the residual offset is
    /// less than one stride. Keeps multi-page drags and overscroll
    /// accounting consistent.
    fn fold_crossed_pages(&mut self) {
        let n = self.mapper.total_count() as i64;
        if n == 0 {
            return;
        }
        let stride = self.geometry.page_stride(self.current_index);
        if stride <= f32::EPSILON {
            return;
        }
        let mut steps = (-self.current_offset / stride).trunc() as i64;
        if !self.config.looping {
            let current = self.current_index as i64;
            steps = steps.clamp(-current, n - 1 - current);
        }
        if steps == 0 {
            return;
        }
        let logical = self.current_index as i64 + steps;
        self.current_index = self.mapper.to_display(logical);
        self.current_offset += steps as f32 * stride;
        self.recompute_ghosts();
        self.layout_dirty = true;
        self.log_index_change("fold");
        self.publish(SwiperEvent::IndexChanged {
            index: self.current_index,
        });
    }

    fn is_out_of_bounds(&self) -> bool {
        if self.config.looping {
            return false;
        }
        let (min_off, max_off) = self.offset_bounds();
        self.current_offset > max_off + f32::EPSILON
            || self.current_offset < min_off - f32::EPSILON
    }

    fn start_edge_recovery(&mut self, velocity: f32) {
        match self.config.edge_effect {
            EdgeEffect::Spring => {
                self.coordinator
                    .start_spring(self.config.spring, self.current_offset, velocity);
                self.report_settle = false;
                self.publish(SwiperEvent::AnimationStart {
                    kind: AnimationKind::Spring,
                    from_index: self.current_index,
                    target_index: self.current_index,
                });
            }
            EdgeEffect::Fade => {
                self.current_offset = 0.0;
                self.coordinator
                    .start_fade(self.edge_opacity, self.config.fade_duration);
                self.report_settle = false;
                self.publish(SwiperEvent::AnimationStart {
                    kind: AnimationKind::Fade,
                    from_index: self.current_index,
                    target_index: self.current_index,
                });
            }
            EdgeEffect::None => {
                self.current_offset = 0.0;
                self.overscroll_accum = 0.0;
                self.edge_opacity = 1.0;
                self.layout_dirty = true;
                self.publish_rate();
            }
        }
    }

    fn start_page_settle(&mut self, velocity: f32) {
        let stride = self.geometry.page_stride(self.current_index);
        if stride <= f32::EPSILON {
            return;
        }
        let group = if self.config.swipe_by_group {
            self.config.display_count.max(1) as i64
        } else {
            1
        };
        let unit = stride * group as f32;
        let progressed = -self.current_offset / unit;
        let mut steps = progressed.round() as i64;
        if self.gesture.is_fling(velocity) {
            if velocity < 0.0 {
                steps = steps.max(progressed.floor() as i64 + 1);
            } else {
                steps = steps.min(progressed.ceil() as i64 - 1);
            }
        }

        let current = self.current_index as i64;
        let target = if group > 1 {
            let mut t = current;
            let dir = if steps >= 0 {
                Direction::Forward
            } else {
                Direction::Backward
            };
            for _ in 0..steps.unsigned_abs() {
                t = self.mapper.next_group_target(t, dir, group as usize);
            }
            t
        } else if self.config.looping {
            current + steps
        } else {
            (current + steps).clamp(0, self.mapper.total_count() as i64 - 1)
        };

        self.start_flight(target, stride, false);
    }

    // -----------------------------------------------------------------------
    // Controller API
    // -----------------------------------------------------------------------

    /// Navigate programmatically. Returns `false` on the documented cheap
    /// no-op (target resolves to the current index while not looping).
    pub fn swipe_to(&mut self, target_logical: i64, animate: bool) -> bool {
        let n = self.mapper.total_count();
        if n == 0 {
            // Degenerate content: report the (unchanged) index once so
            // observers keep their idempotence guarantees, and stop.
            self.publish(SwiperEvent::IndexChanged { index: 0 });
            return false;
        }
        let target = self.mapper.clamp_target(target_logical);
        let target_display = self.mapper.to_display(target);
        if !self.config.looping && target_display == self.current_index {
            return false;
        }

        // Last-writer-wins over any in-flight animation.
        if self.coordinator.is_active() {
            let snapshot = self.coordinator.preempt();
            self.current_offset = snapshot.offset;
            self.target_index = None;
            self.publish(SwiperEvent::AnimationEnd {
                kind: snapshot.interrupted,
                index: self.current_index,
            });
        }

        if !animate {
            self.current_index = target_display;
            self.current_offset = 0.0;
            self.overscroll_accum = 0.0;
            self.edge_opacity = 1.0;
            self.recompute_ghosts();
            self.layout_dirty = true;
            self.log_index_change("jump");
            self.publish(SwiperEvent::IndexChanged {
                index: target_display,
            });
            self.sync_frame_request();
            return true;
        }

        let stride = self.geometry.page_stride(self.current_index);
        self.start_flight(target, stride, true);
        self.sync_frame_request();
        true
    }

    /// Advance one page (or group). Returns `false` when the carousel
    /// cannot advance (non-looping boundary, empty content).
    pub fn show_next(&mut self) -> bool {
        self.show(Direction::Forward)
    }

    /// Go back one page (or group). Returns `false` when already at the
    /// first page of a non-looping carousel.
    pub fn show_previous(&mut self) -> bool {
        self.show(Direction::Backward)
    }

    fn show(&mut self, direction: Direction) -> bool {
        if self.mapper.total_count() == 0 {
            return false;
        }
        let current = self.current_index as i64;
        let target = if self.config.swipe_by_group && self.config.display_count > 1 {
            self.mapper
                .next_group_target(current, direction, self.config.display_count)
        } else {
            self.mapper.next_target(current, direction)
        };
        if target == current {
            return false;
        }
        self.swipe_to(target, true)
    }

    /// Map a navigation key onto page navigation.
    pub fn handle_key(&mut self, key: NavKey) -> bool {
        match key {
            NavKey::Previous => self.show_previous(),
            NavKey::Next => self.show_next(),
        }
    }

    /// Force the active animation to complete now. `current_index` is
    /// settled and `target_index` cleared before this returns, and the
    /// pending frame request is withdrawn if nothing else needs frames.
    pub fn finish_animation(&mut self) {
        if let Some(settlement) = self.coordinator.finish() {
            self.apply_settlement(settlement);
        }
        self.sync_frame_request();
    }

    /// Abort the active animation without committing its target: the offset
    /// freezes where the animation reached, exactly as touch pre-emption
    /// leaves it.
    pub fn stop_animation(&mut self) {
        if !self.coordinator.is_active() {
            return;
        }
        let snapshot = self.coordinator.preempt();
        self.current_offset = snapshot.offset;
        self.target_index = None;
        self.report_settle = false;
        self.layout_dirty = true;
        self.publish(SwiperEvent::AnimationEnd {
            kind: snapshot.interrupted,
            index: self.current_index,
        });
        self.sync_frame_request();
    }

    /// Tear the core down: settle, withdraw the frame request, and drop all
    /// panes. Call before unmounting so no stale tick can fire afterwards.
    pub fn teardown(&mut self) {
        self.finish_animation();
        self.autoplay_stopped = true;
        if let Some(request) = self.frame_request.take() {
            self.scheduler.cancel_frame(request);
        }
        self.arena.clear();
        self.positions.clear();
        self.ghosts = GhostHandles::default();
    }

    // -----------------------------------------------------------------------
    // Frame driving
    // -----------------------------------------------------------------------

    /// Advance one frame. The host calls this when a requested frame fires,
    /// passing the elapsed time since the previous frame.
    pub fn on_frame(&mut self, dt: Duration) {
        if let Some(request) = self.frame_request.take() {
            self.scheduler.cancel_frame(request);
        }
        self.tick_autoplay(dt);
        self.drive_coordinator(dt);
        self.sync_frame_request();
    }

    fn tick_autoplay(&mut self, dt: Duration) {
        let Some(interval) = self.config.autoplay_interval else {
            return;
        };
        if self.autoplay_stopped
            || self.gesture.is_tracking()
            || self.coordinator.is_active()
            || self.mapper.total_count() < 2
        {
            return;
        }
        self.autoplay_elapsed = self.autoplay_elapsed.saturating_add(dt);
        if self.autoplay_elapsed >= interval {
            self.autoplay_elapsed = Duration::ZERO;
            self.show_next();
        }
    }

    fn drive_coordinator(&mut self, dt: Duration) {
        match self.coordinator.tick(dt) {
            TickResult::Idle => {}
            TickResult::Running { offset, opacity } => {
                self.current_offset = offset;
                self.edge_opacity = opacity;
                self.layout_dirty = true;
                self.publish_rate();
            }
            TickResult::Settled(settlement) => self.apply_settlement(settlement),
        }
    }

    fn apply_settlement(&mut self, settlement: Settlement) {
        let previous = self.current_index;
        if let Some(target) = settlement.target_logical
            && settlement.committed
        {
            self.current_index = self.mapper.to_display(target);
        }
        self.current_offset = 0.0;
        self.overscroll_accum = 0.0;
        self.edge_opacity = 1.0;
        self.target_index = None;
        self.layout_dirty = true;
        self.recompute_ghosts();
        self.publish_rate();
        let report = self.report_settle;
        self.report_settle = false;
        if self.current_index != previous || report {
            self.log_index_change("settle");
            self.publish(SwiperEvent::IndexChanged {
                index: self.current_index,
            });
        }
        self.publish(SwiperEvent::AnimationEnd {
            kind: settlement.kind,
            index: self.current_index,
        });
    }

    // -----------------------------------------------------------------------
    // Layout collaborator boundary
    // -----------------------------------------------------------------------

    /// Recompute (if dirty) and expose pane positions for the realized
    /// window. Ghost panes are excluded; read them via
    /// [`ghost_spans`](Self::ghost_spans).
    pub fn layout(&mut self) -> &ItemPositionMap {
        if self.layout_dirty {
            self.rebuild_positions();
            self.layout_dirty = false;
        }
        &self.positions
    }

    /// Resolve a realized pane.
    #[must_use]
    pub fn pane(&self, handle: PaneHandle) -> Option<&Pane> {
        self.arena.get(handle)
    }

    /// Spans of the materialized ghost panes, leading then trailing.
    #[must_use]
    pub fn ghost_spans(&self) -> (Option<&Pane>, Option<&Pane>) {
        (
            self.ghosts.leading.and_then(|h| self.arena.get(h)),
            self.ghosts.trailing.and_then(|h| self.arena.get(h)),
        )
    }

    fn recompute_ghosts(&mut self) {
        self.ghost_plan = self
            .mapper
            .compute_ghost_panes(self.current_index, self.config.display_count);
    }

    fn rebuild_positions(&mut self) {
        self.arena.clear();
        self.positions.clear();
        self.ghosts = GhostHandles::default();
        let n = self.mapper.total_count() as i64;
        if n == 0 {
            return;
        }

        let base = self.current_index as i64;
        let first_slot = -(self.config.cached_count as i64);
        let last_slot =
            (self.config.display_count.max(1) + self.config.cached_count - 1) as i64;

        // Forward walk from the current pane.
        let mut start = self.current_offset;
        let mut first_realized_start = start;
        let mut last_realized_end = start;
        for slot in 0..=last_slot {
            let logical = base + slot;
            if !self.config.looping && logical >= n {
                break;
            }
            let display = self.mapper.to_display(logical);
            if self.positions.contains_key(&display) {
                break;
            }
            let span = self.geometry.span_at(display, start);
            let mut pane = Pane::new(logical, display, span);
            if display == self.current_index {
                pane.opacity = self.edge_opacity;
            }
            last_realized_end = span.end;
            start = span.end + self.geometry.item_space();
            let handle = self.arena.insert(pane);
            self.positions.insert(display, handle);
        }

        // Backward walk for the cached panes behind the window.
        let mut next_start = self.current_offset;
        for slot_back in 1..=(-first_slot) {
            let logical = base - slot_back;
            if !self.config.looping && logical < 0 {
                break;
            }
            let display = self.mapper.to_display(logical);
            if self.positions.contains_key(&display) {
                break;
            }
            let end = next_start - self.geometry.item_space();
            let span_start = end - self.geometry.extent(display);
            let span = crate::geometry::Span::new(span_start, end);
            next_start = span_start;
            first_realized_start = span_start;
            let handle = self.arena.insert(Pane::new(logical, display, span));
            self.positions.insert(display, handle);
        }

        // Materialize planned ghosts just outside the realized strip.
        if let Some(display) = self.ghost_plan.leading {
            let end = first_realized_start - self.geometry.item_space();
            let span_start = end - self.geometry.extent(display);
            let smallest_logical = self
                .positions
                .values()
                .filter_map(|h| self.arena.get(*h))
                .map(|p| p.logical_index)
                .min()
                .unwrap_or(base);
            let pane = Pane::new(
                smallest_logical - 1,
                display,
                crate::geometry::Span::new(span_start, end),
            )
            .ghost();
            self.ghosts.leading = Some(self.arena.insert(pane));
        }
        if let Some(display) = self.ghost_plan.trailing {
            let span_start = last_realized_end + self.geometry.item_space();
            let largest_logical = self
                .positions
                .values()
                .filter_map(|h| self.arena.get(*h))
                .map(|p| p.logical_index)
                .max()
                .unwrap_or(base);
            let pane = Pane::new(
                largest_logical + 1,
                display,
                self.geometry.span_at(display, span_start),
            )
            .ghost();
            self.ghosts.trailing = Some(self.arena.insert(pane));
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Start a terminal flight toward `target` (logical). `jump` marks
    /// programmatic navigation, which reports `IndexChanged` at settle even
    /// when the display index ends up unchanged.
    fn start_flight(&mut self, target: i64, stride: f32, jump: bool) {
        if self.positions.is_empty() && self.layout_dirty {
            self.rebuild_positions();
            self.layout_dirty = false;
        }
        if self.positions.is_empty() {
            // Zero realized panes: nothing to animate against.
            return;
        }
        let current = self.current_index as i64;
        let steps = target - current;
        let target_display = self.mapper.to_display(target);
        self.target_index = Some(target);
        self.report_settle = jump;

        if self.coordinator.has_transition() {
            self.coordinator.start_custom(
                self.current_index,
                target_display,
                target,
                self.current_offset,
            );
            self.publish(SwiperEvent::AnimationStart {
                kind: AnimationKind::Custom,
                from_index: self.current_index,
                target_index: target_display,
            });
            // A zero timeout must not wait for the handler (or the next
            // frame): resolve synchronously.
            self.drive_coordinator(Duration::ZERO);
        } else {
            let to_offset = -(steps as f32) * stride;
            self.coordinator.start_translate(
                self.current_offset,
                to_offset,
                target,
                self.config.translate_duration,
            );
            self.publish(SwiperEvent::AnimationStart {
                kind: AnimationKind::Translate,
                from_index: self.current_index,
                target_index: target_display,
            });
        }
    }

    /// Offset bounds for a non-looping carousel: how far the stack can
    /// legally translate from the settled page before overscrolling.
    fn offset_bounds(&self) -> (f32, f32) {
        let n = self.mapper.total_count();
        if n == 0 {
            return (0.0, 0.0);
        }
        let mut max_off = 0.0;
        for display in 0..self.current_index {
            max_off += self.geometry.page_stride(display);
        }
        let mut min_off = 0.0;
        for display in self.current_index..n - 1 {
            min_off -= self.geometry.page_stride(display);
        }
        (min_off, max_off)
    }

    fn page_fraction(&self) -> f32 {
        let stride = self.geometry.page_stride(self.current_index);
        if stride <= f32::EPSILON {
            return 0.0;
        }
        (-self.current_offset / stride).clamp(-1.0, 1.0)
    }

    fn publish_rate(&mut self) {
        let event = SwiperEvent::TurnPageRate {
            index: self.current_index,
            fraction: self.page_fraction(),
        };
        self.hub.publish(&event);
    }

    fn publish(&mut self, event: SwiperEvent) {
        self.hub.publish(&event);
    }

    fn sync_frame_request(&mut self) {
        let autoplay_live = self.config.autoplay_interval.is_some()
            && !self.autoplay_stopped
            && self.mapper.total_count() > 1;
        let needs = self.coordinator.is_active() || autoplay_live;
        match (needs, self.frame_request) {
            (true, None) => self.frame_request = Some(self.scheduler.request_frame()),
            (false, Some(request)) => {
                self.scheduler.cancel_frame(request);
                self.frame_request = None;
            }
            _ => {}
        }
    }

    #[cfg(feature = "tracing")]
    fn log_index_change(&self, reason: &str) {
        tracing::debug!(
            message = "swiper.index",
            reason,
            index = self.current_index,
            target = ?self.target_index,
        );
    }

    #[cfg(not(feature = "tracing"))]
    fn log_index_change(&self, _reason: &str) {}
}
