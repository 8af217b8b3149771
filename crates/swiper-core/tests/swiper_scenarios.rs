//! End-to-end scenarios for the carousel core: drag/release settling, loop
//! wraparound, edge effects, pre-emption, and event contracts.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

use swiper_core::config::EdgeEffect;
use swiper_core::coordinator::AnimationKind;
use swiper_core::event::{PointerEvent, PointerKind};
use swiper_core::geometry::Point;
use swiper_core::gesture::OverlayRegion;
use swiper_core::hub::{EventKind, SwiperEvent};
use swiper_core::scheduler::ManualScheduler;
use swiper_core::swiper::SwiperCore;
use swiper_core::transition::{CustomTransition, TransitionProxy};
use swiper_core::SwiperConfig;

const EXTENT: f32 = 320.0;
const MS_16: Duration = Duration::from_millis(16);

fn make_core(config: SwiperConfig, total: usize) -> (SwiperCore, ManualScheduler) {
    let scheduler = ManualScheduler::new();
    let core = SwiperCore::new(config, total, EXTENT, Box::new(scheduler.clone()));
    (core, scheduler)
}

fn touch(kind: PointerKind, x: f32, t: Instant) -> PointerEvent {
    PointerEvent::touch(kind, Point::new(x, 0.0), t)
}

/// Drag along the x axis over `total_ms`, then release.
fn drag(core: &mut SwiperCore, from: f32, to: f32, total_ms: u64) {
    let t0 = Instant::now();
    core.on_pointer(&touch(PointerKind::Down, from, t0));
    let steps = 8u64;
    for i in 1..=steps {
        let x = from + (to - from) * i as f32 / steps as f32;
        let t = t0 + Duration::from_millis(total_ms * i / steps);
        core.on_pointer(&touch(PointerKind::Move, x, t));
    }
    core.on_pointer(&touch(PointerKind::Up, to, t0 + Duration::from_millis(total_ms)));
}

/// Tick frames until the animation settles.
fn run_to_rest(core: &mut SwiperCore) {
    let mut guard = 0;
    while core.is_animating() {
        core.on_frame(MS_16);
        guard += 1;
        assert!(guard < 2000, "animation failed to settle");
    }
}

fn count_index_changes(core: &mut SwiperCore) -> Rc<RefCell<Vec<usize>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    core.subscribe(EventKind::IndexChanged, move |event| {
        if let SwiperEvent::IndexChanged { index } = event {
            sink.borrow_mut().push(*index);
        }
    });
    seen
}

// ---------------------------------------------------------------------------
// Drag/release settling
// ---------------------------------------------------------------------------

#[test]
fn short_drag_settles_back() {
    // Scenario: 4 panes, non-looping, index 0; drag left by less than half
    // a page and release -> settles back to 0.
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    let changes = count_index_changes(&mut core);

    drag(&mut core, 400.0, 300.0, 500);
    assert!(core.is_animating());
    run_to_rest(&mut core);

    assert_eq!(core.current_index(), 0);
    assert!((core.current_offset() - 0.0).abs() < f32::EPSILON);
    assert!(changes.borrow().is_empty(), "no index change expected");
}

#[test]
fn long_drag_advances_one_page() {
    // Scenario: drag left by more than half a page -> settles to 1,
    // IndexChanged fired once with payload 1.
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    let changes = count_index_changes(&mut core);

    drag(&mut core, 400.0, 220.0, 500);
    run_to_rest(&mut core);

    assert_eq!(core.current_index(), 1);
    assert_eq!(*changes.borrow(), vec![1]);
}

#[test]
fn fast_fling_advances_despite_short_distance() {
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    // 80 units in 40ms: ~2000 units/sec, well past the fling threshold.
    drag(&mut core, 400.0, 320.0, 40);
    run_to_rest(&mut core);
    assert_eq!(core.current_index(), 1);
}

#[test]
fn tap_is_not_a_page_turn() {
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    let t0 = Instant::now();
    core.on_pointer(&touch(PointerKind::Down, 100.0, t0));
    core.on_pointer(&touch(PointerKind::Up, 101.0, t0 + Duration::from_millis(50)));
    assert!(!core.is_animating());
    assert_eq!(core.current_index(), 0);
    assert!((core.current_offset() - 0.0).abs() < f32::EPSILON);
}

#[test]
fn cancel_settles_by_distance_only() {
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    let t0 = Instant::now();
    core.on_pointer(&touch(PointerKind::Down, 400.0, t0));
    core.on_pointer(&touch(PointerKind::Move, 180.0, t0 + Duration::from_millis(30)));
    core.on_pointer(&touch(PointerKind::Cancel, 180.0, t0 + Duration::from_millis(40)));
    // Despite the fast movement, cancel reports zero velocity; the drag
    // crossed more than half a page so it still advances.
    run_to_rest(&mut core);
    assert_eq!(core.current_index(), 1);
}

// ---------------------------------------------------------------------------
// Loop wraparound
// ---------------------------------------------------------------------------

#[test]
fn show_next_wraps_last_to_first() {
    // Scenario: 4 panes, looping, index 3; show_next -> logical 4,
    // display 0.
    let (mut core, _sched) = make_core(SwiperConfig::default().looping(true), 4);
    assert!(core.swipe_to(3, false));
    assert_eq!(core.current_index(), 3);

    assert!(core.show_next());
    assert_eq!(core.target_index(), Some(4), "logical target past the ring");
    run_to_rest(&mut core);
    assert_eq!(core.current_index(), 0);
}

#[test]
fn show_previous_wraps_first_to_last() {
    let (mut core, _sched) = make_core(SwiperConfig::default().looping(true), 4);
    assert!(core.show_previous());
    assert_eq!(core.target_index(), Some(-1));
    run_to_rest(&mut core);
    assert_eq!(core.current_index(), 3);
}

#[test]
fn non_looping_boundary_cannot_advance() {
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    assert!(!core.show_previous(), "already at first page");
    assert!(core.swipe_to(3, false));
    assert!(!core.show_next(), "already at last page");
    assert!(!core.is_animating());
}

// ---------------------------------------------------------------------------
// Edge effects
// ---------------------------------------------------------------------------

#[test]
fn overscroll_springs_back_to_boundary() {
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    // Drag right (backward) at index 0: out of bounds.
    drag(&mut core, 100.0, 250.0, 400);
    assert_eq!(core.animation_kind(), AnimationKind::Spring);
    run_to_rest(&mut core);
    assert_eq!(core.current_index(), 0, "must settle on the boundary index");
    assert!((core.current_offset() - 0.0).abs() < f32::EPSILON);
}

#[test]
fn rubber_band_attenuates_overscroll() {
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    let t0 = Instant::now();
    core.on_pointer(&touch(PointerKind::Down, 100.0, t0));
    core.on_pointer(&touch(PointerKind::Move, 300.0, t0 + Duration::from_millis(100)));
    assert!(
        core.current_offset() < 200.0,
        "out-of-bounds drag must be damped, offset: {}",
        core.current_offset()
    );
    assert!(core.current_offset() > 0.0);
}

#[test]
fn fade_edge_clamps_offset_and_dims() {
    let (mut core, _sched) = make_core(
        SwiperConfig::default().edge_effect(EdgeEffect::Fade),
        4,
    );
    let t0 = Instant::now();
    core.on_pointer(&touch(PointerKind::Down, 100.0, t0));
    core.on_pointer(&touch(PointerKind::Move, 260.0, t0 + Duration::from_millis(100)));
    assert!(
        (core.current_offset() - 0.0).abs() < f32::EPSILON,
        "fade edge effect must clamp the offset at the boundary"
    );
    assert!(core.edge_opacity() < 1.0);

    core.on_pointer(&touch(PointerKind::Up, 260.0, t0 + Duration::from_millis(200)));
    assert_eq!(core.animation_kind(), AnimationKind::Fade);
    run_to_rest(&mut core);
    assert!((core.edge_opacity() - 1.0).abs() < f32::EPSILON);
    assert_eq!(core.current_index(), 0);
}

// ---------------------------------------------------------------------------
// Pre-emption and cancellation
// ---------------------------------------------------------------------------

#[test]
fn touch_down_preempts_animation() {
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    core.swipe_to(2, true);
    core.on_frame(MS_16);
    core.on_frame(MS_16);
    let mid_offset = core.current_offset();
    assert!(mid_offset < 0.0, "flight should be under way");

    let t0 = Instant::now();
    core.on_pointer(&touch(PointerKind::Down, 100.0, t0));
    assert!(!core.is_animating());
    assert_eq!(
        core.target_index(),
        None,
        "no target may survive without an active animation"
    );
    assert!(
        (core.current_offset() - mid_offset).abs() < f32::EPSILON,
        "the reached offset becomes the drag baseline"
    );
}

#[test]
fn finish_animation_settles_synchronously() {
    let (mut core, sched) = make_core(SwiperConfig::default(), 4);
    core.swipe_to(2, true);
    core.on_frame(MS_16);
    core.finish_animation();
    assert_eq!(core.current_index(), 2);
    assert_eq!(core.target_index(), None);
    assert!(!core.is_animating());
    assert!(
        !sched.has_pending(),
        "frame request must be withdrawn synchronously"
    );
}

#[test]
fn stop_animation_freezes_offset_without_commit() {
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    core.swipe_to(2, true);
    core.on_frame(MS_16);
    core.on_frame(MS_16);
    let reached = core.current_offset();
    core.stop_animation();
    assert_eq!(core.current_index(), 0, "no commit on stop");
    assert_eq!(core.target_index(), None);
    assert!((core.current_offset() - reached).abs() < f32::EPSILON);
}

#[test]
fn reentrant_swipe_is_last_writer_wins() {
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    core.swipe_to(1, true);
    core.on_frame(MS_16);
    core.swipe_to(3, true);
    assert_eq!(core.target_index(), Some(3));
    run_to_rest(&mut core);
    assert_eq!(core.current_index(), 3);
}

// ---------------------------------------------------------------------------
// Event contract
// ---------------------------------------------------------------------------

#[test]
fn repeated_identical_swipe_fires_once() {
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    let changes = count_index_changes(&mut core);
    assert!(core.swipe_to(2, false));
    assert!(!core.swipe_to(2, false), "second identical call is a no-op");
    assert_eq!(*changes.borrow(), vec![2]);
}

#[test]
fn looping_jump_to_same_display_still_reports() {
    let (mut core, _sched) = make_core(SwiperConfig::default().looping(true), 4);
    let changes = count_index_changes(&mut core);
    assert!(core.swipe_to(0, false));
    assert_eq!(*changes.borrow(), vec![0], "jump semantics report once");
}

#[test]
fn turn_page_rate_stays_in_unit_range() {
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    let fractions = Rc::new(RefCell::new(Vec::new()));
    {
        let sink = Rc::clone(&fractions);
        core.subscribe(EventKind::TurnPageRate, move |event| {
            if let SwiperEvent::TurnPageRate { fraction, .. } = event {
                sink.borrow_mut().push(*fraction);
            }
        });
    }

    drag(&mut core, 400.0, 60.0, 300);
    run_to_rest(&mut core);
    drag(&mut core, 100.0, 300.0, 300);
    run_to_rest(&mut core);

    let fractions = fractions.borrow();
    assert!(!fractions.is_empty());
    for &f in fractions.iter() {
        assert!((-1.0..=1.0).contains(&f), "fraction out of range: {f}");
    }
}

#[test]
fn animation_start_and_end_bracket_the_flight() {
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    let log = Rc::new(RefCell::new(Vec::new()));
    {
        let sink = Rc::clone(&log);
        core.subscribe(EventKind::AnimationStart, move |event| {
            if let SwiperEvent::AnimationStart { kind, target_index, .. } = event {
                sink.borrow_mut().push(format!("start:{kind:?}:{target_index}"));
            }
        });
    }
    {
        let sink = Rc::clone(&log);
        core.subscribe(EventKind::AnimationEnd, move |event| {
            if let SwiperEvent::AnimationEnd { kind, index } = event {
                sink.borrow_mut().push(format!("end:{kind:?}:{index}"));
            }
        });
    }

    core.swipe_to(1, true);
    run_to_rest(&mut core);
    assert_eq!(
        *log.borrow(),
        vec!["start:Translate:1".to_string(), "end:Translate:1".to_string()]
    );
}

#[test]
fn overlay_touch_does_not_steal_gesture() {
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    core.register_overlay(OverlayRegion::new(Point::new(0.0, 0.0), Point::new(500.0, 50.0)));
    core.swipe_to(2, true);
    core.on_frame(MS_16);

    // A touch inside the overlay must not pre-empt the animation.
    let t0 = Instant::now();
    core.on_pointer(&PointerEvent::touch(
        PointerKind::Down,
        Point::new(100.0, 10.0),
        t0,
    ));
    assert!(core.is_animating(), "overlay touch must not cancel the flight");
}

// ---------------------------------------------------------------------------
// Custom transition
// ---------------------------------------------------------------------------

struct InertTransition;

impl CustomTransition for InertTransition {
    fn begin(&mut self, _proxy: &mut TransitionProxy) {}
    fn frame(&mut self, _proxy: &mut TransitionProxy, _dt: Duration) {}
}

struct FinishingTransition {
    after_frames: u32,
    seen: u32,
}

impl CustomTransition for FinishingTransition {
    fn begin(&mut self, _proxy: &mut TransitionProxy) {}
    fn frame(&mut self, proxy: &mut TransitionProxy, _dt: Duration) {
        self.seen += 1;
        if self.seen >= self.after_frames {
            proxy.finish();
        }
    }
}

#[test]
fn zero_timeout_custom_transition_settles_immediately() {
    // Scenario: custom transition with timeout 0; swipe_to(2) must settle
    // without waiting for the handler's completion callback.
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    core.set_custom_transition(Some(Box::new(InertTransition)), Duration::ZERO);
    core.swipe_to(2, true);
    assert_eq!(core.current_index(), 2);
    assert_eq!(core.target_index(), None);
    assert!(!core.is_animating());
}

#[test]
fn custom_transition_commits_on_handler_finish() {
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    core.set_custom_transition(
        Some(Box::new(FinishingTransition {
            after_frames: 3,
            seen: 0,
        })),
        Duration::from_secs(10),
    );
    core.swipe_to(1, true);
    assert_eq!(core.animation_kind(), AnimationKind::Custom);
    run_to_rest(&mut core);
    assert_eq!(core.current_index(), 1);
}

// ---------------------------------------------------------------------------
// Degenerate content and teardown
// ---------------------------------------------------------------------------

#[test]
fn empty_carousel_is_inert() {
    let (mut core, _sched) = make_core(SwiperConfig::default(), 0);
    assert!(!core.show_next());
    assert!(!core.swipe_to(3, true));
    assert_eq!(core.current_index(), 0);
    drag(&mut core, 400.0, 100.0, 200);
    assert!(!core.is_animating());
    assert_eq!(core.current_index(), 0);
}

#[test]
fn shrinking_content_reclamps_index() {
    let (mut core, _sched) = make_core(SwiperConfig::default(), 5);
    core.swipe_to(4, false);
    let changes = count_index_changes(&mut core);
    core.set_total_count(2);
    assert_eq!(core.current_index(), 1);
    assert_eq!(*changes.borrow(), vec![1]);
    // Growing does not move the index, and does not fire.
    core.set_total_count(6);
    assert_eq!(core.current_index(), 1);
    assert_eq!(*changes.borrow(), vec![1]);
}

#[test]
fn teardown_withdraws_frame_request() {
    let (mut core, sched) = make_core(
        SwiperConfig::default().autoplay(Duration::from_millis(100)),
        4,
    );
    assert!(sched.has_pending(), "autoplay keeps a frame requested");
    core.teardown();
    assert!(!sched.has_pending(), "teardown must cancel synchronously");
}

// ---------------------------------------------------------------------------
// Autoplay
// ---------------------------------------------------------------------------

#[test]
fn autoplay_advances_when_idle() {
    let mut config = SwiperConfig::default()
        .looping(true)
        .autoplay(Duration::from_millis(100));
    config.stop_autoplay_on_interaction = false;
    let (mut core, _sched) = make_core(config, 4);

    for _ in 0..8 {
        core.on_frame(MS_16);
    }
    assert!(core.is_animating(), "autoplay should have started a flight");
    run_to_rest(&mut core);
    assert_eq!(core.current_index(), 1);
}

#[test]
fn interaction_stops_autoplay() {
    let (mut core, _sched) = make_core(
        SwiperConfig::default()
            .looping(true)
            .autoplay(Duration::from_millis(100)),
        4,
    );
    drag(&mut core, 400.0, 402.0, 50); // a tap-sized interaction
    for _ in 0..20 {
        core.on_frame(MS_16);
    }
    assert!(!core.is_animating());
    assert_eq!(core.current_index(), 0);
}

// ---------------------------------------------------------------------------
// Layout and ghosts
// ---------------------------------------------------------------------------

#[test]
fn settled_layout_tiles_with_spacing() {
    let mut config = SwiperConfig::default();
    config.item_space = 10.0;
    config.display_count = 2;
    config.cached_count = 1;
    let (mut core, _sched) = make_core(config, 5);
    core.swipe_to(2, false);

    let spans: Vec<_> = {
        let positions = core.layout().clone();
        positions
            .iter()
            .map(|(display, handle)| (*display, core.pane(*handle).unwrap().span))
            .collect()
    };
    assert!(spans.len() >= 3);
    for pair in spans.windows(2) {
        let (a_display, a_span) = pair[0];
        let (b_display, b_span) = pair[1];
        if b_display == a_display + 1 {
            assert!(
                (a_span.end + 10.0 - b_span.start).abs() < 0.01,
                "panes {a_display}/{b_display} must tile with spacing"
            );
        }
    }
}

#[test]
fn looping_window_materializes_one_ghost() {
    let mut config = SwiperConfig::default().looping(true);
    config.display_count = 2;
    config.cached_count = 0;
    let (mut core, _sched) = make_core(config, 4);

    let plan = core.ghost_plan();
    assert_eq!(plan.count(), 1, "exactly one ghost for a short ring window");

    core.layout();
    let (leading, trailing) = core.ghost_spans();
    let ghost = leading.or(trailing).expect("planned ghost materialized");
    assert!(ghost.is_ghost);
    assert_eq!(ghost.display_index, 3, "mirrors the opposite extreme");
}

#[test]
fn ghosts_absent_when_window_covers_ring() {
    let mut config = SwiperConfig::default().looping(true);
    config.display_count = 4;
    let (mut core, _sched) = make_core(config, 4);
    assert_eq!(core.ghost_plan().count(), 0);
    core.layout();
    let (leading, trailing) = core.ghost_spans();
    assert!(leading.is_none() && trailing.is_none());
}

// ---------------------------------------------------------------------------
// Disable-swipe and keys
// ---------------------------------------------------------------------------

#[test]
fn disabled_swipe_ignores_pointers_but_not_api() {
    let (mut core, _sched) = make_core(SwiperConfig::default().disable_swipe(true), 4);
    drag(&mut core, 400.0, 100.0, 200);
    assert_eq!(core.current_index(), 0);
    assert!(!core.is_animating());

    assert!(core.swipe_to(2, false));
    assert_eq!(core.current_index(), 2);
}

#[test]
fn nav_keys_map_to_navigation() {
    use swiper_core::event::NavKey;
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    assert!(core.handle_key(NavKey::Next));
    run_to_rest(&mut core);
    assert_eq!(core.current_index(), 1);
    assert!(core.handle_key(NavKey::Previous));
    run_to_rest(&mut core);
    assert_eq!(core.current_index(), 0);
    assert!(!core.handle_key(NavKey::Previous), "boundary");
}

// ---------------------------------------------------------------------------
// Swipe by group
// ---------------------------------------------------------------------------

#[test]
fn group_navigation_snaps_to_group_starts() {
    let mut config = SwiperConfig::default();
    config.display_count = 2;
    config.swipe_by_group = true;
    let (mut core, _sched) = make_core(config, 7);

    assert!(core.show_next());
    run_to_rest(&mut core);
    assert_eq!(core.current_index(), 2);

    assert!(core.show_next());
    run_to_rest(&mut core);
    assert_eq!(core.current_index(), 4);

    assert!(core.show_next());
    run_to_rest(&mut core);
    assert_eq!(core.current_index(), 6, "last whole group start");

    assert!(!core.show_next(), "cannot advance past the last group");
}

// ---------------------------------------------------------------------------
// Handler isolation inside the pipeline
// ---------------------------------------------------------------------------

#[test]
fn panicking_subscriber_does_not_break_the_tick_loop() {
    let (mut core, _sched) = make_core(SwiperConfig::default(), 4);
    core.subscribe(EventKind::TurnPageRate, |_| panic!("observer bug"));
    let changes = count_index_changes(&mut core);

    drag(&mut core, 400.0, 220.0, 500);
    run_to_rest(&mut core);
    assert_eq!(core.current_index(), 1);
    assert_eq!(*changes.borrow(), vec![1]);
}
