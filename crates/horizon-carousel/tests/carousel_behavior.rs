//! Integration tests for carousel navigation, gestures and autoplay.
//!
//! All timing runs on the virtual clock; nothing here sleeps.

use std::sync::Arc;
use std::time::Duration;

use horizon_carousel::logging::is_carousel_target;
use horizon_carousel::{
    Axis, CaptureDecision, Carousel, CarouselConfig, GesturePhase, LayoutDirection, LayoutRect,
    Offset, Scheduler, Signal, TransitionPlan,
};
use parking_lot::Mutex;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const WIDTH: f32 = 300.0;
const HEIGHT: f32 = 200.0;
const SETTLE: Duration = Duration::from_secs(2);

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_test_writer()
                .with_filter(filter_fn(|meta| is_carousel_target(meta.target()))),
        )
        .with(EnvFilter::from_default_env())
        .try_init();
}

struct Fixture {
    scheduler: Arc<Scheduler>,
    carousel: Carousel,
    started: Arc<Mutex<Vec<usize>>>,
    finished: Arc<Mutex<Vec<usize>>>,
    changed: Arc<Mutex<Vec<usize>>>,
}

impl Fixture {
    fn new(config: CarouselConfig, count: usize) -> Self {
        init_tracing();
        let scheduler = Arc::new(Scheduler::new());
        let carousel = Carousel::new(config, count, scheduler.clone()).unwrap();
        carousel.on_layout(LayoutRect::new(0.0, 0.0, WIDTH, HEIGHT));

        let started = record(carousel.transition_started());
        let finished = record(carousel.transition_finished());
        let changed = record(carousel.index_changed());

        Self {
            scheduler,
            carousel,
            started,
            finished,
            changed,
        }
    }

    fn settle(&self) {
        self.scheduler.advance(SETTLE);
    }

    /// Drag from the middle of the viewport by `dx`, `dy` and release.
    fn swipe(&self, dx: f32, dy: f32) {
        let origin = Offset::new(WIDTH / 2.0, HEIGHT / 2.0);
        self.carousel.on_drag_start(origin);
        self.carousel.on_drag_move(Offset::new(origin.x + dx / 2.0, origin.y + dy / 2.0));
        self.carousel.on_drag_end(Offset::new(origin.x + dx, origin.y + dy));
    }

    fn clear(&self) {
        self.started.lock().clear();
        self.finished.lock().clear();
        self.changed.lock().clear();
    }
}

fn record(signal: &Signal<usize>) -> Arc<Mutex<Vec<usize>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let log_clone = log.clone();
    signal.connect(move |&index| log_clone.lock().push(index));
    log
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn test_next_prev_sequences_stay_in_range() {
    let steps = [1, 1, 1, -1, 1, 1, 1, 1, 1, -1, -1, -1, -1, -1, -1, -1, 1];
    for count in 1..=5 {
        for looping in [false, true] {
            let f = Fixture::new(CarouselConfig::default().with_loop(looping), count);
            let mut expected: i64 = 0;
            for step in steps {
                if step > 0 {
                    f.carousel.go_to_next();
                } else {
                    f.carousel.go_to_prev();
                }
                expected = if looping {
                    (expected + step).rem_euclid(count as i64)
                } else {
                    (expected + step).clamp(0, count as i64 - 1)
                };
                assert_eq!(
                    f.carousel.active_index() as i64,
                    expected,
                    "count={count} loop={looping}"
                );
            }
        }
    }
}

#[test]
fn test_go_to_is_idempotent() {
    let f = Fixture::new(CarouselConfig::default(), 5);

    f.carousel.go_to(3);
    assert_eq!(f.carousel.active_index(), 3);
    assert_eq!(*f.changed.lock(), vec![3]);
    f.settle();
    f.clear();

    f.carousel.go_to(3);
    f.settle();
    assert_eq!(f.carousel.active_index(), 3);
    assert!(f.started.lock().is_empty());
    assert!(f.finished.lock().is_empty());
    assert!(f.changed.lock().is_empty());
}

#[test]
fn test_go_to_out_of_range() {
    let f = Fixture::new(CarouselConfig::default(), 5);
    f.carousel.go_to(12);
    assert_eq!(f.carousel.active_index(), 4);

    let f = Fixture::new(CarouselConfig::default().with_loop(true), 5);
    f.carousel.go_to(7);
    assert_eq!(f.carousel.active_index(), 2);
}

#[test]
fn test_bounce_without_loop() {
    let f = Fixture::new(CarouselConfig::default(), 5);

    assert_eq!(f.carousel.request_transition(-1), TransitionPlan::Bounce);
    assert_eq!(f.carousel.active_index(), 0);
    assert!(f.carousel.is_animating());
    assert!(f.changed.lock().is_empty());

    f.settle();
    assert_eq!(*f.finished.lock(), vec![0]);
    assert_eq!(f.carousel.live_offset(), Offset::ZERO);
}

#[test]
fn test_wrap_with_loop() {
    let f = Fixture::new(CarouselConfig::default().with_loop(true), 5);

    f.carousel.request_transition(-1);
    assert_eq!(f.carousel.active_index(), 4);
    assert_eq!(*f.changed.lock(), vec![4]);

    f.settle();
    assert_eq!(f.carousel.live_offset(), Offset::new(-4.0 * WIDTH, 0.0));
    assert_eq!(*f.finished.lock(), vec![4]);
}

#[test]
fn test_index_visible_before_settle_completes() {
    let f = Fixture::new(CarouselConfig::default(), 3);
    f.carousel.go_to_next();
    assert_eq!(f.carousel.active_index(), 1);
    assert!(f.finished.lock().is_empty());
    assert!(f.carousel.is_animating());
}

#[test]
fn test_superseded_settle_finishes_once() {
    let f = Fixture::new(CarouselConfig::default(), 5);

    f.carousel.go_to_next();
    f.scheduler.advance(Duration::from_millis(48));
    f.carousel.go_to_next();
    f.settle();

    assert_eq!(*f.changed.lock(), vec![1, 2]);
    assert_eq!(*f.finished.lock(), vec![2]);
    assert_eq!(f.carousel.live_offset(), Offset::new(-2.0 * WIDTH, 0.0));
}

#[test]
fn test_navigation_needs_slides_and_layout() {
    init_tracing();
    let scheduler = Arc::new(Scheduler::new());

    let empty = Carousel::new(CarouselConfig::default().with_loop(true), 0, scheduler.clone()).unwrap();
    empty.on_layout(LayoutRect::new(0.0, 0.0, WIDTH, HEIGHT));
    assert_eq!(empty.request_transition(1), TransitionPlan::Ignored);
    assert!(!empty.is_animating());

    let unmeasured = Carousel::new(CarouselConfig::default(), 3, scheduler.clone()).unwrap();
    unmeasured.on_layout(LayoutRect::new(0.0, 0.0, 0.0, HEIGHT));
    unmeasured.go_to(2);
    assert_eq!(unmeasured.active_index(), 0);
    assert_eq!(scheduler.active_count(), 0);
}

// =============================================================================
// Gestures
// =============================================================================

#[test]
fn test_short_drag_springs_back() {
    let f = Fixture::new(CarouselConfig::default(), 3);

    // 50 units is below 0.2 × 300.
    f.swipe(-50.0, 0.0);
    assert_eq!(f.carousel.active_index(), 0);
    assert_eq!(*f.started.lock(), vec![0]);

    f.settle();
    assert_eq!(*f.finished.lock(), vec![0]);
    assert!(f.changed.lock().is_empty());
    assert_eq!(f.carousel.live_offset(), Offset::ZERO);
}

#[test]
fn test_long_drag_advances_one_slide() {
    let f = Fixture::new(CarouselConfig::default(), 3);

    f.swipe(-200.0, 0.0);
    assert_eq!(f.carousel.active_index(), 1);
    assert_eq!(*f.changed.lock(), vec![1]);
    f.settle();
    assert_eq!(*f.finished.lock(), vec![1]);
    assert_eq!(f.carousel.live_offset(), Offset::new(-WIDTH, 0.0));

    // Exactly at the threshold counts.
    f.swipe(-60.0, 0.0);
    assert_eq!(f.carousel.active_index(), 2);

    f.swipe(250.0, 0.0);
    assert_eq!(f.carousel.active_index(), 1);
}

#[test]
fn test_drag_past_the_end_bounces() {
    let f = Fixture::new(CarouselConfig::default(), 3);
    f.swipe(200.0, 0.0);
    assert_eq!(f.carousel.active_index(), 0);
    f.settle();
    assert_eq!(*f.finished.lock(), vec![0]);
    assert!(f.changed.lock().is_empty());

    let f = Fixture::new(CarouselConfig::default().with_loop(true), 3);
    f.swipe(200.0, 0.0);
    assert_eq!(f.carousel.active_index(), 2);
}

#[test]
fn test_strip_follows_captured_drag() {
    let f = Fixture::new(CarouselConfig::default().with_initial_index(1), 3);
    let anchor = Offset::new(-WIDTH, 0.0);
    assert_eq!(f.carousel.live_offset(), anchor);

    f.carousel.on_drag_start(Offset::new(100.0, 100.0));
    assert_eq!(f.carousel.on_drag_move(Offset::new(97.0, 100.0)), CaptureDecision::Pass);
    assert_eq!(f.carousel.gesture_phase(), GesturePhase::Pending);
    assert!(f.carousel.on_termination_request());

    assert_eq!(f.carousel.on_drag_move(Offset::new(80.0, 140.0)), CaptureDecision::Capture);
    assert_eq!(f.carousel.live_offset(), Offset::new(anchor.x - 20.0, 0.0));
    assert_eq!(f.carousel.on_drag_move(Offset::new(140.0, 60.0)), CaptureDecision::Capture);
    assert_eq!(f.carousel.live_offset(), Offset::new(anchor.x + 40.0, 0.0));
    assert!(!f.carousel.on_termination_request());

    // The start notification fires once per capture.
    assert_eq!(*f.started.lock(), vec![1]);
}

#[test]
fn test_cancelled_drag_springs_back() {
    let f = Fixture::new(CarouselConfig::default(), 3);
    f.carousel.on_drag_start(Offset::new(100.0, 100.0));
    f.carousel.on_drag_move(Offset::new(0.0, 100.0));
    f.carousel.on_drag_cancel();

    assert_eq!(f.carousel.gesture_phase(), GesturePhase::Cancelled);
    f.settle();
    assert_eq!(*f.finished.lock(), vec![0]);
    assert_eq!(f.carousel.active_index(), 0);
    assert_eq!(f.carousel.live_offset(), Offset::ZERO);
}

#[test]
fn test_right_to_left_mirrors_horizontal() {
    let config = CarouselConfig::default().with_layout_direction(LayoutDirection::RightToLeft);
    let f = Fixture::new(config, 3);

    f.swipe(200.0, 0.0);
    assert_eq!(f.carousel.active_index(), 1);
    f.settle();
    assert_eq!(f.carousel.live_offset(), Offset::new(WIDTH, 0.0));
}

#[test]
fn test_vertical_axis_ignores_right_to_left() {
    let config = CarouselConfig::default()
        .with_axis(Axis::Vertical)
        .with_layout_direction(LayoutDirection::RightToLeft);
    let f = Fixture::new(config, 3);

    // Horizontal movement never captures a vertical carousel.
    f.carousel.on_drag_start(Offset::new(100.0, 100.0));
    assert_eq!(f.carousel.on_drag_move(Offset::new(0.0, 100.0)), CaptureDecision::Pass);
    f.carousel.on_drag_end(Offset::new(0.0, 100.0));
    assert_eq!(f.carousel.active_index(), 0);

    f.swipe(0.0, -100.0);
    assert_eq!(f.carousel.active_index(), 1);
    f.settle();
    assert_eq!(f.carousel.live_offset(), Offset::new(0.0, -HEIGHT));
    assert_eq!(f.carousel.controls_state().axis, Axis::Vertical);
}

#[test]
fn test_disabled_gestures_never_capture() {
    let f = Fixture::new(CarouselConfig::default(), 3);
    let enabled = Arc::new(Mutex::new(false));
    let enabled_clone = enabled.clone();
    f.carousel.set_gestures_enabled(move || *enabled_clone.lock());

    f.swipe(-200.0, 0.0);
    assert_eq!(f.carousel.active_index(), 0);
    assert!(f.started.lock().is_empty());

    *enabled.lock() = true;
    f.swipe(-200.0, 0.0);
    assert_eq!(f.carousel.active_index(), 1);
}

// =============================================================================
// Autoplay
// =============================================================================

#[test]
fn test_autoplay_cadence() {
    let f = Fixture::new(CarouselConfig::default().with_autoplay_interval(2.0), 100);
    f.carousel.mount();

    for tick in 1..=10 {
        f.scheduler.advance(Duration::from_millis(1999));
        assert_eq!(f.carousel.active_index(), tick - 1);
        f.scheduler.advance(Duration::from_millis(1));
        assert_eq!(f.carousel.active_index(), tick);
    }
    assert_eq!(f.changed.lock().len(), 10);

    f.carousel.unmount();
    f.scheduler.advance(Duration::from_secs(20));
    assert_eq!(f.carousel.active_index(), 10);
}

#[test]
fn test_autoplay_waits_for_mount() {
    let f = Fixture::new(CarouselConfig::default().with_autoplay_interval(1.0), 5);
    f.scheduler.advance(Duration::from_secs(5));
    assert_eq!(f.carousel.active_index(), 0);

    f.carousel.mount();
    f.scheduler.advance(Duration::from_secs(1));
    assert_eq!(f.carousel.active_index(), 1);
}

#[test]
fn test_negative_autoplay_retreats() {
    let config = CarouselConfig::default()
        .with_loop(true)
        .with_autoplay_interval(-1.0);
    let f = Fixture::new(config, 4);
    f.carousel.mount();

    f.scheduler.advance(Duration::from_secs(1));
    assert_eq!(f.carousel.active_index(), 3);
    f.scheduler.advance(Duration::from_secs(1));
    assert_eq!(f.carousel.active_index(), 2);
}

#[test]
fn test_autoplay_bounce_rearms() {
    let f = Fixture::new(CarouselConfig::default().with_autoplay_interval(1.0), 2);
    f.carousel.mount();

    f.scheduler.advance(Duration::from_secs(1));
    assert_eq!(f.carousel.active_index(), 1);

    f.scheduler.advance(Duration::from_secs(1));
    assert_eq!(f.carousel.active_index(), 1);
    assert!(f.carousel.is_autoplay_armed());
    assert_eq!(*f.changed.lock(), vec![1]);
}

#[test]
fn test_capture_suspends_autoplay() {
    let f = Fixture::new(CarouselConfig::default().with_autoplay_interval(2.0), 5);
    f.carousel.mount();
    f.scheduler.advance(Duration::from_secs(1));

    f.carousel.on_drag_start(Offset::new(150.0, 100.0));
    f.carousel.on_drag_move(Offset::new(130.0, 100.0));
    assert!(!f.carousel.is_autoplay_armed());

    f.scheduler.advance(Duration::from_secs(10));
    assert_eq!(f.carousel.active_index(), 0);

    // A short release resumes with one fresh timer.
    f.carousel.on_drag_end(Offset::new(120.0, 100.0));
    assert!(f.carousel.is_autoplay_armed());
    f.scheduler.advance(Duration::from_millis(1999));
    assert_eq!(f.carousel.active_index(), 0);
    f.scheduler.advance(Duration::from_millis(1));
    assert_eq!(f.carousel.active_index(), 1);
}

#[test]
fn test_committed_release_arms_one_timer() {
    let f = Fixture::new(CarouselConfig::default().with_autoplay_interval(2.0), 5);
    f.carousel.mount();

    f.swipe(-200.0, 0.0);
    assert_eq!(f.carousel.active_index(), 1);
    f.clear();

    f.scheduler.advance(Duration::from_millis(1999));
    assert!(f.changed.lock().is_empty());
    f.scheduler.advance(Duration::from_millis(1));
    assert_eq!(*f.changed.lock(), vec![2]);
}

#[test]
fn test_cancelled_drag_resumes_autoplay() {
    let f = Fixture::new(CarouselConfig::default().with_autoplay_interval(2.0), 5);
    f.carousel.mount();

    f.carousel.on_drag_start(Offset::new(150.0, 100.0));
    f.carousel.on_drag_move(Offset::new(100.0, 100.0));
    assert!(!f.carousel.is_autoplay_armed());
    f.carousel.on_drag_cancel();
    assert!(f.carousel.is_autoplay_armed());

    f.scheduler.advance(Duration::from_secs(2));
    assert_eq!(*f.changed.lock(), vec![1]);
}

#[test]
fn test_lost_release_resumes_autoplay() {
    let f = Fixture::new(CarouselConfig::default().with_autoplay_interval(5.0), 5);
    f.carousel.mount();

    f.carousel.on_drag_start(Offset::new(150.0, 100.0));
    f.carousel.on_drag_move(Offset::new(130.0, 100.0));
    assert!(!f.carousel.is_autoplay_armed());

    // The host never reported the release; the next press starts over.
    f.carousel.on_drag_start(Offset::new(150.0, 100.0));
    assert_eq!(f.carousel.gesture_phase(), GesturePhase::Pending);
    assert!(f.carousel.is_autoplay_armed());
    assert!(f.carousel.is_animating());

    f.settle();
    assert_eq!(f.carousel.live_offset(), Offset::ZERO);
    assert_eq!(*f.finished.lock(), vec![0]);
    assert!(f.changed.lock().is_empty());

    f.scheduler.advance(Duration::from_secs(3));
    assert_eq!(*f.changed.lock(), vec![1]);
}

#[test]
fn test_autoplay_survives_late_layout() {
    init_tracing();
    let scheduler = Arc::new(Scheduler::new());
    let carousel = Carousel::new(CarouselConfig::default().with_autoplay_interval(1.0), 3, scheduler.clone()).unwrap();
    let changed = record(carousel.index_changed());
    carousel.mount();

    scheduler.advance(Duration::from_millis(1500));
    assert_eq!(carousel.active_index(), 0);
    assert!(carousel.is_autoplay_armed());

    carousel.on_layout(LayoutRect::new(0.0, 0.0, WIDTH, HEIGHT));
    scheduler.advance(Duration::from_secs(1));
    assert_eq!(carousel.active_index(), 1);
    assert_eq!(*changed.lock(), vec![1]);
}

#[test]
fn test_autoplay_survives_late_content() {
    init_tracing();
    let scheduler = Arc::new(Scheduler::new());
    let carousel = Carousel::new(CarouselConfig::default().with_autoplay_interval(1.0), 0, scheduler.clone()).unwrap();
    carousel.on_layout(LayoutRect::new(0.0, 0.0, WIDTH, HEIGHT));
    carousel.mount();

    scheduler.advance(Duration::from_millis(1500));
    assert!(carousel.is_autoplay_armed());

    carousel.set_slide_count(5);
    scheduler.advance(Duration::from_secs(1));
    assert_eq!(carousel.active_index(), 1);
    scheduler.advance(Duration::from_secs(1));
    assert_eq!(carousel.active_index(), 2);
}

#[test]
fn test_extreme_navigation_requests() {
    let f = Fixture::new(CarouselConfig::default().with_initial_index(1), 5);
    assert!(matches!(
        f.carousel.request_transition(i64::MAX),
        TransitionPlan::Commit { to: 4, .. }
    ));
    assert!(matches!(
        f.carousel.request_transition(i64::MIN),
        TransitionPlan::Commit { to: 0, .. }
    ));

    f.carousel.go_to(2);
    f.carousel.go_to(usize::MAX);
    assert_eq!(f.carousel.active_index(), 4);
    assert_eq!(*f.changed.lock(), vec![4, 0, 2, 4]);
}

// =============================================================================
// Content and Lifecycle
// =============================================================================

#[test]
fn test_slide_count_changes() {
    let f = Fixture::new(CarouselConfig::default().with_initial_index(3), 4);

    f.carousel.set_slide_count(2);
    assert_eq!(f.carousel.active_index(), 1);
    assert_eq!(*f.changed.lock(), vec![1]);
    assert_eq!(f.carousel.live_offset(), Offset::new(-WIDTH, 0.0));
    assert_eq!(f.carousel.slides().len(), 2);

    let controls = f.carousel.controls_state();
    assert_eq!(controls.count, 2);
    assert!(controls.is_last);

    f.settle();
    f.clear();
    f.carousel.set_slide_count(0);
    assert!(f.changed.lock().is_empty());
    assert_eq!(f.carousel.anchor_offset(), Offset::ZERO);
}

#[test]
fn test_resize_reanchors_without_animation() {
    let f = Fixture::new(CarouselConfig::default(), 3);
    f.carousel.go_to(2);
    f.settle();

    f.carousel.on_layout(LayoutRect::new(0.0, 0.0, 500.0, HEIGHT));
    assert_eq!(f.carousel.live_offset(), Offset::new(-1000.0, 0.0));
    assert!(!f.carousel.is_animating());
}

#[test]
fn test_offset_observers_see_every_frame() {
    let f = Fixture::new(CarouselConfig::default(), 3);
    let frames = Arc::new(Mutex::new(Vec::new()));
    let frames_clone = frames.clone();
    let id = f.carousel.subscribe_offset(move |offset| frames_clone.lock().push(*offset));

    f.carousel.go_to_next();
    f.settle();

    let frames = frames.lock().clone();
    assert!(frames.len() > 2);
    assert_eq!(frames.last(), Some(&Offset::new(-WIDTH, 0.0)));
    assert!(frames.iter().all(|offset| offset.y == 0.0));
    assert!(f.carousel.unsubscribe_offset(id));
}

#[test]
fn test_unmount_mid_settle() {
    let f = Fixture::new(CarouselConfig::default().with_autoplay_interval(1.0), 3);
    f.carousel.mount();
    f.carousel.go_to_next();
    f.carousel.unmount();

    assert!(!f.carousel.is_mounted());
    assert_eq!(f.scheduler.active_count(), 0);
    f.settle();
    assert!(f.finished.lock().is_empty());

    f.swipe(-200.0, 0.0);
    assert_eq!(f.carousel.active_index(), 1);
}
