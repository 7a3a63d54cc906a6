use approx::assert_relative_eq;
use pixelaw_canvas::core::{CameraState, Cell};
use pixelaw_canvas::interaction::{JumpAnimation, ease_out_cubic};

fn animation(duration_ms: f64) -> JumpAnimation {
    JumpAnimation::new(
        Cell::new(10, 10),
        CameraState::new(0.0, 0.0, 1.0),
        CameraState::new(1_000.0, 500.0, 1.0),
        100.0,
        duration_ms,
    )
}

#[test]
fn easing_hits_endpoints_and_decelerates() {
    assert_eq!(ease_out_cubic(0.0), 0.0);
    assert_eq!(ease_out_cubic(1.0), 1.0);
    assert_relative_eq!(ease_out_cubic(0.5), 0.875);
    assert_eq!(ease_out_cubic(-1.0), 0.0);
    assert_eq!(ease_out_cubic(2.0), 1.0);
}

#[test]
fn progress_zero_is_start_and_one_is_target() {
    let jump = animation(500.0);

    let start = jump.frame_at(100.0);
    assert_eq!((start.offset_x, start.offset_y), (0.0, 0.0));
    assert!(!start.finished);

    let end = jump.frame_at(600.0);
    assert_eq!((end.offset_x, end.offset_y), (1_000.0, 500.0));
    assert!(end.finished);
}

#[test]
fn midway_frame_is_eased() {
    let jump = animation(500.0);

    let mid = jump.frame_at(350.0);

    assert_relative_eq!(mid.offset_x, 875.0);
    assert_relative_eq!(mid.offset_y, 437.5);
    assert!(!mid.finished);
}

#[test]
fn frames_past_the_end_stay_on_target() {
    let jump = animation(500.0);
    let late = jump.frame_at(10_000.0);
    assert_eq!((late.offset_x, late.offset_y), (1_000.0, 500.0));
    assert!(late.finished);
}

#[test]
fn zero_duration_finishes_immediately() {
    let jump = animation(0.0);
    assert_eq!(jump.progress_at(100.0), 1.0);
    let frame = jump.frame_at(100.0);
    assert!(frame.finished);
    assert_eq!((frame.offset_x, frame.offset_y), (1_000.0, 500.0));
}
