use approx::assert_relative_eq;
use pixelaw_canvas::core::{
    CameraState, CanvasPoint, CanvasSize, Cell, WorldPoint, cell_center, to_canvas, to_world,
};
use pixelaw_canvas::interaction::{CameraLimits, InertiaConfig, InertiaState};

fn canvas() -> CanvasSize {
    CanvasSize::new(800, 600)
}

#[test]
fn pan_moves_offset_by_delta_over_scale() {
    let limits = CameraLimits::default();
    let camera = CameraState::new(100.0, 100.0, 2.0);

    let next = limits.pan(camera, canvas(), 20.0, 10.0).expect("pan");

    assert_relative_eq!(next.offset_x, 90.0);
    assert_relative_eq!(next.offset_y, 95.0);
    assert_relative_eq!(next.scale, 2.0);
}

#[test]
fn pan_clamps_offsets_at_zero() {
    let limits = CameraLimits::default();
    let camera = CameraState::new(5.0, 5.0, 1.0);

    let next = limits.pan(camera, canvas(), 50.0, 50.0).expect("pan");

    assert_eq!(next.offset_x, 0.0);
    assert_eq!(next.offset_y, 0.0);
}

#[test]
fn pan_rejects_non_finite_delta() {
    let limits = CameraLimits::default();
    assert!(limits
        .pan(CameraState::default(), canvas(), f64::NAN, 0.0)
        .is_err());
}

#[test]
fn pan_rejects_delta_that_overflows_world_space() {
    let limits = CameraLimits::default();
    let camera = CameraState::new(0.0, 0.0, 0.1);

    assert!(limits.pan(camera, canvas(), -1e308, 0.0).is_err());
    assert!(limits.pan(camera, canvas(), 0.0, -1e308).is_err());
}

#[test]
fn pan_respects_max_extent() {
    let limits = CameraLimits {
        max_extent: Some(WorldPoint::new(1_000.0, 1_000.0)),
        ..CameraLimits::default()
    };
    let camera = CameraState::new(0.0, 0.0, 1.0);

    let next = limits
        .pan(camera, canvas(), -5_000.0, -5_000.0)
        .expect("pan");

    assert_relative_eq!(next.offset_x, 200.0);
    assert_relative_eq!(next.offset_y, 400.0);
}

#[test]
fn zoom_keeps_world_point_under_anchor() {
    let limits = CameraLimits::default();
    let camera = CameraState::new(100.0, 50.0, 1.0);
    let anchor = CanvasPoint::new(400.0, 300.0);
    let before = to_world(anchor, camera);

    let next = limits
        .zoom_about(camera, canvas(), anchor, 2.0)
        .expect("zoom");

    assert_relative_eq!(next.scale, 2.0);
    assert_relative_eq!(next.offset_x, 300.0);
    assert_relative_eq!(next.offset_y, 200.0);
    let after = to_world(anchor, next);
    assert_relative_eq!(after.x, before.x, epsilon = 1e-9);
    assert_relative_eq!(after.y, before.y, epsilon = 1e-9);
}

#[test]
fn zoom_clamps_scale_into_bounds() {
    let limits = CameraLimits::default();
    let camera = CameraState::new(1_000.0, 1_000.0, 1.0);
    let anchor = CanvasPoint::new(10.0, 10.0);

    let zoomed_in = limits
        .zoom_about(camera, canvas(), anchor, 100.0)
        .expect("zoom in");
    let zoomed_out = limits
        .zoom_about(camera, canvas(), anchor, 0.001)
        .expect("zoom out");

    assert_eq!(zoomed_in.scale, 2.0);
    assert_eq!(zoomed_out.scale, 0.1);
}

#[test]
fn zoom_rejects_non_positive_factor() {
    let limits = CameraLimits::default();
    let anchor = CanvasPoint::new(0.0, 0.0);
    assert!(limits
        .zoom_about(CameraState::default(), canvas(), anchor, 0.0)
        .is_err());
    assert!(limits
        .zoom_about(CameraState::default(), canvas(), anchor, -1.0)
        .is_err());
}

#[test]
fn pinch_matches_zoom_about() {
    let limits = CameraLimits::default();
    let camera = CameraState::new(320.0, 240.0, 0.75);
    let center = CanvasPoint::new(123.0, 456.0);

    let pinched = limits
        .pinch(camera, canvas(), center, 1.25)
        .expect("pinch");
    let zoomed = limits
        .zoom_about(camera, canvas(), center, 1.25)
        .expect("zoom");

    assert_eq!(pinched, zoomed);
}

#[test]
fn centered_on_puts_cell_center_mid_canvas() {
    let limits = CameraLimits::default();
    let camera = CameraState::new(0.0, 0.0, 1.0);
    let cell = Cell::new(100, 100);

    let next = limits.centered_on(camera, canvas(), cell, 16.0);

    assert_relative_eq!(next.offset_x, 1_208.0);
    assert_relative_eq!(next.offset_y, 1_308.0);
    let on_screen = to_canvas(cell_center(cell, 16.0), next);
    assert_relative_eq!(on_screen.x, 400.0);
    assert_relative_eq!(on_screen.y, 300.0);
}

#[test]
fn centered_on_near_origin_clamps_to_zero() {
    let limits = CameraLimits::default();
    let next = limits.centered_on(CameraState::default(), canvas(), Cell::new(1, 1), 16.0);
    assert_eq!(next.offset_x, 0.0);
    assert_eq!(next.offset_y, 0.0);
}

#[test]
fn inertia_decays_and_stops() {
    let config = InertiaConfig::default();
    let mut inertia = InertiaState::default();
    inertia.start(10.0, 0.0);

    let first = inertia.step(config).expect("first step moves");
    assert_relative_eq!(first.0, 10.0);
    assert_relative_eq!(inertia.velocity_x, 9.5);

    let mut frames = 1;
    while inertia.step(config).is_some() {
        frames += 1;
        assert!(frames < 1_000, "inertia never settled");
    }
    assert!(!inertia.active);
    assert_eq!(inertia.speed(), 0.0);
}

#[test]
fn inertia_below_threshold_does_not_move() {
    let mut inertia = InertiaState::default();
    inertia.start(0.3, 0.2);
    assert!(inertia.step(InertiaConfig::default()).is_none());
    assert!(!inertia.active);
}
