use approx::assert_relative_eq;
use pixelaw_canvas::core::{
    CameraState, CanvasPoint, CanvasSize, Cell, ClientRect, MAX_UINT32, PixelRange, ResultBudget,
    WorldPoint, canvas_to_cell, compute_visible_range, to_canvas, to_canvas_local, to_cell,
    to_world,
};

#[test]
fn visible_range_at_unit_scale() {
    let range = compute_visible_range(CanvasSize::new(800, 600), CameraState::default(), 16.0);
    assert_eq!(range, PixelRange::new(0, 0, 50, 38));
}

#[test]
fn visible_range_follows_offset_and_scale() {
    let camera = CameraState::new(160.0, 320.0, 2.0);
    let range = compute_visible_range(CanvasSize::new(800, 600), camera, 16.0);

    // 400x300 world units visible starting at (160, 320).
    assert_eq!(range, PixelRange::new(10, 20, 35, 39));
}

#[test]
fn visible_range_floors_and_ceils_partial_cells() {
    let camera = CameraState::new(8.0, 8.0, 1.0);
    let range = compute_visible_range(CanvasSize::new(100, 100), camera, 16.0);

    assert_eq!(range.upper_left_x, 0);
    assert_eq!(range.upper_left_y, 0);
    assert_eq!(range.lower_right_x, 7);
    assert_eq!(range.lower_right_y, 7);
}

#[test]
fn result_budget_grows_when_zoomed_out() {
    let budget = ResultBudget::default();

    assert_eq!(budget.for_scale(2.0, 0.1, 2.0), 30);
    assert_eq!(budget.for_scale(0.1, 0.1, 2.0), 20_000);

    let mid = budget.for_scale(1.0, 0.1, 2.0);
    // ((2 - 1) / 1.9)^3 * 19_970 + 30
    assert_eq!(mid, 2_942);
    assert!(budget.for_scale(0.5, 0.1, 2.0) > mid);
}

#[test]
fn range_clamps_to_store_bounds() {
    let range = PixelRange::new(-10, -20, MAX_UINT32 + 5, 40).clamp_to_store_bounds();
    assert_eq!(range, PixelRange::new(0, 0, MAX_UINT32, 40));
}

#[test]
fn range_contains_is_inclusive() {
    let range = PixelRange::new(0, 0, 10, 10);
    assert!(range.contains(Cell::new(0, 0)));
    assert!(range.contains(Cell::new(10, 10)));
    assert!(!range.contains(Cell::new(11, 5)));
}

#[test]
fn client_to_cell_pipeline() {
    let rect = ClientRect::new(20.0, 30.0, 800.0, 600.0);
    let local = to_canvas_local(52.0, 62.0, Some(rect));
    assert_eq!(local, CanvasPoint::new(32.0, 32.0));

    let camera = CameraState::new(16.0, 0.0, 2.0);
    let world = to_world(local, camera);
    assert_relative_eq!(world.x, 32.0);
    assert_relative_eq!(world.y, 16.0);
    assert_eq!(to_cell(world, 16.0), Cell::new(2, 1));
    assert_eq!(canvas_to_cell(local, camera, 16.0), Cell::new(2, 1));

    let back = to_canvas(world, camera);
    assert_relative_eq!(back.x, local.x);
    assert_relative_eq!(back.y, local.y);
}

#[test]
fn unmounted_canvas_maps_to_origin() {
    assert_eq!(to_canvas_local(500.0, 400.0, None), CanvasPoint::new(0.0, 0.0));
}

#[test]
fn cells_floor_towards_negative_infinity() {
    assert_eq!(to_cell(WorldPoint::new(-0.5, 15.9), 16.0), Cell::new(-1, 0));
}
