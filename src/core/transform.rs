//! Pure conversions between client, canvas, world and cell coordinates.

use crate::core::{CameraState, CanvasPoint, Cell, ClientRect, WorldPoint};

/// Default world units per cell.
pub const DEFAULT_CELL_SIZE: f64 = 16.0;

/// Converts client (page) coordinates into canvas-local coordinates.
///
/// Returns the origin when the canvas is not mounted yet (`rect` is `None`).
#[must_use]
pub fn to_canvas_local(client_x: f64, client_y: f64, rect: Option<ClientRect>) -> CanvasPoint {
    match rect {
        Some(rect) => CanvasPoint::new(client_x - rect.left, client_y - rect.top),
        None => CanvasPoint::default(),
    }
}

#[must_use]
pub fn to_world(point: CanvasPoint, camera: CameraState) -> WorldPoint {
    WorldPoint::new(
        camera.offset_x + point.x / camera.scale,
        camera.offset_y + point.y / camera.scale,
    )
}

/// Inverse of [`to_world`].
#[must_use]
pub fn to_canvas(world: WorldPoint, camera: CameraState) -> CanvasPoint {
    CanvasPoint::new(
        (world.x - camera.offset_x) * camera.scale,
        (world.y - camera.offset_y) * camera.scale,
    )
}

#[must_use]
pub fn to_cell(world: WorldPoint, cell_size: f64) -> Cell {
    Cell::new(
        (world.x / cell_size).floor() as i64,
        (world.y / cell_size).floor() as i64,
    )
}

/// World coordinate of the center of `cell`.
#[must_use]
pub fn cell_center(cell: Cell, cell_size: f64) -> WorldPoint {
    WorldPoint::new(
        cell.x as f64 * cell_size + cell_size / 2.0,
        cell.y as f64 * cell_size + cell_size / 2.0,
    )
}

/// Cell under a canvas-local point for the given camera.
#[must_use]
pub fn canvas_to_cell(point: CanvasPoint, camera: CameraState, cell_size: f64) -> Cell {
    to_cell(to_world(point, camera), cell_size)
}
