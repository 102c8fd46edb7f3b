//! Grid snapping for control-point drags.

use kurbo::Point;

/// Grid size for snapping (matches the visual canvas grid).
pub const GRID_SIZE: f64 = 20.0;

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point) -> Point {
    Point::new(
        (point.x / GRID_SIZE).round() * GRID_SIZE,
        (point.y / GRID_SIZE).round() * GRID_SIZE,
    )
}
