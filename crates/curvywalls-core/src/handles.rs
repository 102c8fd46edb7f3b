//! Handle definitions for curve manipulation.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Handle hit tolerance in canvas units.
pub const HANDLE_HIT_TOLERANCE: f64 = 24.0;

/// A manipulation handle on a curve tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// The kind of handle (determines what dragging it changes).
    pub kind: HandleKind,
    /// Position in canvas coordinates.
    pub position: Point,
    /// Visual shape of the handle.
    pub shape: HandleShape,
}

/// The kind of handle - determines what manipulation it performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Curve start anchor.
    Start,
    /// Curve end anchor.
    End,
    /// Bézier control point (0-based index along the curve).
    Control(usize),
    /// Bounding corner for arcs and rectangles (0 = first, 1 = second).
    Corner(usize),
    /// Arc angle handle (0 = sweep start, 1 = sweep end).
    Angle(usize),
    /// Rectangle side handle (drag adjusts that side's inset).
    Side(Side),
    /// A point picked from existing scene geometry during point mapping.
    Picked(usize),
}

/// Rectangle side positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Visual shape of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleShape {
    /// Square handle (corners and sides).
    #[default]
    Square,
    /// Circular handle (curve endpoints).
    Circle,
    /// Diamond handle (control points and angle handles).
    Diamond,
}

impl Handle {
    /// Create a new handle.
    pub fn new(kind: HandleKind, position: Point) -> Self {
        Self {
            kind,
            position,
            shape: HandleShape::default(),
        }
    }

    /// Set the handle shape.
    pub fn with_shape(mut self, shape: HandleShape) -> Self {
        self.shape = shape;
        self
    }

    /// Check if a point (in canvas coordinates) hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_test_within_tolerance() {
        let handle = Handle::new(HandleKind::Start, Point::new(100.0, 100.0));
        assert!(handle.hit_test(Point::new(110.0, 100.0), 16.0));
        assert!(!handle.hit_test(Point::new(120.0, 100.0), 16.0));
    }

    #[test]
    fn test_hit_test_uses_euclidean_distance() {
        let handle = Handle::new(HandleKind::End, Point::ZERO);
        // 12/16/20 triangle: just on the boundary
        assert!(handle.hit_test(Point::new(12.0, 16.0), 20.0));
        assert!(!handle.hit_test(Point::new(12.0, 16.1), 20.0));
    }
}
