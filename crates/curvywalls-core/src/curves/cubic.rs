//! Cubic Bézier tool.

use super::{CurveSegments, CurveToolImpl, ToolData, ToolMode, parameter_steps};
use crate::handles::{Handle, HandleKind, HandleShape};
use kurbo::{CubicBez, ParamCurve, Point};

/// Four-point cubic Bézier: two anchors, two tangent controls.
#[derive(Debug, Clone, Default)]
pub struct CubicTool {
    curve: Option<CubicBez>,
}

impl CubicTool {
    /// Create a not-yet-placed tool.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current curve, once placed.
    pub fn curve(&self) -> Option<&CubicBez> {
        self.curve.as_ref()
    }

    /// Adopt a fitted curve directly (point mapping).
    pub(crate) fn bind(&mut self, curve: CubicBez) {
        self.curve = Some(curve);
    }
}

impl CurveToolImpl for CubicTool {
    fn mode(&self) -> ToolMode {
        if self.curve.is_some() {
            ToolMode::Placed
        } else {
            ToolMode::NotPlaced
        }
    }

    fn place_tool(&mut self, origin: Point, previous: &ToolData) {
        let ToolData::Cubic {
            start,
            end,
            control1,
            control2,
        } = previous
        else {
            return;
        };
        self.curve = Some(CubicBez::new(
            origin + *start,
            origin + *control1,
            origin + *control2,
            origin + *end,
        ));
    }

    fn check_point_for_click(&mut self, point: Point) -> bool {
        // A click on an existing handle must not re-place the tool.
        self.handles()
            .iter()
            .any(|handle| handle.hit_test(point, crate::handles::HANDLE_HIT_TOLERANCE))
    }

    fn handles(&self) -> Vec<Handle> {
        let Some(curve) = &self.curve else {
            return Vec::new();
        };
        vec![
            Handle::new(HandleKind::Start, curve.p0).with_shape(HandleShape::Circle),
            Handle::new(HandleKind::End, curve.p3).with_shape(HandleShape::Circle),
            Handle::new(HandleKind::Control(0), curve.p1).with_shape(HandleShape::Diamond),
            Handle::new(HandleKind::Control(1), curve.p2).with_shape(HandleShape::Diamond),
        ]
    }

    fn move_handle(&mut self, handle: HandleKind, point: Point) {
        let Some(curve) = &mut self.curve else {
            return;
        };
        match handle {
            // Anchors carry their tangent control along, preserving shape.
            HandleKind::Start => {
                let delta = point - curve.p0;
                curve.p0 = point;
                curve.p1 += delta;
            }
            HandleKind::End => {
                let delta = point - curve.p3;
                curve.p3 = point;
                curve.p2 += delta;
            }
            HandleKind::Control(0) => curve.p1 = point,
            HandleKind::Control(1) => curve.p2 = point,
            _ => {}
        }
    }

    fn get_segments(&self, count: u32) -> CurveSegments {
        let Some(curve) = &self.curve else {
            return CurveSegments::Path(Vec::new());
        };
        CurveSegments::Path(parameter_steps(count).map(|t| curve.eval(t)).collect())
    }

    fn get_data(&self) -> Option<ToolData> {
        let curve = self.curve.as_ref()?;
        let center = curve.p0.midpoint(curve.p3);
        Some(ToolData::Cubic {
            start: curve.p0 - center,
            end: curve.p3 - center,
            control1: curve.p1 - center,
            control2: curve.p2 - center,
        })
    }

    fn clear_tool(&mut self) {
        self.curve = None;
    }

    fn guide_lines(&self) -> Vec<(Point, Point)> {
        match &self.curve {
            Some(curve) => vec![(curve.p0, curve.p1), (curve.p3, curve.p2)],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::CurveKind;

    fn placed_tool() -> CubicTool {
        let mut tool = CubicTool::new();
        tool.place_tool(
            Point::new(200.0, 300.0),
            &ToolData::default_for(CurveKind::Cubic),
        );
        tool
    }

    #[test]
    fn test_place_seeds_relative_to_origin() {
        let tool = placed_tool();
        let curve = tool.curve().unwrap();
        assert_eq!(curve.p0, Point::new(100.0, 300.0));
        assert_eq!(curve.p3, Point::new(300.0, 300.0));
        assert_eq!(curve.p1, Point::new(100.0, 168.0));
        assert_eq!(curve.p2, Point::new(300.0, 168.0));
        assert_eq!(tool.mode(), ToolMode::Placed);
    }

    #[test]
    fn test_segments_hit_both_anchors() {
        let tool = placed_tool();
        let CurveSegments::Path(points) = tool.get_segments(8) else {
            panic!("cubic produces a single path");
        };
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], tool.curve().unwrap().p0);
        assert!((points[8] - tool.curve().unwrap().p3).hypot() < 1e-9);
    }

    #[test]
    fn test_segments_deterministic() {
        let tool = placed_tool();
        assert_eq!(tool.get_segments(16), tool.get_segments(16));
    }

    #[test]
    fn test_anchor_drag_carries_control() {
        let mut tool = placed_tool();
        tool.move_handle(HandleKind::Start, Point::new(120.0, 310.0));
        let curve = tool.curve().unwrap();
        assert_eq!(curve.p0, Point::new(120.0, 310.0));
        // control1 followed by the same (20, 10) delta
        assert_eq!(curve.p1, Point::new(120.0, 178.0));
        // far end untouched
        assert_eq!(curve.p3, Point::new(300.0, 300.0));
    }

    #[test]
    fn test_data_offsets_roundtrip_through_place() {
        let mut tool = placed_tool();
        tool.move_handle(HandleKind::Control(0), Point::new(50.0, 50.0));
        let data = tool.get_data().unwrap();

        let mut again = CubicTool::new();
        again.place_tool(Point::new(500.0, 500.0), &data);
        let moved = again.get_data().unwrap();
        assert_eq!(data, moved);
    }

    #[test]
    fn test_clear_returns_to_not_placed() {
        let mut tool = placed_tool();
        tool.clear_tool();
        assert_eq!(tool.mode(), ToolMode::NotPlaced);
        assert!(tool.get_segments(8).is_empty());
        assert!(tool.get_data().is_none());
    }
}
