//! Quadratic Bézier tool.

use super::{CurveSegments, CurveToolImpl, ToolData, ToolMode, parameter_steps};
use crate::handles::{Handle, HandleKind, HandleShape};
use kurbo::{ParamCurve, Point, QuadBez};

/// Three-point quadratic Bézier: two anchors sharing one control.
#[derive(Debug, Clone, Default)]
pub struct QuadTool {
    curve: Option<QuadBez>,
}

impl QuadTool {
    /// Create a not-yet-placed tool.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current curve, once placed.
    pub fn curve(&self) -> Option<&QuadBez> {
        self.curve.as_ref()
    }

    /// Adopt a fitted curve directly (point mapping).
    pub(crate) fn bind(&mut self, curve: QuadBez) {
        self.curve = Some(curve);
    }
}

impl CurveToolImpl for QuadTool {
    fn mode(&self) -> ToolMode {
        if self.curve.is_some() {
            ToolMode::Placed
        } else {
            ToolMode::NotPlaced
        }
    }

    fn place_tool(&mut self, origin: Point, previous: &ToolData) {
        let ToolData::Quadratic {
            start,
            end,
            control,
        } = previous
        else {
            return;
        };
        self.curve = Some(QuadBez::new(
            origin + *start,
            origin + *control,
            origin + *end,
        ));
    }

    fn check_point_for_click(&mut self, point: Point) -> bool {
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
            Handle::new(HandleKind::End, curve.p2).with_shape(HandleShape::Circle),
            Handle::new(HandleKind::Control(0), curve.p1).with_shape(HandleShape::Diamond),
        ]
    }

    fn move_handle(&mut self, handle: HandleKind, point: Point) {
        let Some(curve) = &mut self.curve else {
            return;
        };
        match handle {
            // The single control is shared by both anchors; it stays put.
            HandleKind::Start => curve.p0 = point,
            HandleKind::End => curve.p2 = point,
            HandleKind::Control(0) => curve.p1 = point,
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
        let center = curve.p0.midpoint(curve.p2);
        Some(ToolData::Quadratic {
            start: curve.p0 - center,
            end: curve.p2 - center,
            control: curve.p1 - center,
        })
    }

    fn clear_tool(&mut self) {
        self.curve = None;
    }

    fn guide_lines(&self) -> Vec<(Point, Point)> {
        match &self.curve {
            Some(curve) => vec![(curve.p0, curve.p1), (curve.p2, curve.p1)],
            None => Vec::new(),
        }
    }
}
