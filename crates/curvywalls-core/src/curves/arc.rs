//! Circular/elliptical arc tool.

use super::{CurveSegments, CurveToolImpl, ToolData, ToolMode, parameter_steps};
use crate::handles::{Handle, HandleKind, HandleShape};
use kurbo::{Point, Vec2};
use std::f64::consts::TAU;

/// Arc control parameters: the bounding corners of the circle/ellipse plus
/// the sweep's start and end angle offsets. Both offsets at zero produce a
/// closed full circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    /// First bounding corner.
    pub corner_a: Point,
    /// Opposite bounding corner.
    pub corner_b: Point,
    /// Absolute angle where the sweep begins.
    pub start_angle: f64,
    /// Offset from TAU where the sweep ends; the absolute end angle is
    /// `TAU + end_angle` (mod TAU).
    pub end_angle: f64,
}

impl ArcParams {
    /// Center of the bounding rect.
    pub fn center(&self) -> Point {
        self.corner_a.midpoint(self.corner_b)
    }

    /// Horizontal and vertical radii.
    pub fn radii(&self) -> (f64, f64) {
        (
            (self.corner_b.x - self.corner_a.x).abs() / 2.0,
            (self.corner_b.y - self.corner_a.y).abs() / 2.0,
        )
    }

    /// Counter-clockwise sweep length in (0, TAU].
    pub fn sweep(&self) -> f64 {
        let raw = (TAU + self.end_angle - self.start_angle).rem_euclid(TAU);
        if raw == 0.0 { TAU } else { raw }
    }

    /// Point on the arc at parameter angle `theta`.
    pub fn point_at(&self, theta: f64) -> Point {
        let center = self.center();
        let (rx, ry) = self.radii();
        center + Vec2::new(rx * theta.cos(), ry * theta.sin())
    }

    /// Parameter angle of a canvas point relative to the arc center.
    fn angle_of(&self, point: Point) -> f64 {
        let center = self.center();
        let (rx, ry) = self.radii();
        let d = point - center;
        let theta = if rx > f64::EPSILON && ry > f64::EPSILON {
            (d.y / ry).atan2(d.x / rx)
        } else {
            d.y.atan2(d.x)
        };
        theta.rem_euclid(TAU)
    }
}

/// Arc tool: sweeps an ellipse inscribed in its corner rect.
#[derive(Debug, Clone, Default)]
pub struct ArcTool {
    params: Option<ArcParams>,
}

impl ArcTool {
    /// Create a not-yet-placed tool.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current parameters, once placed.
    pub fn params(&self) -> Option<&ArcParams> {
        self.params.as_ref()
    }

    /// Adopt fitted parameters directly (point mapping).
    pub(crate) fn bind(&mut self, params: ArcParams) {
        self.params = Some(params);
    }
}

impl CurveToolImpl for ArcTool {
    fn mode(&self) -> ToolMode {
        if self.params.is_some() {
            ToolMode::Placed
        } else {
            ToolMode::NotPlaced
        }
    }

    fn place_tool(&mut self, origin: Point, previous: &ToolData) {
        let ToolData::Arc {
            corner_a,
            corner_b,
            start_angle,
            end_angle,
        } = previous
        else {
            return;
        };
        self.params = Some(ArcParams {
            corner_a: origin + *corner_a,
            corner_b: origin + *corner_b,
            start_angle: *start_angle,
            end_angle: *end_angle,
        });
    }

    fn check_point_for_click(&mut self, point: Point) -> bool {
        let hit = self
            .handles()
            .iter()
            .find(|handle| handle.hit_test(point, crate::handles::HANDLE_HIT_TOLERANCE))
            .map(|handle| handle.kind);
        let Some(kind) = hit else {
            return false;
        };
        if let Some(params) = &mut self.params {
            // Clicking an angle handle snaps that end back to a full sweep.
            match kind {
                HandleKind::Angle(0) => params.start_angle = 0.0,
                HandleKind::Angle(1) => params.end_angle = 0.0,
                _ => {}
            }
        }
        true
    }

    fn handles(&self) -> Vec<Handle> {
        let Some(params) = &self.params else {
            return Vec::new();
        };
        let sweep = params.sweep();
        vec![
            Handle::new(HandleKind::Corner(0), params.corner_a),
            Handle::new(HandleKind::Corner(1), params.corner_b),
            Handle::new(HandleKind::Angle(0), params.point_at(params.start_angle))
                .with_shape(HandleShape::Diamond),
            Handle::new(
                HandleKind::Angle(1),
                params.point_at(params.start_angle + sweep),
            )
            .with_shape(HandleShape::Diamond),
        ]
    }

    fn move_handle(&mut self, handle: HandleKind, point: Point) {
        let Some(params) = &mut self.params else {
            return;
        };
        match handle {
            HandleKind::Corner(0) => params.corner_a = point,
            HandleKind::Corner(1) => params.corner_b = point,
            HandleKind::Angle(0) => params.start_angle = params.angle_of(point),
            HandleKind::Angle(1) => params.end_angle = params.angle_of(point) - TAU,
            _ => {}
        }
    }

    fn get_segments(&self, count: u32) -> CurveSegments {
        let Some(params) = &self.params else {
            return CurveSegments::Path(Vec::new());
        };
        let sweep = params.sweep();
        CurveSegments::Path(
            parameter_steps(count)
                .map(|t| params.point_at(params.start_angle + sweep * t))
                .collect(),
        )
    }

    fn get_data(&self) -> Option<ToolData> {
        let params = self.params.as_ref()?;
        let center = params.center();
        Some(ToolData::Arc {
            corner_a: params.corner_a - center,
            corner_b: params.corner_b - center,
            start_angle: params.start_angle,
            end_angle: params.end_angle,
        })
    }

    fn clear_tool(&mut self) {
        self.params = None;
    }

    fn guide_lines(&self) -> Vec<(Point, Point)> {
        match &self.params {
            Some(params) => {
                let center = params.center();
                let sweep = params.sweep();
                vec![
                    (center, params.point_at(params.start_angle)),
                    (center, params.point_at(params.start_angle + sweep)),
                ]
            }
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::CurveKind;
    use std::f64::consts::PI;

    fn placed_tool() -> ArcTool {
        let mut tool = ArcTool::new();
        tool.place_tool(Point::ZERO, &ToolData::default_for(CurveKind::Arc));
        tool
    }

    #[test]
    fn test_default_is_full_circle() {
        let tool = placed_tool();
        let params = tool.params().unwrap();
        assert!((params.sweep() - TAU).abs() < 1e-12);

        let CurveSegments::Path(points) = tool.get_segments(32) else {
            panic!("arc produces a single path");
        };
        assert_eq!(points.len(), 33);
        // closed loop: last point meets the first
        assert!((points[32] - points[0]).hypot() < 1e-9);
    }

    #[test]
    fn test_quarter_sweep() {
        let mut tool = placed_tool();
        {
            // keep corners, narrow the sweep to 0..PI/2
            let params = tool.params.as_mut().unwrap();
            params.start_angle = 0.0;
            params.end_angle = -1.5 * PI;
        }
        let params = tool.params().unwrap();
        assert!((params.sweep() - PI / 2.0).abs() < 1e-12);

        let CurveSegments::Path(points) = tool.get_segments(4) else {
            panic!("arc produces a single path");
        };
        // radius 100 circle centered at origin
        assert!((points[0] - Point::new(100.0, 0.0)).hypot() < 1e-9);
        assert!((points[4] - Point::new(0.0, 100.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_angle_handle_drag() {
        let mut tool = placed_tool();
        // drag the start-angle handle to the top of the circle (PI/2 in
        // canvas coordinates with y growing down is still parameter PI/2)
        tool.move_handle(HandleKind::Angle(0), Point::new(0.0, 100.0));
        let params = tool.params().unwrap();
        assert!((params.start_angle - PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_click_resets_sweep_end() {
        let mut tool = placed_tool();
        tool.move_handle(HandleKind::Angle(1), Point::new(0.0, -100.0));
        assert!(tool.params().unwrap().sweep() < TAU);

        let end_handle = tool.params().unwrap().point_at(
            tool.params().unwrap().start_angle + tool.params().unwrap().sweep(),
        );
        assert!(tool.check_point_for_click(end_handle));
        assert!((tool.params().unwrap().sweep() - TAU).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_radii_produce_finite_points() {
        let mut tool = placed_tool();
        tool.move_handle(HandleKind::Corner(1), Point::new(-100.0, -100.0));
        let CurveSegments::Path(points) = tool.get_segments(8) else {
            panic!("arc produces a single path");
        };
        assert!(points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}
