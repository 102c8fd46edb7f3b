//! Point mapping: fit the active tool's parameters from points picked off
//! existing scene geometry instead of free placement.
//!
//! The session is an ordered list of picked points, capped at the kind's
//! required count. Binding computes the parameters algebraically and rejects
//! degenerate input without touching the tool.

use crate::curves::{CurveKind, CurveTool};
use crate::handles::{HANDLE_HIT_TOLERANCE, Handle, HandleKind, HandleShape};
use crate::overlay::OverlayGraphics;
use crate::scene::WallHost;
use kurbo::{CubicBez, Point, QuadBez, Vec2};
use std::f64::consts::TAU;

/// Distance within which two picked points count as the same point.
const COINCIDENT_TOLERANCE: f64 = 1e-6;

/// Why a fit attempt was rejected. The tool is never mutated on error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FitError {
    #[error("need {needed} mapped points, have {got}")]
    TooFewPoints { needed: usize, got: usize },
    #[error("mapped points are collinear, no arc passes through them")]
    Collinear,
    #[error("mapped points coincide")]
    Coincident,
    #[error("mapped span is degenerate")]
    ZeroChord,
}

/// An in-progress drag of an already-picked point.
#[derive(Debug, Clone, Copy)]
pub struct MapperDrag {
    index: usize,
    saved: Point,
}

/// The point-mapping session.
#[derive(Debug, Clone, Default)]
pub struct PointMapper {
    points: Vec<Point>,
}

/// Points a kind needs for an exact fit.
pub fn required_points(kind: CurveKind) -> usize {
    match kind {
        CurveKind::Cubic => 4,
        CurveKind::Quadratic => 3,
        CurveKind::Arc => 3,
        CurveKind::Rectangle => 2,
    }
}

/// Instructional text shown by the host while mapping is active.
pub fn instructions(kind: CurveKind) -> &'static str {
    match kind {
        CurveKind::Cubic => {
            "Click 4 existing points: start, first tangent anchor, second tangent anchor, end"
        }
        CurveKind::Quadratic => "Click 3 existing points: start, tangent anchor, end",
        CurveKind::Arc => "Click 3 existing points the arc should pass through",
        CurveKind::Rectangle => "Click 2 existing points as opposite corners",
    }
}

impl PointMapper {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The picked points, in pick order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Drop all picked points.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Offer a click: snaps to existing scene geometry and appends the
    /// matched point. Returns true if the click was consumed.
    pub fn check_point_for_click(
        &mut self,
        point: Point,
        kind: CurveKind,
        host: &dyn WallHost,
    ) -> bool {
        if self.points.len() >= required_points(kind) {
            return false;
        }
        let Some(target) = host.snap_target(point, HANDLE_HIT_TOLERANCE) else {
            return false;
        };
        if self
            .points
            .iter()
            .any(|p| (*p - target).hypot() < COINCIDENT_TOLERANCE)
        {
            log::debug!("point mapping: duplicate point rejected at {target:?}");
            return false;
        }
        self.points.push(target);
        true
    }

    /// True once the session holds enough points for `kind`.
    pub fn has_enough_data(&self, kind: CurveKind) -> bool {
        self.points.len() >= required_points(kind)
    }

    /// Hit-test the picked points; on a match, open a drag session.
    pub fn check_point_for_drag(&self, point: Point) -> Option<MapperDrag> {
        self.points
            .iter()
            .position(|p| (*p - point).hypot() <= HANDLE_HIT_TOLERANCE)
            .map(|index| MapperDrag {
                index,
                saved: self.points[index],
            })
    }

    /// Move the dragged picked point.
    pub fn drag_move(&mut self, drag: &MapperDrag, point: Point) {
        if let Some(p) = self.points.get_mut(drag.index) {
            *p = point;
        }
    }

    /// Finish the drag at `point`, consuming the session.
    pub fn drag_drop(&mut self, drag: MapperDrag, point: Point) {
        self.drag_move(&drag, point);
    }

    /// Abort the drag, restoring the point's pre-drag position.
    pub fn drag_cancel(&mut self, drag: MapperDrag) {
        if let Some(p) = self.points.get_mut(drag.index) {
            *p = drag.saved;
        }
    }

    /// Record picked-point markers into the overlay.
    pub fn draw_handles(&self, overlay: &mut OverlayGraphics) {
        for (i, &point) in self.points.iter().enumerate() {
            overlay.push_handle(
                Handle::new(HandleKind::Picked(i), point).with_shape(HandleShape::Circle),
            );
        }
    }

    /// Fit the tool's parameters from the picked points. On error nothing
    /// is mutated and the session stays intact for re-picking.
    pub fn bind_data(&self, tool: &mut CurveTool) -> Result<(), FitError> {
        let needed = required_points(tool.kind());
        if self.points.len() < needed {
            return Err(FitError::TooFewPoints {
                needed,
                got: self.points.len(),
            });
        }
        let pts = &self.points[..needed];

        match tool {
            CurveTool::Cubic(t) => {
                reject_chord(pts[0], pts[3])?;
                t.bind(CubicBez::new(pts[0], pts[1], pts[2], pts[3]));
            }
            CurveTool::Quadratic(t) => {
                reject_chord(pts[0], pts[2])?;
                t.bind(QuadBez::new(pts[0], pts[1], pts[2]));
            }
            CurveTool::Arc(t) => {
                reject_coincident(pts)?;
                t.bind(fit_arc(pts[0], pts[1], pts[2])?);
            }
            CurveTool::Rectangle(t) => {
                if (pts[0].x - pts[1].x).abs() < COINCIDENT_TOLERANCE
                    || (pts[0].y - pts[1].y).abs() < COINCIDENT_TOLERANCE
                {
                    return Err(FitError::ZeroChord);
                }
                t.bind(crate::curves::RectParams {
                    corner_a: pts[0],
                    corner_b: pts[1],
                    insets: Default::default(),
                });
            }
        }
        Ok(())
    }
}

fn reject_chord(start: Point, end: Point) -> Result<(), FitError> {
    if (end - start).hypot() < COINCIDENT_TOLERANCE {
        Err(FitError::ZeroChord)
    } else {
        Ok(())
    }
}

fn reject_coincident(points: &[Point]) -> Result<(), FitError> {
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            if (*b - *a).hypot() < COINCIDENT_TOLERANCE {
                return Err(FitError::Coincident);
            }
        }
    }
    Ok(())
}

/// Circle through three points via perpendicular-bisector intersection,
/// swept so the arc runs through the middle point.
fn fit_arc(a: Point, b: Point, c: Point) -> Result<crate::curves::ArcParams, FitError> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < COINCIDENT_TOLERANCE {
        return Err(FitError::Collinear);
    }
    let a_sq = a.x * a.x + a.y * a.y;
    let b_sq = b.x * b.x + b.y * b.y;
    let c_sq = c.x * c.x + c.y * c.y;
    let center = Point::new(
        (a_sq * (b.y - c.y) + b_sq * (c.y - a.y) + c_sq * (a.y - b.y)) / d,
        (a_sq * (c.x - b.x) + b_sq * (a.x - c.x) + c_sq * (b.x - a.x)) / d,
    );
    let radius = (a - center).hypot();

    let theta_a = (a - center).atan2().rem_euclid(TAU);
    let theta_b = (b - center).atan2().rem_euclid(TAU);
    let theta_c = (c - center).atan2().rem_euclid(TAU);

    // Counter-clockwise from the first point unless the middle point lies
    // on the other side, in which case the sweep starts at the last point.
    let sweep_ac = (theta_c - theta_a).rem_euclid(TAU);
    let sweep_ab = (theta_b - theta_a).rem_euclid(TAU);
    let (start, sweep) = if sweep_ab <= sweep_ac {
        (theta_a, sweep_ac)
    } else {
        (theta_c, (theta_a - theta_c).rem_euclid(TAU))
    };

    Ok(crate::curves::ArcParams {
        corner_a: center - Vec2::new(radius, radius),
        corner_b: center + Vec2::new(radius, radius),
        start_angle: start,
        end_angle: start + sweep - TAU,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::{CurveSegments, ToolMode};
    use crate::scene::{BoxFuture, HostResult, WallSegment, WallStyle};

    struct PickHost {
        targets: Vec<Point>,
    }

    impl WallHost for PickHost {
        fn wall_style(&self) -> WallStyle {
            WallStyle::default()
        }

        fn snap_target(&self, near: Point, tolerance: f64) -> Option<Point> {
            self.targets
                .iter()
                .copied()
                .find(|t| (*t - near).hypot() <= tolerance)
        }

        fn create_walls(&self, _walls: Vec<WallSegment>) -> BoxFuture<'_, HostResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    fn host_with(targets: &[(f64, f64)]) -> PickHost {
        PickHost {
            targets: targets.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    #[test]
    fn test_click_snaps_to_existing_geometry() {
        let host = host_with(&[(100.0, 100.0)]);
        let mut mapper = PointMapper::new();
        assert!(mapper.check_point_for_click(Point::new(104.0, 97.0), CurveKind::Arc, &host));
        assert_eq!(mapper.points(), &[Point::new(100.0, 100.0)]);

        // nothing nearby: not consumed
        assert!(!mapper.check_point_for_click(Point::new(500.0, 500.0), CurveKind::Arc, &host));
    }

    #[test]
    fn test_duplicate_and_overflow_rejected() {
        let host = host_with(&[(0.0, 0.0), (50.0, 0.0), (100.0, 50.0)]);
        let mut mapper = PointMapper::new();
        assert!(mapper.check_point_for_click(Point::new(0.0, 0.0), CurveKind::Arc, &host));
        assert!(!mapper.check_point_for_click(Point::new(1.0, 1.0), CurveKind::Arc, &host));
        assert!(mapper.check_point_for_click(Point::new(50.0, 0.0), CurveKind::Arc, &host));
        assert!(mapper.check_point_for_click(Point::new(100.0, 50.0), CurveKind::Arc, &host));
        assert!(mapper.has_enough_data(CurveKind::Arc));

        // session is capped at the required count
        assert!(!mapper.check_point_for_click(Point::new(0.0, 0.0), CurveKind::Arc, &host));
        assert_eq!(mapper.points().len(), 3);
    }

    #[test]
    fn test_bind_rejects_too_few_points() {
        let mut tool = CurveTool::new(CurveKind::Cubic);
        let mut mapper = PointMapper::new();
        mapper.points = vec![Point::ZERO, Point::new(10.0, 0.0)];
        assert_eq!(
            mapper.bind_data(&mut tool),
            Err(FitError::TooFewPoints { needed: 4, got: 2 })
        );
        assert_eq!(tool.mode(), ToolMode::NotPlaced);
    }

    #[test]
    fn test_bind_rejects_collinear_arc() {
        let mut tool = CurveTool::new(CurveKind::Arc);
        let mut mapper = PointMapper::new();
        mapper.points = vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(120.0, 0.0),
        ];
        assert_eq!(mapper.bind_data(&mut tool), Err(FitError::Collinear));
        assert_eq!(tool.mode(), ToolMode::NotPlaced);
        assert_eq!(mapper.points().len(), 3);
    }

    #[test]
    fn test_arc_fit_passes_through_all_three_points() {
        let mut tool = CurveTool::new(CurveKind::Arc);
        let mut mapper = PointMapper::new();
        // three points of the unit-ish circle centered at (100, 100), r=50
        let picked = [
            Point::new(150.0, 100.0),
            Point::new(100.0, 150.0),
            Point::new(50.0, 100.0),
        ];
        mapper.points = picked.to_vec();
        mapper.bind_data(&mut tool).unwrap();
        assert_eq!(tool.mode(), ToolMode::Placed);

        let CurveTool::Arc(arc) = &tool else {
            unreachable!()
        };
        let params = arc.params().unwrap();
        let center = params.center();
        assert!((center - Point::new(100.0, 100.0)).hypot() < 1e-9);
        for p in picked {
            assert!(((p - center).hypot() - 50.0).abs() < 1e-9);
        }

        // the discretized arc comes within a segment-length of the middle pick
        let CurveSegments::Path(points) = tool.get_segments(64) else {
            unreachable!()
        };
        let closest = points
            .iter()
            .map(|p| (*p - picked[1]).hypot())
            .fold(f64::INFINITY, f64::min);
        assert!(closest < 5.0);
    }

    #[test]
    fn test_arc_fit_orients_through_middle_point_either_winding() {
        // same circle, picks ordered the other way around
        let mut tool = CurveTool::new(CurveKind::Arc);
        let mut mapper = PointMapper::new();
        let picked = [
            Point::new(50.0, 100.0),
            Point::new(100.0, 150.0),
            Point::new(150.0, 100.0),
        ];
        mapper.points = picked.to_vec();
        mapper.bind_data(&mut tool).unwrap();

        let CurveSegments::Path(points) = tool.get_segments(64) else {
            unreachable!()
        };
        let closest = points
            .iter()
            .map(|p| (*p - picked[1]).hypot())
            .fold(f64::INFINITY, f64::min);
        assert!(closest < 5.0);
    }

    #[test]
    fn test_cubic_bind_uses_picks_as_anchors() {
        let mut tool = CurveTool::new(CurveKind::Cubic);
        let mut mapper = PointMapper::new();
        mapper.points = vec![
            Point::new(0.0, 0.0),
            Point::new(40.0, -80.0),
            Point::new(160.0, -80.0),
            Point::new(200.0, 0.0),
        ];
        mapper.bind_data(&mut tool).unwrap();
        let CurveTool::Cubic(cubic) = &tool else {
            unreachable!()
        };
        let curve = cubic.curve().unwrap();
        assert_eq!(curve.p0, Point::new(0.0, 0.0));
        assert_eq!(curve.p1, Point::new(40.0, -80.0));
        assert_eq!(curve.p2, Point::new(160.0, -80.0));
        assert_eq!(curve.p3, Point::new(200.0, 0.0));
    }

    #[test]
    fn test_rect_bind_rejects_degenerate_span() {
        let mut tool = CurveTool::new(CurveKind::Rectangle);
        let mut mapper = PointMapper::new();
        mapper.points = vec![Point::new(0.0, 0.0), Point::new(0.0, 80.0)];
        assert_eq!(mapper.bind_data(&mut tool), Err(FitError::ZeroChord));
        assert_eq!(tool.mode(), ToolMode::NotPlaced);
    }

    #[test]
    fn test_drag_reposition_and_cancel() {
        let mut mapper = PointMapper::new();
        mapper.points = vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)];

        let drag = mapper.check_point_for_drag(Point::new(98.0, 4.0)).unwrap();
        mapper.drag_move(&drag, Point::new(140.0, 20.0));
        assert_eq!(mapper.points()[1], Point::new(140.0, 20.0));

        mapper.drag_cancel(drag);
        assert_eq!(mapper.points()[1], Point::new(100.0, 0.0));
    }

    #[test]
    fn test_no_drag_without_nearby_pick() {
        let mapper = PointMapper::new();
        assert!(mapper.check_point_for_drag(Point::new(0.0, 0.0)).is_none());
    }
}
