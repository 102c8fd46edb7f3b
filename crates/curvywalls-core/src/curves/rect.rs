//! Rectangle tool.

use super::{CurveSegments, CurveToolImpl, ToolData, ToolMode, subdivide_segment};
use crate::handles::{Handle, HandleKind, HandleShape, Side};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Inward offset of each rectangle side from its bounding edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideInsets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for SideInsets {
    fn default() -> Self {
        Self {
            top: 1.0,
            right: 1.0,
            bottom: 1.0,
            left: 1.0,
        }
    }
}

/// Rectangle control parameters: two bounding corners plus per-side insets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectParams {
    /// First placed corner.
    pub corner_a: Point,
    /// Opposite corner.
    pub corner_b: Point,
    /// Per-side inward offsets.
    pub insets: SideInsets,
}

impl RectParams {
    /// Normalized bounding rect of the two corners.
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.corner_a, self.corner_b)
    }

    /// The four corners of the inset rectangle: TL, TR, BR, BL.
    /// Opposing insets that cross collapse onto their shared midline.
    pub fn inset_corners(&self) -> [Point; 4] {
        let bounds = self.bounds();
        let (x0, x1) = resolve_span(bounds.x0 + self.insets.left, bounds.x1 - self.insets.right);
        let (y0, y1) = resolve_span(bounds.y0 + self.insets.top, bounds.y1 - self.insets.bottom);
        [
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }
}

fn resolve_span(lo: f64, hi: f64) -> (f64, f64) {
    if lo <= hi {
        (lo, hi)
    } else {
        let mid = (lo + hi) / 2.0;
        (mid, mid)
    }
}

/// Rectangle tool: four wall runs along the inset sides.
#[derive(Debug, Clone, Default)]
pub struct RectTool {
    params: Option<RectParams>,
}

impl RectTool {
    /// Create a not-yet-placed tool.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current parameters, once placed.
    pub fn params(&self) -> Option<&RectParams> {
        self.params.as_ref()
    }

    /// Adopt fitted parameters directly (point mapping).
    pub(crate) fn bind(&mut self, params: RectParams) {
        self.params = Some(params);
    }
}

impl CurveToolImpl for RectTool {
    fn mode(&self) -> ToolMode {
        if self.params.is_some() {
            ToolMode::Placed
        } else {
            ToolMode::NotPlaced
        }
    }

    fn place_tool(&mut self, origin: Point, previous: &ToolData) {
        let ToolData::Rectangle {
            corner_a,
            corner_b,
            insets,
        } = previous
        else {
            return;
        };
        self.params = Some(RectParams {
            corner_a: origin + *corner_a,
            corner_b: origin + *corner_b,
            insets: *insets,
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
            // Clicking a side handle pushes that side back onto the bounds.
            if let HandleKind::Side(side) = kind {
                match side {
                    Side::Top => params.insets.top = 0.0,
                    Side::Right => params.insets.right = 0.0,
                    Side::Bottom => params.insets.bottom = 0.0,
                    Side::Left => params.insets.left = 0.0,
                }
            }
        }
        true
    }

    fn handles(&self) -> Vec<Handle> {
        let Some(params) = &self.params else {
            return Vec::new();
        };
        let [tl, tr, br, bl] = params.inset_corners();
        vec![
            Handle::new(HandleKind::Corner(0), params.corner_a),
            Handle::new(HandleKind::Corner(1), params.corner_b),
            Handle::new(HandleKind::Side(Side::Top), tl.midpoint(tr))
                .with_shape(HandleShape::Diamond),
            Handle::new(HandleKind::Side(Side::Right), tr.midpoint(br))
                .with_shape(HandleShape::Diamond),
            Handle::new(HandleKind::Side(Side::Bottom), br.midpoint(bl))
                .with_shape(HandleShape::Diamond),
            Handle::new(HandleKind::Side(Side::Left), bl.midpoint(tl))
                .with_shape(HandleShape::Diamond),
        ]
    }

    fn move_handle(&mut self, handle: HandleKind, point: Point) {
        let Some(params) = &mut self.params else {
            return;
        };
        let bounds = params.bounds();
        match handle {
            HandleKind::Corner(0) => params.corner_a = point,
            HandleKind::Corner(1) => params.corner_b = point,
            HandleKind::Side(Side::Top) => {
                let max = (bounds.height() - params.insets.bottom).max(0.0);
                params.insets.top = (point.y - bounds.y0).clamp(0.0, max);
            }
            HandleKind::Side(Side::Bottom) => {
                let max = (bounds.height() - params.insets.top).max(0.0);
                params.insets.bottom = (bounds.y1 - point.y).clamp(0.0, max);
            }
            HandleKind::Side(Side::Left) => {
                let max = (bounds.width() - params.insets.right).max(0.0);
                params.insets.left = (point.x - bounds.x0).clamp(0.0, max);
            }
            HandleKind::Side(Side::Right) => {
                let max = (bounds.width() - params.insets.left).max(0.0);
                params.insets.right = (bounds.x1 - point.x).clamp(0.0, max);
            }
            _ => {}
        }
    }

    fn get_segments(&self, count: u32) -> CurveSegments {
        let Some(params) = &self.params else {
            return CurveSegments::Sides(Vec::new());
        };
        let [tl, tr, br, bl] = params.inset_corners();
        CurveSegments::Sides(vec![
            subdivide_segment(tl, tr, count),
            subdivide_segment(tr, br, count),
            subdivide_segment(br, bl, count),
            subdivide_segment(bl, tl, count),
        ])
    }

    fn get_data(&self) -> Option<ToolData> {
        let params = self.params.as_ref()?;
        let center = params.bounds().center();
        Some(ToolData::Rectangle {
            corner_a: params.corner_a - center,
            corner_b: params.corner_b - center,
            insets: params.insets,
        })
    }

    fn clear_tool(&mut self) {
        self.params = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::CurveKind;

    fn placed_tool() -> RectTool {
        let mut tool = RectTool::new();
        tool.place_tool(Point::ZERO, &ToolData::default_for(CurveKind::Rectangle));
        tool
    }

    #[test]
    fn test_four_sides_with_count_plus_one_points() {
        let tool = placed_tool();
        for count in [1u32, 3, 64] {
            let CurveSegments::Sides(sides) = tool.get_segments(count) else {
                panic!("rectangle produces side polylines");
            };
            assert_eq!(sides.len(), 4);
            for side in &sides {
                assert_eq!(side.len(), count as usize + 1);
            }
        }
    }

    #[test]
    fn test_sides_share_inset_corners() {
        let tool = placed_tool();
        let CurveSegments::Sides(sides) = tool.get_segments(5) else {
            panic!("rectangle produces side polylines");
        };
        for i in 0..4 {
            let next = (i + 1) % 4;
            assert_eq!(sides[i].last(), sides[next].first());
        }
    }

    #[test]
    fn test_default_insets_shrink_bounds_by_one() {
        let tool = placed_tool();
        let [tl, _, br, _] = tool.params().unwrap().inset_corners();
        assert_eq!(tl, Point::new(-99.0, -99.0));
        assert_eq!(br, Point::new(99.0, 99.0));
    }

    #[test]
    fn test_side_drag_adjusts_inset() {
        let mut tool = placed_tool();
        tool.move_handle(HandleKind::Side(Side::Top), Point::new(0.0, -60.0));
        assert!((tool.params().unwrap().insets.top - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_side_insets_cannot_cross() {
        let mut tool = placed_tool();
        tool.move_handle(HandleKind::Side(Side::Top), Point::new(0.0, 500.0));
        let insets = tool.params().unwrap().insets;
        assert!(insets.top <= 200.0 - insets.bottom + f64::EPSILON);
    }

    #[test]
    fn test_side_click_resets_inset() {
        let mut tool = placed_tool();
        tool.move_handle(HandleKind::Side(Side::Left), Point::new(-50.0, 0.0));
        assert!(tool.params().unwrap().insets.left > 1.0);

        let [tl, _, _, bl] = tool.params().unwrap().inset_corners();
        let left_mid = bl.midpoint(tl);
        assert!(tool.check_point_for_click(left_mid));
        assert!(tool.params().unwrap().insets.left.abs() < f64::EPSILON);
    }

    #[test]
    fn test_swapped_corners_normalize() {
        let mut tool = placed_tool();
        tool.move_handle(HandleKind::Corner(0), Point::new(100.0, 100.0));
        tool.move_handle(HandleKind::Corner(1), Point::new(-100.0, -100.0));
        let CurveSegments::Sides(sides) = tool.get_segments(2) else {
            panic!("rectangle produces side polylines");
        };
        // top side still runs along the top of the normalized bounds
        assert!((sides[0][0].y - (-99.0)).abs() < f64::EPSILON);
    }
}
