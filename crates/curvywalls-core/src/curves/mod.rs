//! Curve tool definitions.
//!
//! One tool per curve kind, sharing the placement/click/drag/segments
//! protocol through [`CurveTool`], an exhaustive enum dispatcher.

mod arc;
mod cubic;
mod quad;
mod rect;

pub use arc::{ArcParams, ArcTool};
pub use cubic::CubicTool;
pub use quad::QuadTool;
pub use rect::{RectParams, RectTool, SideInsets};

use crate::handles::{HANDLE_HIT_TOLERANCE, Handle, HandleKind};
use crate::overlay::OverlayGraphics;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum segment resolution.
pub const MIN_SEGMENTS: u32 = 1;
/// Maximum segment resolution.
pub const MAX_SEGMENTS: u32 = 64;

/// Placement state of a curve tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolMode {
    /// No control points committed yet.
    NotPlaced,
    /// Parameters are structurally complete; previewable and committable.
    Placed,
}

/// The supported curve kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    Cubic,
    Quadratic,
    Arc,
    Rectangle,
}

/// Cached control parameters for one kind, stored as offsets relative to
/// the placement origin so the last-used shape can be re-stamped anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolData {
    Cubic {
        start: Vec2,
        end: Vec2,
        control1: Vec2,
        control2: Vec2,
    },
    Quadratic {
        start: Vec2,
        end: Vec2,
        control: Vec2,
    },
    Arc {
        corner_a: Vec2,
        corner_b: Vec2,
        start_angle: f64,
        end_angle: f64,
    },
    Rectangle {
        corner_a: Vec2,
        corner_b: Vec2,
        insets: SideInsets,
    },
}

impl ToolData {
    /// The kind this parameter set belongs to.
    pub fn kind(&self) -> CurveKind {
        match self {
            ToolData::Cubic { .. } => CurveKind::Cubic,
            ToolData::Quadratic { .. } => CurveKind::Quadratic,
            ToolData::Arc { .. } => CurveKind::Arc,
            ToolData::Rectangle { .. } => CurveKind::Rectangle,
        }
    }

    /// Seed shape for a kind that has never been placed.
    pub fn default_for(kind: CurveKind) -> Self {
        match kind {
            CurveKind::Cubic => ToolData::Cubic {
                start: Vec2::new(-100.0, 0.0),
                end: Vec2::new(100.0, 0.0),
                control1: Vec2::new(-100.0, -132.0),
                control2: Vec2::new(100.0, -132.0),
            },
            CurveKind::Quadratic => ToolData::Quadratic {
                start: Vec2::new(-100.0, 0.0),
                end: Vec2::new(100.0, 0.0),
                control: Vec2::new(0.0, -132.0),
            },
            CurveKind::Arc => ToolData::Arc {
                corner_a: Vec2::new(-100.0, -100.0),
                corner_b: Vec2::new(100.0, 100.0),
                start_angle: 0.0,
                end_angle: 0.0,
            },
            CurveKind::Rectangle => ToolData::Rectangle {
                corner_a: Vec2::new(-100.0, -100.0),
                corner_b: Vec2::new(100.0, 100.0),
                insets: SideInsets::default(),
            },
        }
    }
}

/// Discretized output of a curve tool.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveSegments {
    /// A single open polyline (cubic, quadratic, arc).
    Path(Vec<Point>),
    /// One polyline per rectangle side.
    Sides(Vec<Vec<Point>>),
}

impl CurveSegments {
    /// Check if there is nothing to preview.
    pub fn is_empty(&self) -> bool {
        match self {
            CurveSegments::Path(points) => points.is_empty(),
            CurveSegments::Sides(sides) => sides.iter().all(|side| side.is_empty()),
        }
    }

    /// Flatten into straight preview edges, in draw order.
    pub fn edges(&self) -> Vec<(Point, Point)> {
        match self {
            CurveSegments::Path(points) => points.windows(2).map(|w| (w[0], w[1])).collect(),
            CurveSegments::Sides(sides) => sides
                .iter()
                .flat_map(|side| side.windows(2).map(|w| (w[0], w[1])))
                .collect(),
        }
    }
}

/// An in-progress handle drag: the grabbed handle plus a full snapshot of
/// the pre-drag tool, restored verbatim on cancel.
#[derive(Debug, Clone)]
pub struct DragSession {
    /// Which handle was grabbed.
    pub handle: HandleKind,
    saved: CurveTool,
}

/// Shared behavior implemented by each curve kind.
pub(crate) trait CurveToolImpl {
    fn mode(&self) -> ToolMode;
    fn place_tool(&mut self, origin: Point, previous: &ToolData);
    fn check_point_for_click(&mut self, point: Point) -> bool;
    fn handles(&self) -> Vec<Handle>;
    fn move_handle(&mut self, handle: HandleKind, point: Point);
    fn get_segments(&self, count: u32) -> CurveSegments;
    fn get_data(&self) -> Option<ToolData>;
    fn clear_tool(&mut self);

    /// Anchor-to-control tangent lines to draw under the handles.
    fn guide_lines(&self) -> Vec<(Point, Point)> {
        Vec::new()
    }
}

/// The active curve tool, dispatching the shared protocol per kind.
#[derive(Debug, Clone)]
pub enum CurveTool {
    Cubic(CubicTool),
    Quadratic(QuadTool),
    Arc(ArcTool),
    Rectangle(RectTool),
}

impl CurveTool {
    /// Create a fresh, not-yet-placed tool of the given kind.
    pub fn new(kind: CurveKind) -> Self {
        match kind {
            CurveKind::Cubic => CurveTool::Cubic(CubicTool::new()),
            CurveKind::Quadratic => CurveTool::Quadratic(QuadTool::new()),
            CurveKind::Arc => CurveTool::Arc(ArcTool::new()),
            CurveKind::Rectangle => CurveTool::Rectangle(RectTool::new()),
        }
    }

    /// The tool's kind.
    pub fn kind(&self) -> CurveKind {
        match self {
            CurveTool::Cubic(_) => CurveKind::Cubic,
            CurveTool::Quadratic(_) => CurveKind::Quadratic,
            CurveTool::Arc(_) => CurveKind::Arc,
            CurveTool::Rectangle(_) => CurveKind::Rectangle,
        }
    }

    fn inner(&self) -> &dyn CurveToolImpl {
        match self {
            CurveTool::Cubic(t) => t,
            CurveTool::Quadratic(t) => t,
            CurveTool::Arc(t) => t,
            CurveTool::Rectangle(t) => t,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn CurveToolImpl {
        match self {
            CurveTool::Cubic(t) => t,
            CurveTool::Quadratic(t) => t,
            CurveTool::Arc(t) => t,
            CurveTool::Rectangle(t) => t,
        }
    }

    /// Current placement state.
    pub fn mode(&self) -> ToolMode {
        self.inner().mode()
    }

    /// Seed control parameters at `origin` from a cached shape.
    pub fn place_tool(&mut self, origin: Point, previous: &ToolData) {
        self.inner_mut().place_tool(origin, previous);
    }

    /// Offer a click to the tool. Returns true if consumed.
    pub fn check_point_for_click(&mut self, point: Point) -> bool {
        self.inner_mut().check_point_for_click(point)
    }

    /// Hit-test all handles; on a match, open a drag session.
    pub fn check_point_for_drag(&self, point: Point) -> Option<DragSession> {
        self.inner()
            .handles()
            .iter()
            .find(|handle| handle.hit_test(point, HANDLE_HIT_TOLERANCE))
            .map(|handle| DragSession {
                handle: handle.kind,
                saved: self.clone(),
            })
    }

    /// Move the dragged handle to `point`.
    pub fn drag_move(&mut self, session: &DragSession, point: Point) {
        self.inner_mut().move_handle(session.handle, point);
    }

    /// Finish the drag at `point`, consuming the session.
    pub fn drag_drop(&mut self, session: DragSession, point: Point) {
        self.inner_mut().move_handle(session.handle, point);
    }

    /// Abort the drag, restoring the exact pre-drag state.
    pub fn drag_cancel(&mut self, session: DragSession) {
        *self = session.saved;
    }

    /// Discretize into `count` straight sub-segments per (sub-)path.
    /// Pure: identical parameters and count yield identical output.
    pub fn get_segments(&self, count: u32) -> CurveSegments {
        let count = count.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
        self.inner().get_segments(count)
    }

    /// Current parameters as placement-relative offsets, once placed.
    pub fn get_data(&self) -> Option<ToolData> {
        self.inner().get_data()
    }

    /// Current handle affordances.
    pub fn handles(&self) -> Vec<Handle> {
        self.inner().handles()
    }

    /// Record guide lines and handle markers into the overlay.
    pub fn draw_handles(&self, overlay: &mut OverlayGraphics) {
        let inner = self.inner();
        for (from, to) in inner.guide_lines() {
            overlay.guide_line(from, to);
        }
        for handle in inner.handles() {
            overlay.push_handle(handle);
        }
    }

    /// Reset to not-placed; parameters are dropped.
    pub fn clear_tool(&mut self) {
        self.inner_mut().clear_tool();
    }
}

/// Evenly spaced parameter values 0..=1 producing `count + 1` samples.
pub(crate) fn parameter_steps(count: u32) -> impl Iterator<Item = f64> {
    (0..=count).map(move |i| f64::from(i) / f64::from(count))
}

/// Interpolate a straight side into `count` segments (`count + 1` points).
pub(crate) fn subdivide_segment(from: Point, to: Point, count: u32) -> Vec<Point> {
    parameter_steps(count).map(|t| from.lerp(to, t)).collect()
}
