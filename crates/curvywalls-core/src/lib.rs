//! Curvy Walls Core Library
//!
//! Pointer-driven curve tools for sculpting wall paths on a 2D canvas:
//! place a cubic/quadratic Bézier, an arc or a rectangle, drag its control
//! points, watch the discretized preview reconcile in place, and commit the
//! resulting straight wall segments to the host scene.

pub mod curves;
pub mod handles;
pub mod manager;
pub mod mapper;
pub mod overlay;
pub mod pool;
pub mod router;
pub mod scene;
pub mod settings;
pub mod snap;

pub use curves::{
    CurveKind, CurveSegments, CurveTool, DragSession, MAX_SEGMENTS, MIN_SEGMENTS, ToolData,
    ToolMode,
};
pub use handles::{HANDLE_HIT_TOLERANCE, Handle, HandleKind, HandleShape, Side};
pub use manager::{CurvyWallToolManager, ModeListener};
pub use mapper::{FitError, PointMapper};
pub use overlay::{OverlayCommand, OverlayGraphics};
pub use pool::{PreviewWall, WallPreviewPool};
pub use router::{InputRouter, Modifiers, PointerDefaults, ToolPointerEvent};
pub use scene::{BoxFuture, HostError, HostResult, WallColor, WallHost, WallSegment, WallStyle};
pub use settings::{DropKey, ToolSettings};
pub use snap::{GRID_SIZE, snap_to_grid};
