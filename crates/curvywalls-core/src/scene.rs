//! Host scene interface.
//!
//! The canvas that owns committed wall documents lives outside this crate.
//! It is reached through the [`WallHost`] trait: a style template for new
//! walls, a hit-test against existing geometry (used by point mapping), and
//! a bulk wall-creation call awaited by [`apply`](crate::manager::CurvyWallToolManager::apply).

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors surfaced by the host scene.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("wall creation rejected: {0}")]
    Rejected(String),
    #[error("scene unavailable: {0}")]
    Unavailable(String),
}

/// Result type for host scene operations.
pub type HostResult<T> = Result<T, HostError>;

/// Boxed future for the async commit seam (works without a runtime).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Wall color (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl WallColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

/// Style template applied to preview walls and committed segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallStyle {
    /// Stroke color.
    pub color: WallColor,
    /// Stroke width.
    pub width: f64,
}

impl Default for WallStyle {
    fn default() -> Self {
        Self {
            color: WallColor::black(),
            width: 2.0,
        }
    }
}

/// A straight wall segment descriptor: the unit of preview and commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    /// First endpoint.
    pub p1: Point,
    /// Second endpoint.
    pub p2: Point,
    /// Style properties.
    pub style: WallStyle,
}

impl WallSegment {
    /// Create a new wall segment.
    pub fn new(p1: Point, p2: Point, style: WallStyle) -> Self {
        Self { p1, p2, style }
    }

    /// Get the length of the segment.
    pub fn length(&self) -> f64 {
        (self.p2 - self.p1).hypot()
    }
}

/// The host scene/canvas collaborator.
///
/// Unconsumed pointer events are routed back to the host by the
/// [`InputRouter`](crate::router::InputRouter); this trait only covers what
/// the tool framework actively asks of the scene.
pub trait WallHost {
    /// Style template for walls created by the active tool.
    fn wall_style(&self) -> WallStyle;

    /// Hit-test existing scene geometry (e.g. wall endpoints) near `near`.
    /// Returns the matched point, or `None` if nothing is within `tolerance`.
    fn snap_target(&self, near: Point, tolerance: f64) -> Option<Point>;

    /// Create wall documents for all given segments in one bulk operation.
    fn create_walls(&self, walls: Vec<WallSegment>) -> BoxFuture<'_, HostResult<()>>;
}
