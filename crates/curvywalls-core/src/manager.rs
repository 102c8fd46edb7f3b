//! Top-level tool state machine.
//!
//! `CurvyWallToolManager` owns the active curve tool, the per-kind
//! last-used parameter cache, the preview pool and the point-mapping
//! session. It is an explicit context object: construct one at startup and
//! hand it to the [`InputRouter`](crate::router::InputRouter) together with
//! the host.

use crate::curves::{CurveKind, CurveTool, DragSession, MAX_SEGMENTS, MIN_SEGMENTS, ToolData, ToolMode};
use crate::mapper::{FitError, MapperDrag, PointMapper, instructions};
use crate::overlay::OverlayGraphics;
use crate::pool::{PreviewWall, WallPreviewPool};
use crate::scene::{HostResult, WallHost, WallSegment};
use crate::settings::ToolSettings;
use crate::snap::snap_to_grid;
use kurbo::Point;
use std::collections::HashMap;

/// Observer for mode changes: `(active kind, tool placement state)`.
pub type ModeListener = Box<dyn FnMut(Option<CurveKind>, Option<ToolMode>)>;

/// The curve-tool framework's central state machine.
pub struct CurvyWallToolManager {
    active_tool: Option<CurveTool>,
    segments: u32,
    last_tool_data: HashMap<CurveKind, ToolData>,
    pool: WallPreviewPool,
    overlay: OverlayGraphics,
    mapper: PointMapper,
    in_point_map_mode: bool,
    grid_snap_armed: bool,
    mode_listener: Option<ModeListener>,
    ignore_next_tool_mode_change: bool,
    settings: ToolSettings,
}

impl CurvyWallToolManager {
    /// Create a manager with the given settings. Every kind's parameter
    /// cache starts from its seed shape.
    pub fn new(settings: ToolSettings) -> Self {
        let last_tool_data = [
            CurveKind::Cubic,
            CurveKind::Quadratic,
            CurveKind::Arc,
            CurveKind::Rectangle,
        ]
        .into_iter()
        .map(|kind| (kind, ToolData::default_for(kind)))
        .collect();

        Self {
            active_tool: None,
            segments: settings.default_segments.clamp(MIN_SEGMENTS, MAX_SEGMENTS),
            last_tool_data,
            pool: WallPreviewPool::new(),
            overlay: OverlayGraphics::new(),
            mapper: PointMapper::new(),
            in_point_map_mode: false,
            grid_snap_armed: false,
            mode_listener: None,
            ignore_next_tool_mode_change: false,
            settings,
        }
    }

    /// The active curve kind, `None` when no tool is selected.
    pub fn mode(&self) -> Option<CurveKind> {
        self.active_tool.as_ref().map(CurveTool::kind)
    }

    /// The active tool's placement state, `None` when no tool is selected.
    pub fn tool_mode(&self) -> Option<ToolMode> {
        self.active_tool.as_ref().map(CurveTool::mode)
    }

    /// The active tool, if any.
    pub fn active_tool(&self) -> Option<&CurveTool> {
        self.active_tool.as_ref()
    }

    /// Current tool settings.
    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    /// Replace the tool settings (drop key takes effect on the next click).
    pub fn set_settings(&mut self, settings: ToolSettings) {
        self.settings = settings;
    }

    /// Register the mode-change listener.
    pub fn set_mode_listener(&mut self, listener: ModeListener) {
        self.mode_listener = Some(listener);
    }

    /// Switch the active curve kind. A no-op when unchanged; otherwise the
    /// in-progress geometry is discarded, point mapping exits, and a fresh
    /// not-placed tool of the new kind takes over.
    pub fn set_mode(&mut self, kind: Option<CurveKind>) {
        if self.mode() == kind {
            return;
        }
        // The clear step below fires a redundant NotPlaced notification
        // when a placed tool is discarded; suppress that one call.
        self.ignore_next_tool_mode_change = self.tool_mode() == Some(ToolMode::Placed);
        self.clear_tool();
        if self.in_point_map_mode {
            self.in_point_map_mode = false;
            self.mapper.clear();
        }
        self.active_tool = kind.map(CurveTool::new);
        log::debug!("tool mode set to {kind:?}");

        let tool_mode = self.tool_mode();
        if let Some(listener) = self.mode_listener.as_mut() {
            listener(kind, tool_mode);
        }
    }

    /// Current segment resolution.
    pub fn segments(&self) -> u32 {
        self.segments
    }

    /// Set the segment resolution, clamped to [1, 64]. Re-renders only
    /// while a tool is active.
    pub fn set_segments(&mut self, value: u32, host: &dyn WallHost) {
        self.segments = value.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
        if self.mode().is_some() {
            self.render(host);
        }
    }

    /// Whether the point-mapping session is active.
    pub fn currently_mapping_points(&self) -> bool {
        self.in_point_map_mode
    }

    /// Enter or exit point mapping. Only meaningful while a tool is
    /// active; the session starts and ends empty either way.
    pub fn toggle_point_mapping(&mut self, host: &dyn WallHost) {
        if self.active_tool.is_none() {
            return;
        }
        self.in_point_map_mode = !self.in_point_map_mode;
        self.mapper.clear();
        self.render(host);
    }

    /// Instructional text for the host to display while mapping.
    pub fn mapping_instructions(&self) -> Option<&'static str> {
        self.mode().map(instructions)
    }

    /// True once the mapping session holds enough points to bind.
    pub fn can_apply_point_mapping(&self) -> bool {
        match self.mode() {
            Some(kind) => self.mapper.has_enough_data(kind),
            None => false,
        }
    }

    /// Bind the mapped points onto the active tool. On success the session
    /// is destroyed, mapping exits and the tool is placed; on error the
    /// session stays intact for re-picking and nothing is mutated.
    pub fn apply_point_mapping(&mut self, host: &dyn WallHost) -> Result<(), FitError> {
        if !self.in_point_map_mode {
            return Ok(());
        }
        let Some(tool) = self.active_tool.as_mut() else {
            return Ok(());
        };
        self.mapper.bind_data(tool)?;
        self.in_point_map_mode = false;
        self.mapper.clear();
        self.notify_tool_mode(Some(ToolMode::Placed));
        self.render(host);
        Ok(())
    }

    /// Commit the previewed polyline as wall documents. A no-op unless the
    /// tool is placed. The tool is cleared locally before the host call
    /// resolves; a host failure propagates without retry.
    pub async fn apply(&mut self, host: &dyn WallHost) -> HostResult<()> {
        let Some(tool) = self.active_tool.as_ref() else {
            return Ok(());
        };
        if tool.mode() != ToolMode::Placed {
            return Ok(());
        }
        let style = host.wall_style();
        let walls: Vec<WallSegment> = tool
            .get_segments(self.segments)
            .edges()
            .into_iter()
            .map(|(p1, p2)| WallSegment::new(p1, p2, style.clone()))
            .collect();
        log::info!("committing {} wall segments to the scene", walls.len());

        self.clear_tool();
        host.create_walls(walls).await
    }

    /// Discard the in-progress geometry and release the preview objects.
    /// The active kind stays selected; callers re-render afterwards.
    pub fn clear_tool(&mut self) {
        let Some(tool) = self.active_tool.as_mut() else {
            self.ignore_next_tool_mode_change = false;
            return;
        };
        let was_placed = tool.mode() == ToolMode::Placed;
        tool.clear_tool();
        self.pool.release_all();
        self.overlay.clear();
        self.grid_snap_armed = false;
        if was_placed {
            self.notify_tool_mode(Some(ToolMode::NotPlaced));
        }
    }

    /// Re-derive the preview from the current state. In mapping mode only
    /// the picked points are drawn; otherwise the curve is discretized and
    /// reconciled into the pool and the tool's handles are drawn. Runs
    /// synchronously inside every consumed input event.
    pub fn render(&mut self, host: &dyn WallHost) {
        self.overlay.clear();

        if self.in_point_map_mode {
            self.pool.reconcile(&[], &host.wall_style());
            self.mapper.draw_handles(&mut self.overlay);
            return;
        }

        let Some(tool) = self.active_tool.as_ref() else {
            return;
        };
        let segments = tool.get_segments(self.segments);
        if segments.is_empty() {
            return;
        }
        self.pool.reconcile(&segments.edges(), &host.wall_style());
        tool.draw_handles(&mut self.overlay);
        if let Some(data) = tool.get_data() {
            self.last_tool_data.insert(tool.kind(), data);
        }
    }

    /// The preview walls currently on display, in edge order.
    pub fn preview_walls(&self) -> impl Iterator<Item = &PreviewWall> {
        self.pool.active_walls()
    }

    /// The handle overlay recorded by the last render.
    pub fn overlay(&self) -> &OverlayGraphics {
        &self.overlay
    }

    /// Place the active tool at `origin`, re-using the kind's last shape.
    pub(crate) fn place_active_tool(&mut self, origin: Point) {
        let Some(tool) = self.active_tool.as_mut() else {
            return;
        };
        let kind = tool.kind();
        let data = self
            .last_tool_data
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| ToolData::default_for(kind));
        let before = tool.mode();
        tool.place_tool(origin, &data);
        let after = tool.mode();
        if before != after {
            self.notify_tool_mode(Some(after));
        }
    }

    pub(crate) fn tool_click(&mut self, point: Point) -> bool {
        match self.active_tool.as_mut() {
            Some(tool) => tool.check_point_for_click(point),
            None => false,
        }
    }

    pub(crate) fn tool_drag_candidate(&self, point: Point) -> Option<DragSession> {
        self.active_tool.as_ref()?.check_point_for_drag(point)
    }

    pub(crate) fn tool_drag_move(&mut self, session: &DragSession, point: Point) {
        let point = self.maybe_snap(point);
        if let Some(tool) = self.active_tool.as_mut() {
            tool.drag_move(session, point);
        }
    }

    pub(crate) fn tool_drag_drop(&mut self, session: DragSession, point: Point) {
        let point = self.maybe_snap(point);
        if let Some(tool) = self.active_tool.as_mut() {
            tool.drag_drop(session, point);
        }
        self.grid_snap_armed = false;
    }

    pub(crate) fn tool_drag_cancel(&mut self, session: DragSession) {
        if let Some(tool) = self.active_tool.as_mut() {
            tool.drag_cancel(session);
        }
    }

    pub(crate) fn mapper_click(&mut self, point: Point, host: &dyn WallHost) -> bool {
        let Some(kind) = self.mode() else {
            return false;
        };
        self.mapper.check_point_for_click(point, kind, host)
    }

    pub(crate) fn mapper_drag_candidate(&self, point: Point) -> Option<MapperDrag> {
        self.mapper.check_point_for_drag(point)
    }

    pub(crate) fn mapper_drag_move(&mut self, drag: &MapperDrag, point: Point) {
        self.mapper.drag_move(drag, point);
    }

    pub(crate) fn mapper_drag_drop(&mut self, drag: MapperDrag, point: Point) {
        self.mapper.drag_drop(drag, point);
    }

    pub(crate) fn mapper_drag_cancel(&mut self, drag: MapperDrag) {
        self.mapper.drag_cancel(drag);
    }

    /// Fired by the router the moment the mapping session becomes bindable.
    pub(crate) fn notify_mapping_ready(&mut self) {
        let mode = self.mode();
        if let Some(listener) = self.mode_listener.as_mut() {
            listener(mode, Some(ToolMode::NotPlaced));
        }
    }

    pub(crate) fn grid_snap_armed(&self) -> bool {
        self.grid_snap_armed
    }

    pub(crate) fn set_grid_snap(&mut self, armed: bool) {
        self.grid_snap_armed = armed;
    }

    fn maybe_snap(&self, point: Point) -> Point {
        if self.grid_snap_armed {
            snap_to_grid(point)
        } else {
            point
        }
    }

    fn notify_tool_mode(&mut self, tool_mode: Option<ToolMode>) {
        if self.ignore_next_tool_mode_change {
            self.ignore_next_tool_mode_change = false;
            return;
        }
        let mode = self.mode();
        if let Some(listener) = self.mode_listener.as_mut() {
            listener(mode, tool_mode);
        }
    }
}

impl Default for CurvyWallToolManager {
    fn default() -> Self {
        Self::new(ToolSettings::default())
    }
}
