//! Pointer-event routing.
//!
//! The router sits where the canvas's own click/drag handling used to be
//! and dispatches each event to the point mapper, the active curve tool,
//! or an injected [`PointerDefaults`] delegate that runs the host's
//! original behavior. Pass-through cases invoke the delegate exactly once;
//! consumed events re-render synchronously before returning, so the
//! preview is never stale relative to the latest input.

use crate::curves::DragSession;
use crate::manager::CurvyWallToolManager;
use crate::mapper::MapperDrag;
use crate::scene::WallHost;
use crate::settings::DropKey;
use kurbo::Point;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Only Ctrl held.
    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }

    /// Only Alt held.
    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::default()
        }
    }
}

/// A pointer event as delivered by the host canvas.
#[derive(Debug, Clone, Copy)]
pub struct ToolPointerEvent {
    /// Where the interaction started.
    pub origin: Point,
    /// Where the pointer currently is.
    pub destination: Point,
    /// Modifier keys at event time.
    pub modifiers: Modifiers,
}

impl ToolPointerEvent {
    /// A click-style event where origin and destination coincide.
    pub fn at(point: Point, modifiers: Modifiers) -> Self {
        Self {
            origin: point,
            destination: point,
            modifiers,
        }
    }
}

/// The host's original pointer behavior, invoked for pass-through cases.
pub trait PointerDefaults {
    fn click_left(&mut self, event: &ToolPointerEvent);
    fn drag_left_start(&mut self, event: &ToolPointerEvent);
    fn drag_left_move(&mut self, event: &ToolPointerEvent);
    fn drag_left_drop(&mut self, event: &ToolPointerEvent);
    fn drag_left_cancel(&mut self, event: &ToolPointerEvent);
    fn click_right(&mut self, event: &ToolPointerEvent);
}

enum ActiveDrag {
    Tool(DragSession),
    Mapper(MapperDrag),
}

/// Routes host pointer events into the tool framework.
#[derive(Default)]
pub struct InputRouter {
    drag: Option<ActiveDrag>,
}

impl InputRouter {
    /// Create a router with no drag in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag handler is currently in flight.
    pub fn drag_in_flight(&self) -> bool {
        self.drag.is_some()
    }

    /// Left click: mapping pick, tool affordance, placement, or host
    /// default when no tool is active.
    pub fn on_click_left(
        &mut self,
        manager: &mut CurvyWallToolManager,
        host: &dyn WallHost,
        defaults: &mut dyn PointerDefaults,
        event: &ToolPointerEvent,
    ) {
        if manager.currently_mapping_points() {
            if !manager.mapper_click(event.origin, host) {
                return;
            }
            if manager.can_apply_point_mapping() {
                manager.notify_mapping_ready();
            }
            manager.render(host);
            return;
        }

        if manager.mode().is_none() {
            return defaults.click_left(event);
        }
        if manager.tool_click(event.origin) {
            manager.render(host);
            return;
        }
        if event.modifiers.ctrl {
            manager.set_grid_snap(true);
        }
        match manager.settings().drop_key {
            DropKey::Ctrl if !event.modifiers.ctrl => return,
            DropKey::Alt if !event.modifiers.alt => return,
            _ => {}
        }
        manager.place_active_tool(event.origin);
        manager.render(host);
    }

    /// Left drag start: open a handle drag, or fall back to the host when
    /// nothing is under the pointer.
    pub fn on_drag_left_start(
        &mut self,
        manager: &mut CurvyWallToolManager,
        host: &dyn WallHost,
        defaults: &mut dyn PointerDefaults,
        event: &ToolPointerEvent,
    ) {
        if manager.currently_mapping_points() {
            let Some(drag) = manager.mapper_drag_candidate(event.origin) else {
                return;
            };
            manager.mapper_drag_move(&drag, event.destination);
            self.drag = Some(ActiveDrag::Mapper(drag));
            manager.render(host);
            return;
        }

        if manager.mode().is_none() {
            return defaults.drag_left_start(event);
        }
        match manager.tool_drag_candidate(event.origin) {
            None => defaults.drag_left_start(event),
            Some(session) => {
                manager.tool_drag_move(&session, event.destination);
                self.drag = Some(ActiveDrag::Tool(session));
                manager.render(host);
            }
        }
    }

    /// Left drag move: advance the in-flight handler.
    pub fn on_drag_left_move(
        &mut self,
        manager: &mut CurvyWallToolManager,
        host: &dyn WallHost,
        defaults: &mut dyn PointerDefaults,
        event: &ToolPointerEvent,
    ) {
        if manager.mode().is_none() {
            return defaults.drag_left_move(event);
        }
        let Some(drag) = self.drag.as_ref() else {
            return defaults.drag_left_move(event);
        };
        if manager.grid_snap_armed() && !event.modifiers.ctrl {
            manager.set_grid_snap(false);
        }
        match drag {
            ActiveDrag::Tool(session) => manager.tool_drag_move(session, event.destination),
            ActiveDrag::Mapper(mapper_drag) => {
                manager.mapper_drag_move(mapper_drag, event.destination)
            }
        }
        manager.render(host);
    }

    /// Left drag drop: finish the in-flight handler.
    pub fn on_drag_left_drop(
        &mut self,
        manager: &mut CurvyWallToolManager,
        host: &dyn WallHost,
        defaults: &mut dyn PointerDefaults,
        event: &ToolPointerEvent,
    ) {
        if manager.mode().is_none() {
            return defaults.drag_left_drop(event);
        }
        let Some(drag) = self.drag.take() else {
            return defaults.drag_left_drop(event);
        };
        match drag {
            ActiveDrag::Tool(session) => manager.tool_drag_drop(session, event.destination),
            ActiveDrag::Mapper(mapper_drag) => {
                manager.mapper_drag_drop(mapper_drag, event.destination)
            }
        }
        manager.render(host);
    }

    /// Left drag cancel: the in-flight handler's cancel always runs; a
    /// repeat cancel finds no handler and is a no-op.
    pub fn on_drag_left_cancel(
        &mut self,
        manager: &mut CurvyWallToolManager,
        host: &dyn WallHost,
        defaults: &mut dyn PointerDefaults,
        event: &ToolPointerEvent,
    ) {
        if manager.mode().is_none() {
            return defaults.drag_left_cancel(event);
        }
        let Some(drag) = self.drag.take() else {
            return;
        };
        match drag {
            ActiveDrag::Tool(session) => manager.tool_drag_cancel(session),
            ActiveDrag::Mapper(mapper_drag) => manager.mapper_drag_cancel(mapper_drag),
        }
        manager.render(host);
    }

    /// Right click with Ctrl held clears the active tool.
    pub fn on_click_right(
        &mut self,
        manager: &mut CurvyWallToolManager,
        host: &dyn WallHost,
        defaults: &mut dyn PointerDefaults,
        event: &ToolPointerEvent,
    ) {
        if !event.modifiers.ctrl || manager.mode().is_none() {
            return defaults.click_right(event);
        }
        self.drag = None;
        manager.set_mode(None);
        manager.render(host);
    }
}
