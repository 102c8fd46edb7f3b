//! Retained drawing surface for control-point affordances.
//!
//! Tools record their handles and guide lines into an [`OverlayGraphics`]
//! command list each render; the host replays the commands onto whatever
//! surface it draws with. Clearing the list is the "erase the context" step
//! of the render cycle.

use crate::handles::Handle;
use kurbo::Point;

/// A single overlay drawing command.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayCommand {
    /// Draw a manipulation handle marker.
    Handle(Handle),
    /// Draw a thin guide line (e.g. anchor-to-control tangent).
    GuideLine { from: Point, to: Point },
}

/// Accumulates overlay drawing commands for one render.
#[derive(Debug, Clone, Default)]
pub struct OverlayGraphics {
    commands: Vec<OverlayCommand>,
}

impl OverlayGraphics {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Erase everything recorded so far.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Record a handle marker.
    pub fn push_handle(&mut self, handle: Handle) {
        self.commands.push(OverlayCommand::Handle(handle));
    }

    /// Record a guide line.
    pub fn guide_line(&mut self, from: Point, to: Point) {
        self.commands.push(OverlayCommand::GuideLine { from, to });
    }

    /// The recorded commands, in draw order.
    pub fn commands(&self) -> &[OverlayCommand] {
        &self.commands
    }

    /// Check if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handles::HandleKind;

    #[test]
    fn test_clear_erases_commands() {
        let mut overlay = OverlayGraphics::new();
        overlay.push_handle(Handle::new(HandleKind::Start, Point::ZERO));
        overlay.guide_line(Point::ZERO, Point::new(10.0, 0.0));
        assert_eq!(overlay.commands().len(), 2);

        overlay.clear();
        assert!(overlay.is_empty());
    }
}
