use egui::Pos2;

use crate::command::UndoRedoHandler;
use crate::layer_controller::LayerController;

mod draw;
mod eraser;

pub use draw::DrawTool;
pub use eraser::{EraserMode, EraserTool};

/// What a tool needs to turn a finished gesture into an undoable change
pub struct ToolContext<'a> {
    pub layers: &'a mut LayerController,
    pub undo: &'a mut UndoRedoHandler,
}

impl<'a> ToolContext<'a> {
    pub fn new(layers: &'a mut LayerController, undo: &'a mut UndoRedoHandler) -> Self {
        Self { layers, undo }
    }
}

/// Pointer handling of an input tool on the current page.
///
/// Tools change the document themselves and hand the already-applied change
/// to the undo handler when the gesture ends.
pub trait Tool {
    fn name(&self) -> &'static str;

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>);

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>);

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>);

    /// Drop any unfinished gesture
    fn cancel(&mut self) {}
}
