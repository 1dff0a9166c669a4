use egui::{Color32, Pos2};

use super::{Tool, ToolContext};
use crate::command::InsertElements;
use crate::element::{Element, factory};
use crate::id::ElementId;

/// Freehand pen: collects points while the pointer is down and places the
/// finished stroke on the selected layer of the current page.
#[derive(Debug)]
pub struct DrawTool {
    color: Color32,
    width: f32,
    points: Vec<Pos2>,
    last_stroke: Option<ElementId>,
}

impl Default for DrawTool {
    fn default() -> Self {
        Self::new(Color32::BLACK, 2.0)
    }
}

impl DrawTool {
    pub fn new(color: Color32, width: f32) -> Self {
        Self {
            color,
            width,
            points: Vec::new(),
            last_stroke: None,
        }
    }

    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn is_drawing(&self) -> bool {
        !self.points.is_empty()
    }

    /// Id of the stroke placed by the most recent gesture
    pub fn last_stroke(&self) -> Option<ElementId> {
        self.last_stroke
    }

    fn finish(&mut self, ctx: &mut ToolContext<'_>) -> Option<ElementId> {
        let mut points = std::mem::take(&mut self.points);
        if points.is_empty() {
            return None;
        }
        if points.len() == 1 {
            // A tap leaves a dot
            points.push(points[0]);
        }

        let page_index = ctx.layers.current_page_index()?;
        ctx.layers.ensure_layer_exists(page_index);

        let stroke = factory::create_stroke(points, self.width, self.color);
        let id = stroke.id();
        let placed = {
            let mut doc = ctx.undo.document().lock();
            let page = doc.page_mut(page_index)?;
            let page_id = page.id();
            let layer = page.selected_layer_mut()?;
            let layer_id = layer.id();
            match layer.add_top(stroke) {
                Ok(index) => Some((page_id, layer_id, index)),
                Err(_) => None,
            }
        };

        let (page_id, layer_id, index) = placed?;
        ctx.undo.record(InsertElements::applied(page_id, layer_id, vec![(index, id)]));
        Some(id)
    }
}

impl Tool for DrawTool {
    fn name(&self) -> &'static str {
        "Draw"
    }

    fn on_pointer_down(&mut self, pos: Pos2, _ctx: &mut ToolContext<'_>) {
        self.points.clear();
        self.points.push(pos);
    }

    fn on_pointer_move(&mut self, pos: Pos2, _ctx: &mut ToolContext<'_>) {
        if self.is_drawing() {
            self.points.push(pos);
        }
    }

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) {
        if !self.is_drawing() {
            return;
        }
        if self.points.last() != Some(&pos) {
            self.points.push(pos);
        }
        self.last_stroke = self.finish(ctx);
    }

    fn cancel(&mut self) {
        self.points.clear();
    }
}
