use egui::Pos2;

use super::{Tool, ToolContext};
use crate::command::{Command, DeleteElements, Group, InsertElements};
use crate::element::{Element, ElementType};
use crate::event::EditorEvent;
use crate::id::ElementId;
use crate::layer::{InsertionOrder, Layer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EraserMode {
    /// Whatever the eraser touches is removed entirely
    #[default]
    WholeElement,
    /// Strokes lose only the touched points and fall apart into fragments
    Split,
}

/// Erases on the selected layer of the current page.
///
/// Every pointer event erases immediately; the steps of one gesture are
/// recorded as a single "Erase" group when the pointer is released.
#[derive(Debug)]
pub struct EraserTool {
    radius: f32,
    mode: EraserMode,
    active: bool,
    steps: Vec<Command>,
}

impl Default for EraserTool {
    fn default() -> Self {
        Self::new(5.0, EraserMode::default())
    }
}

impl EraserTool {
    pub fn new(radius: f32, mode: EraserMode) -> Self {
        Self {
            radius,
            mode,
            active: false,
            steps: Vec::new(),
        }
    }

    pub fn mode(&self) -> EraserMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EraserMode) {
        self.mode = mode;
    }

    fn erase_at(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) {
        let Some(page_index) = ctx.layers.current_page_index() else {
            return;
        };

        let erased = {
            let mut doc = ctx.undo.document().lock();
            let Some(page) = doc.page_mut(page_index) else {
                return;
            };
            let page_id = page.id();
            let Some(layer) = page.selected_layer_mut() else {
                return;
            };
            let layer_id = layer.id();

            let step = match self.mode {
                EraserMode::WholeElement => erase_whole(layer, pos, self.radius),
                EraserMode::Split => erase_split(layer, pos, self.radius),
            };
            match step {
                Some((removed, fragments)) => {
                    self.steps.push(DeleteElements::applied(page_id, layer_id, removed).into());
                    if let Some(fragments) = fragments {
                        self.steps.push(InsertElements::applied(page_id, layer_id, fragments).into());
                    }
                    true
                }
                None => false,
            }
        };

        // Repaint mid-gesture, after the guard is dropped
        if erased {
            ctx.undo.events().emit(EditorEvent::PageChanged(page_index));
        }
    }

    fn finish(&mut self, ctx: &mut ToolContext<'_>) {
        self.active = false;
        if self.steps.is_empty() {
            return;
        }
        let steps = std::mem::take(&mut self.steps);
        log::debug!("Erase gesture produced {} steps", steps.len());
        ctx.undo.record(Group::new("Erase", steps));
    }
}

type ErasedStep = (InsertionOrder, Option<Vec<(usize, ElementId)>>);

fn erase_whole(layer: &mut Layer, pos: Pos2, radius: f32) -> Option<ErasedStep> {
    let hits: Vec<ElementId> = layer
        .elements()
        .iter()
        .filter(|e| e.hit_test(pos, radius))
        .map(|e| e.id())
        .collect();
    if hits.is_empty() {
        return None;
    }
    match layer.remove_all(&hits) {
        Ok(removed) => Some((removed, None)),
        Err(err) => {
            log::error!("Eraser could not remove hit elements: {err}");
            None
        }
    }
}

/// Removes every touched element and puts the surviving pieces of touched
/// strokes where the stroke was. Returns the removed elements and the
/// positions the fragments ended up at.
fn erase_split(layer: &mut Layer, pos: Pos2, radius: f32) -> Option<ErasedStep> {
    let mut hits = Vec::new();
    let mut pieces: Vec<(ElementId, Vec<ElementType>)> = Vec::new();
    for element in layer.elements() {
        match element {
            ElementType::Stroke(stroke) => {
                if let Some(fragments) = stroke.erase_near(pos, radius) {
                    hits.push(stroke.id());
                    pieces.push((stroke.id(), fragments.into_iter().map(ElementType::Stroke).collect()));
                }
            }
            other if other.hit_test(pos, radius) => hits.push(other.id()),
            _ => {}
        }
    }
    if hits.is_empty() {
        return None;
    }

    let removed = match layer.remove_all(&hits) {
        Ok(removed) => removed,
        Err(err) => {
            log::error!("Eraser could not remove hit elements: {err}");
            return None;
        }
    };

    // Fragment position = original index, minus elements removed before it,
    // plus fragments already placed before it.
    let mut placed = Vec::new();
    let mut removed_before = 0;
    let mut inserted_before = 0;
    for (index, element) in removed.iter() {
        let id = element.id();
        let fragments = pieces
            .iter_mut()
            .find(|(stroke, _)| *stroke == id)
            .map(|(_, fragments)| std::mem::take(fragments))
            .unwrap_or_default();

        let mut position = index - removed_before + inserted_before;
        for fragment in fragments {
            let fragment_id = fragment.id();
            match layer.insert(fragment, position) {
                Ok(at) => {
                    placed.push((at, fragment_id));
                    position = at + 1;
                    inserted_before += 1;
                }
                Err(_) => log::error!("Eraser fragment {fragment_id} collided with an existing element"),
            }
        }
        removed_before += 1;
    }

    Some((removed, Some(placed)))
}

impl Tool for EraserTool {
    fn name(&self) -> &'static str {
        "Eraser"
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) {
        // Steps of a cancelled gesture already changed the document
        self.finish(ctx);
        self.active = true;
        self.erase_at(pos, ctx);
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) {
        if self.active {
            self.erase_at(pos, ctx);
        }
    }

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) {
        if self.active {
            self.erase_at(pos, ctx);
            self.finish(ctx);
        }
    }

    /// Stops erasing; the steps taken so far are recorded with the next gesture start
    fn cancel(&mut self) {
        self.active = false;
    }
}
