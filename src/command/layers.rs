use super::{CommandContext, CommandResult};
use crate::element::Element;
use crate::error::CommandError;
use crate::event::EditorEvent;
use crate::id::{ElementId, LayerId, PageId};
use crate::layer::Layer;

/// A layer placed at a stack position. Also used for pasted copies of a layer.
#[derive(Debug)]
pub struct InsertLayer {
    page: PageId,
    layer_id: LayerId,
    index: usize,
    held: Option<Layer>,
    previous_selection: usize,
}

impl InsertLayer {
    /// `index` is the 0-based stack position, so the layer becomes layer `index + 1`
    pub fn new(page: PageId, layer: Layer, index: usize) -> Self {
        Self {
            page,
            layer_id: layer.id(),
            index,
            held: Some(layer),
            previous_selection: 0,
        }
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub fn layer_id(&self) -> LayerId {
        self.layer_id
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let layer = self.held.take().ok_or(CommandError::AlreadyApplied)?;
        let page = match ctx.document.find_page_mut(self.page) {
            Ok(page) => page,
            Err(err) => {
                self.held = Some(layer);
                return Err(err);
            }
        };

        self.previous_selection = page.selected_layer_id();
        self.index = page.insert_layer(layer, self.index);
        ctx.emit(EditorEvent::RebuildLayerMenu);
        Ok(())
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if self.held.is_some() {
            return Err(CommandError::NotApplied);
        }
        let page = ctx.document.find_page_mut(self.page)?;
        let (_, layer) = page.remove_layer(self.layer_id)?;
        page.set_selected_layer_id(self.previous_selection);
        self.held = Some(layer);
        ctx.emit(EditorEvent::RebuildLayerMenu);
        Ok(())
    }
}

/// A layer taken off the page; the command keeps it, elements included, until undone
#[derive(Debug)]
pub struct RemoveLayer {
    page: PageId,
    layer_id: LayerId,
    index: usize,
    held: Option<Layer>,
    previous_selection: usize,
}

impl RemoveLayer {
    pub fn new(page: PageId, layer_id: LayerId) -> Self {
        Self {
            page,
            layer_id,
            index: 0,
            held: None,
            previous_selection: 0,
        }
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if self.held.is_some() {
            return Err(CommandError::AlreadyApplied);
        }
        let page = ctx.document.find_page_mut(self.page)?;
        let previous_selection = page.selected_layer_id();
        let (index, layer) = page.remove_layer(self.layer_id)?;
        self.previous_selection = previous_selection;
        self.index = index;
        self.held = Some(layer);
        ctx.emit(EditorEvent::RebuildLayerMenu);
        Ok(())
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let layer = self.held.take().ok_or(CommandError::NotApplied)?;
        let page = match ctx.document.find_page_mut(self.page) {
            Ok(page) => page,
            Err(err) => {
                self.held = Some(layer);
                return Err(err);
            }
        };

        page.insert_layer(layer, self.index);
        page.set_selected_layer_id(self.previous_selection);
        ctx.emit(EditorEvent::RebuildLayerMenu);
        Ok(())
    }
}

/// Moves a layer to another stack position. Layer ids are positional, so the
/// layers in between renumber on their own.
#[derive(Debug)]
pub struct MoveLayer {
    page: PageId,
    layer_id: LayerId,
    from: usize,
    to: usize,
    previous_selection: usize,
    applied: bool,
}

impl MoveLayer {
    /// `from` and `to` are 0-based stack positions
    pub fn new(page: PageId, layer_id: LayerId, from: usize, to: usize) -> Self {
        Self {
            page,
            layer_id,
            from,
            to,
            previous_selection: 0,
            applied: false,
        }
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    fn relocate(ctx: &mut CommandContext<'_>, page: PageId, layer_id: LayerId, from: usize, to: usize) -> CommandResult {
        let page = ctx.document.find_page_mut(page)?;
        match page.layer_index(layer_id) {
            Some(index) if index == from => {}
            Some(index) => {
                return Err(CommandError::StructuralMismatch(format!(
                    "layer {layer_id} is at position {index}, expected {from}"
                )));
            }
            None => return Err(CommandError::LayerNotFound(layer_id)),
        }
        if to >= page.layer_count() {
            return Err(CommandError::InvalidIndex {
                index: to,
                len: page.layer_count(),
            });
        }

        let (_, layer) = page.remove_layer(layer_id)?;
        page.insert_layer(layer, to);
        ctx.emit(EditorEvent::RebuildLayerMenu);
        Ok(())
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if self.applied {
            return Err(CommandError::AlreadyApplied);
        }
        let previous_selection = ctx.document.find_page_mut(self.page)?.selected_layer_id();
        Self::relocate(ctx, self.page, self.layer_id, self.from, self.to)?;
        self.previous_selection = previous_selection;
        self.applied = true;
        Ok(())
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if !self.applied {
            return Err(CommandError::NotApplied);
        }
        Self::relocate(ctx, self.page, self.layer_id, self.to, self.from)?;
        ctx.document
            .find_page_mut(self.page)?
            .set_selected_layer_id(self.previous_selection);
        self.applied = false;
        Ok(())
    }
}

/// Folds a layer into the one directly below it.
///
/// The merged elements go on top of the lower layer's own, in their original
/// order; the emptied upper layer is kept by the command. Undo picks the merged
/// elements back out by identity, since the lower layer had elements of its own.
#[derive(Debug)]
pub struct MergeLayerDown {
    page: PageId,
    upper: LayerId,
    lower: LayerId,
    upper_index: usize,
    moved: Vec<ElementId>,
    held: Option<Layer>,
    previous_selection: usize,
}

impl MergeLayerDown {
    pub fn new(page: PageId, upper: LayerId, lower: LayerId) -> Self {
        Self {
            page,
            upper,
            lower,
            upper_index: 0,
            moved: Vec::new(),
            held: None,
            previous_selection: 0,
        }
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if self.held.is_some() {
            return Err(CommandError::AlreadyApplied);
        }
        let page = ctx.document.find_page_mut(self.page)?;
        let upper_index = page.layer_index(self.upper).ok_or(CommandError::LayerNotFound(self.upper))?;
        let lower_index = page.layer_index(self.lower).ok_or(CommandError::LayerNotFound(self.lower))?;
        if lower_index + 1 != upper_index {
            return Err(CommandError::StructuralMismatch(format!(
                "layer {} is not directly below layer {}",
                self.lower, self.upper
            )));
        }

        let previous_selection = page.selected_layer_id();
        let (_, mut upper) = page.remove_layer(self.upper)?;
        let elements = upper.take_all();
        self.moved = elements.iter().map(|e| e.id()).collect();

        let lower = page.find_layer_mut(self.lower)?;
        for element in elements {
            if let Err(element) = lower.add_top(element) {
                log::error!("Element {} is already on the lower layer", element.id());
            }
        }
        page.set_selected_layer_id(lower_index + 1);

        self.upper_index = upper_index;
        self.previous_selection = previous_selection;
        self.held = Some(upper);
        ctx.emit(EditorEvent::RebuildLayerMenu);
        Ok(())
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let mut upper = self.held.take().ok_or(CommandError::NotApplied)?;
        let page = match ctx.document.find_page_mut(self.page) {
            Ok(page) => page,
            Err(err) => {
                self.held = Some(upper);
                return Err(err);
            }
        };

        let order = match page
            .find_layer_mut(self.lower)
            .and_then(|lower| lower.remove_all(&self.moved))
        {
            Ok(order) => order,
            Err(err) => {
                self.held = Some(upper);
                return Err(err);
            }
        };

        for (_, element) in order {
            if let Err(element) = upper.add_top(element) {
                log::error!("Element {} was duplicated during merge", element.id());
            }
        }
        page.insert_layer(upper, self.upper_index);
        page.set_selected_layer_id(self.previous_selection);
        self.moved.clear();
        ctx.emit(EditorEvent::RebuildLayerMenu);
        Ok(())
    }
}

/// Renames a layer, or the background when `layer` is `None`
#[derive(Debug)]
pub struct RenameLayer {
    page: PageId,
    layer: Option<LayerId>,
    name: Option<String>,
    previous: Option<Option<String>>,
}

impl RenameLayer {
    pub fn new(page: PageId, layer: Option<LayerId>, name: Option<String>) -> Self {
        Self {
            page,
            layer,
            name,
            previous: None,
        }
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    fn swap(&self, ctx: &mut CommandContext<'_>, name: Option<String>) -> Result<Option<String>, CommandError> {
        let page = ctx.document.find_page_mut(self.page)?;
        let old = match self.layer {
            None => {
                let old = page.background_name_raw().map(str::to_owned);
                page.set_background_name(name);
                old
            }
            Some(id) => {
                let layer = page.find_layer_mut(id)?;
                let old = layer.name().map(str::to_owned);
                layer.set_name(name);
                old
            }
        };
        ctx.emit(EditorEvent::RebuildLayerMenu);
        Ok(old)
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if self.previous.is_some() {
            return Err(CommandError::AlreadyApplied);
        }
        self.previous = Some(self.swap(ctx, self.name.clone())?);
        Ok(())
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let previous = self.previous.clone().ok_or(CommandError::NotApplied)?;
        self.swap(ctx, previous)?;
        self.previous = None;
        Ok(())
    }
}
