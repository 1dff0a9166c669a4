use egui::Vec2;

use super::{CommandContext, CommandResult};
use crate::element::{Element, ElementType, Geometry};
use crate::error::CommandError;
use crate::id::{ElementId, LayerId, PageId};
use crate::layer::InsertionOrder;

/// Elements added to a layer.
///
/// While undone the command owns the elements; while applied the layer does and
/// the command only remembers where they sit.
#[derive(Debug)]
pub struct InsertElements {
    page: PageId,
    layer: LayerId,
    positions: Vec<(usize, ElementId)>,
    held: Option<InsertionOrder>,
}

impl InsertElements {
    /// Not yet applied: the command holds the elements until `redo` hands them to the layer
    pub fn new(page: PageId, layer: LayerId, elements: InsertionOrder) -> Self {
        Self {
            page,
            layer,
            positions: elements.positions(),
            held: Some(elements),
        }
    }

    pub fn single(page: PageId, layer: LayerId, element: ElementType, index: usize) -> Self {
        Self::new(page, layer, [(index, element)].into_iter().collect())
    }

    /// The caller already put the elements on the layer (e.g. a tool finishing a gesture)
    pub fn applied(page: PageId, layer: LayerId, mut positions: Vec<(usize, ElementId)>) -> Self {
        positions.sort_by_key(|(index, _)| *index);
        Self {
            page,
            layer,
            positions,
            held: None,
        }
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub fn ids(&self) -> Vec<ElementId> {
        self.positions.iter().map(|(_, id)| *id).collect()
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let order = self.held.take().ok_or(CommandError::AlreadyApplied)?;
        let layer = match ctx.document.find_layer_mut(self.page, self.layer) {
            Ok(layer) => layer,
            Err(err) => {
                self.held = Some(order);
                return Err(err);
            }
        };

        if let Err(order) = layer.insert_all(order) {
            self.held = Some(order);
            return Err(CommandError::StructuralMismatch(
                "inserted elements are already on the layer".to_owned(),
            ));
        }
        Ok(())
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if self.held.is_some() {
            return Err(CommandError::NotApplied);
        }
        let layer = ctx.document.find_layer_mut(self.page, self.layer)?;
        let order = layer.remove_all(&self.ids())?;
        self.held = Some(order);
        Ok(())
    }
}

/// Elements removed from a layer; the command keeps them alive while deleted
#[derive(Debug)]
pub struct DeleteElements {
    page: PageId,
    layer: LayerId,
    ids: Vec<ElementId>,
    held: Option<InsertionOrder>,
}

impl DeleteElements {
    /// Not yet applied: `redo` detaches the elements
    pub fn new(page: PageId, layer: LayerId, ids: Vec<ElementId>) -> Self {
        Self {
            page,
            layer,
            ids,
            held: None,
        }
    }

    /// The caller already detached the elements and hands their ownership over
    pub fn applied(page: PageId, layer: LayerId, removed: InsertionOrder) -> Self {
        Self {
            page,
            layer,
            ids: removed.ids(),
            held: Some(removed),
        }
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if self.held.is_some() {
            return Err(CommandError::AlreadyApplied);
        }
        let layer = ctx.document.find_layer_mut(self.page, self.layer)?;
        self.held = Some(layer.remove_all(&self.ids)?);
        Ok(())
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let order = self.held.take().ok_or(CommandError::NotApplied)?;
        let layer = match ctx.document.find_layer_mut(self.page, self.layer) {
            Ok(layer) => layer,
            Err(err) => {
                self.held = Some(order);
                return Err(err);
            }
        };

        if let Err(order) = layer.insert_all(order) {
            self.held = Some(order);
            return Err(CommandError::StructuralMismatch(
                "deleted elements reappeared on the layer".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Translates elements, optionally carrying them to another layer (possibly on another page)
#[derive(Debug)]
pub struct MoveElements {
    page: PageId,
    layer: LayerId,
    ids: Vec<ElementId>,
    delta: Vec2,
    target: Option<(PageId, LayerId)>,
    before: Vec<(ElementId, Geometry)>,
    /// Where the elements sat on the source layer; only set while moved across layers
    origin: Vec<(usize, ElementId)>,
    applied: bool,
}

impl MoveElements {
    pub fn new(page: PageId, layer: LayerId, ids: Vec<ElementId>, delta: Vec2) -> Self {
        Self {
            page,
            layer,
            ids,
            delta,
            target: None,
            before: Vec::new(),
            origin: Vec::new(),
            applied: false,
        }
    }

    /// Also move the elements onto `layer` of `page`, painted on top
    pub fn to_layer(mut self, page: PageId, layer: LayerId) -> Self {
        if (page, layer) != (self.page, self.layer) {
            self.target = Some((page, layer));
        }
        self
    }

    pub fn pages(&self) -> Vec<PageId> {
        match self.target {
            Some((page, _)) if page != self.page => vec![self.page, page],
            _ => vec![self.page],
        }
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if self.applied {
            return Err(CommandError::AlreadyApplied);
        }

        match self.target {
            None => {
                let layer = ctx.document.find_layer_mut(self.page, self.layer)?;
                layer.check_all(&self.ids)?;
                self.before.clear();
                for id in &self.ids {
                    if let Some(element) = layer.get_mut(*id) {
                        self.before.push((*id, element.geometry()));
                        element.translate(self.delta);
                    }
                }
            }
            Some((page, layer)) => {
                let target = ctx
                    .document
                    .page_by_id(page)
                    .ok_or(CommandError::PageNotFound(page))?
                    .layer_by_id(layer)
                    .ok_or(CommandError::LayerNotFound(layer))?;
                if let Some(id) = self.ids.iter().find(|id| target.contains(**id)) {
                    return Err(CommandError::StructuralMismatch(format!(
                        "element {id} is already on the target layer"
                    )));
                }

                let mut order = ctx.document.find_layer_mut(self.page, self.layer)?.remove_all(&self.ids)?;
                self.origin = order.positions();
                self.before.clear();
                for element in order.iter_mut() {
                    self.before.push((element.id(), element.geometry()));
                    element.translate(self.delta);
                }

                let target = ctx.document.find_layer_mut(page, layer)?;
                for (_, element) in order {
                    if let Err(element) = target.add_top(element) {
                        log::error!("Element {} vanished while moving layers", element.id());
                    }
                }
            }
        }

        self.applied = true;
        Ok(())
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if !self.applied {
            return Err(CommandError::NotApplied);
        }

        match self.target {
            None => {
                let layer = ctx.document.find_layer_mut(self.page, self.layer)?;
                if let Some((missing, _)) = self.before.iter().find(|(id, _)| !layer.contains(*id)) {
                    return Err(CommandError::ElementNotFound(*missing));
                }
                for (id, geometry) in self.before.drain(..) {
                    if let Some(element) = layer.get_mut(id) {
                        element.restore_geometry(geometry);
                    }
                }
            }
            Some((page, layer)) => {
                let source = ctx
                    .document
                    .page_by_id(self.page)
                    .ok_or(CommandError::PageNotFound(self.page))?
                    .layer_by_id(self.layer)
                    .ok_or(CommandError::LayerNotFound(self.layer))?;
                if let Some(id) = self.ids.iter().find(|id| source.contains(**id)) {
                    return Err(CommandError::StructuralMismatch(format!(
                        "element {id} is already back on the source layer"
                    )));
                }

                let order = ctx.document.find_layer_mut(page, layer)?.remove_all(&self.ids)?;
                let restored = self.restore_into_order(order);
                let source = ctx.document.find_layer_mut(self.page, self.layer)?;
                if source.insert_all(restored).is_err() {
                    log::error!("Moved elements could not be returned to layer {}", self.layer);
                }
                self.origin.clear();
                self.before.clear();
            }
        }

        self.applied = false;
        Ok(())
    }

    /// Undo the translation and key each element by its original source index
    fn restore_into_order(&self, order: InsertionOrder) -> InsertionOrder {
        order
            .into_iter()
            .map(|(index, mut element)| {
                let id = element.id();
                if let Some((_, geometry)) = self.before.iter().find(|(bid, _)| *bid == id) {
                    element.restore_geometry(geometry.clone());
                }
                let source_index = self
                    .origin
                    .iter()
                    .find(|(_, oid)| *oid == id)
                    .map_or(index, |(i, _)| *i);
                (source_index, element)
            })
            .collect()
    }
}
