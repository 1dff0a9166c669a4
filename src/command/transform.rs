use egui::Pos2;

use super::{CommandContext, CommandResult};
use crate::element::{Axis, Element, ElementType, Geometry};
use crate::error::CommandError;
use crate::id::{ElementId, LayerId, PageId};

/// Geometry of a set of elements captured right before a transform.
///
/// Undo puts the captured geometry back instead of applying the inverse
/// transform, so a round trip is exact even though the math is in floats.
#[derive(Debug)]
struct Snapshot {
    page: PageId,
    layer: LayerId,
    ids: Vec<ElementId>,
    before: Vec<(ElementId, Geometry)>,
    applied: bool,
}

impl Snapshot {
    fn new(page: PageId, layer: LayerId, ids: Vec<ElementId>) -> Self {
        Self {
            page,
            layer,
            ids,
            before: Vec::new(),
            applied: false,
        }
    }

    fn apply(&mut self, ctx: &mut CommandContext<'_>, transform: impl Fn(&mut ElementType)) -> CommandResult {
        if self.applied {
            return Err(CommandError::AlreadyApplied);
        }
        let layer = ctx.document.find_layer_mut(self.page, self.layer)?;
        layer.check_all(&self.ids)?;

        self.before.clear();
        for id in &self.ids {
            if let Some(element) = layer.get_mut(*id) {
                self.before.push((*id, element.geometry()));
                transform(element);
            }
        }
        self.applied = true;
        Ok(())
    }

    fn restore(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if !self.applied {
            return Err(CommandError::NotApplied);
        }
        let layer = ctx.document.find_layer_mut(self.page, self.layer)?;
        if let Some((missing, _)) = self.before.iter().find(|(id, _)| !layer.contains(*id)) {
            return Err(CommandError::ElementNotFound(*missing));
        }

        for (id, geometry) in self.before.drain(..) {
            if let Some(element) = layer.get_mut(id) {
                element.restore_geometry(geometry);
            }
        }
        self.applied = false;
        Ok(())
    }
}

/// Scale about a fixed origin
#[derive(Debug)]
pub struct ScaleElements {
    snapshot: Snapshot,
    origin: Pos2,
    fx: f32,
    fy: f32,
    scale_line_width: bool,
}

impl ScaleElements {
    pub fn new(page: PageId, layer: LayerId, ids: Vec<ElementId>, origin: Pos2, fx: f32, fy: f32) -> Self {
        Self {
            snapshot: Snapshot::new(page, layer, ids),
            origin,
            fx,
            fy,
            scale_line_width: false,
        }
    }

    /// Scale pen widths along with the geometry
    pub fn with_line_width(mut self, scale_line_width: bool) -> Self {
        self.scale_line_width = scale_line_width;
        self
    }

    pub fn page(&self) -> PageId {
        self.snapshot.page
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let (origin, fx, fy, line_width) = (self.origin, self.fx, self.fy, self.scale_line_width);
        self.snapshot.apply(ctx, |e| e.scale(origin, fx, fy, line_width))
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        self.snapshot.restore(ctx)
    }
}

/// Rotation around a center, angle in radians
#[derive(Debug)]
pub struct RotateElements {
    snapshot: Snapshot,
    center: Pos2,
    angle: f32,
}

impl RotateElements {
    pub fn new(page: PageId, layer: LayerId, ids: Vec<ElementId>, center: Pos2, angle: f32) -> Self {
        Self {
            snapshot: Snapshot::new(page, layer, ids),
            center,
            angle,
        }
    }

    pub fn page(&self) -> PageId {
        self.snapshot.page
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let (center, angle) = (self.center, self.angle);
        self.snapshot.apply(ctx, |e| e.rotate(center, angle))
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        self.snapshot.restore(ctx)
    }
}

/// Mirror across a horizontal or vertical line
#[derive(Debug)]
pub struct ReflectElements {
    snapshot: Snapshot,
    axis: Axis,
    coordinate: f32,
}

impl ReflectElements {
    pub fn new(page: PageId, layer: LayerId, ids: Vec<ElementId>, axis: Axis, coordinate: f32) -> Self {
        Self {
            snapshot: Snapshot::new(page, layer, ids),
            axis,
            coordinate,
        }
    }

    pub fn page(&self) -> PageId {
        self.snapshot.page
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let (axis, coordinate) = (self.axis, self.coordinate);
        self.snapshot.apply(ctx, |e| e.reflect(axis, coordinate))
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        self.snapshot.restore(ctx)
    }
}
