use egui::Color32;
use std::fmt;
use std::marker::PhantomData;

use super::{CommandContext, CommandResult};
use crate::element::{ElementType, Font, LineStyle};
use crate::error::CommandError;
use crate::id::{ElementId, LayerId, PageId};

/// A settable attribute of some element kinds
pub trait ElementProperty {
    type Value: Clone + fmt::Debug;

    /// `None` if the element has no such attribute
    fn get(element: &ElementType) -> Option<Self::Value>;

    fn set(element: &mut ElementType, value: Self::Value);
}

#[derive(Debug)]
pub struct ColorProperty;

impl ElementProperty for ColorProperty {
    type Value = Color32;

    fn get(element: &ElementType) -> Option<Color32> {
        element.color()
    }

    fn set(element: &mut ElementType, value: Color32) {
        element.set_color(value);
    }
}

/// Fill alpha of strokes
#[derive(Debug)]
pub struct FillProperty;

impl ElementProperty for FillProperty {
    type Value = Option<u8>;

    fn get(element: &ElementType) -> Option<Option<u8>> {
        element.as_stroke().map(|s| s.fill())
    }

    fn set(element: &mut ElementType, value: Option<u8>) {
        if let Some(stroke) = element.as_stroke_mut() {
            stroke.set_fill(value);
        }
    }
}

#[derive(Debug)]
pub struct LineStyleProperty;

impl ElementProperty for LineStyleProperty {
    type Value = LineStyle;

    fn get(element: &ElementType) -> Option<LineStyle> {
        element.as_stroke().map(|s| s.line_style().clone())
    }

    fn set(element: &mut ElementType, value: LineStyle) {
        if let Some(stroke) = element.as_stroke_mut() {
            stroke.set_line_style(value);
        }
    }
}

/// Pen width of strokes
#[derive(Debug)]
pub struct WidthProperty;

impl ElementProperty for WidthProperty {
    type Value = f32;

    fn get(element: &ElementType) -> Option<f32> {
        element.as_stroke().map(|s| s.width())
    }

    fn set(element: &mut ElementType, value: f32) {
        if let Some(stroke) = element.as_stroke_mut() {
            stroke.set_width(value);
        }
    }
}

#[derive(Debug)]
pub struct FontProperty;

impl ElementProperty for FontProperty {
    type Value = Font;

    fn get(element: &ElementType) -> Option<Font> {
        element.as_text().map(|t| t.font().clone())
    }

    fn set(element: &mut ElementType, value: Font) {
        if let Some(text) = element.as_text_mut() {
            text.set_font(value);
        }
    }
}

/// Sets one attribute on a selection. Elements lacking the attribute are left alone.
pub struct PropertyChange<P: ElementProperty> {
    page: PageId,
    layer: LayerId,
    ids: Vec<ElementId>,
    value: P::Value,
    previous: Vec<(ElementId, P::Value)>,
    applied: bool,
    _property: PhantomData<P>,
}

pub type SetColor = PropertyChange<ColorProperty>;
pub type SetFill = PropertyChange<FillProperty>;
pub type SetLineStyle = PropertyChange<LineStyleProperty>;
pub type SetStrokeWidth = PropertyChange<WidthProperty>;
pub type SetFont = PropertyChange<FontProperty>;

impl<P: ElementProperty> fmt::Debug for PropertyChange<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyChange")
            .field("page", &self.page)
            .field("layer", &self.layer)
            .field("ids", &self.ids)
            .field("value", &self.value)
            .field("applied", &self.applied)
            .finish()
    }
}

impl<P: ElementProperty> PropertyChange<P> {
    pub fn new(page: PageId, layer: LayerId, ids: Vec<ElementId>, value: P::Value) -> Self {
        Self {
            page,
            layer,
            ids,
            value,
            previous: Vec::new(),
            applied: false,
            _property: PhantomData,
        }
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub fn value(&self) -> &P::Value {
        &self.value
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if self.applied {
            return Err(CommandError::AlreadyApplied);
        }
        let layer = ctx.document.find_layer_mut(self.page, self.layer)?;
        layer.check_all(&self.ids)?;

        self.previous.clear();
        for id in &self.ids {
            let Some(element) = layer.get_mut(*id) else {
                continue;
            };
            if let Some(old) = P::get(element) {
                self.previous.push((*id, old));
                P::set(element, self.value.clone());
            }
        }
        self.applied = true;
        Ok(())
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if !self.applied {
            return Err(CommandError::NotApplied);
        }
        let layer = ctx.document.find_layer_mut(self.page, self.layer)?;
        if let Some((missing, _)) = self.previous.iter().find(|(id, _)| !layer.contains(*id)) {
            return Err(CommandError::ElementNotFound(*missing));
        }

        for (id, old) in self.previous.drain(..) {
            if let Some(element) = layer.get_mut(id) {
                P::set(element, old);
            }
        }
        self.applied = false;
        Ok(())
    }
}

/// Replaces the text of a text box or the source of an equation
#[derive(Debug)]
pub struct EditText {
    page: PageId,
    layer: LayerId,
    element: ElementId,
    text: String,
    /// Old text, plus the old rendering for equations
    previous: Option<(String, Option<Vec<u8>>)>,
}

impl EditText {
    pub fn new(page: PageId, layer: LayerId, element: ElementId, text: impl Into<String>) -> Self {
        Self {
            page,
            layer,
            element,
            text: text.into(),
            previous: None,
        }
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if self.previous.is_some() {
            return Err(CommandError::AlreadyApplied);
        }
        let element = ctx
            .document
            .find_layer_mut(self.page, self.layer)?
            .get_mut(self.element)
            .ok_or(CommandError::ElementNotFound(self.element))?;

        match element {
            ElementType::Text(text) => {
                let old = text.text().to_owned();
                text.set_text(self.text.clone());
                self.previous = Some((old, None));
            }
            ElementType::TexImage(tex) => {
                let old = (tex.source().to_owned(), Some(tex.rendered().to_vec()));
                tex.set_source(self.text.clone());
                self.previous = Some(old);
            }
            _ => {
                return Err(CommandError::StructuralMismatch(format!(
                    "element {} holds no text",
                    self.element
                )));
            }
        }
        Ok(())
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let Some((old, rendered)) = self.previous.take() else {
            return Err(CommandError::NotApplied);
        };
        let element = match ctx
            .document
            .find_layer_mut(self.page, self.layer)
            .and_then(|layer| layer.get_mut(self.element).ok_or(CommandError::ElementNotFound(self.element)))
        {
            Ok(element) => element,
            Err(err) => {
                self.previous = Some((old, rendered));
                return Err(err);
            }
        };

        match element {
            ElementType::Text(text) => text.set_text(old),
            ElementType::TexImage(tex) => {
                tex.set_source(old);
                if let Some(rendered) = rendered {
                    tex.set_rendered(rendered);
                }
            }
            _ => {
                self.previous = Some((old, rendered));
                return Err(CommandError::StructuralMismatch(format!(
                    "element {} holds no text",
                    self.element
                )));
            }
        }
        Ok(())
    }
}
