use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

mod common;
pub(crate) mod image;
pub(crate) mod stroke;
pub(crate) mod tex_image;
pub(crate) mod text;

pub use image::Image;
pub use stroke::{LineStyle, Stroke};
pub use tex_image::TexImage;
pub use text::{Font, Text};

use crate::id::ElementId;

/// Kind of a drawable element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementTag {
    Stroke,
    Text,
    Image,
    TexImage,
}

impl ElementTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementTag::Stroke => "stroke",
            ElementTag::Text => "text",
            ElementTag::Image => "image",
            ElementTag::TexImage => "teximage",
        }
    }
}

impl fmt::Display for ElementTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mirror axis for [`Element::reflect`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Mirror left/right across the vertical line `x = coordinate`
    Vertical,
    /// Mirror top/bottom across the horizontal line `y = coordinate`
    Horizontal,
}

/// Everything a transform may touch, captured so it can be put back exactly
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Stroke { points: Vec<Pos2>, width: f32 },
    Text { position: Pos2, font_size: f32, rotation: f32 },
    Frame { rect: Rect, rotation: f32 },
}

/// Common trait that all document elements implement
pub trait Element {
    fn id(&self) -> ElementId;

    fn element_type(&self) -> ElementTag;

    /// Bounding rectangle in page coordinates
    fn rect(&self) -> Rect;

    /// Whether a circle of `radius` around `pos` touches the element
    fn hit_test(&self, pos: Pos2, radius: f32) -> bool;

    fn translate(&mut self, delta: Vec2);

    fn scale(&mut self, origin: Pos2, fx: f32, fy: f32, scale_line_width: bool);

    fn rotate(&mut self, center: Pos2, angle: f32);

    fn reflect(&mut self, axis: Axis, coordinate: f32);

    fn geometry(&self) -> Geometry;

    /// Puts back a snapshot taken by [`Element::geometry`]. Returns false if the
    /// snapshot belongs to a different kind of element.
    fn restore_geometry(&mut self, geometry: Geometry) -> bool;
}

/// An owned element as stored on a layer.
///
/// Deliberately not `Clone`: an element lives in exactly one place at a time,
/// either a layer or a command holding it while it is detached. Use
/// [`ElementType::duplicate`] for a copy with its own identity.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub enum ElementType {
    Stroke(Stroke),
    Text(Text),
    Image(Image),
    TexImage(TexImage),
}

impl ElementType {
    /// Deep copy with a fresh id
    pub fn duplicate(&self) -> ElementType {
        match self {
            ElementType::Stroke(s) => ElementType::Stroke(s.duplicate()),
            ElementType::Text(t) => ElementType::Text(t.duplicate()),
            ElementType::Image(i) => ElementType::Image(i.duplicate()),
            ElementType::TexImage(t) => ElementType::TexImage(t.duplicate()),
        }
    }

    pub fn color(&self) -> Option<Color32> {
        match self {
            ElementType::Stroke(s) => Some(s.color()),
            ElementType::Text(t) => Some(t.color()),
            ElementType::Image(_) | ElementType::TexImage(_) => None,
        }
    }

    /// Returns false if the element has no color
    pub fn set_color(&mut self, color: Color32) -> bool {
        match self {
            ElementType::Stroke(s) => s.set_color(color),
            ElementType::Text(t) => t.set_color(color),
            ElementType::Image(_) | ElementType::TexImage(_) => return false,
        }
        true
    }

    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            ElementType::Stroke(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_stroke_mut(&mut self) -> Option<&mut Stroke> {
        match self {
            ElementType::Stroke(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            ElementType::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            ElementType::Text(t) => Some(t),
            _ => None,
        }
    }
}

impl Element for ElementType {
    fn id(&self) -> ElementId {
        match self {
            ElementType::Stroke(s) => s.id(),
            ElementType::Text(t) => t.id(),
            ElementType::Image(i) => i.id(),
            ElementType::TexImage(t) => t.id(),
        }
    }

    fn element_type(&self) -> ElementTag {
        match self {
            ElementType::Stroke(_) => ElementTag::Stroke,
            ElementType::Text(_) => ElementTag::Text,
            ElementType::Image(_) => ElementTag::Image,
            ElementType::TexImage(_) => ElementTag::TexImage,
        }
    }

    fn rect(&self) -> Rect {
        match self {
            ElementType::Stroke(s) => s.rect(),
            ElementType::Text(t) => t.rect(),
            ElementType::Image(i) => i.rect(),
            ElementType::TexImage(t) => t.rect(),
        }
    }

    fn hit_test(&self, pos: Pos2, radius: f32) -> bool {
        match self {
            ElementType::Stroke(s) => s.hit_test(pos, radius),
            ElementType::Text(t) => t.hit_test(pos, radius),
            ElementType::Image(i) => i.hit_test(pos, radius),
            ElementType::TexImage(t) => t.hit_test(pos, radius),
        }
    }

    fn translate(&mut self, delta: Vec2) {
        match self {
            ElementType::Stroke(s) => s.translate(delta),
            ElementType::Text(t) => t.translate(delta),
            ElementType::Image(i) => i.translate(delta),
            ElementType::TexImage(t) => t.translate(delta),
        }
    }

    fn scale(&mut self, origin: Pos2, fx: f32, fy: f32, scale_line_width: bool) {
        match self {
            ElementType::Stroke(s) => s.scale(origin, fx, fy, scale_line_width),
            ElementType::Text(t) => t.scale(origin, fx, fy, scale_line_width),
            ElementType::Image(i) => i.scale(origin, fx, fy, scale_line_width),
            ElementType::TexImage(t) => t.scale(origin, fx, fy, scale_line_width),
        }
    }

    fn rotate(&mut self, center: Pos2, angle: f32) {
        match self {
            ElementType::Stroke(s) => s.rotate(center, angle),
            ElementType::Text(t) => t.rotate(center, angle),
            ElementType::Image(i) => i.rotate(center, angle),
            ElementType::TexImage(t) => t.rotate(center, angle),
        }
    }

    fn reflect(&mut self, axis: Axis, coordinate: f32) {
        match self {
            ElementType::Stroke(s) => s.reflect(axis, coordinate),
            ElementType::Text(t) => t.reflect(axis, coordinate),
            ElementType::Image(i) => i.reflect(axis, coordinate),
            ElementType::TexImage(t) => t.reflect(axis, coordinate),
        }
    }

    fn geometry(&self) -> Geometry {
        match self {
            ElementType::Stroke(s) => s.geometry(),
            ElementType::Text(t) => t.geometry(),
            ElementType::Image(i) => i.geometry(),
            ElementType::TexImage(t) => t.geometry(),
        }
    }

    fn restore_geometry(&mut self, geometry: Geometry) -> bool {
        match self {
            ElementType::Stroke(s) => s.restore_geometry(geometry),
            ElementType::Text(t) => t.restore_geometry(geometry),
            ElementType::Image(i) => i.restore_geometry(geometry),
            ElementType::TexImage(t) => t.restore_geometry(geometry),
        }
    }
}

/// Factory functions for creating elements
pub mod factory {
    use super::*;

    pub fn create_stroke(points: Vec<Pos2>, width: f32, color: Color32) -> ElementType {
        ElementType::Stroke(Stroke::new(points, width, color))
    }

    pub fn create_text(text: impl Into<String>, font: Font, color: Color32, position: Pos2) -> ElementType {
        ElementType::Text(Text::new(text, font, color, position))
    }

    pub fn create_image(data: Vec<u8>, size: Vec2, position: Pos2) -> ElementType {
        ElementType::Image(Image::new(data, size, position))
    }

    pub fn create_tex_image(source: impl Into<String>, rendered: Vec<u8>, frame: Rect) -> ElementType {
        ElementType::TexImage(TexImage::new(source, rendered, frame))
    }
}
