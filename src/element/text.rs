use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::{Axis, Element, ElementTag, Geometry, common};
use crate::id::ElementId;

/// Font face and size of a text element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub name: String,
    pub size: f32,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            name: "Sans".to_owned(),
            size: 12.0,
        }
    }
}

/// Text box anchored at its top left corner
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Text {
    id: ElementId,
    text: String,
    font: Font,
    color: Color32,
    position: Pos2,
    rotation: f32,
}

impl Text {
    pub fn new(text: impl Into<String>, font: Font, color: Color32, position: Pos2) -> Self {
        Self {
            id: ElementId::new(),
            text: text.into(),
            font,
            color,
            position,
            rotation: 0.0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub(crate) fn duplicate(&self) -> Self {
        Self {
            id: ElementId::new(),
            text: self.text.clone(),
            font: self.font.clone(),
            color: self.color,
            position: self.position,
            rotation: self.rotation,
        }
    }

    /// Layout-free size estimate; real metrics belong to the renderer
    fn estimated_size(&self) -> Vec2 {
        let lines = self.text.lines().count().max(1);
        let longest = self.text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        Vec2::new(
            longest as f32 * self.font.size * 0.5,
            lines as f32 * self.font.size * 1.2,
        )
    }
}

impl Element for Text {
    fn id(&self) -> ElementId {
        self.id
    }

    fn element_type(&self) -> ElementTag {
        ElementTag::Text
    }

    fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.estimated_size())
    }

    fn hit_test(&self, pos: Pos2, radius: f32) -> bool {
        self.rect().expand(radius).contains(pos)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn scale(&mut self, origin: Pos2, fx: f32, fy: f32, _scale_line_width: bool) {
        self.position = common::scale_point(self.position, origin, fx, fy);
        self.font.size *= fy.abs();
    }

    fn rotate(&mut self, center: Pos2, angle: f32) {
        let frame = common::rotate_frame(self.rect(), center, angle);
        self.position = frame.min;
        self.rotation += angle;
    }

    fn reflect(&mut self, axis: Axis, coordinate: f32) {
        let frame = common::reflect_frame(self.rect(), axis, coordinate);
        self.position = frame.min;
        self.rotation = -self.rotation;
    }

    fn geometry(&self) -> Geometry {
        Geometry::Text {
            position: self.position,
            font_size: self.font.size,
            rotation: self.rotation,
        }
    }

    fn restore_geometry(&mut self, geometry: Geometry) -> bool {
        match geometry {
            Geometry::Text {
                position,
                font_size,
                rotation,
            } => {
                self.position = position;
                self.font.size = font_size;
                self.rotation = rotation;
                true
            }
            _ => false,
        }
    }
}
