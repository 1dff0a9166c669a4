use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::{Axis, Element, ElementTag, Geometry, common};
use crate::id::ElementId;

/// Bitmap image element. The encoded bytes are opaque to the model.
#[derive(PartialEq, Serialize, Deserialize)]
pub struct Image {
    id: ElementId,
    data: Vec<u8>,
    frame: Rect,
    rotation: f32,
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("id", &self.id)
            .field("data_len", &self.data.len())
            .field("frame", &self.frame)
            .field("rotation", &self.rotation)
            .finish()
    }
}

impl Image {
    pub fn new(data: Vec<u8>, size: Vec2, position: Pos2) -> Self {
        Self {
            id: ElementId::new(),
            data,
            frame: Rect::from_min_size(position, size),
            rotation: 0.0,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub(crate) fn duplicate(&self) -> Self {
        Self {
            id: ElementId::new(),
            data: self.data.clone(),
            frame: self.frame,
            rotation: self.rotation,
        }
    }
}

impl Element for Image {
    fn id(&self) -> ElementId {
        self.id
    }

    fn element_type(&self) -> ElementTag {
        ElementTag::Image
    }

    fn rect(&self) -> Rect {
        self.frame
    }

    fn hit_test(&self, pos: Pos2, radius: f32) -> bool {
        self.frame.expand(radius).contains(pos)
    }

    fn translate(&mut self, delta: Vec2) {
        self.frame = self.frame.translate(delta);
    }

    fn scale(&mut self, origin: Pos2, fx: f32, fy: f32, _scale_line_width: bool) {
        self.frame = common::scale_frame(self.frame, origin, fx, fy);
    }

    fn rotate(&mut self, center: Pos2, angle: f32) {
        self.frame = common::rotate_frame(self.frame, center, angle);
        self.rotation += angle;
    }

    fn reflect(&mut self, axis: Axis, coordinate: f32) {
        self.frame = common::reflect_frame(self.frame, axis, coordinate);
        self.rotation = -self.rotation;
    }

    fn geometry(&self) -> Geometry {
        Geometry::Frame {
            rect: self.frame,
            rotation: self.rotation,
        }
    }

    fn restore_geometry(&mut self, geometry: Geometry) -> bool {
        match geometry {
            Geometry::Frame { rect, rotation } => {
                self.frame = rect;
                self.rotation = rotation;
                true
            }
            _ => false,
        }
    }
}
