use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::{Axis, Element, ElementTag, Geometry, common};
use crate::id::ElementId;

/// Embedded equation: the LaTeX source plus its rendered bytes
#[derive(PartialEq, Serialize, Deserialize)]
pub struct TexImage {
    id: ElementId,
    source: String,
    rendered: Vec<u8>,
    frame: Rect,
    rotation: f32,
}

impl std::fmt::Debug for TexImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TexImage")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("rendered_len", &self.rendered.len())
            .field("frame", &self.frame)
            .finish()
    }
}

impl TexImage {
    pub fn new(source: impl Into<String>, rendered: Vec<u8>, frame: Rect) -> Self {
        Self {
            id: ElementId::new(),
            source: source.into(),
            rendered,
            frame,
            rotation: 0.0,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replaces the source. The rendered bytes go stale and are dropped.
    pub fn set_source(&mut self, source: String) {
        if source != self.source {
            self.rendered.clear();
        }
        self.source = source;
    }

    pub fn rendered(&self) -> &[u8] {
        &self.rendered
    }

    pub(crate) fn set_rendered(&mut self, rendered: Vec<u8>) {
        self.rendered = rendered;
    }

    pub(crate) fn duplicate(&self) -> Self {
        Self {
            id: ElementId::new(),
            source: self.source.clone(),
            rendered: self.rendered.clone(),
            frame: self.frame,
            rotation: self.rotation,
        }
    }
}

impl Element for TexImage {
    fn id(&self) -> ElementId {
        self.id
    }

    fn element_type(&self) -> ElementTag {
        ElementTag::TexImage
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
