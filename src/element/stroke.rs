use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::{Axis, Element, ElementTag, Geometry, common};
use crate::id::ElementId;

/// Dash pattern of a stroke
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    Plain,
    Dashed,
    Dotted,
    DashDot,
    /// Alternating on/off lengths
    Custom(Vec<f32>),
}

/// Freehand stroke: a polyline with a pen width
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    id: ElementId,
    points: Vec<Pos2>,
    color: Color32,
    width: f32,
    /// Fill alpha; `None` means the stroke is not filled
    fill: Option<u8>,
    line_style: LineStyle,
}

impl Stroke {
    pub fn new(points: Vec<Pos2>, width: f32, color: Color32) -> Self {
        Self {
            id: ElementId::new(),
            points,
            color,
            width,
            fill: None,
            line_style: LineStyle::Plain,
        }
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn fill(&self) -> Option<u8> {
        self.fill
    }

    pub fn set_fill(&mut self, fill: Option<u8>) {
        self.fill = fill;
    }

    pub fn line_style(&self) -> &LineStyle {
        &self.line_style
    }

    pub fn set_line_style(&mut self, style: LineStyle) {
        self.line_style = style;
    }

    /// Deep copy with a fresh identity
    pub(crate) fn duplicate(&self) -> Self {
        Self {
            id: ElementId::new(),
            points: self.points.clone(),
            color: self.color,
            width: self.width,
            fill: self.fill,
            line_style: self.line_style.clone(),
        }
    }

    /// Cuts away every point within `radius` of `pos`.
    ///
    /// Returns `None` when nothing was hit. Otherwise returns the surviving runs as new
    /// strokes (fresh ids, same style); runs shorter than two points are dropped, so
    /// an empty vector means the whole stroke was erased.
    pub fn erase_near(&self, pos: Pos2, radius: f32) -> Option<Vec<Stroke>> {
        let hit: Vec<bool> = self.points.iter().map(|p| p.distance(pos) <= radius).collect();
        if !hit.iter().any(|h| *h) {
            return None;
        }

        let mut fragments = Vec::new();
        let mut run: Vec<Pos2> = Vec::new();
        for (point, erased) in self.points.iter().zip(hit) {
            if erased {
                if run.len() >= 2 {
                    fragments.push(self.fragment(std::mem::take(&mut run)));
                }
                run.clear();
            } else {
                run.push(*point);
            }
        }
        if run.len() >= 2 {
            fragments.push(self.fragment(run));
        }
        Some(fragments)
    }

    fn fragment(&self, points: Vec<Pos2>) -> Stroke {
        Stroke {
            id: ElementId::new(),
            points,
            color: self.color,
            width: self.width,
            fill: self.fill,
            line_style: self.line_style.clone(),
        }
    }
}

impl Element for Stroke {
    fn id(&self) -> ElementId {
        self.id
    }

    fn element_type(&self) -> ElementTag {
        ElementTag::Stroke
    }

    fn rect(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::NOTHING;
        }

        common::calculate_bounds(&self.points, self.width / 2.0)
    }

    fn hit_test(&self, pos: Pos2, radius: f32) -> bool {
        let reach = self.width / 2.0 + radius;
        match self.points.as_slice() {
            [] => false,
            [single] => single.distance(pos) <= reach,
            points => points
                .windows(2)
                .any(|w| common::distance_to_line_segment(pos, w[0], w[1]) <= reach),
        }
    }

    fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }

    fn scale(&mut self, origin: Pos2, fx: f32, fy: f32, scale_line_width: bool) {
        for point in &mut self.points {
            *point = common::scale_point(*point, origin, fx, fy);
        }

        if scale_line_width {
            self.width *= (fx.abs() * fy.abs()).sqrt();
        }
    }

    fn rotate(&mut self, center: Pos2, angle: f32) {
        for point in &mut self.points {
            *point = common::rotate_point(*point, center, angle);
        }
    }

    fn reflect(&mut self, axis: Axis, coordinate: f32) {
        for point in &mut self.points {
            *point = common::reflect_point(*point, axis, coordinate);
        }
    }

    fn geometry(&self) -> Geometry {
        Geometry::Stroke {
            points: self.points.clone(),
            width: self.width,
        }
    }

    fn restore_geometry(&mut self, geometry: Geometry) -> bool {
        match geometry {
            Geometry::Stroke { points, width } => {
                self.points = points;
                self.width = width;
                true
            }
            _ => false,
        }
    }
}
