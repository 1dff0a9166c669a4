use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::error::CommandError;
use crate::id::{ElementId, LayerId, PageId};
use crate::layer::Layer;

/// Background pattern of a page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum BackgroundKind {
    Plain,
    #[default]
    Lined,
    Ruled,
    Graph,
    Dotted,
    Image,
    /// Page `n` of the attached PDF
    Pdf(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageBackground {
    pub kind: BackgroundKind,
    pub color: Color32,
}

impl Default for PageBackground {
    fn default() -> Self {
        Self {
            kind: BackgroundKind::default(),
            color: Color32::WHITE,
        }
    }
}

/// A page: background plus a stack of layers.
///
/// Layers are addressed two ways. The *layer id* is 1-based and derived from the
/// position (`layers[0]` is layer 1); id 0 is the background, which never holds
/// elements. The [`LayerId`] is a stable identity that survives reordering.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    id: PageId,
    width: f32,
    height: f32,
    background: PageBackground,
    background_name: Option<String>,
    background_visible: bool,
    layers: Vec<Layer>,
    /// 0 = background
    selected_layer: usize,
}

impl Page {
    /// A blank page; its first layer is created lazily when drawing starts
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            id: PageId::new(),
            width,
            height,
            background: PageBackground::default(),
            background_name: None,
            background_visible: true,
            layers: Vec::new(),
            selected_layer: 0,
        }
    }

    /// A page that already has layer 1, selected
    pub fn with_layer(width: f32, height: f32) -> Self {
        let mut page = Self::new(width, height);
        page.add_layer(Layer::new());
        page
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn background(&self) -> &PageBackground {
        &self.background
    }

    pub fn set_background(&mut self, background: PageBackground) {
        self.background = background;
    }

    /// Stored background name, without the default
    pub fn background_name_raw(&self) -> Option<&str> {
        self.background_name.as_deref()
    }

    pub fn background_name(&self) -> &str {
        self.background_name.as_deref().unwrap_or("Background")
    }

    pub fn set_background_name(&mut self, name: Option<String>) {
        self.background_name = name;
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Layer by 1-based layer id
    pub fn layer(&self, layer_id: usize) -> Option<&Layer> {
        layer_id.checked_sub(1).and_then(|i| self.layers.get(i))
    }

    pub fn layer_mut(&mut self, layer_id: usize) -> Option<&mut Layer> {
        layer_id.checked_sub(1).and_then(|i| self.layers.get_mut(i))
    }

    /// Position of the layer in the stack (0-based; the layer id is this plus one)
    pub fn layer_index(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id() == id)
    }

    pub fn layer_by_id(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    pub fn layer_by_id_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id() == id)
    }

    pub fn find_layer_mut(&mut self, id: LayerId) -> Result<&mut Layer, CommandError> {
        self.layer_by_id_mut(id).ok_or(CommandError::LayerNotFound(id))
    }

    /// The layer holding element `id`, if any
    pub fn layer_of(&self, id: ElementId) -> Option<LayerId> {
        self.layers.iter().find(|l| l.contains(id)).map(Layer::id)
    }

    pub fn selected_layer_id(&self) -> usize {
        self.selected_layer
    }

    /// Selects a layer by 1-based id; out of range ids are clamped to the top layer
    pub fn set_selected_layer_id(&mut self, layer_id: usize) {
        self.selected_layer = layer_id.min(self.layers.len());
    }

    /// The selected layer, or `None` while the background is selected
    pub fn selected_layer(&self) -> Option<&Layer> {
        self.layer(self.selected_layer)
    }

    pub fn selected_layer_mut(&mut self) -> Option<&mut Layer> {
        let selected = self.selected_layer;
        self.layer_mut(selected)
    }

    /// Appends a layer on top and selects it
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
        self.selected_layer = self.layers.len();
    }

    /// Inserts at stack position `index` (past the end appends) and selects the new layer.
    /// Returns the position actually used.
    pub fn insert_layer(&mut self, layer: Layer, index: usize) -> usize {
        let index = index.min(self.layers.len());
        self.layers.insert(index, layer);
        self.selected_layer = index + 1;
        index
    }

    /// Removes a layer; the layers above it move down one id. The top layer is selected afterwards.
    pub fn remove_layer(&mut self, id: LayerId) -> Result<(usize, Layer), CommandError> {
        let index = self.layer_index(id).ok_or(CommandError::LayerNotFound(id))?;
        let layer = self.layers.remove(index);
        self.selected_layer = self.layers.len();
        Ok((index, layer))
    }

    /// Visibility by layer id; 0 addresses the background
    pub fn set_layer_visible(&mut self, layer_id: usize, visible: bool) {
        if layer_id == 0 {
            self.background_visible = visible;
        } else if let Some(layer) = self.layer_mut(layer_id) {
            layer.set_visible(visible);
        }
    }

    pub fn is_layer_visible(&self, layer_id: usize) -> bool {
        if layer_id == 0 {
            return self.background_visible;
        }
        self.layer(layer_id).is_some_and(Layer::is_visible)
    }

    /// True if any layer holds an element
    pub fn is_annotated(&self) -> bool {
        self.layers.iter().any(Layer::is_annotated)
    }

    pub fn element_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    pub fn contains_element(&self, id: ElementId) -> bool {
        self.layers.iter().any(|l| l.elements().iter().any(|e| e.id() == id))
    }
}
