use serde::{Deserialize, Serialize};
use std::fmt;

use crate::element::{Element, ElementType};
use crate::error::CommandError;
use crate::id::{ElementId, LayerId};

/// Elements detached from a layer, each keyed by the index it occupied.
///
/// Kept sorted by index (ties keep push order), so reinserting front to back
/// rebuilds the original interleaving with the elements that stayed behind.
#[derive(Debug, Default, PartialEq)]
pub struct InsertionOrder {
    entries: Vec<(usize, ElementType)>,
}

impl InsertionOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, index: usize, element: ElementType) {
        let at = self.entries.partition_point(|(i, _)| *i <= index);
        self.entries.insert(at, (index, element));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(usize, ElementType)> {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<ElementId> {
        self.entries.iter().map(|(_, e)| e.id()).collect()
    }

    /// (index, id) pairs, in insertion order
    pub fn positions(&self) -> Vec<(usize, ElementId)> {
        self.entries.iter().map(|(i, e)| (*i, e.id())).collect()
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut ElementType> {
        self.entries.iter_mut().map(|(_, e)| e).find(|e| e.id() == id)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ElementType> {
        self.entries.iter_mut().map(|(_, e)| e)
    }
}

impl FromIterator<(usize, ElementType)> for InsertionOrder {
    fn from_iter<T: IntoIterator<Item = (usize, ElementType)>>(iter: T) -> Self {
        let mut order = InsertionOrder::new();
        for (index, element) in iter {
            order.push(index, element);
        }
        order
    }
}

impl IntoIterator for InsertionOrder {
    type Item = (usize, ElementType);
    type IntoIter = std::vec::IntoIter<(usize, ElementType)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// An ordered stack of elements. Index 0 is painted first.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    id: LayerId,
    name: Option<String>,
    visible: bool,
    elements: Vec<ElementType>,
}

impl Default for Layer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer {
    pub fn new() -> Self {
        Self {
            id: LayerId::new(),
            name: None,
            visible: true,
            elements: Vec::new(),
        }
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new()
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn has_name(&self) -> bool {
        self.name.is_some()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn elements(&self) -> &[ElementType] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// True if anything has been drawn on the layer
    pub fn is_annotated(&self) -> bool {
        !self.elements.is_empty()
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: ElementId) -> Option<&ElementType> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut ElementType> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    /// Takes ownership of `element` at `position`, shifting later elements up.
    ///
    /// A position past the end appends. Returns the index the element landed at,
    /// or hands the element back if one with the same id is already on the layer.
    pub fn insert(&mut self, element: ElementType, position: usize) -> Result<usize, ElementType> {
        if self.contains(element.id()) {
            log::warn!("Layer::insert: element {} is already on layer {}", element.id(), self.id);
            return Err(element);
        }

        let position = position.min(self.elements.len());
        self.elements.insert(position, element);
        Ok(position)
    }

    /// Inserts at the end, i.e. paints on top of everything else
    pub fn add_top(&mut self, element: ElementType) -> Result<usize, ElementType> {
        let end = self.elements.len();
        self.insert(element, end)
    }

    /// Gives up ownership of the element with `id`, shifting later elements down
    pub fn remove(&mut self, id: ElementId) -> Result<(usize, ElementType), CommandError> {
        match self.index_of(id) {
            Some(index) => Ok((index, self.elements.remove(index))),
            None => {
                log::warn!("Could not remove element {id} from layer {}, it's not on the layer", self.id);
                Err(CommandError::ElementNotFound(id))
            }
        }
    }

    /// Like [`Layer::remove`], checking `hint` first before searching
    pub fn remove_at(&mut self, id: ElementId, hint: usize) -> Result<(usize, ElementType), CommandError> {
        if self.elements.get(hint).is_some_and(|e| e.id() == id) {
            return Ok((hint, self.elements.remove(hint)));
        }
        self.remove(id)
    }

    /// Reinserts a batch of detached elements at their recorded indices.
    ///
    /// All or nothing: if any id is already present the batch is handed back untouched.
    pub fn insert_all(&mut self, order: InsertionOrder) -> Result<(), InsertionOrder> {
        if order.iter().any(|(_, e)| self.contains(e.id())) {
            log::warn!("Layer::insert_all: part of the batch is already on layer {}", self.id);
            return Err(order);
        }

        for (index, element) in order {
            let index = index.min(self.elements.len());
            self.elements.insert(index, element);
        }
        Ok(())
    }

    /// Checks that every id in `ids` is on this layer and appears only once
    pub fn check_all(&self, ids: &[ElementId]) -> Result<(), CommandError> {
        for (i, id) in ids.iter().enumerate() {
            if !self.contains(*id) {
                return Err(CommandError::ElementNotFound(*id));
            }
            if ids[..i].contains(id) {
                return Err(CommandError::StructuralMismatch(format!("element {id} listed twice")));
            }
        }
        Ok(())
    }

    /// Detaches every element in `ids`, recording where each one was.
    ///
    /// All or nothing: if any id is missing (or listed twice) nothing is removed.
    pub fn remove_all(&mut self, ids: &[ElementId]) -> Result<InsertionOrder, CommandError> {
        let mut indices = Vec::with_capacity(ids.len());
        for id in ids {
            let index = self.index_of(*id).ok_or(CommandError::ElementNotFound(*id))?;
            if indices.contains(&index) {
                return Err(CommandError::StructuralMismatch(format!(
                    "element {id} listed twice"
                )));
            }
            indices.push(index);
        }

        indices.sort_unstable();
        let mut order = InsertionOrder::new();
        for index in indices.into_iter().rev() {
            order.push(index, self.elements.remove(index));
        }
        Ok(order)
    }

    /// Drains every element, keeping paint order
    pub fn take_all(&mut self) -> Vec<ElementType> {
        std::mem::take(&mut self.elements)
    }

    /// Deep copy: new layer id, every element duplicated with a new id
    pub fn duplicate(&self) -> Layer {
        Layer {
            id: LayerId::new(),
            name: self.name.clone(),
            visible: self.visible,
            elements: self.elements.iter().map(ElementType::duplicate).collect(),
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} ({} elements)", self.elements.len()),
            None => write!(f, "<unnamed> ({} elements)", self.elements.len()),
        }
    }
}
