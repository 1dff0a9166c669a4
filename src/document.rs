use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::CommandError;
use crate::id::{LayerId, PageId};
use crate::layer::Layer;
use crate::page::Page;

/// The pages of a note, in order
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pages: Vec<Page>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    pub fn index_of(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|p| p.id() == id)
    }

    pub fn page_by_id(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id() == id)
    }

    pub fn find_page_mut(&mut self, id: PageId) -> Result<&mut Page, CommandError> {
        self.pages
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(CommandError::PageNotFound(id))
    }

    pub fn find_layer_mut(&mut self, page: PageId, layer: LayerId) -> Result<&mut Layer, CommandError> {
        self.find_page_mut(page)?.find_layer_mut(layer)
    }

    pub fn add_page(&mut self, page: Page) -> usize {
        self.pages.push(page);
        self.pages.len() - 1
    }

    /// Inserts at `index` (past the end appends) and returns the index used
    pub fn insert_page(&mut self, page: Page, index: usize) -> usize {
        let index = index.min(self.pages.len());
        self.pages.insert(index, page);
        index
    }

    pub fn remove_page(&mut self, id: PageId) -> Result<(usize, Page), CommandError> {
        let index = self.index_of(id).ok_or(CommandError::PageNotFound(id))?;
        Ok((index, self.pages.remove(index)))
    }

    /// Moves the page at `from` so that it ends up at index `to`
    pub fn move_page(&mut self, from: usize, to: usize) -> Result<(), CommandError> {
        let len = self.pages.len();
        if from >= len {
            return Err(CommandError::InvalidIndex { index: from, len });
        }
        if to >= len {
            return Err(CommandError::InvalidIndex { index: to, len });
        }
        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }

    /// Canonical JSON dump of the whole model. Two documents with equal
    /// snapshots have the same pages, layers, element identities and order.
    pub fn snapshot(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Handle to the document shared between the editing thread and render workers.
///
/// There is exactly one lock. Everything that changes page, layer or element
/// topology holds it for the span of the change, and nothing may emit an
/// [`crate::event::EditorEvent`] while holding it: a listener that schedules a
/// render job would otherwise wait on the very lock the emitter still holds.
#[derive(Debug, Clone, Default)]
pub struct SharedDocument {
    inner: Arc<Mutex<Document>>,
}

impl SharedDocument {
    pub fn new(document: Document) -> Self {
        Self {
            inner: Arc::new(Mutex::new(document)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, Document> {
        self.inner.lock()
    }

    /// Returns `None` if someone else currently holds the lock
    pub fn try_lock(&self) -> Option<MutexGuard<'_, Document>> {
        self.inner.try_lock()
    }

    pub fn snapshot(&self) -> serde_json::Result<String> {
        self.lock().snapshot()
    }
}
