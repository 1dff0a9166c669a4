use crate::command::{Group, InsertLayer, MergeLayerDown, MoveLayer, RemoveLayer, RenameLayer, UndoRedoHandler};
use crate::document::SharedDocument;
use crate::event::{EditorEvent, EventBus};
use crate::id::PageId;
use crate::layer::Layer;
use crate::page::Page;
use crate::settings::Settings;

/// Layer operations on the current page, as offered by the layer menu.
///
/// Structural operations go through the [`UndoRedoHandler`] as exactly one
/// command each. Selection and visibility are view state and change directly.
/// Operations whose preconditions do not hold return without doing anything.
#[derive(Debug)]
pub struct LayerController {
    document: SharedDocument,
    events: EventBus,
    settings: Settings,
    selected_page: Option<usize>,
}

impl LayerController {
    pub fn new(document: SharedDocument, events: EventBus, settings: Settings) -> Self {
        Self {
            document,
            events,
            settings,
            selected_page: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn page_selected(&mut self, page: usize) {
        if self.selected_page == Some(page) {
            return;
        }
        self.selected_page = Some(page);
        self.events.emit(EditorEvent::RebuildLayerMenu);
    }

    pub fn current_page_index(&self) -> Option<usize> {
        self.selected_page
    }

    /// Runs `f` on the current page under the document lock. The lock is
    /// released when this returns.
    fn with_current_page<R>(&self, f: impl FnOnce(&mut Page) -> R) -> Option<R> {
        let index = self.selected_page?;
        let mut doc = self.document.lock();
        doc.page_mut(index).map(f)
    }

    fn repaint_current_page(&self) {
        if let Some(index) = self.selected_page {
            self.events.emit(EditorEvent::PageChanged(index));
        }
    }

    /// New empty layer directly above the selected one, which becomes selected
    pub fn add_new_layer(&mut self, undo: &mut UndoRedoHandler) {
        let Some((page, position)) = self.with_current_page(|p| (p.id(), p.selected_layer_id())) else {
            return;
        };
        log::debug!("Adding layer at position {position}");
        let _ = undo.apply(InsertLayer::new(page, Layer::new(), position));
    }

    /// Deletes the selected layer. A page never drops below one real layer:
    /// deleting the last one puts a fresh empty layer in its place.
    pub fn delete_current_layer(&mut self, undo: &mut UndoRedoHandler) {
        let Some((page, Some(layer), count)) =
            self.with_current_page(|p| (p.id(), p.selected_layer().map(Layer::id), p.layer_count()))
        else {
            return;
        };
        if count > 1 {
            let _ = undo.apply(RemoveLayer::new(page, layer));
            return;
        }
        let replace = Group::new(
            "Delete layer",
            vec![
                RemoveLayer::new(page, layer).into(),
                InsertLayer::new(page, Layer::new(), 0).into(),
            ],
        );
        let _ = undo.apply(replace);
    }

    /// Swaps the selected layer with its neighbor above (`up`) or below
    pub fn move_current_layer(&mut self, up: bool, undo: &mut UndoRedoHandler) {
        let Some(Some((page, layer, layer_id, count))) = self.with_current_page(|p| {
            let layer_id = p.selected_layer_id();
            p.selected_layer().map(|l| (p.id(), l.id(), layer_id, p.layer_count()))
        }) else {
            return;
        };

        if !up && layer_id < 2 {
            return;
        }
        if up && layer_id == count {
            return;
        }

        let from = layer_id - 1;
        let to = if up { layer_id } else { layer_id - 2 };
        let _ = undo.apply(MoveLayer::new(page, layer, from, to));
    }

    /// Folds the selected layer into the one below. The bottom layer and the
    /// background cannot be merged down.
    pub fn merge_current_layer_down(&mut self, undo: &mut UndoRedoHandler) {
        let Some(Some((page, upper, lower))) = self.with_current_page(|p| {
            let layer_id = p.selected_layer_id();
            if layer_id < 2 {
                return None;
            }
            let upper = p.layer(layer_id)?.id();
            let lower = p.layer(layer_id - 1)?.id();
            Some((p.id(), upper, lower))
        }) else {
            return;
        };
        let _ = undo.apply(MergeLayerDown::new(page, upper, lower));
    }

    /// Deep copy of the selected layer, placed directly above it
    pub fn copy_current_layer(&mut self, undo: &mut UndoRedoHandler) {
        let Some(Some((page, copy, layer_id))) = self.with_current_page(|p| {
            let layer_id = p.selected_layer_id();
            p.selected_layer().map(|l| (p.id(), l.duplicate(), layer_id))
        }) else {
            return;
        };
        let _ = undo.apply(InsertLayer::new(page, copy, layer_id));
    }

    /// Selects layer `layer_id` (0 = background). With `auto_hide_show`, the
    /// layers up to and including it become visible and the ones above hidden.
    pub fn switch_to_layer(&mut self, layer_id: usize, auto_hide_show: bool) {
        let switched = self.with_current_page(|p| {
            p.set_selected_layer_id(layer_id);
            if auto_hide_show {
                for i in 1..=p.layer_count() {
                    p.set_layer_visible(i, i <= layer_id);
                }
            }
        });
        if switched.is_some() {
            self.repaint_current_page();
            self.events.emit(EditorEvent::LayerVisibilityChanged);
        }
    }

    pub fn set_layer_visible(&mut self, layer_id: usize, visible: bool) {
        if self.with_current_page(|p| p.set_layer_visible(layer_id, visible)).is_some() {
            self.events.emit(EditorEvent::LayerVisibilityChanged);
            self.repaint_current_page();
        }
    }

    pub fn show_all(&mut self) {
        self.set_all_visible(true);
    }

    pub fn hide_all(&mut self) {
        self.set_all_visible(false);
    }

    fn set_all_visible(&mut self, visible: bool) {
        let changed = self.with_current_page(|p| {
            for i in 1..=p.layer_count() {
                p.set_layer_visible(i, visible);
            }
        });
        if changed.is_some() {
            self.events.emit(EditorEvent::LayerVisibilityChanged);
            self.repaint_current_page();
        }
    }

    /// Makes sure the page at `page` has a real layer selected, creating
    /// layer 1 on a blank page. Drawing tools call this before the first mark.
    pub fn ensure_layer_exists(&mut self, page: usize) {
        let created = {
            let mut doc = self.document.lock();
            let Some(page) = doc.page_mut(page) else {
                return;
            };
            if page.selected_layer_id() > 0 {
                return;
            }
            if page.layer_count() == 0 {
                page.add_layer(Layer::new());
                true
            } else {
                page.set_selected_layer_id(1);
                false
            }
        };
        if created {
            log::debug!("Created first layer on page {page}");
        }
        self.events.emit(EditorEvent::RebuildLayerMenu);
    }

    pub fn layer_count(&self) -> usize {
        self.with_current_page(|p| p.layer_count()).unwrap_or(0)
    }

    /// Selected layer id of the current page; 0 for the background or no page
    pub fn current_layer_id(&self) -> usize {
        self.with_current_page(|p| p.selected_layer_id()).unwrap_or(0)
    }

    pub fn current_page_id(&self) -> Option<PageId> {
        self.with_current_page(|p| p.id())
    }

    pub fn current_layer_name(&self) -> String {
        let layer_id = self.current_layer_id();
        self.layer_name_by_id(layer_id)
    }

    /// Display name of a layer on the current page; unnamed layers get a numbered default
    pub fn layer_name_by_id(&self, layer_id: usize) -> String {
        let stored = self
            .with_current_page(|p| {
                if layer_id == 0 {
                    p.background_name_raw().map(str::to_owned)
                } else {
                    p.layer(layer_id).and_then(|l| l.name().map(str::to_owned))
                }
            })
            .flatten();

        match stored {
            Some(name) => name,
            None if layer_id == 0 => self.settings.background_name.clone(),
            None => self.settings.layer_name(layer_id),
        }
    }

    /// Renames the selected layer (or the background) as an undoable step
    pub fn set_current_layer_name(&mut self, name: impl Into<String>, undo: &mut UndoRedoHandler) {
        let Some((page, layer)) =
            self.with_current_page(|p| (p.id(), p.selected_layer().map(Layer::id)))
        else {
            return;
        };
        let _ = undo.apply(RenameLayer::new(page, layer, Some(name.into())));
    }

    pub fn goto_next_layer(&mut self) {
        let layer_id = self.current_layer_id();
        if layer_id < self.layer_count() {
            self.switch_to_layer(layer_id + 1, self.settings.auto_hide_layers);
        }
    }

    pub fn goto_previous_layer(&mut self) {
        let layer_id = self.current_layer_id();
        if layer_id > 0 {
            self.switch_to_layer(layer_id - 1, self.settings.auto_hide_layers);
        }
    }

    pub fn goto_top_layer(&mut self) {
        let count = self.layer_count();
        self.switch_to_layer(count, self.settings.auto_hide_layers);
    }
}
