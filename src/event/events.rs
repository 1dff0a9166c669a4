/// Notifications from the editing core to whoever draws the document.
///
/// All of these are fire-and-forget and are only sent after the document lock
/// has been released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The layer list of the current page changed shape or names
    RebuildLayerMenu,
    /// One or more layer visibility flags changed
    LayerVisibilityChanged,
    /// Page at this index needs repainting
    PageChanged(usize),
    PageInserted(usize),
    PageDeleted(usize),
    /// Undo/redo availability or labels may have changed
    UndoRedoChanged,
    /// A command could not be undone or redone; `message` is meant for the user
    CommandFailed { message: String },
}

impl EditorEvent {
    /// Events that invalidate rendered content of a page
    pub fn page(&self) -> Option<usize> {
        match self {
            EditorEvent::PageChanged(i) | EditorEvent::PageInserted(i) | EditorEvent::PageDeleted(i) => {
                Some(*i)
            }
            _ => None,
        }
    }
}
