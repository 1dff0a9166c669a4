use thiserror::Error;

use crate::id::{ElementId, LayerId, PageId};

/// Errors a command reports from `redo`/`undo`.
///
/// None of these are fatal: a command that fails has left the document
/// untouched, and the undo handler turns the error into a user message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("page {0} is not part of the document")]
    PageNotFound(PageId),

    #[error("layer {0} is not on the page")]
    LayerNotFound(LayerId),

    #[error("element {0} is not on the layer")]
    ElementNotFound(ElementId),

    #[error("index {index} is out of range (len {len})")]
    InvalidIndex { index: usize, len: usize },

    /// The command holds nothing to reinsert; it was already applied
    #[error("command was already applied")]
    AlreadyApplied,

    /// The command has nothing to take back; it was never applied
    #[error("command was not applied")]
    NotApplied,

    #[error("structural mismatch: {0}")]
    StructuralMismatch(String),

    /// Some children of a group failed
    #[error("{failed} of {total} grouped commands failed")]
    Partial { failed: usize, total: usize },
}

/// Errors that can occur while loading [`crate::Settings`]
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read settings: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}
