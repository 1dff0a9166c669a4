mod commands;
mod context;
mod elements;
mod group;
mod history;
mod layers;
mod pages;
mod properties;
mod transform;

use crate::error::CommandError;

pub use commands::Command;
pub use context::CommandContext;
pub use elements::{DeleteElements, InsertElements, MoveElements};
pub use group::Group;
pub use history::UndoRedoHandler;
pub use layers::{InsertLayer, MergeLayerDown, MoveLayer, RemoveLayer, RenameLayer};
pub use pages::{ChangePageBackground, ChangePageSize, DeletePage, InsertPage, MovePage};
pub use properties::{
    ColorProperty, EditText, ElementProperty, FillProperty, FontProperty, LineStyleProperty, PropertyChange,
    SetColor, SetFill, SetFont, SetLineStyle, SetStrokeWidth, WidthProperty,
};
pub use transform::{ReflectElements, RotateElements, ScaleElements};

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;
