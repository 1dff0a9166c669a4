#![warn(clippy::all, rust_2018_idioms)]

pub mod command;
pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod id;
pub mod layer;
pub mod layer_controller;
pub mod page;
pub mod settings;
pub mod tools;

pub use command::{Command, CommandContext, CommandResult, UndoRedoHandler};
pub use document::{Document, SharedDocument};
pub use element::{Element, ElementType};
pub use error::{CommandError, SettingsError};
pub use event::{EditorEvent, EventBus};
pub use id::{ElementId, LayerId, PageId};
pub use layer::{InsertionOrder, Layer};
pub use layer_controller::LayerController;
pub use page::{BackgroundKind, Page, PageBackground};
pub use settings::Settings;
pub use tools::{DrawTool, EraserMode, EraserTool, Tool, ToolContext};
