use super::elements::{DeleteElements, InsertElements, MoveElements};
use super::group::Group;
use super::layers::{InsertLayer, MergeLayerDown, MoveLayer, RemoveLayer, RenameLayer};
use super::pages::{ChangePageBackground, ChangePageSize, DeletePage, InsertPage, MovePage};
use super::properties::{EditText, SetColor, SetFill, SetFont, SetLineStyle, SetStrokeWidth};
use super::transform::{ReflectElements, RotateElements, ScaleElements};
use super::{CommandContext, CommandResult};
use crate::id::PageId;

/// Every reversible change to a document.
///
/// `redo` applies the change and `undo` reverts it exactly. Both leave the
/// document untouched when they return an error.
#[derive(Debug)]
pub enum Command {
    Insert(InsertElements),
    Delete(DeleteElements),
    Move(MoveElements),
    Scale(ScaleElements),
    Rotate(RotateElements),
    Reflect(ReflectElements),
    RecolorSet(SetColor),
    FillSet(SetFill),
    LineStyleSet(SetLineStyle),
    SizeSet(SetStrokeWidth),
    FontSet(SetFont),
    TextEdit(EditText),
    InsertLayer(InsertLayer),
    RemoveLayer(RemoveLayer),
    MoveLayer(MoveLayer),
    MergeLayerDown(MergeLayerDown),
    RenameLayer(RenameLayer),
    InsertPage(InsertPage),
    DeletePage(DeletePage),
    MovePage(MovePage),
    ChangePageBackground(ChangePageBackground),
    ChangePageSize(ChangePageSize),
    Group(Group),
}

impl Command {
    pub fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        match self {
            Command::Insert(cmd) => cmd.redo(ctx),
            Command::Delete(cmd) => cmd.redo(ctx),
            Command::Move(cmd) => cmd.redo(ctx),
            Command::Scale(cmd) => cmd.redo(ctx),
            Command::Rotate(cmd) => cmd.redo(ctx),
            Command::Reflect(cmd) => cmd.redo(ctx),
            Command::RecolorSet(cmd) => cmd.redo(ctx),
            Command::FillSet(cmd) => cmd.redo(ctx),
            Command::LineStyleSet(cmd) => cmd.redo(ctx),
            Command::SizeSet(cmd) => cmd.redo(ctx),
            Command::FontSet(cmd) => cmd.redo(ctx),
            Command::TextEdit(cmd) => cmd.redo(ctx),
            Command::InsertLayer(cmd) => cmd.redo(ctx),
            Command::RemoveLayer(cmd) => cmd.redo(ctx),
            Command::MoveLayer(cmd) => cmd.redo(ctx),
            Command::MergeLayerDown(cmd) => cmd.redo(ctx),
            Command::RenameLayer(cmd) => cmd.redo(ctx),
            Command::InsertPage(cmd) => cmd.redo(ctx),
            Command::DeletePage(cmd) => cmd.redo(ctx),
            Command::MovePage(cmd) => cmd.redo(ctx),
            Command::ChangePageBackground(cmd) => cmd.redo(ctx),
            Command::ChangePageSize(cmd) => cmd.redo(ctx),
            Command::Group(cmd) => cmd.redo(ctx),
        }
    }

    pub fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        match self {
            Command::Insert(cmd) => cmd.undo(ctx),
            Command::Delete(cmd) => cmd.undo(ctx),
            Command::Move(cmd) => cmd.undo(ctx),
            Command::Scale(cmd) => cmd.undo(ctx),
            Command::Rotate(cmd) => cmd.undo(ctx),
            Command::Reflect(cmd) => cmd.undo(ctx),
            Command::RecolorSet(cmd) => cmd.undo(ctx),
            Command::FillSet(cmd) => cmd.undo(ctx),
            Command::LineStyleSet(cmd) => cmd.undo(ctx),
            Command::SizeSet(cmd) => cmd.undo(ctx),
            Command::FontSet(cmd) => cmd.undo(ctx),
            Command::TextEdit(cmd) => cmd.undo(ctx),
            Command::InsertLayer(cmd) => cmd.undo(ctx),
            Command::RemoveLayer(cmd) => cmd.undo(ctx),
            Command::MoveLayer(cmd) => cmd.undo(ctx),
            Command::MergeLayerDown(cmd) => cmd.undo(ctx),
            Command::RenameLayer(cmd) => cmd.undo(ctx),
            Command::InsertPage(cmd) => cmd.undo(ctx),
            Command::DeletePage(cmd) => cmd.undo(ctx),
            Command::MovePage(cmd) => cmd.undo(ctx),
            Command::ChangePageBackground(cmd) => cmd.undo(ctx),
            Command::ChangePageSize(cmd) => cmd.undo(ctx),
            Command::Group(cmd) => cmd.undo(ctx),
        }
    }

    /// Short label for menus, e.g. "Undo: Merge layer down"
    pub fn describe(&self) -> &str {
        match self {
            Command::Insert(_) => "Insert",
            Command::Delete(_) => "Delete",
            Command::Move(_) => "Move",
            Command::Scale(_) => "Scale",
            Command::Rotate(_) => "Rotate",
            Command::Reflect(_) => "Reflect",
            Command::RecolorSet(_) => "Change color",
            Command::FillSet(_) => "Change fill",
            Command::LineStyleSet(_) => "Change line style",
            Command::SizeSet(_) => "Change stroke width",
            Command::FontSet(_) => "Change font",
            Command::TextEdit(_) => "Edit text",
            Command::InsertLayer(_) => "Insert layer",
            Command::RemoveLayer(_) => "Delete layer",
            Command::MoveLayer(_) => "Move layer",
            Command::MergeLayerDown(_) => "Merge layer down",
            Command::RenameLayer(_) => "Rename layer",
            Command::InsertPage(_) => "Insert page",
            Command::DeletePage(_) => "Delete page",
            Command::MovePage(_) => "Move page",
            Command::ChangePageBackground(_) => "Change page background",
            Command::ChangePageSize(_) => "Change page size",
            Command::Group(group) => group.label(),
        }
    }

    /// Pages that need repainting after `redo` or `undo`, without duplicates
    pub fn affected_pages(&self) -> Vec<PageId> {
        match self {
            Command::Insert(cmd) => vec![cmd.page()],
            Command::Delete(cmd) => vec![cmd.page()],
            Command::Move(cmd) => cmd.pages(),
            Command::Scale(cmd) => vec![cmd.page()],
            Command::Rotate(cmd) => vec![cmd.page()],
            Command::Reflect(cmd) => vec![cmd.page()],
            Command::RecolorSet(cmd) => vec![cmd.page()],
            Command::FillSet(cmd) => vec![cmd.page()],
            Command::LineStyleSet(cmd) => vec![cmd.page()],
            Command::SizeSet(cmd) => vec![cmd.page()],
            Command::FontSet(cmd) => vec![cmd.page()],
            Command::TextEdit(cmd) => vec![cmd.page()],
            Command::InsertLayer(cmd) => vec![cmd.page()],
            Command::RemoveLayer(cmd) => vec![cmd.page()],
            Command::MoveLayer(cmd) => vec![cmd.page()],
            Command::MergeLayerDown(cmd) => vec![cmd.page()],
            Command::RenameLayer(cmd) => vec![cmd.page()],
            Command::InsertPage(cmd) => vec![cmd.page()],
            Command::DeletePage(cmd) => vec![cmd.page()],
            Command::MovePage(cmd) => vec![cmd.page()],
            Command::ChangePageBackground(cmd) => vec![cmd.page()],
            Command::ChangePageSize(cmd) => vec![cmd.page()],
            Command::Group(group) => group.affected_pages(),
        }
    }
}

macro_rules! impl_from_payload {
    ($($payload:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$payload> for Command {
                fn from(cmd: $payload) -> Self {
                    Command::$variant(cmd)
                }
            }
        )*
    };
}

impl_from_payload! {
    InsertElements => Insert,
    DeleteElements => Delete,
    MoveElements => Move,
    ScaleElements => Scale,
    RotateElements => Rotate,
    ReflectElements => Reflect,
    SetColor => RecolorSet,
    SetFill => FillSet,
    SetLineStyle => LineStyleSet,
    SetStrokeWidth => SizeSet,
    SetFont => FontSet,
    EditText => TextEdit,
    InsertLayer => InsertLayer,
    RemoveLayer => RemoveLayer,
    MoveLayer => MoveLayer,
    MergeLayerDown => MergeLayerDown,
    RenameLayer => RenameLayer,
    InsertPage => InsertPage,
    DeletePage => DeletePage,
    MovePage => MovePage,
    ChangePageBackground => ChangePageBackground,
    ChangePageSize => ChangePageSize,
    Group => Group,
}
