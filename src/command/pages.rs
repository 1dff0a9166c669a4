use super::{CommandContext, CommandResult};
use crate::error::CommandError;
use crate::event::EditorEvent;
use crate::id::PageId;
use crate::page::{Page, PageBackground};

#[derive(Debug)]
pub struct InsertPage {
    page_id: PageId,
    index: usize,
    held: Option<Page>,
}

impl InsertPage {
    pub fn new(page: Page, index: usize) -> Self {
        Self {
            page_id: page.id(),
            index,
            held: Some(page),
        }
    }

    pub fn page(&self) -> PageId {
        self.page_id
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let page = self.held.take().ok_or(CommandError::AlreadyApplied)?;
        self.index = ctx.document.insert_page(page, self.index);
        ctx.emit(EditorEvent::PageInserted(self.index));
        Ok(())
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if self.held.is_some() {
            return Err(CommandError::NotApplied);
        }
        let (index, page) = ctx.document.remove_page(self.page_id)?;
        self.held = Some(page);
        ctx.emit(EditorEvent::PageDeleted(index));
        Ok(())
    }
}

/// Takes a page out of the document. The command owns the page while it is
/// deleted, so commands further down the stack that refer to it work again
/// once it is restored.
#[derive(Debug)]
pub struct DeletePage {
    page_id: PageId,
    index: usize,
    held: Option<Page>,
}

impl DeletePage {
    pub fn new(page_id: PageId) -> Self {
        Self {
            page_id,
            index: 0,
            held: None,
        }
    }

    pub fn page(&self) -> PageId {
        self.page_id
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if self.held.is_some() {
            return Err(CommandError::AlreadyApplied);
        }
        let (index, page) = ctx.document.remove_page(self.page_id)?;
        self.index = index;
        self.held = Some(page);
        ctx.emit(EditorEvent::PageDeleted(index));
        Ok(())
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let page = self.held.take().ok_or(CommandError::NotApplied)?;
        let index = ctx.document.insert_page(page, self.index);
        ctx.emit(EditorEvent::PageInserted(index));
        Ok(())
    }
}

#[derive(Debug)]
pub struct MovePage {
    page_id: PageId,
    from: usize,
    to: usize,
    applied: bool,
}

impl MovePage {
    pub fn new(page_id: PageId, from: usize, to: usize) -> Self {
        Self {
            page_id,
            from,
            to,
            applied: false,
        }
    }

    pub fn page(&self) -> PageId {
        self.page_id
    }

    fn relocate(&self, ctx: &mut CommandContext<'_>, from: usize, to: usize) -> CommandResult {
        let index = ctx
            .document
            .index_of(self.page_id)
            .ok_or(CommandError::PageNotFound(self.page_id))?;
        if index != from {
            return Err(CommandError::StructuralMismatch(format!(
                "page {} is at index {index}, expected {from}",
                self.page_id
            )));
        }
        ctx.document.move_page(from, to)?;
        ctx.emit(EditorEvent::PageDeleted(from));
        ctx.emit(EditorEvent::PageInserted(to));
        Ok(())
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if self.applied {
            return Err(CommandError::AlreadyApplied);
        }
        self.relocate(ctx, self.from, self.to)?;
        self.applied = true;
        Ok(())
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if !self.applied {
            return Err(CommandError::NotApplied);
        }
        self.relocate(ctx, self.to, self.from)?;
        self.applied = false;
        Ok(())
    }
}

#[derive(Debug)]
pub struct ChangePageBackground {
    page: PageId,
    background: PageBackground,
    previous: Option<PageBackground>,
}

impl ChangePageBackground {
    pub fn new(page: PageId, background: PageBackground) -> Self {
        Self {
            page,
            background,
            previous: None,
        }
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if self.previous.is_some() {
            return Err(CommandError::AlreadyApplied);
        }
        let page = ctx.document.find_page_mut(self.page)?;
        self.previous = Some(page.background().clone());
        page.set_background(self.background.clone());
        Ok(())
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let page = ctx.document.find_page_mut(self.page)?;
        let previous = self.previous.take().ok_or(CommandError::NotApplied)?;
        page.set_background(previous);
        Ok(())
    }
}

#[derive(Debug)]
pub struct ChangePageSize {
    page: PageId,
    width: f32,
    height: f32,
    previous: Option<(f32, f32)>,
}

impl ChangePageSize {
    pub fn new(page: PageId, width: f32, height: f32) -> Self {
        Self {
            page,
            width,
            height,
            previous: None,
        }
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if self.previous.is_some() {
            return Err(CommandError::AlreadyApplied);
        }
        let page = ctx.document.find_page_mut(self.page)?;
        self.previous = Some((page.width(), page.height()));
        page.set_size(self.width, self.height);
        Ok(())
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let page = ctx.document.find_page_mut(self.page)?;
        let (width, height) = self.previous.take().ok_or(CommandError::NotApplied)?;
        page.set_size(width, height);
        Ok(())
    }
}
