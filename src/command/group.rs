use super::{Command, CommandContext, CommandResult};
use crate::error::CommandError;
use crate::id::PageId;

/// Several commands that undo and redo as one step.
///
/// Either every child runs or none does: when a child fails, the children that
/// already ran are reverted before the error is returned.
#[derive(Debug)]
pub struct Group {
    label: String,
    commands: Vec<Command>,
}

impl Group {
    pub fn new(label: impl Into<String>, commands: Vec<Command>) -> Self {
        Self {
            label: label.into(),
            commands,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Union of the children's pages, first occurrence order
    pub fn affected_pages(&self) -> Vec<PageId> {
        let mut pages = Vec::new();
        for page in self.commands.iter().flat_map(Command::affected_pages) {
            if !pages.contains(&page) {
                pages.push(page);
            }
        }
        pages
    }

    pub(super) fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let total = self.commands.len();
        for i in 0..total {
            if let Err(err) = self.commands[i].redo(ctx) {
                log::warn!("Grouped command {} of {total} failed: {err}", i + 1);
                let mut failed = 1;
                for done in self.commands[..i].iter_mut().rev() {
                    if let Err(rollback) = done.undo(ctx) {
                        log::error!("Could not roll back \"{}\": {rollback}", done.describe());
                        failed += 1;
                    }
                }
                return Err(Self::outcome(err, failed, total));
            }
        }
        Ok(())
    }

    pub(super) fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let total = self.commands.len();
        for i in (0..total).rev() {
            if let Err(err) = self.commands[i].undo(ctx) {
                log::warn!("Undoing grouped command {} of {total} failed: {err}", i + 1);
                let mut failed = 1;
                for done in self.commands[i + 1..].iter_mut() {
                    if let Err(rollback) = done.redo(ctx) {
                        log::error!("Could not reapply \"{}\": {rollback}", done.describe());
                        failed += 1;
                    }
                }
                return Err(Self::outcome(err, failed, total));
            }
        }
        Ok(())
    }

    /// A clean rollback reports the child's own error; a rollback that also
    /// failed leaves the group half applied, which is reported as `Partial`.
    fn outcome(err: CommandError, failed: usize, total: usize) -> CommandError {
        if failed == 1 {
            err
        } else {
            CommandError::Partial { failed, total }
        }
    }
}
