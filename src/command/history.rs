use super::{Command, CommandContext, CommandResult};
use crate::document::{Document, SharedDocument};
use crate::error::CommandError;
use crate::event::{EditorEvent, EventBus};
use crate::settings::Settings;

/// A command on one of the stacks, tagged with the serial it got when first pushed
#[derive(Debug)]
struct Entry {
    serial: u64,
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Undo,
    Redo,
}

impl Direction {
    fn verb(self) -> &'static str {
        match self {
            Direction::Undo => "undo",
            Direction::Redo => "redo",
        }
    }
}

/// Owns the undo and redo stacks of a document.
///
/// Every command runs with the document lock held; the lock is released before
/// any listener hears about the change. Save markers remember the serial of the
/// command on top of the undo stack, so stepping back to a saved state clears the
/// changed flag again.
#[derive(Debug)]
pub struct UndoRedoHandler {
    document: SharedDocument,
    events: EventBus,
    undo_stack: Vec<Entry>,
    redo_stack: Vec<Entry>,
    next_serial: u64,
    /// `None` marks a save taken with an empty undo stack
    saved: Option<u64>,
    autosaved: Option<u64>,
    trace: bool,
}

impl UndoRedoHandler {
    pub fn new(document: SharedDocument, events: EventBus) -> Self {
        Self {
            document,
            events,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            next_serial: 1,
            saved: None,
            autosaved: None,
            trace: false,
        }
    }

    /// Dump both stacks at `trace` level after every change
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Applies the undo-related preferences
    pub fn with_settings(self, settings: &Settings) -> Self {
        self.with_trace(settings.undo_trace)
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Performs `command` and pushes it onto the undo stack.
    ///
    /// The command is pushed even if it fails; a failing command changed nothing.
    /// Any redoable future is discarded before listeners are notified.
    pub fn apply(&mut self, command: impl Into<Command>) -> CommandResult {
        let mut command = command.into();
        let (result, events) = self.run(&mut command, Direction::Redo);

        self.redo_stack.clear();
        let label = command.describe().to_owned();
        self.push_undo(command);

        if let Err(err) = &result {
            log::error!("Could not apply \"{label}\": {err}");
            self.events.emit(EditorEvent::CommandFailed {
                message: format!("Could not apply \"{label}\"\nSomething went wrong: {err}"),
            });
        }
        self.finish(events);
        result
    }

    /// Pushes a command whose change has already been made to the document
    pub fn record(&mut self, command: impl Into<Command>) {
        let command = command.into();
        let pages = {
            let doc = self.document.lock();
            Self::page_events(&doc, &command)
        };

        self.redo_stack.clear();
        log::debug!("Recorded \"{}\"", command.describe());
        self.push_undo(command);
        self.finish(pages);
    }

    /// Reverts the most recent command. Does nothing if there is none.
    ///
    /// A command that fails to undo still moves to the redo stack; the user gets
    /// a `CommandFailed` message.
    pub fn undo(&mut self) -> CommandResult {
        let Some(mut entry) = self.undo_stack.pop() else {
            return Ok(());
        };
        let (result, events) = self.run(&mut entry.command, Direction::Undo);
        let label = entry.command.describe().to_owned();
        self.redo_stack.push(entry);

        if let Err(err) = &result {
            self.report_failure(Direction::Undo, &label, err);
        }
        self.finish(events);
        result
    }

    /// Re-applies the most recently undone command. Does nothing if there is none.
    pub fn redo(&mut self) -> CommandResult {
        let Some(mut entry) = self.redo_stack.pop() else {
            return Ok(());
        };
        let (result, events) = self.run(&mut entry.command, Direction::Redo);
        let label = entry.command.describe().to_owned();
        self.undo_stack.push(entry);

        if let Err(err) = &result {
            self.report_failure(Direction::Redo, &label, err);
        }
        self.finish(events);
        result
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// The command `undo` would revert
    pub fn undo_command(&self) -> Option<&Command> {
        self.undo_stack.last().map(|e| &e.command)
    }

    pub fn redo_command(&self) -> Option<&Command> {
        self.redo_stack.last().map(|e| &e.command)
    }

    pub fn undo_description(&self) -> String {
        match self.undo_command() {
            Some(command) => format!("Undo: {}", command.describe()),
            None => "Undo".to_owned(),
        }
    }

    pub fn redo_description(&self) -> String {
        match self.redo_command() {
            Some(command) => format!("Redo: {}", command.describe()),
            None => "Redo".to_owned(),
        }
    }

    pub fn document_saved(&mut self) {
        self.saved = self.top_serial();
    }

    pub fn document_autosaved(&mut self) {
        self.autosaved = self.top_serial();
    }

    /// Whether the undo stack top differs from the one at the last save
    pub fn is_changed(&self) -> bool {
        self.saved != self.top_serial()
    }

    pub fn is_changed_for_autosave(&self) -> bool {
        self.autosaved != self.top_serial()
    }

    /// Drops both stacks and both save markers
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.saved = None;
        self.autosaved = None;
        self.events.emit(EditorEvent::UndoRedoChanged);
    }

    fn top_serial(&self) -> Option<u64> {
        self.undo_stack.last().map(|e| e.serial)
    }

    fn push_undo(&mut self, command: Command) {
        let serial = self.next_serial;
        self.next_serial += 1;
        self.undo_stack.push(Entry { serial, command });
    }

    /// Runs one direction of `command` under the document lock. The returned
    /// events are to be sent once the lock is gone.
    fn run(&self, command: &mut Command, direction: Direction) -> (CommandResult, Vec<EditorEvent>) {
        let mut doc = self.document.lock();
        let mut ctx = CommandContext::new(&mut *doc);
        let result = match direction {
            Direction::Undo => command.undo(&mut ctx),
            Direction::Redo => command.redo(&mut ctx),
        };
        let mut events = ctx.into_events();
        for event in Self::page_events(&doc, command) {
            if !events.contains(&event) {
                events.push(event);
            }
        }
        (result, events)
    }

    /// Repaint requests for the command's pages that are still in the document
    fn page_events(doc: &Document, command: &Command) -> Vec<EditorEvent> {
        command
            .affected_pages()
            .into_iter()
            .filter_map(|id| doc.index_of(id))
            .map(EditorEvent::PageChanged)
            .collect()
    }

    fn report_failure(&self, direction: Direction, label: &str, err: &CommandError) {
        log::error!("Could not {} \"{label}\": {err}", direction.verb());
        self.events.emit(EditorEvent::CommandFailed {
            message: format!(
                "Could not {} \"{label}\"\nSomething went wrong: {err}\nPlease write a bug report.",
                direction.verb()
            ),
        });
    }

    fn finish(&self, events: Vec<EditorEvent>) {
        self.events.emit_all(events);
        self.events.emit(EditorEvent::UndoRedoChanged);
        if self.trace {
            self.trace_stacks();
        }
    }

    fn trace_stacks(&self) {
        log::trace!("undo stack ({}):", self.undo_stack.len());
        for entry in self.undo_stack.iter().rev() {
            log::trace!("  #{} {}", entry.serial, entry.command.describe());
        }
        log::trace!("redo stack ({}):", self.redo_stack.len());
        for entry in self.redo_stack.iter().rev() {
            log::trace!("  #{} {}", entry.serial, entry.command.describe());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::RenameLayer;
    use crate::page::Page;

    fn handler() -> (UndoRedoHandler, crate::id::PageId) {
        let mut doc = Document::new();
        let page = Page::with_layer(100.0, 100.0);
        let page_id = page.id();
        doc.add_page(page);
        (UndoRedoHandler::new(SharedDocument::new(doc), EventBus::new()), page_id)
    }

    fn rename(page: crate::id::PageId, name: &str) -> RenameLayer {
        RenameLayer::new(page, None, Some(name.to_owned()))
    }

    #[test]
    fn test_save_marker_follows_stack_top() {
        let (mut handler, page) = handler();
        assert!(!handler.is_changed());

        handler.apply(rename(page, "a")).unwrap();
        assert!(handler.is_changed());
        handler.document_saved();
        assert!(!handler.is_changed());

        handler.apply(rename(page, "b")).unwrap();
        assert!(handler.is_changed());
        handler.undo().unwrap();
        assert!(!handler.is_changed());
        handler.undo().unwrap();
        assert!(handler.is_changed());
    }

    #[test]
    fn test_save_on_empty_stack() {
        let (mut handler, page) = handler();
        handler.document_saved();
        handler.apply(rename(page, "a")).unwrap();
        assert!(handler.is_changed());
        handler.undo().unwrap();
        assert!(!handler.is_changed());
        assert!(!handler.is_changed_for_autosave());
    }

    #[test]
    fn test_descriptions() {
        let (mut handler, page) = handler();
        assert_eq!(handler.undo_description(), "Undo");
        assert_eq!(handler.redo_description(), "Redo");

        handler.apply(rename(page, "a")).unwrap();
        assert_eq!(handler.undo_description(), "Undo: Rename layer");
        handler.undo().unwrap();
        assert_eq!(handler.redo_description(), "Redo: Rename layer");
    }

    #[test]
    fn test_empty_stacks_are_silent() {
        let (mut handler, _) = handler();
        let rx = handler.events().subscribe();
        assert!(handler.undo().is_ok());
        assert!(handler.redo().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
