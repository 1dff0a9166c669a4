use crate::document::Document;
use crate::event::EditorEvent;

/// What a command sees while it runs: the locked document, plus a buffer for
/// notifications.
///
/// Commands never talk to the [`crate::event::EventBus`] directly. Whatever they
/// want to announce is queued here and sent by the caller once the document
/// lock is gone.
#[derive(Debug)]
pub struct CommandContext<'a> {
    pub document: &'a mut Document,
    events: Vec<EditorEvent>,
}

impl<'a> CommandContext<'a> {
    pub fn new(document: &'a mut Document) -> Self {
        Self {
            document,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: EditorEvent) {
        if !self.events.contains(&event) {
            self.events.push(event);
        }
    }

    pub fn events(&self) -> &[EditorEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<EditorEvent> {
        self.events
    }
}
