use crossbeam::channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::event::EditorEvent;

/// Broadcasts editor events to every subscribed receiver.
///
/// Subscribers drain their [`Receiver`] whenever they like; emitting never
/// blocks. Clones share the same subscriber list.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Sender<EditorEvent>>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &format!("<{} subscribers>", self.subscribers.lock().len()))
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new receiver. Dropping it unsubscribes.
    pub fn subscribe(&self) -> Receiver<EditorEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    pub fn emit(&self, event: EditorEvent) {
        log::trace!("emit {event:?}");
        self.subscribers.lock().retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn emit_all(&self, events: impl IntoIterator<Item = EditorEvent>) {
        for event in events {
            self.emit(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_gets_every_event() {
        let bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.emit(EditorEvent::PageChanged(3));

        assert_eq!(a.try_recv(), Ok(EditorEvent::PageChanged(3)));
        assert_eq!(b.try_recv(), Ok(EditorEvent::PageChanged(3)));
    }

    #[test]
    fn test_dropped_receiver_unsubscribes() {
        let bus = EventBus::new();
        let a = bus.subscribe();
        drop(bus.subscribe());

        bus.emit(EditorEvent::RebuildLayerMenu);
        assert_eq!(bus.subscriber_count(), 1);
        assert!(a.try_recv().is_ok());
    }
}
