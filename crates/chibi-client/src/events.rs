//! Observable client events.
//!
//! Events are broadcast to any number of subscribers (the binary's logger,
//! a future UI, tests). Sending never blocks and never fails the sender;
//! lagging subscribers lose the oldest events.

use tokio::sync::broadcast;

use crate::status::ConnectionStatus;

/// Events buffered per subscriber before the oldest are dropped.
pub const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Emulator connection status changed
    StatusChanged {
        from: ConnectionStatus,
        to: ConnectionStatus,
    },
    /// Player moved between stages
    AreaChanged {
        from: &'static str,
        to: &'static str,
    },
    /// A received item reached the game
    ItemApplied { name: &'static str, index: usize },
    /// Newly checked locations were reported
    LocationsChecked { names: Vec<&'static str> },
    /// Goal completion was reported
    GoalCompleted,
    /// Rendered chat or server message
    Chat(String),
}

/// Cloneable sending half of the event stream.
#[derive(Debug, Clone)]
pub struct EventSender(broadcast::Sender<ClientEvent>);

impl EventSender {
    pub fn new() -> Self {
        Self(broadcast::channel(EVENT_CAPACITY).0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.0.subscribe()
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn emit(&self, event: ClientEvent) {
        let _ = self.0.send(event);
    }
}

impl Default for EventSender {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_without_subscribers() {
        let events = EventSender::new();
        events.emit(ClientEvent::GoalCompleted);

        let mut rx = events.subscribe();
        events.emit(ClientEvent::Chat("hi".to_string()));
        assert_eq!(rx.recv().await.unwrap(), ClientEvent::Chat("hi".to_string()));
    }
}
