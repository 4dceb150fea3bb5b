use axum::extract::ws::Message;
use dashmap::DashMap;

use crate::ws::messages::OutgoingMessage;

/// Registry of connected observers.
///
/// Each observer owns a flume sender; broadcast is fire-and-forget per
/// observer so a slow or gone socket never delays the mutation path.
#[derive(Default)]
pub struct Hub {
    observers: DashMap<String, flume::Sender<Message>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&self, id: String, sender: flume::Sender<Message>) {
        self.observers.insert(id, sender);
    }

    pub fn leave(&self, id: &str) {
        self.observers.remove(id);
    }

    pub fn count(&self) -> usize {
        self.observers.len()
    }

    /// Serialize once, deliver to every observer. Send failures mean the
    /// socket task is already gone; its entry is cleaned up on disconnect.
    pub fn broadcast(&self, msg: &OutgoingMessage) {
        let json = match serde_json::to_string(msg) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize broadcast: {}", e);
                return;
            }
        };
        for observer in self.observers.iter() {
            let _ = observer.value().send(Message::Text(json.clone().into()));
        }
    }

    pub fn broadcast_listener_count(&self) {
        self.broadcast(&OutgoingMessage::ListenerCount {
            count: self.count(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_and_leave_track_the_count() {
        let hub = Hub::new();
        let (tx_a, _rx_a) = flume::unbounded();
        let (tx_b, _rx_b) = flume::unbounded();

        hub.join("a".to_string(), tx_a);
        hub.join("b".to_string(), tx_b);
        assert_eq!(hub.count(), 2);

        hub.leave("a");
        assert_eq!(hub.count(), 1);
        hub.leave("a");
        assert_eq!(hub.count(), 1);
    }

    #[test]
    fn broadcast_reaches_every_observer() {
        let hub = Hub::new();
        let (tx_a, rx_a) = flume::unbounded();
        let (tx_b, rx_b) = flume::unbounded();
        hub.join("a".to_string(), tx_a);
        hub.join("b".to_string(), tx_b);

        hub.broadcast(&OutgoingMessage::ListenerCount { count: 2 });

        for rx in [rx_a, rx_b] {
            let msg = rx.try_recv().expect("observer should have a message");
            match msg {
                Message::Text(text) => assert!(text.contains("listenerCount")),
                other => panic!("unexpected message: {:?}", other),
            }
        }
    }

    #[test]
    fn dropped_observer_does_not_block_broadcast() {
        let hub = Hub::new();
        let (tx_dead, rx_dead) = flume::unbounded();
        drop(rx_dead);
        let (tx_live, rx_live) = flume::unbounded();
        hub.join("dead".to_string(), tx_dead);
        hub.join("live".to_string(), tx_live);

        hub.broadcast(&OutgoingMessage::ListenerCount { count: 2 });
        assert!(rx_live.try_recv().is_ok());
    }
}
