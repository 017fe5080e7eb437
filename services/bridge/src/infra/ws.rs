use serde_json::{Value, json};
use tokio::sync::broadcast;

use syncline_core::serde::format_rfc3339_ms;
use syncline_domain::event::{DomainEvent, EntityChange};

use crate::domain::repository::EventPublisher;

/// Fan-out over a broadcast channel. Lossy by design: no subscriber, no
/// delivery; lagging subscribers drop the oldest messages. Messages from the
/// single publishing side arrive in publish order.
#[derive(Clone)]
pub struct WsEventBroadcaster {
    tx: broadcast::Sender<String>,
}

impl WsEventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    fn send(&self, topic: &str, message: &Value) {
        // An Err only means nobody is subscribed right now.
        if self.tx.send(message.to_string()).is_err() {
            tracing::debug!(topic, "no fan-out subscribers connected");
        }
    }
}

impl EventPublisher for WsEventBroadcaster {
    fn publish(&self, event: &DomainEvent) {
        self.send(event.topic(), &event_message(event));
    }

    fn publish_envelope(&self, topic: &str, envelope: &Value) {
        self.send(topic, envelope);
    }
}

/// Wire shape consumed by the frontend: created/updated events carry the
/// snapshot under `task`, deleted events carry the bare `id`.
pub fn event_message(event: &DomainEvent) -> Value {
    match event {
        DomainEvent::TaskCreated(change)
        | DomainEvent::TaskUpdated(change)
        | DomainEvent::IssueCreated(change)
        | DomainEvent::IssueUpdated(change) => json!({
            "type": event.kind(),
            "task": entity_json(change),
        }),
        DomainEvent::TaskDeleted(id) | DomainEvent::IssueDeleted(id) => json!({
            "type": event.kind(),
            "id": id.to_string(),
        }),
    }
}

fn entity_json(change: &EntityChange) -> Value {
    json!({
        "id": change.id.to_string(),
        "title": change.title,
        "description": change.description,
        "status": change.status,
        "createdAt": format_rfc3339_ms(change.created_at),
        "updatedAt": format_rfc3339_ms(change.updated_at),
        "dueDate": change.due_date.map(format_rfc3339_ms),
        "priority": change.priority,
    })
}
