use serde_json::{Value, json};

use syncline_domain::event::topics;

use crate::domain::repository::EventPublisher;

/// Delivery metadata taken from the tracker's webhook headers.
#[derive(Debug, Clone)]
pub struct WebhookMeta {
    pub identifier: String,
    pub retry: String,
    pub flow: String,
}

impl Default for WebhookMeta {
    fn default() -> Self {
        Self {
            identifier: "unknown".to_owned(),
            retry: "0".to_owned(),
            flow: "Primary".to_owned(),
        }
    }
}

/// Classify a raw tracker event name into a normalized type tag.
pub fn classify_webhook_event(raw: &str) -> &'static str {
    if raw.contains("issue_created") {
        "JIRA_ISSUE_CREATED"
    } else if raw.contains("issue_updated") {
        "JIRA_ISSUE_UPDATED"
    } else if raw.contains("issue_deleted") {
        "JIRA_ISSUE_DELETED"
    } else {
        "JIRA_WEBHOOK"
    }
}

/// Wraps an inbound tracker webhook and republishes it to the fan-out.
pub struct ProcessWebhookUseCase<P: EventPublisher> {
    pub events: P,
}

impl<P: EventPublisher> ProcessWebhookUseCase<P> {
    pub fn execute(&self, payload: Value, meta: WebhookMeta) {
        let raw_event = payload
            .get("webhookEvent")
            .and_then(Value::as_str)
            .unwrap_or("jira:unknown")
            .to_owned();
        let kind = classify_webhook_event(&raw_event);

        tracing::info!(
            identifier = %meta.identifier,
            retry = %meta.retry,
            flow = %meta.flow,
            kind,
            "processing tracker webhook"
        );

        let envelope = json!({
            "type": kind,
            "source": "jira",
            "meta": {
                "identifier": meta.identifier,
                "retry": meta.retry,
                "flow": meta.flow,
                "event": raw_event,
            },
            // Original payload forwarded for consumers to decide how to react.
            "payload": payload,
        });

        self.events.publish_envelope(topics::JIRA_EVENTS, &envelope);
    }
}
