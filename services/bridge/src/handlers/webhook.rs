use axum::{Json, extract::State, http::HeaderMap, http::StatusCode};
use serde_json::{Value, json};

use crate::state::AppState;
use crate::usecase::webhook::{ProcessWebhookUseCase, WebhookMeta};

// ── POST /jira/webhooks ──────────────────────────────────────────────────────

pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    // Optional shared-secret validation (simple header equality).
    if let Some(ref secret) = state.webhook_secret {
        if header_str(&headers, "x-webhook-secret") != Some(secret.as_str()) {
            tracing::warn!("rejected tracker webhook due to invalid secret");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "status": "unauthorized" })),
            );
        }
    }

    let usecase = ProcessWebhookUseCase {
        events: state.events.clone(),
    };
    usecase.execute(payload, webhook_meta(&headers));
    (StatusCode::OK, Json(json!({ "status": "received" })))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn webhook_meta(headers: &HeaderMap) -> WebhookMeta {
    let defaults = WebhookMeta::default();
    WebhookMeta {
        identifier: header_str(headers, "x-atlassian-webhook-identifier")
            .map(str::to_owned)
            .unwrap_or(defaults.identifier),
        retry: header_str(headers, "x-atlassian-webhook-retry")
            .map(str::to_owned)
            .unwrap_or(defaults.retry),
        flow: header_str(headers, "x-atlassian-webhook-flow")
            .map(str::to_owned)
            .unwrap_or(defaults.flow),
    }
}
