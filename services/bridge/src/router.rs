use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use syncline_core::error::error_context;
use syncline_core::health::{healthz, readyz};
use syncline_core::middleware::request_id_layer;

use crate::handlers::{
    events::events_ws,
    issue::{create_issue, delete_issue, get_issue, list_issues, update_issue},
    task::{create_task, delete_task, get_task, list_tasks, update_task},
    webhook::receive_webhook,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Tasks
        .route("/api/tasks", post(create_task))
        .route("/api/tasks", get(list_tasks))
        .route("/api/tasks/{id}", get(get_task))
        .route("/api/tasks/{id}", patch(update_task))
        .route("/api/tasks/{id}", delete(delete_task))
        // Issues
        .route("/api/issues", post(create_issue))
        .route("/api/issues", get(list_issues))
        .route("/api/issues/{id}", get(get_issue))
        .route("/api/issues/{id}", patch(update_issue))
        .route("/api/issues/{id}", delete(delete_issue))
        // Tracker webhooks
        .route("/jira/webhooks", post(receive_webhook))
        // Notification fan-out
        .route("/ws/events", get(events_ws))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(error_context)),
        )
        .with_state(state)
}
