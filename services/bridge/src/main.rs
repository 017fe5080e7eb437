use std::time::Duration;

use sea_orm::Database;
use tracing::info;

use syncline_bridge::config::BridgeConfig;
use syncline_bridge::infra::jira::JiraClient;
use syncline_bridge::infra::ws::WsEventBroadcaster;
use syncline_bridge::router::build_router;
use syncline_bridge::state::AppState;
use syncline_bridge::sync::run_sync_loop;
use syncline_bridge::usecase::sync::ProcessSyncEventUseCase;

/// Fan-out buffer per subscriber before lagging clients start dropping.
const EVENT_BUFFER: usize = 256;

#[tokio::main]
async fn main() {
    syncline_core::tracing::init_tracing();

    let config = BridgeConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let jira = JiraClient::new(
        &config.jira_base_url,
        &config.jira_email,
        &config.jira_api_token,
        &config.jira_project_key,
    )
    .expect("failed to build tracker client");

    let state = AppState {
        db,
        jira,
        events: WsEventBroadcaster::new(EVENT_BUFFER),
        webhook_secret: config.jira_webhook_secret,
    };

    // Outbox sync loop runs on its own task, off the request path.
    let sync_state = state.clone();
    let period = Duration::from_secs(config.sync_interval_secs);
    tokio::spawn(async move {
        let usecase = ProcessSyncEventUseCase {
            issues: sync_state.issue_repo(),
            outbox: sync_state.outbox_repo(),
            tracker: sync_state.jira.clone(),
        };
        run_sync_loop(usecase, period).await;
    });

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.bridge_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("bridge service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
