use sea_orm::DatabaseConnection;

use crate::infra::db::{DbIssueRepository, DbOutboxRepository, DbTaskRepository};
use crate::infra::jira::JiraClient;
use crate::infra::ws::WsEventBroadcaster;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jira: JiraClient,
    pub events: WsEventBroadcaster,
    pub webhook_secret: Option<String>,
}

impl AppState {
    pub fn task_repo(&self) -> DbTaskRepository {
        DbTaskRepository {
            db: self.db.clone(),
        }
    }

    pub fn issue_repo(&self) -> DbIssueRepository {
        DbIssueRepository {
            db: self.db.clone(),
        }
    }

    pub fn outbox_repo(&self) -> DbOutboxRepository {
        DbOutboxRepository {
            db: self.db.clone(),
        }
    }
}
