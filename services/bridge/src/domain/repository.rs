#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use syncline_domain::event::DomainEvent;
use syncline_domain::id::{EventId, IssueId, TaskId};
use syncline_domain::priority::Priority;

use crate::domain::types::{Issue, OutboxEvent, Task};
use crate::error::BridgeServiceError;

/// Repository for task aggregates.
pub trait TaskRepository: Send + Sync {
    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, BridgeServiceError>;

    async fn list_all(&self) -> Result<Vec<Task>, BridgeServiceError>;

    async fn create(&self, task: &Task) -> Result<(), BridgeServiceError>;

    async fn update(&self, task: &Task) -> Result<(), BridgeServiceError>;

    /// Delete a task. Returns `true` if deleted, `false` if not found.
    async fn delete(&self, id: TaskId) -> Result<bool, BridgeServiceError>;
}

/// Repository for issue aggregates.
pub trait IssueRepository: Send + Sync {
    async fn find_by_id(&self, id: IssueId) -> Result<Option<Issue>, BridgeServiceError>;

    async fn list_all(&self) -> Result<Vec<Issue>, BridgeServiceError>;

    /// Insert a new issue and its outbox event atomically (same transaction).
    async fn create_with_outbox(
        &self,
        issue: &Issue,
        event: &OutboxEvent,
    ) -> Result<(), BridgeServiceError>;

    async fn update(&self, issue: &Issue) -> Result<(), BridgeServiceError>;

    /// Delete an issue. Returns `true` if deleted, `false` if not found.
    async fn delete(&self, id: IssueId) -> Result<bool, BridgeServiceError>;
}

/// Repository for outbox events.
pub trait OutboxRepository: Send + Sync {
    /// Pending events, oldest first. The query filters on status; DONE and
    /// FAILED rows are never loaded.
    async fn find_pending(&self) -> Result<Vec<OutboxEvent>, BridgeServiceError>;

    /// Record a successful remote creation: persists the issue's business
    /// key and sync state and flips the event to DONE with a processed_at
    /// timestamp, in one transaction.
    async fn complete(&self, event_id: EventId, issue: &Issue) -> Result<(), BridgeServiceError>;

    /// Record a failed attempt. The event stays PENDING for the next scan.
    async fn record_failure(
        &self,
        event_id: EventId,
        attempts: i32,
        error: &str,
    ) -> Result<(), BridgeServiceError>;

    /// Terminal failure: marks the event FAILED and, when the issue still
    /// exists, persists its FAILED sync state in the same transaction.
    async fn abandon(
        &self,
        event_id: EventId,
        attempts: i32,
        error: &str,
        issue: Option<&Issue>,
    ) -> Result<(), BridgeServiceError>;
}

/// Fields sent to the tracker when creating a remote issue.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRemoteIssue<'a> {
    pub summary: &'a str,
    pub description: Option<&'a str>,
    pub issue_type: &'a str,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
}

/// Field map pushed to the tracker on update. `Some(None)` clears a field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteIssueChanges {
    pub summary: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub priority: Option<Priority>,
}

impl RemoteIssueChanges {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
    }
}

/// Outbound port to the remote issue tracker. All operations may fail with a
/// transport-level error; callers decide whether to propagate or swallow.
pub trait TrackerPort: Send + Sync {
    /// Create a remote issue; returns the tracker's issue key.
    /// Fails locally when the summary is empty.
    async fn create_issue(&self, issue: NewRemoteIssue<'_>) -> Result<String, anyhow::Error>;

    async fn update_issue(
        &self,
        key: &str,
        changes: &RemoteIssueChanges,
    ) -> Result<(), anyhow::Error>;

    async fn delete_issue(&self, key: &str) -> Result<(), anyhow::Error>;
}

/// Port to the notification fan-out. Publishing is best-effort and must not
/// fail the caller when no subscriber is connected.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: &DomainEvent);

    /// Publish a pre-built envelope (webhook forwarding) on a topic.
    fn publish_envelope(&self, topic: &str, envelope: &serde_json::Value);
}
