//! Domain change events published to the notification fan-out.
//!
//! Dispatch is a closed sum type: every event carries an explicit kind tag
//! and the kind→topic mapping lives in one match, so adapters never inspect
//! runtime types to decide where a message goes.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::priority::Priority;
use crate::status::WorkStatus;

/// Well-known fan-out topics.
pub mod topics {
    /// Single topic all tracker-related notifications are delivered on.
    pub const JIRA_EVENTS: &str = "jira-events";
}

/// Snapshot of an aggregate attached to created/updated events.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityChange {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: WorkStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
}

/// A local change to a task or issue aggregate.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    TaskCreated(EntityChange),
    TaskUpdated(EntityChange),
    TaskDeleted(Uuid),
    IssueCreated(EntityChange),
    IssueUpdated(EntityChange),
    IssueDeleted(Uuid),
}

impl DomainEvent {
    /// Wire tag carried in the notification envelope's `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TaskCreated(_) => "TASK_CREATED",
            Self::TaskUpdated(_) => "TASK_UPDATED",
            Self::TaskDeleted(_) => "TASK_DELETED",
            Self::IssueCreated(_) => "ISSUE_CREATED",
            Self::IssueUpdated(_) => "ISSUE_UPDATED",
            Self::IssueDeleted(_) => "ISSUE_DELETED",
        }
    }

    /// Fan-out topic for this event kind.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::TaskCreated(_)
            | Self::TaskUpdated(_)
            | Self::TaskDeleted(_)
            | Self::IssueCreated(_)
            | Self::IssueUpdated(_)
            | Self::IssueDeleted(_) => topics::JIRA_EVENTS,
        }
    }
}
