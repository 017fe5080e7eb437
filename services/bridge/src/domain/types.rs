use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::json;

use syncline_domain::event::EntityChange;
use syncline_domain::id::{EventId, IssueId, TaskId};
use syncline_domain::priority::Priority;
use syncline_domain::status::{SyncState, WorkStatus};

/// Maximum title length in characters.
pub const TITLE_MAX_LEN: usize = 255;

/// Maximum description length in characters.
pub const DESCRIPTION_MAX_LEN: usize = 5000;

/// Maximum raw priority input length in characters.
pub const PRIORITY_MAX_LEN: usize = 20;

/// Failed attempts after which a sync event is abandoned.
pub const SYNC_MAX_ATTEMPTS: i32 = 10;

/// Issue-type label used for remote issues created by this service.
pub const REMOTE_ISSUE_TYPE: &str = "Task";

/// Task aggregate. `business_key` holds the remote tracker's issue key once
/// the tracker has accepted the task.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub status: WorkStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub business_key: Option<String>,
}

impl Task {
    pub fn as_change(&self) -> EntityChange {
        EntityChange {
            id: self.id.0,
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            due_date: self.due_date,
            priority: self.priority,
        }
    }
}

/// Issue aggregate. Same shape as a task, plus the outbox sync lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub id: IssueId,
    pub title: String,
    pub description: Option<String>,
    pub status: WorkStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub business_key: Option<String>,
    pub sync_state: SyncState,
}

impl Issue {
    pub fn as_change(&self) -> EntityChange {
        EntityChange {
            id: self.id.0,
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            due_date: self.due_date,
            priority: self.priority,
        }
    }
}

/// Outbox event awaiting delivery to the remote tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboxEvent {
    pub id: EventId,
    pub kind: String,
    pub issue_id: IssueId,
    /// Snapshot of the fields at enqueue time, kept as an audit record; the sync
    /// loop reads the live aggregate when it processes the event.
    pub payload: serde_json::Value,
    pub status: SyncState,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub idempotency_key: String,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl OutboxEvent {
    /// Event enqueued in the same transaction as issue creation. The
    /// idempotency key is unique per issue, so re-creating the same issue id
    /// cannot enqueue twice.
    pub fn issue_created(issue: &Issue) -> Self {
        Self {
            id: EventId::generate(),
            kind: "IssueCreated".to_owned(),
            issue_id: issue.id,
            payload: json!({
                "title": issue.title,
                "description": issue.description,
                "priority": issue.priority.as_str(),
            }),
            status: SyncState::Pending,
            attempts: 0,
            last_error: None,
            idempotency_key: format!("issue_created:{}", issue.id),
            created_at: issue.created_at,
            processed_at: None,
        }
    }
}

/// Title, description and priority validation shared by the create and
/// update paths. Collects every violation into a field→message map.
pub struct FieldViolations(HashMap<String, String>);

impl FieldViolations {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_owned(), message.into());
    }

    /// `Ok(())` when no violation was recorded, otherwise the collected map.
    pub fn finish(self) -> Result<(), HashMap<String, String>> {
        if self.0.is_empty() { Ok(()) } else { Err(self.0) }
    }
}

impl Default for FieldViolations {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim and validate a title. Titles are always stored trimmed.
pub fn validate_title(raw: &str) -> Result<String, &'static str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Title is required");
    }
    if trimmed.chars().count() > TITLE_MAX_LEN {
        return Err("Title must not exceed 255 characters");
    }
    Ok(trimmed.to_owned())
}

pub fn validate_description(raw: &str) -> Result<(), &'static str> {
    if raw.chars().count() > DESCRIPTION_MAX_LEN {
        return Err("Description must not exceed 5000 characters");
    }
    Ok(())
}

pub fn validate_priority_input(raw: &str) -> Result<(), &'static str> {
    if raw.chars().count() > PRIORITY_MAX_LEN {
        return Err("Priority must not exceed 20 characters");
    }
    Ok(())
}
