use chrono::{DateTime, Utc};

use syncline_domain::event::DomainEvent;
use syncline_domain::id::IssueId;
use syncline_domain::priority::Priority;
use syncline_domain::status::{SyncState, WorkStatus};

use crate::domain::repository::{
    EventPublisher, IssueRepository, RemoteIssueChanges, TrackerPort,
};
use crate::domain::types::{self, FieldViolations, Issue, OutboxEvent};
use crate::error::BridgeServiceError;
use crate::usecase::validate_new_fields;

// ── CreateIssue ──────────────────────────────────────────────────────────────

pub struct CreateIssueInput {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<WorkStatus>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<String>,
}

/// Issues never call the tracker inline; the outbox loop owns delivery, so
/// creation cannot fail on a tracker outage.
pub struct CreateIssueUseCase<R, P>
where
    R: IssueRepository,
    P: EventPublisher,
{
    pub issues: R,
    pub events: P,
}

impl<R, P> CreateIssueUseCase<R, P>
where
    R: IssueRepository,
    P: EventPublisher,
{
    pub async fn execute(&self, input: CreateIssueInput) -> Result<Issue, BridgeServiceError> {
        let (title, description, priority) =
            validate_new_fields(&input.title, input.description, input.priority.as_deref())?;

        let now = Utc::now();
        let issue = Issue {
            id: IssueId::generate(),
            title,
            description,
            status: input.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            due_date: input.due_date,
            priority,
            business_key: None,
            sync_state: SyncState::Pending,
        };

        let event = OutboxEvent::issue_created(&issue);
        self.issues.create_with_outbox(&issue, &event).await?;

        self.events.publish(&DomainEvent::IssueCreated(issue.as_change()));
        Ok(issue)
    }
}

// ── GetIssue / ListIssues ────────────────────────────────────────────────────

pub struct GetIssueUseCase<R: IssueRepository> {
    pub issues: R,
}

impl<R: IssueRepository> GetIssueUseCase<R> {
    pub async fn execute(&self, id: IssueId) -> Result<Issue, BridgeServiceError> {
        self.issues
            .find_by_id(id)
            .await?
            .ok_or(BridgeServiceError::IssueNotFound)
    }
}

/// Listing is a pure read with no remote synchronization side effect.
pub struct ListIssuesUseCase<R: IssueRepository> {
    pub issues: R,
}

impl<R: IssueRepository> ListIssuesUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Issue>, BridgeServiceError> {
        self.issues.list_all().await
    }
}

// ── UpdateIssue ──────────────────────────────────────────────────────────────

/// Per-field patch. `None` leaves a field unchanged; `Some(None)` clears a
/// nullable field. The title cannot be cleared.
#[derive(Debug, Default)]
pub struct UpdateIssueInput {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<WorkStatus>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub priority: Option<String>,
}

impl UpdateIssueInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
    }
}

pub struct UpdateIssueUseCase<R, T, P>
where
    R: IssueRepository,
    T: TrackerPort,
    P: EventPublisher,
{
    pub issues: R,
    pub tracker: T,
    pub events: P,
}

impl<R, T, P> UpdateIssueUseCase<R, T, P>
where
    R: IssueRepository,
    T: TrackerPort,
    P: EventPublisher,
{
    pub async fn execute(
        &self,
        id: IssueId,
        input: UpdateIssueInput,
    ) -> Result<Issue, BridgeServiceError> {
        let mut issue = self
            .issues
            .find_by_id(id)
            .await?
            .ok_or(BridgeServiceError::IssueNotFound)?;

        if input.is_empty() {
            return Ok(issue);
        }

        let mut violations = FieldViolations::new();
        let new_title = match &input.title {
            Some(raw) => match types::validate_title(raw) {
                Ok(t) => Some(t),
                Err(m) => {
                    violations.add("title", m);
                    None
                }
            },
            None => None,
        };
        if let Some(Some(ref d)) = input.description {
            if let Err(m) = types::validate_description(d) {
                violations.add("description", m);
            }
        }
        if let Some(ref p) = input.priority {
            if let Err(m) = types::validate_priority_input(p) {
                violations.add("priority", m);
            }
        }
        violations.finish().map_err(BridgeServiceError::Validation)?;

        let mut remote = RemoteIssueChanges::default();
        if let Some(title) = new_title {
            remote.summary = Some(title.clone());
            issue.title = title;
        }
        if let Some(description) = input.description {
            remote.description = Some(description.clone());
            issue.description = description;
        }
        if let Some(status) = input.status {
            issue.status = status;
        }
        if let Some(due_date) = input.due_date {
            remote.due_date = Some(due_date);
            issue.due_date = due_date;
        }
        if let Some(p) = input.priority.as_deref() {
            let priority = Priority::normalize(Some(p));
            remote.priority = Some(priority);
            issue.priority = priority;
        }
        issue.updated_at = Utc::now();

        self.issues.update(&issue).await?;

        // Best-effort remote push; local state is authoritative.
        if let Some(key) = issue.business_key.as_deref() {
            if !remote.is_empty() {
                if let Err(e) = self.tracker.update_issue(key, &remote).await {
                    tracing::warn!(error = %e, key, "failed to update tracker issue");
                }
            }
        }

        self.events.publish(&DomainEvent::IssueUpdated(issue.as_change()));
        Ok(issue)
    }
}

// ── DeleteIssue ──────────────────────────────────────────────────────────────

pub struct DeleteIssueUseCase<R, T, P>
where
    R: IssueRepository,
    T: TrackerPort,
    P: EventPublisher,
{
    pub issues: R,
    pub tracker: T,
    pub events: P,
}

impl<R, T, P> DeleteIssueUseCase<R, T, P>
where
    R: IssueRepository,
    T: TrackerPort,
    P: EventPublisher,
{
    pub async fn execute(&self, id: IssueId) -> Result<(), BridgeServiceError> {
        let issue = self
            .issues
            .find_by_id(id)
            .await?
            .ok_or(BridgeServiceError::IssueNotFound)?;

        if !self.issues.delete(id).await? {
            return Err(BridgeServiceError::IssueNotFound);
        }

        // Best-effort remote cleanup; the local delete already happened.
        if let Some(key) = issue.business_key.as_deref() {
            if let Err(e) = self.tracker.delete_issue(key).await {
                tracing::warn!(error = %e, key, "failed to delete tracker issue");
            }
        }

        self.events.publish(&DomainEvent::IssueDeleted(issue.id.0));
        Ok(())
    }
}
