use chrono::{DateTime, Utc};

use syncline_domain::event::DomainEvent;
use syncline_domain::id::TaskId;
use syncline_domain::priority::Priority;
use syncline_domain::status::WorkStatus;

use crate::domain::repository::{
    EventPublisher, NewRemoteIssue, RemoteIssueChanges, TaskRepository, TrackerPort,
};
use crate::domain::types::{self, FieldViolations, REMOTE_ISSUE_TYPE, Task};
use crate::error::BridgeServiceError;
use crate::usecase::validate_new_fields;

// ── CreateTask ───────────────────────────────────────────────────────────────

pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<WorkStatus>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<String>,
}

pub struct CreateTaskUseCase<R, T, P>
where
    R: TaskRepository,
    T: TrackerPort,
    P: EventPublisher,
{
    pub tasks: R,
    pub tracker: T,
    pub events: P,
}

impl<R, T, P> CreateTaskUseCase<R, T, P>
where
    R: TaskRepository,
    T: TrackerPort,
    P: EventPublisher,
{
    pub async fn execute(&self, input: CreateTaskInput) -> Result<Task, BridgeServiceError> {
        let (title, description, priority) =
            validate_new_fields(&input.title, input.description, input.priority.as_deref())?;

        let now = Utc::now();
        let mut task = Task {
            id: TaskId::generate(),
            title,
            description,
            status: input.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            due_date: input.due_date,
            priority,
            business_key: None,
        };

        self.tasks.create(&task).await?;
        self.events.publish(&DomainEvent::TaskCreated(task.as_change()));

        // Tasks call the tracker inline: the caller learns immediately when
        // tracking failed. The task stays persisted without a business key.
        let key = self
            .tracker
            .create_issue(NewRemoteIssue {
                summary: &task.title,
                description: task.description.as_deref(),
                issue_type: REMOTE_ISSUE_TYPE,
                due_date: task.due_date,
                priority: task.priority,
            })
            .await
            .map_err(BridgeServiceError::Tracker)?;

        task.business_key = Some(key);
        task.updated_at = Utc::now();
        self.tasks.update(&task).await?;
        Ok(task)
    }
}

// ── GetTask / ListTasks ──────────────────────────────────────────────────────

pub struct GetTaskUseCase<R: TaskRepository> {
    pub tasks: R,
}

impl<R: TaskRepository> GetTaskUseCase<R> {
    pub async fn execute(&self, id: TaskId) -> Result<Task, BridgeServiceError> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or(BridgeServiceError::TaskNotFound)
    }
}

pub struct ListTasksUseCase<R: TaskRepository> {
    pub tasks: R,
}

impl<R: TaskRepository> ListTasksUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Task>, BridgeServiceError> {
        self.tasks.list_all().await
    }
}

// ── UpdateTask ───────────────────────────────────────────────────────────────

/// Per-field patch. `None` leaves a field unchanged; `Some(None)` clears a
/// nullable field. The title cannot be cleared.
#[derive(Debug, Default)]
pub struct UpdateTaskInput {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<WorkStatus>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub priority: Option<String>,
}

impl UpdateTaskInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
    }
}

pub struct UpdateTaskUseCase<R, T, P>
where
    R: TaskRepository,
    T: TrackerPort,
    P: EventPublisher,
{
    pub tasks: R,
    pub tracker: T,
    pub events: P,
}

impl<R, T, P> UpdateTaskUseCase<R, T, P>
where
    R: TaskRepository,
    T: TrackerPort,
    P: EventPublisher,
{
    pub async fn execute(
        &self,
        id: TaskId,
        input: UpdateTaskInput,
    ) -> Result<Task, BridgeServiceError> {
        let mut task = self
            .tasks
            .find_by_id(id)
            .await?
            .ok_or(BridgeServiceError::TaskNotFound)?;

        if input.is_empty() {
            return Ok(task);
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
            task.title = title;
        }
        if let Some(description) = input.description {
            remote.description = Some(description.clone());
            task.description = description;
        }
        if let Some(status) = input.status {
            task.status = status;
        }
        if let Some(due_date) = input.due_date {
            remote.due_date = Some(due_date);
            task.due_date = due_date;
        }
        if let Some(p) = input.priority.as_deref() {
            let priority = Priority::normalize(Some(p));
            remote.priority = Some(priority);
            task.priority = priority;
        }
        task.updated_at = Utc::now();

        self.tasks.update(&task).await?;

        // Best-effort remote push; local state is authoritative.
        if let Some(key) = task.business_key.as_deref() {
            if !remote.is_empty() {
                if let Err(e) = self.tracker.update_issue(key, &remote).await {
                    tracing::warn!(error = %e, key, "failed to update tracker issue");
                }
            }
        }

        self.events.publish(&DomainEvent::TaskUpdated(task.as_change()));
        Ok(task)
    }
}

// ── DeleteTask ───────────────────────────────────────────────────────────────

pub struct DeleteTaskUseCase<R, T, P>
where
    R: TaskRepository,
    T: TrackerPort,
    P: EventPublisher,
{
    pub tasks: R,
    pub tracker: T,
    pub events: P,
}

impl<R, T, P> DeleteTaskUseCase<R, T, P>
where
    R: TaskRepository,
    T: TrackerPort,
    P: EventPublisher,
{
    pub async fn execute(&self, id: TaskId) -> Result<(), BridgeServiceError> {
        let task = self
            .tasks
            .find_by_id(id)
            .await?
            .ok_or(BridgeServiceError::TaskNotFound)?;

        if !self.tasks.delete(id).await? {
            return Err(BridgeServiceError::TaskNotFound);
        }

        // Best-effort remote cleanup; the local delete already happened.
        if let Some(key) = task.business_key.as_deref() {
            if let Err(e) = self.tracker.delete_issue(key).await {
                tracing::warn!(error = %e, key, "failed to delete tracker issue");
            }
        }

        self.events.publish(&DomainEvent::TaskDeleted(task.id.0));
        Ok(())
    }
}
