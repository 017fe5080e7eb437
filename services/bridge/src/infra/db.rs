use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use syncline_bridge_schema::{issues, outbox_events, tasks};
use syncline_domain::id::{EventId, IssueId, TaskId};
use syncline_domain::priority::Priority;
use syncline_domain::status::{SyncState, WorkStatus};

use crate::domain::repository::{IssueRepository, OutboxRepository, TaskRepository};
use crate::domain::types::{Issue, OutboxEvent, Task};
use crate::error::BridgeServiceError;

// ── Task repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTaskRepository {
    pub db: DatabaseConnection,
}

impl TaskRepository for DbTaskRepository {
    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, BridgeServiceError> {
        let model = tasks::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find task by id")?;
        Ok(model.map(task_from_model))
    }

    async fn list_all(&self) -> Result<Vec<Task>, BridgeServiceError> {
        let models = tasks::Entity::find()
            .order_by_asc(tasks::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list tasks")?;
        Ok(models.into_iter().map(task_from_model).collect())
    }

    async fn create(&self, task: &Task) -> Result<(), BridgeServiceError> {
        task_active_model(task)
            .insert(&self.db)
            .await
            .context("create task")?;
        Ok(())
    }

    async fn update(&self, task: &Task) -> Result<(), BridgeServiceError> {
        task_active_model(task)
            .update(&self.db)
            .await
            .context("update task")?;
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<bool, BridgeServiceError> {
        let result = tasks::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete task")?;
        Ok(result.rows_affected > 0)
    }
}

fn task_active_model(task: &Task) -> tasks::ActiveModel {
    tasks::ActiveModel {
        id: Set(task.id.0),
        title: Set(task.title.clone()),
        description: Set(task.description.clone()),
        status: Set(task.status.as_str().to_owned()),
        created_at: Set(task.created_at),
        updated_at: Set(task.updated_at),
        due_date: Set(task.due_date),
        priority: Set(task.priority.as_str().to_owned()),
        business_key: Set(task.business_key.clone()),
    }
}

fn task_from_model(model: tasks::Model) -> Task {
    Task {
        id: TaskId(model.id),
        title: model.title,
        description: model.description,
        status: WorkStatus::parse(&model.status).unwrap_or_default(),
        created_at: model.created_at,
        updated_at: model.updated_at,
        due_date: model.due_date,
        priority: Priority::normalize(Some(&model.priority)),
        business_key: model.business_key,
    }
}

// ── Issue repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIssueRepository {
    pub db: DatabaseConnection,
}

impl IssueRepository for DbIssueRepository {
    async fn find_by_id(&self, id: IssueId) -> Result<Option<Issue>, BridgeServiceError> {
        let model = issues::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find issue by id")?;
        Ok(model.map(issue_from_model))
    }

    async fn list_all(&self) -> Result<Vec<Issue>, BridgeServiceError> {
        let models = issues::Entity::find()
            .order_by_asc(issues::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list issues")?;
        Ok(models.into_iter().map(issue_from_model).collect())
    }

    async fn create_with_outbox(
        &self,
        issue: &Issue,
        event: &OutboxEvent,
    ) -> Result<(), BridgeServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let issue = issue.clone();
                let event = event.clone();
                Box::pin(async move {
                    issue_active_model(&issue).insert(txn).await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("create issue with outbox")?;
        Ok(())
    }

    async fn update(&self, issue: &Issue) -> Result<(), BridgeServiceError> {
        issue_active_model(issue)
            .update(&self.db)
            .await
            .context("update issue")?;
        Ok(())
    }

    async fn delete(&self, id: IssueId) -> Result<bool, BridgeServiceError> {
        let result = issues::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete issue")?;
        Ok(result.rows_affected > 0)
    }
}

fn issue_active_model(issue: &Issue) -> issues::ActiveModel {
    issues::ActiveModel {
        id: Set(issue.id.0),
        title: Set(issue.title.clone()),
        description: Set(issue.description.clone()),
        status: Set(issue.status.as_str().to_owned()),
        created_at: Set(issue.created_at),
        updated_at: Set(issue.updated_at),
        due_date: Set(issue.due_date),
        priority: Set(issue.priority.as_str().to_owned()),
        business_key: Set(issue.business_key.clone()),
        sync_status: Set(issue.sync_state.as_str().to_owned()),
    }
}

fn issue_from_model(model: issues::Model) -> Issue {
    Issue {
        id: IssueId(model.id),
        title: model.title,
        description: model.description,
        status: WorkStatus::parse(&model.status).unwrap_or_default(),
        created_at: model.created_at,
        updated_at: model.updated_at,
        due_date: model.due_date,
        priority: Priority::normalize(Some(&model.priority)),
        business_key: model.business_key,
        sync_state: SyncState::parse(&model.sync_status).unwrap_or(SyncState::Pending),
    }
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), sea_orm::DbErr> {
    outbox_events::ActiveModel {
        id: Set(event.id.0),
        kind: Set(event.kind.clone()),
        issue_id: Set(event.issue_id.0),
        payload: Set(event.payload.clone()),
        status: Set(event.status.as_str().to_owned()),
        attempts: Set(event.attempts),
        last_error: Set(event.last_error.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        created_at: Set(event.created_at),
        processed_at: Set(event.processed_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

// ── Outbox repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOutboxRepository {
    pub db: DatabaseConnection,
}

impl OutboxRepository for DbOutboxRepository {
    async fn find_pending(&self) -> Result<Vec<OutboxEvent>, BridgeServiceError> {
        let models = outbox_events::Entity::find()
            .filter(outbox_events::Column::Status.eq(SyncState::Pending.as_str()))
            .order_by_asc(outbox_events::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("find pending outbox events")?;
        Ok(models.into_iter().map(event_from_model).collect())
    }

    async fn complete(&self, event_id: EventId, issue: &Issue) -> Result<(), BridgeServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let issue = issue.clone();
                Box::pin(async move {
                    issue_active_model(&issue).update(txn).await?;
                    outbox_events::ActiveModel {
                        id: Set(event_id.0),
                        status: Set(SyncState::Done.as_str().to_owned()),
                        processed_at: Set(Some(Utc::now())),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("complete outbox event")?;
        Ok(())
    }

    async fn record_failure(
        &self,
        event_id: EventId,
        attempts: i32,
        error: &str,
    ) -> Result<(), BridgeServiceError> {
        outbox_events::ActiveModel {
            id: Set(event_id.0),
            attempts: Set(attempts),
            last_error: Set(Some(error.to_owned())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("record outbox failure")?;
        Ok(())
    }

    async fn abandon(
        &self,
        event_id: EventId,
        attempts: i32,
        error: &str,
        issue: Option<&Issue>,
    ) -> Result<(), BridgeServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let issue = issue.cloned();
                let error = error.to_owned();
                Box::pin(async move {
                    outbox_events::ActiveModel {
                        id: Set(event_id.0),
                        status: Set(SyncState::Failed.as_str().to_owned()),
                        attempts: Set(attempts),
                        last_error: Set(Some(error)),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    if let Some(issue) = issue {
                        issue_active_model(&issue).update(txn).await?;
                    }
                    Ok(())
                })
            })
            .await
            .context("abandon outbox event")?;
        Ok(())
    }
}

fn event_from_model(model: outbox_events::Model) -> OutboxEvent {
    OutboxEvent {
        id: EventId(model.id),
        kind: model.kind,
        issue_id: IssueId(model.issue_id),
        payload: model.payload,
        status: SyncState::parse(&model.status).unwrap_or(SyncState::Pending),
        attempts: model.attempts,
        last_error: model.last_error,
        idempotency_key: model.idempotency_key,
        created_at: model.created_at,
        processed_at: model.processed_at,
    }
}
