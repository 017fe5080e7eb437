use axum::{Json, extract::Path, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use syncline_core::serde::patch_field;
use syncline_domain::priority::Priority;
use syncline_domain::status::WorkStatus;

use crate::domain::types::Task;
use crate::error::BridgeServiceError;
use crate::handlers::{parse_due_date, parse_status};
use crate::state::AppState;
use crate::usecase::task::{
    CreateTaskInput, CreateTaskUseCase, DeleteTaskUseCase, GetTaskUseCase, ListTasksUseCase,
    UpdateTaskInput, UpdateTaskUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: WorkStatus,
    #[serde(serialize_with = "syncline_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "syncline_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "syncline_core::serde::to_rfc3339_ms_opt")]
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub priority: Priority,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title,
            description: task.description,
            status: task.status,
            created_at: task.created_at,
            updated_at: task.updated_at,
            due_date: task.due_date,
            priority: task.priority,
        }
    }
}

// ── POST /api/tasks ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    /// Accepts several textual formats plus epoch millis; parsed manually.
    #[serde(default)]
    pub due_date: Value,
    pub priority: Option<String>,
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), BridgeServiceError> {
    let due_date = parse_due_date(&body.due_date)?;
    let status = body.status.as_deref().map(parse_status).transpose()?;
    let usecase = CreateTaskUseCase {
        tasks: state.task_repo(),
        tracker: state.jira.clone(),
        events: state.events.clone(),
    };
    let task = usecase
        .execute(CreateTaskInput {
            title: body.title.unwrap_or_default(),
            description: body.description,
            status,
            due_date,
            priority: body.priority,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

// ── GET /api/tasks/{id} ──────────────────────────────────────────────────────

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskResponse>, BridgeServiceError> {
    let usecase = GetTaskUseCase {
        tasks: state.task_repo(),
    };
    let task = usecase.execute(id.into()).await?;
    Ok(Json(task.into()))
}

// ── GET /api/tasks ───────────────────────────────────────────────────────────

pub async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskResponse>>, BridgeServiceError> {
    let usecase = ListTasksUseCase {
        tasks: state.task_repo(),
    };
    let tasks = usecase.execute().await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

// ── PATCH /api/tasks/{id} ────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub due_date: Option<Option<Value>>,
    pub priority: Option<String>,
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, BridgeServiceError> {
    let due_date = match body.due_date {
        None => None,
        Some(None) => Some(None),
        Some(Some(ref value)) => Some(parse_due_date(value)?),
    };
    let status = body.status.as_deref().map(parse_status).transpose()?;
    let usecase = UpdateTaskUseCase {
        tasks: state.task_repo(),
        tracker: state.jira.clone(),
        events: state.events.clone(),
    };
    let task = usecase
        .execute(
            id.into(),
            UpdateTaskInput {
                title: body.title,
                description: body.description,
                status,
                due_date,
                priority: body.priority,
            },
        )
        .await?;
    Ok(Json(task.into()))
}

// ── DELETE /api/tasks/{id} ───────────────────────────────────────────────────

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, BridgeServiceError> {
    let usecase = DeleteTaskUseCase {
        tasks: state.task_repo(),
        tracker: state.jira.clone(),
        events: state.events.clone(),
    };
    usecase.execute(id.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}
