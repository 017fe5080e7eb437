use axum::{Json, extract::Path, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use syncline_core::serde::patch_field;
use syncline_domain::priority::Priority;
use syncline_domain::status::WorkStatus;

use crate::domain::types::Issue;
use crate::error::BridgeServiceError;
use crate::handlers::{parse_due_date, parse_status};
use crate::state::AppState;
use crate::usecase::issue::{
    CreateIssueInput, CreateIssueUseCase, DeleteIssueUseCase, GetIssueUseCase, ListIssuesUseCase,
    UpdateIssueInput, UpdateIssueUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueResponse {
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

impl From<Issue> for IssueResponse {
    fn from(issue: Issue) -> Self {
        Self {
            id: issue.id.to_string(),
            title: issue.title,
            description: issue.description,
            status: issue.status,
            created_at: issue.created_at,
            updated_at: issue.updated_at,
            due_date: issue.due_date,
            priority: issue.priority,
        }
    }
}

// ── POST /api/issues ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Value,
    pub priority: Option<String>,
}

pub async fn create_issue(
    State(state): State<AppState>,
    Json(body): Json<CreateIssueRequest>,
) -> Result<(StatusCode, Json<IssueResponse>), BridgeServiceError> {
    let due_date = parse_due_date(&body.due_date)?;
    let status = body.status.as_deref().map(parse_status).transpose()?;
    let usecase = CreateIssueUseCase {
        issues: state.issue_repo(),
        events: state.events.clone(),
    };
    let issue = usecase
        .execute(CreateIssueInput {
            title: body.title.unwrap_or_default(),
            description: body.description,
            status,
            due_date,
            priority: body.priority,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(issue.into())))
}

// ── GET /api/issues/{id} ─────────────────────────────────────────────────────

pub async fn get_issue(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IssueResponse>, BridgeServiceError> {
    let usecase = GetIssueUseCase {
        issues: state.issue_repo(),
    };
    let issue = usecase.execute(id.into()).await?;
    Ok(Json(issue.into()))
}

// ── GET /api/issues ──────────────────────────────────────────────────────────

pub async fn list_issues(
    State(state): State<AppState>,
) -> Result<Json<Vec<IssueResponse>>, BridgeServiceError> {
    let usecase = ListIssuesUseCase {
        issues: state.issue_repo(),
    };
    let issues = usecase.execute().await?;
    Ok(Json(issues.into_iter().map(IssueResponse::from).collect()))
}

// ── PATCH /api/issues/{id} ───────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssueRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub due_date: Option<Option<Value>>,
    pub priority: Option<String>,
}

pub async fn update_issue(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateIssueRequest>,
) -> Result<Json<IssueResponse>, BridgeServiceError> {
    let due_date = match body.due_date {
        None => None,
        Some(None) => Some(None),
        Some(Some(ref value)) => Some(parse_due_date(value)?),
    };
    let status = body.status.as_deref().map(parse_status).transpose()?;
    let usecase = UpdateIssueUseCase {
        issues: state.issue_repo(),
        tracker: state.jira.clone(),
        events: state.events.clone(),
    };
    let issue = usecase
        .execute(
            id.into(),
            UpdateIssueInput {
                title: body.title,
                description: body.description,
                status,
                due_date,
                priority: body.priority,
            },
        )
        .await?;
    Ok(Json(issue.into()))
}

// ── DELETE /api/issues/{id} ──────────────────────────────────────────────────

pub async fn delete_issue(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, BridgeServiceError> {
    let usecase = DeleteIssueUseCase {
        issues: state.issue_repo(),
        tracker: state.jira.clone(),
        events: state.events.clone(),
    };
    usecase.execute(id.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}
