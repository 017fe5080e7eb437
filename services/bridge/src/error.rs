use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use syncline_core::error::ErrorBody;

/// Bridge service error variants.
#[derive(Debug, thiserror::Error)]
pub enum BridgeServiceError {
    #[error("task not found")]
    TaskNotFound,
    #[error("issue not found")]
    IssueNotFound,
    #[error("Validation failed")]
    Validation(HashMap<String, String>),
    #[error("issue tracker request failed")]
    Tracker(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl BridgeServiceError {
    /// Convenience constructor for a single-field validation failure.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        let mut errors = HashMap::new();
        errors.insert(field.to_owned(), message.into());
        Self::Validation(errors)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::IssueNotFound => "ISSUE_NOT_FOUND",
            Self::Validation(_) => "VALIDATION",
            Self::Tracker(_) => "TRACKER_ERROR",
            Self::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::TaskNotFound | Self::IssueNotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Tracker(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn category(&self) -> &'static str {
        match self {
            Self::TaskNotFound => "Task Not Found",
            Self::IssueNotFound => "Issue Not Found",
            Self::Validation(_) => "Validation Failed",
            Self::Tracker(_) => "Tracker Error",
            Self::Internal(_) => "Internal Server Error",
        }
    }
}

impl IntoResponse for BridgeServiceError {
    fn into_response(self) -> Response {
        // Log 5xx only — tower-http TraceLayer already records method/uri/status
        // for all requests. The source chain is logged here so the root cause
        // stays traceable; the response body never carries it.
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = %e, kind = "INTERNAL", "internal error");
            }
            Self::Tracker(e) => {
                tracing::error!(error = %e, kind = "TRACKER_ERROR", "tracker request failed");
            }
            _ => {}
        }
        let field_errors = match &self {
            Self::Validation(errors) => Some(errors.clone()),
            _ => None,
        };
        ErrorBody {
            message: self.to_string(),
            error: self.category(),
            status: self.status(),
            field_errors,
        }
        .into_response()
    }
}
