//! Boundary error envelope.
//!
//! Service error enums set an [`ErrorBody`] extension on their responses; the
//! [`error_context`] middleware turns it into the JSON envelope clients see,
//! adding the request path and a timestamp that only the middleware knows.

use std::collections::HashMap;

use axum::Json;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use crate::serde::format_rfc3339_ms;

/// Error details carried from the error site to the envelope middleware.
#[derive(Debug, Clone)]
pub struct ErrorBody {
    pub message: String,
    /// Short human category, e.g. `"Task Not Found"`.
    pub error: &'static str,
    pub status: StatusCode,
    /// Field → message map for validation failures.
    pub field_errors: Option<HashMap<String, String>>,
}

impl ErrorBody {
    /// Build the response for this error. The body rendered here lacks the
    /// request path; [`error_context`] replaces it with the full envelope.
    pub fn into_response(self) -> Response {
        let status = self.status;
        let fallback = Json(render(&self, None));
        let mut res = (status, fallback).into_response();
        res.extensions_mut().insert(self);
        res
    }
}

fn render(body: &ErrorBody, path: Option<&str>) -> serde_json::Value {
    let mut json = serde_json::json!({
        "message": body.message,
        "error": body.error,
        "status": body.status.as_u16(),
        "timestamp": format_rfc3339_ms(Utc::now()),
    });
    if let Some(path) = path {
        json["path"] = serde_json::Value::String(path.to_owned());
    }
    if let Some(ref errors) = body.field_errors {
        json["errors"] = serde_json::json!(errors);
    }
    json
}

/// Middleware decorating error responses with the request path.
/// Apply with `axum::middleware::from_fn(error_context)` in the router.
pub async fn error_context(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let mut res = next.run(req).await;
    match res.extensions_mut().remove::<ErrorBody>() {
        Some(body) => {
            let status = body.status;
            (status, Json(render(&body, Some(&path)))).into_response()
        }
        None => res,
    }
}
