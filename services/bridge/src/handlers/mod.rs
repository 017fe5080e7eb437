pub mod events;
pub mod issue;
pub mod task;
pub mod webhook;

use chrono::{DateTime, Utc};
use serde_json::Value;

use syncline_core::serde::parse_flexible_instant;
use syncline_domain::status::WorkStatus;

use crate::error::BridgeServiceError;

/// Parse a request due date, mapping format errors to a field validation
/// failure.
pub(crate) fn parse_due_date(value: &Value) -> Result<Option<DateTime<Utc>>, BridgeServiceError> {
    parse_flexible_instant(value)
        .map_err(|e| BridgeServiceError::validation("dueDate", e.to_string()))
}

pub(crate) fn parse_status(raw: &str) -> Result<WorkStatus, BridgeServiceError> {
    WorkStatus::parse(&raw.trim().to_ascii_uppercase()).ok_or_else(|| {
        BridgeServiceError::validation("status", "Status must be one of PENDING, IN_PROGRESS, DONE")
    })
}
