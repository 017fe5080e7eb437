pub mod issue;
pub mod sync;
pub mod task;
pub mod webhook;

use syncline_domain::priority::Priority;

use crate::domain::types::{self, FieldViolations};
use crate::error::BridgeServiceError;

/// Validation shared by the task and issue create paths. Collects every
/// violation before failing so the caller sees the full field→message map.
pub(crate) fn validate_new_fields(
    raw_title: &str,
    description: Option<String>,
    raw_priority: Option<&str>,
) -> Result<(String, Option<String>, Priority), BridgeServiceError> {
    let mut violations = FieldViolations::new();

    let title = match types::validate_title(raw_title) {
        Ok(t) => t,
        Err(m) => {
            violations.add("title", m);
            String::new()
        }
    };
    if let Some(ref d) = description {
        if let Err(m) = types::validate_description(d) {
            violations.add("description", m);
        }
    }
    if let Some(p) = raw_priority {
        if let Err(m) = types::validate_priority_input(p) {
            violations.add("priority", m);
        }
    }

    violations.finish().map_err(BridgeServiceError::Validation)?;
    Ok((title, description, Priority::normalize(raw_priority)))
}
