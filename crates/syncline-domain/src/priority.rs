//! Task/issue priority.

use serde::{Deserialize, Serialize};

/// Priority of a task or issue.
///
/// Wire format: `"HIGH"` / `"MEDIUM"` / `"LOW"`. Unknown inputs are not an
/// error; they normalize to [`Priority::Medium`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Priority {
    /// Normalize a raw textual priority. Case-insensitive; `None`, empty and
    /// unrecognized values all fall back to `Medium`.
    pub fn normalize(input: Option<&str>) -> Self {
        match input.map(|s| s.trim().to_ascii_uppercase()).as_deref() {
            Some("HIGH") => Self::High,
            Some("LOW") => Self::Low,
            _ => Self::Medium,
        }
    }

    /// Stored/wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}
