use std::time::Duration;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use syncline_domain::priority::Priority;

use crate::domain::repository::{NewRemoteIssue, RemoteIssueChanges, TrackerPort};

/// Connect timeout for tracker requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Total request timeout. Bounds how long a sync tick or a create use case
/// can block on the tracker.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// HTTP adapter for the remote Jira-compatible tracker.
#[derive(Clone)]
pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    email: String,
    api_token: String,
    project_key: String,
}

impl JiraClient {
    pub fn new(
        base_url: &str,
        email: &str,
        api_token: &str,
        project_key: &str,
    ) -> Result<Self, anyhow::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build tracker HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            email: email.to_owned(),
            api_token: api_token.to_owned(),
            project_key: project_key.to_owned(),
        })
    }
}

impl TrackerPort for JiraClient {
    async fn create_issue(&self, issue: NewRemoteIssue<'_>) -> Result<String, anyhow::Error> {
        if issue.summary.trim().is_empty() {
            anyhow::bail!("issue summary cannot be empty");
        }

        let request = CreateIssueRequest {
            fields: IssueFields {
                project: ProjectRef {
                    key: self.project_key.clone(),
                },
                summary: issue.summary.to_owned(),
                description: AdfDocument::from_text(issue.description.unwrap_or("")),
                issuetype: NamedRef {
                    name: issue.issue_type.to_owned(),
                },
                duedate: issue.due_date.map(format_due_date),
                priority: Some(NamedRef {
                    name: jira_priority_name(issue.priority).to_owned(),
                }),
            },
        };

        let url = format!("{}/rest/api/3/issue", self.base_url);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.email, Some(&self.api_token))
            .json(&request)
            .send()
            .await
            .context("send create-issue request")?;
        if !response.status().is_success() {
            anyhow::bail!(
                "tracker returned {} creating issue in project {}",
                response.status(),
                self.project_key
            );
        }
        let body: CreateIssueResponse = response
            .json()
            .await
            .context("decode create-issue response")?;
        tracing::info!(key = %body.key, project = %self.project_key, "created tracker issue");
        Ok(body.key)
    }

    async fn update_issue(
        &self,
        key: &str,
        changes: &RemoteIssueChanges,
    ) -> Result<(), anyhow::Error> {
        let mut fields = serde_json::Map::new();
        if let Some(ref summary) = changes.summary {
            fields.insert("summary".to_owned(), json!(summary));
        }
        if let Some(ref description) = changes.description {
            let value = match description {
                Some(d) => serde_json::to_value(AdfDocument::from_text(d))
                    .context("encode description")?,
                None => Value::Null,
            };
            fields.insert("description".to_owned(), value);
        }
        if let Some(due_date) = changes.due_date {
            let value = match due_date {
                Some(d) => json!(format_due_date(d)),
                None => Value::Null,
            };
            fields.insert("duedate".to_owned(), value);
        }
        if let Some(priority) = changes.priority {
            fields.insert(
                "priority".to_owned(),
                json!({ "name": jira_priority_name(priority) }),
            );
        }

        let url = format!("{}/rest/api/3/issue/{key}", self.base_url);
        let response = self
            .http
            .put(&url)
            .basic_auth(&self.email, Some(&self.api_token))
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .context("send update-issue request")?;
        if !response.status().is_success() {
            anyhow::bail!("tracker returned {} updating issue {key}", response.status());
        }
        Ok(())
    }

    async fn delete_issue(&self, key: &str) -> Result<(), anyhow::Error> {
        let url = format!("{}/rest/api/3/issue/{key}", self.base_url);
        let response = self
            .http
            .delete(&url)
            .basic_auth(&self.email, Some(&self.api_token))
            .send()
            .await
            .context("send delete-issue request")?;
        if !response.status().is_success() {
            anyhow::bail!("tracker returned {} deleting issue {key}", response.status());
        }
        Ok(())
    }
}

/// The tracker's priority names are capitalized, unlike the stored values.
fn jira_priority_name(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}

/// The tracker's duedate field takes a plain date.
fn format_due_date(due: DateTime<Utc>) -> String {
    due.format("%Y-%m-%d").to_string()
}

// ── Wire DTOs ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CreateIssueRequest {
    fields: IssueFields,
}

#[derive(Debug, Serialize)]
struct IssueFields {
    project: ProjectRef,
    summary: String,
    description: AdfDocument,
    issuetype: NamedRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    duedate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<NamedRef>,
}

#[derive(Debug, Serialize)]
struct ProjectRef {
    key: String,
}

#[derive(Debug, Serialize)]
struct NamedRef {
    name: String,
}

/// Minimal Atlassian Document Format body: one paragraph of plain text.
#[derive(Debug, Serialize)]
struct AdfDocument {
    #[serde(rename = "type")]
    node_type: &'static str,
    version: u8,
    content: Vec<AdfParagraph>,
}

#[derive(Debug, Serialize)]
struct AdfParagraph {
    #[serde(rename = "type")]
    node_type: &'static str,
    content: Vec<AdfText>,
}

#[derive(Debug, Serialize)]
struct AdfText {
    #[serde(rename = "type")]
    node_type: &'static str,
    text: String,
}

impl AdfDocument {
    fn from_text(text: &str) -> Self {
        Self {
            node_type: "doc",
            version: 1,
            content: vec![AdfParagraph {
                node_type: "paragraph",
                content: vec![AdfText {
                    node_type: "text",
                    text: text.to_owned(),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateIssueResponse {
    key: String,
}
