/// Bridge service configuration loaded from environment variables.
#[derive(Debug)]
pub struct BridgeConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 8080). Env var: `BRIDGE_PORT`.
    pub bridge_port: u16,
    /// Remote tracker base URL (e.g. "https://acme.atlassian.net").
    pub jira_base_url: String,
    /// Account email used for basic auth against the tracker API.
    pub jira_email: String,
    /// API token paired with the email.
    pub jira_api_token: String,
    /// Project key remote issues are created under (e.g. "DEMO").
    pub jira_project_key: String,
    /// Shared secret for inbound webhooks. Unset disables the check.
    pub jira_webhook_secret: Option<String>,
    /// Outbox poll period in seconds (default 5). Env var: `SYNC_INTERVAL_SECS`.
    pub sync_interval_secs: u64,
}

impl BridgeConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            bridge_port: std::env::var("BRIDGE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            jira_base_url: std::env::var("JIRA_BASE_URL").expect("JIRA_BASE_URL"),
            jira_email: std::env::var("JIRA_EMAIL").expect("JIRA_EMAIL"),
            jira_api_token: std::env::var("JIRA_API_TOKEN").expect("JIRA_API_TOKEN"),
            jira_project_key: std::env::var("JIRA_PROJECT_KEY").expect("JIRA_PROJECT_KEY"),
            jira_webhook_secret: std::env::var("JIRA_WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            sync_interval_secs: std::env::var("SYNC_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }
}
