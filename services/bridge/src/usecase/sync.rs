use chrono::Utc;

use syncline_domain::status::SyncState;

use crate::domain::repository::{IssueRepository, NewRemoteIssue, OutboxRepository, TrackerPort};
use crate::domain::types::{Issue, OutboxEvent, REMOTE_ISSUE_TYPE, SYNC_MAX_ATTEMPTS};
use crate::error::BridgeServiceError;

/// Processes one outbox event: creates the remote issue for the referenced
/// aggregate, then records the outcome.
///
/// Delivery is at-least-once. A crash after the remote create succeeds but
/// before [`OutboxRepository::complete`] commits leaves the event PENDING, so
/// the next scan creates a duplicate remote issue; the tracker API has no
/// dedup parameter to pass the idempotency key to.
pub struct ProcessSyncEventUseCase<I, O, T>
where
    I: IssueRepository,
    O: OutboxRepository,
    T: TrackerPort,
{
    pub issues: I,
    pub outbox: O,
    pub tracker: T,
}

impl<I, O, T> ProcessSyncEventUseCase<I, O, T>
where
    I: IssueRepository,
    O: OutboxRepository,
    T: TrackerPort,
{
    /// One scan: fetch pending events and process each in order. A single
    /// event's failure never aborts the remainder of the scan.
    ///
    /// Returns the number of events scanned.
    pub async fn run_tick(&self) -> Result<usize, BridgeServiceError> {
        let events = self.outbox.find_pending().await?;
        if !events.is_empty() {
            tracing::debug!(pending = events.len(), "processing pending sync events");
        }
        for event in &events {
            if let Err(e) = self.execute(event).await {
                tracing::error!(event = %event.id, error = %e, "failed to process sync event");
            }
        }
        Ok(events.len())
    }

    pub async fn execute(&self, event: &OutboxEvent) -> Result<(), BridgeServiceError> {
        if event.status != SyncState::Pending {
            return Ok(());
        }
        let attempts = event.attempts + 1;

        let Some(issue) = self.issues.find_by_id(event.issue_id).await? else {
            self.record_failure(event, attempts, "referenced issue no longer exists", None)
                .await?;
            return Ok(());
        };

        // The live aggregate is authoritative; the event payload is only the
        // enqueue-time audit record.
        let created = self
            .tracker
            .create_issue(NewRemoteIssue {
                summary: &issue.title,
                description: issue.description.as_deref(),
                issue_type: REMOTE_ISSUE_TYPE,
                due_date: issue.due_date,
                priority: issue.priority,
            })
            .await;

        match created {
            Ok(key) => {
                let mut issue = issue;
                issue.business_key = Some(key);
                issue.sync_state = SyncState::Done;
                issue.updated_at = Utc::now();
                self.outbox.complete(event.id, &issue).await?;
                tracing::info!(event = %event.id, issue = %issue.id, "synced issue to tracker");
            }
            Err(e) => {
                self.record_failure(event, attempts, &format!("{e:#}"), Some(issue))
                    .await?;
            }
        }
        Ok(())
    }

    async fn record_failure(
        &self,
        event: &OutboxEvent,
        attempts: i32,
        error: &str,
        issue: Option<Issue>,
    ) -> Result<(), BridgeServiceError> {
        if attempts >= SYNC_MAX_ATTEMPTS {
            let failed = issue.map(|mut issue| {
                issue.sync_state = SyncState::Failed;
                issue.updated_at = Utc::now();
                issue
            });
            self.outbox
                .abandon(event.id, attempts, error, failed.as_ref())
                .await?;
            tracing::error!(event = %event.id, attempts, error, "abandoning sync event");
        } else {
            self.outbox.record_failure(event.id, attempts, error).await?;
            tracing::warn!(event = %event.id, attempts, error, "sync event failed, will retry");
        }
        Ok(())
    }
}
