//! Fixed-interval outbox scheduler.

use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::domain::repository::{IssueRepository, OutboxRepository, TrackerPort};
use crate::usecase::sync::ProcessSyncEventUseCase;

/// Drive the sync use case forever. Ticks never overlap: the next scan is
/// delayed until the previous one has finished its sequential dispatch.
pub async fn run_sync_loop<I, O, T>(usecase: ProcessSyncEventUseCase<I, O, T>, period: Duration)
where
    I: IssueRepository,
    O: OutboxRepository,
    T: TrackerPort,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if let Err(e) = usecase.run_tick().await {
            // A failed scan (e.g. the poll query itself) is retried next tick.
            tracing::error!(error = %e, "outbox scan failed");
        }
    }
}
