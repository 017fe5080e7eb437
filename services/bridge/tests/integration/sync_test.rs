use syncline_bridge::domain::types::{OutboxEvent, SYNC_MAX_ATTEMPTS};
use syncline_bridge::usecase::sync::ProcessSyncEventUseCase;
use syncline_domain::id::IssueId;
use syncline_domain::status::SyncState;

use crate::helpers::{MemoryIssueRepo, MemoryOutboxRepo, MockTracker, test_issue};

fn sync_usecase(
    repo: &MemoryIssueRepo,
    tracker: MockTracker,
) -> ProcessSyncEventUseCase<MemoryIssueRepo, MemoryOutboxRepo, MockTracker> {
    ProcessSyncEventUseCase {
        issues: repo.clone(),
        outbox: repo.outbox_repo(),
        tracker,
    }
}

#[tokio::test]
async fn should_sync_pending_event_and_record_business_key() {
    let issue = test_issue();
    let id = issue.id;
    let repo = MemoryIssueRepo::new(vec![issue.clone()]);
    repo.seed_event(OutboxEvent::issue_created(&issue));
    let uc = sync_usecase(&repo, MockTracker::returning("DEMO-1"));

    let scanned = uc.run_tick().await.unwrap();
    assert_eq!(scanned, 1);

    let issues = repo.issues.lock().unwrap();
    assert_eq!(issues[0].business_key.as_deref(), Some("DEMO-1"));
    assert_eq!(issues[0].sync_state, SyncState::Done);
    assert_eq!(issues[0].id, id);

    let outbox = repo.outbox.lock().unwrap();
    assert_eq!(outbox[0].status, SyncState::Done, "status flip, not delete");
    assert!(outbox[0].processed_at.is_some());
}

#[tokio::test]
async fn should_leave_event_pending_on_failure_and_retry_next_tick() {
    let issue = test_issue();
    let repo = MemoryIssueRepo::new(vec![issue.clone()]);
    repo.seed_event(OutboxEvent::issue_created(&issue));
    let tracker = MockTracker::failing("503 from tracker");
    let uc = sync_usecase(&repo, tracker.clone());

    uc.run_tick().await.unwrap();

    {
        let outbox = repo.outbox.lock().unwrap();
        assert_eq!(outbox[0].status, SyncState::Pending);
        assert_eq!(outbox[0].attempts, 1);
        assert_eq!(outbox[0].last_error.as_deref(), Some("503 from tracker"));
        let issues = repo.issues.lock().unwrap();
        assert_eq!(issues[0].business_key, None, "business key unchanged");
    }

    // Second tick retries the same row; the tracker has recovered.
    tracker.set_create_result(Ok("DEMO-2"));
    uc.run_tick().await.unwrap();

    let outbox = repo.outbox.lock().unwrap();
    assert_eq!(outbox[0].status, SyncState::Done);
    let issues = repo.issues.lock().unwrap();
    assert_eq!(issues[0].business_key.as_deref(), Some("DEMO-2"));
    assert_eq!(tracker.created.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_skip_completed_events() {
    let issue = test_issue();
    let repo = MemoryIssueRepo::new(vec![issue.clone()]);
    let mut done = OutboxEvent::issue_created(&issue);
    done.status = SyncState::Done;
    repo.seed_event(done);
    let tracker = MockTracker::returning("DEMO-1");
    let uc = sync_usecase(&repo, tracker.clone());

    let scanned = uc.run_tick().await.unwrap();

    assert_eq!(scanned, 0);
    assert!(tracker.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_record_failure_when_referenced_issue_is_gone() {
    let issue = test_issue();
    let repo = MemoryIssueRepo::empty();
    let mut event = OutboxEvent::issue_created(&issue);
    event.issue_id = IssueId::generate();
    repo.seed_event(event);
    let tracker = MockTracker::returning("DEMO-1");
    let uc = sync_usecase(&repo, tracker.clone());

    uc.run_tick().await.unwrap();

    let outbox = repo.outbox.lock().unwrap();
    assert_eq!(outbox[0].status, SyncState::Pending);
    assert_eq!(outbox[0].attempts, 1);
    assert_eq!(
        outbox[0].last_error.as_deref(),
        Some("referenced issue no longer exists")
    );
    assert!(tracker.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_abandon_event_after_attempt_cutoff() {
    let issue = test_issue();
    let repo = MemoryIssueRepo::new(vec![issue.clone()]);
    let mut event = OutboxEvent::issue_created(&issue);
    event.attempts = SYNC_MAX_ATTEMPTS - 1;
    repo.seed_event(event);
    let uc = sync_usecase(&repo, MockTracker::failing("permanent rejection"));

    uc.run_tick().await.unwrap();

    let outbox = repo.outbox.lock().unwrap();
    assert_eq!(outbox[0].status, SyncState::Failed);
    assert_eq!(outbox[0].attempts, SYNC_MAX_ATTEMPTS);
    let issues = repo.issues.lock().unwrap();
    assert_eq!(issues[0].sync_state, SyncState::Failed);

    // A further tick finds nothing pending.
    drop(outbox);
    drop(issues);
    assert_eq!(uc.run_tick().await.unwrap(), 0);
}

#[tokio::test]
async fn should_process_remaining_events_after_one_fails() {
    let missing_ref = test_issue();
    let healthy = test_issue();
    let repo = MemoryIssueRepo::new(vec![healthy.clone()]);
    repo.seed_event(OutboxEvent::issue_created(&missing_ref));
    repo.seed_event(OutboxEvent::issue_created(&healthy));
    let uc = sync_usecase(&repo, MockTracker::returning("DEMO-5"));

    uc.run_tick().await.unwrap();

    let outbox = repo.outbox.lock().unwrap();
    assert_eq!(outbox[0].status, SyncState::Pending, "first event failed");
    assert_eq!(outbox[1].status, SyncState::Done, "second event synced");
    let issues = repo.issues.lock().unwrap();
    assert_eq!(issues[0].business_key.as_deref(), Some("DEMO-5"));
}
