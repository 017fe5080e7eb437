use std::time::Duration;

use syncline_bridge::error::BridgeServiceError;
use syncline_bridge::usecase::task::{
    CreateTaskInput, CreateTaskUseCase, DeleteTaskUseCase, GetTaskUseCase, UpdateTaskInput,
    UpdateTaskUseCase,
};
use syncline_domain::priority::Priority;
use syncline_domain::status::WorkStatus;

use crate::helpers::{CapturingPublisher, MemoryTaskRepo, MockTracker, test_task};

fn create_input(title: &str) -> CreateTaskInput {
    CreateTaskInput {
        title: title.to_owned(),
        description: None,
        status: None,
        due_date: None,
        priority: None,
    }
}

#[tokio::test]
async fn should_create_task_with_trimmed_title_and_business_key() {
    let repo = MemoryTaskRepo::empty();
    let publisher = CapturingPublisher::new();
    let uc = CreateTaskUseCase {
        tasks: repo.clone(),
        tracker: MockTracker::returning("DEMO-1"),
        events: publisher.clone(),
    };

    let task = uc.execute(create_input("  Ship the release  ")).await.unwrap();

    assert_eq!(task.title, "Ship the release");
    assert_eq!(task.status, WorkStatus::Pending);
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.business_key.as_deref(), Some("DEMO-1"));

    let stored = repo.tasks.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].business_key.as_deref(), Some("DEMO-1"));
    assert_eq!(publisher.kinds(), vec!["TASK_CREATED"]);
}

#[tokio::test]
async fn should_reject_blank_title_on_create() {
    let uc = CreateTaskUseCase {
        tasks: MemoryTaskRepo::empty(),
        tracker: MockTracker::returning("DEMO-1"),
        events: CapturingPublisher::new(),
    };

    let result = uc.execute(create_input("   ")).await;

    match result {
        Err(BridgeServiceError::Validation(map)) => {
            assert_eq!(map["title"], "Title is required");
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn should_store_medium_priority_for_unknown_input() {
    let repo = MemoryTaskRepo::empty();
    let uc = CreateTaskUseCase {
        tasks: repo.clone(),
        tracker: MockTracker::returning("DEMO-1"),
        events: CapturingPublisher::new(),
    };

    let mut input = create_input("Prioritize the backlog");
    input.priority = Some("urgent!!".to_owned());
    let task = uc.execute(input).await.unwrap();

    assert_eq!(task.priority, Priority::Medium);
}

#[tokio::test]
async fn should_propagate_tracker_failure_but_keep_task() {
    let repo = MemoryTaskRepo::empty();
    let uc = CreateTaskUseCase {
        tasks: repo.clone(),
        tracker: MockTracker::failing("connection refused"),
        events: CapturingPublisher::new(),
    };

    let result = uc.execute(create_input("Escalate the incident")).await;

    assert!(
        matches!(result, Err(BridgeServiceError::Tracker(_))),
        "expected Tracker error, got {result:?}"
    );
    // The task was persisted before the tracker call; it just has no key.
    let stored = repo.tasks.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].business_key, None);
}

#[tokio::test]
async fn should_update_single_field_and_advance_updated_at() {
    let task = test_task();
    let original = task.clone();
    let repo = MemoryTaskRepo::new(vec![task]);
    let publisher = CapturingPublisher::new();
    let uc = UpdateTaskUseCase {
        tasks: repo.clone(),
        tracker: MockTracker::returning("unused"),
        events: publisher.clone(),
    };

    tokio::time::sleep(Duration::from_millis(5)).await;
    let updated = uc
        .execute(
            original.id,
            UpdateTaskInput {
                status: Some(WorkStatus::InProgress),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, WorkStatus::InProgress);
    // Every other field is untouched.
    assert_eq!(updated.title, original.title);
    assert_eq!(updated.description, original.description);
    assert_eq!(updated.due_date, original.due_date);
    assert_eq!(updated.priority, original.priority);
    assert!(
        updated.updated_at > original.updated_at,
        "updated_at must strictly advance"
    );
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(publisher.kinds(), vec!["TASK_UPDATED"]);
}

#[tokio::test]
async fn should_clear_description_with_explicit_null() {
    let task = test_task();
    let id = task.id;
    let repo = MemoryTaskRepo::new(vec![task]);
    let uc = UpdateTaskUseCase {
        tasks: repo.clone(),
        tracker: MockTracker::returning("unused"),
        events: CapturingPublisher::new(),
    };

    let updated = uc
        .execute(
            id,
            UpdateTaskInput {
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.description, None);
}

#[tokio::test]
async fn should_return_current_task_for_empty_patch() {
    let task = test_task();
    let original = task.clone();
    let repo = MemoryTaskRepo::new(vec![task]);
    let publisher = CapturingPublisher::new();
    let uc = UpdateTaskUseCase {
        tasks: repo.clone(),
        tracker: MockTracker::returning("unused"),
        events: publisher.clone(),
    };

    let unchanged = uc.execute(original.id, UpdateTaskInput::default()).await.unwrap();

    assert_eq!(unchanged.updated_at, original.updated_at);
    assert!(publisher.kinds().is_empty(), "no notification for a no-op");
}

#[tokio::test]
async fn should_push_update_to_tracker_when_business_key_exists() {
    let mut task = test_task();
    task.business_key = Some("DEMO-7".to_owned());
    let id = task.id;
    let repo = MemoryTaskRepo::new(vec![task]);
    let tracker = MockTracker::returning("unused");
    let uc = UpdateTaskUseCase {
        tasks: repo.clone(),
        tracker: tracker.clone(),
        events: CapturingPublisher::new(),
    };

    uc.execute(
        id,
        UpdateTaskInput {
            title: Some("Rename the runbook".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let pushed = tracker.updated.lock().unwrap();
    assert_eq!(pushed.len(), 1);
    assert_eq!(pushed[0].0, "DEMO-7");
    assert_eq!(pushed[0].1.summary.as_deref(), Some("Rename the runbook"));
}

#[tokio::test]
async fn should_not_call_tracker_on_update_without_business_key() {
    let task = test_task();
    let id = task.id;
    let tracker = MockTracker::returning("unused");
    let uc = UpdateTaskUseCase {
        tasks: MemoryTaskRepo::new(vec![task]),
        tracker: tracker.clone(),
        events: CapturingPublisher::new(),
    };

    uc.execute(
        id,
        UpdateTaskInput {
            title: Some("No remote yet".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(tracker.updated.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_fail_update_of_missing_task() {
    let uc = UpdateTaskUseCase {
        tasks: MemoryTaskRepo::empty(),
        tracker: MockTracker::returning("unused"),
        events: CapturingPublisher::new(),
    };

    let result = uc.execute(test_task().id, UpdateTaskInput::default()).await;

    assert!(matches!(result, Err(BridgeServiceError::TaskNotFound)));
}

#[tokio::test]
async fn should_fail_delete_of_missing_task() {
    let uc = DeleteTaskUseCase {
        tasks: MemoryTaskRepo::empty(),
        tracker: MockTracker::returning("unused"),
        events: CapturingPublisher::new(),
    };

    let result = uc.execute(test_task().id).await;

    assert!(matches!(result, Err(BridgeServiceError::TaskNotFound)));
}

#[tokio::test]
async fn should_delete_task_and_clean_up_remote_issue() {
    let mut task = test_task();
    task.business_key = Some("DEMO-9".to_owned());
    let id = task.id;
    let repo = MemoryTaskRepo::new(vec![task]);
    let tracker = MockTracker::returning("unused");
    let publisher = CapturingPublisher::new();
    let uc = DeleteTaskUseCase {
        tasks: repo.clone(),
        tracker: tracker.clone(),
        events: publisher.clone(),
    };

    uc.execute(id).await.unwrap();

    let get = GetTaskUseCase { tasks: repo.clone() };
    assert!(matches!(
        get.execute(id).await,
        Err(BridgeServiceError::TaskNotFound)
    ));
    assert_eq!(tracker.deleted.lock().unwrap().as_slice(), ["DEMO-9"]);
    assert_eq!(publisher.kinds(), vec!["TASK_DELETED"]);
}

#[tokio::test]
async fn should_swallow_tracker_failure_during_delete() {
    let mut task = test_task();
    task.business_key = Some("DEMO-9".to_owned());
    let id = task.id;
    let repo = MemoryTaskRepo::new(vec![task]);
    let uc = DeleteTaskUseCase {
        tasks: repo.clone(),
        tracker: MockTracker::failing("gateway timeout"),
        events: CapturingPublisher::new(),
    };

    // The local delete wins even when the remote cleanup fails.
    uc.execute(id).await.unwrap();
    assert!(repo.tasks.lock().unwrap().is_empty());
}
