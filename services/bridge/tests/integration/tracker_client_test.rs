use chrono::{TimeZone, Utc};

use syncline_bridge::domain::repository::{NewRemoteIssue, RemoteIssueChanges, TrackerPort};
use syncline_bridge::infra::jira::JiraClient;
use syncline_domain::priority::Priority;
use syncline_testing::tracker::{MockTrackerServer, TrackerRequest};

fn client_for(server: &MockTrackerServer) -> JiraClient {
    JiraClient::new(&server.base_url(), "bot@example.com", "token", "DEMO").unwrap()
}

#[tokio::test]
async fn should_create_issue_and_return_generated_key() {
    let server = MockTrackerServer::start("DEMO").await;
    let client = client_for(&server);

    let key = client
        .create_issue(NewRemoteIssue {
            summary: "Crash on login",
            description: Some("stack trace attached"),
            issue_type: "Task",
            due_date: Utc.with_ymd_and_hms(2026, 9, 6, 12, 0, 0).single(),
            priority: Priority::High,
        })
        .await
        .unwrap();

    assert_eq!(key, "DEMO-1");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    match &requests[0] {
        TrackerRequest::Create(body) => {
            assert_eq!(body["fields"]["project"]["key"], "DEMO");
            assert_eq!(body["fields"]["summary"], "Crash on login");
            assert_eq!(body["fields"]["issuetype"]["name"], "Task");
            assert_eq!(body["fields"]["duedate"], "2026-09-06");
            assert_eq!(body["fields"]["priority"]["name"], "High");
            assert_eq!(body["fields"]["description"]["type"], "doc");
            assert_eq!(
                body["fields"]["description"]["content"][0]["content"][0]["text"],
                "stack trace attached"
            );
        }
        other => panic!("expected create request, got {other:?}"),
    }
}

#[tokio::test]
async fn should_assign_sequential_keys() {
    let server = MockTrackerServer::start("OPS").await;
    let client = JiraClient::new(&server.base_url(), "bot@example.com", "token", "OPS").unwrap();

    for expected in ["OPS-1", "OPS-2"] {
        let key = client
            .create_issue(NewRemoteIssue {
                summary: "repeat",
                description: None,
                issue_type: "Task",
                due_date: None,
                priority: Priority::Medium,
            })
            .await
            .unwrap();
        assert_eq!(key, expected);
    }
}

#[tokio::test]
async fn should_surface_tracker_failures() {
    let server = MockTrackerServer::start("DEMO").await;
    server.fail_requests(true);
    let client = client_for(&server);

    let result = client
        .create_issue(NewRemoteIssue {
            summary: "will fail",
            description: None,
            issue_type: "Task",
            due_date: None,
            priority: Priority::Medium,
        })
        .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("500"), "got: {err}");
}

#[tokio::test]
async fn should_send_update_field_map() {
    let server = MockTrackerServer::start("DEMO").await;
    let client = client_for(&server);

    client
        .update_issue(
            "DEMO-1",
            &RemoteIssueChanges {
                summary: Some("Renamed".to_owned()),
                priority: Some(Priority::Low),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    match &server.requests()[0] {
        TrackerRequest::Update { key, body } => {
            assert_eq!(key, "DEMO-1");
            assert_eq!(body["fields"]["summary"], "Renamed");
            assert_eq!(body["fields"]["priority"]["name"], "Low");
            assert!(body["fields"].get("duedate").is_none());
        }
        other => panic!("expected update request, got {other:?}"),
    }
}

#[tokio::test]
async fn should_clear_remote_due_date_with_null() {
    let server = MockTrackerServer::start("DEMO").await;
    let client = client_for(&server);

    client
        .update_issue(
            "DEMO-1",
            &RemoteIssueChanges {
                due_date: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    match &server.requests()[0] {
        TrackerRequest::Update { body, .. } => {
            assert!(body["fields"]["duedate"].is_null());
        }
        other => panic!("expected update request, got {other:?}"),
    }
}

#[tokio::test]
async fn should_delete_remote_issue() {
    let server = MockTrackerServer::start("DEMO").await;
    let client = client_for(&server);

    client.delete_issue("DEMO-9").await.unwrap();

    assert_eq!(
        server.requests(),
        vec![TrackerRequest::Delete {
            key: "DEMO-9".to_owned()
        }]
    );
}
