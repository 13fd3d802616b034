use repairdesk_core::TaskState;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::research_client;
use crate::error::RemoteError;
use crate::types::{ResearchRequest, TaskOutput};

fn request() -> ResearchRequest {
    ResearchRequest {
        location: "San Jose, CA".to_owned(),
        damage_description: "scratched door".to_owned(),
        radius_miles: 10,
        latitude: None,
        longitude: None,
    }
}

#[tokio::test]
async fn test_create_returns_task_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/run-task"))
        .and(header("authorization", "Bearer research-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "task-42"})))
        .expect(1)
        .mount(&server)
        .await;

    let id = research_client(&server).create(&request()).await.unwrap();
    assert_eq!(id, "task-42");
}

#[tokio::test]
async fn test_create_non_success_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/run-task"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let err = research_client(&server).create(&request()).await.unwrap_err();
    assert!(matches!(err, RemoteError::HttpStatus { code: 401, .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_status_running_is_pending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/task/task-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "running"})))
        .mount(&server)
        .await;

    let status = research_client(&server).status("task-42").await.unwrap();
    assert_eq!(status.state, TaskState::Pending);
    assert!(status.output.is_none());
}

#[tokio::test]
async fn test_status_finished_parses_fenced_shops() {
    let server = MockServer::start().await;
    let output = "```json\n[{\"name\": \"Valley Collision\", \"phone\": \"+14085550199\", \"rating\": 4.7}]\n```";
    Mock::given(method("GET"))
        .and(path("/api/v1/task/task-42"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "finished", "output": output})),
        )
        .mount(&server)
        .await;

    let status = research_client(&server).status("task-42").await.unwrap();
    assert_eq!(status.state, TaskState::Succeeded);
    match status.output {
        Some(TaskOutput::Shops(shops)) => {
            assert_eq!(shops.len(), 1);
            assert_eq!(shops[0].name, "Valley Collision");
        },
        other => panic!("unexpected output: {other:?}"),
    }
}

#[tokio::test]
async fn test_status_finished_without_output_has_no_shops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/task/task-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "finished"})))
        .mount(&server)
        .await;

    let status = research_client(&server).status("task-42").await.unwrap();
    assert_eq!(status.output, Some(TaskOutput::Shops(Vec::new())));
}

#[tokio::test]
async fn test_status_server_error_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/task/task-42"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = research_client(&server).status("task-42").await.unwrap_err();
    assert!(err.is_transient());
}
