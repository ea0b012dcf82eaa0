//! Run endpoints end to end: validation, routing, body shaping.

use crate::mock_server::{recording_client, MockServerFixture, RecordingTransport};
use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;
use utopian_labs::types::{
    AgentKind, Company, GetRunRequest, Lead, RunParams, RunRequest, RunResult, RunStatus, Score,
};
use utopian_labs::ErrorKind;

#[tokio::test]
async fn test_get_hits_run_path_and_returns_body_unchanged() {
    let mut fixture = MockServerFixture::new().await;
    let body = json!({
        "id": "abc123",
        "agent": "r1",
        "status": "queued",
        "created_at": 1_700_000_000_000u64,
        "_status": 200
    });
    let mock = fixture
        .mock_json("GET", "/v1/agents/runs/abc123", 200, &body.to_string())
        .await;

    let got = fixture
        .client()
        .agents()
        .runs()
        .get(&json!({"run": "abc123"}))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(got, body);
}

#[tokio::test]
async fn test_get_typed_parses_completed_qualification() {
    let mut fixture = MockServerFixture::new().await;
    let body = json!({
        "id": "run_9",
        "agent": "r1-qualification-light",
        "status": "completed",
        "created_at": 1_700_000_000_000u64,
        "metadata": {"crm_id": 42},
        "result": {
            "research": {"steps": [{"action": "visited acme.com"}]},
            "qualification": {"score": "high", "reason": "fits the ICP"}
        }
    });
    let _mock = fixture
        .mock_json("GET", "/v1/agents/runs/run_9", 200, &body.to_string())
        .await;

    let run = fixture
        .client()
        .agents()
        .runs()
        .get_typed(&GetRunRequest::new("run_9").with_agent(AgentKind::R1QualificationLight))
        .await
        .unwrap();

    assert_eq!(run.status(), RunStatus::Completed);
    assert_eq!(run.agent(), AgentKind::R1QualificationLight);
    assert!(run.is_terminal());
    let result = run.result().unwrap();
    assert!(matches!(result, RunResult::Qualification { .. }));
    assert_eq!(result.qualification().unwrap().score, Score::High);
    assert_eq!(result.research().unwrap().steps.len(), 1);
    assert_eq!(run.metadata().unwrap()["crm_id"], 42);
}

#[tokio::test]
async fn test_get_typed_rejects_mismatching_body() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            "GET",
            "/v1/agents/runs/run_2",
            200,
            r#"{"id":"run_2","agent":"r1","status":"exploded","created_at":1}"#,
        )
        .await;

    let err = fixture
        .client()
        .agents()
        .runs()
        .get_typed(&GetRunRequest::new("run_2"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValidationError);
    assert!(err.message().starts_with("Invalid response data: status: "));
    assert_eq!(err.context().source.as_deref(), Some("response_validator"));
    assert_eq!(err.context().field_path.as_deref(), Some("status"));
}

#[tokio::test]
async fn test_get_encodes_run_id() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json(
            "GET",
            "/v1/agents/runs/a%2Fb",
            200,
            r#"{"id":"a/b","agent":"r1","status":"queued","created_at":1}"#,
        )
        .await;

    fixture
        .client()
        .agents()
        .runs()
        .get(&GetRunRequest::new("a/b"))
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_posts_defaulted_body_and_strips_marker() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/v1/agents/runs")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "agent": "r1-copywriting",
            "lead": {"company": {"website": "acme.com"}},
            "language": "en-US",
            "sequence_length": 1
        })))
        .with_status(200)
        .with_body(r#"{"id":"run_1","_status":200}"#)
        .create_async()
        .await;

    let created = fixture
        .client()
        .agents()
        .runs()
        .create(&json!({
            "agent": "r1-copywriting",
            "lead": {"company": {"website": "acme.com"}}
        }))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(created.id, "run_1");
    assert!(created.extra.is_empty());
    assert_eq!(serde_json::to_value(&created).unwrap(), json!({"id": "run_1"}));
}

#[tokio::test]
async fn test_create_accepts_typed_request() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/v1/agents/runs")
        .match_body(Matcher::PartialJson(json!({
            "agent": "r1",
            "lead": {"company": {"website": "acme.com"}},
            "metadata": {"source": "crm"}
        })))
        .with_status(200)
        .with_body(r#"{"id":"run_2","_status":200,"queued":true}"#)
        .create_async()
        .await;

    let mut metadata = serde_json::Map::new();
    metadata.insert("source".into(), json!("crm"));
    let request = RunRequest::new(AgentKind::R1, Lead::new(Company::new("acme.com")))
        .with_params(RunParams::Research)
        .unwrap()
        .with_metadata(metadata);

    let created = fixture.client().agents().runs().create(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(created.id, "run_2");
    assert_eq!(created.extra.get("queued"), Some(&json!(true)));
    assert!(!created.extra.contains_key("_status"));
}

#[tokio::test]
async fn test_validation_failures_never_reach_network() {
    let transport = Arc::new(RecordingTransport::default());
    let client = recording_client(&transport);
    let runs = client.agents().runs();

    let bad_inputs = [
        json!({"agent": "r2", "lead": {"company": {"website": "acme.com"}}}),
        json!({"agent": "r1", "lead": {"company": {"website": ""}}}),
        json!({"agent": "r1", "lead": {"company": {}}}),
        json!({
            "agent": "r1-classification",
            "lead": {"company": {"website": "acme.com"}},
            "options": [{"name": "only one"}]
        }),
        json!({
            "agent": "r1",
            "lead": {"company": {"website": "acme.com"}},
            "callback_url": "http://localhost:3000/hook"
        }),
    ];
    for input in &bad_inputs {
        let err = runs.create(input).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError, "input {}", input);
        assert!(err.message().starts_with("Invalid request data: "));
    }

    let err = runs.get(&json!({"agent": "r1"})).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);
    assert_eq!(err.message(), "Invalid request data: run: Required");
    assert_eq!(err.context().source.as_deref(), Some("request_validator"));

    assert_eq!(transport.count(), 0);
}

#[tokio::test]
async fn test_rejected_create_sends_nothing_to_server() {
    let mut fixture = MockServerFixture::new().await;
    let post = fixture.mock_never_called("POST").await;
    let get = fixture.mock_never_called("GET").await;
    let client = fixture.client();
    let runs = client.agents().runs();

    let err = runs
        .create(&json!({
            "agent": "r1-copywriting",
            "lead": {"company": {"website": "acme.com"}},
            "sequence_length": 11
        }))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);
    assert_eq!(
        err.message(),
        "Invalid request data: sequence_length: Number must be less than or equal to 10"
    );

    let err = runs.get(&json!({"run": 7})).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);

    post.assert_async().await;
    get.assert_async().await;
}

#[tokio::test]
async fn test_validation_error_names_every_field() {
    let transport = Arc::new(RecordingTransport::default());
    let err = recording_client(&transport)
        .agents()
        .runs()
        .create(&json!({
            "agent": "r1-classification",
            "lead": {"company": {"website": "acme.com"}},
            "options": [{"name": "a"}],
            "max_research_steps": 101
        }))
        .await
        .unwrap_err();

    let paths: Vec<&str> = err.issues().iter().map(|i| i.path()).collect();
    assert!(paths.contains(&"options"));
    assert!(paths.contains(&"max_research_steps"));
    assert!(err
        .message()
        .contains("max_research_steps: Number must be less than or equal to 100"));
    assert!(err.message().contains("options: you must provide at least 2 options"));
    assert_eq!(transport.count(), 0);
}

#[tokio::test]
async fn test_allowed_callback_host_reaches_network() {
    let transport = Arc::new(RecordingTransport::default());
    let created = recording_client(&transport)
        .agents()
        .runs()
        .create(&json!({
            "agent": "r1-timing",
            "lead": {"company": {"website": "https://acme.com"}},
            "callback_url": "https://integrations.utopianlabs.ai/hooks/1"
        }))
        .await
        .unwrap();

    assert_eq!(created.id, "recorded");
    assert_eq!(transport.count(), 1);
    let requests = transport.requests.lock().unwrap();
    assert_eq!(requests[0].url.path(), "/v1/agents/runs");
    assert_eq!(
        requests[0].body.as_ref().unwrap()["callback_url"],
        "https://integrations.utopianlabs.ai/hooks/1"
    );
}
