//! Status-to-error mapping through the real HTTP transport.

use crate::mock_server::{MockServerFixture, API_KEY};
use serde_json::json;
use utopian_labs::types::GetRunRequest;
use utopian_labs::{Error, ErrorKind, UtopianLabs};

const RUN_BODY: &str = r#"{"agent":"r1","lead":{"company":{"website":"acme.com"}}}"#;

#[tokio::test]
async fn test_create_status_mapping() {
    let cases: [(usize, ErrorKind, &str); 6] = [
        (401, ErrorKind::Unauthorized, "Invalid API key"),
        (402, ErrorKind::PaymentRequired, "Payment required"),
        (404, ErrorKind::NotFound, "Resource not found"),
        (400, ErrorKind::BadRequest, "lead.company is not reachable"),
        (429, ErrorKind::RateLimitExceeded, "Rate limit exceeded"),
        (500, ErrorKind::ApiError, "lead.company is not reachable"),
    ];

    for (status, kind, message) in cases {
        let mut fixture = MockServerFixture::new().await;
        let _mock = fixture
            .mock_json(
                "POST",
                "/v1/agents/runs",
                status,
                r#"{"error":{"message":"lead.company is not reachable"}}"#,
            )
            .await;

        let input: serde_json::Value = serde_json::from_str(RUN_BODY).unwrap();
        let err = fixture
            .client()
            .agents()
            .runs()
            .create(&input)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), kind, "status {}", status);
        assert_eq!(err.message(), message, "status {}", status);
        assert_eq!(err.status(), Some(status as u16));
    }
}

#[tokio::test]
async fn test_fallback_messages_without_error_body() {
    let mut fixture = MockServerFixture::new().await;
    let _bad = fixture
        .mock_json("GET", "/v1/agents/runs/r_400", 400, "")
        .await;
    let _boom = fixture
        .mock_json("GET", "/v1/agents/runs/r_500", 500, "upstream exploded")
        .await;
    let client = fixture.client();

    let err = client
        .agents()
        .runs()
        .get(&GetRunRequest::new("r_400"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert_eq!(err.message(), "Bad request");

    let err = client
        .agents()
        .runs()
        .get(&GetRunRequest::new("r_500"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ApiError);
    assert_eq!(err.message(), "API error");
}

#[tokio::test]
async fn test_not_found_on_get() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json("GET", "/v1/agents/runs/missing", 404, r#"{"error":{"message":"no run"}}"#)
        .await;

    let err = fixture
        .client()
        .agents()
        .runs()
        .get(&json!({"run": "missing"}))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
    assert_eq!(err.message(), "Resource not found");
}

#[tokio::test]
async fn test_no_response_is_unknown() {
    let client = UtopianLabs::builder()
        .api_key(API_KEY)
        .base_url("http://127.0.0.1:1")
        .without_keyring()
        .build()
        .unwrap();

    let err = client
        .agents()
        .runs()
        .get(&GetRunRequest::new("abc123"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unknown);
    assert!(err.status().is_none());
    assert!(!err.message().is_empty());
}

#[tokio::test]
async fn test_errors_are_identifiable_through_anyhow() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json("GET", "/v1/agents/runs/limited", 429, "{}")
        .await;

    let result: anyhow::Result<serde_json::Value> = async {
        let body = fixture
            .client()
            .agents()
            .runs()
            .get(&GetRunRequest::new("limited"))
            .await?;
        Ok(body)
    }
    .await;

    let err = result.unwrap_err();
    let sdk = err.downcast_ref::<Error>().unwrap();
    assert_eq!(sdk.kind(), ErrorKind::RateLimitExceeded);
    assert!(Error::is_sdk_error(err.as_ref()));
}
