//! `GET /me` under both error policies.

use crate::mock_server::MockServerFixture;
use utopian_labs::types::MeStatus;
use utopian_labs::{ErrorKind, MeErrorPolicy};

#[tokio::test]
async fn test_me_success() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json("GET", "/v1/me", 200, r#"{"status":"success","orgName":"Acme"}"#)
        .await;

    let me = fixture.client().me().await.unwrap();

    mock.assert_async().await;
    assert!(me.is_success());
    assert_eq!(me.org_name.as_deref(), Some("Acme"));
}

#[tokio::test]
async fn test_me_structured_maps_unauthorized() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json("GET", "/v1/me", 401, r#"{"error":{"message":"nope"}}"#)
        .await;

    let me = fixture.client().me().await.unwrap();

    assert_eq!(me.status, MeStatus::Error);
    assert_eq!(me.error.as_deref(), Some("Invalid API key"));
    assert!(me.org_name.is_none());
}

#[tokio::test]
async fn test_me_structured_hides_other_failures() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json("GET", "/v1/me", 503, r#"{"error":{"message":"maintenance"}}"#)
        .await;

    let me = fixture.client().me().await.unwrap();

    assert_eq!(me.status, MeStatus::Error);
    assert_eq!(me.error.as_deref(), Some("Internal server error"));
}

#[tokio::test]
async fn test_me_propagate_returns_errors() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json("GET", "/v1/me", 401, "{}")
        .await;

    let err = fixture
        .client_with_policy(MeErrorPolicy::Propagate)
        .me()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.message(), "Invalid API key");
}

#[tokio::test]
async fn test_me_success_with_unexpected_body() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json("GET", "/v1/me", 200, r#"{"organization":"Acme"}"#)
        .await;

    let me = fixture.client().me().await.unwrap();
    assert_eq!(me.status, MeStatus::Error);
    assert_eq!(me.error.as_deref(), Some("Internal server error"));

    let err = fixture
        .client_with_policy(MeErrorPolicy::Propagate)
        .me()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ApiError);
    assert!(err.message().starts_with("Invalid response data: "));
    assert_eq!(err.context().details.as_deref(), Some(r#"{"organization":"Acme"}"#));
}
