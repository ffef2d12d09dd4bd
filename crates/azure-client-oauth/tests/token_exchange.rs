//! Token endpoint exchanges against a mock identity provider.

#![allow(clippy::unwrap_used)]

mod common;

use azure_client_oauth::{Error, ErrorBody};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::token_client;

#[tokio::test]
async fn test_exchange_code_posts_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/common/oauth2/v2.0/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains(
            "client_id=cid&client_secret=secret&code=abc123&redirect_uri=http%3A%2F%2Flocalhost%2F&grant_type=authorization_code",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "at1",
            "refresh_token": "rt1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = token_client(&server)
        .exchange_code("cid", "secret", "abc123", "common", "http://localhost/")
        .await
        .unwrap();

    assert_eq!(tokens.access_token, "at1");
    assert_eq!(tokens.refresh_token, "rt1");
}

#[tokio::test]
async fn test_exchange_code_without_refresh_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/common/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "at1"})))
        .mount(&server)
        .await;

    let tokens = token_client(&server)
        .exchange_code("cid", "secret", "abc123", "common", "http://localhost/")
        .await
        .unwrap();

    assert_eq!(tokens.access_token, "at1");
    assert_eq!(tokens.refresh_token, "");
}

#[tokio::test]
async fn test_refresh_posts_refresh_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/organizations/oauth2/v2.0/token"))
        .and(body_string_contains("refresh_token=rt0"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "at2",
            "refresh_token": "rt2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = token_client(&server)
        .refresh("cid", "secret", "rt0", "organizations", "http://localhost/")
        .await
        .unwrap();

    assert_eq!(tokens.access_token, "at2");
    assert_eq!(tokens.refresh_token, "rt2");
}

#[tokio::test]
async fn test_refresh_requires_refresh_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "at2"})))
        .mount(&server)
        .await;

    let err = token_client(&server)
        .refresh("cid", "secret", "rt0", "common", "http://localhost/")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MissingField("refresh_token")));
}

#[tokio::test]
async fn test_provider_error_standard_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "bad code"
        })))
        .mount(&server)
        .await;

    let err = token_client(&server)
        .exchange_code("cid", "secret", "expired", "common", "http://localhost/")
        .await
        .unwrap_err();

    let provider = match err {
        Error::Provider(provider) => provider,
        other => panic!("expected a provider error, got {other}"),
    };
    assert_eq!(provider.status, 400);
    assert_eq!(provider.reason, "Bad Request");
    assert_eq!(provider.error(), "invalid_grant");
    assert_eq!(provider.error_description(), "bad code");
}

#[tokio::test]
async fn test_provider_error_nested_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": "InvalidAuthenticationToken", "message": "Token expired"}
        })))
        .mount(&server)
        .await;

    let err = token_client(&server)
        .refresh("cid", "secret", "rt0", "common", "http://localhost/")
        .await
        .unwrap_err();

    let provider = match err {
        Error::Provider(provider) => provider,
        other => panic!("expected a provider error, got {other}"),
    };
    assert_eq!(provider.status, 401);
    assert_eq!(
        provider.body,
        ErrorBody::Nested {
            code: "InvalidAuthenticationToken".into(),
            message: "Token expired".into(),
        }
    );
}

#[tokio::test]
async fn test_provider_error_unparseable_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = token_client(&server)
        .refresh("cid", "secret", "rt0", "common", "http://localhost/")
        .await
        .unwrap_err();

    let provider = match err {
        Error::Provider(provider) => provider,
        other => panic!("expected a provider error, got {other}"),
    };
    assert_eq!(provider.status, 502);
    assert_eq!(provider.error(), "");
    assert_eq!(provider.error_description(), "upstream unavailable");
}

#[tokio::test]
async fn test_success_with_invalid_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = token_client(&server)
        .exchange_code("cid", "secret", "abc", "common", "http://localhost/")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Json(_)));
}
