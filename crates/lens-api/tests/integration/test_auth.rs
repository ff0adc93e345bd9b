//! Integration tests for lazy authentication and request headers

use lens_api::{LensClient, LensError, Params};
use lens_core::domain::connection::{ConnStatus, Credentials};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_password_client_authenticates_once() {
    let (server, mut client) = common::setup_password_client().await;
    common::mount_auth(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("authorization", "Bearer test-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page(json!([]))))
        .expect(2)
        .mount(&server)
        .await;

    assert_eq!(client.connection().status(), ConnStatus::LoggedOut);
    client.get_models(Params::new()).await.expect("first list");
    client.get_models(Params::new()).await.expect("second list");

    assert_eq!(client.connection().status(), ConnStatus::Connected);
    let session = client.session().expect("session after login");
    assert_eq!(session.access_token, common::ACCESS_TOKEN);
    assert_eq!(session.user.id, "user-test-001");
}

#[tokio::test]
async fn test_authentication_request_carries_no_bearer_token() {
    let (server, mut client) = common::setup_password_client().await;
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .and(common::no_authorization)
        .and(body_partial_json(json!({
            "strategy": "local",
            "email": "ada@example.com",
            "password": "correct horse"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "accessToken": common::ACCESS_TOKEN,
            "user": {"_id": "user-test-001"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.authenticate().await.expect("authenticate");
    assert!(client.is_logged_in());
}

#[tokio::test]
async fn test_rejected_credentials_report_invalid_credentials() {
    let (server, mut client) = common::setup_password_client().await;
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "name": "NotAuthenticated",
            "message": "Invalid login",
            "code": 401
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.get_workspaces(Params::new()).await.unwrap_err();
    match err {
        LensError::Authentication(message) => assert_eq!(message, "Invalid credentials"),
        other => panic!("expected Authentication, got {other:?}"),
    }
    assert_eq!(client.connection().status(), ConnStatus::LoggedOut);
    assert!(client.session().is_none());
}

#[tokio::test]
async fn test_expired_session_is_not_reauthenticated() {
    let (server, mut client) = common::setup_lens_mock().await;
    common::mount_auth(&server, 0).await;
    Mock::given(method("GET"))
        .and(path("/workspaces"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "jwt expired"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.get_workspaces(Params::new()).await.unwrap_err();
    match err {
        LensError::Authentication(message) => assert_eq!(message, "Not authenticated"),
        other => panic!("expected Authentication, got {other:?}"),
    }
}

#[tokio::test]
async fn test_no_credentials_fails_without_requests() {
    let server = wiremock::MockServer::start().await;
    let mut client = LensClient::with_base_url(server.uri(), Credentials::None);

    let err = client.get_files(Params::new()).await.unwrap_err();
    assert!(matches!(err, LensError::LoggedOut), "got {err:?}");

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_public_operations_skip_authentication() {
    let (server, mut client) = common::setup_password_client().await;
    common::mount_auth(&server, 0).await;
    Mock::given(method("GET"))
        .and(path("/shared-models"))
        .and(common::no_authorization)
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page(json!([]))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/keywords"))
        .and(common::no_authorization)
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page(json!([]))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/organizations"))
        .and(common::no_authorization)
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page(json!([
            {"_id": "org-ondsel", "name": "Ondsel", "type": "Ondsel"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.get_public_share_links().await.expect("gallery").is_empty());
    assert!(client.get_search_results("gear", None).await.expect("search").is_empty());
    let org = client.get_default_organization().await.expect("default org");
    assert_eq!(org.id, "org-ondsel");
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn test_requests_identify_the_client() {
    let server = wiremock::MockServer::start().await;
    let config = lens_core::config::ConfigBuilder::new()
        .api_url(server.uri())
        .source("lens-tests")
        .version("9.9.9")
        .build();
    let mut client = LensClient::new(&config.api, common::session_credentials(common::ACCESS_TOKEN));

    Mock::given(method("GET"))
        .and(path("/models/m1"))
        .and(header("accept", "application/json"))
        .and(header("x-lens-source", "lens-tests"))
        .and(header("x-lens-version", "9.9.9"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "m1",
            "custFileName": "bracket.FCStd"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let model = client.get_model("m1").await.expect("model");
    assert_eq!(model.cust_file_name, "bracket.FCStd");
}

#[tokio::test]
async fn test_user_accessors_after_login() {
    let (server, mut client) = common::setup_password_client().await;
    common::mount_auth(&server, 1).await;

    assert!(client.is_user_solo().await.expect("solo check"));
    assert_eq!(client.user_display_name(), "Ada Lovelace");
    let user = client.user().await.expect("user");
    assert_eq!(user.email.as_deref(), Some("ada@example.com"));
    assert!(client.lens_url().await.is_ok());
}
