//! Integration tests for connectivity probing and the offline guard

use std::sync::{Arc, Mutex};

use lens_api::{capture, ApiCallResult, LensClient, LensError, Params};
use lens_core::domain::connection::{ConnStatus, Credentials};
use lens_core::ports::IConnectionObserver;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[derive(Default)]
struct RecordingObserver {
    seen: Mutex<Vec<ConnStatus>>,
}

impl IConnectionObserver for RecordingObserver {
    fn on_status_changed(&self, status: ConnStatus) {
        self.seen.lock().unwrap().push(status);
    }
}

#[tokio::test]
async fn test_get_status_probes_and_reports_connected() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.get_status().await, ConnStatus::Connected);
}

#[tokio::test]
async fn test_get_status_without_session_is_logged_out() {
    let (server, mut client) = common::setup_password_client().await;
    common::mount_root(&server).await;

    assert_eq!(client.get_status().await, ConnStatus::LoggedOut);
}

#[tokio::test]
async fn test_any_http_answer_counts_as_online() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert_eq!(client.get_status().await, ConnStatus::Connected);
}

#[tokio::test]
async fn test_get_status_never_returns_stale_connected() {
    let mut client = LensClient::with_base_url(
        common::UNREACHABLE_URL,
        common::session_credentials(common::ACCESS_TOKEN),
    );
    assert_eq!(client.connection().status(), ConnStatus::Connected);

    assert_eq!(client.get_status().await, ConnStatus::Disconnected);
    assert!(client.is_logged_in());
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_unreachable_service_yields_offline() {
    let mut client = LensClient::with_base_url(
        common::UNREACHABLE_URL,
        common::session_credentials(common::ACCESS_TOKEN),
    );

    let err = client.get_models(Params::new()).await.unwrap_err();
    assert!(matches!(err, LensError::Offline), "got {err:?}");
    assert_eq!(client.connection().status(), ConnStatus::Disconnected);

    // Still disconnected: the guard re-probes once and fails before sending
    let err = client.get_model("m1").await.unwrap_err();
    assert!(matches!(err, LensError::Offline), "got {err:?}");
}

#[tokio::test]
async fn test_disconnected_client_recovers_when_service_returns() {
    let reserved = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = reserved.local_addr().expect("local addr");
    drop(reserved);

    let mut client = LensClient::with_base_url(
        format!("http://{addr}"),
        common::session_credentials(common::ACCESS_TOKEN),
    );
    assert_eq!(client.get_status().await, ConnStatus::Disconnected);

    let listener = std::net::TcpListener::bind(addr).expect("rebind");
    let server = wiremock::MockServer::builder().listener(listener).start().await;
    common::mount_root(&server).await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::page(serde_json::json!([
                {"_id": "m1", "custFileName": "bracket.FCStd", "updatedAt": 1}
            ]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let models = client.get_models(Params::new()).await.expect("models");

    assert_eq!(models.len(), 1);
    assert_eq!(models[0].id, "m1");
    assert_eq!(client.connection().status(), ConnStatus::Connected);
}

#[tokio::test]
async fn test_hangup_while_service_online_is_connection_error() {
    let base_url = common::spawn_hangup_server().await;
    let mut client =
        LensClient::with_base_url(base_url, common::session_credentials(common::ACCESS_TOKEN));

    let err = client.get_models(Params::new()).await.unwrap_err();

    assert!(matches!(err, LensError::Connection(_)), "got {err:?}");
    assert_eq!(client.connection().status(), ConnStatus::Connected);
}

#[tokio::test]
async fn test_capture_offline_returns_disconnected() {
    let mut client = LensClient::with_base_url(
        common::UNREACHABLE_URL,
        common::session_credentials(common::ACCESS_TOKEN),
    );

    let (value, result) = capture(client.get_workspaces(Params::new())).await;
    assert!(value.is_none());
    assert_eq!(result, ApiCallResult::Disconnected);
}

#[tokio::test]
async fn test_capture_logged_out_returns_not_logged_in() {
    let server = wiremock::MockServer::start().await;
    let mut client = LensClient::with_base_url(server.uri(), Credentials::None);

    let (value, result) = capture(client.get_organizations(Params::new())).await;
    assert!(value.is_none());
    assert_eq!(result, ApiCallResult::NotLoggedIn);
}

#[tokio::test]
async fn test_observer_notified_on_every_transition() {
    let observer = Arc::new(RecordingObserver::default());
    let (server, mut client) = common::setup_password_client().await;
    client.set_observer(observer.clone());
    common::mount_root(&server).await;
    common::mount_auth(&server, 1).await;

    client.get_status().await;
    client.authenticate().await.expect("authenticate");
    client.get_status().await;
    client.logout();

    let seen = observer.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            ConnStatus::LoggedOut,
            ConnStatus::Connected,
            ConnStatus::Connected,
            ConnStatus::LoggedOut,
        ]
    );
}
