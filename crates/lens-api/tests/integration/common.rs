//! Shared test helpers for Lens API integration tests
//!
//! Provides wiremock-based mock server setup and clients in each of the
//! credential states the client can start in.

use lens_api::LensClient;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use lens_core::domain::connection::{Credentials, Session};
use lens_core::domain::records::User;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Token returned by the mocked authentication endpoint
pub const ACCESS_TOKEN: &str = "test-access-token";

/// An address nothing listens on
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

pub fn test_user() -> User {
    User {
        id: "user-test-001".to_string(),
        email: Some("ada@example.com".to_string()),
        name: Some("Ada Lovelace".to_string()),
        tier: Some("Peer".to_string()),
        ..Default::default()
    }
}

pub fn session_credentials(token: &str) -> Credentials {
    Credentials::Session(Session {
        access_token: token.to_string(),
        user: test_user(),
    })
}

pub fn password_credentials() -> Credentials {
    Credentials::Password {
        email: "ada@example.com".to_string(),
        password: "correct horse".to_string(),
    }
}

/// Starts a mock server and returns a client holding a session for it.
pub async fn setup_lens_mock() -> (MockServer, LensClient) {
    let server = MockServer::start().await;
    let client = LensClient::with_base_url(server.uri(), session_credentials(ACCESS_TOKEN));
    (server, client)
}

/// Starts a mock server and returns a client holding only a password.
pub async fn setup_password_client() -> (MockServer, LensClient) {
    let server = MockServer::start().await;
    let client = LensClient::with_base_url(server.uri(), password_credentials());
    (server, client)
}

/// Mounts the authentication endpoint, expecting exactly `times` calls.
pub async fn mount_auth(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "accessToken": ACCESS_TOKEN,
            "authentication": {"strategy": "local"},
            "user": {
                "_id": "user-test-001",
                "email": "ada@example.com",
                "name": "Ada Lovelace",
                "tier": "Solo"
            }
        })))
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts the API root used as the connectivity probe.
pub async fn mount_root(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Lens API"))
        .mount(server)
        .await;
}

/// A paginated list body as returned by the API.
pub fn page(data: serde_json::Value) -> serde_json::Value {
    let total = data.as_array().map(|a| a.len()).unwrap_or(0);
    serde_json::json!({
        "total": total,
        "limit": 50,
        "skip": 0,
        "data": data
    })
}

/// Matches requests that carry no `Authorization` header.
pub fn no_authorization(request: &Request) -> bool {
    !request.headers.contains_key("authorization")
}

/// Matches requests without a query string.
pub fn no_query(request: &Request) -> bool {
    request.url.query().is_none()
}

/// Starts a server that answers the API root but hangs up on every other
/// request without responding. Returns its base URL.
pub async fn spawn_hangup_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                if buf[..n].starts_with(b"GET / ") {
                    let _ = socket
                        .write_all(
                            b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                        )
                        .await;
                }
            });
        }
    });
    format!("http://{addr}")
}
