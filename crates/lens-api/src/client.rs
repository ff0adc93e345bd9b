//! Lens API HTTP client
//!
//! [`LensClient`] owns the HTTP connection pool, the service endpoints and
//! the [`ConnectionState`]. Every request goes through [`LensClient::execute`],
//! which enforces the offline guard, injects the standard headers and maps
//! HTTP statuses onto [`LensError`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lens_api::{LensClient, Params};
//! use lens_core::config::ApiConfig;
//! use lens_core::domain::connection::Credentials;
//!
//! # async fn example() -> Result<(), lens_api::LensError> {
//! let credentials = Credentials::Password {
//!     email: "ada@example.com".into(),
//!     password: "secret".into(),
//! };
//! let mut client = LensClient::new(&ApiConfig::default(), credentials);
//! let models = client.get_models(Params::new()).await?;
//! println!("{} models", models.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use lens_core::config::ApiConfig;
use lens_core::domain::connection::{ConnStatus, ConnectionEvent, ConnectionState, Credentials};
use lens_core::domain::errors::LensError;
use lens_core::domain::records::ListPage;
use lens_core::ports::IConnectionObserver;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn, Level};

use crate::query::Params;

/// Endpoint exchanging email and password for a session
pub(crate) const AUTH_ENDPOINT: &str = "authentication";

/// Header carrying the caller's declared origin
pub const SOURCE_HEADER: &str = "X-Lens-Source";

/// Header carrying the caller's protocol version
pub const VERSION_HEADER: &str = "X-Lens-Version";

/// Body of an outgoing request
pub(crate) enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Form),
}

/// What was sent, for failure diagnostics
#[derive(Clone, Copy)]
pub(crate) struct CallData<'a> {
    pub method: &'a Method,
    pub target: &'a str,
    pub params: &'a Params,
}

/// HTTP client for the Lens REST API
///
/// Operations are `async` but strictly sequential: methods take `&mut self`
/// because any call may authenticate or re-probe connectivity and so
/// mutate the connection state.
pub struct LensClient {
    /// The underlying HTTP client
    http: Client,
    /// Base URL for API requests, without a trailing slash
    base_url: String,
    /// URL of the Lens web application
    pub(crate) lens_url: String,
    /// `X-Lens-Source` header value
    source: String,
    /// `X-Lens-Version` header value
    version: String,
    /// Connection state machine and held credentials
    pub(crate) connection: ConnectionState,
}

impl LensClient {
    /// Creates a client from the API configuration and the host's credentials
    ///
    /// A session in `credentials` yields a connected client; an email and
    /// password yield a logged-out client that authenticates on first use.
    pub fn new(config: &ApiConfig, credentials: Credentials) -> Self {
        Self {
            http: Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            lens_url: config.lens_url.clone(),
            source: config.source.clone(),
            version: config.version.clone(),
            connection: ConnectionState::new(credentials),
        }
    }

    /// Creates a client with a custom base URL and default identification
    /// (useful for testing)
    pub fn with_base_url(base_url: impl Into<String>, credentials: Credentials) -> Self {
        let config = ApiConfig {
            api_url: base_url.into(),
            ..ApiConfig::default()
        };
        Self::new(&config, credentials)
    }

    /// Registers the observer notified on every connection transition
    pub fn set_observer(&mut self, observer: Arc<dyn IConnectionObserver>) {
        self.connection.set_observer(observer);
    }

    /// Returns the base URL for API requests
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the connection state without probing
    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    /// Probes the service and returns the resulting status
    ///
    /// This is an active check: a cached `Connected` is never returned when
    /// the service cannot be reached now.
    pub async fn get_status(&mut self) -> ConnStatus {
        self.probe().await
    }

    /// Whether a session is held. The client may still be disconnected.
    pub fn is_logged_in(&self) -> bool {
        self.connection.is_logged_in()
    }

    /// Whether a session is held and the last probe reached the service
    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Calls the API root and feeds the outcome to the state machine
    ///
    /// Any HTTP response counts as reachable; only a request that gets no
    /// response at all marks the client disconnected.
    pub(crate) async fn probe(&mut self) -> ConnStatus {
        let url = format!("{}/", self.base_url);
        let event = match self.http.get(&url).send().await {
            Ok(_) => ConnectionEvent::ProbeSucceeded,
            Err(e) => {
                debug!(error = %e, "Connectivity probe failed");
                ConnectionEvent::ProbeFailed
            }
        };
        self.connection.apply(event)
    }

    /// Fails with [`LensError::Offline`] when disconnected and a fresh probe
    /// still cannot reach the service
    pub(crate) async fn ensure_online(&mut self) -> Result<(), LensError> {
        if self.connection.status() == ConnStatus::Disconnected
            && self.probe().await == ConnStatus::Disconnected
        {
            return Err(LensError::Offline);
        }
        Ok(())
    }

    /// Classifies a request that got no response: offline if a probe
    /// confirms it, a connection error otherwise
    pub(crate) async fn classify_send_error(&mut self, error: reqwest::Error) -> LensError {
        if self.probe().await == ConnStatus::Disconnected {
            LensError::Offline
        } else {
            LensError::Connection(error.to_string())
        }
    }

    /// Returns the underlying HTTP client, for requests to absolute URLs
    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Joins an endpoint onto the base URL
    pub(crate) fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Sends one request and maps the response
    ///
    /// The bearer token is attached when held, except for the
    /// authentication endpoint itself.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &mut self,
        method: Method,
        endpoint: &str,
        params: &Params,
        body: RequestBody,
    ) -> Result<T, LensError> {
        self.ensure_online().await?;

        let url = self.endpoint_url(endpoint);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json")
            .header(SOURCE_HEADER, self.source.as_str())
            .header(VERSION_HEADER, self.version.as_str());
        if endpoint != AUTH_ENDPOINT {
            if let Some(token) = self.connection.access_token() {
                request = request.bearer_auth(token);
            }
        }
        if !params.is_empty() {
            request = request.query(params.as_pairs());
        }
        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Multipart(form) => request.multipart(form),
        };

        debug!(%method, endpoint, "Sending request");
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, endpoint, error = %e, "Request got no response");
                return Err(self.classify_send_error(e).await);
            }
        };

        let call = CallData {
            method: &method,
            target: endpoint,
            params,
        };
        read_json(call, response).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &mut self,
        endpoint: &str,
        params: &Params,
    ) -> Result<T, LensError> {
        self.execute(Method::GET, endpoint, params, RequestBody::Empty)
            .await
    }

    /// GETs a paginated endpoint and returns the `data` array
    pub(crate) async fn list<T: DeserializeOwned>(
        &mut self,
        endpoint: &str,
        params: &Params,
    ) -> Result<Vec<T>, LensError> {
        let page: ListPage<T> = self.get(endpoint, params).await?;
        Ok(page.data)
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &mut self,
        endpoint: &str,
        body: RequestBody,
    ) -> Result<T, LensError> {
        self.execute(Method::POST, endpoint, &Params::new(), body)
            .await
    }

    pub(crate) async fn patch<T: DeserializeOwned>(
        &mut self,
        endpoint: &str,
        payload: Value,
    ) -> Result<T, LensError> {
        self.execute(
            Method::PATCH,
            endpoint,
            &Params::new(),
            RequestBody::Json(payload),
        )
        .await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &mut self,
        endpoint: &str,
    ) -> Result<T, LensError> {
        self.execute(Method::DELETE, endpoint, &Params::new(), RequestBody::Empty)
            .await
    }
}

/// Reads a response and decodes a 200/201 body as JSON
async fn read_json<T: DeserializeOwned>(
    call: CallData<'_>,
    response: Response,
) -> Result<T, LensError> {
    let status = response.status();
    let content_type = content_type(&response);
    let body = response
        .text()
        .await
        .map_err(|e| LensError::Connection(e.to_string()))?;

    match status {
        StatusCode::OK | StatusCode::CREATED => serde_json::from_str(&body).map_err(|e| {
            dump_failure(call, status, &content_type, &body);
            LensError::InvalidResponse(format!("{}: {e}", call.target))
        }),
        _ => Err(status_error(call, status, &content_type, &body)),
    }
}

pub(crate) fn content_type(response: &Response) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Maps a non-success status onto the error taxonomy
///
/// 401 from the authentication endpoint means the credentials were
/// rejected; anywhere else it means the session is not accepted.
pub(crate) fn status_error(
    call: CallData<'_>,
    status: StatusCode,
    content_type: &str,
    body: &str,
) -> LensError {
    dump_failure(call, status, content_type, body);
    match status {
        StatusCode::UNAUTHORIZED if call.target == AUTH_ENDPOINT => {
            LensError::Authentication("Invalid credentials".to_string())
        }
        StatusCode::UNAUTHORIZED => LensError::Authentication("Not authenticated".to_string()),
        StatusCode::NOT_FOUND => LensError::NotFound {
            endpoint: call.target.to_string(),
        },
        _ => LensError::Request {
            status: status.as_u16(),
            message: server_message(body),
        },
    }
}

/// Extracts the `message` field of a JSON error body
fn server_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_default()
}

/// Logs what was sent and what came back, only when debug logging is on
fn dump_failure(call: CallData<'_>, status: StatusCode, content_type: &str, body: &str) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    debug!(
        method = %call.method,
        target = call.target,
        params = ?call.params.as_pairs(),
        status = status.as_u16(),
        content_type,
        body,
        "Request failed"
    );
    if content_type.starts_with("application/json") {
        if let Ok(json) = serde_json::from_str::<Value>(body) {
            debug!(json = %json, "Response body (JSON)");
        }
    }
}
