//! Domain error types
//!
//! [`LensError`] is the closed taxonomy of failures the Lens API client can
//! report. [`DomainError`] covers validation of domain values.

use thiserror::Error;

/// Failures reported by the Lens API client
///
/// Each variant carries its own context. Callers that only need a coarse
/// outcome can use `lens_api::call_result` to fold these into an
/// `ApiCallResult`.
#[derive(Debug, Error)]
pub enum LensError {
    /// The user is logged in but the server refused the request (HTTP 401),
    /// or the credentials sent to the authentication endpoint were rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The request could not reach the server although the service is online
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server rejected the request with a status other than 401/404
    #[error("API request failed with status code {status}: {message}")]
    Request {
        /// HTTP status code returned by the server
        status: u16,
        /// The `message` field of the JSON error body (empty when absent)
        message: String,
    },

    /// The operation needs credentials and none are held
    #[error("Not logged in")]
    LoggedOut,

    /// A connectivity probe confirmed that the service is unreachable
    #[error("Disconnected from service")]
    Offline,

    /// The server answered 404 for the endpoint
    #[error("Item not found: {endpoint}")]
    NotFound {
        /// The endpoint that was requested
        endpoint: String,
    },

    /// The response body could not be decoded into the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Local file access failed while transferring a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LensError {
    /// Returns true if this error came from an HTTP status the server sent
    pub fn is_server_response(&self) -> bool {
        matches!(
            self,
            LensError::Authentication(_) | LensError::Request { .. } | LensError::NotFound { .. }
        )
    }

    /// Returns the HTTP status code associated with the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LensError::Request { status, .. } => Some(*status),
            LensError::NotFound { .. } => Some(404),
            LensError::Authentication(_) => Some(401),
            _ => None,
        }
    }
}

/// Errors that can occur while validating domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid unique storage file name
    #[error("Invalid unique file name: {0}")]
    InvalidUniqueName(String),

    /// Unknown workspace kind in a workspace descriptor
    #[error("Unknown workspace type: {0}")]
    UnknownWorkspaceKind(String),
}
