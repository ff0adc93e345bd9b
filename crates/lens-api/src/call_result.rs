//! Tri-state call results
//!
//! Some call sites only need to know whether an operation worked and, if
//! not, whether to show "offline", "log in" or "no permission". [`capture`]
//! runs one operation and folds its [`LensError`] into an [`ApiCallResult`].

use std::fmt;
use std::future::Future;

use lens_core::domain::errors::LensError;
use tracing::error;

/// Coarse outcome of one API call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCallResult {
    /// The call succeeded
    Ok,
    /// The service could not be reached
    Disconnected,
    /// The call needs a login and none is held
    NotLoggedIn,
    /// The server refused the session
    PermissionIssue,
    /// Anything else; already logged
    GeneralError,
}

impl From<&LensError> for ApiCallResult {
    fn from(err: &LensError) -> Self {
        match err {
            LensError::Offline => ApiCallResult::Disconnected,
            LensError::LoggedOut => ApiCallResult::NotLoggedIn,
            LensError::Authentication(_) => ApiCallResult::PermissionIssue,
            _ => ApiCallResult::GeneralError,
        }
    }
}

impl fmt::Display for ApiCallResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApiCallResult::Ok => "ok",
            ApiCallResult::Disconnected => "disconnected",
            ApiCallResult::NotLoggedIn => "not logged in",
            ApiCallResult::PermissionIssue => "permission issue",
            ApiCallResult::GeneralError => "error",
        };
        write!(f, "{}", s)
    }
}

/// Awaits `operation` and returns its value with the outcome
///
/// Never fails: the value is `None` whenever the result is not
/// [`ApiCallResult::Ok`]. Permission issues and unexpected failures are
/// logged at `error`.
///
/// ```rust,no_run
/// # async fn example(client: &mut lens_api::LensClient) {
/// use lens_api::{capture, ApiCallResult};
///
/// let (org, result) = capture(client.get_organization("org-1")).await;
/// if result == ApiCallResult::Ok {
///     println!("{:?}", org);
/// }
/// # }
/// ```
pub async fn capture<T, F>(operation: F) -> (Option<T>, ApiCallResult)
where
    F: Future<Output = Result<T, LensError>>,
{
    match operation.await {
        Ok(value) => (Some(value), ApiCallResult::Ok),
        Err(err) => {
            let result = ApiCallResult::from(&err);
            if matches!(
                result,
                ApiCallResult::PermissionIssue | ApiCallResult::GeneralError
            ) {
                error!(error = %err, outcome = %result, "API call failed");
            }
            (None, result)
        }
    }
}
