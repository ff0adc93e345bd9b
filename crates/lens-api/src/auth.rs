//! Email/password authentication and user accessors
//!
//! The client exchanges the stored email and password for a bearer token at
//! the `authentication` endpoint. Protected operations call
//! [`LensClient::require_auth`] first, so a client built from a password
//! authenticates lazily on its first protected call.
//!
//! Failures are never retried here; the caller decides whether to prompt
//! for new credentials.

use lens_core::domain::connection::{ConnectionEvent, Session};
use lens_core::domain::errors::LensError;
use lens_core::domain::records::User;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::client::{LensClient, RequestBody, AUTH_ENDPOINT};

/// Display name used when nobody is logged in
pub const LOCAL_USER_NAME: &str = "Local";

/// Subscription tier with a single seat
const SOLO_TIER: &str = "Solo";

/// Response of the `authentication` endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    access_token: String,
    user: User,
}

impl LensClient {
    /// Exchanges the stored email and password for a session
    ///
    /// # Errors
    /// - [`LensError::LoggedOut`] if no email and password are held
    /// - [`LensError::Authentication`] if the server rejects the credentials
    /// - [`LensError::Offline`] / [`LensError::Connection`] on network failure
    pub async fn authenticate(&mut self) -> Result<(), LensError> {
        let payload = match self.connection.password_login() {
            Some((email, password)) => json!({
                "strategy": "local",
                "email": email,
                "password": password,
            }),
            None => return Err(LensError::LoggedOut),
        };

        let response: AuthResponse = self
            .post(AUTH_ENDPOINT, RequestBody::Json(payload))
            .await?;
        info!(user_id = %response.user.id, "Authenticated with Lens");

        self.connection
            .apply(ConnectionEvent::Authenticated(Session {
                access_token: response.access_token,
                user: response.user,
            }));
        Ok(())
    }

    /// Authenticates first when no token is held
    ///
    /// Called at the top of every protected operation.
    pub(crate) async fn require_auth(&mut self) -> Result<(), LensError> {
        if self.connection.access_token().is_none() {
            self.authenticate().await?;
        }
        Ok(())
    }

    /// Clears all credentials and transitions to logged out
    pub fn logout(&mut self) {
        self.connection.apply(ConnectionEvent::LoggedOut);
        info!("Logged out of Lens");
    }

    /// The current session, for the host to persist
    pub fn session(&self) -> Option<&Session> {
        self.connection.session()
    }

    /// The logged-in user's name, or "Local" when logged out
    pub fn user_display_name(&self) -> String {
        self.connection
            .user()
            .and_then(|user| user.name.clone())
            .unwrap_or_else(|| LOCAL_USER_NAME.to_string())
    }

    /// The logged-in user, authenticating first if needed
    pub async fn user(&mut self) -> Result<User, LensError> {
        self.require_auth().await?;
        self.connection.user().cloned().ok_or(LensError::LoggedOut)
    }

    /// Whether the logged-in user is on the single-seat tier
    pub async fn is_user_solo(&mut self) -> Result<bool, LensError> {
        let user = self.user().await?;
        Ok(user.tier.as_deref() == Some(SOLO_TIER))
    }

    /// URL of the Lens web application, available to logged-in users only
    pub async fn lens_url(&mut self) -> Result<String, LensError> {
        self.require_auth().await?;
        Ok(self.lens_url.clone())
    }
}
