//! Shared command context: configuration, stored session and API client

use std::path::Path;

use anyhow::{bail, Context, Result};
use lens_api::{ApiCallResult, LensClient, LensError};
use lens_core::config::Config;
use lens_core::domain::connection::Credentials;
use tracing::warn;

use crate::session::KeyringSessionStore;

pub struct AppContext {
    pub config: Config,
    pub sessions: KeyringSessionStore,
}

impl AppContext {
    /// Loads the configuration from `path`, or the default location
    ///
    /// An explicit path must exist and parse; the default location falls
    /// back to built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::load_or_default(&Config::default_path()),
        };

        let errors = config.validate();
        if !errors.is_empty() {
            let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
            bail!("Invalid configuration: {}", details.join("; "));
        }

        let sessions = KeyringSessionStore::new(&config.api.api_url);
        Ok(Self { config, sessions })
    }

    /// A client holding the stored session, or no credentials
    ///
    /// An unreadable keyring is reported and treated as logged out.
    pub fn client(&self) -> LensClient {
        let credentials = match self.sessions.load() {
            Ok(Some(session)) => Credentials::Session(session),
            Ok(None) => Credentials::None,
            Err(e) => {
                warn!(error = %e, "Could not read stored session");
                Credentials::None
            }
        };
        LensClient::new(&self.config.api, credentials)
    }

    /// A client that will log in with an email and password
    pub fn password_client(&self, email: String, password: String) -> LensClient {
        LensClient::new(&self.config.api, Credentials::Password { email, password })
    }
}

/// Converts an API failure into a user-facing error with a hint
pub fn api_error(err: LensError, action: &str) -> anyhow::Error {
    let hint = match ApiCallResult::from(&err) {
        ApiCallResult::Disconnected => " (is the Lens service reachable?)",
        ApiCallResult::NotLoggedIn => " (run 'lens auth login' first)",
        ApiCallResult::PermissionIssue => " (session rejected; run 'lens auth login' again)",
        ApiCallResult::GeneralError | ApiCallResult::Ok => "",
    };
    anyhow::Error::new(err).context(format!("Failed to {action}{hint}"))
}
