//! Session persistence in the system keyring
//!
//! The API client never persists credentials; the CLI keeps the session it
//! returns in the OS credential store (GNOME Keyring, KDE Wallet, macOS
//! Keychain) as JSON. Sessions are keyed by API URL, so switching servers
//! in the config does not reuse a foreign token.

use anyhow::{Context, Result};
use lens_core::domain::connection::Session;
use tracing::{debug, info};

/// Keyring service name for stored sessions
const KEYRING_SERVICE: &str = "lens";

/// Stores, loads and clears the session for one API server
pub struct KeyringSessionStore {
    account: String,
}

impl KeyringSessionStore {
    pub fn new(api_url: &str) -> Self {
        Self {
            account: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry> {
        keyring::Entry::new(KEYRING_SERVICE, &self.account)
            .context("Failed to create keyring entry")
    }

    pub fn store(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string(session).context("Failed to serialize session")?;
        self.entry()?
            .set_password(&json)
            .context("Failed to store session in keyring")?;
        debug!(account = %self.account, "Stored session in keyring");
        Ok(())
    }

    /// `None` when no session was stored for this server
    pub fn load(&self) -> Result<Option<Session>> {
        match self.entry()?.get_password() {
            Ok(json) => {
                let session: Session = serde_json::from_str(&json)
                    .context("Failed to deserialize session from keyring")?;
                debug!(account = %self.account, "Loaded session from keyring");
                Ok(Some(session))
            }
            Err(keyring::Error::NoEntry) => {
                debug!(account = %self.account, "No session in keyring");
                Ok(None)
            }
            Err(e) => Err(anyhow::Error::new(e).context("Failed to read from keyring")),
        }
    }

    pub fn clear(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) => {
                info!(account = %self.account, "Cleared session from keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => {
                debug!(account = %self.account, "No session to clear");
                Ok(())
            }
            Err(e) => Err(anyhow::Error::new(e).context("Failed to delete from keyring")),
        }
    }
}
