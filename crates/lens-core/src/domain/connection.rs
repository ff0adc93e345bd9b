//! Connection state machine
//!
//! Tracks whether the client is logged out, connected, or disconnected, and
//! which credentials it holds. All mutation goes through
//! [`ConnectionState::apply`], which also notifies the registered
//! [`IConnectionObserver`].
//!
//! ## State Machine
//!
//! ```text
//!                 Authenticated
//!   ┌───────────┐ ────────────► ┌───────────┐
//!   │ LoggedOut │               │ Connected │
//!   └───────────┘ ◄──────────── └───────────┘
//!        ▲   ▲       LoggedOut       │  ▲
//!        │   │                       │  │ ProbeSucceeded (token held)
//!        │   │        ProbeFailed    ▼  │
//!        │   │                  ┌──────────────┐
//!        │   └───────────────── │ Disconnected │
//!        │  ProbeSucceeded      └──────────────┘
//!        │  (no token)
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::records::User;
use crate::ports::connection_observer::IConnectionObserver;

/// Connection status of a client instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnStatus {
    /// No session held
    LoggedOut,
    /// Session held and the service answered the last probe
    Connected,
    /// The last probe could not reach the service
    Disconnected,
}

impl fmt::Display for ConnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnStatus::LoggedOut => write!(f, "logged out"),
            ConnStatus::Connected => write!(f, "connected"),
            ConnStatus::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// An authenticated session: the bearer token and the user it belongs to
#[derive(Clone, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token sent in the `Authorization` header
    pub access_token: String,
    /// User record returned by the authentication endpoint
    pub user: User,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("user", &self.user.id)
            .finish()
    }
}

/// Credentials held by the client
#[derive(Clone, Default)]
pub enum Credentials {
    /// Nothing held; only public operations are possible
    #[default]
    None,
    /// Email and password that can be exchanged for a session
    Password {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },
    /// A session obtained earlier, either by this client or by the host
    Session(Session),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::None => write!(f, "None"),
            Credentials::Password { email, .. } => f
                .debug_struct("Password")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::Session(session) => f.debug_tuple("Session").field(session).finish(),
        }
    }
}

/// Events that drive the state machine
#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    /// The authentication endpoint returned a session
    Authenticated(Session),
    /// The user logged out explicitly
    LoggedOut,
    /// The service root answered a connectivity probe
    ProbeSucceeded,
    /// The connectivity probe failed without any response
    ProbeFailed,
}

/// Connection state of one client instance
pub struct ConnectionState {
    status: ConnStatus,
    credentials: Credentials,
    observer: Option<Arc<dyn IConnectionObserver>>,
}

impl ConnectionState {
    /// Creates a state from the credentials the host supplies
    ///
    /// A session yields `Connected`; anything else yields `LoggedOut`.
    pub fn new(credentials: Credentials) -> Self {
        let status = match credentials {
            Credentials::Session(_) => ConnStatus::Connected,
            _ => ConnStatus::LoggedOut,
        };
        Self {
            status,
            credentials,
            observer: None,
        }
    }

    /// Creates a logged-out state holding an email and password
    pub fn with_password(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(Credentials::Password {
            email: email.into(),
            password: password.into(),
        })
    }

    /// Creates a connected state from a previously obtained session
    pub fn with_session(access_token: impl Into<String>, user: User) -> Self {
        Self::new(Credentials::Session(Session {
            access_token: access_token.into(),
            user,
        }))
    }

    /// Registers the observer notified on every transition
    pub fn set_observer(&mut self, observer: Arc<dyn IConnectionObserver>) {
        self.observer = Some(observer);
    }

    /// Applies an event and returns the resulting status
    pub fn apply(&mut self, event: ConnectionEvent) -> ConnStatus {
        let previous = self.status;
        match event {
            ConnectionEvent::Authenticated(session) => {
                self.credentials = Credentials::Session(session);
                self.status = ConnStatus::Connected;
            }
            ConnectionEvent::LoggedOut => {
                self.credentials = Credentials::None;
                self.status = ConnStatus::LoggedOut;
            }
            ConnectionEvent::ProbeSucceeded => {
                self.status = if self.is_logged_in() {
                    ConnStatus::Connected
                } else {
                    ConnStatus::LoggedOut
                };
            }
            ConnectionEvent::ProbeFailed => {
                self.status = ConnStatus::Disconnected;
            }
        }

        if previous != self.status {
            info!(from = %previous, to = %self.status, "Connection status changed");
        }
        if let Some(observer) = &self.observer {
            observer.on_status_changed(self.status);
        }
        self.status
    }

    /// Returns the last known status without probing
    pub fn status(&self) -> ConnStatus {
        self.status
    }

    /// Whether a session (token and user) is held. The client may still be
    /// disconnected.
    pub fn is_logged_in(&self) -> bool {
        matches!(self.credentials, Credentials::Session(_))
    }

    /// Whether a session is held and the service was reachable
    pub fn is_connected(&self) -> bool {
        self.is_logged_in() && self.status == ConnStatus::Connected
    }

    /// The bearer token, if a session is held
    pub fn access_token(&self) -> Option<&str> {
        match &self.credentials {
            Credentials::Session(session) => Some(&session.access_token),
            _ => None,
        }
    }

    /// The logged-in user, if a session is held
    pub fn user(&self) -> Option<&User> {
        match &self.credentials {
            Credentials::Session(session) => Some(&session.user),
            _ => None,
        }
    }

    /// The session, if held
    pub fn session(&self) -> Option<&Session> {
        match &self.credentials {
            Credentials::Session(session) => Some(session),
            _ => None,
        }
    }

    /// Email and password usable for authentication, if held
    pub fn password_login(&self) -> Option<(&str, &str)> {
        match &self.credentials {
            Credentials::Password { email, password } => Some((email, password)),
            _ => None,
        }
    }
}

impl fmt::Debug for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionState")
            .field("status", &self.status)
            .field("credentials", &self.credentials)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}
