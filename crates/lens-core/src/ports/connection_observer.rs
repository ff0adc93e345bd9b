//! Connection observer port (driving callback)
//!
//! The host application registers an observer to keep its connection
//! indicator current. The observer is called on every state machine
//! transition, including transitions that leave the status unchanged, so
//! implementations must be idempotent. Notification cannot fail the
//! operation that triggered it: the method returns nothing.

use crate::domain::connection::ConnStatus;

/// Receives connection status updates
pub trait IConnectionObserver: Send + Sync {
    /// Called after every transition with the resulting status
    fn on_status_changed(&self, status: ConnStatus);
}
