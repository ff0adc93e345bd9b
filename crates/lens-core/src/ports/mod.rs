//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are the traits the domain core depends on. Their implementations
//! live in adapter crates (`lens-api`) or in the host application.
//!
//! ## Ports Overview
//!
//! - [`ILensProvider`] - Remote operations the workspace model needs
//! - [`IConnectionObserver`] - Host callback for connection status changes
//! - [`IWorkspaceObserver`] - Host callback for workspace listing resets

pub mod connection_observer;
pub mod lens_provider;
pub mod workspace_observer;

pub use connection_observer::IConnectionObserver;
pub use lens_provider::ILensProvider;
pub use workspace_observer::IWorkspaceObserver;
