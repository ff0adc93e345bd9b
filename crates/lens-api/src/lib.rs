//! Lens API - REST client for the Lens file and version service
//!
//! Provides an async client for:
//! - Email/password authentication and the connection state machine
//! - Models, files and file versions
//! - Share links, workspaces, directories and organizations
//! - Preferences, keyword search and file transfer
//!
//! ## Modules
//!
//! - [`client`] - HTTP transport core: headers, status mapping, connectivity probes
//! - [`auth`] - Authentication, logout and user accessors
//! - [`query`] - Query parameters with pagination defaults
//! - [`transfer`] - Upload and signed-URL download of raw bytes
//! - [`call_result`] - Folds errors into an [`ApiCallResult`]
//! - [`provider`] - [`ILensProvider`](lens_core::ports::ILensProvider) implementation
//!
//! Every operation returns `Result<T, LensError>`. Operations other than
//! search, the public share-link gallery and the default organization
//! authenticate first when no session token is held.

pub mod auth;
pub mod call_result;
pub mod client;
pub mod directories;
pub mod files;
pub mod models;
pub mod organizations;
pub mod provider;
pub mod query;
pub mod search;
pub mod share_links;
pub mod transfer;
pub mod workspaces;

pub use call_result::{capture, ApiCallResult};
pub use client::LensClient;
pub use lens_core::domain::errors::LensError;
pub use query::Params;
