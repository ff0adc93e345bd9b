//! CLI command implementations

pub mod auth;
pub mod discover;
pub mod transfer;
pub mod workspaces;
