//! Lens Core - Domain logic for the Lens workbench client
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - remote records (`Model`, `FileRecord`, `Directory`,
//!   `WorkspaceRecord`, `ShareLink`), local `FileEntry` listings
//! - **Connection state machine** - `ConnectionState` with its transition function
//! - **Error taxonomy** - `LensError`, the closed set of API failure kinds
//! - **Port definitions** - Traits for adapters: `ILensProvider`,
//!   `IConnectionObserver`, `IWorkspaceObserver`
//!
//! # Architecture
//!
//! The domain module contains pure logic with no network or UI dependencies.
//! Ports define trait interfaces that adapter crates (`lens-api`, `lens-sync`)
//! implement or consume.

pub mod config;
pub mod domain;
pub mod ports;
