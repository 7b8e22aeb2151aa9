//! Vault module — encrypted credential storage.
//!
//! This module provides:
//! - The on-disk vault layout and owner-only file helpers (`layout`)
//! - The SQLite schema (`db`)
//! - `CredentialEntry` and `InsertOutcome` types (`credential`)
//! - `CredentialStore`, CRUD over encrypted records (`store`)
//! - `VaultService`, the gate-checked operations callers use (`service`)

pub mod credential;
pub mod db;
pub mod layout;
pub mod service;
pub mod store;

// Re-export the most commonly used items.
pub use credential::{CredentialEntry, InsertOutcome};
pub use layout::VaultPaths;
pub use service::VaultService;
pub use store::CredentialStore;
