//! Admin gate — the single administrator passphrase guarding the vault.
//!
//! This module provides:
//! - The salted PBKDF2 credentials file (`credentials`)
//! - Lockout policy constants and the visible gate state (`policy`)
//! - The verification state machine with attempt counting (`admin`)

pub mod admin;
pub mod credentials;
pub mod policy;

pub use admin::{AdminGate, AttemptRecord};
pub use credentials::AdminCredentials;
pub use policy::{GateStatus, LockoutPolicy, LOCKOUT_SECONDS, MAX_LOGIN_ATTEMPTS};
