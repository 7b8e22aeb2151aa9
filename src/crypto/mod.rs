//! Cryptographic primitives for CredVault.
//!
//! This module provides:
//! - The vault key and its zeroizing wrapper (`keys`)
//! - Loading or creating the key file on disk (`keystore`)
//! - AES-256-GCM encryption and decryption of secrets (`encryption`)
//! - PBKDF2-HMAC-SHA512 admin passphrase hashing (`kdf`)

pub mod encryption;
pub mod kdf;
pub mod keys;
pub mod keystore;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{CipherCodec, KeyStore, ...};
pub use encryption::CipherCodec;
pub use kdf::{derive_admin_hash, generate_salt, PBKDF2_ITERATIONS};
pub use keys::CipherKey;
pub use keystore::KeyStore;
