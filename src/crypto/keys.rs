//! The vault's symmetric key.
//!
//! A single 32-byte AES-256 key protects every stored secret.  It is
//! generated once per vault and never changes afterwards.

use rand::TryRngCore;
use zeroize::Zeroize;

use crate::errors::{Result, VaultError};

/// Length of the vault key (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// A wrapper around the 32-byte vault key that automatically zeroes
/// its memory when dropped.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct CipherKey {
    bytes: [u8; KEY_LEN],
}

impl CipherKey {
    /// Create a new `CipherKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Generate a fresh key from the operating system's CSPRNG.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; KEY_LEN];
        rand::rngs::OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| VaultError::Storage(format!("OS random source unavailable: {e}")))?;
        let key = Self::new(bytes);
        bytes.zeroize();
        Ok(key)
    }

    /// Build a key from a byte slice, rejecting anything that is not
    /// exactly `KEY_LEN` bytes long.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let bytes: [u8; KEY_LEN] = data.try_into().map_err(|_| {
            VaultError::Storage(format!(
                "key must be exactly {KEY_LEN} bytes, got {}",
                data.len()
            ))
        })?;
        Ok(Self::new(bytes))
    }

    /// Access the raw key bytes (e.g. to build a cipher or persist them).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
