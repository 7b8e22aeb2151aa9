//! The admin credentials file: `salt(16) || PBKDF2-HMAC-SHA512 hash(64)`.

use std::fs;
use std::path::Path;

use zeroize::Zeroize;

use crate::crypto::kdf::{self, HASH_LEN, SALT_LEN};
use crate::errors::{Result, VaultError};
use crate::vault::layout;

/// Salt and derived hash of the admin passphrase.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct AdminCredentials {
    salt: [u8; SALT_LEN],
    hash: [u8; HASH_LEN],
}

impl AdminCredentials {
    /// Derive credentials for `passphrase` under a fresh random salt.
    pub fn derive(passphrase: &str) -> Result<Self> {
        let salt = kdf::generate_salt()?;
        let hash = kdf::derive_admin_hash(passphrase.as_bytes(), &salt);
        Ok(Self { salt, hash })
    }

    /// Returns `true` if `attempt` derives to the stored hash.
    ///
    /// Always runs the full KDF and compares in constant time.
    pub fn matches(&self, attempt: &str) -> bool {
        let mut candidate = kdf::derive_admin_hash(attempt.as_bytes(), &self.salt);
        let matched = kdf::hashes_match(&candidate, &self.hash);
        candidate.zeroize();
        matched
    }

    /// Parse the on-disk representation.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != SALT_LEN + HASH_LEN {
            return Err(VaultError::Storage(format!(
                "admin credentials must be {} bytes, got {}",
                SALT_LEN + HASH_LEN,
                data.len()
            )));
        }

        let mut salt = [0u8; SALT_LEN];
        let mut hash = [0u8; HASH_LEN];
        salt.copy_from_slice(&data[..SALT_LEN]);
        hash.copy_from_slice(&data[SALT_LEN..]);
        Ok(Self { salt, hash })
    }

    /// Read and parse the credentials file.
    pub fn load(path: &Path) -> Result<Self> {
        let mut data = fs::read(path).map_err(|e| {
            VaultError::Storage(format!(
                "failed to read admin credentials {}: {e}",
                path.display()
            ))
        })?;
        let parsed = Self::from_bytes(&data);
        data.zeroize();
        parsed
    }

    /// Atomically write the credentials file with owner-only permissions.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut data = Vec::with_capacity(SALT_LEN + HASH_LEN);
        data.extend_from_slice(&self.salt);
        data.extend_from_slice(&self.hash);
        let written = layout::write_private_file(path, &data);
        data.zeroize();
        written
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn derive_save_load_and_match() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("admin_credentials.secure");

        let creds = AdminCredentials::derive("Secret123").unwrap();
        creds.save(&path).unwrap();
        assert_eq!(fs::read(&path).unwrap().len(), SALT_LEN + HASH_LEN);

        let loaded = AdminCredentials::load(&path).unwrap();
        assert_eq!(loaded.salt(), creds.salt());
        assert!(loaded.matches("Secret123"));
        assert!(!loaded.matches("secret123"));
    }

    #[test]
    fn each_derivation_gets_a_new_salt() {
        let a = AdminCredentials::derive("same").unwrap();
        let b = AdminCredentials::derive("same").unwrap();
        assert_ne!(a.salt(), b.salt());
    }

    #[test]
    fn truncated_file_is_rejected() {
        assert!(AdminCredentials::from_bytes(&[0u8; SALT_LEN]).is_err());
        assert!(AdminCredentials::from_bytes(&[0u8; SALT_LEN + HASH_LEN + 1]).is_err());
    }
}
