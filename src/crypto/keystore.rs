//! Persistent storage for the vault key.
//!
//! The key is 32 raw bytes in `secret.key`, readable only by the owner.
//! It is created on first use and never rewritten: losing the file makes
//! every stored secret permanently unrecoverable.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::{Result, VaultError};
use crate::vault::layout;

use super::keys::{CipherKey, KEY_LEN};

/// Loads the vault key from disk, creating it on first use.
#[derive(Debug, Clone)]
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the vault key, generating and persisting it if absent.
    ///
    /// Concurrent first calls converge on a single key: the new key is
    /// fully written to a temp file and then published with a hard link,
    /// which refuses to replace an existing `secret.key`.  The loser of
    /// that race discards its key and loads the winner's.
    pub fn get_or_create_key(&self) -> Result<CipherKey> {
        if self.path.exists() {
            return self.load();
        }

        if let Some(parent) = self.path.parent() {
            layout::ensure_private_dir(parent)?;
        }

        let key = CipherKey::generate()?;
        let tmp_path = layout::write_private_temp(&self.path, key.as_bytes())?;

        let published = fs::hard_link(&tmp_path, &self.path);
        let _ = fs::remove_file(&tmp_path);

        match published {
            Ok(()) => {
                layout::restrict_file(&self.path)?;
                info!(path = %self.path.display(), "generated new vault key");
                Ok(key)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!("vault key created concurrently — loading existing key");
                self.load()
            }
            Err(e) => Err(VaultError::Storage(format!(
                "failed to write key file {}: {e}",
                self.path.display()
            ))),
        }
    }

    /// Read an existing key file and validate its length.
    pub fn load(&self) -> Result<CipherKey> {
        let data = fs::read(&self.path).map_err(|e| {
            VaultError::Storage(format!(
                "failed to read key file {}: {e}",
                self.path.display()
            ))
        })?;

        if data.len() != KEY_LEN {
            return Err(VaultError::Storage(format!(
                "key file {} is corrupted: expected {KEY_LEN} bytes, got {}",
                self.path.display(),
                data.len()
            )));
        }

        CipherKey::from_slice(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_call_creates_then_reuses_key() {
        let dir = TempDir::new().unwrap();
        let store = KeyStore::new(dir.path().join("vault").join("secret.key"));

        let created = store.get_or_create_key().unwrap();
        assert!(store.path().exists());

        let loaded = store.get_or_create_key().unwrap();
        assert_eq!(created.as_bytes(), loaded.as_bytes());
    }

    #[test]
    fn truncated_key_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.key");
        fs::write(&path, [0u8; 16]).unwrap();

        let result = KeyStore::new(&path).get_or_create_key();
        assert!(matches!(result, Err(VaultError::Storage(_))));
        // The damaged file is left alone.
        assert_eq!(fs::read(&path).unwrap().len(), 16);
    }

    #[test]
    fn concurrent_first_calls_agree_on_one_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.key");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = KeyStore::new(&path);
                std::thread::spawn(move || store.get_or_create_key().unwrap())
            })
            .collect();

        let keys: Vec<CipherKey> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let on_disk = KeyStore::new(&path).load().unwrap();
        for key in &keys {
            assert_eq!(key.as_bytes(), on_disk.as_bytes());
        }
    }

    #[cfg(unix)]
    #[test]
    fn key_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let vault_dir = dir.path().join("vault");
        let store = KeyStore::new(vault_dir.join("secret.key"));
        store.get_or_create_key().unwrap();

        let file_mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(file_mode & 0o777, 0o600);
        let dir_mode = fs::metadata(&vault_dir).unwrap().permissions().mode();
        assert_eq!(dir_mode & 0o777, 0o700);
    }
}
