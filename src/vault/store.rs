//! Credential records: CRUD over (username, site) → encrypted secret.
//!
//! `CredentialStore` owns one long-lived SQLite connection and the
//! cipher.  Every operation is a single statement, so the UNIQUE
//! constraint on (username, site) is the only arbiter of concurrent
//! inserts: one wins, every other sees `AlreadyExists`.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::CipherCodec;
use crate::errors::{Result, VaultError};

use super::credential::{CredentialEntry, InsertOutcome};
use super::db;

/// Maximum length of a username or site, in bytes.
const MAX_FIELD_LEN: usize = 1024;

/// Encrypted credential records backed by `passwords.db`.
pub struct CredentialStore {
    conn: Mutex<Connection>,
    codec: CipherCodec,
}

impl CredentialStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open the credential database at `db_path`.
    pub fn open(db_path: &Path, codec: CipherCodec) -> Result<Self> {
        let conn = db::open(db_path)?;
        Ok(Self::from_connection(conn, codec))
    }

    /// Wrap an already-configured connection.
    pub fn from_connection(conn: Connection, codec: CipherCodec) -> Self {
        Self {
            conn: Mutex::new(conn),
            codec,
        }
    }

    // ------------------------------------------------------------------
    // Record operations
    // ------------------------------------------------------------------

    /// Returns `true` if a record for the exact pair is present.
    pub fn exists(&self, username: &str, site: &str) -> Result<bool> {
        let conn = self.conn()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM credentials WHERE username = ?1 AND site = ?2",
                params![username, site],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Encrypt `plaintext` and insert a new record.
    ///
    /// Never overwrites: an existing pair yields `AlreadyExists` and the
    /// stored secret is left untouched.
    pub fn insert(&self, username: &str, site: &str, plaintext: &str) -> Result<InsertOutcome> {
        validate_pair(username, site)?;
        let encrypted = self.codec.encrypt(plaintext)?;

        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT INTO credentials (username, site, encrypted_secret) VALUES (?1, ?2, ?3)",
            params![username, site, encrypted],
        );

        match inserted {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                debug!("credential already exists — insert skipped");
                Ok(InsertOutcome::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Re-encrypt and overwrite an existing record.
    ///
    /// Returns `false` if no record matched.
    pub fn update(&self, username: &str, site: &str, new_plaintext: &str) -> Result<bool> {
        validate_pair(username, site)?;
        let encrypted = self.codec.encrypt(new_plaintext)?;

        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE credentials SET encrypted_secret = ?1 WHERE username = ?2 AND site = ?3",
            params![encrypted, username, site],
        )?;
        Ok(rows > 0)
    }

    /// Raw ciphertext for a pair, or `None` if absent.
    pub fn get(&self, username: &str, site: &str) -> Result<Option<Vec<u8>>> {
        let conn = self.conn()?;
        let ciphertext = conn
            .query_row(
                "SELECT encrypted_secret FROM credentials WHERE username = ?1 AND site = ?2",
                params![username, site],
                |row| row.get(0),
            )
            .optional()?;
        Ok(ciphertext)
    }

    /// Decrypt a ciphertext previously returned by `get`.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Zeroizing<String>> {
        self.codec.decrypt(ciphertext)
    }

    /// All pairs, ordered by username then site (byte order, case-sensitive).
    pub fn list(&self) -> Result<Vec<CredentialEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT username, site FROM credentials
             ORDER BY username COLLATE BINARY, site COLLATE BINARY",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(CredentialEntry {
                username: row.get(0)?,
                site: row.get(1)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Remove a record.  Returns `false` if none matched.
    pub fn delete(&self, username: &str, site: &str) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "DELETE FROM credentials WHERE username = ?1 AND site = ?2",
            params![username, site],
        )?;
        Ok(rows > 0)
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM credentials", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| VaultError::Storage(format!("invalid record count {count}")))
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| VaultError::Storage("credential database lock poisoned".into()))
    }
}

// ----------------------------------------------------------------------
// Validation
// ----------------------------------------------------------------------

/// Validate that a username and site are usable as a record key.
///
/// Both must be non-empty and at most 1024 bytes.  Matching is exact,
/// so no other normalisation is applied.
pub fn validate_pair(username: &str, site: &str) -> Result<()> {
    validate_field("username", username)?;
    validate_field("site", site)
}

fn validate_field(label: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(VaultError::Validation(format!("{label} cannot be empty")));
    }
    if value.len() > MAX_FIELD_LEN {
        return Err(VaultError::Validation(format!(
            "{label} cannot exceed {MAX_FIELD_LEN} bytes"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::CipherKey;
    use tempfile::TempDir;

    fn store() -> (TempDir, CredentialStore) {
        let dir = TempDir::new().unwrap();
        let conn = db::create(&dir.path().join("passwords.db")).unwrap();
        let codec = CipherCodec::new(&CipherKey::new([0x5A; 32])).unwrap();
        (dir, CredentialStore::from_connection(conn, codec))
    }

    #[test]
    fn insert_then_exists() {
        let (_dir, store) = store();
        assert!(!store.exists("alice", "example.com").unwrap());
        assert_eq!(
            store.insert("alice", "example.com", "p@ss1").unwrap(),
            InsertOutcome::Inserted
        );
        assert!(store.exists("alice", "example.com").unwrap());
    }

    #[test]
    fn duplicate_insert_keeps_original_secret() {
        let (_dir, store) = store();
        assert!(store.insert("alice", "example.com", "p@ss1").unwrap().is_inserted());
        let second = store.insert("alice", "example.com", "p@ss2").unwrap();
        assert_eq!(second, InsertOutcome::AlreadyExists);

        let ct = store.get("alice", "example.com").unwrap().unwrap();
        assert_eq!(store.decrypt(&ct).unwrap().as_str(), "p@ss1");
    }

    #[test]
    fn pairs_are_case_sensitive() {
        let (_dir, store) = store();
        assert!(store.insert("alice", "example.com", "a").unwrap().is_inserted());
        assert!(store.insert("Alice", "example.com", "b").unwrap().is_inserted());
        assert!(store.insert("alice", "Example.com", "c").unwrap().is_inserted());
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn update_missing_record_returns_false() {
        let (_dir, store) = store();
        assert!(!store.update("bob", "nowhere", "x").unwrap());
        assert!(!store.exists("bob", "nowhere").unwrap());
    }

    #[test]
    fn update_overwrites_in_place() {
        let (_dir, store) = store();
        assert!(store.insert("bob", "site", "old").unwrap().is_inserted());
        assert!(store.update("bob", "site", "new").unwrap());

        let ct = store.get("bob", "site").unwrap().unwrap();
        assert_eq!(store.decrypt(&ct).unwrap().as_str(), "new");
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn list_orders_by_username_then_site_bytewise() {
        let (_dir, store) = store();
        for (u, s) in [("bob", "zsite"), ("alice", "bsite"), ("alice", "asite"), ("Zed", "q")] {
            assert!(store.insert(u, s, "pw").unwrap().is_inserted());
        }

        let listed = store.list().unwrap();
        assert_eq!(
            listed,
            vec![
                CredentialEntry::new("Zed", "q"),
                CredentialEntry::new("alice", "asite"),
                CredentialEntry::new("alice", "bsite"),
                CredentialEntry::new("bob", "zsite"),
            ]
        );
    }

    #[test]
    fn delete_reports_whether_anything_matched() {
        let (_dir, store) = store();
        assert!(store.insert("carol", "site", "pw").unwrap().is_inserted());
        assert!(store.delete("carol", "site").unwrap());
        assert!(!store.delete("carol", "site").unwrap());
        assert!(store.get("carol", "site").unwrap().is_none());
    }

    #[test]
    fn stored_secret_is_not_plaintext() {
        let (_dir, store) = store();
        assert!(store.insert("dave", "site", "plain-secret").unwrap().is_inserted());
        let ct = store.get("dave", "site").unwrap().unwrap();
        assert!(!ct.windows(12).any(|w| w == b"plain-secret"));
    }

    #[test]
    fn empty_fields_are_rejected() {
        let (_dir, store) = store();
        assert!(matches!(
            store.insert("", "site", "pw"),
            Err(VaultError::Validation(_))
        ));
        assert!(matches!(
            store.insert("user", "", "pw"),
            Err(VaultError::Validation(_))
        ));
        assert_eq!(store.count().unwrap(), 0);
    }
}
