//! High-level vault operations used by the CLI.
//!
//! `VaultService` owns the admin gate and the credential store.  Every
//! operation that would expose or alter a stored secret first verifies
//! the admin passphrase; a rejected passphrase short-circuits with
//! `AccessDenied` before the store is touched, so the caller learns
//! nothing about whether the target record exists.

use std::fs;

use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::{CipherCodec, KeyStore};
use crate::errors::{Result, VaultError};
use crate::gate::{AdminGate, GateStatus};

use super::credential::{CredentialEntry, InsertOutcome};
use super::layout::{self, VaultPaths};
use super::store::{validate_pair, CredentialStore};
use super::db;

/// The vault as seen by its callers.
pub struct VaultService {
    store: CredentialStore,
    gate: AdminGate,
}

impl VaultService {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a brand-new vault at `paths` protected by `passphrase`.
    ///
    /// Creates the owner-only directory, the key file, the database and
    /// the admin credentials.  Refuses to touch an existing vault: there
    /// is no re-initialization path.
    pub fn initialize(paths: &VaultPaths, passphrase: &str, settings: &Settings) -> Result<Self> {
        if passphrase.is_empty() {
            return Err(VaultError::Validation(
                "admin passphrase cannot be empty".into(),
            ));
        }
        if paths.exists() {
            return Err(VaultError::VaultAlreadyExists(paths.dir().to_path_buf()));
        }

        layout::ensure_private_dir(paths.dir())?;
        let key = KeyStore::new(paths.key_file()).get_or_create_key()?;

        let db_path = paths.database();
        let gate_conn = db::create(&db_path)?;
        let gate = AdminGate::from_connection(
            gate_conn,
            &paths.admin_credentials(),
            settings.lockout_policy(),
        );

        if let Err(e) = gate.initialize(passphrase) {
            drop(gate);
            let _ = fs::remove_file(&db_path);
            return Err(e);
        }

        let store = CredentialStore::open(&db_path, CipherCodec::new(&key)?)?;

        info!(dir = %paths.dir().display(), "vault initialized");
        Ok(Self { store, gate })
    }

    /// Open an existing vault.
    ///
    /// The key file must already be there: a vault whose key went missing
    /// fails with `Storage` instead of silently starting a second key.
    pub fn open(paths: &VaultPaths, settings: &Settings) -> Result<Self> {
        if !paths.exists() {
            return Err(VaultError::VaultNotFound(paths.dir().to_path_buf()));
        }

        let key = KeyStore::new(paths.key_file()).load()?;
        let store = CredentialStore::open(&paths.database(), CipherCodec::new(&key)?)?;
        let gate = AdminGate::open(
            &paths.database(),
            &paths.admin_credentials(),
            settings.lockout_policy(),
        )?;

        Ok(Self { store, gate })
    }

    /// Assemble a service from already-built parts.
    pub fn from_parts(store: CredentialStore, gate: AdminGate) -> Self {
        Self { store, gate }
    }

    // ------------------------------------------------------------------
    // Vault operations
    // ------------------------------------------------------------------

    /// Store a new secret.  No admin check: anyone with access to the
    /// vault may add their own credential.
    ///
    /// An existing pair yields `AlreadyExists`; the caller must then
    /// authenticate and call `update` explicitly.
    pub fn save(&self, username: &str, site: &str, secret: &str) -> Result<InsertOutcome> {
        validate_pair(username, site)?;
        validate_secret(secret)?;
        self.store.insert(username, site, secret)
    }

    /// Overwrite an existing secret.  Returns `false` if none matched.
    pub fn update(
        &self,
        username: &str,
        site: &str,
        secret: &str,
        admin_passphrase: &str,
    ) -> Result<bool> {
        validate_pair(username, site)?;
        validate_secret(secret)?;
        self.authorize(admin_passphrase)?;
        self.store.update(username, site, secret)
    }

    /// Decrypt and return a stored secret, or `None` if absent.
    ///
    /// A record that fails authentication is reported as `Integrity`,
    /// never as missing.
    pub fn recover(
        &self,
        username: &str,
        site: &str,
        admin_passphrase: &str,
    ) -> Result<Option<Zeroizing<String>>> {
        validate_pair(username, site)?;
        self.authorize(admin_passphrase)?;

        match self.store.get(username, site)? {
            Some(ciphertext) => self.store.decrypt(&ciphertext).map(Some),
            None => Ok(None),
        }
    }

    /// Every stored (username, site) pair, ordered by username then site.
    pub fn list_all(&self, admin_passphrase: &str) -> Result<Vec<CredentialEntry>> {
        self.authorize(admin_passphrase)?;
        self.store.list()
    }

    /// Delete a credential.  Returns `false` if none matched.
    pub fn remove(&self, username: &str, site: &str, admin_passphrase: &str) -> Result<bool> {
        validate_pair(username, site)?;
        self.authorize(admin_passphrase)?;
        self.store.delete(username, site)
    }

    /// Lockout state, for showing remaining attempts or a countdown.
    pub fn gate_status(&self) -> Result<GateStatus> {
        self.gate.status()
    }

    /// Number of stored credentials.  Exposes no usernames or secrets.
    pub fn count(&self) -> Result<usize> {
        self.store.count()
    }

    /// Direct access to the gate (status queries, tests).
    pub fn gate(&self) -> &AdminGate {
        &self.gate
    }

    fn authorize(&self, admin_passphrase: &str) -> Result<()> {
        if self.gate.verify(admin_passphrase)? {
            Ok(())
        } else {
            warn!("admin verification failed — operation refused");
            Err(VaultError::AccessDenied)
        }
    }
}

fn validate_secret(secret: &str) -> Result<()> {
    if secret.is_empty() {
        return Err(VaultError::Validation("secret cannot be empty".into()));
    }
    Ok(())
}
