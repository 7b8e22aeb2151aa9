//! Credential types exposed by the vault.
//!
//! Stored rows carry the ciphertext; the listing view below never does,
//! so callers can display usernames and sites without touching any
//! encrypted data.

use serde::Serialize;

/// One (username, site) pair, as returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct CredentialEntry {
    pub username: String,
    pub site: String,
}

impl CredentialEntry {
    pub fn new(username: impl Into<String>, site: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            site: site.into(),
        }
    }
}

/// Result of inserting a new credential.
///
/// A duplicate (username, site) pair is an expected outcome, not an
/// error: the caller decides whether to escalate to an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

impl InsertOutcome {
    pub fn is_inserted(self) -> bool {
        self == Self::Inserted
    }
}
