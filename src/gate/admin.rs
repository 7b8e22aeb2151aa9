//! The admin gate: passphrase verification with attempt counting and
//! progressive lockout.
//!
//! ```text
//!            verify ok                       verify fails, attempts < max
//!   UNLOCKED ─────────► UNLOCKED (attempts=0)  UNLOCKED ──► UNLOCKED (attempts+1)
//!
//!            verify fails, attempts+1 >= max
//!   UNLOCKED ──────────────────────────────► LOCKED(now + window)
//!
//!   LOCKED(until), now <  until:  every verify → false, nothing counted
//!   LOCKED(until), now >= until:  behaves as UNLOCKED with the old count
//! ```
//!
//! Expiry is evaluated lazily on the next call; nothing runs in the
//! background.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use tracing::{debug, error, info, warn};

use crate::errors::{Result, VaultError};
use crate::vault::db;

use super::credentials::AdminCredentials;
use super::policy::{GateStatus, LockoutPolicy};

/// The single row of the `login_attempts` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptRecord {
    pub attempts: u32,
    pub last_attempt: Option<DateTime<Utc>>,
    pub locked_until: Option<DateTime<Utc>>,
}

impl AttemptRecord {
    fn locked_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.locked_until.filter(|until| now < *until)
    }
}

/// Verifies the admin passphrase and enforces the lockout window.
pub struct AdminGate {
    conn: Mutex<Connection>,
    credentials_path: PathBuf,
    policy: LockoutPolicy,
}

impl AdminGate {
    /// Open the gate over an existing vault database.
    pub fn open(db_path: &Path, credentials_path: &Path, policy: LockoutPolicy) -> Result<Self> {
        let conn = db::open(db_path)?;
        Ok(Self::from_connection(conn, credentials_path, policy))
    }

    /// Wrap an already-configured connection.
    pub fn from_connection(conn: Connection, credentials_path: &Path, policy: LockoutPolicy) -> Self {
        Self {
            conn: Mutex::new(conn),
            credentials_path: credentials_path.to_path_buf(),
            policy,
        }
    }

    pub fn policy(&self) -> LockoutPolicy {
        self.policy
    }

    /// Set the admin passphrase: fresh salt, new credentials file, and
    /// the attempt counter reset to UNLOCKED.
    pub fn initialize(&self, passphrase: &str) -> Result<()> {
        if passphrase.is_empty() {
            return Err(VaultError::Validation(
                "admin passphrase cannot be empty".into(),
            ));
        }

        let credentials = AdminCredentials::derive(passphrase)?;
        credentials.save(&self.credentials_path)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO login_attempts (id, attempts, last_attempt, locked_until)
             VALUES (1, 0, NULL, NULL)",
            [],
        )?;

        info!("admin passphrase initialized");
        Ok(())
    }

    /// Check `attempt` against the stored passphrase.
    pub fn verify(&self, attempt: &str) -> Result<bool> {
        self.verify_at(attempt, Utc::now())
    }

    /// Check `attempt` as if the current time were `now`.
    ///
    /// The whole read-check-update sequence runs in one IMMEDIATE
    /// transaction, so concurrent verifies never lose a failed attempt.
    /// Returns `Ok(false)` for both a wrong passphrase and an active
    /// lockout.  Failing to read the counter, or to record a failed
    /// attempt, is a `Storage` error.
    pub fn verify_at(&self, attempt: &str, now: DateTime<Utc>) -> Result<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let record = read_record(&tx)?;

        // Locked: reject without spending a KDF run.
        if let Some(until) = record.locked_at(now) {
            debug!(%until, "verification rejected — gate locked");
            return Ok(false);
        }

        // A missing or damaged credentials file fails closed.
        let matched = match AdminCredentials::load(&self.credentials_path) {
            Ok(credentials) => credentials.matches(attempt),
            Err(e) => {
                warn!(error = %e, "admin credentials unavailable — counting as failed attempt");
                false
            }
        };

        if matched {
            let reset = match tx.execute(
                "UPDATE login_attempts SET attempts = 0, locked_until = NULL WHERE id = 1",
                [],
            ) {
                Ok(_) => tx.commit(),
                Err(e) => Err(e),
            };
            // The passphrase was right; bookkeeping must not turn that into a denial.
            if let Err(e) = reset {
                error!(error = %e, "failed to reset login attempts after successful verification");
            }
            return Ok(true);
        }

        let attempts = record.attempts.saturating_add(1);
        let now_text = now.to_rfc3339();
        let recorded = if attempts >= self.policy.max_attempts {
            let until = self.policy.lock_until(now);
            warn!(attempts, %until, "too many failed attempts — admin gate locked");
            tx.execute(
                "UPDATE login_attempts SET attempts = ?1, last_attempt = ?2, locked_until = ?3
                 WHERE id = 1",
                params![attempts, now_text, until.to_rfc3339()],
            )
        } else {
            debug!(attempts, "admin verification failed");
            tx.execute(
                "UPDATE login_attempts SET attempts = ?1, last_attempt = ?2 WHERE id = 1",
                params![attempts, now_text],
            )
        };

        let persisted = match recorded {
            Ok(_) => tx.commit(),
            Err(e) => Err(e),
        };
        // An uncounted failure would silently disable the lockout.
        if let Err(e) = persisted {
            error!(error = %e, "failed to record failed login attempt");
            return Err(VaultError::Storage(format!(
                "failed to record failed login attempt: {e}"
            )));
        }

        Ok(false)
    }

    /// Current lockout state.
    pub fn status(&self) -> Result<GateStatus> {
        self.status_at(Utc::now())
    }

    /// Lockout state as seen at `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> Result<GateStatus> {
        let record = self.record()?;

        if let Some(until) = record.locked_at(now) {
            let remaining = (until - now).to_std().unwrap_or_default();
            return Ok(GateStatus::Locked { remaining });
        }

        Ok(GateStatus::Unlocked {
            attempts: record.attempts,
            remaining_attempts: self.policy.max_attempts.saturating_sub(record.attempts),
        })
    }

    /// The raw counter row.
    pub fn record(&self) -> Result<AttemptRecord> {
        let conn = self.conn()?;
        read_record(&conn)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| VaultError::Storage("login attempt database lock poisoned".into()))
    }
}

fn read_record(conn: &Connection) -> Result<AttemptRecord> {
    let row: Option<(i64, Option<String>, Option<String>)> = conn
        .query_row(
            "SELECT attempts, last_attempt, locked_until FROM login_attempts WHERE id = 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;

    let (attempts, last_attempt, locked_until) =
        row.ok_or_else(|| VaultError::Storage("login attempt counter is missing".into()))?;

    Ok(AttemptRecord {
        attempts: u32::try_from(attempts)
            .map_err(|_| VaultError::Storage(format!("invalid attempt count {attempts}")))?,
        last_attempt: parse_timestamp(last_attempt.as_deref())?,
        locked_until: parse_timestamp(locked_until.as_deref())?,
    })
}

fn parse_timestamp(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|text| {
            DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| VaultError::Storage(format!("invalid timestamp '{text}': {e}")))
        })
        .transpose()
}
