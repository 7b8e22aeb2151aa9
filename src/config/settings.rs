use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};
use crate::gate::{LockoutPolicy, LOCKOUT_SECONDS, MAX_LOGIN_ATTEMPTS};
use crate::vault::VaultPaths;

/// Vault-level configuration, loaded from `<vault_dir>/config.toml`.
///
/// Every field has a sensible default so CredVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Consecutive failed admin attempts before the gate locks (default: 5).
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u32,

    /// Lockout window in seconds (default: 300).
    #[serde(default = "default_lockout_seconds")]
    pub lockout_seconds: u64,

    /// Length used by `credvault generate` when none is given (default: 16).
    #[serde(default = "default_password_length")]
    pub default_password_length: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_max_login_attempts() -> u32 {
    MAX_LOGIN_ATTEMPTS
}

fn default_lockout_seconds() -> u64 {
    LOCKOUT_SECONDS
}

fn default_password_length() -> usize {
    16
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_login_attempts: default_max_login_attempts(),
            lockout_seconds: default_lockout_seconds(),
            default_password_length: default_password_length(),
        }
    }
}

impl Settings {
    /// Load settings from `<vault_dir>/config.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(vault_dir: &Path) -> Result<Self> {
        let config_path = VaultPaths::new(vault_dir).config_file();

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.max_login_attempts == 0 {
            return Err(VaultError::ConfigError(format!(
                "{}: max_login_attempts must be at least 1",
                config_path.display()
            )));
        }

        if settings.lockout_seconds == 0 {
            return Err(VaultError::ConfigError(format!(
                "{}: lockout_seconds must be at least 1",
                config_path.display()
            )));
        }

        Ok(settings)
    }

    /// Convert the lockout settings into the gate's policy.
    pub fn lockout_policy(&self) -> LockoutPolicy {
        LockoutPolicy {
            max_attempts: self.max_login_attempts,
            lockout_seconds: self.lockout_seconds,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
