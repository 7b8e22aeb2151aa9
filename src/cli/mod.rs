//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::gate::GateStatus;
use crate::vault::{VaultPaths, VaultService};

/// Minimum passphrase length accepted when creating a vault.
const MIN_PASSPHRASE_LEN: usize = 8;

/// Environment variable holding the admin passphrase for scripted use.
pub const PASSPHRASE_ENV: &str = "CREDVAULT_ADMIN_PASSWORD";

/// CredVault CLI: local encrypted credential vault.
#[derive(Parser)]
#[command(
    name = "credvault",
    about = "Local encrypted credential vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: ~/.credvault)
    #[arg(long, env = "CREDVAULT_DIR", global = true)]
    pub vault_dir: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault and set the administrator passphrase
    Init,

    /// Save a new credential (offers to update an existing one)
    Save {
        /// Account username
        username: String,
        /// Site or service the credential belongs to
        site: String,
        /// Secret value (omit for interactive prompt)
        secret: Option<String>,
        /// Store a freshly generated password instead
        #[arg(long, conflicts_with = "secret")]
        generate: bool,
    },

    /// Replace the secret of an existing credential (admin only)
    Update {
        /// Account username
        username: String,
        /// Site or service
        site: String,
        /// New secret value (omit for interactive prompt)
        secret: Option<String>,
    },

    /// Print a stored secret (admin only)
    Recover {
        /// Account username
        username: String,
        /// Site or service
        site: String,
        /// Copy to the clipboard instead of printing
        #[arg(long)]
        copy: bool,
    },

    /// List stored usernames and sites (admin only)
    List {
        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Delete a credential (admin only)
    Delete {
        /// Account username
        username: String,
        /// Site or service
        site: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show remaining admin attempts or the active lockout
    Status,

    /// Generate a random password
    Generate {
        /// Password length, 4 to 64 (default from config, else 16)
        #[arg(short, long)]
        length: Option<usize>,
        /// Leave out uppercase letters
        #[arg(long)]
        no_upper: bool,
        /// Leave out lowercase letters
        #[arg(long)]
        no_lower: bool,
        /// Leave out digits
        #[arg(long)]
        no_numbers: bool,
        /// Leave out special characters
        #[arg(long)]
        no_special: bool,
    },

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the vault location from `--vault-dir` / `CREDVAULT_DIR`,
/// falling back to `~/.credvault`.
pub fn vault_paths(cli: &Cli) -> Result<VaultPaths> {
    match &cli.vault_dir {
        Some(dir) => Ok(VaultPaths::new(dir)),
        None => VaultPaths::default_location(),
    }
}

/// Load settings and open the existing vault.
pub fn open_vault(cli: &Cli) -> Result<(VaultPaths, VaultService)> {
    let paths = vault_paths(cli)?;
    let settings = Settings::load(paths.dir())?;
    let vault = VaultService::open(&paths, &settings)?;
    Ok((paths, vault))
}

/// Get the admin passphrase, trying in order:
/// 1. `CREDVAULT_ADMIN_PASSWORD` env var (scripts/CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn prompt_admin_passphrase() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSPHRASE_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Administrator passphrase")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new admin passphrase with confirmation (used during `init`).
///
/// Also respects `CREDVAULT_ADMIN_PASSWORD` for scripted usage.
/// Enforces a minimum passphrase length.
pub fn prompt_new_passphrase() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSPHRASE_ENV) {
        if !pw.is_empty() {
            if pw.len() < MIN_PASSPHRASE_LEN {
                return Err(VaultError::Validation(format!(
                    "passphrase must be at least {MIN_PASSPHRASE_LEN} characters"
                )));
            }
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let passphrase = dialoguer::Password::new()
            .with_prompt("Choose administrator passphrase")
            .with_confirmation(
                "Confirm administrator passphrase",
                "Passphrases do not match, try again",
            )
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("passphrase prompt: {e}")))?;

        if passphrase.len() < MIN_PASSPHRASE_LEN {
            output::warning(&format!(
                "Passphrase must be at least {MIN_PASSPHRASE_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(passphrase));
    }
}

/// Read a secret value from one of three sources: the command line,
/// piped stdin, or a hidden interactive prompt.
pub fn read_secret(value: Option<&str>, prompt: &str) -> Result<Zeroizing<String>> {
    if let Some(v) = value {
        output::warning("Secret provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        return Ok(Zeroizing::new(buf.trim_end().to_string()));
    }

    let secret = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(secret))
}

/// Explain an access-denied result using the gate's lockout state.
///
/// Only this CLI-level query reveals whether the vault is locked.
pub fn explain_denial(vault: &VaultService) {
    match vault.gate_status() {
        Ok(GateStatus::Locked { remaining }) => {
            output::error(&format!(
                "Too many failed attempts. Vault locked for another {} seconds.",
                remaining.as_secs().max(1)
            ));
        }
        Ok(GateStatus::Unlocked {
            remaining_attempts, ..
        }) => {
            output::error(&format!(
                "Wrong administrator passphrase. Attempts remaining: {remaining_attempts}"
            ));
        }
        Err(e) => output::error(&e.to_string()),
    }
}

/// Run a gate-checked vault call, turning `AccessDenied` into a
/// user-facing explanation.
pub fn with_denial_report<T>(vault: &VaultService, result: Result<T>) -> Result<T> {
    if matches!(result, Err(VaultError::AccessDenied)) {
        explain_denial(vault);
    }
    result
}

/// Write an `access-denied` audit entry when `result` is a gate refusal.
pub fn audit_denial<T>(
    vault_dir: &Path,
    result: &Result<T>,
    username: Option<&str>,
    site: Option<&str>,
    details: &str,
) {
    if matches!(result, Err(VaultError::AccessDenied)) {
        crate::audit::log_audit(vault_dir, "access-denied", username, site, Some(details));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_save_with_inline_secret() {
        let cli = Cli::parse_from(["credvault", "save", "alice", "example.com", "p@ss1"]);
        match cli.command {
            Commands::Save {
                username,
                site,
                secret,
                generate,
            } => {
                assert_eq!(username, "alice");
                assert_eq!(site, "example.com");
                assert_eq!(secret.as_deref(), Some("p@ss1"));
                assert!(!generate);
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn save_rejects_secret_with_generate() {
        let result = Cli::try_parse_from([
            "credvault",
            "save",
            "alice",
            "example.com",
            "p@ss1",
            "--generate",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn vault_dir_flag_is_global() {
        let cli = Cli::parse_from(["credvault", "status", "--vault-dir", "/tmp/v"]);
        assert_eq!(cli.vault_dir, Some(PathBuf::from("/tmp/v")));
        assert_eq!(
            vault_paths(&cli).unwrap().database(),
            PathBuf::from("/tmp/v/passwords.db")
        );
    }

    #[test]
    fn audit_denial_logs_only_refusals() {
        let dir = tempfile::TempDir::new().unwrap();

        let ok: Result<bool> = Ok(true);
        audit_denial(dir.path(), &ok, Some("alice"), Some("example.com"), "update");
        let denied: Result<bool> = Err(VaultError::AccessDenied);
        audit_denial(dir.path(), &denied, Some("alice"), Some("example.com"), "update");

        let entries = crate::audit::AuditLog::open(dir.path())
            .unwrap()
            .query(10)
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, "access-denied");
        assert_eq!(entries[0].details.as_deref(), Some("update"));
    }

    #[test]
    fn generate_flags_parse() {
        let cli = Cli::parse_from(["credvault", "generate", "-l", "32", "--no-special"]);
        match cli.command {
            Commands::Generate {
                length, no_special, no_upper, ..
            } => {
                assert_eq!(length, Some(32));
                assert!(no_special);
                assert!(!no_upper);
            }
            _ => panic!("expected generate"),
        }
    }
}
