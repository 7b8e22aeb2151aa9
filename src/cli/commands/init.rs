//! `credvault init` — create a new vault and set the admin passphrase.

use crate::cli::output;
use crate::cli::{prompt_new_passphrase, vault_paths, Cli};
use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::VaultService;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let paths = vault_paths(cli)?;

    // 1. Refuse early if a vault is already there.
    if paths.exists() {
        output::tip("Use `credvault save` to add credentials to the existing vault.");
        return Err(VaultError::VaultAlreadyExists(paths.dir().to_path_buf()));
    }

    // 2. Prompt for the admin passphrase (with confirmation).
    let passphrase = prompt_new_passphrase()?;

    // 3. Create key, database and admin credentials.
    let settings = Settings::load(paths.dir())?;
    VaultService::initialize(&paths, &passphrase, &settings)?;
    output::success(&format!("Vault created at {}", paths.dir().display()));
    output::warning(&format!(
        "Back up {} — without it stored secrets cannot be recovered.",
        paths.key_file().display()
    ));

    // 4. Audit log.
    crate::audit::log_audit(paths.dir(), "init", None, None, Some("vault created"));

    // 5. Show helpful tips.
    output::tip("Run `credvault save <USERNAME> <SITE>` to store a credential.");
    output::tip("Run `credvault list` to see stored credentials.");

    Ok(())
}
