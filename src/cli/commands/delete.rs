//! `credvault delete` — remove a credential from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{audit_denial, open_vault, prompt_admin_passphrase, with_denial_report, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, username: &str, site: &str, force: bool) -> Result<()> {
    let (paths, vault) = open_vault(cli)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete credential for '{username}' at '{site}'?"))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let admin = prompt_admin_passphrase()?;
    let result = vault.remove(username, site, &admin);
    audit_denial(paths.dir(), &result, Some(username), Some(site), "delete");

    if with_denial_report(&vault, result)? {
        crate::audit::log_audit(paths.dir(), "delete", Some(username), Some(site), None);
        output::success(&format!("Deleted credential for '{username}' at '{site}'"));
        Ok(())
    } else {
        Err(VaultError::CommandFailed(format!(
            "no credential for '{username}' at '{site}'"
        )))
    }
}
