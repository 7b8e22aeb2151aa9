//! `credvault update` — replace the secret of an existing credential.

use crate::cli::output;
use crate::cli::{audit_denial, open_vault, prompt_admin_passphrase, read_secret, with_denial_report, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `update` command.
pub fn execute(cli: &Cli, username: &str, site: &str, secret: Option<&str>) -> Result<()> {
    let (paths, vault) = open_vault(cli)?;

    let secret = read_secret(secret, &format!("New secret for {username} at {site}"))?;
    let admin = prompt_admin_passphrase()?;

    let result = vault.update(username, site, &secret, &admin);
    audit_denial(paths.dir(), &result, Some(username), Some(site), "update");

    if with_denial_report(&vault, result)? {
        crate::audit::log_audit(paths.dir(), "update", Some(username), Some(site), None);
        output::success(&format!("Updated credential for '{username}' at '{site}'"));
        Ok(())
    } else {
        Err(VaultError::CommandFailed(format!(
            "no credential for '{username}' at '{site}'"
        )))
    }
}
