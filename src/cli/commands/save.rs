//! `credvault save` — store a new credential, offering an update when
//! the (username, site) pair already exists.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{
    audit_denial, open_vault, prompt_admin_passphrase, read_secret, with_denial_report, Cli,
};
use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::generator::{generate_password, PasswordOptions};
use crate::vault::{InsertOutcome, VaultPaths, VaultService};

/// Execute the `save` command.
pub fn execute(
    cli: &Cli,
    username: &str,
    site: &str,
    secret: Option<&str>,
    generate: bool,
) -> Result<()> {
    let (paths, vault) = open_vault(cli)?;

    let secret = if generate {
        let settings = Settings::load(paths.dir())?;
        let options = PasswordOptions {
            length: settings.default_password_length,
            ..PasswordOptions::default()
        };
        zeroize::Zeroizing::new(generate_password(&options)?)
    } else {
        read_secret(secret, &format!("Secret for {username} at {site}"))?
    };

    match vault.save(username, site, &secret)? {
        InsertOutcome::Inserted => {
            crate::audit::log_audit(paths.dir(), "save", Some(username), Some(site), Some("added"));
            output::success(&format!("Saved credential for '{username}' at '{site}'"));
            if generate {
                output::tip("Run `credvault recover` to view the generated password.");
            }
            Ok(())
        }
        InsertOutcome::AlreadyExists => {
            output::info(&format!(
                "A credential for '{username}' at '{site}' already exists."
            ));

            let overwrite = Confirm::new()
                .with_prompt("Update it? (requires the administrator passphrase)")
                .default(false)
                .interact()
                .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;
            if !overwrite {
                return Err(VaultError::UserCancelled);
            }

            let admin = prompt_admin_passphrase()?;
            update_existing(&paths, &vault, username, site, &secret, &admin)
        }
    }
}

/// Overwrite a duplicate after the user agreed to escalate.
fn update_existing(
    paths: &VaultPaths,
    vault: &VaultService,
    username: &str,
    site: &str,
    secret: &str,
    admin: &str,
) -> Result<()> {
    let result = vault.update(username, site, secret, admin);
    audit_denial(paths.dir(), &result, Some(username), Some(site), "update on save");

    if with_denial_report(vault, result)? {
        crate::audit::log_audit(
            paths.dir(),
            "update",
            Some(username),
            Some(site),
            Some("replaced on save"),
        );
        output::success(&format!("Updated credential for '{username}' at '{site}'"));
    } else {
        output::warning("The credential was deleted in the meantime — nothing updated.");
    }
    Ok(())
}
