//! `credvault recover` — decrypt and print (or copy) a stored secret.

use crate::cli::output;
use crate::cli::{audit_denial, open_vault, prompt_admin_passphrase, with_denial_report, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `recover` command.
pub fn execute(cli: &Cli, username: &str, site: &str, copy: bool) -> Result<()> {
    let (paths, vault) = open_vault(cli)?;
    let admin = prompt_admin_passphrase()?;

    let result = vault.recover(username, site, &admin);
    audit_denial(paths.dir(), &result, Some(username), Some(site), "recover");

    let Some(secret) = with_denial_report(&vault, result)? else {
        return Err(VaultError::CommandFailed(format!(
            "no credential for '{username}' at '{site}'"
        )));
    };

    crate::audit::log_audit(paths.dir(), "recover", Some(username), Some(site), None);

    if copy {
        copy_to_clipboard(&secret)?;
        output::success(&format!(
            "Secret for '{username}' at '{site}' copied to the clipboard."
        ));
    } else {
        println!("{}", secret.as_str());
    }

    Ok(())
}

#[cfg(feature = "clipboard")]
fn copy_to_clipboard(secret: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| VaultError::CommandFailed(format!("clipboard unavailable: {e}")))?;
    clipboard
        .set_text(secret)
        .map_err(|e| VaultError::CommandFailed(format!("clipboard write failed: {e}")))
}

#[cfg(not(feature = "clipboard"))]
fn copy_to_clipboard(_secret: &str) -> Result<()> {
    Err(VaultError::CommandFailed(
        "clipboard support not compiled — rebuild with `--features clipboard`".into(),
    ))
}
