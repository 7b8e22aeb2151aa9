//! `credvault list` — display stored usernames and sites.

use crate::cli::output;
use crate::cli::{audit_denial, open_vault, prompt_admin_passphrase, with_denial_report, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `list` command.
pub fn execute(cli: &Cli, format: &str) -> Result<()> {
    let (paths, vault) = open_vault(cli)?;
    let admin = prompt_admin_passphrase()?;

    let result = vault.list_all(&admin);
    audit_denial(paths.dir(), &result, None, None, "list");
    let entries = with_denial_report(&vault, result)?;

    crate::audit::log_audit(paths.dir(), "list", None, None, None);

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&entries)
                .map_err(|e| VaultError::SerializationError(format!("JSON: {e}")))?;
            println!("{json}");
        }
        "table" => {
            output::info(&format!("{} credential(s)", entries.len()));
            output::print_credentials_table(&entries);
        }
        other => {
            return Err(VaultError::Validation(format!(
                "unknown format '{other}' — use table or json"
            )));
        }
    }

    Ok(())
}
