//! `credvault status` — show the admin gate's lockout state.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;
use crate::gate::GateStatus;

/// Execute the `status` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (paths, vault) = open_vault(cli)?;

    output::info(&format!(
        "Vault at {} — {} credential(s)",
        paths.dir().display(),
        vault.count()?
    ));

    match vault.gate_status()? {
        GateStatus::Unlocked {
            attempts,
            remaining_attempts,
        } => {
            output::success(&format!(
                "Unlocked — {attempts} failed attempt(s), {remaining_attempts} remaining before lockout"
            ));
        }
        GateStatus::Locked { remaining } => {
            output::warning(&format!(
                "Locked — try again in {} seconds",
                remaining.as_secs().max(1)
            ));
        }
    }

    Ok(())
}
