//! `credvault generate` — print a random password.
//!
//! Works without a vault: only the optional config file is read.

use crate::cli::{vault_paths, Cli};
use crate::config::Settings;
use crate::errors::Result;
use crate::generator::{generate_password, PasswordOptions};

/// Flags of the `generate` command.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateFlags {
    pub length: Option<usize>,
    pub no_upper: bool,
    pub no_lower: bool,
    pub no_numbers: bool,
    pub no_special: bool,
}

/// Execute the `generate` command.
pub fn execute(cli: &Cli, flags: GenerateFlags) -> Result<()> {
    let default_length = match vault_paths(cli) {
        Ok(paths) => Settings::load(paths.dir())?.default_password_length,
        Err(_) => Settings::default().default_password_length,
    };

    let options = PasswordOptions {
        length: flags.length.unwrap_or(default_length),
        use_upper: !flags.no_upper,
        use_lower: !flags.no_lower,
        use_numbers: !flags.no_numbers,
        use_special: !flags.no_special,
    };

    println!("{}", generate_password(&options)?);
    Ok(())
}
