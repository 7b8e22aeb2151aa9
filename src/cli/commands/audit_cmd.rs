//! `credvault audit` — display the audit log.
//!
//! Usage:
//!   credvault audit               # show last 50 entries
//!   credvault audit --last 20     # show last 20

use crate::audit::{AuditEntry, AuditLog};
use crate::cli::output;
use crate::cli::{vault_paths, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize) -> Result<()> {
    let paths = vault_paths(cli)?;
    if !paths.exists() {
        return Err(VaultError::VaultNotFound(paths.dir().to_path_buf()));
    }

    let audit = AuditLog::open(paths.dir())
        .ok_or_else(|| VaultError::AuditError("failed to open audit database".into()))?;

    let entries = audit.query(last)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Print audit entries in a formatted table.
pub fn print_audit_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Username", "Site", "Details"]);

    for entry in entries {
        let time = entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
        table.add_row(vec![
            time,
            colorize_operation(&entry.operation),
            entry.username.clone().unwrap_or_else(|| "-".into()),
            entry.site.clone().unwrap_or_else(|| "-".into()),
            entry.details.clone().unwrap_or_else(|| "-".into()),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "init" | "save" => style(op).green().to_string(),
        "update" => style(op).blue().to_string(),
        "delete" => style(op).red().to_string(),
        "access-denied" => style(op).red().bold().to_string(),
        "recover" | "list" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorize_operation_returns_string() {
        assert!(!colorize_operation("init").is_empty());
        assert!(!colorize_operation("access-denied").is_empty());
        assert!(!colorize_operation("unknown").is_empty());
    }

    #[test]
    fn audit_query_limits_entries() {
        let dir = tempfile::TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("save", Some("alice"), Some("example.com"), Some("added"));
        audit.log("access-denied", None, None, Some("list"));
        audit.log("delete", Some("alice"), Some("example.com"), None);

        let entries = audit.query(2).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, "delete");
    }

    #[test]
    fn audit_empty_returns_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();
        assert!(audit.query(10).unwrap().is_empty());
    }
}
