//! One module per subcommand.

pub mod audit_cmd;
pub mod completions;
pub mod delete;
pub mod generate;
pub mod init;
pub mod list;
pub mod recover;
pub mod save;
pub mod status;
pub mod update;
