use clap::Parser;
use tracing_subscriber::EnvFilter;

use credvault::cli::commands::generate::GenerateFlags;
use credvault::cli::{Cli, Commands};

/// Diagnostics go to stderr, filtered by `CREDVAULT_LOG` (default: warn).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("CREDVAULT_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => credvault::cli::commands::init::execute(&cli),
        Commands::Save {
            ref username,
            ref site,
            ref secret,
            generate,
        } => credvault::cli::commands::save::execute(
            &cli,
            username,
            site,
            secret.as_deref(),
            generate,
        ),
        Commands::Update {
            ref username,
            ref site,
            ref secret,
        } => credvault::cli::commands::update::execute(&cli, username, site, secret.as_deref()),
        Commands::Recover {
            ref username,
            ref site,
            copy,
        } => credvault::cli::commands::recover::execute(&cli, username, site, copy),
        Commands::List { ref format } => credvault::cli::commands::list::execute(&cli, format),
        Commands::Delete {
            ref username,
            ref site,
            force,
        } => credvault::cli::commands::delete::execute(&cli, username, site, force),
        Commands::Status => credvault::cli::commands::status::execute(&cli),
        Commands::Generate {
            length,
            no_upper,
            no_lower,
            no_numbers,
            no_special,
        } => credvault::cli::commands::generate::execute(
            &cli,
            GenerateFlags {
                length,
                no_upper,
                no_lower,
                no_numbers,
                no_special,
            },
        ),
        Commands::Audit { last } => credvault::cli::commands::audit_cmd::execute(&cli, last),
        Commands::Completions { ref shell } => {
            credvault::cli::commands::completions::execute(shell)
        }
    };

    if let Err(e) = result {
        credvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
