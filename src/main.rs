use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use trackpm::cli::handlers::{
    CommandContext, handle_report, handle_update_issues, handle_update_milestone_field,
};
use trackpm::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    trackpm::logging::init(cli.verbose, cli.log_file.as_ref().map(PathBuf::from));
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Starting trackpm");

    let ctx = CommandContext::from_cli(&cli)?;

    match cli.command {
        Commands::UpdateIssues { save, commit } => handle_update_issues(&ctx, save, commit),
        Commands::UpdateMilestoneField { commit } => handle_update_milestone_field(&ctx, commit),
        Commands::Report { kind, output } => handle_report(&ctx, kind.into(), output),
    }
}
