use crate::report::ReportKind;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "trackpm")]
#[command(
    author,
    version,
    about = "Keeps milestone and workstream issues of a GitHub project in sync with their tracked issues"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (searches upward for .trackpm.yml by default)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Read the project from a YAML or JSON file instead of GitHub
    #[arg(long, global = true)]
    pub fixture: Option<String>,

    /// GitHub access token (falls back to the configured token file)
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write JSON logs to this file (rotated daily)
    #[arg(long, global = true)]
    pub log_file: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rebuild the tracked-issue sections of milestone and workstream bodies
    #[command(visible_alias = "ui")]
    UpdateIssues {
        /// Save bodies before and after updating to the output directory
        #[arg(long, conflicts_with = "commit")]
        save: bool,

        /// Write changed bodies back to GitHub
        #[arg(long)]
        commit: bool,
    },

    /// Set the project milestone field of every issue under a milestone
    #[command(visible_alias = "umf")]
    UpdateMilestoneField {
        /// Write changed fields back to GitHub
        #[arg(long)]
        commit: bool,
    },

    /// Write markdown reports about workstreams and milestones
    #[command(visible_alias = "r")]
    Report {
        /// Which report to write
        #[arg(short, long, value_enum, default_value = "all")]
        kind: ReportKindArg,

        /// Directory to write reports to (defaults to the configured output path)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportKindArg {
    All,
    Workstreams,
    Milestones,
    Warnings,
}

impl From<ReportKindArg> for Vec<ReportKind> {
    fn from(arg: ReportKindArg) -> Self {
        match arg {
            ReportKindArg::All => ReportKind::ALL.to_vec(),
            ReportKindArg::Workstreams => vec![ReportKind::Workstreams],
            ReportKindArg::Milestones => vec![ReportKind::Milestones],
            ReportKindArg::Warnings => vec![ReportKind::Warnings],
        }
    }
}
