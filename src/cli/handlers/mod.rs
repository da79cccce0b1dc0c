mod report;
mod update_issues;
mod update_milestone_field;
mod utils;

pub use report::handle_report;
pub use update_issues::handle_update_issues;
pub use update_milestone_field::handle_update_milestone_field;

use crate::config::TrackConfig;
use crate::graph::IssueGraph;
use crate::source::{FixtureSource, GitHubSource, IssueSource};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::Cli;

/// Common context passed to all command handlers
pub struct CommandContext {
    pub config: TrackConfig,
    pub root: PathBuf,
    pub source: Box<dyn IssueSource>,
}

impl CommandContext {
    pub fn new(config: TrackConfig, root: PathBuf, source: Box<dyn IssueSource>) -> Self {
        Self {
            config,
            root,
            source,
        }
    }

    /// Load configuration and pick the issue source the arguments ask for.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let (config, root) = match &cli.config {
            Some(path) => TrackConfig::load_from(Path::new(path)),
            None => TrackConfig::load(&std::env::current_dir()?),
        }
        .context("Failed to load trackpm configuration")?;

        let source: Box<dyn IssueSource> = match &cli.fixture {
            Some(path) => Box::new(
                FixtureSource::open(Path::new(path))
                    .with_context(|| format!("Failed to read fixture {}", path))?,
            ),
            None => {
                let token = config.resolve_token(&root, cli.token.clone())?;
                Box::new(GitHubSource::new(
                    config.github.clone(),
                    config.fields.clone(),
                    token,
                )?)
            }
        };

        Ok(Self::new(config, root, source))
    }

    pub fn load_graph(&self) -> Result<IssueGraph> {
        println!("Fetching data...");
        IssueGraph::load(self.source.as_ref()).context("Failed to fetch project issues")
    }

    pub fn output_path(&self) -> PathBuf {
        self.config.output_path(&self.root)
    }
}
