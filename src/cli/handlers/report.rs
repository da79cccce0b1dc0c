use crate::report::{ReportKind, Reporter};
use crate::snapshot::atomic_write;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use url::Url;

use super::CommandContext;

pub fn handle_report(
    ctx: &CommandContext,
    kinds: Vec<ReportKind>,
    output: Option<String>,
) -> Result<()> {
    let graph = ctx.load_graph()?;
    let web_url = Url::parse(&ctx.config.github.web_url)
        .with_context(|| format!("Invalid web url '{}'", ctx.config.github.web_url))?;
    let reporter = Reporter::new(&graph, web_url);

    let directory = output.map(PathBuf::from).unwrap_or_else(|| ctx.output_path());
    std::fs::create_dir_all(&directory)
        .with_context(|| format!("Failed to create {}", directory.display()))?;

    for kind in kinds {
        let path = directory.join(kind.file_name());
        let mut content = reporter.render(kind).join("\n");
        content.push('\n');
        atomic_write(&path, &content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{} {}", "Wrote".green(), path.display());
    }

    Ok(())
}
