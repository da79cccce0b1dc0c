use crate::reconcile;
use crate::snapshot::{self, AFTER_DIR, BEFORE_DIR};
use anyhow::{Context, Result};
use colored::Colorize;

use super::CommandContext;
use super::utils::{display_reference, print_error};

pub fn handle_update_issues(ctx: &CommandContext, save: bool, commit: bool) -> Result<()> {
    let mut graph = ctx.load_graph()?;

    let tracked: Vec<String> = graph
        .milestones()
        .into_iter()
        .chain(graph.workstreams())
        .map(|i| i.resource_path.clone())
        .collect();
    let output = ctx.output_path();

    if save {
        println!("Saving {} issues before updating...", tracked.len());
        snapshot::save_bodies(
            &output.join(BEFORE_DIR),
            tracked.iter().filter_map(|p| graph.get(p)),
        )
        .context("Failed to save issue bodies")?;
    }

    println!("Processing...");
    let summary = reconcile::update_all(&mut graph);

    if save {
        println!("Saving {} issues after updating...", tracked.len());
        snapshot::save_bodies(
            &output.join(AFTER_DIR),
            tracked.iter().filter_map(|p| graph.get(p)),
        )
        .context("Failed to save issue bodies")?;
    }

    for path in &summary.changed {
        let Some(issue) = graph.get(path) else {
            continue;
        };
        println!("{} body changed!", display_reference(issue).cyan());

        if commit {
            ctx.source
                .commit_body(&issue.id, issue.body_text())
                .with_context(|| format!("Failed to update {}", path))?;
        }
    }

    if summary.changed.is_empty() {
        println!("{}", "No bodies changed.".dimmed());
    } else if commit {
        println!("{} {} issue bodies", "Committed".green(), summary.changed.len());
    }

    for (path, error) in &summary.failures {
        print_error(&format!("{}: {}", path, error));
    }
    if !summary.failures.is_empty() {
        anyhow::bail!("{} issue(s) could not be updated", summary.failures.len());
    }

    Ok(())
}
