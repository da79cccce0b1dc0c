use crate::propagate::{self, describe_path, milestone_paths};
use anyhow::{Context, Result};
use colored::Colorize;

use super::CommandContext;
use super::utils::{display_reference, print_warning};

pub fn handle_update_milestone_field(ctx: &CommandContext, commit: bool) -> Result<()> {
    let mut graph = ctx.load_graph()?;
    let plan = propagate::plan(&graph);

    for id in &plan.multiple_parents {
        let Some(issue) = graph.get_by_id(id) else {
            continue;
        };
        print_warning(&format!(
            "{} is tracked under more than one milestone",
            display_reference(issue)
        ));
        for path in milestone_paths(&graph, issue) {
            println!("    {}", describe_path(&path).dimmed());
        }
    }

    for change in &plan.changes {
        println!("{}", change.describe());
    }

    plan.apply(&mut graph)?;

    if commit {
        let mut committed = 0;
        for change in &plan.changes {
            let Some(item_id) = &change.item_id else {
                tracing::warn!(path = %change.resource_path, "Issue is not a project item; skipping");
                continue;
            };
            ctx.source
                .commit_milestone_field(item_id, &change.to)
                .with_context(|| format!("Failed to update {}", change.resource_path))?;
            committed += 1;
        }
        println!("{} {} milestone fields", "Committed".green(), committed);
    } else if plan.changes.is_empty() {
        println!("{}", "No milestone fields changed.".dimmed());
    }

    Ok(())
}
