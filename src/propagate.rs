//! Propagation of the project milestone field down the tracked-issue graph.
//!
//! Every issue reachable from a project milestone should carry that
//! milestone's `project_milestone` value. Milestones are processed in path
//! order and the first milestone to reach an issue wins; any later milestone
//! that reaches it again is reported instead of overwriting it.

use crate::error::Result;
use crate::graph::IssueGraph;
use crate::model::Issue;
use crate::reference;
use crate::traversal::walk_pruned;
use std::collections::HashSet;

/// One pending update of an issue's project milestone field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub issue_id: String,
    /// Project item to write the field on; `None` for issues that were never
    /// added to the project.
    pub item_id: Option<String>,
    pub resource_path: String,
    pub from: Option<String>,
    pub to: String,
}

impl FieldChange {
    /// `owner/repo#N: old --> new`
    pub fn describe(&self) -> String {
        let name = reference::full_reference(&self.resource_path)
            .unwrap_or_else(|_| self.resource_path.clone());
        format!(
            "{}: {} --> {}",
            name,
            self.from.as_deref().unwrap_or("None"),
            self.to
        )
    }
}

#[derive(Debug, Default)]
pub struct PropagationPlan {
    pub changes: Vec<FieldChange>,
    /// Ids of issues reached from more than one place, in discovery order.
    pub multiple_parents: Vec<String>,
}

impl PropagationPlan {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.multiple_parents.is_empty()
    }

    /// Apply every change to the in-memory graph.
    pub fn apply(&self, graph: &mut IssueGraph) -> Result<()> {
        for change in &self.changes {
            graph.set_project_milestone(&change.issue_id, Some(change.to.clone()))?;
        }
        Ok(())
    }
}

/// Work out which issues need their project milestone field changed.
///
/// Issues already carrying the right value produce no change. A milestone
/// without a value of its own still claims its issues, so they are not
/// assigned by a later milestone either.
pub fn plan(graph: &IssueGraph) -> PropagationPlan {
    let mut plan = PropagationPlan::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for milestone in graph.milestones() {
        let name = milestone.project_milestone.as_deref();
        if name.is_none() {
            tracing::warn!(
                path = %milestone.resource_path,
                "Milestone has no project milestone value; its issues are left unchanged"
            );
        }

        walk_pruned(graph, milestone, |issue, _, already_seen| {
            // The walk's own seen set covers repeats inside one milestone,
            // the shared set covers repeats across milestones. Neither is
            // descended into again.
            if already_seen || !seen.insert(issue.id.as_str()) {
                if !plan.multiple_parents.contains(&issue.id) {
                    plan.multiple_parents.push(issue.id.clone());
                }
                return false;
            }

            if let Some(name) = name {
                if issue.project_milestone.as_deref() != Some(name) {
                    plan.changes.push(change_for(issue, name));
                }
            }
            true
        });
    }

    plan
}

fn change_for(issue: &Issue, name: &str) -> FieldChange {
    FieldChange {
        issue_id: issue.id.clone(),
        item_id: issue.item_id.clone(),
        resource_path: issue.resource_path.clone(),
        from: issue.project_milestone.clone(),
        to: name.to_string(),
    }
}

/// Every upward path from `issue` to a project milestone ancestor.
///
/// Paths start at the issue itself and end at the milestone. A path stops at
/// the first milestone it meets and never visits the same issue twice.
pub fn milestone_paths<'g>(graph: &'g IssueGraph, issue: &'g Issue) -> Vec<Vec<&'g Issue>> {
    let mut paths = Vec::new();
    let mut current = vec![issue];
    climb(graph, &mut current, &mut paths);
    paths
}

fn climb<'g>(graph: &'g IssueGraph, current: &mut Vec<&'g Issue>, paths: &mut Vec<Vec<&'g Issue>>) {
    let Some(&top) = current.last() else {
        return;
    };

    for parent in graph.tracked_by_issues(top) {
        if current.iter().any(|i| i.id == parent.id) {
            continue;
        }
        current.push(parent);
        if parent.is_milestone() {
            paths.push(current.clone());
        } else {
            climb(graph, current, paths);
        }
        current.pop();
    }
}

/// `A <- B <- M` style rendering of a path, using references relative to the
/// first issue.
pub fn describe_path(path: &[&Issue]) -> String {
    let Some(first) = path.first() else {
        return String::new();
    };
    path.iter()
        .map(|i| {
            reference::to_reference(&i.resource_path, &first.resource_path)
                .unwrap_or_else(|_| i.resource_path.clone())
        })
        .collect::<Vec<_>>()
        .join(" <- ")
}
