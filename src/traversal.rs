//! Depth-first walk over tracked issues.
//!
//! The tracked-issue graph is not a tree: an issue can be tracked by several
//! parents and links can form cycles. [`walk`] visits every reachable issue
//! once and reports later encounters without descending into them again.

use crate::graph::IssueGraph;
use crate::model::Issue;
use std::collections::HashSet;

/// Walk the issues tracked by `root`, depth first.
///
/// The visitor receives `(issue, depth, already_seen)`. The root is visited at
/// depth 0. An issue met a second time is passed with `already_seen = true`
/// and its children are not visited again. Children are visited ordered by
/// state name, descending, so open issues come before closed ones.
pub fn walk<'g, F>(graph: &'g IssueGraph, root: &'g Issue, mut visitor: F)
where
    F: FnMut(&'g Issue, usize, bool),
{
    walk_pruned(graph, root, |issue, depth, seen| {
        visitor(issue, depth, seen);
        true
    });
}

/// Like [`walk`], but the visitor decides whether to descend into an issue.
///
/// Returning `false` skips the children of an issue seen for the first time.
/// Skipped issues still count as seen.
pub fn walk_pruned<'g, F>(graph: &'g IssueGraph, root: &'g Issue, mut visitor: F)
where
    F: FnMut(&'g Issue, usize, bool) -> bool,
{
    let mut seen: HashSet<&'g str> = HashSet::new();
    visit(graph, root, 0, &mut seen, &mut visitor);
}

fn visit<'g, F>(
    graph: &'g IssueGraph,
    issue: &'g Issue,
    depth: usize,
    seen: &mut HashSet<&'g str>,
    visitor: &mut F,
) where
    F: FnMut(&'g Issue, usize, bool) -> bool,
{
    if !seen.insert(issue.id.as_str()) {
        visitor(issue, depth, true);
        return;
    }

    if !visitor(issue, depth, false) {
        return;
    }

    let mut children = graph.tracked_issues(issue);
    children.sort_by(|a, b| b.state.name().cmp(a.state.name()));
    for child in children {
        visit(graph, child, depth + 1, seen, visitor);
    }
}
