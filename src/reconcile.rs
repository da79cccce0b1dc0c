//! Keeping milestone and workstream data blocks in agreement.
//!
//! Each side of the shared data is authoritative for half of it:
//!
//! - A workstream owns the content it lists under each milestone. Milestone
//!   bodies are regenerated from those contents on every run.
//! - A milestone owns its own title. Workstream bodies only get their section
//!   titles refreshed; their contents are never touched.

use crate::body::{BodyDocument, DataBlock, Section, SectionType};
use crate::error::{Result, TrackError};
use crate::graph::IssueGraph;
use crate::model::{Category, Issue};
use crate::reference;
use regex::Regex;
use std::sync::LazyLock;

/// Title used for issues that have none, e.g. drafts.
pub const UNTITLED_PLACEHOLDER: &str = "Issue has no title - maybe draft?";

static TAG_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[.*\](.*)").expect("tag prefix regex is valid"));

/// Section heading naming `issue` from inside `context`.
///
/// A leading `[tag]` is dropped: `[workstream] Resources` becomes
/// `Resources (#12)`.
pub fn build_section_title(issue: &Issue, context: &Issue) -> Result<String> {
    let Some(title) = issue.title.as_deref() else {
        return Ok(UNTITLED_PLACEHOLDER.to_string());
    };

    let title = match TAG_PREFIX.captures(title) {
        Some(captures) => captures[1].trim().to_string(),
        None => title.to_string(),
    };
    let reference = reference::to_reference(&issue.resource_path, &context.resource_path)?;

    Ok(format!("{} ({})", title, reference))
}

/// The lines `source` lists under its section about `target`.
///
/// Empty when `source` has no such section.
pub fn contents_for(source: &Issue, target: &Issue) -> Vec<String> {
    let doc = BodyDocument::parse(source.body_text());

    doc.data
        .sections
        .into_iter()
        .find(|section| {
            section
                .reference()
                .and_then(|r| reference::to_resource_path(r, &source.resource_path))
                .is_some_and(|path| path == target.resource_path)
        })
        .map(|section| section.contents)
        .unwrap_or_default()
}

fn expect_section_type(
    issue: &Issue,
    found: Option<SectionType>,
    expected: SectionType,
) -> Result<()> {
    if found == Some(expected) {
        return Ok(());
    }
    Err(TrackError::UnexpectedSectionType {
        resource_path: issue.resource_path.clone(),
        expected: expected.to_string(),
        found: found.map_or_else(|| "None".to_string(), |t| t.to_string()),
    })
}

/// Regenerate a milestone's `## Workstreams` block from the workstreams.
///
/// Returns the new body; the issue itself is not modified.
pub fn update_milestone(milestone: &Issue, graph: &IssueGraph) -> Result<String> {
    let doc = BodyDocument::parse(milestone.body_text());
    expect_section_type(milestone, doc.data.section_type, SectionType::Workstreams)?;

    let mut sections = Vec::new();
    for workstream in graph.workstreams() {
        let contents = contents_for(workstream, milestone);
        let section = Section {
            title: Some(build_section_title(workstream, milestone)?),
            contents,
        };
        if section.has_content() {
            sections.push(section);
        } else {
            tracing::trace!(
                milestone = %milestone.resource_path,
                workstream = %workstream.resource_path,
                "No content for milestone"
            );
        }
    }

    let data = DataBlock {
        section_type: doc.data.section_type,
        sections,
    };
    Ok(doc.with_data(data).render())
}

/// Refresh the section titles of a workstream's `## Milestones` block.
///
/// Returns `None` when the body has no data block yet.
pub fn update_workstream(workstream: &Issue, graph: &IssueGraph) -> Result<Option<String>> {
    let mut doc = BodyDocument::parse(workstream.body_text());
    if doc.data.section_type.is_none() {
        return Ok(None);
    }
    expect_section_type(workstream, doc.data.section_type, SectionType::Milestones)?;

    for section in &mut doc.data.sections {
        let Some(reference) = section.reference() else {
            continue;
        };
        let Some(target) = graph.find_issue(workstream, reference) else {
            tracing::warn!(
                workstream = %workstream.resource_path,
                reference,
                "Section refers to an issue that is not in the project"
            );
            continue;
        };
        section.title = Some(build_section_title(target, workstream)?);
    }

    Ok(Some(doc.render()))
}

/// Reconcile one issue's body in place.
///
/// Returns whether the body text changed. On error the body is left as it was.
pub fn update(graph: &mut IssueGraph, resource_path: &str) -> Result<bool> {
    let issue = graph
        .get(resource_path)
        .ok_or_else(|| TrackError::NotFound(resource_path.to_string()))?;

    if issue.body_text().is_empty() {
        return Ok(false);
    }

    let new_body = match issue.category {
        Category::ProjectMilestone => Some(update_milestone(issue, graph)?),
        Category::Workstream => update_workstream(issue, graph)?,
        _ => None,
    };

    let Some(new_body) = new_body else {
        return Ok(false);
    };
    let changed = new_body != issue.body_text();
    if changed {
        tracing::debug!(path = %resource_path, "Body updated");
        graph.set_body(resource_path, new_body)?;
    }
    Ok(changed)
}

/// Outcome of reconciling every milestone and workstream.
#[derive(Debug, Default)]
pub struct UpdateSummary {
    /// Resource paths whose body changed.
    pub changed: Vec<String>,
    /// Issues whose update was abandoned.
    pub failures: Vec<(String, TrackError)>,
}

/// Reconcile milestones, then workstreams.
///
/// A failure only abandons that issue; updates already made stay in place.
pub fn update_all(graph: &mut IssueGraph) -> UpdateSummary {
    let paths: Vec<String> = graph
        .milestones()
        .into_iter()
        .chain(graph.workstreams())
        .map(|i| i.resource_path.clone())
        .collect();

    let mut summary = UpdateSummary::default();
    for path in paths {
        match update(graph, &path) {
            Ok(true) => summary.changed.push(path),
            Ok(false) => {}
            Err(e) => {
                tracing::error!(path = %path, error = %e, "Failed to update issue");
                summary.failures.push((path, e));
            }
        }
    }
    summary
}
