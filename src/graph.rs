//! The in-memory issue graph for one run.
//!
//! [`IssueGraph`] owns every fetched [`Issue`]. Tracked-issue links are stored
//! as ids on the issues themselves and resolved through the graph, so the
//! graph is the only place an issue lives.

use crate::error::{Result, TrackError};
use crate::model::{Category, Issue};
use crate::reference;
use crate::source::IssueSource;
use std::collections::HashMap;

pub struct IssueGraph {
    /// Issues keyed by resource path.
    issues: HashMap<String, Issue>,
    /// Issue id -> resource path.
    by_id: HashMap<String, String>,
    milestones: Vec<String>,
    workstreams: Vec<String>,
}

impl IssueGraph {
    pub fn new(items: Vec<Issue>) -> Self {
        let mut issues: HashMap<String, Issue> = HashMap::new();
        let mut by_id = HashMap::new();

        for issue in items {
            by_id.insert(issue.id.clone(), issue.resource_path.clone());
            if let Some(previous) = issues.insert(issue.resource_path.clone(), issue) {
                tracing::warn!(path = %previous.resource_path, "Duplicate project item for issue");
            }
        }

        // Back-references are derived from the forward links.
        let mut edges: Vec<(String, String)> = issues
            .values()
            .flat_map(|parent| {
                parent
                    .tracked_issues
                    .iter()
                    .map(|child| (child.clone(), parent.id.clone()))
            })
            .collect();
        edges.sort();
        for (child_id, parent_id) in edges {
            let Some(child) = by_id.get(&child_id).and_then(|path| issues.get_mut(path)) else {
                continue;
            };
            if !child.tracked_by_issues.contains(&parent_id) {
                child.tracked_by_issues.push(parent_id);
            }
        }

        let mut milestones = paths_in_category(&issues, Category::ProjectMilestone);
        let mut workstreams = paths_in_category(&issues, Category::Workstream);
        milestones.sort();
        workstreams.sort();

        Self {
            issues,
            by_id,
            milestones,
            workstreams,
        }
    }

    /// Fetch every project item, then the bodies of milestones and workstreams.
    pub fn load(source: &dyn IssueSource) -> Result<Self> {
        let items = source.fetch_all_project_items()?;
        tracing::info!(count = items.len(), "Fetched project items");

        let (mut interesting, rest): (Vec<Issue>, Vec<Issue>) = items
            .into_iter()
            .partition(|i| i.is_milestone() || i.is_workstream());
        source.fetch_bodies(&mut interesting)?;
        tracing::debug!(count = interesting.len(), "Fetched milestone and workstream bodies");

        interesting.extend(rest);
        Ok(Self::new(interesting))
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn get(&self, resource_path: &str) -> Option<&Issue> {
        self.issues.get(resource_path)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Issue> {
        self.by_id.get(id).and_then(|path| self.issues.get(path))
    }

    /// All issues, ordered by resource path.
    pub fn issues(&self) -> Vec<&Issue> {
        let mut all: Vec<&Issue> = self.issues.values().collect();
        all.sort_by(|a, b| a.resource_path.cmp(&b.resource_path));
        all
    }

    /// Project milestones, ordered by resource path.
    pub fn milestones(&self) -> Vec<&Issue> {
        self.milestones.iter().filter_map(|p| self.get(p)).collect()
    }

    /// Workstreams, ordered by resource path.
    pub fn workstreams(&self) -> Vec<&Issue> {
        self.workstreams.iter().filter_map(|p| self.get(p)).collect()
    }

    /// Children of `issue` that are part of the graph, in link order.
    pub fn tracked_issues(&self, issue: &Issue) -> Vec<&Issue> {
        issue
            .tracked_issues
            .iter()
            .filter_map(|id| self.get_by_id(id))
            .collect()
    }

    /// Parents of `issue` that are part of the graph.
    pub fn tracked_by_issues(&self, issue: &Issue) -> Vec<&Issue> {
        issue
            .tracked_by_issues
            .iter()
            .filter_map(|id| self.get_by_id(id))
            .collect()
    }

    /// Look up the issue `reference` names when written inside `context`.
    ///
    /// `None` when the reference cannot be parsed or the issue is not in the
    /// project; callers decide whether that matters.
    pub fn find_issue(&self, context: &Issue, reference: &str) -> Option<&Issue> {
        let path = reference::to_resource_path(reference, &context.resource_path)?;
        self.get(&path)
    }

    pub fn set_body(&mut self, resource_path: &str, body: String) -> Result<()> {
        let issue = self
            .issues
            .get_mut(resource_path)
            .ok_or_else(|| TrackError::NotFound(resource_path.to_string()))?;
        issue.body = Some(body);
        Ok(())
    }

    pub fn set_project_milestone(&mut self, id: &str, milestone: Option<String>) -> Result<()> {
        let issue = self
            .by_id
            .get(id)
            .and_then(|path| self.issues.get_mut(path))
            .ok_or_else(|| TrackError::NotFound(id.to_string()))?;
        issue.project_milestone = milestone;
        Ok(())
    }
}

fn paths_in_category(issues: &HashMap<String, Issue>, category: Category) -> Vec<String> {
    issues
        .values()
        .filter(|i| i.category == category)
        .map(|i| i.resource_path.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(n: u32, category: Category) -> Issue {
        Issue::new(format!("id{n}"), format!("test/issues/{n}")).with_category(category)
    }

    fn sample() -> IssueGraph {
        IssueGraph::new(vec![
            issue(3, Category::Workstream),
            issue(1, Category::ProjectMilestone).with_tracked_issues(vec!["id2".into(), "id9".into()]),
            issue(2, Category::Workstream).with_tracked_issues(vec!["id4".into()]),
            issue(4, Category::Item),
        ])
    }

    #[test]
    fn test_views_are_sorted_by_path() {
        let graph = sample();
        let milestones: Vec<_> = graph.milestones().iter().map(|i| i.id.clone()).collect();
        let workstreams: Vec<_> = graph.workstreams().iter().map(|i| i.id.clone()).collect();
        assert_eq!(milestones, vec!["id1"]);
        assert_eq!(workstreams, vec!["id2", "id3"]);
        assert_eq!(graph.len(), 4);
    }

    #[test]
    fn test_back_references_are_derived() {
        let graph = sample();
        let item = graph.get("test/issues/4").unwrap();
        assert_eq!(item.tracked_by_issues, vec!["id2"]);
        let parents: Vec<_> = graph
            .tracked_by_issues(graph.get("test/issues/2").unwrap())
            .iter()
            .map(|i| i.id.clone())
            .collect();
        assert_eq!(parents, vec!["id1"]);
    }

    #[test]
    fn test_dangling_children_are_skipped() {
        let graph = sample();
        let milestone = graph.get("test/issues/1").unwrap();
        let children: Vec<_> = graph
            .tracked_issues(milestone)
            .iter()
            .map(|i| i.id.clone())
            .collect();
        assert_eq!(children, vec!["id2"]);
    }

    #[test]
    fn test_find_issue() {
        let graph = sample();
        let context = graph.get("test/issues/2").unwrap();
        assert_eq!(graph.find_issue(context, "#1").unwrap().id, "id1");
        assert_eq!(graph.find_issue(context, "test#1").unwrap().id, "id1");
        assert!(graph.find_issue(context, "#99").is_none());
        assert!(graph.find_issue(context, "not a reference").is_none());
    }

    #[test]
    fn test_set_body_and_milestone() {
        let mut graph = sample();
        graph
            .set_body("test/issues/1", "new body".to_string())
            .unwrap();
        assert_eq!(graph.get("test/issues/1").unwrap().body_text(), "new body");

        graph
            .set_project_milestone("id4", Some("M1".to_string()))
            .unwrap();
        assert_eq!(
            graph.get_by_id("id4").unwrap().project_milestone.as_deref(),
            Some("M1")
        );
        assert!(graph.set_body("test/issues/77", String::new()).is_err());
    }
}
