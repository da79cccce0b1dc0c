//! Markdown-ish reports over the tracked-issue graph.
//!
//! Reports are plain lines; formatting them further is up to the caller.

use crate::graph::IssueGraph;
use crate::model::Issue;
use crate::reference;
use crate::traversal::walk;
use std::collections::HashSet;
use url::Url;

pub const DEFAULT_WEB_URL: &str = "https://github.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Workstreams,
    Milestones,
    Warnings,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [
        ReportKind::Workstreams,
        ReportKind::Milestones,
        ReportKind::Warnings,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            ReportKind::Workstreams => "report-workstreams.md",
            ReportKind::Milestones => "report-milestones.md",
            ReportKind::Warnings => "report-warnings.md",
        }
    }
}

pub struct Reporter<'g> {
    graph: &'g IssueGraph,
    web_url: Url,
}

impl<'g> Reporter<'g> {
    /// `web_url` may carry a path prefix (GitHub Enterprise); it is kept
    /// when joining issue paths.
    pub fn new(graph: &'g IssueGraph, mut web_url: Url) -> Self {
        if !web_url.path().ends_with('/') {
            let path = format!("{}/", web_url.path());
            web_url.set_path(&path);
        }
        Self { graph, web_url }
    }

    pub fn render(&self, kind: ReportKind) -> Vec<String> {
        match kind {
            ReportKind::Workstreams => self.workstreams_report(),
            ReportKind::Milestones => self.milestones_report(),
            ReportKind::Warnings => self.warnings_report(),
        }
    }

    /// Every workstream with the issues it tracks.
    pub fn workstreams_report(&self) -> Vec<String> {
        self.graph
            .workstreams()
            .into_iter()
            .flat_map(|w| self.workstream_report(w))
            .collect()
    }

    /// Every milestone with the issues it tracks.
    pub fn milestones_report(&self) -> Vec<String> {
        self.graph
            .milestones()
            .into_iter()
            .flat_map(|m| self.milestone_report(m))
            .collect()
    }

    /// Workstream field problems, grouped by workstream.
    pub fn warnings_report(&self) -> Vec<String> {
        self.graph
            .workstreams()
            .into_iter()
            .flat_map(|w| self.workstream_warnings(w))
            .collect()
    }

    pub fn workstream_report(&self, workstream: &'g Issue) -> Vec<String> {
        let mut lines = vec![format!("# {}", self.issue_link(workstream, None))];
        lines.extend(self.tracked_issue_list(workstream));
        lines.push(String::new());
        lines
    }

    pub fn milestone_report(&self, milestone: &'g Issue) -> Vec<String> {
        let heading = match milestone.target_date {
            Some(date) => format!("# {} - {}", self.issue_link(milestone, None), date),
            None => format!("# {}", self.issue_link(milestone, None)),
        };
        let mut lines = vec![heading];
        lines.extend(self.tracked_issue_list(milestone));
        lines.push(String::new());
        lines
    }

    fn workstream_warnings(&self, workstream: &'g Issue) -> Vec<String> {
        let mut lines = self.mismatch_section(workstream);
        lines.extend(self.unlinked_section(workstream));

        if !lines.is_empty() {
            lines.insert(0, format!("# {}", self.issue_link(workstream, None)));
            lines.push(String::new());
        }
        lines
    }

    /// Nested bullet list of everything reachable from `start`.
    ///
    /// Issues reachable along several paths are listed in full once and
    /// marked "(see above)" afterwards.
    pub fn tracked_issue_list(&self, start: &'g Issue) -> Vec<String> {
        let mut lines = Vec::new();

        walk(self.graph, start, |issue, depth, seen| {
            if depth == 0 {
                return;
            }
            let indent = "  ".repeat(depth - 1);
            lines.push(format!("{} * {}", indent, self.issue_link(issue, Some(start))));
            if seen {
                lines.push(format!("{}   * (see above)", indent));
            }
        });

        lines
    }

    /// Linked issues whose workstream field differs from the workstream's own.
    pub fn workstream_mismatches(&self, workstream: &'g Issue) -> Vec<&'g Issue> {
        let mut mismatched = Vec::new();

        walk(self.graph, workstream, |issue, _, seen| {
            if !seen && issue.workstream != workstream.workstream {
                mismatched.push(issue);
            }
        });

        mismatched
    }

    /// Issues claiming this workstream in their field but not linked under it.
    ///
    /// Empty when the workstream issue has no workstream field itself.
    pub fn unlinked_workstream_issues(&self, workstream: &'g Issue) -> Vec<&'g Issue> {
        let Some(name) = workstream.workstream.as_deref() else {
            tracing::debug!(path = %workstream.resource_path, "Workstream has no workstream field");
            return Vec::new();
        };

        let mut linked: HashSet<&str> = HashSet::new();
        walk(self.graph, workstream, |issue, _, seen| {
            if !seen {
                linked.insert(issue.id.as_str());
            }
        });

        self.graph
            .issues()
            .into_iter()
            .filter(|i| i.workstream.as_deref() == Some(name))
            .filter(|i| !linked.contains(i.id.as_str()))
            .collect()
    }

    fn mismatch_section(&self, workstream: &'g Issue) -> Vec<String> {
        let mismatched = self.workstream_mismatches(workstream);
        if mismatched.is_empty() {
            return Vec::new();
        }

        let mut lines = vec![
            "## Workstream Field Mismatches".to_string(),
            "These issues are linked to the main workstream issue, but don't have".to_string(),
            format!(
                "their workstream field set to '{}'",
                workstream.workstream.as_deref().unwrap_or_default()
            ),
            String::new(),
            "|Issue|Workstream|".to_string(),
            "|--|--|".to_string(),
        ];
        for issue in mismatched {
            lines.push(format!(
                "| {} | {} |",
                self.issue_link(issue, None),
                issue.workstream.as_deref().unwrap_or_default()
            ));
        }
        lines
    }

    fn unlinked_section(&self, workstream: &'g Issue) -> Vec<String> {
        let unlinked = self.unlinked_workstream_issues(workstream);
        if unlinked.is_empty() {
            return Vec::new();
        }

        let mut lines = vec![
            "## Unlinked workstream issues".to_string(),
            format!(
                "These issues have the workstream field set to '{}'",
                workstream.workstream.as_deref().unwrap_or_default()
            ),
            "but are not linked to the workstream issue itself.".to_string(),
            String::new(),
        ];
        lines.extend(
            unlinked
                .into_iter()
                .map(|i| format!("* {}", self.issue_link(i, None))),
        );
        lines
    }

    /// `✅Title ([#12](https://github.com/owner/repo/issues/12))`, with 🟦 for open issues.
    pub fn issue_link(&self, issue: &Issue, context: Option<&Issue>) -> String {
        let context = context.unwrap_or(issue);
        let reference = reference::to_reference(&issue.resource_path, &context.resource_path)
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to resource path in link");
                issue.resource_path.clone()
            });
        let relative = issue.resource_path.trim_start_matches('/');
        let href = self
            .web_url
            .join(relative)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| format!("{}{}", self.web_url, relative));
        let icon = if issue.is_closed() { "✅" } else { "🟦" };
        let title = issue.title.as_deref().unwrap_or_default();

        format!("{}{} ([{}]({}))", icon, title, reference, href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, IssueState};

    fn issue(n: u32, title: &str, children: &[u32]) -> Issue {
        Issue::new(format!("id{n}"), format!("/org/repo/issues/{n}"))
            .with_category(Category::Item)
            .with_title(title)
            .with_tracked_issues(children.iter().map(|c| format!("id{c}")).collect())
    }

    fn reporter(graph: &IssueGraph) -> Reporter<'_> {
        Reporter::new(graph, Url::parse(DEFAULT_WEB_URL).unwrap())
    }

    fn sample() -> IssueGraph {
        IssueGraph::new(vec![
            issue(1, "[workstream] Tools", &[2, 3])
                .with_category(Category::Workstream)
                .with_workstream("Tools"),
            issue(2, "Parser", &[4]).with_workstream("Tools"),
            issue(3, "Lexer", &[4])
                .with_workstream("Other")
                .with_state(IssueState::Closed),
            issue(4, "Shared", &[]).with_workstream("Tools"),
            issue(5, "Forgotten", &[]).with_workstream("Tools"),
        ])
    }

    #[test]
    fn test_issue_link() {
        let graph = sample();
        let r = reporter(&graph);
        assert_eq!(
            r.issue_link(graph.get("/org/repo/issues/2").unwrap(), None),
            "🟦Parser ([#2](https://github.com/org/repo/issues/2))"
        );
        assert_eq!(
            r.issue_link(graph.get("/org/repo/issues/3").unwrap(), None),
            "✅Lexer ([#3](https://github.com/org/repo/issues/3))"
        );

        let other = Issue::new("x", "/other/place/issues/9").with_title("Elsewhere");
        assert_eq!(
            r.issue_link(&other, graph.get("/org/repo/issues/1")),
            "🟦Elsewhere ([other/place#9](https://github.com/other/place/issues/9))"
        );
    }

    #[test]
    fn test_issue_link_keeps_web_url_prefix() {
        let graph = sample();
        let issue = graph.get("/org/repo/issues/2").unwrap();

        for base in ["https://host.example/github", "https://host.example/github/"] {
            let r = Reporter::new(&graph, Url::parse(base).unwrap());
            assert_eq!(
                r.issue_link(issue, None),
                "🟦Parser ([#2](https://host.example/github/org/repo/issues/2))"
            );
        }
    }

    #[test]
    fn test_tracked_issue_list_marks_repeats() {
        let graph = sample();
        let r = reporter(&graph);
        let lines = r.tracked_issue_list(graph.get("/org/repo/issues/1").unwrap());
        assert_eq!(
            lines,
            vec![
                " * 🟦Parser ([#2](https://github.com/org/repo/issues/2))",
                "   * 🟦Shared ([#4](https://github.com/org/repo/issues/4))",
                " * ✅Lexer ([#3](https://github.com/org/repo/issues/3))",
                "   * 🟦Shared ([#4](https://github.com/org/repo/issues/4))",
                "     * (see above)",
            ]
        );
    }

    #[test]
    fn test_workstream_mismatches() {
        let graph = sample();
        let r = reporter(&graph);
        let ids: Vec<_> = r
            .workstream_mismatches(graph.get("/org/repo/issues/1").unwrap())
            .iter()
            .map(|i| i.id.clone())
            .collect();
        assert_eq!(ids, vec!["id3"]);
    }

    #[test]
    fn test_unlinked_workstream_issues() {
        let graph = sample();
        let r = reporter(&graph);
        let ids: Vec<_> = r
            .unlinked_workstream_issues(graph.get("/org/repo/issues/1").unwrap())
            .iter()
            .map(|i| i.id.clone())
            .collect();
        assert_eq!(ids, vec!["id5"]);
    }

    #[test]
    fn test_unlinked_needs_workstream_field() {
        let graph = IssueGraph::new(vec![
            issue(1, "W", &[]).with_category(Category::Workstream),
            issue(2, "Loose", &[]),
        ]);
        let r = reporter(&graph);
        assert!(
            r.unlinked_workstream_issues(graph.get("/org/repo/issues/1").unwrap())
                .is_empty()
        );
        assert!(r.warnings_report().is_empty());
    }

    #[test]
    fn test_warnings_report_sections() {
        let graph = sample();
        let lines = reporter(&graph).warnings_report();
        assert_eq!(
            lines[0],
            "# 🟦[workstream] Tools ([#1](https://github.com/org/repo/issues/1))"
        );
        assert!(lines.contains(&"## Workstream Field Mismatches".to_string()));
        assert!(lines.contains(&"## Unlinked workstream issues".to_string()));
        assert!(lines.contains(&"* 🟦Forgotten ([#5](https://github.com/org/repo/issues/5))".to_string()));
    }

    #[test]
    fn test_render_dispatches_by_kind() {
        let graph = sample();
        let r = reporter(&graph);
        assert_eq!(r.render(ReportKind::Workstreams), r.workstreams_report());
        assert!(r.render(ReportKind::Milestones).is_empty());
        assert_eq!(ReportKind::Warnings.file_name(), "report-warnings.md");
    }

    #[test]
    fn test_milestone_report_heading_has_date() {
        let mut milestone = issue(7, "M1", &[]).with_category(Category::ProjectMilestone);
        milestone.target_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1);
        let graph = IssueGraph::new(vec![milestone]);
        let lines = reporter(&graph).milestones_report();
        assert_eq!(
            lines[0],
            "# 🟦M1 ([#7](https://github.com/org/repo/issues/7)) - 2024-01-01"
        );
    }
}
