use super::types::{Category, IssueState};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,

    pub resource_path: String,

    #[serde(default)]
    pub category: Category,

    #[serde(default)]
    pub state: IssueState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workstream: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_milestone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Ids of the issues this one tracks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tracked_issues: Vec<String>,

    /// Ids of the issues tracking this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tracked_by_issues: Vec<String>,
}

impl Issue {
    pub fn new(id: impl Into<String>, resource_path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            item_id: None,
            resource_path: resource_path.into(),
            category: Category::default(),
            state: IssueState::default(),
            title: None,
            body: None,
            workstream: None,
            project_milestone: None,
            target_date: None,
            updated_at: None,
            tracked_issues: Vec::new(),
            tracked_by_issues: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_state(mut self, state: IssueState) -> Self {
        self.state = state;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_workstream(mut self, workstream: impl Into<String>) -> Self {
        self.workstream = Some(workstream.into());
        self
    }

    pub fn with_project_milestone(mut self, milestone: impl Into<String>) -> Self {
        self.project_milestone = Some(milestone.into());
        self
    }

    pub fn with_tracked_issues(mut self, ids: Vec<String>) -> Self {
        self.tracked_issues = ids;
        self
    }

    pub fn is_closed(&self) -> bool {
        self.state == IssueState::Closed
    }

    pub fn is_milestone(&self) -> bool {
        self.category == Category::ProjectMilestone
    }

    pub fn is_workstream(&self) -> bool {
        self.category == Category::Workstream
    }

    /// Body text, treating a missing body as empty.
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}
