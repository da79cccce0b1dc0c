use super::IssueSource;
use crate::error::{Result, TrackError};
use crate::model::Issue;
use crate::snapshot::atomic_write;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// A project snapshot stored as YAML (or JSON).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// A write made through [`FixtureSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    Body { issue_id: String, body: String },
    MilestoneField { item_id: String, milestone: String },
}

/// Issue source backed by a local file instead of GitHub.
///
/// Writes are recorded and, when the source was opened from a file, saved
/// back to it.
pub struct FixtureSource {
    path: Option<PathBuf>,
    fixture: RefCell<Fixture>,
    commits: RefCell<Vec<Commit>>,
}

impl FixtureSource {
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let fixture: Fixture = serde_yaml::from_str(&content)?;
        tracing::debug!(path = %path.display(), count = fixture.issues.len(), "Loaded fixture");
        Ok(Self {
            path: Some(path.to_path_buf()),
            fixture: RefCell::new(fixture),
            commits: RefCell::new(Vec::new()),
        })
    }

    pub fn from_issues(issues: Vec<Issue>) -> Self {
        Self {
            path: None,
            fixture: RefCell::new(Fixture { issues }),
            commits: RefCell::new(Vec::new()),
        }
    }

    pub fn commits(&self) -> Vec<Commit> {
        self.commits.borrow().clone()
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = serde_yaml::to_string(&*self.fixture.borrow())?;
        atomic_write(path, &content)
    }
}

impl IssueSource for FixtureSource {
    fn fetch_all_project_items(&self) -> Result<Vec<Issue>> {
        Ok(self
            .fixture
            .borrow()
            .issues
            .iter()
            .map(|issue| Issue {
                body: None,
                tracked_by_issues: Vec::new(),
                ..issue.clone()
            })
            .collect())
    }

    fn fetch_bodies(&self, issues: &mut [Issue]) -> Result<()> {
        let fixture = self.fixture.borrow();
        for issue in issues.iter_mut() {
            match fixture.issues.iter().find(|i| i.id == issue.id) {
                Some(stored) => issue.body = stored.body.clone(),
                None => tracing::warn!(id = %issue.id, "No body in fixture"),
            }
        }
        Ok(())
    }

    fn commit_body(&self, issue_id: &str, body: &str) -> Result<()> {
        {
            let mut fixture = self.fixture.borrow_mut();
            let issue = fixture
                .issues
                .iter_mut()
                .find(|i| i.id == issue_id)
                .ok_or_else(|| TrackError::NotFound(issue_id.to_string()))?;
            issue.body = Some(body.to_string());
        }
        self.commits.borrow_mut().push(Commit::Body {
            issue_id: issue_id.to_string(),
            body: body.to_string(),
        });
        self.save()
    }

    fn commit_milestone_field(&self, item_id: &str, milestone: &str) -> Result<()> {
        {
            let mut fixture = self.fixture.borrow_mut();
            let issue = fixture
                .issues
                .iter_mut()
                .find(|i| i.item_id.as_deref() == Some(item_id))
                .ok_or_else(|| TrackError::NotFound(item_id.to_string()))?;
            issue.project_milestone = Some(milestone.to_string());
        }
        self.commits.borrow_mut().push(Commit::MilestoneField {
            item_id: item_id.to_string(),
            milestone: milestone.to_string(),
        });
        self.save()
    }
}
