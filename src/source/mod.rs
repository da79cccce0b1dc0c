//! Where issues come from and where changes go.
//!
//! [`IssueSource`] is the only seam between the reconciliation logic and the
//! outside world. [`GitHubSource`] talks to the GitHub GraphQL API,
//! [`FixtureSource`] reads a local snapshot and records writes.

mod fixture;
mod github;

pub use fixture::FixtureSource;
pub use github::GitHubSource;

use crate::error::Result;
use crate::model::Issue;

pub trait IssueSource {
    /// Every issue in the project, without bodies.
    fn fetch_all_project_items(&self) -> Result<Vec<Issue>>;

    /// Fill in `body` for each of `issues`.
    fn fetch_bodies(&self, issues: &mut [Issue]) -> Result<()>;

    /// Replace the body of the issue with node id `issue_id`.
    fn commit_body(&self, issue_id: &str, body: &str) -> Result<()>;

    /// Set the project milestone field of project item `item_id`.
    fn commit_milestone_field(&self, item_id: &str, milestone: &str) -> Result<()>;
}
