//! Data models for trackpm.
//!
//! - [`Issue`]: A project item backed by a GitHub issue
//! - [`Category`]: Value of the project's category field (milestone, workstream, ...)
//! - [`IssueState`]: Open or closed

mod issue;
mod types;

pub use issue::Issue;
pub use types::{Category, IssueState};
