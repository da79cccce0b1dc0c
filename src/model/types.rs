use crate::error::{Result, TrackError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Value of the project's "Category" single-select field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    #[default]
    #[serde(rename = "No Category")]
    NoCategory,
    Item,
    Deliverable,
    Workstream,
    #[serde(rename = "Workstream Milestone")]
    WorkstreamMilestone,
    #[serde(rename = "Project Milestone")]
    ProjectMilestone,
}

impl Category {
    /// Map the optional field value reported by the project board.
    pub fn from_field(value: Option<&str>) -> Result<Self> {
        match value {
            None => Ok(Category::NoCategory),
            Some(v) => v.parse(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::NoCategory => write!(f, "No Category"),
            Category::Item => write!(f, "Item"),
            Category::Deliverable => write!(f, "Deliverable"),
            Category::Workstream => write!(f, "Workstream"),
            Category::WorkstreamMilestone => write!(f, "Workstream Milestone"),
            Category::ProjectMilestone => write!(f, "Project Milestone"),
        }
    }
}

impl FromStr for Category {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "no category" | "nocategory" => Ok(Category::NoCategory),
            "item" => Ok(Category::Item),
            "deliverable" => Ok(Category::Deliverable),
            "workstream" => Ok(Category::Workstream),
            "workstream milestone" | "workstreammilestone" => Ok(Category::WorkstreamMilestone),
            "project milestone" | "projectmilestone" => Ok(Category::ProjectMilestone),
            _ => Err(TrackError::Parse(format!("Invalid category: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
}

impl IssueState {
    /// Variant name, used as the child ordering key during traversal.
    pub fn name(&self) -> &'static str {
        match self {
            IssueState::Open => "Open",
            IssueState::Closed => "Closed",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueState::Open => write!(f, "open"),
            IssueState::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for IssueState {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "open" => Ok(IssueState::Open),
            "closed" => Ok(IssueState::Closed),
            _ => Err(TrackError::Parse(format!("Invalid issue state: {}", s))),
        }
    }
}
