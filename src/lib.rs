//! # trackpm - tracked-issue bookkeeping for GitHub projects
//!
//! Milestone and workstream issues in a GitHub project list the work they
//! track in their bodies. trackpm keeps those lists in step with the
//! tracked-issue links, copies the project milestone field down to every
//! tracked issue and writes reports about the result.
//!
//! ## Quick Start
//!
//! ```bash
//! # Show which bodies would change, keeping before/after copies
//! trackpm update-issues --save
//!
//! # Push the new bodies
//! trackpm update-issues --commit
//!
//! # Copy project milestones down the tracked-issue graph
//! trackpm update-milestone-field --commit
//!
//! # Write report-*.md into the output directory
//! trackpm report
//! ```
//!
//! ## Modules
//!
//! - [`body`]: Splitting issue bodies and parsing the generated data block
//! - [`reference`]: `#N`, `owner/repo#N` and resource path conversion
//! - [`graph`]: The in-memory issue graph
//! - [`reconcile`]: Rebuilding milestone and workstream bodies
//! - [`traversal`]: Cycle-safe walks over tracked issues
//! - [`report`]: Workstream, milestone and warning reports
//! - [`propagate`]: Project milestone field propagation
//! - [`source`]: GitHub and fixture issue sources

/// Issue body model: preamble, data block and postamble.
pub mod body;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration loading.
///
/// Handles `.trackpm.yml` discovery and defaults.
pub mod config;

/// Error types and result aliases.
///
/// Defines the `TrackError` enum and `Result<T>` type alias.
pub mod error;

pub mod graph;
pub mod logging;

/// Data models: `Issue`, `Category` and `IssueState`.
pub mod model;

pub mod propagate;
pub mod reconcile;
pub mod reference;
pub mod report;
pub mod snapshot;

/// Issue sources: the GitHub GraphQL API and local fixtures.
pub mod source;

pub mod traversal;

pub use error::{Result, TrackError};
