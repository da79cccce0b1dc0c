//! Conversion between issue references and resource paths.
//!
//! Three notations name the same issue:
//!
//! - `#12`: short form, only meaningful inside the repository of some context issue
//! - `owner/repo#12`: cross-repository form
//! - `owner/repo/issues/12`: the canonical resource path reported by GitHub
//!
//! Everything here is a pure function of its arguments.

use crate::error::{Result, TrackError};
use regex::Regex;
use std::sync::LazyLock;

static TRAILING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)/\d+$").expect("trailing number regex is valid"));

static ISSUE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)/issues/(\d+)$").expect("issue path regex is valid"));

static CROSS_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)#(\d+)").expect("cross reference regex is valid"));

static SHORT_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(\d+)").expect("short reference regex is valid"));

/// The repository scope of a resource path: everything before the trailing `/N`.
///
/// Paths without a trailing number are returned unchanged.
pub fn base_path(resource_path: &str) -> &str {
    TRAILING_NUMBER
        .captures(resource_path)
        .and_then(|c| c.get(1))
        .map_or(resource_path, |m| m.as_str())
}

/// Render `target` as a reference that reads correctly inside `context`.
///
/// Issues sharing a repository get the short `#N` form, all others the
/// `owner/repo#N` form.
pub fn to_reference(target: &str, context: &str) -> Result<String> {
    let captures = ISSUE_PATH
        .captures(target)
        .ok_or_else(|| TrackError::MalformedPath(target.to_string()))?;
    let number = &captures[2];

    if base_path(target) == base_path(context) {
        return Ok(format!("#{}", number));
    }

    let repo = captures[1].trim_start_matches('/');
    Ok(format!("{}#{}", repo, number))
}

/// The `owner/repo#N` form of a resource path, independent of any context.
pub fn full_reference(resource_path: &str) -> Result<String> {
    to_reference(resource_path, "")
}

/// Resolve a reference written inside `context` back to a resource path.
///
/// Returns `None` when the reference has neither recognised shape.
pub fn to_resource_path(reference: &str, context: &str) -> Option<String> {
    if reference.is_empty() {
        return None;
    }

    if let Some(captures) = CROSS_REFERENCE.captures(reference) {
        let repo = &captures[1];
        let rooted = context.starts_with('/') && !repo.starts_with('/');
        return Some(format!(
            "{}{}/issues/{}",
            if rooted { "/" } else { "" },
            repo,
            &captures[2]
        ));
    }

    let captures = SHORT_REFERENCE.captures(reference)?;
    Some(format!("{}/{}", base_path(context), &captures[1]))
}
