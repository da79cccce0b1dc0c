//! On-disk copies of issue bodies.
//!
//! `update-issues --save` writes every milestone and workstream body twice,
//! once before and once after reconciliation, so the two trees can be diffed.
//! Each body lands at `<dir>/<resource path>`.

use crate::error::{Result, TrackError};
use crate::model::Issue;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

pub const BEFORE_DIR: &str = "before";
pub const AFTER_DIR: &str = "after";

/// File a body is saved to under `base`.
///
/// The leading `/` of the resource path is dropped and any component that
/// would leave `base` is rejected.
pub fn snapshot_path(base: &Path, resource_path: &str) -> Result<PathBuf> {
    let relative = Path::new(resource_path.trim_start_matches('/'));
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if escapes || relative.as_os_str().is_empty() {
        return Err(TrackError::MalformedPath(resource_path.to_string()));
    }
    Ok(base.join(relative))
}

/// Save the bodies of `issues` under `base`, returning how many were written.
pub fn save_bodies<'a, I>(base: &Path, issues: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a Issue>,
{
    let mut count = 0;
    for issue in issues {
        let path = snapshot_path(base, &issue.resource_path)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        atomic_write(&path, issue.body_text())?;
        tracing::debug!(path = %path.display(), "Saved issue body");
        count += 1;
    }
    Ok(count)
}

/// Write `content` to a temp file beside `target_path`, then rename it over
/// the target.
pub fn atomic_write(target_path: &Path, content: &str) -> Result<()> {
    let target_dir = target_path
        .parent()
        .ok_or_else(|| TrackError::Storage("Target path has no parent directory".to_string()))?;

    let mut temp_file = NamedTempFile::new_in(target_dir)
        .map_err(|e| TrackError::Storage(format!("Failed to create temp file: {}", e)))?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| TrackError::Storage(format!("Failed to write to temp file: {}", e)))?;

    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| TrackError::Storage(format!("Failed to sync temp file: {}", e)))?;

    temp_file
        .persist(target_path)
        .map_err(|e| TrackError::Storage(format!("Failed to persist temp file: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_path() {
        let base = Path::new("out/before");
        assert_eq!(
            snapshot_path(base, "/llvm/wg-hlsl/issues/3").unwrap(),
            Path::new("out/before/llvm/wg-hlsl/issues/3")
        );
        assert!(snapshot_path(base, "/llvm/../../etc/passwd").is_err());
        assert!(snapshot_path(base, "/").is_err());
    }

    #[test]
    fn test_save_bodies() {
        let temp_dir = TempDir::new().unwrap();
        let issues = vec![
            Issue::new("a", "/org/repo/issues/1").with_body("first\nbody"),
            Issue::new("b", "/org/other/issues/2"),
        ];

        let count = save_bodies(temp_dir.path(), &issues).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("org/repo/issues/1")).unwrap(),
            "first\nbody"
        );
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("org/other/issues/2")).unwrap(),
            ""
        );
    }

    #[test]
    fn test_atomic_write_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("file");
        atomic_write(&path, "one").unwrap();
        atomic_write(&path, "two").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "two");
    }
}
