use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn trackpm_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("trackpm"));
    cmd.env_remove("GITHUB_TOKEN").env_remove("RUST_LOG");
    cmd
}

const PROJECT: &str = r###"
issues:
  - id: I_m1
    item_id: PVTI_m1
    resource_path: /llvm/wg-hlsl/issues/1
    category: Project Milestone
    state: OPEN
    title: "[milestone] Compile a shader"
    project_milestone: "(1) Compile a shader"
    target_date: "2024-09-30"
    body: "Goal of the milestone.\n## Workstreams\n### Stale (#9)\nold content\n"
    tracked_issues: [I_ws, I_x]
  - id: I_m2
    item_id: PVTI_m2
    resource_path: /llvm/wg-hlsl/issues/2
    category: Project Milestone
    state: OPEN
    title: "[milestone] Run a shader"
    project_milestone: "(2) Run a shader"
    body: "## Workstreams"
    tracked_issues: [I_x]
  - id: I_ws
    item_id: PVTI_ws
    resource_path: /llvm/wg-hlsl/issues/3
    category: Workstream
    state: OPEN
    title: "[workstream] Tools"
    workstream: Tools
    body: "Tools work.\n## Milestones\n### Old name (#1)\n- [ ] llvm/llvm-project#10\n"
    tracked_issues: [I_i]
  - id: I_i
    item_id: PVTI_i
    resource_path: /llvm/llvm-project/issues/10
    category: Item
    state: OPEN
    title: Parser
    workstream: Tools
  - id: I_x
    item_id: PVTI_x
    resource_path: /llvm/llvm-project/issues/11
    category: Item
    state: CLOSED
    title: Shared
    workstream: Other
  - id: I_u
    item_id: PVTI_u
    resource_path: /llvm/llvm-project/issues/12
    category: Item
    state: OPEN
    title: Forgotten
    workstream: Tools
"###;

/// Temp project with a config pinning the output directory and a fixture file.
fn setup_project(fixture: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(".trackpm.yml"), "output:\n  path: out\n").unwrap();
    let fixture_path = temp_dir.path().join("project.yml");
    std::fs::write(&fixture_path, fixture).unwrap();
    (temp_dir, fixture_path)
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).unwrap()
}

// =============================================================================
// Basic CLI
// =============================================================================

#[test]
fn test_help() {
    trackpm_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("update-issues"))
        .stdout(predicate::str::contains("update-milestone-field"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_version() {
    trackpm_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("trackpm"));
}

#[test]
fn test_missing_token_error() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(".trackpm.yml"), "").unwrap();

    trackpm_cmd()
        .arg("update-issues")
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No GitHub token"));
}

#[test]
fn test_missing_fixture_error() {
    let (temp_dir, _) = setup_project(PROJECT);

    trackpm_cmd()
        .args(["report", "--fixture", "nope.yml"])
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read fixture"));
}

// =============================================================================
// update-issues
// =============================================================================

#[test]
fn test_update_issues_reports_changes() {
    let (temp_dir, fixture) = setup_project(PROJECT);

    trackpm_cmd()
        .args(["update-issues", "--fixture"])
        .arg(&fixture)
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("llvm/wg-hlsl#1").and(predicate::str::contains("body changed!")),
        )
        .stdout(predicate::str::contains("llvm/wg-hlsl#3"))
        .stdout(predicate::str::contains("llvm/wg-hlsl#2").not());

    // Without --commit the fixture is left alone.
    assert_eq!(read(&fixture), PROJECT);
}

#[test]
fn test_update_issues_save_writes_snapshots() {
    let (temp_dir, fixture) = setup_project(PROJECT);

    trackpm_cmd()
        .args(["ui", "--save", "--fixture"])
        .arg(&fixture)
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Saving 3 issues before updating..."))
        .stdout(predicate::str::contains("Saving 3 issues after updating..."));

    let out = temp_dir.path().join("out");
    let before = read(out.join("before/llvm/wg-hlsl/issues/1"));
    let after = read(out.join("after/llvm/wg-hlsl/issues/1"));
    assert!(before.contains("### Stale (#9)"));
    assert_eq!(
        after,
        "Goal of the milestone.\n## Workstreams\n### Tools (#3)\n- [ ] llvm/llvm-project#10\n"
    );

    let workstream = read(out.join("after/llvm/wg-hlsl/issues/3"));
    assert!(workstream.contains("### Compile a shader (#1)"));
    assert!(workstream.contains("- [ ] llvm/llvm-project#10"));
}

#[test]
fn test_update_issues_commit_writes_fixture() {
    let (temp_dir, fixture) = setup_project(PROJECT);

    trackpm_cmd()
        .args(["update-issues", "--commit", "--fixture"])
        .arg(&fixture)
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Committed"));

    let saved = read(&fixture);
    assert!(saved.contains("### Tools (#3)"));
    assert!(saved.contains("### Compile a shader (#1)"));
    assert!(!saved.contains("Stale"));

    // A second run has nothing left to do.
    trackpm_cmd()
        .args(["update-issues", "--fixture"])
        .arg(&fixture)
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("body changed!").not());
}

#[test]
fn test_update_issues_save_and_commit_conflict() {
    let (temp_dir, fixture) = setup_project(PROJECT);

    trackpm_cmd()
        .args(["update-issues", "--save", "--commit", "--fixture"])
        .arg(&fixture)
        .current_dir(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_update_issues_structural_mismatch_fails() {
    let project = r###"
issues:
  - id: I_m1
    resource_path: /org/repo/issues/1
    category: Project Milestone
    title: Broken milestone
    body: "## Milestones\n### Something (#2)\n"
  - id: I_ws
    resource_path: /org/repo/issues/2
    category: Workstream
    title: W
    body: "## Milestones\n### Old (#1)\n- x\n"
"###;
    let (temp_dir, fixture) = setup_project(project);

    trackpm_cmd()
        .args(["update-issues", "--fixture"])
        .arg(&fixture)
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("org/repo#2"))
        .stderr(predicate::str::contains(
            "body contains 'Milestones', but expected 'Workstreams'",
        ))
        .stderr(predicate::str::contains("1 issue(s) could not be updated"));
}

// =============================================================================
// update-milestone-field
// =============================================================================

#[test]
fn test_update_milestone_field_plan() {
    let (temp_dir, fixture) = setup_project(PROJECT);

    trackpm_cmd()
        .args(["umf", "--fixture"])
        .arg(&fixture)
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "llvm/wg-hlsl#3: None --> (1) Compile a shader",
        ))
        .stdout(predicate::str::contains(
            "llvm/llvm-project#10: None --> (1) Compile a shader",
        ))
        .stdout(predicate::str::contains(
            "llvm/llvm-project#11: None --> (1) Compile a shader",
        ))
        .stdout(predicate::str::contains(
            "llvm/llvm-project#11 is tracked under more than one milestone",
        ))
        .stdout(predicate::str::contains("#11 <- llvm/wg-hlsl#1"))
        .stdout(predicate::str::contains("#11 <- llvm/wg-hlsl#2"))
        .stdout(predicate::str::contains("(2) Run a shader").not());
}

#[test]
fn test_update_milestone_field_commit() {
    let (temp_dir, fixture) = setup_project(PROJECT);

    trackpm_cmd()
        .args(["update-milestone-field", "--commit", "--fixture"])
        .arg(&fixture)
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Committed"));

    trackpm_cmd()
        .args(["umf", "--fixture"])
        .arg(&fixture)
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("-->").not())
        .stdout(predicate::str::contains("No milestone fields changed."));
}

// =============================================================================
// report
// =============================================================================

#[test]
fn test_report_writes_all_files() {
    let (temp_dir, fixture) = setup_project(PROJECT);

    trackpm_cmd()
        .args(["report", "--fixture"])
        .arg(&fixture)
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("report-warnings.md"));

    let out = temp_dir.path().join("out");
    let workstreams = read(out.join("report-workstreams.md"));
    assert!(workstreams.contains(
        "# 🟦[workstream] Tools ([#3](https://github.com/llvm/wg-hlsl/issues/3))"
    ));
    assert!(workstreams.contains(
        "* 🟦Parser ([llvm/llvm-project#10](https://github.com/llvm/llvm-project/issues/10))"
    ));

    let milestones = read(out.join("report-milestones.md"));
    assert!(milestones.contains(
        "# 🟦[milestone] Compile a shader ([#1](https://github.com/llvm/wg-hlsl/issues/1)) - 2024-09-30"
    ));
    assert!(milestones.contains(
        "* ✅Shared ([llvm/llvm-project#11](https://github.com/llvm/llvm-project/issues/11))"
    ));

    let warnings = read(out.join("report-warnings.md"));
    assert!(warnings.contains("## Unlinked workstream issues"));
    assert!(warnings.contains("Forgotten"));
    assert!(!warnings.contains("## Workstream Field Mismatches"));
}

#[test]
fn test_report_single_kind_to_directory() {
    let (temp_dir, fixture) = setup_project(PROJECT);

    trackpm_cmd()
        .args(["r", "--kind", "milestones", "--output", "reports", "--fixture"])
        .arg(&fixture)
        .current_dir(temp_dir.path())
        .assert()
        .success();

    let reports = temp_dir.path().join("reports");
    assert!(reports.join("report-milestones.md").exists());
    assert!(!reports.join("report-workstreams.md").exists());
}
