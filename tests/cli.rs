//! CLI command integration tests.
//!
//! These tests run the `guitar` binary and check its exit codes and the
//! files it produces.

#![cfg(feature = "cli")]

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

mod common;

fn guitar() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_guitar"));
    cmd.env_remove("GUITAR_LOG");
    cmd
}

fn run(args: &[&str]) -> Output {
    guitar().args(args).output().unwrap()
}

fn scenario_archive() -> Vec<u8> {
    common::ArchiveBuilder::new()
        .dir("a/", 0o755)
        .file("a/b.txt", 0o644, b"hello")
        .symlink("a/c", "a/b.txt")
        .finish()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

// =============================================================================
// Export Command Tests
// =============================================================================

#[test]
fn test_export_from_file() {
    let work = TempDir::new().unwrap();
    let archive = work.path().join("in.tar");
    std::fs::write(&archive, scenario_archive()).unwrap();
    let tree = work.path().join("tree");

    let output = run(&["export", "-f", path_str(&archive), "-C", path_str(&tree)]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(std::fs::read(tree.join("a/b.txt")).unwrap(), b"hello");
    assert!(tree.join(".guitar").exists());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Exported 3 entries"));
}

#[test]
fn test_export_from_stdin() {
    let tree = TempDir::new().unwrap();
    let mut child = guitar()
        .args(["-q", "export", "-C", path_str(tree.path())])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(&scenario_archive())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stderr.is_empty());
    assert_eq!(common::sidecar_headers(tree.path()).len(), 3);
}

#[test]
fn test_export_unknown_entry_type() {
    let mut builder = tar::Builder::new(Vec::new());
    let mut header = common::tar_header(tar::EntryType::Continuous, 0o644, 0);
    builder
        .append_data(&mut header, "odd", std::io::empty())
        .unwrap();

    let work = TempDir::new().unwrap();
    let archive = work.path().join("odd.tar");
    std::fs::write(&archive, builder.into_inner().unwrap()).unwrap();

    let output = run(&[
        "export",
        "-f",
        path_str(&archive),
        "-C",
        path_str(&work.path().join("tree")),
    ]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_export_json_summary() {
    let work = TempDir::new().unwrap();
    let archive = work.path().join("in.tar");
    std::fs::write(&archive, scenario_archive()).unwrap();

    let output = run(&[
        "--output",
        "json",
        "export",
        "-f",
        path_str(&archive),
        "-C",
        path_str(&work.path().join("tree")),
    ]);
    assert_eq!(output.status.code(), Some(0));
    let summary: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(summary["entries"], 3);
    assert_eq!(summary["files"], 1);
}

// =============================================================================
// Import Command Tests
// =============================================================================

#[test]
fn test_import_to_stdout() {
    let tree = TempDir::new().unwrap();
    common::export(&scenario_archive(), tree.path());

    let output = run(&["-q", "import", "-C", path_str(tree.path())]);
    assert_eq!(output.status.code(), Some(0));

    let entries = common::read_entries(&output.stdout);
    let names: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(names, ["a/", "a/b.txt", "a/c"]);
}

#[test]
fn test_import_to_file() {
    let tree = TempDir::new().unwrap();
    common::export(&scenario_archive(), tree.path());
    let work = TempDir::new().unwrap();
    let archive = work.path().join("out.tar");

    let output = run(&[
        "import",
        "--ustar",
        "-f",
        path_str(&archive),
        "-C",
        path_str(tree.path()),
    ]);
    assert_eq!(output.status.code(), Some(0));
    let data = std::fs::read(&archive).unwrap();
    assert_eq!(
        common::archive_headers(&data),
        common::sidecar_headers(tree.path())
    );
}

#[test]
fn test_import_missing_metadata() {
    let tree = TempDir::new().unwrap();
    let output = run(&["import", "-C", path_str(tree.path())]);
    assert_eq!(output.status.code(), Some(4));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Metadata file not found"));
}

#[test]
fn test_import_missing_metadata_keeps_archive() {
    let tree = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let archive = work.path().join("existing.tar");
    std::fs::write(&archive, b"keep me").unwrap();

    let output = run(&["import", "-f", path_str(&archive), "-C", path_str(tree.path())]);
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(std::fs::read(&archive).unwrap(), b"keep me");
}

#[test]
fn test_import_missing_directory() {
    let work = TempDir::new().unwrap();
    let output = run(&["import", "-C", path_str(&work.path().join("absent"))]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_custom_sidecar_name() {
    let work = TempDir::new().unwrap();
    let archive = work.path().join("in.tar");
    std::fs::write(&archive, scenario_archive()).unwrap();
    let tree = work.path().join("tree");

    let export = run(&[
        "export",
        "--sidecar",
        "meta.ndjson",
        "-f",
        path_str(&archive),
        "-C",
        path_str(&tree),
    ]);
    assert_eq!(export.status.code(), Some(0));
    assert!(tree.join("meta.ndjson").exists());

    let import = run(&["-q", "import", "--sidecar", "meta.ndjson", "-C", path_str(&tree)]);
    assert_eq!(import.status.code(), Some(0));
    assert_eq!(common::read_entries(&import.stdout).len(), 3);
}

// =============================================================================
// Argument Handling Tests
// =============================================================================

#[test]
fn test_bad_arguments() {
    let output = run(&["export", "--no-such-flag"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_help_succeeds() {
    let output = run(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("export"));
}

#[test]
fn test_completions() {
    let output = run(&["completions", "bash"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(!output.stdout.is_empty());
}
