//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use reorg::cache::SummaryCache;
use reorg::utils::hash_file;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A `reorg` invocation isolated from the user's cache, config and keys.
fn reorg(workdir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("reorg"));
    cmd.current_dir(workdir)
        .env_remove("REORG_DB")
        .env_remove("REORG_API_KEY")
        .env_remove("GROQ_API_KEY")
        .env_remove("RUST_LOG")
        .arg("--db")
        .arg(workdir.join("summaries.db"));
    cmd
}

fn stdout_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout is JSON")
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("reorg"));
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains("reorg"));
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("reorg"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Reorganize folders"))
        .stdout(predicate::str::contains("view"))
        .stdout(predicate::str::contains("summarize"))
        .stdout(predicate::str::contains("reorganize"))
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("lookup"));
}

#[test]
fn test_view_lists_directories_first_as_json() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path().join("root");
    fs::create_dir_all(root.join("a")).expect("mkdir");
    fs::write(root.join("b.txt"), "bee").expect("write");

    let output = reorg(tmp.path()).args(["view"]).arg(&root).output().expect("run");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let nodes = stdout_json(&output.stdout);
    let nodes = nodes.as_array().expect("array");
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0]["name"], "a");
    assert_eq!(nodes[0]["isDirectory"], true);
    assert_eq!(nodes[1]["name"], "b.txt");
    assert_eq!(nodes[1]["size"], "3.0 Bytes");
    assert_eq!(nodes[1]["folderContentsDisplayed"], false);
}

#[test]
fn test_view_text_draws_tree() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path().join("docs");
    fs::create_dir_all(root.join("sub")).expect("mkdir");
    fs::write(root.join("sub/note.md"), "# hi").expect("write");
    fs::write(root.join("top.txt"), "x").expect("write");

    reorg(tmp.path())
        .args(["view", "--format", "text"])
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("docs/"))
        .stdout(predicate::str::contains("├── sub/"))
        .stdout(predicate::str::contains("│   └── note.md"))
        .stdout(predicate::str::contains("└── top.txt (1.0 Bytes)"));
}

#[test]
fn test_view_missing_path_fails() {
    let tmp = TempDir::new().expect("tmp");
    reorg(tmp.path())
        .args(["view", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read folder"))
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_summarize_rejects_directories() {
    let tmp = TempDir::new().expect("tmp");
    fs::create_dir(tmp.path().join("folder")).expect("mkdir");
    reorg(tmp.path())
        .args(["summarize", "folder"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a regular file"));
}

#[test]
fn test_lookup_reports_uncached_file() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("hello.txt"), "hello").expect("write");

    let output = reorg(tmp.path()).args(["lookup", "hello.txt"]).output().expect("run");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value = stdout_json(&output.stdout);
    assert_eq!(
        value["file_hash"],
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
    assert_eq!(value["cached"], false);
    assert!(value["summary"].is_null());
}

#[test]
fn test_lookup_reads_cached_summary() {
    let tmp = TempDir::new().expect("tmp");
    let file = tmp.path().join("invoice.pdf");
    fs::write(&file, "%PDF-1.4 invoice").expect("write");

    let cache = SummaryCache::open(&tmp.path().join("summaries.db")).expect("cache");
    cache.upsert(&hash_file(&file).expect("hash"), "pdf", "ACME invoice").expect("upsert");
    cache.close().expect("close");

    let output = reorg(tmp.path()).args(["lookup", "invoice.pdf"]).output().expect("run");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value = stdout_json(&output.stdout);
    assert_eq!(value["cached"], true);
    assert_eq!(value["file_type"], "pdf");
    assert_eq!(value["summary"], "ACME invoice");
}

#[test]
fn test_view_shows_cached_summaries() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path().join("root");
    fs::create_dir(&root).expect("mkdir");
    fs::write(root.join("notes.md"), "# standup").expect("write");

    let cache = SummaryCache::open(&tmp.path().join("summaries.db")).expect("cache");
    cache
        .upsert(&hash_file(&root.join("notes.md")).expect("hash"), "md", "standup notes")
        .expect("upsert");
    cache.close().expect("close");

    let output = reorg(tmp.path()).args(["view"]).arg(&root).output().expect("run");
    let nodes = stdout_json(&output.stdout);
    assert_eq!(nodes[0]["summary"], "standup notes");
}

#[test]
fn test_apply_moves_one_file() {
    let tmp = TempDir::new().expect("tmp");
    let base = tmp.path().join("base");
    fs::create_dir(&base).expect("mkdir");
    fs::write(base.join("a.txt"), "aaa").expect("write");

    reorg(tmp.path())
        .arg("apply")
        .arg(&base)
        .args(["/a.txt", "/letters/a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("letters/a.txt"));

    assert!(!base.join("a.txt").exists());
    assert_eq!(fs::read_to_string(base.join("letters/a.txt")).expect("read"), "aaa");
}

#[test]
fn test_apply_rejects_paths_outside_base() {
    let tmp = TempDir::new().expect("tmp");
    let base = tmp.path().join("base");
    fs::create_dir(&base).expect("mkdir");
    fs::write(base.join("a.txt"), "aaa").expect("write");

    reorg(tmp.path())
        .arg("apply")
        .arg(&base)
        .args(["a.txt", "../escaped.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("escapes its root"));
    assert!(base.join("a.txt").exists());
}

#[test]
fn test_reorganize_missing_path_fails() {
    let tmp = TempDir::new().expect("tmp");
    reorg(tmp.path())
        .args(["reorganize", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path does not exist in filesystem"));
}

#[test]
fn test_reorganize_rejects_invalid_mode() {
    let tmp = TempDir::new().expect("tmp");
    reorg(tmp.path())
        .args(["reorganize", ".", "--mode", "shred"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid action mode"));
}

#[test]
fn test_explicit_bad_config_fails() {
    let tmp = TempDir::new().expect("tmp");
    let config = tmp.path().join("custom.toml");
    fs::write(&config, "max_tree_depth = 'deep'\n").expect("write");
    fs::create_dir(tmp.path().join("root")).expect("mkdir");

    reorg(tmp.path())
        .arg("--config")
        .arg(&config)
        .args(["view", "root"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid TOML config"));
}

#[test]
fn test_broken_discovered_config_falls_back_to_defaults() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("reorg.toml"), "this is not toml =").expect("write");
    fs::create_dir(tmp.path().join("root")).expect("mkdir");

    reorg(tmp.path())
        .args(["view", "root"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to parse auto-discovered config"));
}
