//! CLI integration tests for all subcommands.
//!
//! Uses `assert_cmd` to spawn the `gxl` binary and verify exit codes,
//! stdout content, and stderr content.
//!
//! All tests set `current_dir` to the workspace root so that relative
//! paths to conformance fixtures resolve correctly.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Locate the workspace root by walking up from CARGO_MANIFEST_DIR.
fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/cli -> workspace root is two levels up
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

/// Helper: create a Command for the `gxl` binary, rooted at workspace.
fn gxl() -> Command {
    let mut cmd = cargo_bin_cmd!("gxl");
    cmd.current_dir(workspace_root());
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write temp file");
    path
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    gxl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("GXL workflow language toolchain"));
}

#[test]
fn version_exits_0() {
    gxl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gxl"));
}

#[test]
fn check_without_files_is_a_usage_error() {
    gxl().arg("check").assert().failure();
}

// ──────────────────────────────────────────────
// 2. parse
// ──────────────────────────────────────────────

#[test]
fn parse_valid_file_prints_json_tree() {
    let output = gxl()
        .args(["parse", "conformance/positive/module_basic.gxl"])
        .output()
        .expect("run gxl");
    assert!(output.status.success());
    let tree: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let module = &tree["items"][0];
    assert_eq!(module["type"], "module");
    assert_eq!(module["name"]["name"], "a");
    assert_eq!(module["items"][0]["type"], "property");
    assert_eq!(module["items"][0]["key"]["name"], "x");
    assert_eq!(module["items"][0]["value"]["raw"], "1");
}

#[test]
fn parse_error_renders_diagnostic() {
    gxl()
        .args(["parse", "conformance/negative/extern_bad_source.gxl"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "error: expected 'path' or 'git', found identifier 'ftp'",
        ))
        .stderr(predicate::str::contains(
            "--> conformance/negative/extern_bad_source.gxl:1:16",
        ));
}

#[test]
fn parse_error_json_output() {
    let output = gxl()
        .args([
            "--output",
            "json",
            "parse",
            "conformance/negative/unterminated_string.gxl",
        ])
        .output()
        .expect("run gxl");
    assert_eq!(output.status.code(), Some(1));
    let err: serde_json::Value = serde_json::from_slice(&output.stderr).expect("stderr is JSON");
    assert_eq!(err["kind"], "lex");
    assert_eq!(err["line"], 2);
    assert_eq!(err["column"], 9);
    assert_eq!(err["file"], "conformance/negative/unterminated_string.gxl");
}

#[test]
fn parse_missing_file_fails() {
    gxl()
        .args(["parse", "conformance/positive/does_not_exist.gxl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error reading file"));
}

// ──────────────────────────────────────────────
// 3. check
// ──────────────────────────────────────────────

#[test]
fn check_reports_each_valid_file() {
    gxl()
        .args([
            "check",
            "conformance/positive/module_basic.gxl",
            "conformance/positive/full_project.gxl",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "ok conformance/positive/module_basic.gxl",
        ))
        .stdout(predicate::str::contains(
            "ok conformance/positive/full_project.gxl",
        ));
}

#[test]
fn check_fails_if_any_file_fails() {
    gxl()
        .args([
            "check",
            "conformance/positive/module_basic.gxl",
            "conformance/negative/top_level_env.gxl",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "ok conformance/positive/module_basic.gxl",
        ))
        .stderr(predicate::str::contains("expected 'mod' or 'extern'"));
}

#[test]
fn check_json_summary() {
    let output = gxl()
        .args([
            "--output",
            "json",
            "check",
            "conformance/positive/module_basic.gxl",
            "conformance/negative/annotation_without_name.gxl",
        ])
        .output()
        .expect("run gxl");
    assert_eq!(output.status.code(), Some(1));
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(summary["checked"], 2);
    assert_eq!(summary["failed"], 1);
    assert_eq!(summary["results"][0]["ok"], true);
    assert_eq!(summary["results"][1]["ok"], false);
    assert_eq!(summary["results"][1]["error"]["kind"], "parse");
    assert_eq!(summary["results"][1]["error"]["found"], "r_bracket");
}

#[test]
fn check_quiet_prints_nothing_on_success() {
    gxl()
        .args(["--quiet", "check", "conformance/positive/module_basic.gxl"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// ──────────────────────────────────────────────
// 4. fmt
// ──────────────────────────────────────────────

#[test]
fn fmt_prints_canonical_form() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "a.gxl", "mod a{x=\"1\";}");
    gxl()
        .arg("fmt")
        .arg(&file)
        .assert()
        .success()
        .stdout("mod a {\n    x = \"1\";\n};\n");
}

#[test]
fn fmt_uses_indent_from_config() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "a.gxl", "mod a{x=\"1\";}");
    write_file(&dir, "gxl.toml", "[fmt]\nindent = 2\n");
    // Run from the temp dir so ./gxl.toml is picked up.
    let mut cmd = cargo_bin_cmd!("gxl");
    cmd.current_dir(dir.path())
        .args(["fmt", "a.gxl"])
        .assert()
        .success()
        .stdout("mod a {\n  x = \"1\";\n};\n");
}

#[test]
fn fmt_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "a.gxl", "mod a { }");
    let config = write_file(&dir, "custom.toml", "[fmt]\nindent = 0\n");
    gxl()
        .arg("--config")
        .arg(&config)
        .arg("fmt")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 16"));
}

#[test]
fn fmt_write_rewrites_file() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "a.gxl", "mod a{flow @f{gx.echo(msg:\"hi\");}}");
    gxl()
        .args(["fmt", "--write"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("reformatted"));
    let rewritten = fs::read_to_string(&file).unwrap();
    assert_eq!(
        rewritten,
        "mod a {\n    flow @f {\n        gx.echo(msg: \"hi\");\n    };\n};\n"
    );

    // A second pass leaves it alone.
    gxl()
        .args(["fmt", "--check"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("unchanged"));
}

#[test]
fn fmt_check_fails_on_unformatted_file() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "a.gxl", "mod a {}");
    gxl()
        .args(["fmt", "--check"])
        .arg(&file)
        .assert()
        .failure()
        .stdout(predicate::str::contains("reformatted"));
    assert_eq!(fs::read_to_string(&file).unwrap(), "mod a {}");
}

// ──────────────────────────────────────────────
// 5. tokens
// ──────────────────────────────────────────────

#[test]
fn tokens_lists_comments_and_annotations() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "t.gxl", "# note\n#[a] mod m { }");
    gxl()
        .arg("tokens")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("1:1\tComment\t# note"))
        .stdout(predicate::str::contains("2:1\tAnnotationOpen\t#["))
        .stdout(predicate::str::contains("2:6\tIdent\tmod"));
}

#[test]
fn tokens_json_includes_eof() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "t.gxl", "gx.echo()");
    let output = gxl()
        .args(["--output", "json", "tokens"])
        .arg(&file)
        .output()
        .expect("run gxl");
    assert!(output.status.success());
    let tokens: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let kinds: Vec<_> = tokens
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["kind"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(kinds, ["builtin", "l_paren", "r_paren", "eof"]);
}

#[test]
fn tokens_lex_error_exits_1() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "t.gxl", "mod $");
    gxl()
        .arg("tokens")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected character '$'"));
}
