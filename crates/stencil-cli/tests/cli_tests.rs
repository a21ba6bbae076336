//! Integration tests for the `stencil` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from the user's configuration and environment.
fn stencil(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stencil").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("STENCIL__DEFAULTS__INCLUDE_SECURITY")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    stencil(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("template"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag() {
    let dir = TempDir::new().unwrap();
    stencil(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn new_help_mentions_security() {
    let dir = TempDir::new().unwrap();
    stencil(&dir)
        .args(["new", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--without-security"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn missing_subcommand_is_usage_error() {
    let dir = TempDir::new().unwrap();
    stencil(&dir).assert().code(2);
}

#[test]
fn invalid_project_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    stencil(&dir)
        .args(["new", "../escape", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid project name"));
}

#[test]
fn existing_directory_is_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("shop")).unwrap();

    stencil(&dir)
        .args(["new", "shop", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn unknown_template_is_not_found() {
    let dir = TempDir::new().unwrap();
    stencil(&dir)
        .args(["new", "shop", "--template", "core-template@9.9.9", "--dry-run"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("core-template@9.9.9"));
}

#[test]
fn dry_run_describes_without_creating() {
    let dir = TempDir::new().unwrap();
    stencil(&dir)
        .args(["--output-format", "plain", "new", "shop", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("move src/starterProject to src/shop"))
        .stdout(predicate::str::contains("Security:  kept"));

    assert!(!dir.path().join("shop").exists());
}

#[test]
fn dry_run_json_reports_removals() {
    let dir = TempDir::new().unwrap();
    let assert = stencil(&dir)
        .args([
            "--output-format",
            "json",
            "new",
            "shop",
            "--without-security",
            "--dry-run",
        ])
        .assert()
        .success();

    let plan: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(plan["include_security"], false);
    assert_eq!(plan["branch"], "master -> main");
    assert_eq!(plan["removals"]["files"].as_array().unwrap().len(), 26);
}

#[test]
fn configuration_can_drop_security_by_default() {
    let dir = TempDir::new().unwrap();
    let assert = stencil(&dir)
        .env("STENCIL__DEFAULTS__INCLUDE_SECURITY", "false")
        .args(["--output-format", "json", "new", "shop", "--dry-run"])
        .assert()
        .success();

    let plan: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(plan["include_security"], false);
}

#[cfg(unix)]
#[test]
fn failed_clone_exits_with_internal_error() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("stencil.toml");
    std::fs::write(&config, "[git]\nprogram = \"false\"\n").unwrap();

    stencil(&dir)
        .args(["--config", config.to_str().unwrap(), "new", "shop", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("clone"));

    assert!(!dir.path().join("shop").exists());
}

/// A stand-in for git whose `clone` lays down a minimal template snapshot.
#[cfg(unix)]
const FAKE_GIT: &str = r#"#!/bin/sh
set -e
if [ "$1" = "clone" ]; then
  root="$4"
  mkdir -p "$root/src/starterProject/WebAPI" "$root/tests/Application.Tests" "$root/.git"
  printf 'coreTemplate starterProject' > "$root/coreTemplate.sln"
  printf 'coreTemplate' > "$root/coreTemplate.sln.DotSettings"
  printf 'starterProject' > "$root/tests/Application.Tests/Application.Tests.csproj"
  printf 'StarterProject starterProject' > "$root/src/starterProject/WebAPI/appsettings.json"
  printf 'ref: refs/heads/master' > "$root/.git/HEAD"
fi
"#;

#[cfg(unix)]
fn fake_git_config(dir: &TempDir) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.path().join("fake-git");
    std::fs::write(&script, FAKE_GIT).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let config = dir.path().join("stencil.toml");
    std::fs::write(
        &config,
        format!("[git]\nprogram = {:?}\n", script.to_str().unwrap()),
    )
    .unwrap();
    config
}

#[cfg(unix)]
#[test]
fn completed_run_prints_summary_and_both_advisories() {
    let dir = TempDir::new().unwrap();
    let config = fake_git_config(&dir);

    stencil(&dir)
        .args([
            "--config",
            config.to_str().unwrap(),
            "--output-format",
            "plain",
            "new",
            "shop",
            "--with-security",
            "--yes",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Starter project has been cloned from"))
        .stdout(predicate::str::contains("Project has been prepared with Shop."))
        .stdout(predicate::str::contains("Git repository has been initialized."))
        .stdout(predicate::str::contains("Completed. (4 files generated)"))
        .stdout(predicate::str::contains(
            "Check the configuration that has name 'appsettings.json' in 'src/shop'.",
        ))
        .stdout(predicate::str::contains("Run 'Update-Database' nuget command"));

    let root = dir.path().join("shop");
    assert_eq!(std::fs::read_to_string(root.join("Shop.sln")).unwrap(), "Shop shop");
    assert!(!root.join(".git").exists());
}

#[cfg(unix)]
#[test]
fn completed_run_streams_json_events() {
    let dir = TempDir::new().unwrap();
    let config = fake_git_config(&dir);

    let assert = stencil(&dir)
        .args([
            "--config",
            config.to_str().unwrap(),
            "--output-format",
            "json",
            "new",
            "shop",
            "--with-security",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(events.len(), 4);
    let terminal = events.last().unwrap();
    assert_eq!(terminal["status_message"], "Completed.");
    assert_eq!(terminal["output_messages"].as_array().unwrap().len(), 2);
    assert_eq!(terminal["generated_file_paths"].as_array().unwrap().len(), 4);
}

#[test]
fn template_lists_builtin_manifest() {
    let dir = TempDir::new().unwrap();
    stencil(&dir)
        .args(["--output-format", "plain", "template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("core-template@1.0.0"))
        .stdout(predicate::str::contains("masterbfk/coreTemplate"));
}

#[test]
fn template_json_is_an_array() {
    let dir = TempDir::new().unwrap();
    let assert = stencil(&dir)
        .args(["--output-format", "json", "template"])
        .assert()
        .success();

    let templates: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(templates[0]["id"], "core-template@1.0.0");
    assert_eq!(templates[0]["rename_steps"], 7);
}

#[test]
fn template_reads_manifest_file() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("mini.toml");
    std::fs::write(
        &manifest,
        r#"
[template]
name = "mini"
version = "0.1.0"
repository = "https://example.com/mini.git"

[[rename]]
kind = "replace"
path = "mini.sln"
search = "mini"
replace = "{{PROJECT_NAME_PASCAL}}"
"#,
    )
    .unwrap();

    stencil(&dir)
        .args(["--output-format", "plain", "template", "--manifest"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("mini@0.1.0"));
}

#[test]
fn broken_manifest_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("broken.toml");
    std::fs::write(&manifest, "[template]\nname = 1\n").unwrap();

    stencil(&dir)
        .args(["template", "--manifest"])
        .arg(&manifest)
        .assert()
        .code(4);
}

#[test]
fn completions_for_bash() {
    let dir = TempDir::new().unwrap();
    stencil(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stencil"));
}

#[test]
fn config_get_reads_file_and_environment() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("stencil.toml");
    std::fs::write(&config, "[git]\nprogram = \"/usr/local/bin/git\"\n").unwrap();

    stencil(&dir)
        .args(["--config", config.to_str().unwrap(), "config", "get", "git.program"])
        .assert()
        .success()
        .stdout(predicate::str::contains("git.program = /usr/local/bin/git"));

    stencil(&dir)
        .env("STENCIL__DEFAULTS__INCLUDE_SECURITY", "false")
        .args(["config", "get", "defaults.include_security"])
        .assert()
        .success()
        .stdout(predicate::str::contains("defaults.include_security = false"));
}

#[test]
fn config_get_unknown_key_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    stencil(&dir)
        .args(["config", "get", "nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn missing_explicit_config_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    stencil(&dir)
        .args(["--config", "does-not-exist.toml", "template"])
        .assert()
        .code(4);
}

#[test]
fn init_local_writes_default_config() {
    let dir = TempDir::new().unwrap();
    stencil(&dir).args(["init", "--local"]).assert().success();

    let written = std::fs::read_to_string(dir.path().join(".stencil.toml")).unwrap();
    assert!(written.contains("include_security = true"));

    // The local file is picked up without --config.
    stencil(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".stencil.toml"));
}
