//! Binary-level tests for `cachedirs apply|compile|service`.
//!
//! Each test gets an isolated docroot holding a fixture control script that
//! appends the verb it receives to `verbs.log`.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SCRIPT_RELATIVE: &str = "plugins/dynamix.cache.dirs/scripts/rc.cachedirs";

struct Fixture {
    root: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let root = TempDir::new().expect("tempdir");
        let script = root.path().join(SCRIPT_RELATIVE);
        fs::create_dir_all(script.parent().expect("script parent")).expect("mkdir");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\necho \"$1\" >> '{}'\n",
                root.path().join("verbs.log").display()
            ),
        )
        .expect("write script");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).expect("chmod");
        Self { root }
    }

    fn docroot(&self) -> &Path {
        self.root.path()
    }

    fn cfg(&self) -> PathBuf {
        self.root.path().join("cache_dirs.cfg")
    }

    fn verbs(&self) -> Vec<String> {
        fs::read_to_string(self.root.path().join("verbs.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_cachedirs"));
        cmd.env("DOCUMENT_ROOT", self.docroot())
            .env("RUST_LOG", "warn");
        cmd
    }
}

// ---------------------------------------------------------------------------
// apply
// ---------------------------------------------------------------------------

#[test]
fn apply_from_fields_writes_config_and_restarts() {
    let fx = Fixture::new();
    let cfg = fx.cfg();

    fx.cmd()
        .arg("apply")
        .arg("-f")
        .arg(format!("#config={}", cfg.display()))
        .args(["-f", "#prefix=include=i&depth=d"])
        .args(["-f", "service=1", "-f", "adaptive=0", "-f", "depth=5"])
        .args(["-f", "include=/mnt/user/Media,/mnt/user/Backup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("daemon started"));

    assert_eq!(
        fs::read_to_string(&cfg).unwrap(),
        r#"-i "/mnt/user/Media" -i "/mnt/user/Backup" -D 5"#
    );
    assert_eq!(fx.verbs(), vec!["stop", "start"]);
}

#[test]
fn apply_from_form_body_with_empty_include_only_stops() {
    let fx = Fixture::new();
    let cfg = fx.cfg();
    let body = format!(
        "%23config={}&service=&adaptive=&depth=&include=",
        cfg.display()
    );

    fx.cmd()
        .args(["apply", "--json", "--form", &body])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""options": "-D 9999""#))
        .stdout(predicate::str::contains(r#""started": null"#));

    assert_eq!(fs::read_to_string(&cfg).unwrap(), "-D 9999");
    assert_eq!(fx.verbs(), vec!["stop"]);
}

#[test]
fn apply_reads_form_body_from_stdin() {
    let fx = Fixture::new();
    let cfg = fx.cfg();
    let body = format!(
        "%23config={}&%23prefix=include%3Di&service=1&include=%2Fmnt%2Fuser%2FMy+Photos",
        cfg.display()
    );

    fx.cmd()
        .args(["apply", "--form-file", "-"])
        .write_stdin(body)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&cfg).unwrap(),
        r#"-i "/mnt/user/My\ Photos" -D 9999"#
    );
    assert_eq!(fx.verbs(), vec!["stop", "start"]);
}

#[test]
fn apply_defaults_override_submission() {
    let fx = Fixture::new();
    let cfg = fx.cfg();

    fx.cmd()
        .arg("apply")
        .arg("-f")
        .arg(format!("#config={}", cfg.display()))
        .args(["-f", "depth=3", "--default", "depth=8"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&cfg).unwrap(), "-D 8");
}

#[test]
fn apply_without_config_path_fails_after_running_lifecycle() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["apply", "-f", "service=1", "-f", "include=/mnt/a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("#config"))
        .stderr(predicate::str::contains("stop: exited with status 0"))
        .stderr(predicate::str::contains("start: exited with status 0"));

    assert_eq!(fx.verbs(), vec!["stop", "start"]);
}

#[test]
fn apply_honours_explicit_script() {
    let fx = Fixture::new();
    let cfg = fx.cfg();
    let script = fx.docroot().join(SCRIPT_RELATIVE);

    Command::new(env!("CARGO_BIN_EXE_cachedirs"))
        .env("DOCUMENT_ROOT", "/nonexistent")
        .arg("apply")
        .arg("--script")
        .arg(&script)
        .arg("-f")
        .arg(format!("#config={}", cfg.display()))
        .assert()
        .success();

    assert_eq!(fx.verbs(), vec!["stop"]);
}

#[test]
fn malformed_field_is_a_usage_error() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["apply", "-f", "service"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));

    assert!(fx.verbs().is_empty());
}

// ---------------------------------------------------------------------------
// compile / service
// ---------------------------------------------------------------------------

#[test]
fn compile_has_no_side_effects() {
    let fx = Fixture::new();
    let cfg = fx.cfg();

    fx.cmd()
        .arg("compile")
        .arg("-f")
        .arg(format!("#config={}", cfg.display()))
        .args(["-f", "#prefix=include=i", "-f", "adaptive=1", "-f", "depth=2"])
        .args(["-f", "include=/mnt/a (old)"])
        .assert()
        .success()
        .stdout(predicate::str::diff("-i \"/mnt/a\\ \\(old\\)\" -d 2\n"));

    assert!(!cfg.exists());
    assert!(fx.verbs().is_empty());
}

#[test]
fn service_commands_pass_single_verb() {
    let fx = Fixture::new();

    fx.cmd().args(["service", "stop"]).assert().success();
    fx.cmd()
        .args(["service", "start", "--docroot"])
        .arg(fx.docroot())
        .assert()
        .success()
        .stdout(predicate::str::contains("start: exited with status 0"));

    assert_eq!(fx.verbs(), vec!["stop", "start"]);
}

#[test]
fn service_reports_missing_script() {
    Command::new(env!("CARGO_BIN_EXE_cachedirs"))
        .args(["service", "stop", "--script", "/nonexistent/rc.cachedirs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to spawn"));
}
