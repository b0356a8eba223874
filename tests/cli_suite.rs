//! CLI surface tests: usage errors, record lifecycle, flag contracts.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct CliEnv {
    _tmp: TempDir,
    project_dir: PathBuf,
}

impl CliEnv {
    fn new() -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");
        let project_dir = tmp.path().join("project");
        fs::create_dir_all(&project_dir).expect("mkdir project");
        Self {
            _tmp: tmp,
            project_dir,
        }
    }

    fn labenv(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_labenv"));
        cmd.env_clear()
            .env("PATH", self.project_dir.join("no-binaries-here"))
            .current_dir(&self.project_dir);
        cmd
    }
}

#[test]
fn no_arguments_prints_usage() {
    CliEnv::new()
        .labenv()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
    CliEnv::new()
        .labenv()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("labenv"));
}

#[test]
fn init_writes_a_readable_record() {
    let env = CliEnv::new();
    env.labenv()
        .args(["init", "--tool", "conda", "--python", "3.11", "--name", "sea-ice"])
        .assert()
        .success();

    let record = fs::read_to_string(env.project_dir.join("labenv.kdl")).expect("read record");
    assert!(record.contains("tool \"conda\""));
    assert!(record.contains("python \"3.11\""));
    assert!(record.contains("name \"sea-ice\""));
}

#[test]
fn init_rejects_unknown_tools() {
    CliEnv::new()
        .labenv()
        .args(["init", "--tool", "poetry", "--python", "3.12", "--name", "p"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown tool"));
}

#[test]
fn init_refuses_to_overwrite_unless_forced() {
    let env = CliEnv::new();
    env.labenv()
        .args(["init", "--tool", "uv", "--python", "3.12", "--name", "p"])
        .assert()
        .success();

    env.labenv()
        .args(["init", "--tool", "uv", "--python", "3.12", "--name", "p"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));

    env.labenv()
        .args(["init", "--tool", "uv", "--python", "3.12", "--name", "p", "--force"])
        .assert()
        .success();
}

#[test]
fn sync_without_a_record_names_the_missing_path() {
    CliEnv::new()
        .labenv()
        .arg("sync")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("labenv.kdl"))
        .stderr(predicate::str::contains("labenv init"));
}

#[test]
fn check_without_a_record_exits_with_error_code() {
    CliEnv::new().labenv().arg("check").assert().code(4);
}

#[test]
fn corrupt_record_is_reported_not_panicked() {
    let env = CliEnv::new();
    fs::write(env.project_dir.join("labenv.kdl"), "environment {").expect("write");

    env.labenv()
        .arg("sync")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot be parsed"));
}

#[test]
fn note_flag_requires_doc_flag() {
    CliEnv::new()
        .labenv()
        .args(["sync", "--note", "orphan note"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--doc"));
}

#[test]
fn machine_flag_is_rejected_for_init_and_doc_mode() {
    let env = CliEnv::new();
    env.labenv()
        .args(["init", "--tool", "uv", "--python", "3.12", "--name", "p", "--machine", "json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--machine"));

    env.labenv()
        .args(["sync", "--doc", "numpy", "--note", "n", "--machine", "json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("documentation mode"));
}

#[test]
fn completions_are_generated() {
    CliEnv::new()
        .labenv()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("labenv"));
}

#[test]
fn record_is_found_from_a_subdirectory() {
    let env = CliEnv::new();
    env.labenv()
        .args(["init", "--tool", "uv", "--python", "3.12", "--name", "p"])
        .assert()
        .success();

    let notebooks = env.project_dir.join("notebooks");
    fs::create_dir_all(&notebooks).expect("mkdir notebooks");

    // Doc mode needs no active environment; it proves the record was found.
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_labenv"));
    cmd.env_clear()
        .env("PATH", env.project_dir.join("no-binaries-here"))
        .current_dir(&notebooks)
        .args(["sync", "--doc", "numpy", "--note", "n"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("numpy"));
    // PackageNotFound (not ConfigNotFound): the upward search located the
    // record one level up.
}
