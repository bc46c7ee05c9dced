//! End-to-end tests of the dmypy-bridge binary against the dmypy-stub client
//!
//! Gated behind the `dev-tools` feature, which builds the stub.
//!
//! Run with: `cargo test --features dev-tools --test bridge_cli`

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A project directory with a repository marker so config discovery stays inside it
fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join(".git")).unwrap();
    temp
}

fn bridge_cmd(project: &TempDir, scenario: &str) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dmypy-bridge"));
    cmd.current_dir(project.path())
        .arg("--program")
        .arg(assert_cmd::cargo::cargo_bin!("dmypy-stub"))
        .env("DMYPY_STUB_SCENARIO", scenario)
        .env("DMYPY_STUB_LOG", project.path().join("calls.log"))
        .env_remove("RUST_LOG");
    cmd
}

fn calls(project: &TempDir) -> String {
    fs::read_to_string(project.path().join("calls.log")).unwrap_or_default()
}

#[test]
fn version_output() {
    Command::new(assert_cmd::cargo::cargo_bin!("dmypy-bridge"))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dmypy-bridge"));
}

#[test]
fn empty_input_exits_cleanly() {
    let project = project();
    bridge_cmd(&project, "success")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn run_prints_check_output_and_done_marker() {
    let project = project();
    bridge_cmd(&project, "success")
        .write_stdin("run\n")
        .assert()
        .success()
        .stdout("Success: no issues found in 2 source files\n# done!\n")
        .stderr(predicate::str::contains(r#"MYPY ["run"] "#));

    assert_eq!(
        calls(&project),
        "--status-file .mypy_cache/.dmypy.json run -- --show-error-end --no-pretty \
         --hide-error-code-links --hide-error-context . .mypy_cache/__mypy_plugin_temp__.py\n"
    );
    assert!(
        project
            .path()
            .join(".mypy_cache/__mypy_plugin_temp__.py")
            .is_file()
    );
}

#[test]
fn run_with_type_errors_is_not_a_failure() {
    let project = project();
    bridge_cmd(&project, "type-errors")
        .write_stdin("run\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[name-defined]"))
        .stdout(predicate::str::ends_with("# done!\n"));
}

#[test]
fn run_with_inspect_moves_check_output_to_stderr() {
    let project = project();
    bridge_cmd(&project, "success")
        .write_stdin("pkg/mod.py:1:1:1:4::run::inspect\n")
        .assert()
        .success()
        .stdout("\"builtins.int\"\n")
        .stderr(predicate::str::contains(
            "Success: no issues found in 2 source files",
        ))
        .stderr(predicate::str::contains("MYPY result: \"builtins.int\""));
}

#[test]
fn suggest_returns_json_then_done_marker() {
    let project = project();
    bridge_cmd(&project, "success")
        .write_stdin("pkg.mod.func::suggest\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""func_name":"pkg.mod.func""#))
        .stdout(predicate::str::ends_with("# done!\n"));

    assert!(calls(&project).contains("suggest pkg.mod.func --json"));
}

#[test]
fn inspect_failure_keeps_bridge_alive() {
    let project = project();
    bridge_cmd(&project, "inspect-fail")
        .write_stdin("pkg/mod.py:9:1:9:2::inspect\nrun\n")
        .assert()
        .success()
        .stdout("\nSuccess: no issues found in 2 source files\n# done!\n")
        .stderr(predicate::str::contains("Can't find expression"))
        .stderr(predicate::str::contains(
            "MYPY DaemonExit: inspect exited with status 2",
        ));
}

#[test]
fn check_failure_stops_bridge() {
    let project = project();
    bridge_cmd(&project, "crash")
        .write_stdin("run\nrun\n")
        .assert()
        .code(70)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Daemon crashed!"))
        .stderr(predicate::str::contains("Error: mypy daemon call failed"));

    assert_eq!(calls(&project).lines().count(), 1);
}

#[test]
fn missing_program_stops_bridge_on_check() {
    let project = project();
    Command::new(assert_cmd::cargo::cargo_bin!("dmypy-bridge"))
        .current_dir(project.path())
        .args(["--program", "definitely-not-a-dmypy-binary"])
        .write_stdin("run\n")
        .assert()
        .code(70)
        .stderr(predicate::str::contains("could not start"));
}

#[test]
fn unrecognized_lines_produce_no_output() {
    let project = project();
    bridge_cmd(&project, "success")
        .write_stdin("\nhello\npkg/mod.py::INSPECT\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(calls(&project), "");
}

#[test]
fn config_file_sets_status_file() {
    let project = project();
    fs::write(
        project.path().join(".dmypy-bridge.toml"),
        "[daemon]\nstatus_file = \"state/.dmypy.json\"\n",
    )
    .unwrap();

    bridge_cmd(&project, "success")
        .write_stdin("pkg/mod.py:1:1:1:4::inspect\n")
        .assert()
        .success();

    assert_eq!(
        calls(&project),
        "--status-file state/.dmypy.json inspect pkg/mod.py:1:1:1:4\n"
    );
}

#[test]
fn invalid_config_exits_with_cli_args_code() {
    let project = project();
    fs::write(
        project.path().join(".dmypy-bridge.toml"),
        "[daemon]\ntimeout_secs = 0\n",
    )
    .unwrap();

    bridge_cmd(&project, "success")
        .write_stdin("run\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("timeout_secs"));
}

#[test]
fn print_config_shows_sources() {
    let project = project();
    bridge_cmd(&project, "success")
        .args(["--timeout", "15", "--print-config"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"timeout_secs\s+= 15\s+\(cli\)").unwrap())
        .stdout(predicate::str::is_match(r"status_file\s+= \.mypy_cache/\.dmypy\.json\s+\(default\)").unwrap());
}

#[cfg(unix)]
#[test]
fn inspect_timeout_is_recovered() {
    let project = project();
    bridge_cmd(&project, "hang")
        .args(["--timeout", "1"])
        .write_stdin("pkg/mod.py:1:1:1:4::inspect\n")
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout("\n")
        .stderr(predicate::str::contains(
            "MYPY Timeout: inspect timed out after 1 seconds",
        ));
}
