//! End-to-end tests against the `peanut` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn script(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".peanut")
        .tempfile()
        .expect("create temp script");
    file.write_all(content.as_bytes()).expect("write script");
    file
}

fn peanut() -> Command {
    Command::cargo_bin("peanut").expect("peanut binary should build")
}

#[test]
fn prints_computed_value() {
    let file = script("var a = 2 + 3 * 4\nprint(a)\n");
    peanut()
        .arg(file.path())
        .assert()
        .success()
        .stdout("14\n");
}

#[test]
fn function_call_output() {
    let file = script("function add(a, b) => a + b\nprint(add(2, 3))\n");
    peanut()
        .arg(file.path())
        .assert()
        .success()
        .stdout("5\n");
}

#[test]
fn loop_output_is_ordered() {
    let file = script("for i = 0 until 3 => print(i)\n");
    peanut()
        .arg(file.path())
        .assert()
        .success()
        .stdout("0\n1\n2\n");
}

#[test]
fn interpolation_in_printed_string() {
    let file = script("var s = \"x=${1+2}\"\nprint(s)\n");
    peanut()
        .arg(file.path())
        .assert()
        .success()
        .stdout("x=3\n");
}

#[test]
fn arrays_print_with_brackets() {
    let file = script("print([1, 2, 3])\n");
    peanut()
        .arg(file.path())
        .assert()
        .success()
        .stdout("[1, 2, 3]\n");
}

#[test]
fn runtime_error_exits_nonzero_with_traceback() {
    let file = script("var x = 1/0\n");
    peanut()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Runtime Error: Division by zero"))
        .stderr(predicate::str::contains("in BASE_LEVEL_SCRIPT"));
}

#[test]
fn syntax_error_points_at_the_source() {
    let file = script("var = 5\n");
    peanut()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid Syntax: Expected identifier"));
}

#[test]
fn scoped_at_root_warns_on_stderr() {
    let file = script("scoped t = 1\nprint(t)\n");
    peanut()
        .arg(file.path())
        .assert()
        .success()
        .stdout("1\n")
        .stderr(predicate::str::contains(
            "WARNING: Scoped is redundant in the Global Context!",
        ));
}

#[test]
fn missing_script_reports_read_failure() {
    peanut()
        .arg("definitely_missing.peanut")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
