//! Argument handling of the `pdfoutline` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("pdfoutline").unwrap()
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("outline"))
        .stdout(predicate::str::contains("rank"))
        .stdout(predicate::str::contains("lines"));
}

#[test]
fn missing_subcommand_fails() {
    cmd().assert().failure();
}

#[test]
fn outline_requires_both_directories() {
    cmd()
        .args(["outline", "only-input"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OUTPUT_DIR"));
}

#[test]
fn unknown_format_rejected() {
    cmd()
        .args(["lines", "doc.pdf", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
