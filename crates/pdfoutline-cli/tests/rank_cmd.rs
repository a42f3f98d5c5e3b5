//! Integration tests for the `rank` subcommand.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::{text, write_pdf};

fn cmd() -> Command {
    Command::cargo_bin("pdfoutline").unwrap()
}

fn write_inputs(dir: &std::path::Path) -> std::path::PathBuf {
    let guide = [
        text("F1", 12, 72, 700, "PACKING LIST"),
        text("F1", 10, 72, 680, "Bring sunscreen, hats and water for the beach days."),
        text("F1", 12, 72, 640, "2. Nightlife"),
        text("F1", 10, 72, 620, "Bars: jazz clubs; rooftop lounges; beach parties;"),
    ]
    .concat();
    write_pdf(dir, "guide.pdf", &[guide.as_str()]);

    let request = dir.join("request.json");
    std::fs::write(
        &request,
        r#"{
            "challenge_info": { "test_case_name": "travel" },
            "documents": [ { "filename": "guide.pdf", "title": "Guide" } ],
            "persona": { "role": "Travel Planner" },
            "job_to_be_done": { "task": "Plan nightlife with bars and clubs" }
        }"#,
    )
    .unwrap();
    request
}

#[test]
fn writes_collection_report() {
    let dir = tempfile::tempdir().unwrap();
    let request = write_inputs(dir.path());
    let out = dir.path().join("out/report.json");

    cmd()
        .arg("rank")
        .arg(&request)
        .arg(dir.path())
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("ranked 1 section(s) from 1 document(s)"));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(report["metadata"]["input_documents"][0], "guide.pdf");
    assert_eq!(report["metadata"]["persona"], "Travel Planner");
    assert!(report["metadata"]["processing_timestamp"].as_str().unwrap().contains('T'));
    assert_eq!(report["extracted_sections"][0]["section_title"], "2. Nightlife");
    assert_eq!(report["extracted_sections"][0]["importance_rank"], 1);
    assert_eq!(
        report["subsection_analysis"][0]["refined_text"],
        "Bars: jazz clubs; rooftop lounges; beach parties;"
    );
}

#[test]
fn malformed_request_exits_with_code_1() {
    let dir = tempfile::tempdir().unwrap();
    let request = dir.path().join("request.json");
    std::fs::write(&request, r#"{ "persona": {} }"#).unwrap();
    cmd()
        .arg("rank")
        .arg(&request)
        .arg(dir.path())
        .arg(dir.path().join("out.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn missing_pdf_dir_exits_with_code_1() {
    let dir = tempfile::tempdir().unwrap();
    let request = write_inputs(dir.path());
    cmd()
        .arg("rank")
        .arg(&request)
        .arg(dir.path().join("no-such-dir"))
        .arg(dir.path().join("out.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a directory"));
}
