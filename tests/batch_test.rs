//! Integration tests for directory batch processing

mod common;

use std::fs;

use common::{build_pdf, centered, flyer_pdf, line};
use pdfoutline::batch::output_path;
use pdfoutline::{
    process_directory, BatchOptions, DocumentStructure, FileResult, HeadingLevel, JsonFormat,
};
use tempfile::TempDir;

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    fs::create_dir(&input).unwrap();

    fs::write(input.join("flyer.pdf"), flyer_pdf()).unwrap();
    fs::write(
        input.join("memo.pdf"),
        build_pdf(vec![vec![
            centered("Staff Memo", 24.0, true, 720.0),
            line("Please read before Monday.", 11.0, false, 72.0, 660.0),
        ]]),
    )
    .unwrap();
    fs::write(input.join("corrupt.pdf"), b"%PDF-1.4\nthis is not really a pdf").unwrap();
    fs::write(input.join("readme.txt"), b"not an input").unwrap();
    dir
}

#[test]
fn test_writes_one_json_per_pdf() {
    let dir = setup();
    let input = dir.path().join("input");
    let output = dir.path().join("output");

    let report = process_directory(&input, &output, &BatchOptions::new()).unwrap();

    let names: Vec<_> = report
        .outcomes
        .iter()
        .map(|o| o.input.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["corrupt.pdf", "flyer.pdf", "memo.pdf"]);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);

    assert!(output.join("flyer.json").is_file());
    assert!(output.join("memo.json").is_file());
    assert!(!output.join("corrupt.json").exists());
    assert!(!output.join("readme.json").exists());
}

#[test]
fn test_json_content() {
    let dir = setup();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    process_directory(&input, &output, &BatchOptions::new()).unwrap();

    let json = fs::read_to_string(output.join("memo.json")).unwrap();
    let doc: DocumentStructure = serde_json::from_str(&json).unwrap();
    assert_eq!(doc.title, "Staff Memo");
    assert_eq!(doc.outline.len(), 1);
    assert_eq!(doc.outline[0].level, HeadingLevel::H1);
    assert_eq!(doc.outline[0].page, 0);
    assert!(json.contains("\n  \"outline\": ["));
}

#[test]
fn test_compact_format() {
    let dir = setup();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    let options = BatchOptions::new().with_format(JsonFormat::Compact);
    process_directory(&input, &output, &options).unwrap();

    let json = fs::read_to_string(output.join("flyer.json")).unwrap();
    assert!(!json.contains('\n'));
    assert!(json.starts_with(r#"{"title":"Welcome Party""#));
}

#[test]
fn test_failure_reason_reported() {
    let dir = setup();
    let report = process_directory(
        dir.path().join("input"),
        dir.path().join("output"),
        &BatchOptions::new(),
    )
    .unwrap();

    let corrupt = &report.outcomes[0];
    assert!(!corrupt.is_success());
    match &corrupt.result {
        FileResult::Failed { reason } => assert!(!reason.is_empty()),
        other => panic!("expected failure, got {:?}", other),
    }

    match &report.outcomes[1].result {
        FileResult::Written {
            output,
            title,
            headings,
        } => {
            assert_eq!(output, &output_path(&report.outcomes[1].input, &dir.path().join("output")));
            assert_eq!(title, "Welcome Party");
            assert_eq!(*headings, 4);
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[test]
fn test_empty_input_dir() {
    let dir = TempDir::new().unwrap();
    let report =
        process_directory(dir.path(), dir.path().join("out"), &BatchOptions::new()).unwrap();
    assert!(report.is_empty());
    assert!(dir.path().join("out").is_dir());
}

#[test]
fn test_rerun_overwrites_output() {
    let dir = setup();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    fs::create_dir(&output).unwrap();
    fs::write(output.join("memo.json"), "stale").unwrap();

    process_directory(&input, &output, &BatchOptions::new()).unwrap();
    let json = fs::read_to_string(output.join("memo.json")).unwrap();
    assert!(json.contains("Staff Memo"));
}

#[test]
fn test_unwritable_output_fails_only_that_file() {
    let dir = setup();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    // A directory squatting on the output name cannot be written over.
    fs::create_dir_all(output.join("flyer.json")).unwrap();

    let report = process_directory(&input, &output, &BatchOptions::new()).unwrap();

    let flyer = &report.outcomes[1];
    assert!(matches!(flyer.result, FileResult::Failed { .. }));
    assert!(output.join("flyer.json").is_dir());
    assert!(report.outcomes[2].is_success());
    assert!(output.join("memo.json").is_file());
}
