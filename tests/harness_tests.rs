//! Tests for grading submission outputs from disk.

use std::{fs, path::Path};

use tempfile::TempDir;
use ycc_grader::{
    grade::Report,
    harness::{
        ControlStructureGrader, LexerGrader, NameResolveGrader, RunStatus, check_submission,
        grade_outputs, list_files, status_path,
    },
};

const TOKENS: &str = r#"{"tokens": [
    {"type": "INT", "value": "int", "source": "int", "line": 1, "column": 0, "start": 0, "stop": 2},
    {"type": "ID", "value": "x", "source": "x", "line": 1, "column": 4, "start": 4, "stop": 4},
    {"type": "SEMI", "value": ";", "source": ";", "line": 1, "column": 5, "start": 5, "stop": 5}
]}"#;

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write fixture");
}

fn write_status(dir: &Path, stem: &str, status: &RunStatus) {
    status.save(&status_path(dir, stem)).expect("write status");
}

fn ok_status() -> RunStatus {
    RunStatus {
        return_code: 0,
        ..RunStatus::default()
    }
}

fn error_detail(report: &Report) -> String {
    assert!(report.is_error(), "expected an error report for {}", report.name());
    assert_eq!(report.grade(), 0);
    report.detail()
}

#[test]
fn lexer_outputs_graded_case_by_case() {
    let gold = TempDir::new().expect("gold dir");
    let stu = TempDir::new().expect("output dir");

    for case in ["a", "b", "c", "d", "e"] {
        write(gold.path(), &format!("{case}.json"), TOKENS);
    }

    // a: graded normally
    write(stu.path(), "a.json", TOKENS);
    write_status(stu.path(), "a", &ok_status());

    // b: killed at the deadline, even though a partial record exists
    write(stu.path(), "b.json", TOKENS);
    write_status(stu.path(), "b", &RunStatus::killed());

    // c: crashed without writing a record
    write_status(stu.path(), "c", &RunStatus {
        return_code: 1,
        stdout:      String::new(),
        stderr:      "boom".to_string(),
        timed_out:   false,
    });

    // d: record without a token list
    write(stu.path(), "d.json", r#"{"lexemes": []}"#);
    write_status(stu.path(), "d", &ok_status());

    // e: never ran at all

    let reports = grade_outputs(&LexerGrader::default(), stu.path(), gold.path()).expect("grade");
    let names: Vec<&str> = reports.iter().map(Report::name).collect();
    assert_eq!(names, vec!["a.json", "b.json", "c.json", "d.json", "e.json"]);

    assert!(matches!(reports[0], Report::Lex(_)));
    assert_eq!(reports[0].grade(), 100);

    assert_eq!(error_detail(&reports[1]), "timeout");
    assert_eq!(error_detail(&reports[2]), "stdout:\n\n\nstderr:\nboom");
    assert!(error_detail(&reports[3]).contains("Invalid input"));
    assert!(!error_detail(&reports[4]).is_empty());
}

#[test]
fn only_json_gold_records_are_graded() {
    let gold = TempDir::new().expect("gold dir");
    let stu = TempDir::new().expect("output dir");
    write(gold.path(), "a.json", TOKENS);
    write(gold.path(), "notes.txt", "not a record");
    write(gold.path(), ".hidden.json", TOKENS);

    let reports = grade_outputs(&LexerGrader::default(), stu.path(), gold.path()).expect("grade");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].name(), "a.json");
}

#[test]
fn name_facts_graded_against_gold() {
    let gold = TempDir::new().expect("gold dir");
    let stu = TempDir::new().expect("output dir");

    write(
        gold.path(),
        "scope.json",
        r#"{"defs": [{"line": 1, "type": "int", "name": "x"}],
            "refs": [{"line": 2, "type": "int", "name": "x", "refLine": 1},
                     {"line": 3, "type": "int", "name": "x", "refLine": 1}]}"#,
    );
    write(
        stu.path(),
        "scope.json",
        r#"{"defs": [{"line": "1", "type": "int", "name": "x"}],
            "refs": [{"line": "2", "type": "int", "name": "x", "refLine": "1"}]}"#,
    );
    write_status(stu.path(), "scope", &ok_status());

    let reports =
        grade_outputs(&NameResolveGrader::default(), stu.path(), gold.path()).expect("grade");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].name(), "name resolve: scope.json");
    assert_eq!(reports[0].grade(), 66);
}

#[test]
fn control_record_without_lists_is_an_error_report() {
    let gold = TempDir::new().expect("gold dir");
    let stu = TempDir::new().expect("output dir");

    write(gold.path(), "loop.json", r#"{"breaks": [{"line": 3, "attachedLoop": 2}]}"#);
    write(stu.path(), "loop.json", "{}");
    write_status(stu.path(), "loop", &ok_status());

    let reports =
        grade_outputs(&ControlStructureGrader::default(), stu.path(), gold.path()).expect("grade");
    assert!(error_detail(&reports[0]).contains("none of `breaks`"));
}

#[test]
fn submissions_must_be_archives() {
    assert!(check_submission(Path::new("solution.jar")).is_ok());
    assert!(check_submission(Path::new("dir/solution.zip")).is_ok());
    assert!(check_submission(Path::new("solution.tar")).is_err());
    assert!(check_submission(Path::new("solution")).is_err());
}

#[test]
fn listing_skips_hidden_files_and_sorts() {
    let dir = TempDir::new().expect("dir");
    for name in ["b.c", "a.c", ".a.c", "c.txt"] {
        write(dir.path(), name, "");
    }
    fs::create_dir(dir.path().join("sub.c")).expect("sub dir");

    let all: Vec<String> = list_files(dir.path(), None)
        .expect("list")
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(all, vec!["a.c", "b.c", "c.txt"]);

    let only_c = list_files(dir.path(), Some("c")).expect("list");
    assert_eq!(only_c.len(), 2);
}
