//! Tests for running submissions as subprocesses.
#![cfg(unix)]

use std::{
    ffi::OsString, fs, num::NonZeroUsize, os::unix::fs::PermissionsExt, path::Path,
    time::Duration,
};

use tempfile::TempDir;
use ycc_grader::{
    GradeError,
    grade::{ExecOutcome, Report},
    harness::{ExecGrader, LexerGrader, RunStatus, Runner, Target, grade_outputs, status_path},
    process::{RunOutcome, StdinSource, run_collect},
};

/// Stands in for `java`: writes an empty token record to the `-o` path,
/// except for `slow.c`, which hangs.
const FAKE_JAVA: &str = r#"#!/bin/sh
out=""
slow=0
while [ "$#" -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift ;;
    *slow.c) slow=1 ;;
  esac
  shift
done
if [ "$slow" = 1 ]; then exec sleep 5; fi
echo "lexing"
printf '{"tokens": []}' > "$out"
"#;

/// Stands in for an interpreter: echoes its first input line, fails on
/// `err` and hangs on `hang`.
const FAKE_INTERPRETER: &str = r#"#!/bin/sh
read line
if [ "$line" = "err" ]; then echo "bad input" >&2; exit 1; fi
if [ "$line" = "hang" ]; then exec sleep 5; fi
echo "$line"
"#;

fn write_script(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write script");
    let mut perms = fs::metadata(path).expect("script metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("chmod script");
}

#[tokio::test]
async fn runner_records_status_and_timeouts() {
    let root = TempDir::new().expect("root");
    let java = root.path().join("fake-java");
    write_script(&java, FAKE_JAVA);

    let code = root.path().join("code");
    fs::create_dir(&code).expect("code dir");
    for name in ["ok.c", "slow.c", ".hidden.c"] {
        fs::write(code.join(name), "int main() {}").expect("test program");
    }

    let gold = root.path().join("gold");
    fs::create_dir(&gold).expect("gold dir");
    for name in ["ok.json", "slow.json"] {
        fs::write(gold.join(name), r#"{"tokens": []}"#).expect("gold record");
    }

    let runner = Runner::builder()
        .target(Target::Lex)
        .java(&java)
        .timeout(Duration::from_secs(1))
        .jobs(NonZeroUsize::new(2).expect("non-zero"))
        .build();
    let out_dir = runner
        .run(&root.path().join("solution.jar"), &code, root.path())
        .await
        .expect("run");
    assert_eq!(out_dir, root.path().join("lex_out"));

    let ok = RunStatus::load(&status_path(&out_dir, "ok")).expect("ok status");
    assert_eq!(ok.return_code, 0);
    assert_eq!(ok.stdout, "lexing\n");
    assert!(!ok.timed_out);
    assert!(out_dir.join("ok.json").is_file());

    let slow = RunStatus::load(&status_path(&out_dir, "slow")).expect("slow status");
    assert_eq!(slow, RunStatus::killed());
    assert_eq!(slow.stderr, "time out");

    assert!(!status_path(&out_dir, ".hidden").exists());

    let reports = grade_outputs(&LexerGrader::default(), &out_dir, &gold).expect("grade");
    assert!(matches!(reports[0], Report::Lex(_)));
    assert_eq!(reports[1].detail(), "timeout");
}

#[tokio::test]
async fn run_collect_feeds_stdin() {
    let outcome = run_collect(
        "cat",
        &[],
        StdinSource::Bytes(b"3 4\n".to_vec()),
        Some(Duration::from_secs(5)),
    )
    .await
    .expect("spawn cat");

    let collected = outcome.finished().expect("cat finishes");
    assert_eq!(collected.stdout_text(), "3 4\n");
    assert_eq!(collected.return_code(), 0);
}

#[tokio::test]
async fn run_collect_kills_at_the_deadline() {
    let args = [OsString::from("-c"), OsString::from("sleep 5")];
    let outcome = run_collect("sh", &args, StdinSource::Null, Some(Duration::from_millis(200)))
        .await
        .expect("spawn sh");

    assert!(matches!(outcome, RunOutcome::TimedOut(_)));
    assert!(matches!(outcome.finished(), Err(GradeError::Timeout { .. })));
}

#[tokio::test]
async fn exec_grader_judges_each_input() {
    let root = TempDir::new().expect("root");
    let java = root.path().join("fake-interpreter");
    write_script(&java, FAKE_INTERPRETER);

    let code = root.path().join("code");
    let input = code.join("prog").join("input");
    let output = code.join("prog").join("output");
    fs::create_dir_all(&input).expect("input dir");
    fs::create_dir_all(&output).expect("output dir");
    fs::write(code.join("prog.c"), "int main() {}").expect("test program");

    for (case, stdin, expected) in [
        ("1", "5\n", "5\n"),
        ("2", "6\n", "7\n"),
        ("3", "err\n", ""),
        ("4", "hang\n", ""),
    ] {
        fs::write(input.join(format!("{case}.in")), stdin).expect("input");
        fs::write(output.join(format!("{case}.out")), expected).expect("output");
    }

    let reports = ExecGrader::builder()
        .java(&java)
        .timeout(Duration::from_secs(1))
        .build()
        .grade(&root.path().join("solution.jar"), &code)
        .await
        .expect("grade");

    assert_eq!(reports.len(), 1);
    let Report::Exec(report) = &reports[0] else {
        panic!("expected an execution report");
    };
    let outcomes: Vec<&ExecOutcome> = report.outcomes().iter().map(|(_, o)| o).collect();
    assert_eq!(outcomes, vec![
        &ExecOutcome::Passed,
        &ExecOutcome::WrongAnswer,
        &ExecOutcome::RuntimeError("bad input\n".to_string()),
        &ExecOutcome::Timeout,
    ]);
    assert_eq!(reports[0].name(), "prog");
    assert_eq!(reports[0].grade(), 25);
}
