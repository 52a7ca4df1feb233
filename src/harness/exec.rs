#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use bon::Builder;
use glob::glob;
use tracing::{info, warn};

use super::{Target, check_submission, list_files, stem_of};
use crate::{
    constants::{DEFAULT_TIMEOUT_SECS, JAVA_FLAGS},
    grade::{ExecOutcome, ExecReport, Report},
    process::{RunOutcome, StdinSource, run_collect},
};

/// Inputs of a test program: every `*.in` directly under `input_dir`.
fn find_inputs(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = input_dir.join("*.in");
    let pattern = pattern
        .to_str()
        .context("Could not convert the input directory to a string")?;

    Ok(glob(pattern)
        .context("Could not create glob")?
        .filter_map(Result::ok)
        .collect())
}

/// Decides the outcome of one finished run.
///
/// Anything on stderr is a runtime error; otherwise stdout must equal the
/// expected output up to surrounding whitespace.
pub fn judge(stdout: &str, stderr: &str, expected: &str) -> ExecOutcome {
    if !stderr.is_empty() {
        ExecOutcome::RuntimeError(stderr.to_string())
    } else if stdout.trim() != expected.trim() {
        ExecOutcome::WrongAnswer
    } else {
        ExecOutcome::Passed
    }
}

/// Runs each test program of an interpreter assignment against its inputs
/// and compares what it prints.
///
/// A test program `foo.c` comes with `foo/input/<n>.in` and the matching
/// `foo/output/<n>.out`.
#[derive(Debug, Clone, Builder)]
pub struct ExecGrader {
    /// Java launcher.
    #[builder(into)]
    java:    PathBuf,
    /// Wall-clock limit per input.
    #[builder(default = Duration::from_secs(DEFAULT_TIMEOUT_SECS))]
    timeout: Duration,
}

impl ExecGrader {
    /// Grades every `*.c` program in `code_dir`, one report per program.
    pub async fn grade(&self, submission: &Path, code_dir: &Path) -> Result<Vec<Report>> {
        check_submission(submission)?;

        let mut reports = Vec::new();
        for program in list_files(code_dir, Some("c"))? {
            let report = self.grade_program(submission, &program).await?;
            info!("{}: {}", report.name(), report.grade_struct());
            reports.push(report);
        }
        Ok(reports)
    }

    /// Runs one program over all of its inputs.
    async fn grade_program(&self, submission: &Path, program: &Path) -> Result<Report> {
        let name = stem_of(program)?;
        let data_dir = program.with_file_name(&name);
        let input_dir = data_dir.join("input");
        let output_dir = data_dir.join("output");

        let args: Vec<OsString> = JAVA_FLAGS
            .iter()
            .map(|flag| OsString::from(*flag))
            .chain([
                OsString::from(submission),
                OsString::from("--target"),
                OsString::from(Target::Interpret.as_str()),
                OsString::from(program),
            ])
            .collect();

        let mut report = ExecReport::new(&name);
        for input_path in find_inputs(&input_dir)? {
            let input_name = stem_of(&input_path)?;
            let input = std::fs::read(&input_path)
                .with_context(|| format!("Could not read {}", input_path.display()))?;
            let expected_path = output_dir.join(format!("{input_name}.out"));
            let expected = std::fs::read_to_string(&expected_path)
                .with_context(|| format!("Could not read {}", expected_path.display()))?;

            let outcome = match run_collect(
                &self.java,
                &args,
                StdinSource::Bytes(input),
                Some(self.timeout),
            )
            .await
            .with_context(|| format!("Failed to run the submission on {}", program.display()))?
            {
                RunOutcome::Finished(collected) => judge(
                    &collected.stdout_text(),
                    &collected.stderr_text(),
                    &expected,
                ),
                RunOutcome::TimedOut(_) => ExecOutcome::Timeout,
            };

            if outcome != ExecOutcome::Passed {
                warn!("{name}/{input_name}: {outcome}");
            }
            report.push(input_name, outcome);
        }

        Ok(Report::Exec(report))
    }
}
