#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Runs a submitted compiler over the test programs and grades what it
//! writes.
//!
//! Every grader follows the same shape: a [`runner::Runner`] executes the
//! submission once per test program and leaves a record plus a
//! [`runner::RunStatus`] per case; [`grade_outputs`] then pairs each gold
//! record with the submission's record and hands the pair to an
//! [`OutputGrader`]. Cases that cannot be graded become error reports
//! instead of aborting the batch.

/// Interpreter runs judged against expected stdout.
pub mod exec;
/// Token stream grading.
pub mod lexer;
/// Runs a submission once per test program.
pub mod runner;
/// Name-resolution and control-structure fact grading.
pub mod semantic;
/// All-or-nothing syntax and type tree grading.
pub mod tree;

use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use bon::Builder;
use itertools::Itertools;
use tracing::{info, warn};

pub use self::{
    exec::ExecGrader,
    lexer::LexerGrader,
    runner::{RunStatus, Runner},
    semantic::{ControlStructureGrader, NameResolveGrader, SemanticGrader},
    tree::TreeDiffGrader,
};
use crate::{
    config::GraderConfig,
    constants::{ACCEPTED_SUBMISSIONS, RECORD_EXTENSION, STATUS_SUFFIX, TIMEOUT_DETAIL},
    grade::{ErrorReport, Report},
};

/// A compiler stage the submission is asked to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Token stream.
    Lex,
    /// Syntax tree.
    Parse,
    /// Typed syntax tree.
    Type,
    /// Control-structure facts.
    Cs,
    /// Name-binding facts.
    Name,
    /// Interpretation of the program.
    Interpret,
}

impl Target {
    /// Value passed to the submission's `--target` flag.
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Lex => "lex",
            Target::Parse => "parse",
            Target::Type => "type",
            Target::Cs => "cs",
            Target::Name => "name",
            Target::Interpret => "interpret",
        }
    }

    /// Directory, under the output root, receiving this target's records.
    pub fn out_dir(self) -> String {
        format!("{}_out", self.as_str())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grades one student record against one gold record.
pub trait OutputGrader: Send + Sync {
    /// Stage whose records this grader understands.
    fn target(&self) -> Target;

    /// Grades a single pair of records. Errors become error reports.
    fn grade_single(&self, stu_out: &Path, gold_out: &Path) -> Result<Report>;
}

/// Fails unless `submission` has one of the accepted extensions.
pub fn check_submission(submission: &Path) -> Result<()> {
    let accepted = submission
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ACCEPTED_SUBMISSIONS.contains(&ext));
    if !accepted {
        bail!(
            "only {} submissions are accepted for grading, got {}",
            ACCEPTED_SUBMISSIONS.iter().map(|ext| format!(".{ext}")).join("/"),
            submission.display()
        );
    }
    Ok(())
}

/// Non-hidden regular files in `dir`, sorted, optionally filtered by
/// extension.
pub fn list_files(dir: &Path, extension: Option<&str>) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Could not read directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Could not read an entry of {}", dir.display()))?
            .path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with('.') || !path.is_file() {
            continue;
        }
        if let Some(ext) = extension
            && path.extension().and_then(|e| e.to_str()) != Some(ext)
        {
            continue;
        }
        files.push(path);
    }

    Ok(files.into_iter().sorted().collect())
}

/// File name without its last extension.
pub(crate) fn stem_of(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_owned)
        .with_context(|| format!("{} has no usable file name", path.display()))
}

/// File name shown in reports for a record.
pub(crate) fn case_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Where the run status of `stem` is written inside a target output dir.
pub fn status_path(stu_out_dir: &Path, stem: &str) -> PathBuf {
    stu_out_dir.join(format!("{stem}{STATUS_SUFFIX}"))
}

/// Grades every gold record in `gold_dir` against the student record of the
/// same name in `stu_out_dir`.
///
/// Produces one report per gold record, in file name order. A timed-out run,
/// a missing student record and a record that fails to grade each yield an
/// [`ErrorReport`].
pub fn grade_outputs(
    grader: &dyn OutputGrader,
    stu_out_dir: &Path,
    gold_dir: &Path,
) -> Result<Vec<Report>> {
    let mut reports = Vec::new();

    for gold_out in list_files(gold_dir, Some(RECORD_EXTENSION))? {
        let stem = stem_of(&gold_out)?;
        let case = case_name(&gold_out);
        let stu_out = stu_out_dir.join(&case);

        let status = RunStatus::load(&status_path(stu_out_dir, &stem));
        let report = match status {
            Ok(status) if status.timed_out => {
                warn!("{case}: the submission timed out");
                Report::Error(ErrorReport::new(&case, TIMEOUT_DETAIL))
            }
            _ if stu_out.is_file() => match grader.grade_single(&stu_out, &gold_out) {
                Ok(report) => report,
                Err(e) => {
                    warn!("{case}: could not grade output: {e:#}");
                    Report::Error(ErrorReport::new(&case, format!("{e:?}")))
                }
            },
            Ok(status) => {
                warn!("{case}: no output produced (return code {})", status.return_code);
                Report::Error(ErrorReport::new(&case, status.message()))
            }
            Err(e) => {
                warn!("{case}: no output and no run status: {e}");
                Report::Error(ErrorReport::new(&case, e.to_string()))
            }
        };

        info!("{case}: {}", report.grade_struct());
        reports.push(report);
    }

    Ok(reports)
}

/// A target grader bound to its test programs and gold records.
#[derive(Builder)]
pub struct OutputSuite {
    /// Grader for the records the target produces.
    grader:   Box<dyn OutputGrader>,
    /// Directory of test programs.
    #[builder(into)]
    code_dir: PathBuf,
    /// Directory of gold records.
    #[builder(into)]
    gold_dir: PathBuf,
}

impl OutputSuite {
    /// Runs the submission over every test program, then grades the records.
    pub async fn grade(
        &self,
        submission: &Path,
        out_root: &Path,
        config: &GraderConfig,
    ) -> Result<Vec<Report>> {
        check_submission(submission)?;

        let runner = Runner::builder()
            .target(self.grader.target())
            .java(config.java())
            .timeout(config.timeout())
            .jobs(config.jobs())
            .build();
        let stu_out_dir = runner
            .run(submission, &self.code_dir, out_root)
            .await
            .with_context(|| format!("Failed to run the {} stage", self.grader.target()))?;

        grade_outputs(self.grader.as_ref(), &stu_out_dir, &self.gold_dir)
    }
}

/// What the command line asked to grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Lexer: token streams.
    Lex,
    /// Parser: syntax trees.
    Parse,
    /// Type checker: typed trees.
    Type,
    /// Control-structure analysis.
    Cs,
    /// Name resolution.
    Name,
    /// Control structure, name resolution and type checking together.
    Semantic,
    /// Interpreter: program output.
    Interpret,
}

/// Grades `submission` for `assignment`.
///
/// `gold_dir` is required for everything except [`Assignment::Interpret`],
/// whose expected outputs live next to the test programs.
pub async fn grade_submission(
    assignment: Assignment,
    submission: &Path,
    code_dir: &Path,
    gold_dir: Option<&Path>,
    out_root: &Path,
    config: &GraderConfig,
) -> Result<Vec<Report>> {
    let require_gold = || gold_dir.context("--gold is required for this assignment");
    let suite = |grader: Box<dyn OutputGrader>| -> Result<OutputSuite> {
        Ok(OutputSuite::builder()
            .grader(grader)
            .code_dir(code_dir)
            .gold_dir(require_gold()?)
            .build())
    };

    match assignment {
        Assignment::Lex => {
            let grader = LexerGrader::builder()
                .scoring(config.lex_scoring())
                .build();
            suite(Box::new(grader))?
                .grade(submission, out_root, config)
                .await
        }
        Assignment::Parse => {
            suite(Box::new(TreeDiffGrader::new(Target::Parse)))?
                .grade(submission, out_root, config)
                .await
        }
        Assignment::Type => {
            suite(Box::new(TreeDiffGrader::new(Target::Type)))?
                .grade(submission, out_root, config)
                .await
        }
        Assignment::Cs => {
            suite(Box::new(ControlStructureGrader::builder().build()))?
                .grade(submission, out_root, config)
                .await
        }
        Assignment::Name => {
            suite(Box::new(NameResolveGrader::builder().build()))?
                .grade(submission, out_root, config)
                .await
        }
        Assignment::Semantic => {
            SemanticGrader::new(code_dir, require_gold()?)
                .grade(submission, out_root, config)
                .await
        }
        Assignment::Interpret => {
            ExecGrader::builder()
                .java(config.java().clone())
                .timeout(config.timeout())
                .build()
                .grade(submission, code_dir)
                .await
        }
    }
}
