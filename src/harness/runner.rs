#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    ffi::OsString,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use bon::Builder;
use futures::{StreamExt, TryStreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{Target, list_files, status_path, stem_of};
use crate::{
    constants::{DEFAULT_TIMEOUT_SECS, JAVA_FLAGS, RECORD_EXTENSION},
    error::GradeError,
    process::{RunOutcome, StdinSource, run_collect},
    records::read_record,
};

/// What a single run of the submission left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatus {
    /// Exit code; 1 for a killed or signalled run.
    pub return_code: i32,
    /// Captured stdout.
    pub stdout:      String,
    /// Captured stderr, or `"time out"` for a killed run.
    pub stderr:      String,
    /// Whether the run was killed at the deadline.
    #[serde(default)]
    pub timed_out:   bool,
}

impl RunStatus {
    /// Status recorded for a run killed at the deadline.
    pub fn killed() -> Self {
        Self {
            return_code: 1,
            stdout:      String::new(),
            stderr:      "time out".to_string(),
            timed_out:   true,
        }
    }

    /// Loads a status file.
    pub fn load(path: &Path) -> Result<Self, GradeError> {
        read_record(path)
    }

    /// Writes the status file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize run status")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write run status to {}", path.display()))
    }

    /// The captured output, as shown in an error report.
    pub fn message(&self) -> String {
        format!("stdout:\n{}\n\nstderr:\n{}", self.stdout, self.stderr)
    }
}

/// Runs a submission over a directory of test programs for one target.
#[derive(Debug, Clone, Builder)]
pub struct Runner {
    /// Stage requested from the submission.
    target:  Target,
    /// Java launcher.
    #[builder(into)]
    java:    PathBuf,
    /// Wall-clock limit per test program.
    #[builder(default = Duration::from_secs(DEFAULT_TIMEOUT_SECS))]
    timeout: Duration,
    /// Test programs run at once.
    #[builder(default = NonZeroUsize::MIN)]
    jobs:    NonZeroUsize,
}

impl Runner {
    /// Command line for one test program.
    fn args(&self, submission: &Path, case: &Path, record: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = JAVA_FLAGS.iter().map(|flag| OsString::from(*flag)).collect();
        args.push(submission.into());
        args.push(case.into());
        args.push("--target".into());
        args.push(self.target.as_str().into());
        args.push("-o".into());
        args.push(record.into());
        args
    }

    /// Runs one test program and writes its status file.
    async fn run_case(&self, submission: &Path, case: &Path, out_dir: &Path) -> Result<()> {
        info!("processing {}", case.display());

        let stem = stem_of(case)?;
        let record = out_dir.join(format!("{stem}.{RECORD_EXTENSION}"));
        let args = self.args(submission, case, &record);

        // A record left over from an earlier run must not be graded.
        if record.exists() {
            std::fs::remove_file(&record)
                .with_context(|| format!("Could not remove stale {}", record.display()))?;
        }

        let status = match run_collect(&self.java, &args, StdinSource::Null, Some(self.timeout))
            .await
            .with_context(|| format!("Failed to run the submission on {}", case.display()))?
        {
            RunOutcome::Finished(collected) => {
                debug!(
                    "{stem}: exited with {} ({} bytes stdout, {} bytes stderr)",
                    collected.return_code(),
                    collected.stdout.len(),
                    collected.stderr.len()
                );
                RunStatus {
                    return_code: collected.return_code(),
                    stdout:      collected.stdout_text(),
                    stderr:      collected.stderr_text(),
                    timed_out:   false,
                }
            }
            RunOutcome::TimedOut(limit) => {
                warn!("{stem}: killed after {}s", limit.as_secs());
                RunStatus::killed()
            }
        };

        status.save(&status_path(out_dir, &stem))
    }

    /// Runs the submission over every non-hidden file of `code_dir`.
    ///
    /// Records and status files land in `<out_root>/<target>_out`, which is
    /// returned.
    pub async fn run(&self, submission: &Path, code_dir: &Path, out_root: &Path) -> Result<PathBuf> {
        let out_dir = out_root.join(self.target.out_dir());
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("Could not create {}", out_dir.display()))?;

        let cases = list_files(code_dir, None)?;
        debug!("{} test programs for target {}", cases.len(), self.target);

        stream::iter(&cases)
            .map(|case| self.run_case(submission, case, &out_dir))
            .buffer_unordered(self.jobs.get())
            .try_collect::<Vec<()>>()
            .await?;

        Ok(out_dir)
    }
}
