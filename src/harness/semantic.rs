#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bon::Builder;
use tracing::debug;

use super::{OutputGrader, OutputSuite, Target, TreeDiffGrader, case_name};
use crate::{
    config::GraderConfig,
    grade::{FactReport, MatchPolicy, Report, match_facts_with},
    records::{load_control_facts, load_name_facts},
};

/// Grades name-binding facts.
#[derive(Debug, Clone, Default, Builder)]
pub struct NameResolveGrader {
    /// Whether a student fact may satisfy several gold facts.
    #[builder(default)]
    policy: MatchPolicy,
}

impl OutputGrader for NameResolveGrader {
    fn target(&self) -> Target {
        Target::Name
    }

    fn grade_single(&self, stu_out: &Path, gold_out: &Path) -> Result<Report> {
        let stu = load_name_facts(stu_out).context("Failed to load the submission's names")?;
        let gold = load_name_facts(gold_out).context("Failed to load the expected names")?;

        let result = match_facts_with(&stu, &gold, self.policy);
        debug!("{}: {}/{} names matched", gold_out.display(), result.matched_count(), gold.len());

        Ok(Report::Facts(FactReport::new(
            format!("name resolve: {}", case_name(gold_out)),
            &result,
        )))
    }
}

/// Grades control-structure facts.
#[derive(Debug, Clone, Default, Builder)]
pub struct ControlStructureGrader {
    /// Whether a student fact may satisfy several gold facts.
    #[builder(default)]
    policy: MatchPolicy,
}

impl OutputGrader for ControlStructureGrader {
    fn target(&self) -> Target {
        Target::Cs
    }

    fn grade_single(&self, stu_out: &Path, gold_out: &Path) -> Result<Report> {
        let stu =
            load_control_facts(stu_out).context("Failed to load the submission's jumps")?;
        let gold = load_control_facts(gold_out).context("Failed to load the expected jumps")?;

        let result = match_facts_with(&stu, &gold, self.policy);
        debug!("{}: {}/{} jumps matched", gold_out.display(), result.matched_count(), gold.len());

        Ok(Report::Facts(FactReport::new(
            format!("control structure analyze: {}", case_name(gold_out)),
            &result,
        )))
    }
}

/// Control structure, name resolution and type checking graded together,
/// each from its own `cs/`, `name/` and `type/` sub-directory.
#[derive(Debug, Clone)]
pub struct SemanticGrader {
    /// Root of the test programs.
    code_dir: PathBuf,
    /// Root of the gold records.
    gold_dir: PathBuf,
}

impl SemanticGrader {
    /// Creates a grader over the given test and gold roots.
    pub fn new(code_dir: impl Into<PathBuf>, gold_dir: impl Into<PathBuf>) -> Self {
        Self {
            code_dir: code_dir.into(),
            gold_dir: gold_dir.into(),
        }
    }

    /// Suite for one sub-directory.
    fn suite(&self, grader: Box<dyn OutputGrader>) -> OutputSuite {
        let sub = grader.target().as_str();
        OutputSuite::builder()
            .code_dir(self.code_dir.join(sub))
            .gold_dir(self.gold_dir.join(sub))
            .grader(grader)
            .build()
    }

    /// Runs all three stages and concatenates their reports.
    pub async fn grade(
        &self,
        submission: &Path,
        out_root: &Path,
        config: &GraderConfig,
    ) -> Result<Vec<Report>> {
        let suites = [
            self.suite(Box::new(ControlStructureGrader::default())),
            self.suite(Box::new(NameResolveGrader::default())),
            self.suite(Box::new(TreeDiffGrader::new(Target::Type))),
        ];

        let mut reports = Vec::new();
        for suite in &suites {
            reports.extend(suite.grade(submission, out_root, config).await?);
        }
        Ok(reports)
    }
}
