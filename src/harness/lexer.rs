#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::Path;

use anyhow::{Context, Result};
use bon::Builder;
use tracing::debug;

use super::{OutputGrader, Target, case_name};
use crate::{
    grade::{LexReport, LexScoring, Report, align_and_classify, analyze_similar, same_kind},
    records::load_tokens,
};

/// Grades token streams: alignment on token category, then field checks on
/// every aligned pair.
#[derive(Debug, Clone, Default, Builder)]
pub struct LexerGrader {
    /// Denominator used for the grade.
    #[builder(default)]
    scoring: LexScoring,
}

impl OutputGrader for LexerGrader {
    fn target(&self) -> Target {
        Target::Lex
    }

    fn grade_single(&self, stu_out: &Path, gold_out: &Path) -> Result<Report> {
        let stu = load_tokens(stu_out).context("Failed to load the submission's tokens")?;
        let gold = load_tokens(gold_out).context("Failed to load the expected tokens")?;

        let mut units = align_and_classify(&stu, &gold, same_kind);
        analyze_similar(&mut units);
        debug!(
            "{}: {} student tokens, {} gold tokens, {} units",
            gold_out.display(),
            stu.len(),
            gold.len(),
            units.len()
        );

        Ok(Report::Lex(LexReport::new(
            case_name(gold_out),
            &stu,
            &gold,
            &units,
            self.scoring,
        )))
    }
}
