#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    fields::{Message, compare_fields},
    lcs::lcs,
};
use crate::types::Token;

/// Status of one analysis unit, as shown in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    /// A gold token the submission never produced.
    Missing,
    /// A submission token with no gold counterpart.
    Redundant,
    /// A matched pair that has not been field-compared yet.
    Similar,
    /// A matched pair whose fields all agree.
    Correct,
    /// A matched pair that differs only in warning-level fields.
    Warning,
    /// A matched pair with at least one error-level difference.
    Error,
}

impl UnitStatus {
    /// Lowercase name used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            UnitStatus::Missing => "missing",
            UnitStatus::Redundant => "redundant",
            UnitStatus::Similar => "similar",
            UnitStatus::Correct => "correct",
            UnitStatus::Warning => "warning",
            UnitStatus::Error => "error",
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A matched student/gold token pair awaiting or holding a field verdict.
#[derive(Debug, Clone)]
pub struct Similar<'a> {
    /// Token produced by the submission.
    stu:      &'a Token,
    /// Token from the gold record.
    gold:     &'a Token,
    /// `Similar` until [`Similar::analyze`] runs, then one of the verdicts.
    status:   UnitStatus,
    /// Field mismatches found by the comparator.
    messages: Vec<Message>,
}

impl<'a> Similar<'a> {
    /// Pairs two tokens the aligner matched.
    pub fn new(stu: &'a Token, gold: &'a Token) -> Self {
        Self {
            stu,
            gold,
            status: UnitStatus::Similar,
            messages: Vec::new(),
        }
    }

    /// The submission's token.
    pub fn stu(&self) -> &'a Token {
        self.stu
    }

    /// The gold token.
    pub fn gold(&self) -> &'a Token {
        self.gold
    }

    /// Current status: `Similar`, or the verdict once analyzed.
    pub fn status(&self) -> UnitStatus {
        self.status
    }

    /// Field mismatches, in comparison order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether the field comparator has already run on this pair.
    pub fn is_analyzed(&self) -> bool {
        self.status != UnitStatus::Similar
    }

    /// Runs the field comparator once and records its verdict. Later calls
    /// leave the verdict untouched.
    pub fn analyze(&mut self) -> UnitStatus {
        if !self.is_analyzed() {
            let outcome = compare_fields(self.stu, self.gold);
            self.status = outcome.status;
            self.messages = outcome.messages;
        }
        self.status
    }
}

/// One classified outcome of aligning a student stream with a gold stream.
#[derive(Debug, Clone)]
pub enum AnalysisUnit<'a> {
    /// Extra submission token.
    Redundant(&'a Token),
    /// Gold token absent from the submission.
    Missing(&'a Token),
    /// Tokens paired by the aligner.
    Similar(Similar<'a>),
}

impl<'a> AnalysisUnit<'a> {
    /// Report status of this unit.
    pub fn status(&self) -> UnitStatus {
        match self {
            AnalysisUnit::Redundant(_) => UnitStatus::Redundant,
            AnalysisUnit::Missing(_) => UnitStatus::Missing,
            AnalysisUnit::Similar(similar) => similar.status(),
        }
    }

    /// Submission token, if this unit carries one.
    pub fn stu(&self) -> Option<&'a Token> {
        match self {
            AnalysisUnit::Redundant(token) => Some(*token),
            AnalysisUnit::Missing(_) => None,
            AnalysisUnit::Similar(similar) => Some(similar.stu()),
        }
    }

    /// Gold token, if this unit carries one.
    pub fn gold(&self) -> Option<&'a Token> {
        match self {
            AnalysisUnit::Redundant(_) => None,
            AnalysisUnit::Missing(token) => Some(*token),
            AnalysisUnit::Similar(similar) => Some(similar.gold()),
        }
    }

    /// Field mismatch messages; empty for missing and redundant units.
    pub fn messages(&self) -> &[Message] {
        match self {
            AnalysisUnit::Similar(similar) => similar.messages(),
            _ => &[],
        }
    }
}

/// Turns an ascending match list into units covering every element of `stu`
/// and `gold` exactly once.
///
/// Unmatched student tokens become `Redundant` and unmatched gold tokens
/// become `Missing`, each placed just before the next match, the way a line
/// diff places insertions and deletions.
///
/// # Panics
///
/// If `matches` is not strictly ascending in both coordinates or indexes past
/// either slice. [`lcs`] always satisfies this.
pub fn classify<'a>(
    stu: &'a [Token],
    gold: &'a [Token],
    matches: &[(usize, usize)],
) -> Vec<AnalysisUnit<'a>> {
    let mut units = Vec::with_capacity((stu.len() + gold.len()).saturating_sub(matches.len()));
    let (mut i, mut j) = (0, 0);

    for &(stu_idx, gold_idx) in matches {
        units.extend(stu[i..stu_idx].iter().map(AnalysisUnit::Redundant));
        units.extend(gold[j..gold_idx].iter().map(AnalysisUnit::Missing));
        units.push(AnalysisUnit::Similar(Similar::new(&stu[stu_idx], &gold[gold_idx])));
        i = stu_idx + 1;
        j = gold_idx + 1;
    }

    units.extend(stu[i..].iter().map(AnalysisUnit::Redundant));
    units.extend(gold[j..].iter().map(AnalysisUnit::Missing));
    units
}

/// Aligns the two streams under `eq` and classifies the result.
///
/// `Similar` units come back unanalyzed; run [`analyze_similar`] before
/// building a report.
pub fn align_and_classify<'a, F>(
    stu: &'a [Token],
    gold: &'a [Token],
    eq: F,
) -> Vec<AnalysisUnit<'a>>
where
    F: FnMut(&Token, &Token) -> bool,
{
    let matches = lcs(stu, gold, eq);
    classify(stu, gold, &matches)
}

/// Token equivalence used by the lexer grader: same token category.
pub fn same_kind(stu: &Token, gold: &Token) -> bool {
    stu.kind == gold.kind
}

/// Field-compares every `Similar` unit that has not been analyzed yet.
pub fn analyze_similar(units: &mut [AnalysisUnit<'_>]) {
    for unit in units.iter_mut() {
        if let AnalysisUnit::Similar(similar) = unit {
            similar.analyze();
        }
    }
}
