#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use serde::{Deserialize, Serialize};

use super::classify::{AnalysisUnit, UnitStatus};

/// Denominator used when grading a token stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LexScoring {
    /// `correct / student tokens`. Missing gold tokens cost nothing unless
    /// they displace a student token.
    #[default]
    PerStudentToken,
    /// `correct / units`, where units are the student tokens plus the missing
    /// gold tokens. Only a perfect stream earns full marks.
    PerUnit,
}

impl std::str::FromStr for LexScoring {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" | "per_student_token" => Ok(LexScoring::PerStudentToken),
            "unit" | "per_unit" => Ok(LexScoring::PerUnit),
            other => Err(format!("unknown lexer scoring policy `{other}`")),
        }
    }
}

/// Per-status unit counts reported next to a lexer grade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCounts {
    /// Matched pairs with no mismatch.
    pub correct_num:   usize,
    /// Matched pairs with only warning-level mismatches.
    pub warning_num:   usize,
    /// Matched pairs with an error-level mismatch.
    pub error_num:     usize,
    /// Gold tokens the submission never produced.
    pub missing_num:   usize,
    /// Submission tokens with no gold counterpart.
    pub redundant_num: usize,
    /// Matched pairs that were never field-compared.
    pub pending_num:   usize,
}

impl UnitCounts {
    /// Counts the units by status.
    pub fn tally(units: &[AnalysisUnit<'_>]) -> Self {
        let mut counts = Self::default();
        for unit in units {
            match unit.status() {
                UnitStatus::Correct => counts.correct_num += 1,
                UnitStatus::Warning => counts.warning_num += 1,
                UnitStatus::Error => counts.error_num += 1,
                UnitStatus::Missing => counts.missing_num += 1,
                UnitStatus::Redundant => counts.redundant_num += 1,
                UnitStatus::Similar => counts.pending_num += 1,
            }
        }
        counts
    }

    /// Units that carry a student token.
    pub fn student_total(&self) -> usize {
        self.correct_num + self.warning_num + self.error_num + self.redundant_num + self.pending_num
    }

    /// All units.
    pub fn unit_total(&self) -> usize {
        self.student_total() + self.missing_num
    }
}

/// `floor(total_grade × hits / out_of)`, capped at `total_grade`. An empty
/// denominator grades as 0.
pub fn proportional(hits: usize, out_of: usize, total_grade: u32) -> u32 {
    if out_of == 0 {
        return 0;
    }

    let scaled = u128::from(total_grade) * hits as u128 / out_of as u128;
    u32::try_from(scaled).map_or(total_grade, |grade| grade.min(total_grade))
}

/// Grade for a classified token stream.
///
/// `student_total` is the length of the submission's token stream; with
/// [`LexScoring::PerUnit`] the missing gold tokens are added to it.
pub fn lex_grade(
    counts: &UnitCounts,
    student_total: usize,
    policy: LexScoring,
    total_grade: u32,
) -> u32 {
    let out_of = match policy {
        LexScoring::PerStudentToken => student_total,
        LexScoring::PerUnit => student_total + counts.missing_num,
    };
    proportional(counts.correct_num, out_of, total_grade)
}

/// Grade for unordered facts: matched gold facts over all gold facts.
pub fn fact_grade(matched_gold: usize, gold_total: usize, total_grade: u32) -> u32 {
    proportional(matched_gold, gold_total, total_grade)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_denominator_grades_zero() {
        assert_eq!(proportional(0, 0, 100), 0);
        assert_eq!(fact_grade(0, 0, 100), 0);
        assert_eq!(lex_grade(&UnitCounts::default(), 0, LexScoring::PerStudentToken, 100), 0);
        assert_eq!(lex_grade(&UnitCounts::default(), 0, LexScoring::PerUnit, 100), 0);
    }

    #[test]
    fn rounds_down() {
        assert_eq!(proportional(2, 3, 100), 66);
        assert_eq!(proportional(1, 3, 100), 33);
        assert_eq!(proportional(3, 3, 100), 100);
    }

    #[test]
    fn never_exceeds_total() {
        assert_eq!(proportional(5, 3, 100), 100);
        assert_eq!(proportional(usize::MAX, 1, u32::MAX), u32::MAX);
    }

    #[test]
    fn per_unit_charges_missing_tokens() {
        let counts = UnitCounts {
            correct_num: 3,
            missing_num: 1,
            ..UnitCounts::default()
        };
        assert_eq!(lex_grade(&counts, 3, LexScoring::PerStudentToken, 100), 100);
        assert_eq!(lex_grade(&counts, 3, LexScoring::PerUnit, 100), 75);
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("unit".parse::<LexScoring>(), Ok(LexScoring::PerUnit));
        assert_eq!(" Student ".parse::<LexScoring>(), Ok(LexScoring::PerStudentToken));
        assert!("tokens".parse::<LexScoring>().is_err());
    }
}
