#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The matching and scoring engine.
//!
//! Pure, synchronous computation over already-parsed records: nothing in this
//! module touches the filesystem or spawns processes.

/// Stream diff classification of aligned token streams.
pub mod classify;
/// Unordered fact matching.
pub mod facts;
/// Secondary attribute comparison for matched tokens.
pub mod fields;
/// Longest common subsequence alignment.
pub mod lcs;
/// Report types and overview rendering.
pub mod results;
/// Grade computation.
pub mod score;

pub use classify::{
    AnalysisUnit, Similar, UnitStatus, align_and_classify, analyze_similar, classify, same_kind,
};
pub use facts::{Checked, FactMatch, MatchPolicy, match_facts, match_facts_with};
pub use fields::{FieldOutcome, Message, Severity, compare_fields};
pub use lcs::lcs;
pub use results::{
    ErrorReport, ExecOutcome, ExecReport, FactReport, FactRow, Grade, GradeResult, LexReport,
    Report, TreeReport, UnitRow, overview_table,
};
pub use score::{LexScoring, UnitCounts, fact_grade, lex_grade, proportional};
