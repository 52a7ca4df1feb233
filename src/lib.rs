//! # ycc-grader
//!
//! A partial-credit autograder for compiler course assignments. A submitted
//! compiler is run over a directory of test programs; what it emits (token
//! streams, name-binding and control-structure facts, syntax trees, program
//! output) is compared with gold records and turned into graded reports.
//!
//! The comparison core lives in [`grade`] and is pure: it aligns token
//! streams with a longest-common-subsequence, classifies every token as
//! missing, redundant or matched, field-checks matched pairs, matches
//! unordered facts and computes proportional grades. [`harness`] does the
//! process and file plumbing around it.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Runtime configuration read from the environment
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// Typed errors raised at the record and process boundary
pub mod error;
/// The comparison and scoring core
pub mod grade;
/// Running submissions and grading what they write
pub mod harness;
/// Spawning subprocesses with captured output and deadlines
pub mod process;
/// Loading record files into core types
pub mod records;
/// Tokens and facts compared by the graders
pub mod types;

pub use error::GradeError;
pub use grade::{
    AnalysisUnit, MatchPolicy, Report, UnitStatus, align_and_classify, lcs, match_facts,
};
pub use types::{ControlFact, ControlKind, NameFact, Token};
