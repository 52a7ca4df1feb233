#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, Width, object::Rows},
};

use super::{
    classify::AnalysisUnit,
    facts::{Checked, FactMatch},
    score::{LexScoring, UnitCounts, fact_grade, lex_grade, proportional},
};
use crate::{constants::TOTAL_GRADE, types::Token};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// A struct representing a grade
pub struct Grade {
    /// The actual grade received
    pub grade:  u32,
    /// The maximum grade possible
    pub out_of: u32,
}

impl Grade {
    /// Creates a new grade -
    /// * `grade` - The actual grade received
    /// * `out_of` - The maximum grade possible
    pub fn new(grade: u32, out_of: u32) -> Self {
        Self { grade, out_of }
    }
}

impl Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.grade, self.out_of)
    }
}

#[derive(Tabled, Clone, Debug, Serialize, Deserialize)]
/// One row of the grading overview.
pub struct GradeResult {
    #[tabled(rename = "Report")]
    /// * `report`: name of the graded test case
    pub report: String,
    #[tabled(rename = "Grade")]
    /// * `grade`: grade received for the test case
    pub grade:  Grade,
    #[tabled(rename = "Reason")]
    /// * `reason`: one-line explanation of the grade
    pub reason: String,
}

/// Renders an optional token for a detail cell.
fn token_cell(token: Option<&Token>) -> String {
    token.map(ToString::to_string).unwrap_or_default()
}

#[derive(Tabled, Clone, Debug, Serialize, Deserialize)]
/// A rendered analysis unit.
pub struct UnitRow {
    /// Status of the unit.
    #[tabled(rename = "Status")]
    pub status:   String,
    /// The submission's token, if any.
    #[tabled(rename = "Student")]
    pub student:  String,
    /// The gold token, if any.
    #[tabled(rename = "Expected")]
    pub expected: String,
    /// Field mismatch messages, one per line.
    #[tabled(rename = "Messages")]
    pub messages: String,
}

impl From<&AnalysisUnit<'_>> for UnitRow {
    fn from(unit: &AnalysisUnit<'_>) -> Self {
        UnitRow {
            status:   unit.status().to_string(),
            student:  token_cell(unit.stu()),
            expected: token_cell(unit.gold()),
            messages: unit
                .messages()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Report for one lexer test case.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LexReport {
    /// Name of the gold record graded against.
    name:        String,
    /// Length of the submission's token stream.
    stu_total:   usize,
    /// Length of the gold token stream.
    gold_total:  usize,
    /// Per-status unit counts.
    counts:      UnitCounts,
    /// Scoring policy the grade was computed with.
    scoring:     LexScoring,
    /// Computed grade.
    grade:       u32,
    /// Maximum grade.
    total_grade: u32,
    /// Every unit, in stream order.
    units:       Vec<UnitRow>,
}

impl LexReport {
    /// Snapshots analyzed units into a report and computes the grade.
    pub fn new(
        name: impl Into<String>,
        stu: &[Token],
        gold: &[Token],
        units: &[AnalysisUnit<'_>],
        scoring: LexScoring,
    ) -> Self {
        let counts = UnitCounts::tally(units);
        Self {
            name: name.into(),
            stu_total: stu.len(),
            gold_total: gold.len(),
            grade: lex_grade(&counts, stu.len(), scoring, TOTAL_GRADE),
            counts,
            scoring,
            total_grade: TOTAL_GRADE,
            units: units.iter().map(UnitRow::from).collect(),
        }
    }

    /// Per-status unit counts.
    pub fn counts(&self) -> &UnitCounts {
        &self.counts
    }

    /// Rows for every unit, in stream order.
    pub fn units(&self) -> &[UnitRow] {
        &self.units
    }

    /// Length of the submission's token stream.
    pub fn stu_total(&self) -> usize {
        self.stu_total
    }

    /// Length of the gold token stream.
    pub fn gold_total(&self) -> usize {
        self.gold_total
    }

    /// Policy the grade was computed with.
    pub fn scoring(&self) -> LexScoring {
        self.scoring
    }

    /// One-line breakdown of the counts.
    fn reason(&self) -> String {
        let c = &self.counts;
        format!(
            "correct {}, warning {}, error {}, missing {}, redundant {}",
            c.correct_num, c.warning_num, c.error_num, c.missing_num, c.redundant_num
        )
    }

    /// Header followed by a table of every unit.
    fn detail(&self) -> String {
        let header = format!(
            "{}: {} student tokens, {} expected tokens\n{}",
            self.name,
            self.stu_total,
            self.gold_total,
            self.reason()
        );
        if self.units.is_empty() {
            return header;
        }
        format!("{header}\n{}", Table::new(&self.units).with(Style::modern()))
    }
}

#[derive(Tabled, Clone, Debug, Serialize, Deserialize)]
/// A rendered fact with its match flag.
pub struct FactRow {
    /// `student` or `expected`.
    #[tabled(rename = "Side")]
    pub side:   String,
    /// The fact.
    #[tabled(rename = "Fact")]
    pub fact:   String,
    /// `correct` or `incorrect`.
    #[tabled(rename = "Status")]
    pub status: String,
}

/// Renders flagged facts from one side of a match.
fn fact_rows<T: Display>(side: &str, facts: &[Checked<'_, T>]) -> Vec<FactRow> {
    facts
        .iter()
        .map(|checked| FactRow {
            side:   side.to_string(),
            fact:   checked.fact.to_string(),
            status: checked.status().to_string(),
        })
        .collect()
}

/// Report for unordered fact grading (name resolution, control structures).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FactReport {
    /// Report title.
    name:        String,
    /// Number of student facts.
    stu_total:   usize,
    /// Number of gold facts.
    gold_total:  usize,
    /// Gold facts that found a counterpart.
    correct_num: usize,
    /// Computed grade.
    grade:       u32,
    /// Maximum grade.
    total_grade: u32,
    /// Gold facts followed by student facts.
    facts:       Vec<FactRow>,
}

impl FactReport {
    /// Snapshots a match result into a report and computes the grade.
    pub fn new<T: Display>(name: impl Into<String>, result: &FactMatch<'_, T>) -> Self {
        let correct_num = result.matched_count();
        let mut facts = fact_rows("expected", &result.gold);
        facts.extend(fact_rows("student", &result.stu));

        Self {
            name: name.into(),
            stu_total: result.stu.len(),
            gold_total: result.gold.len(),
            correct_num,
            grade: fact_grade(correct_num, result.gold.len(), TOTAL_GRADE),
            total_grade: TOTAL_GRADE,
            facts,
        }
    }

    /// Gold facts that found a counterpart.
    pub fn correct_num(&self) -> usize {
        self.correct_num
    }

    /// Number of student facts.
    pub fn stu_total(&self) -> usize {
        self.stu_total
    }

    /// Number of gold facts.
    pub fn gold_total(&self) -> usize {
        self.gold_total
    }

    /// Rendered facts, gold first.
    pub fn facts(&self) -> &[FactRow] {
        &self.facts
    }

    /// Header followed by a table of every fact.
    fn detail(&self) -> String {
        let header = format!(
            "{}: {}/{} expected facts found among {} student facts",
            self.name, self.correct_num, self.gold_total, self.stu_total
        );
        if self.facts.is_empty() {
            return header;
        }
        format!("{header}\n{}", Table::new(&self.facts).with(Style::modern()))
    }
}

/// All-or-nothing report from the external tree diff.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreeReport {
    /// Name of the gold record graded against.
    name:        String,
    /// Unified diff; empty when the trees are identical.
    diff:        String,
    /// Maximum grade.
    total_grade: u32,
}

impl TreeReport {
    /// Wraps a diff produced by the tree-diff collaborator.
    pub fn new(name: impl Into<String>, diff: impl Into<String>) -> Self {
        Self {
            name:        name.into(),
            diff:        diff.into(),
            total_grade: TOTAL_GRADE,
        }
    }

    /// Whether the two trees were identical.
    pub fn passed(&self) -> bool {
        self.diff.is_empty()
    }

    /// The diff text.
    pub fn diff(&self) -> &str {
        &self.diff
    }
}

/// What happened to one input of an execution test case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum ExecOutcome {
    /// Output matched.
    Passed,
    /// The program ran but printed something else.
    WrongAnswer,
    /// The program wrote to stderr.
    RuntimeError(String),
    /// The program ran past the deadline.
    Timeout,
}

impl Display for ExecOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecOutcome::Passed => f.write_str("passed"),
            ExecOutcome::WrongAnswer => f.write_str("fail(wrong answer)"),
            ExecOutcome::RuntimeError(stderr) => write!(f, "fail(runtime error): {stderr}"),
            ExecOutcome::Timeout => f.write_str("fail(timeout)"),
        }
    }
}

/// Report for one execution test case with several inputs.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExecReport {
    /// Name of the test program.
    name:     String,
    /// Outcome per input, keyed by input name.
    outcomes: Vec<(String, ExecOutcome)>,
}

impl ExecReport {
    /// Creates an empty report for a test program.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:     name.into(),
            outcomes: Vec::new(),
        }
    }

    /// Records the outcome of one input.
    pub fn push(&mut self, input: impl Into<String>, outcome: ExecOutcome) {
        self.outcomes.push((input.into(), outcome));
    }

    /// Outcomes per input, in run order.
    pub fn outcomes(&self) -> &[(String, ExecOutcome)] {
        &self.outcomes
    }

    /// Number of inputs whose output matched.
    pub fn passed_num(&self) -> usize {
        self.count(|o| matches!(o, ExecOutcome::Passed))
    }

    /// Number of wrong answers.
    pub fn wrong_answer_num(&self) -> usize {
        self.count(|o| matches!(o, ExecOutcome::WrongAnswer))
    }

    /// Number of runtime errors.
    pub fn runtime_error_num(&self) -> usize {
        self.count(|o| matches!(o, ExecOutcome::RuntimeError(_)))
    }

    /// Number of timeouts.
    pub fn timeout_num(&self) -> usize {
        self.count(|o| matches!(o, ExecOutcome::Timeout))
    }

    /// Counts outcomes satisfying `pred`.
    fn count(&self, pred: impl Fn(&ExecOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Zero-grade report for a case that could not be graded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Name of the test case.
    name:        String,
    /// Maximum grade the case would have been worth.
    total_grade: u32,
    /// Diagnostic text: captured output, timeout notice or error chain.
    detail:      String,
}

impl ErrorReport {
    /// Creates an error report.
    pub fn new(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name:        name.into(),
            total_grade: TOTAL_GRADE,
            detail:      detail.into(),
        }
    }
}

/// The outcome of grading one test case.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    /// Token stream alignment.
    Lex(LexReport),
    /// Unordered fact matching.
    Facts(FactReport),
    /// External tree diff.
    Tree(TreeReport),
    /// Program execution against expected output.
    Exec(ExecReport),
    /// The case could not be graded.
    Error(ErrorReport),
}

impl Report {
    /// Name of the graded test case.
    pub fn name(&self) -> &str {
        match self {
            Report::Lex(r) => &r.name,
            Report::Facts(r) => &r.name,
            Report::Tree(r) => &r.name,
            Report::Exec(r) => &r.name,
            Report::Error(r) => &r.name,
        }
    }

    /// Maximum grade.
    pub fn total_grade(&self) -> u32 {
        match self {
            Report::Lex(r) => r.total_grade,
            Report::Facts(r) => r.total_grade,
            Report::Tree(r) => r.total_grade,
            Report::Exec(_) => TOTAL_GRADE,
            Report::Error(r) => r.total_grade,
        }
    }

    /// Awarded grade, always within `0..=total_grade()`.
    pub fn grade(&self) -> u32 {
        match self {
            Report::Lex(r) => r.grade,
            Report::Facts(r) => r.grade,
            Report::Tree(r) => {
                if r.passed() {
                    r.total_grade
                } else {
                    0
                }
            }
            Report::Exec(r) => proportional(r.passed_num(), r.outcomes.len(), TOTAL_GRADE),
            Report::Error(_) => 0,
        }
    }

    /// Awarded and maximum grade together.
    pub fn grade_struct(&self) -> Grade {
        Grade::new(self.grade(), self.total_grade())
    }

    /// Whether this case could not be graded at all.
    pub fn is_error(&self) -> bool {
        matches!(self, Report::Error(_))
    }

    /// Plain-text detail for the case.
    pub fn detail(&self) -> String {
        match self {
            Report::Lex(r) => r.detail(),
            Report::Facts(r) => r.detail(),
            Report::Tree(r) => {
                if r.passed() {
                    format!("{}: passed", r.name)
                } else {
                    format!("{}: not passed\n{}", r.name, r.diff)
                }
            }
            Report::Exec(r) => {
                let mut lines = vec![format!(
                    "{}: {}/{} passed ({} wrong answer, {} runtime error, {} timeout)",
                    r.name,
                    r.passed_num(),
                    r.outcomes.len(),
                    r.wrong_answer_num(),
                    r.runtime_error_num(),
                    r.timeout_num()
                )];
                lines.extend(r.outcomes.iter().map(|(input, o)| format!("{input} {o}")));
                lines.join("\n")
            }
            Report::Error(r) => r.detail.clone(),
        }
    }

    /// One overview row for this report.
    pub fn summary(&self) -> GradeResult {
        let reason = match self {
            Report::Lex(r) => r.reason(),
            Report::Facts(r) => format!("{}/{} facts matched", r.correct_num, r.gold_total),
            Report::Tree(r) if r.passed() => "identical".to_string(),
            Report::Tree(_) => "trees differ".to_string(),
            Report::Exec(r) => format!("{}/{} inputs passed", r.passed_num(), r.outcomes.len()),
            Report::Error(r) => r.detail.lines().next().unwrap_or("error").to_string(),
        };

        GradeResult {
            report: self.name().to_string(),
            grade: self.grade_struct(),
            reason,
        }
    }
}

/// Renders the grading overview table for a batch of reports.
pub fn overview_table(reports: &[Report]) -> String {
    let rows: Vec<GradeResult> = reports.iter().map(Report::summary).collect();
    let (grade, out_of) = rows.iter().fold((0u64, 0u64), |acc, r| {
        (acc.0 + u64::from(r.grade.grade), acc.1 + u64::from(r.grade.out_of))
    });

    Table::new(&rows)
        .with(Panel::header("Grading Overview"))
        .with(Panel::footer(format!("Total: {grade}/{out_of}")))
        .with(Modify::new(Rows::new(1..)).with(Width::wrap(48).keep_words(true)))
        .with(
            Modify::new(Rows::first())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(
            Modify::new(Rows::last())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(Style::modern())
        .to_string()
}
