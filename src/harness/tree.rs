#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use similar::{Algorithm, TextDiff};

use super::{OutputGrader, Target, case_name};
use crate::{
    grade::{Report, TreeReport},
    records::read_record,
};

/// Grades tree-shaped records all-or-nothing: any difference from the gold
/// tree scores 0.
#[derive(Debug, Clone, Copy)]
pub struct TreeDiffGrader {
    /// Stage producing the trees, `parse` or `type`.
    target: Target,
}

impl TreeDiffGrader {
    /// Creates a grader for the given stage.
    pub fn new(target: Target) -> Self {
        Self { target }
    }
}

/// Key-sorted, pretty-printed form of a record, one node per line.
fn canonical(path: &Path) -> Result<String> {
    let tree: Value = read_record(path)?;
    let mut text = serde_json::to_string_pretty(&tree)
        .with_context(|| format!("Failed to render {}", path.display()))?;
    text.push('\n');
    Ok(text)
}

/// Unified diff from `expected` to `actual`; empty when they are equal.
pub fn tree_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::new();
    }

    TextDiff::configure()
        .algorithm(Algorithm::Patience)
        .diff_lines(expected, actual)
        .unified_diff()
        .context_radius(3)
        .header("expected", "student")
        .to_string()
}

impl OutputGrader for TreeDiffGrader {
    fn target(&self) -> Target {
        self.target
    }

    fn grade_single(&self, stu_out: &Path, gold_out: &Path) -> Result<Report> {
        let stu = canonical(stu_out).context("Failed to load the submission's tree")?;
        let gold = canonical(gold_out).context("Failed to load the expected tree")?;

        Ok(Report::Tree(TreeReport::new(case_name(gold_out), tree_diff(&gold, &stu))))
    }
}
