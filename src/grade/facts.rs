#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use serde::{Deserialize, Serialize};

/// How student facts may be reused across gold facts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// A student fact may satisfy any number of gold facts.
    #[default]
    Shared,
    /// A student fact satisfies at most one gold fact, the first it equals.
    OneToOne,
}

/// A fact together with whether an equal counterpart was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checked<'a, T> {
    /// The fact itself.
    pub fact:   &'a T,
    /// Set once an equal counterpart is found, never cleared.
    pub passed: bool,
}

impl<'a, T> Checked<'a, T> {
    /// Wraps a fact with its flag cleared.
    fn new(fact: &'a T) -> Self {
        Self {
            fact,
            passed: false,
        }
    }

    /// `"correct"` or `"incorrect"`, for reports.
    pub fn status(&self) -> &'static str {
        if self.passed { "correct" } else { "incorrect" }
    }
}

/// Result of matching a student fact list against a gold fact list.
#[derive(Debug, Clone)]
pub struct FactMatch<'a, T> {
    /// One entry per gold fact, in gold order.
    pub matched: Vec<bool>,
    /// Student facts with their flags.
    pub stu:     Vec<Checked<'a, T>>,
    /// Gold facts with their flags.
    pub gold:    Vec<Checked<'a, T>>,
}

impl<T> FactMatch<'_, T> {
    /// Number of gold facts that found a counterpart.
    pub fn matched_count(&self) -> usize {
        self.matched.iter().filter(|&&m| m).count()
    }
}

/// Matches unordered facts by full equality with [`MatchPolicy::Shared`].
///
/// Each gold fact is looked up among all student facts; every equal student
/// fact is flagged. Matching is pure, so repeated calls agree.
pub fn match_facts<'a, T: PartialEq>(stu: &'a [T], gold: &'a [T]) -> FactMatch<'a, T> {
    match_facts_with(stu, gold, MatchPolicy::Shared)
}

/// Matches unordered facts by full equality under `policy`.
pub fn match_facts_with<'a, T: PartialEq>(
    stu: &'a [T],
    gold: &'a [T],
    policy: MatchPolicy,
) -> FactMatch<'a, T> {
    let mut stu: Vec<_> = stu.iter().map(Checked::new).collect();
    let mut gold: Vec<_> = gold.iter().map(Checked::new).collect();
    let mut consumed = vec![false; stu.len()];
    let mut matched = Vec::with_capacity(gold.len());

    for gold_fact in gold.iter_mut() {
        let mut passed = false;
        for (idx, stu_fact) in stu.iter_mut().enumerate() {
            if consumed[idx] || stu_fact.fact != gold_fact.fact {
                continue;
            }

            passed = true;
            stu_fact.passed = true;
            if policy == MatchPolicy::OneToOne {
                consumed[idx] = true;
                break;
            }
        }

        gold_fact.passed |= passed;
        matched.push(passed);
    }

    FactMatch { matched, stu, gold }
}
