//! Randomized checks of alignment coverage, length conservation and grade
//! bounds.

use proptest::prelude::*;
use ycc_grader::{
    Token,
    constants::TOTAL_GRADE,
    grade::{
        AnalysisUnit, LexScoring, UnitCounts, UnitStatus, align_and_classify, analyze_similar,
        fact_grade, lex_grade, proportional, same_kind,
    },
};

const KINDS: [&str; 4] = ["INT", "ID", "ASSIGN", "SEMI"];

/// Builds a stream from `(kind index, column)` pairs; the column lets equal
/// kinds disagree on position.
fn stream(spec: &[(usize, u32)]) -> Vec<Token> {
    spec.iter()
        .map(|&(kind, column)| {
            Token::builder()
                .kind(KINDS[kind])
                .value(KINDS[kind])
                .source(KINDS[kind])
                .line("1")
                .column(column.to_string())
                .start(column.to_string())
                .stop(column.to_string())
                .build()
        })
        .collect()
}

fn position(tokens: &[Token], token: &Token) -> usize {
    tokens
        .iter()
        .position(|t| std::ptr::eq(t, token))
        .expect("unit token comes from its stream")
}

fn token_spec() -> impl Strategy<Value = Vec<(usize, u32)>> {
    prop::collection::vec((0..KINDS.len(), 0u32..3), 0..24)
}

proptest! {
    #[test]
    fn every_index_lands_in_exactly_one_unit(stu_spec in token_spec(), gold_spec in token_spec()) {
        let (stu, gold) = (stream(&stu_spec), stream(&gold_spec));
        let mut units = align_and_classify(&stu, &gold, same_kind);
        analyze_similar(&mut units);

        let mut stu_seen = vec![0usize; stu.len()];
        let mut gold_seen = vec![0usize; gold.len()];
        let mut pairs = Vec::new();
        for unit in &units {
            let i = unit.stu().map(|t| position(&stu, t));
            let j = unit.gold().map(|t| position(&gold, t));
            if let Some(i) = i {
                stu_seen[i] += 1;
            }
            if let Some(j) = j {
                gold_seen[j] += 1;
            }
            if let (AnalysisUnit::Similar(_), Some(i), Some(j)) = (unit, i, j) {
                prop_assert_eq!(&stu[i].kind, &gold[j].kind);
                pairs.push((i, j));
            }
        }

        prop_assert!(stu_seen.iter().all(|&n| n == 1));
        prop_assert!(gold_seen.iter().all(|&n| n == 1));
        prop_assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 < w[1].1));
    }

    #[test]
    fn unit_counts_conserve_stream_lengths(stu_spec in token_spec(), gold_spec in token_spec()) {
        let (stu, gold) = (stream(&stu_spec), stream(&gold_spec));
        let mut units = align_and_classify(&stu, &gold, same_kind);
        analyze_similar(&mut units);

        let counts = UnitCounts::tally(&units);
        let similar = counts.correct_num + counts.warning_num + counts.error_num;
        prop_assert_eq!(counts.pending_num, 0);
        prop_assert_eq!(similar + counts.redundant_num, stu.len());
        prop_assert_eq!(similar + counts.missing_num, gold.len());
        prop_assert!(units.iter().all(|u| u.status() != UnitStatus::Similar));
    }

    #[test]
    fn lexer_grades_stay_in_bounds(stu_spec in token_spec(), gold_spec in token_spec()) {
        let (stu, gold) = (stream(&stu_spec), stream(&gold_spec));
        let mut units = align_and_classify(&stu, &gold, same_kind);
        analyze_similar(&mut units);
        let counts = UnitCounts::tally(&units);

        for policy in [LexScoring::PerStudentToken, LexScoring::PerUnit] {
            prop_assert!(lex_grade(&counts, stu.len(), policy, TOTAL_GRADE) <= TOTAL_GRADE);
        }

        let perfect = counts.correct_num == units.len() && !units.is_empty();
        let full = lex_grade(&counts, stu.len(), LexScoring::PerUnit, TOTAL_GRADE) == TOTAL_GRADE;
        prop_assert_eq!(full, perfect);
    }

    #[test]
    fn proportional_grades_stay_in_bounds(
        (hits, out_of) in (0usize..500).prop_flat_map(|out_of| (0..=out_of, Just(out_of))),
        total in 1u32..=1000,
    ) {
        let grade = proportional(hits, out_of, total);
        prop_assert!(grade <= total);
        prop_assert_eq!(grade == total, out_of > 0 && hits == out_of);
        prop_assert_eq!(fact_grade(hits, out_of, total), grade);
    }
}
