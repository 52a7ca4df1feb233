//! Tests for unordered fact matching and fact reports.

use ycc_grader::{
    ControlFact, ControlKind, NameFact,
    grade::{FactReport, MatchPolicy, Report, match_facts, match_facts_with},
};

fn jump(kind: ControlKind, line: u32, target: u32) -> ControlFact {
    ControlFact::new(kind, line.to_string(), target.to_string())
}

#[test]
fn all_gold_facts_found() {
    let gold = vec![
        NameFact::def("1", "int", "x"),
        NameFact::reference("3", "int", "x", "1"),
    ];
    let stu = vec![
        NameFact::reference("3", "int", "x", "1"),
        NameFact::def("1", "int", "x"),
    ];

    let result = match_facts(&stu, &gold);
    assert_eq!(result.matched, vec![true, true]);
    assert!(result.stu.iter().all(|c| c.passed));
    assert!(result.gold.iter().all(|c| c.passed));

    let report = Report::Facts(FactReport::new("name resolve: a.json", &result));
    assert_eq!(report.grade(), 100);
}

#[test]
fn partial_match_rounds_down() {
    let gold = vec![
        jump(ControlKind::Break, 4, 2),
        jump(ControlKind::Continue, 6, 2),
        jump(ControlKind::Return, 9, 1),
    ];
    let stu = vec![jump(ControlKind::Break, 4, 2), jump(ControlKind::Return, 8, 1)];

    let result = match_facts(&stu, &gold);
    assert_eq!(result.matched, vec![true, false, false]);
    assert_eq!(result.matched_count(), 1);
    assert_eq!(result.stu[1].status(), "incorrect");

    let report = Report::Facts(FactReport::new("cs", &result));
    assert_eq!(report.grade(), 33);
}

#[test]
fn return_is_not_a_continue() {
    let gold = vec![jump(ControlKind::Return, 5, 1)];
    let stu = vec![jump(ControlKind::Continue, 5, 1)];

    let result = match_facts(&stu, &gold);
    assert_eq!(result.matched, vec![false]);
}

#[test]
fn shared_policy_lets_one_fact_satisfy_duplicates() {
    let gold = vec![jump(ControlKind::Break, 3, 1), jump(ControlKind::Break, 3, 1)];
    let stu = vec![jump(ControlKind::Break, 3, 1)];

    let shared = match_facts(&stu, &gold);
    assert_eq!(shared.matched, vec![true, true]);

    let one_to_one = match_facts_with(&stu, &gold, MatchPolicy::OneToOne);
    assert_eq!(one_to_one.matched, vec![true, false]);
    assert!(one_to_one.stu[0].passed);
    assert!(!one_to_one.gold[1].passed);
}

#[test]
fn shared_policy_flags_every_equal_student_fact() {
    let gold = vec![NameFact::def("1", "int", "x")];
    let stu = vec![NameFact::def("1", "int", "x"), NameFact::def("1", "int", "x")];

    let result = match_facts(&stu, &gold);
    assert!(result.stu.iter().all(|c| c.passed));

    let result = match_facts_with(&stu, &gold, MatchPolicy::OneToOne);
    assert!(result.stu[0].passed);
    assert!(!result.stu[1].passed);
}

#[test]
fn matching_is_idempotent() {
    let gold = vec![jump(ControlKind::Break, 4, 2), jump(ControlKind::Continue, 6, 2)];
    let stu = vec![jump(ControlKind::Continue, 6, 2)];

    let first = match_facts(&stu, &gold);
    let second = match_facts(&stu, &gold);
    assert_eq!(first.matched, second.matched);
    assert_eq!(first.stu, second.stu);
    assert_eq!(first.gold, second.gold);
}

#[test]
fn no_gold_facts_grade_zero() {
    let stu = vec![jump(ControlKind::Break, 4, 2)];

    let result = match_facts(&stu, &[]);
    assert!(result.matched.is_empty());
    assert!(!result.stu[0].passed);

    let report = Report::Facts(FactReport::new("cs", &result));
    assert_eq!(report.grade(), 0);
}

#[test]
fn detail_lists_gold_before_student() {
    let gold = vec![jump(ControlKind::Break, 4, 2)];
    let stu = vec![jump(ControlKind::Break, 4, 2), jump(ControlKind::Return, 7, 1)];

    let result = match_facts(&stu, &gold);
    let report = FactReport::new("control structure analyze: b.json", &result);
    let sides: Vec<&str> = report.facts().iter().map(|f| f.side.as_str()).collect();
    assert_eq!(sides, vec!["expected", "student", "student"]);
    assert_eq!(report.facts()[0].fact, "ControlStructure(line=4, type=break, def_line=2)");
    assert_eq!(report.facts()[2].status, "incorrect");
}
