// tests/parser/condition_test.rs
use vizor::alias::AliasIndex;
use vizor::condition::{Condition, ConditionValue, Operator};
use vizor::diagnostic::Clause;
use vizor::parser::parse;

fn index() -> AliasIndex {
    AliasIndex::build(&[
        "age",
        "region",
        "gender",
        "math_score",
        "reading_score",
        "temperature",
        "price",
    ])
}

fn num(n: f64) -> ConditionValue {
    ConditionValue::Number(n)
}

fn text(s: &str) -> ConditionValue {
    ConditionValue::Text(s.to_string())
}

#[test]
fn test_paired_conditions_are_not_duplicated() {
    let outcome = parse("age above 50 and region equals east", &index());

    assert_eq!(
        outcome.query.conditions,
        vec![
            Condition::new("age", Operator::Greater, num(50.0)),
            Condition::new("region", Operator::Equal, text("east")),
        ]
    );
}

#[test]
fn test_synonyms_normalize_to_canonical_operators() {
    let cases = [
        ("age greater than 20", Operator::Greater),
        ("age more than 20", Operator::Greater),
        ("age older than 20", Operator::Greater),
        ("age less than 20", Operator::Less),
        ("age younger than 20", Operator::Less),
        ("age below 20", Operator::Less),
        ("age exactly 20", Operator::Equal),
        ("age equal to 20", Operator::Equal),
        ("age = 20", Operator::Equal),
        ("age >= 20", Operator::GreaterEqual),
        ("age<=20", Operator::LessEqual),
    ];

    for (request, expected) in cases {
        let outcome = parse(request, &index());
        assert_eq!(
            outcome.query.conditions,
            vec![Condition::new("age", expected, num(20.0))],
            "request: {}",
            request
        );
    }
}

#[test]
fn test_quoted_and_signed_values() {
    let outcome = parse("table where gender equal to 'female'", &index());
    assert_eq!(
        outcome.query.conditions,
        vec![Condition::new("gender", Operator::Equal, text("female"))]
    );

    let outcome = parse("line chart of temperature below -5", &index());
    assert_eq!(
        outcome.query.conditions,
        vec![Condition::new("temperature", Operator::Less, num(-5.0))]
    );

    let outcome = parse("scatter of price above 9.99", &index());
    assert_eq!(
        outcome.query.conditions,
        vec![Condition::new("price", Operator::Greater, num(9.99))]
    );
}

#[test]
fn test_condition_columns_resolve_through_aliases() {
    let outcome = parse("histogram where MathScore above 40", &index());
    assert_eq!(
        outcome.query.conditions,
        vec![Condition::new("math_score", Operator::Greater, num(40.0))]
    );
}

#[test]
fn test_conditions_keep_text_order() {
    let outcome = parse(
        "reading_score >= 75 and math_score below 60 and region equals west",
        &index(),
    );
    let columns: Vec<&str> = outcome
        .query
        .conditions
        .iter()
        .map(|c| c.column.as_str())
        .collect();

    assert_eq!(columns, vec!["reading_score", "math_score", "region"]);
}

#[test]
fn test_repeated_condition_kept_once() {
    let outcome = parse("age above 50, age above 50", &index());
    assert_eq!(outcome.query.conditions.len(), 1);
}

#[test]
fn test_unknown_condition_column_is_reported() {
    let outcome = parse("pie chart of region where salary above 100", &index());

    assert!(outcome.query.conditions.is_empty());
    let diag = outcome
        .diagnostics
        .iter()
        .find(|d| d.clause == Clause::Condition)
        .unwrap();
    assert!(diag.message.contains("salary"));
}

#[test]
fn test_display() {
    let condition = Condition::new("age", Operator::GreaterEqual, num(50.0));
    assert_eq!(condition.to_string(), "age >= 50");

    let condition = Condition::new("region", Operator::Equal, text("east"));
    assert_eq!(condition.to_string(), "region = 'east'");
}
