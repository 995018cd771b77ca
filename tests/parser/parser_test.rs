// tests/parser/parser_test.rs
use vizor::alias::AliasIndex;
use vizor::condition::{Condition, ConditionValue, Operator};
use vizor::config::ParserSettings;
use vizor::diagnostic::{Clause, Severity};
use vizor::parser::{parse, RequestParser};
use vizor::query::{StructuredQuery, TopN};

fn students() -> AliasIndex {
    AliasIndex::build(&[
        "gender",
        "race/ethnicity",
        "parental level of education",
        "lunch",
        "test preparation course",
        "math score",
        "reading score",
        "writing score",
    ])
}

#[test]
fn test_pie_chart_on_device_type() {
    let index = AliasIndex::build(&["deviceType", "appName", "bytes"]);
    let outcome = parse("pie chart on devicetype", &index);

    assert_eq!(
        outcome.query,
        StructuredQuery::default()
            .with_chart_type("pie")
            .with_columns(["deviceType"])
    );
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_full_request() {
    let outcome = parse(
        "bar chart of gender and lunch where math score above 50 group by gender order by reading score top 3 based on writing score",
        &students(),
    );
    let query = outcome.query;

    assert_eq!(query.chart_type, "bar");
    assert_eq!(
        query.columns,
        vec!["gender", "lunch", "math score", "reading score", "writing score"]
    );
    // "math score" is two words; the single-token condition pattern only
    // sees "score above 50", which names no column.
    assert!(query.conditions.is_empty());
    assert_eq!(query.group_by.as_deref(), Some("gender"));
    assert_eq!(query.order_by.as_deref(), Some("reading score"));
    assert_eq!(
        query.top_n,
        Some(TopN {
            count: 3,
            column: "writing score".to_string()
        })
    );
}

#[test]
fn test_single_token_condition_column() {
    let index = AliasIndex::build(&["gender", "math_score"]);
    let outcome = parse("box plot of math_score where mathscore above 50", &index);

    assert_eq!(outcome.query.chart_type, "box");
    assert_eq!(
        outcome.query.conditions,
        vec![Condition::new(
            "math_score",
            Operator::Greater,
            ConditionValue::Number(50.0)
        )]
    );
}

#[test]
fn test_parse_is_idempotent() {
    let index = students();
    let text = "Violin chart of Math Score group by race/ethnicity top 10 based on math score";

    let first = parse(text, &index);
    let second = parse(text, &index);

    assert_eq!(first.query, second.query);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn test_unrecognized_clauses_leave_fields_unset() {
    let outcome = parse(
        "heatmap of lunch group by zodiac order by shoe size top many based on lunch",
        &students(),
    );
    let query = &outcome.query;

    assert_eq!(query.chart_type, "heatmap");
    assert_eq!(query.columns, vec!["lunch"]);
    assert_eq!(query.group_by, None);
    assert_eq!(query.order_by, None);
    assert_eq!(query.top_n, None);

    let clauses: Vec<Clause> = outcome.diagnostics.iter().map(|d| d.clause).collect();
    assert_eq!(clauses, vec![Clause::GroupBy, Clause::OrderBy, Clause::TopN]);
    assert!(outcome
        .diagnostics
        .iter()
        .all(|d| d.severity == Severity::Warning));
}

#[test]
fn test_missing_chart_type_uses_configured_default() {
    let parser = RequestParser::with_settings(&ParserSettings {
        default_chart_type: "bar".to_string(),
    });
    let outcome = parser.parse("lunch by gender", &students());

    assert_eq!(outcome.query.chart_type, "bar");
    assert_eq!(outcome.query.columns, vec!["lunch", "gender"]);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].clause, Clause::ChartType);
    assert_eq!(outcome.diagnostics[0].severity, Severity::Info);
}

#[test]
fn test_empty_request() {
    let outcome = parse("", &students());

    assert_eq!(outcome.query, StructuredQuery::default());
    let clauses: Vec<Clause> = outcome.diagnostics.iter().map(|d| d.clause).collect();
    assert_eq!(clauses, vec![Clause::ChartType, Clause::Columns]);
}

#[test]
fn test_outcome_serializes_to_json() {
    let index = AliasIndex::build(&["age", "region"]);
    let outcome = parse("pie chart of region where age above 50", &index);
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["query"]["chart_type"], "pie");
    assert_eq!(json["query"]["columns"], serde_json::json!(["region", "age"]));
    assert_eq!(
        json["query"]["conditions"][0],
        serde_json::json!({"column": "age", "operator": "GREATER", "value": 50.0})
    );
    assert_eq!(json["query"]["top_n"], serde_json::Value::Null);
}
