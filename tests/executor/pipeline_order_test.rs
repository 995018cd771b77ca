//! The executor runs filter → group → sort → top-N. These tests build
//! datasets where any other order gives a different answer.

use vizor::condition::{Condition, ConditionValue, Operator};
use vizor::data::{Table, Value};
use vizor::executor::{execute, stages};
use vizor::query::{StructuredQuery, TopN};

fn sales() -> Table {
    Table::from_csv_reader(
        "\
region,store,sales
east,a,100
east,b,0
west,c,60
west,d,50
"
        .as_bytes(),
    )
    .unwrap()
}

fn first_cells(table: &Table) -> Vec<Value> {
    table.rows().iter().map(|row| row[0].clone()).collect()
}

#[test]
fn test_group_before_top_n_ranks_groups() {
    let data = sales();
    let top = TopN {
        count: 1,
        column: "sales".to_string(),
    };
    let query = StructuredQuery::default()
        .with_group_by("region")
        .with_top_n(1, "sales");

    // east averages 50, west averages 55
    let pipeline = execute(&data, &query).unwrap();
    assert_eq!(
        pipeline.table.rows(),
        &[vec![Value::from("west"), Value::from(55.0)]]
    );

    // Ranking raw rows first keeps the single best store, which is in east
    let mut diags = Vec::new();
    let reordered = stages::group(&stages::top_n(&data, &top, &mut diags), "region").unwrap();
    assert_eq!(
        reordered.rows(),
        &[vec![Value::from("east"), Value::from(100.0)]]
    );

    assert_ne!(pipeline.table, reordered);
}

#[test]
fn test_filter_before_group_changes_means() {
    let data = sales();
    let condition = Condition::new("sales", Operator::Greater, ConditionValue::Number(10.0));
    let query = StructuredQuery::default()
        .with_condition(condition.clone())
        .with_group_by("region");

    let pipeline = execute(&data, &query).unwrap();
    assert_eq!(
        pipeline.table.rows(),
        &[
            vec![Value::from("east"), Value::from(100.0)],
            vec![Value::from("west"), Value::from(55.0)],
        ]
    );

    // Filtering the grouped means instead keeps east at 50
    let mut diags = Vec::new();
    let grouped = stages::group(&data, "region").unwrap();
    let reordered = stages::filter(&grouped, &[condition], &mut diags).unwrap();
    assert_eq!(
        reordered.rows(),
        &[
            vec![Value::from("east"), Value::from(50.0)],
            vec![Value::from("west"), Value::from(55.0)],
        ]
    );
}

#[test]
fn test_sort_before_top_n_breaks_ties() {
    let data = Table::from_csv_reader("name,score\nzed,5\namy,5\nbob,3\n".as_bytes()).unwrap();
    let top = TopN {
        count: 1,
        column: "score".to_string(),
    };
    let query = StructuredQuery::default()
        .with_order_by("name")
        .with_top_n(1, "score");

    // Sorting by name first makes "amy" the first of the tied rows
    let pipeline = execute(&data, &query).unwrap();
    assert_eq!(first_cells(&pipeline.table), vec![Value::from("amy")]);

    // Taking the top row first keeps "zed", which a later sort cannot undo
    let mut diags = Vec::new();
    let reordered = stages::sort(&stages::top_n(&data, &top, &mut diags), "name", &mut diags);
    assert_eq!(first_cells(&reordered), vec![Value::from("zed")]);
}

#[test]
fn test_top_n_is_last() {
    let data = sales();
    let query = StructuredQuery::default()
        .with_order_by("sales")
        .with_top_n(2, "sales");

    // The ascending sort does not survive: top-N re-ranks descending
    let pipeline = execute(&data, &query).unwrap();
    let sales: Vec<Value> = pipeline.table.rows().iter().map(|r| r[2].clone()).collect();
    assert_eq!(sales, vec![Value::from(100.0), Value::from(60.0)]);
}
