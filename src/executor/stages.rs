//! The four stages of query execution.
//!
//! Each stage reads a table and returns a new one. [`super::QueryExecutor`]
//! always runs them as filter → group → sort → top-N; they are public so
//! that callers (and tests) can inspect intermediate results.

use std::cmp::Ordering;

use tracing::warn;

use super::{ExecuteError, ExecuteResult};
use crate::condition::{Condition, Operator};
use crate::data::{Table, Value, ValueKind};
use crate::diagnostic::{Clause, Diagnostic};
use crate::query::TopN;

/// A condition bound to a column position and coerced to the column kind.
enum Predicate {
    Numeric {
        index: usize,
        operator: Operator,
        literal: f64,
    },
    Textual {
        index: usize,
        operator: Operator,
        literal: String,
    },
}

impl Predicate {
    /// Cells that cannot be read as the column kind never match.
    fn matches(&self, row: &[Value]) -> bool {
        match self {
            Predicate::Numeric {
                index,
                operator,
                literal,
            } => row[*index]
                .as_number()
                .and_then(|n| n.partial_cmp(literal))
                .is_some_and(|ord| operator.holds(ord)),
            Predicate::Textual {
                index,
                operator,
                literal,
            } => row[*index]
                .as_text()
                .is_some_and(|s| operator.holds(s.to_lowercase().cmp(literal))),
        }
    }
}

/// Keep rows satisfying every condition.
///
/// Textual columns compare case-insensitively. For numeric columns the
/// literal must read as a number; if it does not, the condition is dropped
/// and a diagnostic is recorded.
pub fn filter(
    table: &Table,
    conditions: &[Condition],
    diagnostics: &mut Vec<Diagnostic>,
) -> ExecuteResult<Table> {
    let mut predicates = Vec::with_capacity(conditions.len());

    for condition in conditions {
        let index = table
            .column_index(&condition.column)
            .ok_or_else(|| ExecuteError::UnknownColumn(condition.column.clone()))?;

        let predicate = match table.column_kind(index) {
            ValueKind::Textual => Predicate::Textual {
                index,
                operator: condition.operator,
                literal: condition.value.as_text(),
            },
            ValueKind::Numeric => match condition.value.as_number() {
                Some(literal) => Predicate::Numeric {
                    index,
                    operator: condition.operator,
                    literal,
                },
                None => {
                    warn!(%condition, "dropping condition: value is not numeric");
                    diagnostics.push(Diagnostic::warning(
                        Clause::Condition,
                        format!(
                            "dropped '{}': column '{}' is numeric but {} is not a number",
                            condition, condition.column, condition.value
                        ),
                    ));
                    continue;
                }
            },
        };
        predicates.push(predicate);
    }

    let rows = table
        .rows()
        .iter()
        .filter(|row| predicates.iter().all(|p| p.matches(row)))
        .cloned()
        .collect();
    Ok(table.with_rows(rows))
}

/// Collapse rows sharing a `key` value into one row each.
///
/// The output has the key column followed by the mean of every numeric
/// column. Other textual columns are dropped. Groups come out in ascending
/// key order and rows with a null key are discarded. Missing values are
/// left out of a mean; a mean over no values is null.
pub fn group(table: &Table, key: &str) -> ExecuteResult<Table> {
    let key_index = table
        .column_index(key)
        .ok_or_else(|| ExecuteError::UnknownColumn(key.to_string()))?;
    let key_kind = table.column_kind(key_index);

    let measures: Vec<usize> = (0..table.columns().len())
        .filter(|&i| i != key_index && table.column_kind(i) == ValueKind::Numeric)
        .collect();

    let rows = table.rows();
    let mut order: Vec<usize> = (0..rows.len())
        .filter(|&i| !rows[i][key_index].is_null())
        .collect();
    order.sort_by(|&a, &b| ascending(&rows[a][key_index], &rows[b][key_index], key_kind));

    let mut grouped = Vec::new();
    let mut start = 0;
    while start < order.len() {
        let key_value = &rows[order[start]][key_index];
        let end = order[start..]
            .iter()
            .position(|&i| ascending(&rows[i][key_index], key_value, key_kind) != Ordering::Equal)
            .map_or(order.len(), |offset| start + offset);

        let members = &order[start..end];
        let mut row = Vec::with_capacity(measures.len() + 1);
        row.push(key_value.clone());
        for &m in &measures {
            row.push(mean(members.iter().filter_map(|&i| rows[i][m].as_number())));
        }
        grouped.push(row);
        start = end;
    }

    let mut columns = vec![key.to_string()];
    columns.extend(measures.iter().map(|&i| table.columns()[i].clone()));
    let mut kinds = vec![key_kind];
    kinds.extend(measures.iter().map(|_| ValueKind::Numeric));

    Ok(Table::with_kinds(columns, grouped, kinds))
}

/// Stable ascending sort by `column`, nulls last.
///
/// If the column is not in the table (for example because grouping dropped
/// it) the table is returned unchanged and a diagnostic is recorded.
pub fn sort(table: &Table, column: &str, diagnostics: &mut Vec<Diagnostic>) -> Table {
    let Some(index) = table.column_index(column) else {
        diagnostics.push(missing_after_grouping(Clause::OrderBy, column));
        return table.clone();
    };
    let kind = table.column_kind(index);

    let mut rows = table.rows().to_vec();
    rows.sort_by(|a, b| ascending(&a[index], &b[index], kind));
    table.with_rows(rows)
}

/// Stable descending sort by the top-N column, then keep the first `count`
/// rows. Nulls rank last.
pub fn top_n(table: &Table, top: &TopN, diagnostics: &mut Vec<Diagnostic>) -> Table {
    let Some(index) = table.column_index(&top.column) else {
        diagnostics.push(missing_after_grouping(Clause::TopN, &top.column));
        return table.clone();
    };
    let kind = table.column_kind(index);

    let mut rows = table.rows().to_vec();
    rows.sort_by(|a, b| descending(&a[index], &b[index], kind));
    rows.truncate(top.count);
    table.with_rows(rows)
}

fn missing_after_grouping(clause: Clause, column: &str) -> Diagnostic {
    warn!(%clause, column, "column not present after grouping, stage skipped");
    Diagnostic::warning(
        clause,
        format!("column '{}' is not in the grouped result; skipped", column),
    )
}

fn mean(values: impl Iterator<Item = f64>) -> Value {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        Value::Null
    } else {
        Value::Number(sum / count as f64)
    }
}

fn fits(value: &Value, kind: ValueKind) -> bool {
    match kind {
        ValueKind::Numeric => value.as_number().is_some(),
        ValueKind::Textual => !value.is_null(),
    }
}

/// Values that do not fit the kind sort after all others.
fn misfits_last(a: &Value, b: &Value, kind: ValueKind) -> Ordering {
    match (fits(a, kind), fits(b, kind)) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn ascending(a: &Value, b: &Value, kind: ValueKind) -> Ordering {
    a.compare(b, kind)
        .unwrap_or_else(|| misfits_last(a, b, kind))
}

fn descending(a: &Value, b: &Value, kind: ValueKind) -> Ordering {
    a.compare(b, kind)
        .map(Ordering::reverse)
        .unwrap_or_else(|| misfits_last(a, b, kind))
}
