//! Query execution against a dataset snapshot.
//!
//! ```text
//! dataset → filter → group → sort → top-N → ResultTable
//! ```
//!
//! The order is fixed. Grouping before top-N ranks groups rather than raw
//! rows, and sorting before top-N decides which of several tied rows
//! survive, so reordering the stages changes the result.
//!
//! The dataset is only read. Every execution builds a new table, so any
//! number of executions may share one snapshot without locking.

pub mod stages;

use tracing::debug;

use crate::data::{ResultTable, Table};
use crate::diagnostic::Diagnostic;
use crate::query::{ChartKind, StructuredQuery};

/// Errors that stop execution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecuteError {
    /// The chart type is not one the executor knows how to prepare data for.
    #[error("Unsupported chart type: {0}")]
    UnsupportedChart(String),

    /// The query names a column the dataset does not have. Queries parsed
    /// against the dataset's own alias index never trigger this.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}

pub type ExecuteResult<T> = Result<T, ExecuteError>;

/// Result of executing a query.
#[derive(Debug, Clone)]
pub struct Execution {
    pub chart: ChartKind,
    pub table: ResultTable,
    /// Conditions that were dropped and stages that were skipped.
    pub diagnostics: Vec<Diagnostic>,
}

/// Applies structured queries to tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryExecutor;

impl QueryExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Execute `query` against `dataset`.
    ///
    /// An empty result is a success. An unrecognized chart type is reported
    /// as [`ExecuteError::UnsupportedChart`] before any data is touched.
    pub fn execute(&self, dataset: &Table, query: &StructuredQuery) -> ExecuteResult<Execution> {
        let chart = query
            .chart_kind()
            .ok_or_else(|| ExecuteError::UnsupportedChart(query.chart_type.clone()))?;
        check_columns(dataset, query)?;

        let mut diagnostics = Vec::new();

        let mut table = stages::filter(dataset, &query.conditions, &mut diagnostics)?;
        debug!(rows = table.len(), "filtered");

        if let Some(key) = &query.group_by {
            table = stages::group(&table, key)?;
            debug!(groups = table.len(), key = %key, "grouped");
        }

        if let Some(column) = &query.order_by {
            table = stages::sort(&table, column, &mut diagnostics);
            debug!(column = %column, "sorted");
        }

        if let Some(top) = &query.top_n {
            table = stages::top_n(&table, top, &mut diagnostics);
            debug!(rows = table.len(), count = top.count, "applied top-n");
        }

        Ok(Execution {
            chart,
            table,
            diagnostics,
        })
    }
}

/// Execute with a default executor.
pub fn execute(dataset: &Table, query: &StructuredQuery) -> ExecuteResult<Execution> {
    QueryExecutor::new().execute(dataset, query)
}

/// Every column the query names must exist in the dataset.
fn check_columns(dataset: &Table, query: &StructuredQuery) -> ExecuteResult<()> {
    let referenced = query
        .columns
        .iter()
        .chain(query.conditions.iter().map(|c| &c.column))
        .chain(query.group_by.iter())
        .chain(query.order_by.iter())
        .chain(query.top_n.iter().map(|t| &t.column));

    for column in referenced {
        if dataset.column_index(column).is_none() {
            return Err(ExecuteError::UnknownColumn(column.clone()));
        }
    }
    Ok(())
}
