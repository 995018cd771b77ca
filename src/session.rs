//! Request handling over one dataset snapshot.
//!
//! A [`Session`] owns an immutable dataset and the alias index built from
//! its schema. Requests borrow both; nothing is mutated after construction,
//! so a session can be shared between threads behind an `Arc`.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::alias::AliasIndex;
use crate::data::{ResultTable, Table};
use crate::diagnostic::{Clause, Diagnostic};
use crate::executor::{ExecuteResult, QueryExecutor};
use crate::parser::RequestParser;
use crate::query::{ChartKind, StructuredQuery};

/// What an external renderer needs to draw one chart.
#[derive(Debug, Clone, Serialize)]
pub struct RenderRequest {
    pub chart_type: ChartKind,
    pub table: ResultTable,
    pub columns: Vec<String>,
    pub group_by: Option<String>,
    pub order_by: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A dataset snapshot with its alias index.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Arc<Table>,
    index: AliasIndex,
    parser: RequestParser,
    executor: QueryExecutor,
}

impl Session {
    /// Build the alias index for `dataset`.
    pub fn new(dataset: Arc<Table>) -> Self {
        let index = AliasIndex::build(dataset.columns());
        info!(
            columns = dataset.columns().len(),
            rows = dataset.len(),
            aliases = index.len(),
            "session ready"
        );
        Self {
            dataset,
            index,
            parser: RequestParser::new(),
            executor: QueryExecutor::new(),
        }
    }

    pub fn with_parser(mut self, parser: RequestParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn dataset(&self) -> &Table {
        &self.dataset
    }

    pub fn index(&self) -> &AliasIndex {
        &self.index
    }

    /// Parse `text` without executing it.
    pub fn parse(&self, text: &str) -> (StructuredQuery, Vec<Diagnostic>) {
        let outcome = self.parser.parse(text, &self.index);
        (outcome.query, outcome.diagnostics)
    }

    /// Parse and execute one request.
    ///
    /// Diagnostics from parsing and execution are concatenated in that
    /// order. Only an unsupported chart type fails.
    pub fn handle(&self, text: &str) -> ExecuteResult<RenderRequest> {
        info!(request = text, "handling request");
        let (query, mut diagnostics) = self.parse(text);

        let execution = self.executor.execute(&self.dataset, &query)?;
        diagnostics.extend(execution.diagnostics);

        let needed = execution.chart.min_columns();
        if query.columns.len() < needed {
            diagnostics.push(Diagnostic::warning(
                Clause::Columns,
                format!(
                    "{} chart needs at least {} columns, got {}",
                    execution.chart.as_str(),
                    needed,
                    query.columns.len()
                ),
            ));
        }

        info!(
            chart = execution.chart.as_str(),
            rows = execution.table.len(),
            diagnostics = diagnostics.len(),
            "request handled"
        );

        Ok(RenderRequest {
            chart_type: execution.chart,
            table: execution.table,
            columns: query.columns,
            group_by: query.group_by,
            order_by: query.order_by,
            diagnostics,
        })
    }
}
