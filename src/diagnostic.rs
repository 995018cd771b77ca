//! Non-fatal notes collected while parsing and executing a request.
//!
//! Neither the parser nor the executor fails on input it does not
//! understand. Instead they leave the affected field unset (or skip the
//! affected stage) and record a [`Diagnostic`] so callers can report which
//! clauses of a request were not understood.

use std::fmt;

use serde::Serialize;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Part of the request was dropped.
    Warning,
    /// A default was applied.
    Info,
}

/// The request clause a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    ChartType,
    Columns,
    Condition,
    GroupBy,
    OrderBy,
    TopN,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Clause::ChartType => "chart type",
            Clause::Columns => "columns",
            Clause::Condition => "condition",
            Clause::GroupBy => "group by",
            Clause::OrderBy => "order by",
            Clause::TopN => "top n",
        };
        f.write_str(name)
    }
}

/// A diagnostic message attached to a clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub clause: Clause,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    /// Create a new warning diagnostic.
    pub fn warning(clause: Clause, message: impl Into<String>) -> Self {
        Self {
            clause,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Create a new informational diagnostic.
    pub fn info(clause: Clause, message: impl Into<String>) -> Self {
        Self {
            clause,
            severity: Severity::Info,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        write!(f, "{} [{}]: {}", level, self.clause, self.message)
    }
}

/// Returns true if any diagnostic in the slice is a warning.
pub fn has_warnings(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Warning)
}
