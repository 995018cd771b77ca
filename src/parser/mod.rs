//! Free-text request parser.
//!
//! Turns requests such as
//!
//! ```text
//! bar chart of gender and country where age above 50 group by country top 5 based on income
//! ```
//!
//! into a [`StructuredQuery`]. Each clause is extracted independently and
//! best-effort: a clause that cannot be understood is left unset and a
//! [`Diagnostic`] explains why. Parsing never fails.
//!
//! # Example
//!
//! ```
//! use vizor::alias::AliasIndex;
//! use vizor::parser::RequestParser;
//!
//! let index = AliasIndex::build(&["deviceType", "age"]);
//! let outcome = RequestParser::new().parse("pie chart on devicetype", &index);
//!
//! assert_eq!(outcome.query.chart_type, "pie");
//! assert_eq!(outcome.query.columns, vec!["deviceType".to_string()]);
//! ```

mod patterns;

use regex::Captures;
use serde::Serialize;
use tracing::debug;

use crate::alias::AliasIndex;
use crate::condition::{Condition, ConditionValue, Operator};
use crate::config::ParserSettings;
use crate::diagnostic::{Clause, Diagnostic};
use crate::query::{StructuredQuery, TopN};

use patterns::{
    CHART_TYPE_PATTERN, GROUP_BY_PATTERN, ORDER_BY_PATTERN, PAIRED_CONDITION_PATTERN,
    SINGLE_CONDITION_PATTERN, TOP_N_PATTERN,
};

/// Result of parsing a request.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutcome {
    /// The structured query. Fields that could not be extracted are unset.
    pub query: StructuredQuery,
    /// Notes about clauses that were defaulted or not understood.
    pub diagnostics: Vec<Diagnostic>,
}

/// A condition as it appears in the text, before resolution.
#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    start: usize,
    column: String,
    operator: String,
    value: String,
}

/// Parses free-text visualization requests.
#[derive(Debug, Clone)]
pub struct RequestParser {
    default_chart_type: String,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::with_settings(&ParserSettings::default())
    }

    /// Create a parser from configuration.
    pub fn with_settings(settings: &ParserSettings) -> Self {
        Self {
            default_chart_type: settings.default_chart_type.clone(),
        }
    }

    /// Parse a request against the columns known to `index`.
    pub fn parse(&self, text: &str, index: &AliasIndex) -> ParseOutcome {
        let lowered = text.to_lowercase();
        let mut diagnostics = Vec::new();

        let chart_type = self.extract_chart_type(&lowered, &mut diagnostics);
        let columns = extract_columns(text, index, &mut diagnostics);
        let conditions = extract_conditions(&lowered, index, &mut diagnostics);
        let group_by = extract_clause_column(
            &lowered,
            &GROUP_BY_PATTERN,
            Clause::GroupBy,
            index,
            &mut diagnostics,
        );
        let order_by = extract_clause_column(
            &lowered,
            &ORDER_BY_PATTERN,
            Clause::OrderBy,
            index,
            &mut diagnostics,
        );
        let top_n = extract_top_n(&lowered, index, &mut diagnostics);

        debug!(%chart_type, ?columns, "identified chart type and columns");
        debug!(conditions = conditions.len(), ?group_by, ?order_by, ?top_n, "identified clauses");

        ParseOutcome {
            query: StructuredQuery {
                chart_type,
                columns,
                conditions,
                group_by,
                order_by,
                top_n,
            },
            diagnostics,
        }
    }

    fn extract_chart_type(&self, lowered: &str, diagnostics: &mut Vec<Diagnostic>) -> String {
        match CHART_TYPE_PATTERN.find(lowered) {
            Some(m) => m.as_str().to_string(),
            None => {
                diagnostics.push(Diagnostic::info(
                    Clause::ChartType,
                    format!(
                        "no chart type mentioned, using '{}'",
                        self.default_chart_type
                    ),
                ));
                self.default_chart_type.clone()
            }
        }
    }
}

/// Parse a request with default parser settings.
pub fn parse(text: &str, index: &AliasIndex) -> ParseOutcome {
    RequestParser::new().parse(text, index)
}

/// Columns in order of first mention.
fn extract_columns(
    text: &str,
    index: &AliasIndex,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for mention in index.mentions(text) {
        if !columns.iter().any(|c| c == mention.column) {
            columns.push(mention.column.to_string());
        }
    }

    if columns.is_empty() {
        diagnostics.push(Diagnostic::warning(
            Clause::Columns,
            "no known column mentioned",
        ));
    }
    columns
}

fn candidate(caps: &Captures<'_>, suffix: &str) -> Option<Candidate> {
    let column = caps.name(&format!("col{}", suffix))?;
    let operator = caps.name(&format!("op{}", suffix))?;
    let value = caps.name(&format!("val{}", suffix))?;
    Some(Candidate {
        start: column.start(),
        column: column.as_str().to_string(),
        operator: operator.as_str().to_string(),
        value: value.as_str().to_string(),
    })
}

/// Conditions from both pattern families, in text order, deduplicated.
fn extract_conditions(
    lowered: &str,
    index: &AliasIndex,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Condition> {
    let mut candidates: Vec<Candidate> = Vec::new();

    for caps in SINGLE_CONDITION_PATTERN.captures_iter(lowered) {
        candidates.extend(candidate(&caps, ""));
    }
    for caps in PAIRED_CONDITION_PATTERN.captures_iter(lowered) {
        candidates.extend(candidate(&caps, "1"));
        candidates.extend(candidate(&caps, "2"));
    }

    candidates.sort_by_key(|c| c.start);
    candidates.dedup();

    let mut conditions: Vec<Condition> = Vec::new();
    for cand in candidates {
        let Some(column) = index.resolve(&cand.column) else {
            diagnostics.push(Diagnostic::warning(
                Clause::Condition,
                format!(
                    "dropped '{} {} {}': unknown column '{}'",
                    cand.column, cand.operator, cand.value, cand.column
                ),
            ));
            continue;
        };
        let Some(operator) = Operator::normalize(&cand.operator) else {
            diagnostics.push(Diagnostic::warning(
                Clause::Condition,
                format!(
                    "dropped '{} {} {}': unknown operator '{}'",
                    cand.column, cand.operator, cand.value, cand.operator
                ),
            ));
            continue;
        };

        let condition = Condition::new(column, operator, ConditionValue::parse(&cand.value));
        if !conditions.contains(&condition) {
            conditions.push(condition);
        }
    }
    conditions
}

/// Resolve the column named right after a keyword such as "group by".
///
/// Multi-word aliases ("group by device type") are tried before the single
/// captured token.
fn extract_clause_column(
    lowered: &str,
    pattern: &regex::Regex,
    clause: Clause,
    index: &AliasIndex,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<String> {
    let caps = pattern.captures(lowered)?;
    let token = caps.get(1)?;

    match resolve_at(index, &lowered[token.start()..], token.as_str()) {
        Some(column) => Some(column.to_string()),
        None => {
            diagnostics.push(Diagnostic::warning(
                clause,
                format!("unknown column '{}'", token.as_str()),
            ));
            None
        }
    }
}

fn extract_top_n(
    lowered: &str,
    index: &AliasIndex,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<TopN> {
    let caps = TOP_N_PATTERN.captures(lowered)?;
    let count_token = caps.get(1)?.as_str();
    let column_token = caps.get(2)?;

    let count = match count_token.parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => {
            diagnostics.push(Diagnostic::warning(
                Clause::TopN,
                format!("'{}' is not a positive row count", count_token),
            ));
            return None;
        }
    };

    let Some(column) = resolve_at(index, &lowered[column_token.start()..], column_token.as_str())
    else {
        diagnostics.push(Diagnostic::warning(
            Clause::TopN,
            format!("unknown column '{}'", column_token.as_str()),
        ));
        return None;
    };

    Some(TopN {
        count,
        column: column.to_string(),
    })
}

/// Resolve the longest alias starting at the beginning of `rest`, falling
/// back to the single `token`.
fn resolve_at<'a>(index: &'a AliasIndex, rest: &str, token: &str) -> Option<&'a str> {
    index
        .mentions(rest)
        .into_iter()
        .next()
        .filter(|mention| mention.start == 0)
        .map(|mention| mention.column)
        .or_else(|| index.resolve(token))
}
