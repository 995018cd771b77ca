//! Keyword command grammar used at the transport boundary.
//!
//! Unlike free-text requests, commands are whitespace-separated keywords in
//! a fixed vocabulary:
//!
//! ```text
//! sum <col>+<col>... group by <col> filter by <col> = <v1>,<v2>
//!     start time <dd/mm/yyyy> end time <dd/mm/yyyy>
//!     order by <col> ascending|descending chart <type> limit <N>
//! ```
//!
//! A parsed [`CommandRequest`] is turned into the query parameters of the
//! external data-retrieval API by [`CommandRequest::to_params`]. Parameter
//! names and their encoding are a compatibility contract with that API.

mod url;

use chrono::{Local, NaiveDate, TimeZone};

pub use url::{curl_command, encode_query, retrieval_url, QUERY_ENCODE_SET};

/// Errors raised while parsing a command.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Invalid date '{0}', expected dd/mm/yyyy")]
    InvalidDate(String),
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Keywords that end the `sum` field list.
const SUM_TERMINATORS: [&str; 7] = ["group", "filter", "start", "end", "order", "chart", "limit"];

/// `filter by <column> = <values>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFilter {
    pub column: String,
    pub values: Vec<String>,
}

/// A parsed keyword command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandRequest {
    pub sum: Vec<String>,
    pub group_by: Option<String>,
    pub order_by: Option<String>,
    /// `ascending` or `descending`, taken verbatim.
    pub order: Option<String>,
    pub filter: Option<CommandFilter>,
    /// Unix epoch seconds.
    pub start_time: Option<i64>,
    /// Unix epoch seconds.
    pub end_time: Option<i64>,
    pub chart_type: Option<String>,
    /// Passed through unparsed.
    pub limit: Option<String>,
}

impl CommandRequest {
    /// Parse a keyword command.
    ///
    /// Missing or incomplete clauses are left unset. Only a malformed date
    /// is an error.
    pub fn parse(command: &str) -> CommandResult<Self> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        let mut request = CommandRequest::default();

        if let Some(i) = position(&parts, "sum", 0) {
            request.sum = parts[i + 1..]
                .iter()
                .take_while(|p| !SUM_TERMINATORS.contains(*p))
                .map(|p| p.to_string())
                .collect();
        }

        request.group_by = after_pair(&parts, "group", "by").map(str::to_string);

        if let Some(column) = after_pair(&parts, "order", "by") {
            request.order_by = Some(column.to_string());
            request.order = ["ascending", "descending"]
                .into_iter()
                .find(|dir| parts.contains(dir))
                .map(str::to_string);
        }

        if let Some(by) = pair_index(&parts, "filter", "by") {
            if let (Some(column), Some(values)) = (parts.get(by + 1), parts.get(by + 3)) {
                request.filter = Some(CommandFilter {
                    column: column.to_string(),
                    values: values.split(',').map(|v| v.trim().to_string()).collect(),
                });
            }
        }

        if let Some(date) = after_pair(&parts, "start", "time") {
            request.start_time = Some(parse_date_to_epoch(date)?);
        }
        if let Some(date) = after_pair(&parts, "end", "time") {
            request.end_time = Some(parse_date_to_epoch(date)?);
        }

        request.chart_type = position(&parts, "chart", 0)
            .and_then(|i| parts.get(i + 1))
            .map(|s| s.to_string());
        request.limit = position(&parts, "limit", 0)
            .and_then(|i| parts.get(i + 1))
            .map(|s| s.to_string());

        Ok(request)
    }
}

/// Convert `dd/mm/yyyy` (local midnight) to Unix epoch seconds.
pub fn parse_date_to_epoch(date: &str) -> CommandResult<i64> {
    let invalid = || CommandError::InvalidDate(date.to_string());
    let midnight = NaiveDate::parse_from_str(date, "%d/%m/%Y")
        .map_err(|_| invalid())?
        .and_hms_opt(0, 0, 0)
        .ok_or_else(invalid)?;
    let local = Local
        .from_local_datetime(&midnight)
        .earliest()
        .ok_or_else(invalid)?;
    Ok(local.timestamp())
}

fn position(parts: &[&str], word: &str, from: usize) -> Option<usize> {
    parts
        .iter()
        .skip(from)
        .position(|p| *p == word)
        .map(|i| i + from)
}

/// Index of the first `second` at or after the first `first`.
fn pair_index(parts: &[&str], first: &str, second: &str) -> Option<usize> {
    let i = position(parts, first, 0)?;
    position(parts, second, i)
}

/// The word following `first second`.
fn after_pair<'a>(parts: &[&'a str], first: &str, second: &str) -> Option<&'a str> {
    let i = pair_index(parts, first, second)?;
    parts.get(i + 1).copied()
}
