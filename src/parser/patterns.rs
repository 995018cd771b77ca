//! Regex patterns for request parsing.
//!
//! All patterns run against lowercased request text.

use std::sync::LazyLock;

use regex::Regex;

use crate::query::ChartKind;

/// Operator phrases. Multi-character symbols come first so `>=` is not
/// read as `>` followed by a stray `=`.
const OPERATOR: &str = r"(?:>=|<=|=|>|<|\b(?:greater\s+than|more\s+than|older\s+than|less\s+than|younger\s+than|equals|equal|exactly|above|below)\b(?:\s+to\b)?)";

/// "COLUMN OPERATOR VALUE" with capture names suffixed by `suffix`.
///
/// The value is a word or number, optionally negative, optionally quoted.
fn single_condition(suffix: &str) -> String {
    format!(
        r"\b(?P<col{s}>\w+)\s*(?P<op{s}>{op})\s*'*(?P<val{s}>-?\w+(?:\.\w+)?)'*",
        s = suffix,
        op = OPERATOR,
    )
}

pub(super) static CHART_TYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let names: Vec<&str> = ChartKind::ALL.iter().map(|kind| kind.as_str()).collect();
    Regex::new(&format!(r"\b({})\b", names.join("|"))).expect("Invalid regex")
});

/// "COLUMN OPERATOR VALUE"
pub(super) static SINGLE_CONDITION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&single_condition("")).expect("Invalid regex"));

/// "COLUMN OPERATOR VALUE and COLUMN OPERATOR VALUE"
pub(super) static PAIRED_CONDITION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{}\s+and\s+{}",
        single_condition("1"),
        single_condition("2")
    ))
    .expect("Invalid regex")
});

pub(super) static GROUP_BY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bgroup\s+by\s+(\w+)").expect("Invalid regex"));

pub(super) static ORDER_BY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\border\s+by\s+(\w+)").expect("Invalid regex"));

pub(super) static TOP_N_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\btop\s+(\S+)\s+based\s+on\s+(\w+)").expect("Invalid regex"));
