//! Filter conditions and operator normalization.
//!
//! Requests phrase comparisons in many ways ("above", "older than", ">").
//! [`Operator::normalize`] maps each phrasing onto one of five canonical
//! operators. Conditions are always combined with logical AND.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// Canonical comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Equal,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
}

/// Phrase → operator synonym table. Lookups are case-insensitive.
const SYNONYMS: &[(&str, Operator)] = &[
    ("equal", Operator::Equal),
    ("equals", Operator::Equal),
    ("exactly", Operator::Equal),
    ("=", Operator::Equal),
    ("greater than", Operator::Greater),
    ("above", Operator::Greater),
    ("more than", Operator::Greater),
    ("older than", Operator::Greater),
    (">", Operator::Greater),
    ("less than", Operator::Less),
    ("below", Operator::Less),
    ("younger than", Operator::Less),
    ("<", Operator::Less),
    (">=", Operator::GreaterEqual),
    ("<=", Operator::LessEqual),
];

impl Operator {
    /// Map an operator phrase onto a canonical operator.
    ///
    /// Whitespace inside the phrase is collapsed and a trailing "to"
    /// ("equal to", "equals to") is ignored. Unknown phrases yield `None`.
    pub fn normalize(phrase: &str) -> Option<Self> {
        let lowered = phrase.to_lowercase();
        let mut words: Vec<&str> = lowered.split_whitespace().collect();
        if words.len() > 1 && words.last() == Some(&"to") {
            words.pop();
        }
        let key = words.join(" ");

        SYNONYMS
            .iter()
            .find(|(synonym, _)| *synonym == key)
            .map(|(_, op)| *op)
    }

    /// The symbolic spelling of this operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::GreaterEqual => ">=",
            Operator::LessEqual => "<=",
        }
    }

    /// Whether `cell <op> literal` holds, given `cell.cmp(literal)`.
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Equal => ordering == Ordering::Equal,
            Operator::Greater => ordering == Ordering::Greater,
            Operator::Less => ordering == Ordering::Less,
            Operator::GreaterEqual => ordering != Ordering::Less,
            Operator::LessEqual => ordering != Ordering::Greater,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The literal side of a condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Number(f64),
    Text(String),
}

impl ConditionValue {
    /// Parse a literal taken from request text.
    ///
    /// Surrounding quotes are removed. Anything that reads as a finite
    /// number becomes [`ConditionValue::Number`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim().trim_matches(|c| c == '\'' || c == '"');
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => ConditionValue::Number(n),
            _ => ConditionValue::Text(trimmed.to_string()),
        }
    }

    /// The literal as a number, if it can be read as one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ConditionValue::Number(n) => Some(*n),
            ConditionValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    /// The literal as case-normalized text.
    pub fn as_text(&self) -> String {
        match self {
            ConditionValue::Number(n) => n.to_string(),
            ConditionValue::Text(s) => s.to_lowercase(),
        }
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Number(n) => write!(f, "{}", n),
            ConditionValue::Text(s) => write!(f, "'{}'", s),
        }
    }
}

/// A single filter condition on one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub value: ConditionValue,
}

impl Condition {
    pub fn new(column: impl Into<String>, operator: Operator, value: ConditionValue) -> Self {
        Self {
            column: column.into(),
            operator,
            value,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.value)
    }
}
