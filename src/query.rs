//! The structured form of a visualization request.

use serde::Serialize;

use crate::condition::Condition;

/// Chart kind used when a request names none.
pub const DEFAULT_CHART_TYPE: &str = "table";

/// Chart kinds the parser recognizes and the executor supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Bar,
    Histogram,
    Line,
    Area,
    Scatter,
    Box,
    Heatmap,
    Violin,
    Bubble,
    Table,
}

impl ChartKind {
    pub const ALL: [ChartKind; 11] = [
        ChartKind::Pie,
        ChartKind::Bar,
        ChartKind::Histogram,
        ChartKind::Line,
        ChartKind::Area,
        ChartKind::Scatter,
        ChartKind::Box,
        ChartKind::Heatmap,
        ChartKind::Violin,
        ChartKind::Bubble,
        ChartKind::Table,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Pie => "pie",
            ChartKind::Bar => "bar",
            ChartKind::Histogram => "histogram",
            ChartKind::Line => "line",
            ChartKind::Area => "area",
            ChartKind::Scatter => "scatter",
            ChartKind::Box => "box",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Violin => "violin",
            ChartKind::Bubble => "bubble",
            ChartKind::Table => "table",
        }
    }

    /// Look up a chart kind by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.iter().copied().find(|kind| kind.as_str() == name)
    }

    /// Minimum number of columns a renderer needs to draw this kind.
    pub fn min_columns(&self) -> usize {
        match self {
            ChartKind::Line | ChartKind::Scatter | ChartKind::Area => 2,
            ChartKind::Bubble => 3,
            _ => 1,
        }
    }
}

/// Keep the `count` highest rows ranked by `column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopN {
    pub count: usize,
    pub column: String,
}

/// A parsed visualization request.
///
/// Built fresh for every request; nothing in it refers back to the text it
/// came from or to the dataset it will run against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredQuery {
    /// Chart kind tag. Kept as a string so that tags outside the known
    /// vocabulary can reach the executor and be reported as unsupported.
    pub chart_type: String,
    /// Columns in order of first mention, without duplicates.
    pub columns: Vec<String>,
    /// Filter conditions, AND-combined.
    pub conditions: Vec<Condition>,
    pub group_by: Option<String>,
    pub order_by: Option<String>,
    pub top_n: Option<TopN>,
}

impl Default for StructuredQuery {
    fn default() -> Self {
        Self {
            chart_type: DEFAULT_CHART_TYPE.to_string(),
            columns: Vec::new(),
            conditions: Vec::new(),
            group_by: None,
            order_by: None,
            top_n: None,
        }
    }
}

impl StructuredQuery {
    /// The chart kind, if the tag is one the executor supports.
    pub fn chart_kind(&self) -> Option<ChartKind> {
        ChartKind::from_name(&self.chart_type)
    }

    pub fn with_chart_type(mut self, chart_type: impl Into<String>) -> Self {
        self.chart_type = chart_type.into();
        self
    }

    pub fn with_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by = Some(column.into());
        self
    }

    pub fn with_order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    pub fn with_top_n(mut self, count: usize, column: impl Into<String>) -> Self {
        self.top_n = Some(TopN {
            count,
            column: column.into(),
        });
        self
    }
}
