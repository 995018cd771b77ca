//! # Vizor
//!
//! Turns free-form chart requests into structured queries and runs them over
//! tabular data.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          Dataset snapshot (columns + rows)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [alias]
//! ┌─────────────────────────────────────────────────────────┐
//! │       AliasIndex (case / spacing / punctuation)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!        request text ───▶ ▼ [parser]
//! ┌─────────────────────────────────────────────────────────┐
//! │     StructuredQuery + Diagnostics (never fails)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [executor]
//! ┌─────────────────────────────────────────────────────────┐
//! │   filter → group → sort → top-N  ⇒  ResultTable         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [session]
//! ┌─────────────────────────────────────────────────────────┐
//! │             RenderRequest (external renderer)           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`command`] module handles the separate keyword grammar used to
//! fetch data from the retrieval API.

pub mod alias;
pub mod command;
pub mod condition;
pub mod config;
pub mod data;
pub mod diagnostic;
pub mod executor;
pub mod parser;
pub mod query;
pub mod session;

pub use alias::AliasIndex;
pub use condition::{Condition, ConditionValue, Operator};
pub use data::{ResultTable, Table, Value};
pub use diagnostic::{Clause, Diagnostic, Severity};
pub use executor::{ExecuteError, Execution, QueryExecutor};
pub use parser::{ParseOutcome, RequestParser};
pub use query::{ChartKind, StructuredQuery, TopN};
pub use session::{RenderRequest, Session};
