//! Configuration module for vizor.
//!
//! Handles parser defaults, the data-retrieval endpoint and logging.

mod settings;

pub use settings::{
    expand_env_vars, LoggingSettings, ParserSettings, RetrievalSettings, Settings, SettingsError,
};
