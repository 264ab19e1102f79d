//! CLI support for esl-search
//!
//! Provides programmatic access to the `esl` command functionality for
//! embedding in other tools.

mod check;
mod docs;
mod search;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use search::{SearchOptions, execute_search, load_config};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// ESL compile error
    Compile(crate::CompileError),
    /// Search error
    Search(crate::SearchError),
    /// Configuration error
    Config(crate::ConfigError),
    /// JSON encoding error
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
    /// No input provided
    NoInput,
    /// Unknown documentation category
    UnknownCategory(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Compile(e) => write!(f, "Compile error: {}", e),
            CliError::Search(e) => write!(f, "Search error: {}", e),
            CliError::Config(e) => write!(f, "Config error: {}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => write!(f, "No query provided. Pass it as an argument or pipe it to stdin."),
            CliError::UnknownCategory(c) => {
                write!(f, "Unknown category: '{}'\nRun 'esl docs' to see available categories.", c)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Compile(e) => Some(e),
            CliError::Search(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::CompileError> for CliError {
    fn from(e: crate::CompileError) -> Self {
        CliError::Compile(e)
    }
}

impl From<crate::SearchError> for CliError {
    fn from(e: crate::SearchError) -> Self {
        CliError::Search(e)
    }
}

impl From<crate::ConfigError> for CliError {
    fn from(e: crate::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
