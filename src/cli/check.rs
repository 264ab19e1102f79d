//! Compile ESL queries without running them

use super::CliError;
use crate::{compile, output};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The ESL query to compile
    pub query: String,
    /// Condition ANDed with the query, as the service would inject it
    pub system_condition: String,
    /// Pretty-print the output
    pub pretty: bool,
    /// Only validate syntax, don't print the filter
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Query compiled to this Elasticsearch filter
    Success(serde_json::Value),
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.query.trim().is_empty() {
        return Err(CliError::NoInput);
    }

    let filter = compile(&options.query, &options.system_condition)?;
    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    Ok(CheckResult::Success(output::to_json(&filter)))
}
