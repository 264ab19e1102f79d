//! Compiles ESL text into a [`Filter`].
//!
//! ```
//! use esl_search::compiler::compile;
//! use esl_search::ast::Filter;
//!
//! let filter = compile("{ 'city' in ('paris') }", "").unwrap();
//! assert_eq!(
//!     filter,
//!     Filter::TermsIn { field: "city".into(), values: vec!["paris".into()] }
//! );
//! ```

use log::debug;
use thiserror::Error;

use crate::ast::Filter;
use crate::lexer::{self, LexError, Lexer};
use crate::parser::{ParseError, Parser};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("input too large: {len} characters, at most {max} allowed")]
    InputTooLarge { len: usize, max: usize },

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("structural error: {0}")]
    Structural(String),
}

impl From<LexError> for CompileError {
    fn from(e: LexError) -> Self {
        match e {
            LexError::InputTooLarge { len, max } => CompileError::InputTooLarge { len, max },
            other => CompileError::Syntax(other.to_string()),
        }
    }
}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::Syntax(msg) => CompileError::Syntax(msg),
            ParseError::Structural(msg) => CompileError::Structural(msg),
        }
    }
}

/// Builds the source actually scanned: the system condition, when present,
/// becomes an extra top-level section ANDed with the whole caller query.
fn effective_source(esl: &str, system_condition: &str) -> String {
    if system_condition.is_empty() {
        esl.to_string()
    } else {
        format!("{{{}}} {{{}}}", esl, system_condition)
    }
}

/// Compiles `esl`, ANDed with `system_condition` when that is non-empty.
///
/// Both inputs are limited to [`lexer::MAX_INPUT_LEN`] characters each.
/// Every error is reported before any backend is contacted.
pub fn compile(esl: &str, system_condition: &str) -> Result<Filter, CompileError> {
    lexer::check_len(esl.chars().count())?;
    lexer::check_len(system_condition.chars().count())?;

    let source = effective_source(esl, system_condition);
    let tokens = Lexer::new(&source).scan()?;

    let mut parser = Parser::new(tokens);
    let filter = parser.parse()?;

    debug!(
        "compiled esl into {} predicate(s): {:?}",
        filter.predicate_count(),
        filter
    );
    Ok(filter)
}
