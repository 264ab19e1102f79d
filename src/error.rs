use thiserror::Error;

use crate::backend::BackendError;
use crate::compiler::CompileError;
use crate::executor::ExecError;

/// Everything a search request can fail with.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("input too large: {len} characters, at most {max} allowed")]
    InputTooLarge { len: usize, max: usize },

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("structural error: {0}")]
    Structural(String),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("internal fault: {0}")]
    InternalFault(String),

    #[error("search cancelled after {collected} of {total} hits")]
    Cancelled { collected: usize, total: u64 },
}

impl SearchError {
    /// True for errors found while compiling, before any backend call.
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            SearchError::InputTooLarge { .. } | SearchError::Syntax(_) | SearchError::Structural(_)
        )
    }
}

impl From<CompileError> for SearchError {
    fn from(e: CompileError) -> Self {
        match e {
            CompileError::InputTooLarge { len, max } => SearchError::InputTooLarge { len, max },
            CompileError::Syntax(msg) => SearchError::Syntax(msg),
            CompileError::Structural(msg) => SearchError::Structural(msg),
        }
    }
}

impl From<ExecError> for SearchError {
    fn from(e: ExecError) -> Self {
        match e {
            ExecError::Backend(e) => SearchError::Backend(e),
            ExecError::Cancelled { collected, total } => SearchError::Cancelled { collected, total },
        }
    }
}

/// Result type alias for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
