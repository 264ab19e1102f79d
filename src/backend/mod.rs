//! Search backend contract.
//!
//! The executor only needs two calls: an initial query that opens a
//! server-side cursor, and a resume call that returns the next page for that
//! cursor. [`elastic::ElasticBackend`] implements them over HTTP.

pub mod elastic;

pub use elastic::ElasticBackend;

use thiserror::Error;

use crate::ast::Filter;

/// Failures talking to the backend. Never retried by the executor.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("backend returned status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("malformed backend response: {0}")]
    Decode(String),

    #[error("backend reported more hits but returned no cursor")]
    MissingCursor,

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BackendError::Decode(e.to_string())
        } else {
            BackendError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        BackendError::Decode(e.to_string())
    }
}

/// Parameters of the first page request.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub index: &'a str,
    /// Empty when the backend has no document types.
    pub doc_type: &'a str,
    /// Field matched against `app_key` as a mandatory term.
    pub app_key_field: &'a str,
    pub app_key: &'a str,
    pub filter: &'a Filter,
    /// Projection; empty requests the full stored document.
    pub fields: &'a [String],
    pub page_size: usize,
}

/// A single returned document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hit {
    pub id: String,
    /// Projected fields, when a projection was requested and honored.
    pub fields: Option<Vec<u8>>,
    /// Full stored document.
    pub source: Option<Vec<u8>>,
}

impl Hit {
    pub fn new(id: impl Into<String>) -> Self {
        Hit {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_fields(mut self, fields: impl Into<Vec<u8>>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<Vec<u8>>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// One page of hits with the total the backend reports for the whole query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub hits: Vec<Hit>,
    pub total: u64,
    /// Opaque handle for the next page.
    pub cursor: Option<String>,
}

/// A search engine able to run a filtered query and page through its hits.
pub trait SearchBackend {
    fn run_query(&self, request: &PageRequest<'_>) -> Result<Page, BackendError>;

    fn resume(&self, cursor: &str) -> Result<Page, BackendError>;

    /// Frees the server-side state behind `cursor` once no more pages are
    /// wanted.
    fn release(&self, _cursor: &str) -> Result<(), BackendError> {
        Ok(())
    }
}

impl<B: SearchBackend + ?Sized> SearchBackend for &B {
    fn run_query(&self, request: &PageRequest<'_>) -> Result<Page, BackendError> {
        (**self).run_query(request)
    }

    fn resume(&self, cursor: &str) -> Result<Page, BackendError> {
        (**self).resume(cursor)
    }

    fn release(&self, cursor: &str) -> Result<(), BackendError> {
        (**self).release(cursor)
    }
}

impl<B: SearchBackend + ?Sized> SearchBackend for Box<B> {
    fn run_query(&self, request: &PageRequest<'_>) -> Result<Page, BackendError> {
        (**self).run_query(request)
    }

    fn resume(&self, cursor: &str) -> Result<Page, BackendError> {
        (**self).resume(cursor)
    }

    fn release(&self, cursor: &str) -> Result<(), BackendError> {
        (**self).release(cursor)
    }
}
