use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};
use thiserror::Error;

use crate::ast::Filter;
use crate::backend::{BackendError, Hit, Page, PageRequest, SearchBackend};
use crate::request::SearchSpec;
use crate::value::{Payload, ResultSet};

/// Largest page the backend is asked for.
pub const DEFAULT_PAGE_SIZE: usize = 65536;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("search cancelled after {collected} of {total} hits")]
    Cancelled { collected: usize, total: u64 },
}

/// Shared flag a caller sets to stop a running search between pages.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs a compiled filter against a backend and collects every hit.
pub struct Executor<'a, B: SearchBackend + ?Sized> {
    backend: &'a B,
    app_key_field: &'a str,
    page_size: usize,
    cancel: Option<&'a CancelFlag>,
}

impl<'a, B: SearchBackend + ?Sized> Executor<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Executor {
            backend,
            app_key_field: "appkey",
            page_size: DEFAULT_PAGE_SIZE,
            cancel: None,
        }
    }

    pub fn app_key_field(mut self, field: &'a str) -> Self {
        self.app_key_field = field;
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    pub fn cancel_flag(mut self, flag: &'a CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(CancelFlag::is_cancelled)
    }

    /// Fetches pages until the collected count reaches the backend total or a
    /// page comes back empty.
    ///
    /// The empty-page check is what ends the loop when the reported total can
    /// never be reached. Any backend failure aborts the whole run; a partially
    /// collected set is never returned alongside an error. The last cursor
    /// seen is released either way.
    pub fn execute(&self, spec: &SearchSpec, filter: &Filter) -> Result<ResultSet, ExecError> {
        let mut cursor = None;
        let outcome = self.collect(spec, filter, &mut cursor);
        if let Some(cursor) = cursor {
            if let Err(e) = self.backend.release(&cursor) {
                warn!("releasing cursor for '{}' failed: {}", spec.index, e);
            }
        }
        outcome
    }

    fn collect(
        &self,
        spec: &SearchSpec,
        filter: &Filter,
        last_cursor: &mut Option<String>,
    ) -> Result<ResultSet, ExecError> {
        let request = PageRequest {
            index: &spec.index,
            doc_type: &spec.doc_type,
            app_key_field: self.app_key_field,
            app_key: &spec.app_key,
            filter,
            fields: &spec.fields,
            page_size: self.page_size,
        };

        let mut results = ResultSet::new();
        let mut page = self.backend.run_query(&request).inspect_err(|e| {
            warn!("initial query on '{}' failed: {}", spec.index, e);
        })?;
        let mut fetches = 1;

        loop {
            debug!(
                "page {} of '{}': {} hit(s), total {}",
                fetches,
                spec.index,
                page.hits.len(),
                page.total
            );
            if page.cursor.is_some() {
                last_cursor.clone_from(&page.cursor);
            }
            if page.hits.is_empty() {
                break;
            }

            let Page { hits, total, cursor } = page;
            for hit in hits {
                let (id, payload) = into_entry(hit);
                results.insert(id, payload);
            }
            if results.len() as u64 >= total {
                break;
            }

            if self.is_cancelled() {
                info!("search on '{}' cancelled after {} hit(s)", spec.index, results.len());
                return Err(ExecError::Cancelled {
                    collected: results.len(),
                    total,
                });
            }

            let cursor = cursor.ok_or(BackendError::MissingCursor)?;
            page = self.backend.resume(&cursor).inspect_err(|e| {
                warn!("resume on '{}' failed after {} hit(s): {}", spec.index, results.len(), e);
            })?;
            fetches += 1;
        }

        info!(
            "search on '{}' collected {} hit(s) in {} fetch(es)",
            spec.index,
            results.len(),
            fetches
        );
        Ok(results)
    }
}

/// Projected fields win over the stored document; a hit with neither is
/// still recorded, with an empty payload.
fn into_entry(hit: Hit) -> (String, Payload) {
    let payload = Payload::from(hit.fields.or(hit.source));
    (hit.id, payload)
}

/// Executes `filter` for `spec` with default settings.
pub fn execute<B: SearchBackend + ?Sized>(
    backend: &B,
    spec: &SearchSpec,
    filter: &Filter,
) -> Result<ResultSet, ExecError> {
    Executor::new(backend).execute(spec, filter)
}
