//! The single entrypoint a transport binds to.
//!
//! A [`SearchService`] owns a backend and a [`ServiceConfig`]. Each call
//! compiles the request's ESL, runs it, and returns either the full result
//! set or an error. Requests share nothing mutable, so one service can be
//! used from many threads at once.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use log::{error, info, warn};

use crate::backend::SearchBackend;
use crate::compiler;
use crate::config::ServiceConfig;
use crate::error::{Result, SearchError};
use crate::executor::{CancelFlag, Executor};
use crate::request::{SearchReply, SearchSpec};
use crate::value::ResultSet;

pub struct SearchService<B> {
    backend: B,
    config: ServiceConfig,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl<B: SearchBackend> SearchService<B> {
    pub fn new(backend: B, config: ServiceConfig) -> Self {
        SearchService { backend, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn run(&self, spec: &SearchSpec, cancel: Option<&CancelFlag>) -> Result<ResultSet> {
        let filter = compiler::compile(&spec.esl_text, &spec.system_condition).inspect_err(|e| {
            warn!("rejected esl for index '{}': {} ({})", spec.index, e, spec.esl_text);
        })?;

        let mut executor = Executor::new(&self.backend)
            .app_key_field(&self.config.app_key_field)
            .page_size(self.config.page_size);
        if let Some(flag) = cancel {
            executor = executor.cancel_flag(flag);
        }
        Ok(executor.execute(spec, &filter)?)
    }

    /// Compile and execute inside a fault boundary: a panic anywhere below
    /// becomes [`SearchError::InternalFault`] for this request only.
    fn guarded(&self, spec: &SearchSpec, cancel: Option<&CancelFlag>) -> Result<ResultSet> {
        info!(
            "search index='{}' type='{}' platform='{}' fields={:?}",
            spec.index, spec.doc_type, spec.platform, spec.fields
        );
        match panic::catch_unwind(AssertUnwindSafe(|| self.run(spec, cancel))) {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("search on '{}' faulted: {}", spec.index, message);
                Err(SearchError::InternalFault(message))
            }
        }
    }

    /// Runs one search to completion.
    pub fn search(&self, spec: &SearchSpec) -> Result<ResultSet> {
        self.guarded(spec, None)
    }

    /// Like [`search`](Self::search), stopping between pages once `cancel`
    /// is set.
    pub fn search_with_cancel(&self, spec: &SearchSpec, cancel: &CancelFlag) -> Result<ResultSet> {
        self.guarded(spec, Some(cancel))
    }

    /// Transport-facing form of [`search`](Self::search): failures are
    /// returned inside the reply instead of as an `Err`.
    pub fn handle(&self, spec: &SearchSpec) -> SearchReply {
        match self.search(spec) {
            Ok(results) => SearchReply::ok(results),
            Err(e) => SearchReply::failed(e),
        }
    }
}
