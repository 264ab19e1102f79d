// tests/integration_tests.rs
//
// Executor and service behaviour against an in-memory paging backend.

use esl_search::{
    BackendError, CancelFlag, ExecError, Executor, Filter, Hit, Page, PageRequest, Payload,
    SearchBackend, SearchError, SearchService, SearchSpec, ServiceConfig, compile, execute,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// What the fake backend saw of the initial request.
#[derive(Debug, Clone, PartialEq)]
struct SeenRequest {
    index: String,
    doc_type: String,
    app_key_field: String,
    app_key: String,
    fields: Vec<String>,
    page_size: usize,
    filter: Filter,
}

/// Serves prebuilt pages; the cursor is the index of the next page.
#[derive(Default)]
struct PagedBackend {
    pages: Vec<Page>,
    calls: AtomicUsize,
    fail_at: Option<usize>,
    panic_on_index: Option<String>,
    seen: Mutex<Option<SeenRequest>>,
    released: Mutex<Vec<String>>,
}

impl PagedBackend {
    /// Splits `hits` into pages of `page_size`, each reporting `total`.
    fn new(hits: Vec<Hit>, page_size: usize, total: u64) -> Self {
        let chunks: Vec<Vec<Hit>> = hits.chunks(page_size).map(|c| c.to_vec()).collect();
        let count = chunks.len();
        let pages = chunks
            .into_iter()
            .enumerate()
            .map(|(i, hits)| Page {
                hits,
                total,
                cursor: Some((i + 1).to_string()),
            })
            .chain(std::iter::once(Page {
                hits: vec![],
                total,
                cursor: Some((count + 1).to_string()),
            }))
            .collect();
        PagedBackend {
            pages,
            ..Default::default()
        }
    }

    fn failing_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn released(&self) -> Vec<String> {
        self.released.lock().unwrap().clone()
    }

    fn page(&self, index: usize) -> Result<Page, BackendError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_at == Some(call) {
            return Err(BackendError::Status {
                code: 503,
                body: "unavailable".into(),
            });
        }
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }
}

impl SearchBackend for PagedBackend {
    fn run_query(&self, request: &PageRequest<'_>) -> Result<Page, BackendError> {
        if self.panic_on_index.as_deref() == Some(request.index) {
            panic!("backend exploded on {}", request.index);
        }
        *self.seen.lock().unwrap() = Some(SeenRequest {
            index: request.index.to_string(),
            doc_type: request.doc_type.to_string(),
            app_key_field: request.app_key_field.to_string(),
            app_key: request.app_key.to_string(),
            fields: request.fields.to_vec(),
            page_size: request.page_size,
            filter: request.filter.clone(),
        });
        self.page(0)
    }

    fn resume(&self, cursor: &str) -> Result<Page, BackendError> {
        let index = cursor
            .parse()
            .map_err(|_| BackendError::Other(format!("bad cursor {}", cursor)))?;
        self.page(index)
    }

    fn release(&self, cursor: &str) -> Result<(), BackendError> {
        self.released.lock().unwrap().push(cursor.to_string());
        Ok(())
    }
}

fn hits(n: usize) -> Vec<Hit> {
    (0..n)
        .map(|i| Hit::new(format!("doc-{}", i)).with_source(format!("{{\"n\":{}}}", i)))
        .collect()
}

fn spec() -> SearchSpec {
    SearchSpec::new("users", "key-1", "{ 'city' in ('paris') }")
}

fn filter() -> Filter {
    compile(&spec().esl_text, "").unwrap()
}

// ============================================================================
// Pagination
// ============================================================================

#[test]
fn test_collects_all_pages() {
    let backend = PagedBackend::new(hits(10), 4, 10);
    let results = Executor::new(&backend)
        .page_size(4)
        .execute(&spec(), &filter())
        .unwrap();

    assert_eq!(results.len(), 10);
    assert_eq!(backend.calls(), 3);
    assert_eq!(
        results.get("doc-7"),
        Some(&Payload::Document(b"{\"n\":7}".to_vec()))
    );
}

#[test]
fn test_exact_multiple_of_page_size() {
    let backend = PagedBackend::new(hits(8), 4, 8);
    let results = Executor::new(&backend)
        .page_size(4)
        .execute(&spec(), &filter())
        .unwrap();

    assert_eq!(results.len(), 8);
    assert_eq!(backend.calls(), 2);
}

#[test]
fn test_default_page_size() {
    let total = 65536 + 1;
    let backend = PagedBackend::new(hits(total), 65536, total as u64);
    let results = execute(&backend, &spec(), &filter()).unwrap();

    assert_eq!(results.len(), total);
    assert_eq!(backend.calls(), 2);
    assert_eq!(backend.seen.lock().unwrap().as_ref().unwrap().page_size, 65536);
}

#[test]
fn test_empty_page_stops_before_total() {
    // Backend claims 100 hits but runs dry after 6.
    let backend = PagedBackend::new(hits(6), 4, 100);
    let results = Executor::new(&backend)
        .page_size(4)
        .execute(&spec(), &filter())
        .unwrap();

    assert_eq!(results.len(), 6);
    assert_eq!(backend.calls(), 3);
}

#[test]
fn test_no_hits() {
    let backend = PagedBackend::new(vec![], 4, 0);
    let results = execute(&backend, &spec(), &filter()).unwrap();

    assert!(results.is_empty());
    assert_eq!(backend.calls(), 1);
}

#[test]
fn test_zero_total_with_hits_still_records_first_page() {
    let backend = PagedBackend::new(hits(3), 4, 0);
    let results = execute(&backend, &spec(), &filter()).unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(backend.calls(), 1);
}

#[test]
fn test_duplicate_ids_count_once() {
    // The same id on two pages: the total is only reached via the third page.
    let mut docs = hits(4);
    docs[3] = Hit::new("doc-0").with_source("{\"again\":true}");
    docs.push(Hit::new("doc-9"));
    let backend = PagedBackend::new(docs, 2, 4);
    let results = Executor::new(&backend)
        .page_size(2)
        .execute(&spec(), &filter())
        .unwrap();

    assert_eq!(results.len(), 4);
    assert_eq!(backend.calls(), 3);
    assert_eq!(
        results.get("doc-0"),
        Some(&Payload::Document(b"{\"again\":true}".to_vec()))
    );
}

#[test]
fn test_payload_selection() {
    let docs = vec![
        Hit::new("fields").with_fields("{\"a\":[1]}").with_source("{\"a\":1,\"b\":2}"),
        Hit::new("source").with_source("{\"a\":1}"),
        Hit::new("bare"),
    ];
    let backend = PagedBackend::new(docs, 10, 3);
    let results = execute(&backend, &spec(), &filter()).unwrap();

    assert_eq!(
        results.get("fields"),
        Some(&Payload::Document(b"{\"a\":[1]}".to_vec()))
    );
    assert_eq!(
        results.get("source"),
        Some(&Payload::Document(b"{\"a\":1}".to_vec()))
    );
    assert_eq!(results.get("bare"), Some(&Payload::Empty));
    assert!(results.contains("bare"));
    assert!(!results.contains("missing"));
}

// ============================================================================
// Backend Failures
// ============================================================================

#[test]
fn test_initial_fetch_error() {
    let backend = PagedBackend::new(hits(10), 4, 10).failing_at(1);
    let err = Executor::new(&backend)
        .page_size(4)
        .execute(&spec(), &filter())
        .unwrap_err();

    assert!(matches!(err, ExecError::Backend(BackendError::Status { code: 503, .. })));
    assert_eq!(backend.calls(), 1);
}

#[test]
fn test_later_fetch_error_aborts_without_retry() {
    let backend = PagedBackend::new(hits(10), 4, 10).failing_at(2);
    let err = Executor::new(&backend)
        .page_size(4)
        .execute(&spec(), &filter())
        .unwrap_err();

    assert!(matches!(err, ExecError::Backend(_)));
    assert_eq!(backend.calls(), 2);
}

#[test]
fn test_missing_cursor() {
    let mut backend = PagedBackend::new(hits(10), 4, 10);
    backend.pages[0].cursor = None;
    let err = Executor::new(&backend)
        .page_size(4)
        .execute(&spec(), &filter())
        .unwrap_err();

    assert!(matches!(err, ExecError::Backend(BackendError::MissingCursor)));
}

// ============================================================================
// Cursor Release
// ============================================================================

#[test]
fn test_last_cursor_released_after_success() {
    let backend = PagedBackend::new(hits(10), 4, 10);
    Executor::new(&backend)
        .page_size(4)
        .execute(&spec(), &filter())
        .unwrap();

    assert_eq!(backend.released(), vec!["3".to_string()]);
}

#[test]
fn test_cursor_released_after_failure() {
    let backend = PagedBackend::new(hits(10), 4, 10).failing_at(2);
    assert!(
        Executor::new(&backend)
            .page_size(4)
            .execute(&spec(), &filter())
            .is_err()
    );

    assert_eq!(backend.released(), vec!["1".to_string()]);
}

#[test]
fn test_nothing_to_release_without_cursor() {
    let mut backend = PagedBackend::new(hits(3), 4, 3);
    backend.pages[0].cursor = None;
    execute(&backend, &spec(), &filter()).unwrap();

    assert!(backend.released().is_empty());
}

#[test]
fn test_failed_release_keeps_results() {
    struct NoRelease(PagedBackend);

    impl SearchBackend for NoRelease {
        fn run_query(&self, request: &PageRequest<'_>) -> Result<Page, BackendError> {
            self.0.run_query(request)
        }

        fn resume(&self, cursor: &str) -> Result<Page, BackendError> {
            self.0.resume(cursor)
        }

        fn release(&self, _cursor: &str) -> Result<(), BackendError> {
            Err(BackendError::Other("scroll already gone".into()))
        }
    }

    let backend = NoRelease(PagedBackend::new(hits(5), 4, 5));
    let results = Executor::new(&backend)
        .page_size(4)
        .execute(&spec(), &filter())
        .unwrap();
    assert_eq!(results.len(), 5);
}

// ============================================================================
// Cancellation
// ============================================================================

#[test]
fn test_cancel_between_pages() {
    let backend = PagedBackend::new(hits(10), 4, 10);
    let flag = CancelFlag::new();
    flag.cancel();
    let err = Executor::new(&backend)
        .page_size(4)
        .cancel_flag(&flag)
        .execute(&spec(), &filter())
        .unwrap_err();

    assert!(matches!(err, ExecError::Cancelled { collected: 4, total: 10 }));
    assert_eq!(backend.calls(), 1);
}

#[test]
fn test_cancel_after_last_page_is_ignored() {
    let backend = PagedBackend::new(hits(3), 4, 3);
    let flag = CancelFlag::new();
    flag.cancel();
    let results = Executor::new(&backend)
        .cancel_flag(&flag)
        .execute(&spec(), &filter())
        .unwrap();

    assert_eq!(results.len(), 3);
}

// ============================================================================
// Service
// ============================================================================

fn config(page_size: usize) -> ServiceConfig {
    ServiceConfig {
        page_size,
        app_key_field: "tenant_key".into(),
        ..ServiceConfig::default()
    }
}

#[test]
fn test_service_passes_request_through() {
    let service = SearchService::new(PagedBackend::new(hits(5), 2, 5), config(2));
    let spec = spec()
        .with_doc_type("profile")
        .with_fields(["name", "city"])
        .with_system_condition("{ 'active' in ('true') }");

    let results = service.search(&spec).unwrap();
    assert_eq!(results.len(), 5);

    let seen = service.backend().seen.lock().unwrap().clone().unwrap();
    assert_eq!(
        seen,
        SeenRequest {
            index: "users".into(),
            doc_type: "profile".into(),
            app_key_field: "tenant_key".into(),
            app_key: "key-1".into(),
            fields: vec!["name".into(), "city".into()],
            page_size: 2,
            filter: compile(&spec.esl_text, &spec.system_condition).unwrap(),
        }
    );
}

#[test]
fn test_compile_error_never_reaches_backend() {
    let service = SearchService::new(PagedBackend::new(hits(5), 2, 5), config(2));
    let spec = SearchSpec::new("users", "key-1", "{ 'city' in () }");

    let err = service.search(&spec).unwrap_err();
    assert!(matches!(err, SearchError::Structural(_)));
    assert!(err.is_compile_error());
    assert_eq!(service.backend().calls(), 0);
}

#[test]
fn test_oversized_query_rejected() {
    let service = SearchService::new(PagedBackend::default(), ServiceConfig::default());
    let spec = SearchSpec::new("users", "key-1", " ".repeat(65536));

    assert!(matches!(
        service.search(&spec),
        Err(SearchError::InputTooLarge { len: 65536, .. })
    ));
    assert_eq!(service.backend().calls(), 0);
}

#[test]
fn test_backend_error_surfaces() {
    let service = SearchService::new(PagedBackend::new(hits(5), 2, 5).failing_at(3), config(2));
    let err = service.search(&spec()).unwrap_err();
    assert!(matches!(err, SearchError::Backend(BackendError::Status { .. })));
}

#[test]
fn test_panic_becomes_internal_fault() {
    let backend = PagedBackend {
        panic_on_index: Some("users".into()),
        ..PagedBackend::new(hits(5), 2, 5)
    };
    let service = SearchService::new(backend, config(2));

    match service.search(&spec()) {
        Err(SearchError::InternalFault(msg)) => assert!(msg.contains("backend exploded")),
        other => panic!("Expected internal fault, got {:?}", other),
    }

    // The service is still usable afterwards.
    let other = SearchSpec::new("orders", "key-1", "{ 'city' in ('paris') }");
    assert_eq!(service.search(&other).unwrap().len(), 5);
}

#[test]
fn test_fault_is_isolated_between_concurrent_requests() {
    let backend = PagedBackend {
        panic_on_index: Some("bad".into()),
        ..PagedBackend::new(hits(6), 2, 6)
    };
    let service = SearchService::new(backend, config(2));

    let outcomes: Vec<Result<usize, String>> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = &service;
                s.spawn(move || {
                    let index = if i % 4 == 0 { "bad" } else { "good" };
                    let spec = SearchSpec::new(index, "key-1", "{ 'city' in ('paris') }");
                    service.search(&spec).map(|r| r.len()).map_err(|e| e.to_string())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, outcome) in outcomes.iter().enumerate() {
        if i % 4 == 0 {
            assert!(outcome.as_ref().unwrap_err().starts_with("internal fault"));
        } else {
            assert_eq!(outcome, &Ok(6));
        }
    }
}

#[test]
fn test_handle_reports_errors_as_data() {
    let service = SearchService::new(PagedBackend::new(hits(2), 2, 2), config(2));

    let reply = service.handle(&spec());
    assert!(reply.is_ok());
    assert_eq!(reply.results.len(), 2);

    let reply = service.handle(&SearchSpec::new("users", "key-1", "{ 'city' in [:] }"));
    assert!(!reply.is_ok());
    assert!(reply.results.is_empty());
    assert!(reply.error.unwrap().starts_with("structural error"));
}

#[test]
fn test_search_with_cancel() {
    let service = SearchService::new(PagedBackend::new(hits(6), 2, 6), config(2));
    let flag = CancelFlag::new();
    flag.cancel();

    assert!(matches!(
        service.search_with_cancel(&spec(), &flag),
        Err(SearchError::Cancelled { collected: 2, total: 6 })
    ));
}
