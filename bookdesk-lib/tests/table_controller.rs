//! Table controller tests against in-memory catalog sources.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use tokio::sync::oneshot;

use bookdesk_lib::api::{CatalogSource, PageRequest, PageSize, fetch_page};
use bookdesk_lib::error::{ApiError, Error};
use bookdesk_lib::model::{AuthorDoc, BookStub, UNKNOWN};
use bookdesk_lib::table::{Applied, Column, Command, SortSpec, TableController};

/// Serves `size` generated works per page, authored round-robin by
/// "Author 0".."Author 2".
#[derive(Default)]
struct MockSource {
    authors: HashMap<String, AuthorDoc>,
    failing_authors: HashSet<String>,
    fail_listing: AtomicBool,
    listings: Mutex<Vec<PageRequest>>,
    author_lookups: AtomicUsize,
}

impl MockSource {
    fn with_author(mut self, name: &str, birth_date: &str, top_work: &str) -> Self {
        self.authors
            .insert(name.to_string(), AuthorDoc::new(birth_date, top_work));
        self
    }

    fn with_failing_author(mut self, name: &str) -> Self {
        self.failing_authors.insert(name.to_string());
        self
    }

    fn listing_count(&self) -> usize {
        self.listings.lock().unwrap().len()
    }
}

fn works(request: PageRequest) -> Vec<BookStub> {
    (0..request.size.get())
        .map(|i| {
            let n = request.offset() + i;
            BookStub::new(format!("Book {}", n), format!("Author {}", n % 3))
                .with_year(2000 - n as i32)
        })
        .collect()
}

#[async_trait]
impl CatalogSource for MockSource {
    async fn list_works(&self, request: PageRequest) -> Result<Vec<BookStub>, Error> {
        self.listings.lock().unwrap().push(request);
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(ApiError::http(503, "Service Unavailable").into());
        }
        Ok(works(request))
    }

    async fn search_author(&self, name: &str) -> Result<Option<AuthorDoc>, Error> {
        self.author_lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing_authors.contains(name) {
            return Err(ApiError::http(500, "Internal Server Error").into());
        }
        Ok(self.authors.get(name).cloned())
    }
}

fn size(n: usize) -> PageSize {
    PageSize::new(n).unwrap()
}

// =============================================================================
// Fetching
// =============================================================================

#[tokio::test]
async fn test_empty_author_lookups_fill_unknown() {
    let source = MockSource::default();

    let page = fetch_page(&source, PageRequest::first(size(10))).await.unwrap();

    assert_eq!(page.len(), 10);
    assert_eq!(page.degraded(), 0);
    for book in page.books() {
        assert_eq!(book.author_birth_date, UNKNOWN);
        assert_eq!(book.author_top_work, UNKNOWN);
    }
    // Ten works by three distinct authors
    assert_eq!(source.author_lookups.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_shared_author_is_looked_up_once_per_page() {
    let source = MockSource::default()
        .with_author("Author 0", "1900", "First")
        .with_failing_author("Author 1");

    let page = fetch_page(&source, PageRequest::first(size(20))).await.unwrap();

    assert_eq!(source.author_lookups.load(Ordering::SeqCst), 3);
    // Books 1, 4, 7, 10, 13, 16, 19 share the failing author
    assert_eq!(page.degraded(), 7);
    let by_first: Vec<&str> = page
        .books()
        .iter()
        .filter(|b| b.first_author() == Some("Author 0"))
        .map(|b| b.author_top_work.as_str())
        .collect();
    assert_eq!(by_first.len(), 7);
    assert!(by_first.iter().all(|top| *top == "First"));
}

#[tokio::test]
async fn test_enrichment_preserves_listing_order() {
    let source = MockSource::default().with_author("Author 1", "1950", "Opus");

    let page = fetch_page(&source, PageRequest::new(1, size(10))).await.unwrap();

    let titles: Vec<&str> = page.books().iter().map(|b| b.title.as_str()).collect();
    let expected: Vec<String> = (10..20).map(|n| format!("Book {}", n)).collect();
    assert_eq!(titles, expected);

    // Book 10 is by Author 1
    assert_eq!(page.books()[0].author_birth_date, "1950");
    assert_eq!(page.books()[0].author_top_work, "Opus");
    assert_eq!(page.books()[1].author_birth_date, UNKNOWN);
}

#[tokio::test]
async fn test_failed_lookup_degrades_only_its_rows() {
    let source = MockSource::default()
        .with_author("Author 0", "1900", "First")
        .with_author("Author 2", "1920", "Third")
        .with_failing_author("Author 1");

    let page = fetch_page(&source, PageRequest::first(size(10))).await.unwrap();

    assert_eq!(page.len(), 10);
    assert_eq!(page.degraded(), 3);
    for book in page.books() {
        match book.first_author() {
            Some("Author 1") => assert_eq!(book.author_top_work, UNKNOWN),
            Some("Author 0") => assert_eq!(book.author_top_work, "First"),
            _ => assert_eq!(book.author_top_work, "Third"),
        }
    }
}

#[tokio::test]
async fn test_listing_failure_fails_page() {
    let source = MockSource::default();
    source.fail_listing.store(true, Ordering::SeqCst);

    let result = fetch_page(&source, PageRequest::first(size(10))).await;

    assert!(matches!(result, Err(Error::Api(ApiError::Http { status: 503, .. }))));
    assert_eq!(source.author_lookups.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Controller
// =============================================================================

#[tokio::test]
async fn test_only_page_changes_fetch() {
    let source = Arc::new(MockSource::default());
    let mut controller = TableController::new(Arc::clone(&source), size(10));

    assert_eq!(
        controller.load().await,
        Applied::Loaded { rows: 10, degraded: 0 }
    );

    controller.run(Command::SetSearch("author 2".into())).await.unwrap();
    controller.run(Command::SortBy(Column::Title)).await.unwrap();
    assert_eq!(source.listing_count(), 1);

    controller.run(Command::NextPage).await.unwrap();
    controller.run(Command::SetPageSize(size(20))).await.unwrap();
    assert_eq!(source.listing_count(), 3);

    let listings = source.listings.lock().unwrap().clone();
    assert_eq!(listings[1].offset(), 10);
    assert_eq!(listings[2], PageRequest::new(0, size(20)));
}

#[tokio::test]
async fn test_search_and_sort_operate_on_fetched_page() {
    let source = Arc::new(MockSource::default());
    let mut controller = TableController::new(source, size(10));
    controller.load().await;

    controller.run(Command::SetSearch("AUTHOR 1".into())).await.unwrap();
    controller
        .run(Command::SortBy(Column::FirstPublishYear))
        .await
        .unwrap();

    let view = controller.state().view();
    let titles: Vec<&str> = view.rows.iter().map(|r| r.book.title.as_str()).collect();
    assert_eq!(titles, vec!["Book 7", "Book 4", "Book 1"]);
    assert_eq!(view.sort, Some(SortSpec::asc(Column::FirstPublishYear)));
    assert_eq!(view.rows[0].index, 7);
}

#[tokio::test]
async fn test_stale_response_does_not_overwrite_newer_page_size() {
    let source = Arc::new(MockSource::default());
    let mut controller = TableController::new(source, size(10));

    let first = controller.reload();
    let slow = controller.fetch(first);

    let second = controller
        .dispatch(Command::SetPageSize(size(20)))
        .unwrap()
        .unwrap();
    let fast = controller.fetch(second);

    assert_eq!(
        controller.apply(fast.await),
        Applied::Loaded { rows: 20, degraded: 0 }
    );
    assert_eq!(controller.apply(slow.await), Applied::Stale);

    assert_eq!(controller.state().rows().len(), 20);
    assert_eq!(controller.state().page_size(), size(20));
    assert!(!controller.state().loading());
}

/// Holds size-10 listings until the gate opens.
struct GatedSource {
    inner: MockSource,
    gate: tokio::sync::Mutex<Option<oneshot::Receiver<()>>>,
}

#[async_trait]
impl CatalogSource for GatedSource {
    async fn list_works(&self, request: PageRequest) -> Result<Vec<BookStub>, Error> {
        if request.size.get() == 10 {
            let gate = self.gate.lock().await.take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
        }
        self.inner.list_works(request).await
    }

    async fn search_author(&self, name: &str) -> Result<Option<AuthorDoc>, Error> {
        self.inner.search_author(name).await
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stale_guard_with_spawned_fetches() {
    let (open, gate) = oneshot::channel();
    let source = Arc::new(GatedSource {
        inner: MockSource::default(),
        gate: tokio::sync::Mutex::new(Some(gate)),
    });
    let mut controller = TableController::new(source, size(10));

    let first = controller.reload();
    let in_flight = tokio::spawn(controller.fetch(first));

    let second = controller
        .dispatch(Command::SetPageSize(size(20)))
        .unwrap()
        .unwrap();
    let outcome = controller.fetch(second).await;
    controller.apply(outcome);

    open.send(()).unwrap();
    let late = in_flight.await.unwrap();

    assert!(late.result.is_ok());
    assert_eq!(controller.apply(late), Applied::Stale);
    assert_eq!(controller.state().rows().len(), 20);
}

#[tokio::test]
async fn test_failed_load_keeps_rows_and_allows_retry() {
    let source = Arc::new(MockSource::default());
    let mut controller = TableController::new(Arc::clone(&source), size(10));
    controller.load().await;

    source.fail_listing.store(true, Ordering::SeqCst);
    let applied = controller.run(Command::NextPage).await.unwrap();

    assert_eq!(applied, Some(Applied::Failed));
    assert!(!controller.state().loading());
    assert_eq!(controller.state().rows()[0].title, "Book 0");
    assert_eq!(controller.state().page_index(), 0);
    assert_eq!(controller.state().view().page_index, 0);
    assert!(controller.state().notice().is_some());

    // Export matches the page shown
    let csv = controller.export_csv().unwrap();
    assert!(csv.lines().nth(1).unwrap().starts_with("Book 0,"));

    source.fail_listing.store(false, Ordering::SeqCst);
    let applied = controller.run(Command::NextPage).await.unwrap();

    assert_eq!(applied, Some(Applied::Loaded { rows: 10, degraded: 0 }));
    assert_eq!(controller.state().rows()[0].title, "Book 10");
    assert_eq!(controller.state().page_index(), 1);
    assert_eq!(controller.state().notice(), None);

    source.fail_listing.store(true, Ordering::SeqCst);
    controller.run(Command::Reload).await.unwrap();
    source.fail_listing.store(false, Ordering::SeqCst);
    let applied = controller.run(Command::Reload).await.unwrap();

    assert_eq!(applied, Some(Applied::Loaded { rows: 10, degraded: 0 }));
    assert_eq!(controller.state().rows()[0].title, "Book 10");
}

#[tokio::test]
async fn test_edit_round_trip() {
    let source = Arc::new(MockSource::default());
    let mut controller = TableController::new(source, size(10));
    controller.load().await;
    let before = controller.state().rows()[3].clone();

    controller.run(Command::BeginEdit(3)).await.unwrap();
    controller
        .run(Command::UpdateDraft {
            field: "author_top_work".into(),
            value: "Edited".into(),
        })
        .await
        .unwrap();
    controller.run(Command::CommitEdit).await.unwrap();

    let after = &controller.state().rows()[3];
    assert_eq!(after.author_top_work, "Edited");
    assert_eq!(after.title, before.title);
    assert_eq!(after.authors, before.authors);
    assert_eq!(after.author_birth_date, before.author_birth_date);
    assert_eq!(controller.state().editing_index(), None);
}

#[tokio::test]
async fn test_export_ignores_search_and_sort() {
    let source = Arc::new(MockSource::default());
    let mut controller = TableController::new(source, size(10));
    controller.load().await;

    controller.run(Command::BeginEdit(0)).await.unwrap();
    controller
        .run(Command::UpdateDraft {
            field: "title".into(),
            value: "Book 0, revised".into(),
        })
        .await
        .unwrap();
    controller.run(Command::CommitEdit).await.unwrap();
    controller.run(Command::SetSearch("author 2".into())).await.unwrap();
    controller
        .run(Command::SortBy(Column::FirstPublishYear))
        .await
        .unwrap();

    let csv = controller.export_csv().unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 11);
    assert!(lines[0].starts_with("title,authors[0].name,"));
    assert!(lines[1].starts_with("\"Book 0, revised\",Author 0,2000,"));
    assert!(lines[10].starts_with("Book 9,Author 0,1991,"));
    assert_eq!(csv, controller.export_csv().unwrap());
}
