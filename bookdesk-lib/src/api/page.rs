//! Page addressing and page fetching.

use std::fmt;

use crate::error::Error;
use crate::error::TableError;
use crate::model::Book;

use super::CatalogSource;
use super::enrich_all;

/// Number of rows per page, restricted to the sizes the table offers.
///
/// # Example
///
/// ```
/// use bookdesk_lib::api::PageSize;
///
/// let size = PageSize::new(20).unwrap();
/// assert_eq!(size.get(), 20);
/// assert!(PageSize::new(15).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(usize);

impl PageSize {
    /// Sizes offered by the page size selector.
    pub const ALLOWED: [usize; 4] = [10, 20, 50, 100];

    /// Validates `size` against [`PageSize::ALLOWED`].
    pub fn new(size: usize) -> Result<Self, TableError> {
        if Self::ALLOWED.contains(&size) {
            Ok(Self(size))
        } else {
            Err(TableError::PageSize(size))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(10)
    }
}

impl TryFrom<usize> for PageSize {
    type Error = TableError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A page index paired with the page size it was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub index: usize,
    pub size: PageSize,
}

impl PageRequest {
    pub fn new(index: usize, size: PageSize) -> Self {
        Self { index, size }
    }

    /// The first page at `size`.
    pub fn first(size: PageSize) -> Self {
        Self::new(0, size)
    }

    /// Offset of the first record of this page in the remote listing.
    pub fn offset(&self) -> usize {
        self.index.saturating_mul(self.size.get())
    }
}

/// One page of enriched books.
#[derive(Debug, Clone)]
pub struct Page {
    request: PageRequest,
    books: Vec<Book>,
    /// Rows whose author lookup failed and were filled with sentinels.
    degraded: usize,
}

impl Page {
    pub fn new(request: PageRequest, books: Vec<Book>) -> Self {
        Self {
            request,
            books,
            degraded: 0,
        }
    }

    /// Records how many rows fell back to sentinel author details.
    pub fn with_degraded(mut self, degraded: usize) -> Self {
        self.degraded = degraded;
        self
    }

    pub fn request(&self) -> PageRequest {
        self.request
    }

    /// Returns a reference to the books in this page.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Consumes the page and returns the books.
    pub fn into_books(self) -> Vec<Book> {
        self.books
    }

    /// Number of rows whose author lookup failed.
    pub fn degraded(&self) -> usize {
        self.degraded
    }

    /// Returns `true` if this page has no books.
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Returns the number of books in this page.
    pub fn len(&self) -> usize {
        self.books.len()
    }
}

/// Fetches one page of works and enriches every row with author details.
///
/// Only a failed listing request fails the page. Author lookups that fail
/// leave their own row with sentinel values.
pub async fn fetch_page<S>(source: &S, request: PageRequest) -> Result<Page, Error>
where
    S: CatalogSource + ?Sized,
{
    let stubs = source.list_works(request).await?;
    let (books, degraded) = enrich_all(source, stubs).await;

    if degraded > 0 {
        log::warn!(
            "page {} (size {}): {} author lookups failed",
            request.index,
            request.size,
            degraded
        );
    }

    Ok(Page::new(request, books).with_degraded(degraded))
}
