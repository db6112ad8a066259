//! The filter → sort → paginate pipeline.

use crate::api::PageSize;
use crate::model::Book;

use super::SortSpec;
use super::sort_indices;

/// Record count assumed by the pagination controls.
///
/// The catalog does not report a total, so page count is computed from this
/// fixed number rather than from the listing or the filtered rows.
pub const NOMINAL_TOTAL: usize = 100;

/// Number of pages offered at `size`.
pub fn page_count(size: PageSize) -> usize {
    NOMINAL_TOTAL.div_ceil(size.get())
}

/// Whether `book`'s first author contains `needle`, which must already be
/// lowercased. Books without authors never match.
pub fn matches_search(book: &Book, needle: &str) -> bool {
    book.first_author()
        .is_some_and(|name| name.to_lowercase().contains(needle))
}

/// Indices of the rows matching `search`, in fetched order.
pub fn filter_indices(rows: &[Book], search: &str) -> Vec<usize> {
    let needle = search.to_lowercase();
    rows.iter()
        .enumerate()
        .filter(|(_, book)| matches_search(book, &needle))
        .map(|(index, _)| index)
        .collect()
}

/// Runs the full pipeline and returns the indices of the visible rows.
///
/// The fetched rows already are the remote page at the current offset, so
/// the window always starts at the first derived row.
pub fn derive_indices(
    rows: &[Book],
    search: &str,
    sort: Option<SortSpec>,
    page_size: PageSize,
) -> Vec<usize> {
    let mut indices = filter_indices(rows, search);
    if let Some(spec) = sort {
        sort_indices(rows, &mut indices, spec);
    }
    indices.truncate(page_size.get());
    indices
}

/// A visible row and its position in the fetched rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRow<'a> {
    /// Index into the fetched rows; this is what edits refer to.
    pub index: usize,
    pub book: &'a Book,
}

/// Everything the render layer needs for one frame.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    pub rows: Vec<ViewRow<'a>>,
    pub page_index: usize,
    pub page_count: usize,
    pub sort: Option<SortSpec>,
}

impl TableView<'_> {
    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }
}
