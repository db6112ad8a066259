//! Table view state and its transitions.

use crate::api::Page;
use crate::api::PageRequest;
use crate::api::PageSize;
use crate::error::Error;
use crate::error::TableError;
use crate::export::export_csv;
use crate::model::Book;

use super::Column;
use super::SortSpec;
use super::TableView;
use super::ViewRow;
use super::derive_indices;
use super::page_count;

/// A user action on the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetSearch(String),
    SetPage(usize),
    NextPage,
    PreviousPage,
    SetPageSize(PageSize),
    SortBy(Column),
    BeginEdit(usize),
    UpdateDraft { field: String, value: String },
    CommitEdit,
    /// Fetch the current page again, e.g. after a failure.
    Reload,
}

/// A page fetch issued by the state, tagged so its result can be matched
/// back to the request that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: u64,
    pub page: PageRequest,
}

/// The row being edited and its uncommitted copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub index: usize,
    pub draft: Book,
}

/// What happened when a fetch result was handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Rows were replaced.
    Loaded { rows: usize, degraded: usize },
    /// The fetch failed; previous rows are kept.
    Failed,
    /// A newer request superseded this one; nothing changed.
    Stale,
}

/// The complete view model of the book table.
#[derive(Debug, Clone)]
pub struct TableState {
    rows: Vec<Book>,
    loading: bool,
    page_index: usize,
    page_size: PageSize,
    search: String,
    sort: Option<SortSpec>,
    edit: Option<EditState>,
    notice: Option<String>,
    last_request_id: u64,
    pending: Option<FetchRequest>,
    /// The page the current rows came from.
    shown: Option<PageRequest>,
}

impl TableState {
    /// Creates an empty table on the first page. Call [`TableState::reload`]
    /// to issue the initial fetch.
    pub fn new(page_size: PageSize) -> Self {
        Self {
            rows: Vec::new(),
            loading: false,
            page_index: 0,
            page_size,
            search: String::new(),
            sort: None,
            edit: None,
            notice: None,
            last_request_id: 0,
            pending: None,
            shown: None,
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Applies `command`, returning the fetch to run if it changed the page.
    pub fn apply(&mut self, command: Command) -> Result<Option<FetchRequest>, Error> {
        match command {
            Command::SetSearch(text) => self.set_search(text),
            Command::SetPage(index) => return Ok(self.set_page(index)),
            Command::NextPage => return Ok(self.next_page()),
            Command::PreviousPage => return Ok(self.previous_page()),
            Command::SetPageSize(size) => return Ok(self.set_page_size(size)),
            Command::SortBy(column) => self.sort_by(column),
            Command::BeginEdit(index) => self.begin_edit(index)?,
            Command::UpdateDraft { field, value } => self.update_draft_field(&field, value)?,
            Command::CommitEdit => {
                self.commit_edit()?;
            }
            Command::Reload => return Ok(Some(self.reload())),
        }
        Ok(None)
    }

    /// Sets the author search text. Never triggers a fetch.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Moves to page `index`, clamped to the available pages.
    pub fn set_page(&mut self, index: usize) -> Option<FetchRequest> {
        let index = index.min(self.page_count() - 1);
        if index == self.page_index {
            return None;
        }

        self.page_index = index;
        Some(self.issue_fetch())
    }

    pub fn next_page(&mut self) -> Option<FetchRequest> {
        if !self.can_next() {
            return None;
        }
        self.set_page(self.page_index + 1)
    }

    pub fn previous_page(&mut self) -> Option<FetchRequest> {
        if !self.can_previous() {
            return None;
        }
        self.set_page(self.page_index - 1)
    }

    /// Changes the page size, keeping the first visible record's offset on
    /// the new page.
    pub fn set_page_size(&mut self, size: PageSize) -> Option<FetchRequest> {
        if size == self.page_size {
            return None;
        }

        let offset = PageRequest::new(self.page_index, self.page_size).offset();
        self.page_size = size;
        self.page_index = (offset / size.get()).min(self.page_count() - 1);
        Some(self.issue_fetch())
    }

    /// Cycles the sort on `column`. Never triggers a fetch.
    pub fn sort_by(&mut self, column: Column) {
        self.sort = SortSpec::cycle(self.sort, column);
    }

    /// Opens a draft of row `index`, abandoning any previous draft.
    pub fn begin_edit(&mut self, index: usize) -> Result<(), TableError> {
        let Some(book) = self.rows.get(index) else {
            return Err(TableError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        };

        if let Some(previous) = &self.edit {
            log::debug!("abandoning unsaved draft of row {}", previous.index);
        }
        self.edit = Some(EditState {
            index,
            draft: book.clone(),
        });
        Ok(())
    }

    /// Writes `value` into the draft's `field` (a column accessor name).
    pub fn update_draft_field(&mut self, field: &str, value: impl Into<String>) -> Result<(), Error> {
        let column: Column = field.parse()?;
        let edit = self.edit.as_mut().ok_or(TableError::NoEdit)?;
        let value: String = value.into();
        column.set(&mut edit.draft, &value)?;
        Ok(())
    }

    /// Writes the draft back into the rows and closes the edit. Returns the
    /// index of the updated row.
    pub fn commit_edit(&mut self) -> Result<usize, TableError> {
        let edit = self.edit.take().ok_or(TableError::NoEdit)?;
        let len = self.rows.len();
        match self.rows.get_mut(edit.index) {
            Some(row) => {
                *row = edit.draft;
                Ok(edit.index)
            }
            None => Err(TableError::RowOutOfRange {
                index: edit.index,
                len,
            }),
        }
    }

    /// Issues a fetch for the current page.
    pub fn reload(&mut self) -> FetchRequest {
        self.issue_fetch()
    }

    /// Clears the current notice.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn issue_fetch(&mut self) -> FetchRequest {
        self.last_request_id += 1;
        let request = FetchRequest {
            id: self.last_request_id,
            page: self.current_page(),
        };

        log::debug!(
            "fetch #{}: page {} size {}",
            request.id,
            request.page.index,
            request.page.size
        );
        self.pending = Some(request);
        self.loading = true;
        request
    }

    // =========================================================================
    // Fetch completion
    // =========================================================================

    /// Hands back the result of `request`.
    ///
    /// Results for anything but the latest issued request are discarded, so a
    /// slow response for an old page or size never overwrites newer state.
    pub fn complete(&mut self, request: FetchRequest, result: Result<Page, Error>) -> Applied {
        if self.pending != Some(request) || request.page != self.current_page() {
            log::warn!(
                "discarding stale fetch #{} (page {} size {})",
                request.id,
                request.page.index,
                request.page.size
            );
            return Applied::Stale;
        }

        self.pending = None;
        self.loading = false;

        match result {
            Ok(page) => {
                let degraded = page.degraded();
                self.rows = page.into_books();
                self.shown = Some(request.page);
                if let Some(edit) = self.edit.take() {
                    log::debug!("discarding unsaved draft of row {}", edit.index);
                }
                self.notice = (degraded > 0)
                    .then(|| format!("{} rows are missing author details", degraded));

                log::debug!("fetch #{} applied: {} rows", request.id, self.rows.len());
                Applied::Loaded {
                    rows: self.rows.len(),
                    degraded,
                }
            }
            Err(e) => {
                log::error!("fetch #{} failed: {}", request.id, e);
                self.notice = Some(format!(
                    "Could not load page {}: {}",
                    request.page.index + 1,
                    e
                ));
                // Page and size go back to the ones the kept rows belong to
                if let Some(shown) = self.shown {
                    self.page_index = shown.index;
                    self.page_size = shown.size;
                }
                Applied::Failed
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The fetched rows, including committed edits.
    pub fn rows(&self) -> &[Book] {
        &self.rows
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn current_page(&self) -> PageRequest {
        PageRequest::new(self.page_index, self.page_size)
    }

    pub fn page_count(&self) -> usize {
        page_count(self.page_size)
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn edit(&self) -> Option<&EditState> {
        self.edit.as_ref()
    }

    pub fn editing_index(&self) -> Option<usize> {
        self.edit.as_ref().map(|edit| edit.index)
    }

    pub fn draft(&self) -> Option<&Book> {
        self.edit.as_ref().map(|edit| &edit.draft)
    }

    /// Non-blocking message about the last fetch, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// The page the current rows were fetched for, if any load succeeded.
    pub fn shown_page(&self) -> Option<PageRequest> {
        self.shown
    }

    /// The fetch currently awaited, if any.
    pub fn pending(&self) -> Option<FetchRequest> {
        self.pending
    }

    /// Derives the visible window from the current rows and view settings.
    pub fn view(&self) -> TableView<'_> {
        let rows = derive_indices(&self.rows, &self.search, self.sort, self.page_size)
            .into_iter()
            .map(|index| ViewRow {
                index,
                book: &self.rows[index],
            })
            .collect();

        TableView {
            rows,
            page_index: self.page_index,
            page_count: self.page_count(),
            sort: self.sort,
        }
    }

    /// CSV of the fetched rows in fetched order, ignoring search and sort.
    pub fn export_csv(&self) -> Result<String, Error> {
        export_csv(&self.rows, &Column::ALL)
    }
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}
