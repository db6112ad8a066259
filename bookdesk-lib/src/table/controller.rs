//! Async driver tying [`TableState`] to a [`CatalogSource`].

use std::future::Future;
use std::sync::Arc;

use crate::api::CatalogSource;
use crate::api::Page;
use crate::api::PageSize;
use crate::api::fetch_page;
use crate::error::Error;

use super::Applied;
use super::Command;
use super::FetchRequest;
use super::TableState;

/// The result of running a [`FetchRequest`].
#[derive(Debug)]
pub struct FetchOutcome {
    pub request: FetchRequest,
    pub result: Result<Page, Error>,
}

/// Owns the table state and the source its pages come from.
///
/// Commands go through [`dispatch`](Self::dispatch); any fetch they trigger is
/// returned as a [`FetchRequest`]. Callers either await it inline with
/// [`run`](Self::run) or spawn [`fetch`](Self::fetch) and hand the outcome
/// back through [`apply`](Self::apply) whenever it arrives.
///
/// # Example
///
/// ```ignore
/// let client = Arc::new(CatalogClient::open_library()?);
/// let mut controller = TableController::new(client, PageSize::default());
///
/// controller.load().await;
/// controller.run(Command::SetSearch("sagan".into())).await?;
/// let csv = controller.export_csv()?;
/// ```
pub struct TableController<S: ?Sized> {
    source: Arc<S>,
    state: TableState,
}

impl<S> TableController<S>
where
    S: CatalogSource + ?Sized + 'static,
{
    pub fn new(source: Arc<S>, page_size: PageSize) -> Self {
        Self {
            source,
            state: TableState::new(page_size),
        }
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Applies `command` to the state, returning the fetch it triggered.
    pub fn dispatch(&mut self, command: Command) -> Result<Option<FetchRequest>, Error> {
        self.state.apply(command)
    }

    /// Issues a fetch of the current page.
    pub fn reload(&mut self) -> FetchRequest {
        self.state.reload()
    }

    /// A detached future running `request` against the source.
    pub fn fetch(&self, request: FetchRequest) -> impl Future<Output = FetchOutcome> + Send + 'static {
        let source = Arc::clone(&self.source);
        async move {
            let result = fetch_page(source.as_ref(), request.page).await;
            FetchOutcome { request, result }
        }
    }

    /// Hands a finished fetch back to the state.
    pub fn apply(&mut self, outcome: FetchOutcome) -> Applied {
        self.state.complete(outcome.request, outcome.result)
    }

    /// Fetches the current page and waits for it.
    pub async fn load(&mut self) -> Applied {
        let request = self.reload();
        let outcome = self.fetch(request).await;
        self.apply(outcome)
    }

    /// Dispatches `command` and, if it triggered a fetch, waits for it.
    pub async fn run(&mut self, command: Command) -> Result<Option<Applied>, Error> {
        let Some(request) = self.dispatch(command)? else {
            return Ok(None);
        };
        let outcome = self.fetch(request).await;
        Ok(Some(self.apply(outcome)))
    }

    /// CSV of the fetched rows, ignoring search and sort.
    pub fn export_csv(&self) -> Result<String, Error> {
        self.state.export_csv()
    }
}
