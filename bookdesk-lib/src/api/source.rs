//! The seam between the table and the remote catalog.

use std::sync::Arc;

use async_trait::async_trait;

use crate::CatalogClient;
use crate::error::Error;
use crate::model::AuthorDoc;
use crate::model::BookStub;

use super::PageRequest;

/// A source of book listings and author details.
///
/// [`CatalogClient`] is the production implementation; tests substitute
/// in-memory sources.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Lists `request.size` works starting at `request.offset()`.
    async fn list_works(&self, request: PageRequest) -> Result<Vec<BookStub>, Error>;

    /// Looks up an author by name, returning the first match if any.
    async fn search_author(&self, name: &str) -> Result<Option<AuthorDoc>, Error>;
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn list_works(&self, request: PageRequest) -> Result<Vec<BookStub>, Error> {
        CatalogClient::list_works(self, request).await
    }

    async fn search_author(&self, name: &str) -> Result<Option<AuthorDoc>, Error> {
        CatalogClient::search_author(self, name).await
    }
}

#[async_trait]
impl<T: CatalogSource + ?Sized> CatalogSource for Arc<T> {
    async fn list_works(&self, request: PageRequest) -> Result<Vec<BookStub>, Error> {
        (**self).list_works(request).await
    }

    async fn search_author(&self, name: &str) -> Result<Option<AuthorDoc>, Error> {
        (**self).search_author(name).await
    }
}
