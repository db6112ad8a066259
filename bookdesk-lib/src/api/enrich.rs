//! Per-row author enrichment.

use std::collections::HashMap;
use std::collections::HashSet;

use futures::future::join_all;

use crate::error::Error;
use crate::model::AuthorDoc;
use crate::model::Book;
use crate::model::BookStub;

use super::CatalogSource;

/// Outcome of one author lookup.
#[derive(Debug)]
pub enum Enrichment {
    /// The search returned at least one author.
    Found(AuthorDoc),
    /// The search returned no authors.
    Empty,
    /// The lookup failed; the row keeps sentinel values.
    Failed(Error),
}

impl Enrichment {
    /// The author details to merge into the row, if any.
    pub fn doc(&self) -> Option<&AuthorDoc> {
        match self {
            Self::Found(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// The name to look up for `stub`: its first listed author, if non-empty.
fn author_of(stub: &BookStub) -> Option<&str> {
    stub.first_author().filter(|name| !name.is_empty())
}

/// Looks up one author by name.
pub async fn lookup_author<S>(source: &S, name: &str) -> Enrichment
where
    S: CatalogSource + ?Sized,
{
    match source.search_author(name).await {
        Ok(Some(doc)) => Enrichment::Found(doc),
        Ok(None) => Enrichment::Empty,
        Err(e) => {
            log::warn!("author lookup for '{}' failed: {}", name, e);
            Enrichment::Failed(e)
        }
    }
}

/// Enriches every stub, preserving listing order.
///
/// Each distinct author is looked up once, all lookups running
/// concurrently. Works without an author are not looked up. Returns the
/// books and the number of rows whose lookup failed.
pub async fn enrich_all<S>(source: &S, stubs: Vec<BookStub>) -> (Vec<Book>, usize)
where
    S: CatalogSource + ?Sized,
{
    let mut seen = HashSet::new();
    let names: Vec<&str> = stubs
        .iter()
        .filter_map(author_of)
        .filter(|name| seen.insert(*name))
        .collect();

    let results = join_all(names.iter().map(|name| lookup_author(source, name))).await;
    let by_name: HashMap<String, Enrichment> = names
        .into_iter()
        .map(str::to_string)
        .zip(results)
        .collect();

    let mut degraded = 0;
    let books = stubs
        .into_iter()
        .map(|stub| {
            let enrichment = author_of(&stub).and_then(|name| by_name.get(name));
            if enrichment.is_some_and(Enrichment::is_failed) {
                degraded += 1;
            }
            Book::enriched(stub, enrichment.and_then(Enrichment::doc))
        })
        .collect();

    (books, degraded)
}
