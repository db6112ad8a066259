//! Subject listing endpoint.

use serde::Deserialize;
use url::Url;

use crate::CatalogClient;
use crate::error::Error;
use crate::model::BookStub;

use super::PageRequest;

#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    works: Vec<serde_json::Value>,
}

impl CatalogClient {
    /// URL of the subject listing for `request`.
    ///
    /// `{base}/subjects/{subject}.json?limit={size}&offset={index * size}`
    pub fn listing_url(&self, request: PageRequest) -> Result<Url, Error> {
        let path = format!("subjects/{}.json", urlencoding::encode(&self.inner.subject));
        let mut url = self.endpoint(&path)?;
        url.query_pairs_mut()
            .append_pair("limit", &request.size.to_string())
            .append_pair("offset", &request.offset().to_string());
        Ok(url)
    }

    /// Lists one page of works for the configured subject.
    ///
    /// Expired author details are dropped first so the cache only ever holds
    /// what recent pages needed.
    pub async fn list_works(&self, request: PageRequest) -> Result<Vec<BookStub>, Error> {
        let expired = self.inner.author_cache.gc();
        if expired > 0 {
            log::debug!("dropped {} expired author entries", expired);
        }

        let url = self.listing_url(request)?;
        let response: ListingResponse = self.get_json(&url).await?;
        Ok(parse_works(response.works))
    }
}

/// Converts raw listing entries, replacing unparseable ones with empty stubs.
fn parse_works(works: Vec<serde_json::Value>) -> Vec<BookStub> {
    works
        .into_iter()
        .map(|work| {
            serde_json::from_value(work).unwrap_or_else(|e| {
                log::warn!("malformed work in listing: {}", e);
                BookStub::default()
            })
        })
        .collect()
}
