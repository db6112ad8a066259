//! Author search endpoint.

use serde::Deserialize;
use url::Url;

use crate::CatalogClient;
use crate::error::Error;
use crate::model::AuthorDoc;

#[derive(Debug, Deserialize)]
struct AuthorSearchResponse {
    #[serde(default)]
    docs: Vec<serde_json::Value>,
}

impl CatalogClient {
    /// URL of the author search for `name`.
    pub fn author_search_url(&self, name: &str) -> Result<Url, Error> {
        let mut url = self.endpoint("search/authors.json")?;
        url.set_query(Some(&format!("q={}", urlencoding::encode(name))));
        Ok(url)
    }

    /// Searches authors by name and returns the first hit.
    ///
    /// Results, including empty ones, are cached per name. Failures are not.
    pub async fn search_author(&self, name: &str) -> Result<Option<AuthorDoc>, Error> {
        if let Some(cached) = self.inner.author_cache.get(name) {
            log::debug!("author cache hit for '{}'", name);
            return Ok(cached);
        }

        let url = self.author_search_url(name)?;
        let response: AuthorSearchResponse = self.get_json(&url).await?;
        let doc = first_doc(response.docs);

        self.inner
            .author_cache
            .set(name, doc.clone(), self.inner.author_ttl);
        Ok(doc)
    }
}

fn first_doc(docs: Vec<serde_json::Value>) -> Option<AuthorDoc> {
    docs.into_iter()
        .next()
        .map(|doc| serde_json::from_value(doc).unwrap_or_default())
}
