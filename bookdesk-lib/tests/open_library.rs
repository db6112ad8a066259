//! Live tests against the public Open Library API.
//!
//! These hit the network and are ignored by default. To point them at a
//! mirror, set `BOOKDESK_URL` in a `.env` file in the bookdesk-lib directory.
//!
//! Then run: `cargo test -p bookdesk-lib -- --ignored`

use std::env;

use bookdesk_lib::api::{PageRequest, PageSize, fetch_page};
use bookdesk_lib::model::PLACEHOLDER;
use bookdesk_lib::{CatalogClient, DEFAULT_BASE_URL, DEFAULT_SUBJECT};

fn client() -> CatalogClient {
    let _ = dotenvy::dotenv();
    let url = env::var("BOOKDESK_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    CatalogClient::builder()
        .url(url)
        .subject(DEFAULT_SUBJECT)
        .build()
        .expect("Failed to build client")
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_fetch_first_page() {
    let client = client();

    let page = fetch_page(&client, PageRequest::first(PageSize::default()))
        .await
        .expect("Page fetch failed");

    assert_eq!(page.len(), 10, "Listing should honor the limit");
    for book in page.books() {
        assert!(!book.title.is_empty(), "Every work should have a title");
        assert_eq!(book.subject, PLACEHOLDER);
        assert!(!book.author_birth_date.is_empty());
    }

    println!("Fetched {} books ({} degraded)", page.len(), page.degraded());
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_author_search() {
    let client = client();

    let doc = client
        .search_author("Carl Sagan")
        .await
        .expect("Author search failed")
        .expect("Carl Sagan should be found");

    assert!(doc.top_work().is_some());

    // Second lookup is served from the cache
    let again = client.search_author("Carl Sagan").await.unwrap();
    assert_eq!(again, Some(doc));
}
