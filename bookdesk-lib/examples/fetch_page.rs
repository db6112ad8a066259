//! Fetches one enriched page and prints it.
//!
//! Run with: cargo run --example fetch_page
//!
//! Optional .env entries:
//! - BOOKDESK_URL (default https://openlibrary.org)
//! - BOOKDESK_SUBJECT (default science)

use std::env;
use std::sync::Arc;

use bookdesk_lib::api::PageSize;
use bookdesk_lib::table::Column;
use bookdesk_lib::table::TableController;
use bookdesk_lib::{CatalogClient, DEFAULT_BASE_URL, DEFAULT_SUBJECT};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let url = env::var("BOOKDESK_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let subject = env::var("BOOKDESK_SUBJECT").unwrap_or_else(|_| DEFAULT_SUBJECT.to_string());

    let client = CatalogClient::builder().url(url).subject(subject).build()?;
    let mut controller = TableController::new(Arc::new(client), PageSize::default());

    println!("Fetching page 1...\n");
    let applied = controller.load().await;
    println!("{:?}\n", applied);

    for row in controller.state().view().rows {
        let cells: Vec<String> = Column::ALL
            .iter()
            .map(|column| column.value(row.book).unwrap_or_default())
            .collect();
        println!("{}", cells.join(" | "));
    }

    if let Some(notice) = controller.state().notice() {
        println!("\n{}", notice);
    }

    Ok(())
}
