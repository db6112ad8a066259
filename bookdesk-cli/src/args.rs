//! Command-line arguments.

use std::path::PathBuf;

use bookdesk_lib::api::PageSize;
use bookdesk_lib::export::DEFAULT_FILE_NAME;
use bookdesk_lib::{DEFAULT_BASE_URL, DEFAULT_SUBJECT};
use clap::Parser;
use simplelog::LevelFilter;

#[derive(Debug, Parser)]
#[command(name = "bookdesk", version, about = "Browse, search, edit and export a book catalog page by page")]
pub struct Args {
    /// Catalog host
    #[arg(long, env = "BOOKDESK_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Subject whose works are listed
    #[arg(long, env = "BOOKDESK_SUBJECT", default_value = DEFAULT_SUBJECT)]
    pub subject: String,

    /// Rows per page (10, 20, 50 or 100)
    #[arg(long, default_value_t = 10, value_parser = parse_page_size)]
    pub page_size: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,

    /// Retries for rate-limited, failing or unreachable requests
    #[arg(long, default_value_t = 2)]
    pub retries: u32,

    /// Maximum simultaneous catalog requests
    #[arg(long, default_value_t = 8)]
    pub concurrency: usize,

    /// Default export destination
    #[arg(short, long, default_value = DEFAULT_FILE_NAME)]
    pub output: PathBuf,

    /// Log level written to the session log
    #[arg(long, env = "BOOKDESK_LOG", default_value = "info")]
    pub log_level: LevelFilter,
}

impl Args {
    pub fn page_size(&self) -> PageSize {
        // Validated by the value parser
        PageSize::new(self.page_size).unwrap_or_default()
    }
}

fn parse_page_size(value: &str) -> Result<usize, String> {
    let size: usize = value.parse().map_err(|_| format!("'{}' is not a number", value))?;
    PageSize::new(size).map(PageSize::get).map_err(|e| e.to_string())
}
