mod app;
mod args;
mod input;
mod paths;
mod render;

use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use bookdesk_lib::CatalogClient;
use bookdesk_lib::rate_limit::{ConcurrencyLimiter, RetryConfig};
use bookdesk_lib::table::TableController;
use clap::Parser;
use simplelog::{Config, WriteLogger};

use crate::app::App;
use crate::args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(&args);

    let client = match CatalogClient::builder()
        .url(&args.base_url)
        .subject(&args.subject)
        .timeout(Duration::from_secs(args.timeout_secs))
        .connect_timeout(Duration::from_secs(args.timeout_secs.min(10)))
        .concurrency_limiter(ConcurrencyLimiter::new(args.concurrency))
        .retry_config(RetryConfig::default().max_retries(args.retries))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build client: {}", e);
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "Browsing subject '{}' at {} ({} rows per page)",
        client.subject(),
        client.base_url(),
        args.page_size()
    );

    let controller = TableController::new(Arc::new(client), args.page_size());

    if let Err(e) = App::new(controller, args.output.clone()).run().await {
        log::error!("Input error: {}", e);
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Logs go to a rotated file in the cache directory so they never mix with
/// the table on stdout. Without a cache directory logging is off.
fn init_logging(args: &Args) {
    paths::rotate_logs();

    let Some(path) = paths::log_file() else {
        return;
    };
    match File::create(&path) {
        Ok(file) => {
            let _ = WriteLogger::init(args.log_level, Config::default(), file);
        }
        Err(e) => eprintln!("Logging disabled, cannot create {}: {}", path.display(), e),
    }
}
