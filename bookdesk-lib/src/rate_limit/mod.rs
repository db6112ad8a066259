//! Request pacing for the catalog client

mod concurrency;
mod retry;

pub use concurrency::ConcurrencyLimiter;
pub use retry::RetryConfig;
pub use retry::Transient;
