//! Session-scoped lookup caching
//!
//! Author details are looked up once per name and reused across pages for
//! the lifetime of the client. Nothing is persisted.

mod memory;

pub use memory::*;

use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;

/// A stored lookup result and the moment it stops being served.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    pub value: V,
    pub expires_at: DateTime<Utc>,
}

impl<V> Entry<V> {
    /// An entry that lives for `ttl` from now. A TTL reaching past the
    /// latest representable date never expires.
    pub fn new(value: V, ttl: Duration) -> Self {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { value, expires_at }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
