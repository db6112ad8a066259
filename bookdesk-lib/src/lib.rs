//! Book catalog table library
//!
//! Fetches pages of works from a book catalog (Open Library by default),
//! enriches them with author details, and drives a searchable, sortable,
//! inline-editable table over the fetched page with CSV export.

pub mod api;
pub mod cache;
pub mod error;
pub mod export;
pub mod model;
pub mod rate_limit;
pub mod table;

mod client;

pub use client::*;
