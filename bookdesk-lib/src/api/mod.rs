//! Catalog operations

mod authors;
mod enrich;
mod listing;
mod page;
mod source;

pub use enrich::*;
pub use page::*;
pub use source::*;
