//! Data model for catalog records

mod author;
mod book;

pub use author::*;
pub use book::*;
