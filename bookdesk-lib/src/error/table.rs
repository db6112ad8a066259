//! Table command errors

/// Errors raised by table commands that reference state that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// The row index is past the end of the fetched rows.
    #[error("Row {index} out of range ({len} rows loaded)")]
    RowOutOfRange { index: usize, len: usize },

    /// The page size is not one of the offered sizes.
    #[error("Page size {0} not allowed (expected one of 10, 20, 50, 100)")]
    PageSize(usize),

    /// `commit` was called with no draft open.
    #[error("No edit in progress")]
    NoEdit,
}
