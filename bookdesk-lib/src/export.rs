//! CSV export of fetched rows.

use std::io;
use std::path::Path;

use crate::error::Error;
use crate::model::Book;
use crate::table::Column;

/// File name offered for downloads.
pub const DEFAULT_FILE_NAME: &str = "books.csv";

/// Encodes `rows` as CSV with one column per entry of `columns`.
///
/// The header row holds the column accessor names. Missing values (no author,
/// no year) are written as empty fields. Fields containing commas, quotes or
/// newlines are quoted.
pub fn export_csv(rows: &[Book], columns: &[Column]) -> Result<String, Error> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    wtr.write_record(columns.iter().map(|column| column.accessor()))?;

    for book in rows {
        wtr.write_record(
            columns
                .iter()
                .map(|column| column.value(book).unwrap_or_default()),
        )?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Encodes `rows` and writes them to `path`.
pub fn write_csv(path: &Path, rows: &[Book], columns: &[Column]) -> Result<(), Error> {
    let csv = export_csv(rows, columns)?;
    std::fs::write(path, csv)?;
    log::info!("exported {} rows to {}", rows.len(), path.display());
    Ok(())
}
