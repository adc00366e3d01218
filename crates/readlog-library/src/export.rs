use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use readlog_core::ExportRecord;
use tracing::debug;

use crate::error::{LibraryError, Result};

/// Columns the export must carry. Anything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 4] = ["Book Id", "Title", "Author", "read_dates"];

/// Default export file name.
pub const DEFAULT_EXPORT_FILE: &str = "goodreads_library_export.csv";

/// Load every row of a reading-log export.
pub fn read_export(path: &Path) -> Result<Vec<ExportRecord>> {
    let file = File::open(path).map_err(|source| LibraryError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_export_from(file)?;
    debug!("Loaded {} rows from {:?}", records.len(), path);
    Ok(records)
}

/// Load export rows from any reader, checking the header first.
pub fn read_export_from<R: Read>(reader: R) -> Result<Vec<ExportRecord>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LibraryError::MissingColumn(column.to_string()));
        }
    }

    reader
        .deserialize::<ExportRecord>()
        .enumerate()
        .map(|(row, result)| result.map_err(|source| LibraryError::Row { row, source }))
        .collect()
}
