use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One row of the reading-log export as it comes off disk.
///
/// Every column is optional here; identity fields are checked when the
/// record is turned into a [`BookRow`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    #[serde(rename = "Book Id")]
    pub book_id: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Author")]
    pub author: Option<String>,
    /// Raw session field, e.g. `"2024-01-01,2024-01-15;,2024-03-10"`
    #[serde(rename = "read_dates")]
    pub read_dates: Option<String>,
}

/// A book with its identity fields present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRow {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub read_dates: Option<String>,
}

impl BookRow {
    pub fn new(
        book_id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        read_dates: Option<&str>,
    ) -> Self {
        Self {
            book_id: book_id.into(),
            title: title.into(),
            author: author.into(),
            read_dates: read_dates.map(str::to_string),
        }
    }

    /// Validate an export record. `row` is the 0-based data row index used
    /// in the error.
    pub fn from_record(row: usize, record: &ExportRecord) -> Result<Self> {
        Ok(Self {
            book_id: required(row, "Book Id", &record.book_id)?,
            title: required(row, "Title", &record.title)?,
            author: required(row, "Author", &record.author)?,
            read_dates: record.read_dates.clone(),
        })
    }
}

fn required(row: usize, field: &'static str, value: &Option<String>) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Error::MissingField { row, field }),
    }
}

/// Validate every record, failing on the first row with a missing identity.
pub fn book_rows(records: &[ExportRecord]) -> Result<Vec<BookRow>> {
    records
        .iter()
        .enumerate()
        .map(|(row, record)| BookRow::from_record(row, record))
        .collect()
}
