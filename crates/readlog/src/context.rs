use std::path::Path;

use anyhow::{Context, Result};
use readlog_core::{book_rows, BookRow};
use readlog_library::{read_export, CoverStore};
use tracing::info;

/// Everything a view needs for one run.
pub struct RunContext {
    pub year: i32,
    pub rows: Vec<BookRow>,
    pub covers: CoverStore,
}

impl RunContext {
    /// Load and validate the export. A row without its identity fields
    /// aborts the run.
    pub fn load(csv: &Path, covers_dir: &Path, year: i32) -> Result<Self> {
        let records =
            read_export(csv).with_context(|| format!("Failed to load {}", csv.display()))?;
        let rows = book_rows(&records)
            .with_context(|| format!("Invalid row in {}", csv.display()))?;

        info!("Loaded {} books from {}", rows.len(), csv.display());

        Ok(Self {
            year,
            rows,
            covers: CoverStore::with_dir(covers_dir),
        })
    }

    /// The message every view prints when the year has no finished books.
    pub fn no_books_message(&self) -> String {
        format!("No books found for {}", self.year)
    }
}
