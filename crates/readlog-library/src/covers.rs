use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use readlog_core::LatestFinish;
use serde::Serialize;

/// Default directory holding `{book_id}.jpg` cover files.
pub const DEFAULT_COVERS_DIR: &str = "./book_covers";

/// Resolves book ids to cover files in a directory.
pub struct CoverStore {
    covers_dir: PathBuf,
}

impl CoverStore {
    pub fn with_dir(covers_dir: impl Into<PathBuf>) -> Self {
        Self {
            covers_dir: covers_dir.into(),
        }
    }

    pub fn covers_dir(&self) -> &Path {
        &self.covers_dir
    }

    /// Where the cover for `book_id` is expected, whether or not it exists.
    pub fn cover_path(&self, book_id: &str) -> PathBuf {
        self.covers_dir.join(format!("{}.jpg", book_id))
    }

    pub fn has_cover(&self, book_id: &str) -> bool {
        self.cover_path(book_id).is_file()
    }

    /// Books from `latest` whose cover file is absent, in input order.
    pub fn missing_covers(&self, latest: &[LatestFinish]) -> Vec<MissingCover> {
        latest
            .iter()
            .filter(|book| !self.has_cover(&book.book_id))
            .map(|book| MissingCover {
                book_id: book.book_id.clone(),
                title: book.title.clone(),
                author: book.author.clone(),
                finish_date: book.finish_date,
                expected_path: self.cover_path(&book.book_id),
            })
            .collect()
    }
}

/// A finished book with no cover on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingCover {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub finish_date: NaiveDate,
    pub expected_path: PathBuf,
}
