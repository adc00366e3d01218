//! # readlog-library
//!
//! File access for readlog: loading the reading-log CSV export into
//! [`ExportRecord`](readlog_core::ExportRecord)s and locating cover images
//! named `{book_id}.jpg` in a covers directory.

mod covers;
mod error;
mod export;

pub use covers::{CoverStore, MissingCover, DEFAULT_COVERS_DIR};
pub use error::{LibraryError, Result};
pub use export::{read_export, read_export_from, DEFAULT_EXPORT_FILE, REQUIRED_COLUMNS};
