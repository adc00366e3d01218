//! # readlog-core
//!
//! Turns the `read_dates` column of a reading-log export into finish events
//! and the data behind every readlog view.
//!
//! ## Pipeline
//!
//! - [`session`] decodes one raw field into finish dates
//! - [`aggregate`] builds per-book [`FinishEvent`]s with reread counts and
//!   ranks, filtered to a year
//! - [`calendar`] lays a year of daily counts out as a heatmap grid
//! - [`sequence`] turns chronological events into labelled frames
//!
//! Nothing here touches the filesystem; loading the export and resolving
//! cover images live in `readlog-library` and the `readlog` binary.
//!
//! ## Usage
//!
//! ```rust
//! use readlog_core::{aggregate_rows, sequence, BookRow};
//!
//! let rows = vec![BookRow::new(
//!     "42",
//!     "The Hobbit",
//!     "J.R.R. Tolkien",
//!     Some("\"2024-01-01,2024-01-10;,2024-06-05\""),
//! )];
//!
//! let events = aggregate_rows(&rows, 2024);
//! let frames = sequence(&events);
//! assert_eq!(frames[1].label_text, "Jun 05, 2024 (Read #2)");
//! ```

pub mod aggregate;
pub mod calendar;
mod error;
pub mod sequence;
pub mod session;
mod types;

pub use aggregate::{
    aggregate, aggregate_rows, finish_events, latest_finishes, FinishEvent, LatestFinish,
    ReadingStats, RereadEntry,
};
pub use calendar::{
    cells, daily_counts, layout, week_index, weekday_index, weeks_in_year, AxisLabels, AxisTick,
    CalendarCell, DailyCount, HeatmapLayout, HeatmapStats, Orientation,
};
pub use error::{Error, Result};
pub use sequence::{group_by_month, label_text, sequence, FrameDescriptor, MonthGroup};
pub use types::{book_rows, BookRow, ExportRecord};
