//! Finish events per book, reread bookkeeping and year filtering.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::session;
use crate::types::{book_rows, BookRow, ExportRecord};

/// One (book, session) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishEvent {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub finish_date: NaiveDate,
    /// Sessions recorded for the book across all years.
    pub read_count: usize,
    /// 1-based rank of `finish_date` among the book's finish dates.
    pub read_number: usize,
}

/// Validate the export records and aggregate them for `year`.
///
/// Fails if any record lacks its book id, title or author; session-level
/// problems never fail.
pub fn aggregate(records: &[ExportRecord], year: i32) -> Result<Vec<FinishEvent>> {
    let rows = book_rows(records)?;
    Ok(aggregate_rows(&rows, year))
}

/// Events for `year`, sorted by finish date. Ties keep row order.
pub fn aggregate_rows(rows: &[BookRow], year: i32) -> Vec<FinishEvent> {
    let mut events: Vec<FinishEvent> = finish_events(rows)
        .into_iter()
        .filter(|e| e.finish_date.year() == year)
        .collect();
    events.sort_by_key(|e| e.finish_date);

    debug!("Aggregated {} finish events for {}", events.len(), year);
    events
}

/// Every finish event of every row, unfiltered, in row then token order.
pub fn finish_events(rows: &[BookRow]) -> Vec<FinishEvent> {
    let parsed: Vec<Vec<NaiveDate>> = rows
        .iter()
        .map(|row| session::parse(row.read_dates.as_deref()))
        .collect();

    // Rows sharing a book id rank against each other's dates.
    let mut by_book: HashMap<&str, Vec<NaiveDate>> = HashMap::new();
    for (row, dates) in rows.iter().zip(&parsed) {
        by_book
            .entry(row.book_id.as_str())
            .or_default()
            .extend(dates.iter().copied());
    }

    let mut events = Vec::new();
    for (row, dates) in rows.iter().zip(&parsed) {
        let read_count = dates.len();
        let all_dates = &by_book[row.book_id.as_str()];

        for &finish_date in dates {
            let read_number = if read_count > 1 {
                all_dates.iter().filter(|d| **d <= finish_date).count()
            } else {
                1
            };

            events.push(FinishEvent {
                book_id: row.book_id.clone(),
                title: row.title.clone(),
                author: row.author.clone(),
                finish_date,
                read_count,
                read_number,
            });
        }
    }

    events
}

/// A book's most recent finish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestFinish {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub finish_date: NaiveDate,
}

/// Books whose latest finish falls in `year`, in row order. Books never
/// finished are left out.
pub fn latest_finishes(rows: &[BookRow], year: i32) -> Vec<LatestFinish> {
    rows.iter()
        .filter_map(|row| {
            let latest = session::parse(row.read_dates.as_deref()).into_iter().max()?;
            (latest.year() == year).then(|| LatestFinish {
                book_id: row.book_id.clone(),
                title: row.title.clone(),
                author: row.author.clone(),
                finish_date: latest,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RereadEntry {
    pub title: String,
    pub read_count: usize,
}

/// Summary of a year's finish events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingStats {
    pub year: i32,
    pub unique_books: usize,
    pub total_reads: usize,
    pub reread_books: usize,
    /// Reread books, most-read first.
    pub rereads: Vec<RereadEntry>,
}

impl ReadingStats {
    pub fn from_events(year: i32, events: &[FinishEvent]) -> Self {
        let unique_books = events
            .iter()
            .map(|e| e.book_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        let mut seen = HashSet::new();
        let mut rereads: Vec<RereadEntry> = events
            .iter()
            .filter(|e| e.read_count > 1)
            .filter(|e| seen.insert(e.book_id.as_str()))
            .map(|e| RereadEntry {
                title: e.title.clone(),
                read_count: e.read_count,
            })
            .collect();
        rereads.sort_by(|a, b| b.read_count.cmp(&a.read_count));

        Self {
            year,
            unique_books,
            total_reads: events.len(),
            reread_books: rereads.len(),
            rereads,
        }
    }
}
