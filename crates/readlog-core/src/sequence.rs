//! Display sequencing of finish events for cover renderers.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::aggregate::FinishEvent;

/// One frame of a cover animation or one slot of a cover grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameDescriptor {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub finish_date: NaiveDate,
    pub label_text: String,
}

/// `"Mon DD, YYYY"`, with `" (Read #N)"` for second and later reads.
pub fn label_text(finish_date: NaiveDate, read_number: usize) -> String {
    let mut label = finish_date.format("%b %d, %Y").to_string();
    if read_number > 1 {
        label.push_str(&format!(" (Read #{})", read_number));
    }
    label
}

/// Frames for events already in chronological order. Order is preserved and
/// repeated reads of a book each get their own frame.
pub fn sequence(events: &[FinishEvent]) -> Vec<FrameDescriptor> {
    events
        .iter()
        .map(|e| FrameDescriptor {
            book_id: e.book_id.clone(),
            title: e.title.clone(),
            author: e.author.clone(),
            finish_date: e.finish_date,
            label_text: label_text(e.finish_date, e.read_number),
        })
        .collect()
}

/// Default number of covers per grid row.
pub const DEFAULT_GRID_COLUMNS: usize = 8;

/// The covers finished in one month, laid out in rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGroup {
    /// 1-based month number.
    pub month: u32,
    pub name: String,
    pub rows: usize,
    pub columns: usize,
    pub frames: Vec<FrameDescriptor>,
}

impl MonthGroup {
    /// Row and column of the `index`-th cover.
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.columns, index % self.columns)
    }
}

/// Rows and columns for `count` covers with at most `max_columns` per row.
pub fn grid_shape(count: usize, max_columns: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let columns = count.min(max_columns.max(1));
    ((count - 1) / columns + 1, columns)
}

/// Group frames by month, keeping only months that have covers. Frames keep
/// their sequence order within a month.
pub fn group_by_month(frames: &[FrameDescriptor], max_columns: usize) -> Vec<MonthGroup> {
    let mut groups: Vec<MonthGroup> = Vec::new();

    for frame in frames {
        let month = frame.finish_date.month();
        match groups.iter_mut().find(|g| g.month == month) {
            Some(group) => group.frames.push(frame.clone()),
            None => groups.push(MonthGroup {
                month,
                name: frame.finish_date.format("%B").to_string(),
                rows: 0,
                columns: 0,
                frames: vec![frame.clone()],
            }),
        }
    }

    groups.sort_by_key(|g| g.month);
    for group in &mut groups {
        let (rows, columns) = grid_shape(group.frames.len(), max_columns);
        group.rows = rows;
        group.columns = columns;
    }
    groups
}
