//! Calendar heatmap layout.
//!
//! Days are placed on a weekday × week grid the way a GitHub contribution
//! chart does it: rows are Monday-based weekdays, columns are Sunday-aligned
//! weeks counted from the week containing January 1st.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::aggregate::FinishEvent;
use crate::error::{Error, Result};

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Number of week columns in a typical year.
pub const GRID_WEEKS: usize = 53;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Weekdays as rows, weeks as columns.
    #[default]
    Landscape,
    /// Weeks as rows, weekdays as columns.
    Portrait,
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "landscape" => Ok(Orientation::Landscape),
            "portrait" => Ok(Orientation::Portrait),
            _ => Err(Error::InvalidOrientation(s.to_string())),
        }
    }
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Finish events on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u32,
}

/// A daily count projected onto grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub week_index: usize,
    pub weekday_index: usize,
    pub count: u32,
}

/// Monday-based day of week, 0 = Monday .. 6 = Sunday.
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

/// Sunday-aligned week of the year, 0-based. Week 0 is the week holding
/// January 1st; every Sunday after it opens a new week.
///
/// Matches `strftime("%U")` except in years starting on a Sunday, where
/// `%U` leaves week 0 empty and this does not.
pub fn week_index(date: NaiveDate) -> usize {
    let ordinal0 = date.ordinal0() as i64;
    let from_sunday = date.weekday().num_days_from_sunday() as i64;
    let jan1_from_sunday = (from_sunday - ordinal0).rem_euclid(7);
    ((ordinal0 + jan1_from_sunday) / 7) as usize
}

/// Week columns needed for `year`: 53, or 54 for a leap year starting on a
/// Saturday (its December 31st spills into a week of its own).
pub fn weeks_in_year(year: i32) -> Result<usize> {
    let last = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(Error::InvalidYear(year))?;
    Ok((week_index(last) + 1).max(GRID_WEEKS))
}

fn days_of_year(year: i32) -> Result<impl Iterator<Item = NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(Error::InvalidYear(year))?;
    Ok(first.iter_days().take_while(move |d| d.year() == year))
}

/// Per-day finish counts for every day of `year`, zero-filled.
pub fn daily_counts(events: &[FinishEvent], year: i32) -> Result<Vec<DailyCount>> {
    let mut counts: HashMap<NaiveDate, u32> = HashMap::new();
    for event in events.iter().filter(|e| e.finish_date.year() == year) {
        *counts.entry(event.finish_date).or_insert(0) += 1;
    }

    Ok(days_of_year(year)?
        .map(|date| DailyCount {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect())
}

pub fn cells(daily: &[DailyCount]) -> Vec<CalendarCell> {
    daily
        .iter()
        .map(|day| CalendarCell {
            week_index: week_index(day.date),
            weekday_index: weekday_index(day.date),
            count: day.count,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisTick {
    pub position: usize,
    pub label: String,
}

/// Tick labels for both grid axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisLabels {
    pub rows: Vec<AxisTick>,
    pub columns: Vec<AxisTick>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapLayout {
    pub year: i32,
    pub orientation: Orientation,
    /// `grid[row][column]`; 7 × weeks in landscape, weeks × 7 in portrait.
    pub grid: Vec<Vec<u32>>,
    /// Week index of the 1st of each month.
    pub month_positions: Vec<usize>,
    pub axis_labels: AxisLabels,
}

impl HeatmapLayout {
    pub fn total(&self) -> u64 {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .map(|&c| u64::from(c))
            .sum()
    }

    pub fn max_count(&self) -> u32 {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }
}

/// Lay a full year of daily counts out on the calendar grid.
///
/// `daily` must hold every day from January 1st to December 31st of one
/// year, in order.
pub fn layout(daily: &[DailyCount], orientation: Orientation) -> Result<HeatmapLayout> {
    let year = daily
        .first()
        .map(|d| d.date.year())
        .ok_or_else(|| Error::IncompleteYear("no days given".to_string()))?;

    let expected: Vec<NaiveDate> = days_of_year(year)?.collect();
    if daily.len() != expected.len() {
        return Err(Error::IncompleteYear(format!(
            "expected {} days for {}, got {}",
            expected.len(),
            year,
            daily.len()
        )));
    }
    if let Some((got, want)) = daily
        .iter()
        .zip(&expected)
        .find(|(day, want)| day.date != **want)
    {
        return Err(Error::IncompleteYear(format!(
            "found {} where {} was expected",
            got.date, want
        )));
    }

    let weeks = weeks_in_year(year)?;
    let mut grid = vec![vec![0u32; weeks]; 7];
    for cell in cells(daily) {
        grid[cell.weekday_index][cell.week_index] = cell.count;
    }

    let month_positions: Vec<usize> = (1..=12)
        .filter_map(|month| NaiveDate::from_ymd_opt(year, month, 1))
        .map(week_index)
        .collect();

    let weekday_ticks: Vec<AxisTick> = WEEKDAY_LABELS
        .iter()
        .enumerate()
        .map(|(position, label)| AxisTick {
            position,
            label: label.to_string(),
        })
        .collect();
    let month_ticks: Vec<AxisTick> = month_positions
        .iter()
        .zip(MONTH_LABELS)
        .map(|(&position, label)| AxisTick {
            position,
            label: label.to_string(),
        })
        .collect();

    let (grid, axis_labels) = match orientation {
        Orientation::Landscape => (
            grid,
            AxisLabels {
                rows: weekday_ticks,
                columns: month_ticks,
            },
        ),
        Orientation::Portrait => (
            transpose(&grid),
            AxisLabels {
                rows: month_ticks,
                columns: weekday_ticks,
            },
        ),
    };

    Ok(HeatmapLayout {
        year,
        orientation,
        grid,
        month_positions,
        axis_labels,
    })
}

fn transpose(grid: &[Vec<u32>]) -> Vec<Vec<u32>> {
    let width = grid.first().map(Vec::len).unwrap_or(0);
    (0..width)
        .map(|col| grid.iter().map(|row| row[col]).collect())
        .collect()
}

/// Activity summary over a year of daily counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapStats {
    pub total_books: u64,
    pub max_books_day: u32,
    pub active_days: usize,
    pub average_per_active_day: Option<f64>,
    /// Up to five busiest days, most books first.
    pub busiest_days: Vec<DailyCount>,
}

impl HeatmapStats {
    pub fn from_daily(daily: &[DailyCount]) -> Self {
        let total_books: u64 = daily.iter().map(|d| u64::from(d.count)).sum();
        let max_books_day = daily.iter().map(|d| d.count).max().unwrap_or(0);

        let mut active: Vec<DailyCount> = daily.iter().filter(|d| d.count > 0).copied().collect();
        let active_days = active.len();
        let average_per_active_day =
            (active_days > 0).then(|| total_books as f64 / active_days as f64);

        active.sort_by(|a, b| b.count.cmp(&a.count).then(a.date.cmp(&b.date)));
        active.truncate(5);

        Self {
            total_books,
            max_books_day,
            active_days,
            average_per_active_day,
            busiest_days: active,
        }
    }
}
