//! Monthly cover grid.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use readlog_core::{aggregate_rows, group_by_month, sequence, MonthGroup};
use readlog_library::CoverStore;
use serde::Serialize;

use crate::context::RunContext;

#[derive(Debug, Serialize)]
struct GridSlot {
    row: usize,
    column: usize,
    book_id: String,
    title: String,
    label_text: String,
    cover: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct GridMonth {
    month: u32,
    name: String,
    rows: usize,
    columns: usize,
    slots: Vec<GridSlot>,
}

#[derive(Debug, Serialize)]
struct GridReport {
    title: String,
    year: i32,
    months: Vec<GridMonth>,
}

pub fn default_title(year: i32) -> String {
    format!("{} Reading", year)
}

pub fn handle_grid(
    ctx: &RunContext,
    title: Option<String>,
    columns: usize,
    json: bool,
) -> Result<()> {
    let events = aggregate_rows(&ctx.rows, ctx.year);
    if events.is_empty() {
        println!("{}", ctx.no_books_message().dimmed());
        return Ok(());
    }

    let groups = group_by_month(&sequence(&events), columns);
    let report = GridReport {
        title: title.unwrap_or_else(|| default_title(ctx.year)),
        year: ctx.year,
        months: groups.iter().map(|g| grid_month(g, &ctx.covers)).collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_grid(&report);
    }
    Ok(())
}

fn grid_month(group: &MonthGroup, covers: &CoverStore) -> GridMonth {
    let slots = group
        .frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            let (row, column) = group.position(i);
            GridSlot {
                row,
                column,
                book_id: frame.book_id.clone(),
                title: frame.title.clone(),
                label_text: frame.label_text.clone(),
                cover: covers
                    .has_cover(&frame.book_id)
                    .then(|| covers.cover_path(&frame.book_id)),
            }
        })
        .collect();

    GridMonth {
        month: group.month,
        name: group.name.clone(),
        rows: group.rows,
        columns: group.columns,
        slots,
    }
}

fn print_grid(report: &GridReport) {
    println!();
    println!("{}", report.title.bright_blue().bold());

    for month in &report.months {
        println!();
        println!(
            "{} {}",
            month.name.bold(),
            format!("({} books)", month.slots.len()).dimmed()
        );

        for row in 0..month.rows {
            let markers: Vec<String> = month
                .slots
                .iter()
                .filter(|s| s.row == row)
                .map(|s| match s.cover {
                    Some(_) => "✓".bright_green().to_string(),
                    None => "·".dimmed().to_string(),
                })
                .collect();
            println!("  {}", markers.join(" "));
        }

        for slot in &month.slots {
            let marker = if slot.cover.is_some() {
                "✓".bright_green()
            } else {
                "·".dimmed()
            };
            println!(
                "    {} {} {}",
                marker,
                slot.title,
                format!("[{}]", slot.label_text).dimmed()
            );
        }
    }
}
