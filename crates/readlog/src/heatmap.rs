//! GitHub-style heatmap of finishing activity, drawn in the terminal.

use anyhow::Result;
use colored::{ColoredString, Colorize};
use readlog_core::{aggregate_rows, daily_counts, layout, HeatmapLayout, HeatmapStats, Orientation};
use serde::Serialize;

use crate::context::RunContext;

pub const DEFAULT_NAME: &str = "Reader";

#[derive(Serialize)]
struct HeatmapReport<'a> {
    title: String,
    layout: &'a HeatmapLayout,
    stats: &'a HeatmapStats,
}

pub fn handle_heatmap(
    ctx: &RunContext,
    name: &str,
    orientation: Orientation,
    json: bool,
) -> Result<()> {
    let events = aggregate_rows(&ctx.rows, ctx.year);
    if events.is_empty() {
        println!("{}", ctx.no_books_message().dimmed());
        return Ok(());
    }

    let daily = daily_counts(&events, ctx.year)?;
    let layout = layout(&daily, orientation)?;
    let stats = HeatmapStats::from_daily(&daily);
    let title = format!("{}'s {} Books", name, ctx.year);

    if json {
        let report = HeatmapReport {
            title,
            layout: &layout,
            stats: &stats,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!("{}", title.bright_blue().bold());
    println!();
    for line in render_grid(&layout) {
        println!("{}", line);
    }
    print_legend(layout.max_count());
    print_heatmap_stats(ctx.year, &stats);

    Ok(())
}

/// Terminal lines for the grid, labels included. Each cell is two
/// characters wide.
pub fn render_grid(layout: &HeatmapLayout) -> Vec<String> {
    const LABEL_WIDTH: usize = 5;
    let max = layout.max_count();
    let width = layout.grid.first().map(Vec::len).unwrap_or(0);

    let ticks = &layout.axis_labels.columns;
    let mut header = vec![' '; width * 2];
    for (t, tick) in ticks.iter().enumerate() {
        // Dense ticks (one per column) are cut to the cell width.
        let room = ticks
            .get(t + 1)
            .map(|next| next.position.saturating_sub(tick.position) * 2)
            .unwrap_or(usize::MAX);
        for (i, ch) in tick.label.chars().take(room).enumerate() {
            if let Some(slot) = header.get_mut(tick.position * 2 + i) {
                *slot = ch;
            }
        }
    }

    let mut lines = vec![format!(
        "{}{}",
        " ".repeat(LABEL_WIDTH),
        header.into_iter().collect::<String>().trim_end()
    )];

    for (r, row) in layout.grid.iter().enumerate() {
        let label = layout
            .axis_labels
            .rows
            .iter()
            .find(|tick| tick.position == r)
            .map(|tick| tick.label.as_str())
            .unwrap_or("");
        let cells: String = row.iter().map(|&count| format!("{} ", shade(count, max))).collect();
        lines.push(format!("{:<width$}{}", label, cells.trim_end(), width = LABEL_WIDTH));
    }

    lines
}

/// Shading level 0..=4 relative to the busiest day.
pub fn level(count: u32, max: u32) -> u32 {
    if count == 0 || max == 0 {
        0
    } else {
        (count * 4).div_ceil(max).clamp(1, 4)
    }
}

fn shade(count: u32, max: u32) -> ColoredString {
    match level(count, max) {
        0 => "·".dimmed(),
        1 => "■".green().dimmed(),
        2 => "■".green(),
        3 => "■".bright_green(),
        _ => "■".bright_green().bold(),
    }
}

fn print_legend(max: u32) {
    let levels: Vec<String> = (0..=4)
        .map(|l| shade(if l == 0 { 0 } else { (max * l).div_ceil(4).max(1) }, max).to_string())
        .collect();
    println!();
    println!(
        "     {} {} {}",
        "Less".dimmed(),
        levels.join(" "),
        "More".dimmed()
    );
}

fn print_heatmap_stats(year: i32, stats: &HeatmapStats) {
    println!();
    println!(
        "{}",
        format!("=== Reading Statistics for {} ===", year)
            .bright_blue()
            .bold()
    );
    println!("{}  {}", "Total books read:".dimmed(), stats.total_books);
    println!(
        "{}  {}",
        "Most books finished in one day:".dimmed(),
        stats.max_books_day
    );
    println!(
        "{}  {}",
        "Number of active reading days:".dimmed(),
        stats.active_days
    );
    if let Some(avg) = stats.average_per_active_day {
        println!("{}  {:.2}", "Average books per active day:".dimmed(), avg);
    }

    if !stats.busiest_days.is_empty() {
        println!();
        println!("{}", "Busiest reading days:".dimmed());
        for day in &stats.busiest_days {
            println!("  {}: {} books", day.date.format("%Y-%m-%d"), day.count);
        }
    }
}
