use anyhow::Result;
use colored::Colorize;
use readlog_core::{aggregate_rows, ReadingStats};

use crate::context::RunContext;

pub fn handle_stats(ctx: &RunContext, json: bool) -> Result<()> {
    let events = aggregate_rows(&ctx.rows, ctx.year);
    let stats = ReadingStats::from_events(ctx.year, &events);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else if events.is_empty() {
        println!("{}", ctx.no_books_message().dimmed());
    } else {
        print_reading_stats(&stats);
    }

    Ok(())
}

pub fn print_reading_stats(stats: &ReadingStats) {
    println!();
    println!(
        "{}",
        format!("=== Reading Statistics for {} ===", stats.year)
            .bright_blue()
            .bold()
    );
    println!("{}  {}", "Unique books:".dimmed(), stats.unique_books);
    println!(
        "{}  {}",
        "Total reading sessions:".dimmed(),
        stats.total_reads
    );
    println!(
        "{}  {}",
        "Books that were reread:".dimmed(),
        stats.reread_books
    );

    if !stats.rereads.is_empty() {
        println!();
        println!("{}", "Books with multiple reads:".dimmed());
        for entry in &stats.rereads {
            println!("  - {}: {} times", entry.title, entry.read_count);
        }
    }
}
