use anyhow::Result;
use colored::Colorize;
use readlog_core::latest_finishes;

use crate::context::RunContext;

/// Report books whose latest finish falls in the year and that have no
/// cover file.
pub fn handle_missing_covers(ctx: &RunContext, json: bool) -> Result<()> {
    let latest = latest_finishes(&ctx.rows, ctx.year);
    let missing = ctx.covers.missing_covers(&latest);

    if json {
        println!("{}", serde_json::to_string_pretty(&missing)?);
        return Ok(());
    }

    if missing.is_empty() {
        println!(
            "{} All books from {} have cover art!",
            "✓".bright_green(),
            ctx.year
        );
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Found {} books missing cover art for {}:",
            missing.len(),
            ctx.year
        )
        .yellow()
        .bold()
    );
    for book in &missing {
        println!();
        println!("{}  {}", "Book ID:".dimmed(), book.book_id);
        println!("{}  {}", "Title:".dimmed(), book.title.bright_white());
        println!("{}  {}", "Author:".dimmed(), book.author);
        println!(
            "{}  {}",
            "Finished:".dimmed(),
            book.finish_date.format("%Y-%m-%d")
        );
        println!(
            "{}  {}",
            "Expected cover path:".dimmed(),
            book.expected_path.display()
        );
    }

    Ok(())
}
