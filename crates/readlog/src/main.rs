mod animate;
mod config;
mod context;
mod covers;
mod grid;
mod heatmap;
mod stats;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use readlog_core::sequence::DEFAULT_GRID_COLUMNS;
use readlog_core::Orientation;
use readlog_library::{DEFAULT_COVERS_DIR, DEFAULT_EXPORT_FILE};
use readlog_logging::{init_tracing, LogFormat};
use tracing::debug;

use crate::animate::{AnimateOptions, DEFAULT_FRAME_DURATION_MS};
use crate::config::ReadlogConfig;
use crate::context::RunContext;

#[derive(Parser, Debug)]
#[command(
    name = "readlog",
    about = "Cover animations, monthly grids and heatmaps from a reading-log export",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Reading-log CSV export (default: ./goodreads_library_export.csv)
    #[arg(short, long, global = true)]
    csv: Option<PathBuf>,

    /// Year to report on (default: current year)
    #[arg(short, long, global = true)]
    year: Option<i32>,

    /// Directory holding {book_id}.jpg covers (default: ./book_covers)
    #[arg(short = 'd', long, global = true)]
    covers_dir: Option<PathBuf>,

    /// Log level filter, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    log_format: LogFormatChoice,

    /// Also write JSON log lines to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a GIF of the year's covers in finishing order
    Animate {
        /// Output file (default: reading_journey_{year}.gif)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Milliseconds per frame
        #[arg(short, long)]
        frame_duration: Option<u64>,

        /// Write the frame labels as JSON to this file
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
    /// Show the year's covers grouped by month
    Grid {
        /// Title (default: "{year} Reading")
        #[arg(short, long)]
        title: Option<String>,

        /// Maximum covers per row
        #[arg(long)]
        columns: Option<usize>,

        #[arg(long)]
        json: bool,
    },
    /// Show a calendar heatmap of finished books
    Heatmap {
        #[arg(short, long, value_enum)]
        orientation: Option<OrientationChoice>,

        /// Name used in the title
        #[arg(short, long)]
        name: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// List books finished this year that have no cover file
    MissingCovers {
        #[arg(long)]
        json: bool,
    },
    /// Show reading and reread counts
    Stats {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrientationChoice {
    Landscape,
    Portrait,
}

impl From<OrientationChoice> for Orientation {
    fn from(choice: OrientationChoice) -> Self {
        match choice {
            OrientationChoice::Landscape => Orientation::Landscape,
            OrientationChoice::Portrait => Orientation::Portrait,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_tracing(&cli.log_level, cli.log_format.into(), cli.log_file.as_deref())
        .context("Failed to initialize logging")?;

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let config = ReadlogConfig::resolve(&working_dir)?;
    debug!(?config, "Resolved configuration");

    let year = cli.year.unwrap_or_else(|| chrono::Local::now().year());
    let csv = cli
        .csv
        .or(config.csv.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));
    let covers_dir = cli
        .covers_dir
        .or(config.covers_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_COVERS_DIR));

    let ctx = RunContext::load(&csv, &covers_dir, year)?;

    match cli.command {
        Commands::Animate {
            output,
            frame_duration,
            manifest,
        } => animate::handle_animate(
            &ctx,
            AnimateOptions {
                output: output.unwrap_or_else(|| animate::default_output(year)),
                frame_duration_ms: frame_duration
                    .or(config.frame_duration_ms)
                    .unwrap_or(DEFAULT_FRAME_DURATION_MS),
                manifest,
            },
        ),
        Commands::Grid {
            title,
            columns,
            json,
        } => grid::handle_grid(
            &ctx,
            title,
            columns
                .or(config.grid_columns)
                .unwrap_or(DEFAULT_GRID_COLUMNS),
            json,
        ),
        Commands::Heatmap {
            orientation,
            name,
            json,
        } => {
            let name = name
                .or(config.name)
                .unwrap_or_else(|| heatmap::DEFAULT_NAME.to_string());
            let orientation = orientation
                .map(Orientation::from)
                .or(config.orientation)
                .unwrap_or_default();
            heatmap::handle_heatmap(&ctx, &name, orientation, json)
        }
        Commands::MissingCovers { json } => covers::handle_missing_covers(&ctx, json),
        Commands::Stats { json } => stats::handle_stats(&ctx, json),
    }
}
