//! Chronological cover animation.
//!
//! One frame per finish event: the book's cover resized to a common size,
//! or a light-gray placeholder naming the book when the cover is missing or
//! unreadable. Every frame carries its date label in the bottom-left corner.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ab_glyph::FontRef;
use anyhow::{Context, Result};
use colored::Colorize;
use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::FilterType;
use image::{Delay, DynamicImage, Frame, ImageReader, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use readlog_core::{aggregate_rows, sequence, FrameDescriptor, ReadingStats};
use readlog_library::CoverStore;
use tracing::{debug, warn};

use crate::context::RunContext;
use crate::stats::print_reading_stats;

pub const FRAME_WIDTH: u32 = 300;
pub const FRAME_HEIGHT: u32 = 450;
pub const DEFAULT_FRAME_DURATION_MS: u64 = 300;

const PLACEHOLDER: Rgba<u8> = Rgba([211, 211, 211, 255]);
const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LABEL_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);

const LABEL_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
const LABEL_SCALE: f32 = 14.0;
const LABEL_POSITION: (i32, i32) = (10, 435);
const PLACEHOLDER_SCALE: f32 = 18.0;
const PLACEHOLDER_CENTER: (i32, i32) = (150, 200);
const TEXT_MARGIN: u32 = 20;

pub struct AnimateOptions {
    pub output: PathBuf,
    pub frame_duration_ms: u64,
    /// Also write the frame descriptors as JSON here
    pub manifest: Option<PathBuf>,
}

/// `reading_journey_{year}.gif`
pub fn default_output(year: i32) -> PathBuf {
    PathBuf::from(format!("reading_journey_{}.gif", year))
}

pub fn handle_animate(ctx: &RunContext, options: AnimateOptions) -> Result<()> {
    check_output_format(&options.output)?;

    let events = aggregate_rows(&ctx.rows, ctx.year);
    if events.is_empty() {
        println!("{}", ctx.no_books_message().dimmed());
        return Ok(());
    }

    let font = label_font()?;
    let frames = sequence(&events);
    let images: Vec<RgbaImage> = frames
        .iter()
        .map(|frame| render_frame(&ctx.covers, frame, &font))
        .collect();

    write_gif(&options.output, images, options.frame_duration_ms)?;

    if let Some(ref manifest) = options.manifest {
        let json = serde_json::to_string_pretty(&frames)?;
        std::fs::write(manifest, json)
            .with_context(|| format!("Failed to write manifest {}", manifest.display()))?;
    }

    for (i, frame) in frames.iter().enumerate() {
        println!(
            "{} {} {}",
            format!("{:>4}", i + 1).dimmed(),
            frame.label_text,
            frame.title.bright_white()
        );
    }
    println!();
    println!(
        "{} Created GIF animation with {} reading sessions in {}",
        "✓".bright_green(),
        frames.len(),
        options.output.display()
    );

    print_reading_stats(&ReadingStats::from_events(ctx.year, &events));
    Ok(())
}

fn check_output_format(output: &Path) -> Result<()> {
    match output.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("gif") => Ok(()),
        other => anyhow::bail!(
            "Unsupported animation format {:?} for {}; use a .gif output",
            other.unwrap_or(""),
            output.display()
        ),
    }
}

/// The frame for `frame`: its cover, or a placeholder naming the book if the
/// cover is missing or cannot be decoded, with the date label drawn on top.
pub fn render_frame(covers: &CoverStore, frame: &FrameDescriptor, font: &FontRef) -> RgbaImage {
    let mut img = match cover_image(covers, frame) {
        Some(img) => img,
        None => placeholder_for(frame, font),
    };
    draw_outlined(
        &mut img,
        font,
        LABEL_SCALE,
        LABEL_POSITION,
        &frame.label_text,
    );
    img
}

fn cover_image(covers: &CoverStore, frame: &FrameDescriptor) -> Option<RgbaImage> {
    let path = covers.cover_path(&frame.book_id);
    if !path.is_file() {
        debug!("No cover for {} ({})", frame.book_id, frame.title);
        return None;
    }

    match decode_cover(&path) {
        Ok(img) => Some(
            img.resize_exact(FRAME_WIDTH, FRAME_HEIGHT, FilterType::Lanczos3)
                .to_rgba8(),
        ),
        Err(e) => {
            warn!("Failed to decode cover {:?}: {}", path, e);
            None
        }
    }
}

/// Decode by content rather than extension; exported covers are not always
/// JPEGs despite the name.
fn decode_cover(path: &Path) -> Result<DynamicImage> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(img)
}

pub fn placeholder() -> RgbaImage {
    RgbaImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, PLACEHOLDER)
}

/// Light-gray frame with "title / by / author" centred around
/// `PLACEHOLDER_CENTER`.
fn placeholder_for(frame: &FrameDescriptor, font: &FontRef) -> RgbaImage {
    let mut img = placeholder();
    let max_width = FRAME_WIDTH - 2 * TEXT_MARGIN;

    let mut lines = wrap_text(font, PLACEHOLDER_SCALE, &frame.title, max_width);
    lines.push("by".to_string());
    lines.extend(wrap_text(font, PLACEHOLDER_SCALE, &frame.author, max_width));

    let line_height = (PLACEHOLDER_SCALE * 1.25) as i32;
    let (cx, cy) = PLACEHOLDER_CENTER;
    let mut y = cy - line_height * lines.len() as i32 / 2;
    for line in &lines {
        let (w, _) = text_size(PLACEHOLDER_SCALE, font, line);
        draw_text_mut(
            &mut img,
            INK,
            cx - w as i32 / 2,
            y,
            PLACEHOLDER_SCALE,
            font,
            line,
        );
        y += line_height;
    }
    img
}

/// White text with a one-pixel black outline.
fn draw_outlined(img: &mut RgbaImage, font: &FontRef, scale: f32, (x, y): (i32, i32), text: &str) {
    for dx in -1..=1 {
        for dy in -1..=1 {
            if dx != 0 || dy != 0 {
                draw_text_mut(img, INK, x + dx, y + dy, scale, font, text);
            }
        }
    }
    draw_text_mut(img, LABEL_FILL, x, y, scale, font, text);
}

/// Greedy word wrap to `max_width` pixels. A single word wider than the
/// limit gets a line of its own.
pub fn wrap_text(font: &FontRef, scale: f32, text: &str, max_width: u32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if current.is_empty() || text_size(scale, font, &candidate).0 <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub fn label_font() -> Result<FontRef<'static>> {
    FontRef::try_from_slice(LABEL_FONT).context("Failed to load embedded label font")
}

/// Encode `images` as a looping GIF.
pub fn write_gif(path: &Path, images: Vec<RgbaImage>, frame_duration_ms: u64) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_saturating_duration(Duration::from_millis(frame_duration_ms));
    encoder
        .encode_frames(
            images
                .into_iter()
                .map(|img| Frame::from_parts(img, 0, 0, delay)),
        )
        .with_context(|| format!("Failed to encode {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn frame(book_id: &str) -> FrameDescriptor {
        FrameDescriptor {
            book_id: book_id.into(),
            title: "Title".into(),
            author: "Author".into(),
            finish_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            label_text: "Jan 01, 2024".into(),
        }
    }

    fn font() -> FontRef<'static> {
        label_font().unwrap()
    }

    /// Pixels in the given rows and columns that differ from `background`.
    fn changed_pixels(
        img: &RgbaImage,
        xs: std::ops::Range<u32>,
        ys: std::ops::Range<u32>,
        background: Rgba<u8>,
    ) -> usize {
        ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
            .filter(|&(x, y)| *img.get_pixel(x, y) != background)
            .count()
    }

    #[test]
    fn test_missing_cover_gets_placeholder() {
        let dir = TempDir::new().unwrap();
        let store = CoverStore::with_dir(dir.path());
        let img = render_frame(&store, &frame("1"), &font());
        assert_eq!(img.dimensions(), (FRAME_WIDTH, FRAME_HEIGHT));
        assert_eq!(*img.get_pixel(10, 10), PLACEHOLDER);
    }

    #[test]
    fn test_corrupt_cover_gets_placeholder() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("1.jpg"), b"definitely not a jpeg").unwrap();
        let store = CoverStore::with_dir(dir.path());
        let img = render_frame(&store, &frame("1"), &font());
        assert_eq!(*img.get_pixel(0, 0), PLACEHOLDER);
    }

    #[test]
    fn test_cover_is_resized() {
        let dir = TempDir::new().unwrap();
        let cover = RgbaImage::from_pixel(60, 90, Rgba([200, 10, 10, 255]));
        cover.save(dir.path().join("7.png")).unwrap();
        std::fs::rename(dir.path().join("7.png"), dir.path().join("7.jpg")).unwrap();

        let store = CoverStore::with_dir(dir.path());
        let img = render_frame(&store, &frame("7"), &font());
        assert_eq!(img.dimensions(), (FRAME_WIDTH, FRAME_HEIGHT));
        assert_ne!(*img.get_pixel(150, 225), PLACEHOLDER);
    }

    #[test]
    fn test_label_is_drawn_on_placeholder() {
        let dir = TempDir::new().unwrap();
        let store = CoverStore::with_dir(dir.path());
        let img = render_frame(&store, &frame("1"), &font());

        assert!(changed_pixels(&img, 0..FRAME_WIDTH, 430..FRAME_HEIGHT, PLACEHOLDER) > 0);
        assert_eq!(changed_pixels(&img, 0..FRAME_WIDTH, 0..100, PLACEHOLDER), 0);
    }

    #[test]
    fn test_placeholder_names_the_book() {
        let dir = TempDir::new().unwrap();
        let store = CoverStore::with_dir(dir.path());
        let img = render_frame(&store, &frame("1"), &font());

        assert!(changed_pixels(&img, 0..FRAME_WIDTH, 150..250, PLACEHOLDER) > 0);
    }

    #[test]
    fn test_label_is_drawn_on_cover() {
        let dir = TempDir::new().unwrap();
        RgbaImage::from_pixel(60, 90, Rgba([200, 10, 10, 255]))
            .save(dir.path().join("9.png"))
            .unwrap();
        std::fs::rename(dir.path().join("9.png"), dir.path().join("9.jpg")).unwrap();

        let store = CoverStore::with_dir(dir.path());
        let img = render_frame(&store, &frame("9"), &font());

        // The outline darkens pixels the red cover never has.
        let outlined = img
            .enumerate_pixels()
            .filter(|(_, y, _)| *y >= 430)
            .any(|(_, _, p)| p.0[0] < 60);
        assert!(outlined);
        assert!(img.get_pixel(150, 200).0[0] > 150);
    }

    #[test]
    fn test_wrap_text() {
        let font = font();
        let lines = wrap_text(
            &font,
            PLACEHOLDER_SCALE,
            "The Left Hand of Darkness and Other Very Long Titles",
            200,
        );
        assert!(lines.len() > 1);
        assert_eq!(
            lines.join(" "),
            "The Left Hand of Darkness and Other Very Long Titles"
        );
        for line in &lines {
            if line.contains(' ') {
                assert!(text_size(PLACEHOLDER_SCALE, &font, line).0 <= 200);
            }
        }

        assert_eq!(wrap_text(&font, PLACEHOLDER_SCALE, "Supercalifragilistic", 10).len(), 1);
        assert!(wrap_text(&font, PLACEHOLDER_SCALE, "   ", 200).is_empty());
    }

    #[test]
    fn test_write_gif() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.gif");
        write_gif(&path, vec![placeholder(), placeholder()], 300).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
    }

    #[test]
    fn test_output_format() {
        assert!(check_output_format(Path::new("journey.GIF")).is_ok());
        assert!(check_output_format(Path::new("journey.mp4")).is_err());
        assert!(check_output_format(Path::new("journey")).is_err());
    }
}
