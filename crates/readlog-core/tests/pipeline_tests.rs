use chrono::{Datelike, NaiveDate};
use readlog_core::{
    aggregate, aggregate_rows, cells, daily_counts, group_by_month, layout, sequence, BookRow,
    ExportRecord, Orientation, ReadingStats,
};

/// Helper: a small export covering three years with rereads and bad tokens.
fn sample_rows() -> Vec<BookRow> {
    vec![
        BookRow::new("101", "Piranesi", "Susanna Clarke", Some("\"2024-01-01,2024-01-10\"")),
        BookRow::new(
            "102",
            "The Hobbit",
            "J.R.R. Tolkien",
            Some("\"2024-01-01,2024-01-10;2024-06-01,2024-06-05\""),
        ),
        BookRow::new(
            "103",
            "Emma",
            "Jane Austen",
            Some("\",2023-03-01;garbage;,2024-02-14;2022-12-01,2022-12-30\""),
        ),
        BookRow::new("104", "Kindred", "Octavia E. Butler", Some(",2023-11-30")),
        BookRow::new("105", "To Read", "Someone", None),
        BookRow::new("106", "Broken", "Someone Else", Some("onlyonefield")),
    ]
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ============================================================
// Aggregation
// ============================================================

#[test]
fn test_end_to_end_two_books() {
    let rows = &sample_rows()[..2];
    let events = aggregate_rows(rows, 2024);

    assert_eq!(events.len(), 3);
    let hobbit: Vec<usize> = events
        .iter()
        .filter(|e| e.book_id == "102")
        .map(|e| e.read_number)
        .collect();
    assert_eq!(hobbit, vec![1, 2]);

    let piranesi = events.iter().find(|e| e.book_id == "101").unwrap();
    assert_eq!(piranesi.read_count, 1);
}

#[test]
fn test_only_target_year_sorted() {
    let events = aggregate_rows(&sample_rows(), 2023);
    let dates: Vec<NaiveDate> = events.iter().map(|e| e.finish_date).collect();
    assert_eq!(dates, vec![d(2023, 3, 1), d(2023, 11, 30)]);
}

#[test]
fn test_read_count_same_for_every_year() {
    let rows = sample_rows();
    for year in 2020..=2025 {
        for event in aggregate_rows(&rows, year) {
            let expected = match event.book_id.as_str() {
                "102" => 2,
                "103" => 3,
                _ => 1,
            };
            assert_eq!(event.read_count, expected, "{} in {}", event.title, year);
        }
    }
}

#[test]
fn test_missing_identity_aborts_run() {
    let records = vec![
        ExportRecord {
            book_id: Some("1".into()),
            title: Some("Fine".into()),
            author: Some("Author".into()),
            read_dates: Some(",2024-01-01".into()),
        },
        ExportRecord {
            book_id: None,
            title: Some("No Id".into()),
            author: Some("Author".into()),
            read_dates: Some(",2024-01-02".into()),
        },
    ];

    let err = aggregate(&records, 2024).unwrap_err();
    assert_eq!(err.to_string(), "Row 1 is missing required field 'Book Id'");
}

// ============================================================
// Heatmap
// ============================================================

#[test]
fn test_heatmap_total_matches_event_count() {
    let rows = sample_rows();
    for year in [2022, 2023, 2024] {
        let events = aggregate_rows(&rows, year);
        let daily = daily_counts(&events, year).unwrap();
        for orientation in [Orientation::Landscape, Orientation::Portrait] {
            let layout = layout(&daily, orientation).unwrap();
            assert_eq!(layout.total(), events.len() as u64);
        }
    }
}

#[test]
fn test_every_cell_in_grid_bounds() {
    let events = aggregate_rows(&sample_rows(), 2024);
    let daily = daily_counts(&events, 2024).unwrap();
    let cells = cells(&daily);

    assert_eq!(cells.len(), 366);
    assert!(cells.iter().all(|c| c.weekday_index <= 6 && c.week_index <= 52));
}

// ============================================================
// Sequencing
// ============================================================

#[test]
fn test_frames_follow_event_order() {
    let events = aggregate_rows(&sample_rows(), 2024);
    let frames = sequence(&events);

    let labels: Vec<&str> = frames.iter().map(|f| f.label_text.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Jan 10, 2024",
            "Jan 10, 2024",
            "Feb 14, 2024 (Read #3)",
            "Jun 05, 2024 (Read #2)",
        ]
    );
    assert!(frames
        .windows(2)
        .all(|pair| pair[0].finish_date <= pair[1].finish_date));
}

#[test]
fn test_monthly_groups_cover_every_frame() {
    let events = aggregate_rows(&sample_rows(), 2024);
    let frames = sequence(&events);
    let groups = group_by_month(&frames, 8);

    let months: Vec<u32> = groups.iter().map(|g| g.month).collect();
    assert_eq!(months, vec![1, 2, 6]);
    assert_eq!(
        groups.iter().map(|g| g.frames.len()).sum::<usize>(),
        frames.len()
    );
    assert!(groups
        .iter()
        .all(|g| g.frames.iter().all(|f| f.finish_date.month() == g.month)));
}

#[test]
fn test_stats_for_year() {
    let events = aggregate_rows(&sample_rows(), 2024);
    let stats = ReadingStats::from_events(2024, &events);

    assert_eq!(stats.unique_books, 3);
    assert_eq!(stats.total_reads, 4);
    assert_eq!(stats.reread_books, 2);
    assert_eq!(stats.rereads[0].title, "Emma");
}
