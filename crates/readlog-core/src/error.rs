use thiserror::Error;

/// Result type for readlog-core operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A row is missing one of its identity fields (book id, title, author).
    #[error("Row {row} is missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },

    #[error("Invalid orientation: {0} (expected landscape or portrait)")]
    InvalidOrientation(String),

    #[error("Invalid year: {0}")]
    InvalidYear(i32),

    /// Daily counts handed to the heatmap layout do not cover exactly one year.
    #[error("Daily counts must cover every day of a single year: {0}")]
    IncompleteYear(String),
}
