//! Decoding of the `read_dates` session field.
//!
//! A field holds zero or more sessions separated by `;`, optionally wrapped
//! in double quotes. Each session is either `start,end` or `,end` (no
//! recorded start). Only the end date matters downstream.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One reading session decoded from the raw field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub start: Option<NaiveDate>,
    pub end: NaiveDate,
}

/// Outcome of decoding a single `;`-separated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionToken {
    Finished(Session),
    Malformed { token: String, reason: MalformedReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// A token without a leading comma must carry exactly a start and an end.
    PieceCount(usize),
    /// The end date could not be read as a calendar date.
    BadDate,
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::PieceCount(n) => {
                write!(f, "expected start and end date, found {} value(s)", n)
            }
            MalformedReason::BadDate => write!(f, "unparseable end date"),
        }
    }
}

/// Decode every token of a raw field, keeping malformed ones as tagged
/// outcomes. Tokens come back in field order.
pub fn decode_field(raw: Option<&str>) -> Vec<SessionToken> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    raw.trim_matches('"')
        .split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(decode_token)
        .collect()
}

/// Decode a single session token such as `2024-01-01,2024-01-15` or `,2024-05-01`.
pub fn decode_token(token: &str) -> SessionToken {
    let malformed = |reason| SessionToken::Malformed {
        token: token.to_string(),
        reason,
    };

    if let Some(rest) = token.strip_prefix(',') {
        return match parse_date(rest.trim()) {
            Some(end) => SessionToken::Finished(Session { start: None, end }),
            None => malformed(MalformedReason::BadDate),
        };
    }

    let pieces: Vec<&str> = token
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect();

    if pieces.len() != 2 {
        return malformed(MalformedReason::PieceCount(pieces.len()));
    }

    match parse_date(pieces[1]) {
        Some(end) => SessionToken::Finished(Session {
            start: parse_date(pieces[0]),
            end,
        }),
        None => malformed(MalformedReason::BadDate),
    }
}

/// Finish dates of a raw field in token order. Malformed tokens are skipped
/// with a warning.
pub fn parse(raw: Option<&str>) -> Vec<NaiveDate> {
    decode_field(raw)
        .into_iter()
        .filter_map(|token| match token {
            SessionToken::Finished(session) => Some(session.end),
            SessionToken::Malformed { token, reason } => {
                warn!("Could not parse date session {:?}: {}", token, reason);
                None
            }
        })
        .collect()
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse a calendar date. Datetimes are accepted and truncated to their date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_start_and_end_same_day() {
        assert_eq!(parse(Some("\"2024-10-21,2024-10-21\"")), vec![d(2024, 10, 21)]);
    }

    #[test]
    fn test_leading_comma_is_end_only() {
        assert_eq!(parse(Some("\",2024-05-01\"")), vec![d(2024, 5, 1)]);
    }

    #[test]
    fn test_multiple_sessions_keep_token_order() {
        assert_eq!(
            parse(Some("\"2024-01-01,2024-01-15;2024-03-01,2024-03-10\"")),
            vec![d(2024, 1, 15), d(2024, 3, 10)]
        );
        assert_eq!(
            parse(Some("2024-03-01,2024-03-10;,2023-12-31")),
            vec![d(2024, 3, 10), d(2023, 12, 31)]
        );
    }

    #[test]
    fn test_absent_and_empty() {
        assert!(parse(None).is_empty());
        assert!(parse(Some("")).is_empty());
        assert!(parse(Some("\"\"")).is_empty());
        assert!(parse(Some(" ; ;")).is_empty());
    }

    #[test]
    fn test_malformed_token_does_not_abort_field() {
        let tokens = decode_field(Some("onlyonefield;2024-02-02,2024-02-05"));
        assert_eq!(tokens.len(), 2);
        assert_eq!(
            tokens[0],
            SessionToken::Malformed {
                token: "onlyonefield".to_string(),
                reason: MalformedReason::PieceCount(1),
            }
        );
        assert_eq!(
            parse(Some("onlyonefield;2024-02-02,2024-02-05")),
            vec![d(2024, 2, 5)]
        );
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_malformed_token_logs_warning() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();

        let dates = tracing::subscriber::with_default(subscriber, || {
            parse(Some("onlyonefield;2024-02-02,2024-02-05"))
        });

        assert_eq!(dates, vec![d(2024, 2, 5)]);
        let output = logs.contents();
        assert_eq!(output.matches("WARN").count(), 1, "{}", output);
        assert!(output.contains("Could not parse date session \"onlyonefield\""));
    }

    #[test]
    fn test_bad_end_date_is_malformed() {
        assert_eq!(
            decode_token("2024-01-01,2024-13-40"),
            SessionToken::Malformed {
                token: "2024-01-01,2024-13-40".to_string(),
                reason: MalformedReason::BadDate,
            }
        );
        assert!(matches!(
            decode_token(","),
            SessionToken::Malformed {
                reason: MalformedReason::BadDate,
                ..
            }
        ));
    }

    #[test]
    fn test_three_pieces_is_malformed() {
        assert!(matches!(
            decode_token("2024-01-01,2024-01-02,2024-01-03"),
            SessionToken::Malformed {
                reason: MalformedReason::PieceCount(3),
                ..
            }
        ));
    }

    #[test]
    fn test_unparseable_start_keeps_end() {
        assert_eq!(
            decode_token("sometime, 2024-07-04"),
            SessionToken::Finished(Session {
                start: None,
                end: d(2024, 7, 4),
            })
        );
    }

    #[test]
    fn test_start_is_recorded() {
        assert_eq!(
            decode_token("2024-06-01 , 2024-06-05"),
            SessionToken::Finished(Session {
                start: Some(d(2024, 6, 1)),
                end: d(2024, 6, 5),
            })
        );
    }

    #[test]
    fn test_parse_date_forms() {
        assert_eq!(parse_date("2024-02-29"), Some(d(2024, 2, 29)));
        assert_eq!(parse_date("2024/02/29"), Some(d(2024, 2, 29)));
        assert_eq!(parse_date("2024-02-29T08:30:00"), Some(d(2024, 2, 29)));
        assert_eq!(parse_date("2024-02-29 23:59:59"), Some(d(2024, 2, 29)));
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date("yesterday"), None);
    }
}
