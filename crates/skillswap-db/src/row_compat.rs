//! SQLite row-extraction helpers.
//!
//! Every column that stores a UUID, an RFC 3339 timestamp, a calendar date,
//! or a domain enum lives in SQLite as TEXT and must be fetched as `String`
//! and converted here.
//!
//! All functions return `sqlx::Error` so they fit naturally into
//! `sqlx::FromRow` manual implementations.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, sqlite::SqliteRow};
use uuid::Uuid;

// ── Uuid ─────────────────────────────────────────────────────────────────────

pub fn get_uuid(row: &SqliteRow, col: &str) -> Result<Uuid, sqlx::Error> {
    let s: String = row.try_get(col)?;
    Uuid::parse_str(&s).map_err(|e| sqlx::Error::Decode(Box::new(e) as _))
}

pub fn get_opt_uuid(row: &SqliteRow, col: &str) -> Result<Option<Uuid>, sqlx::Error> {
    let s: Option<String> = row.try_get(col)?;
    s.map(|v| Uuid::parse_str(&v).map_err(|e| sqlx::Error::Decode(Box::new(e) as _)))
        .transpose()
}

// ── DateTime<Utc> ─────────────────────────────────────────────────────────────

/// Format a timestamp for storage. Fixed microsecond precision keeps the TEXT
/// column lexicographically ordered by time.
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

pub fn get_datetime(row: &SqliteRow, col: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    let s: String = row.try_get(col)?;
    parse_datetime(&s).map_err(sqlx::Error::Decode)
}

fn parse_datetime(
    s: &str,
) -> Result<DateTime<Utc>, Box<dyn std::error::Error + Send + Sync + 'static>> {
    // Our own writes are RFC 3339
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    // SQLite CURRENT_TIMESTAMP format: "2024-01-15 10:30:00"
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc());
    }
    Err(format!("cannot parse timestamp: {s}").into())
}

// ── NaiveDate ─────────────────────────────────────────────────────────────────

pub fn get_date(row: &SqliteRow, col: &str) -> Result<NaiveDate, sqlx::Error> {
    let s: String = row.try_get(col)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| sqlx::Error::Decode(Box::new(e) as _))
}

// ── Domain enums ──────────────────────────────────────────────────────────────

/// Decode a TEXT column through one of the domain enums' `parse` functions.
pub fn get_enum<T>(
    row: &SqliteRow,
    col: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, sqlx::Error> {
    let s: String = row.try_get(col)?;
    parse(&s).ok_or_else(|| sqlx::Error::Decode(format!("unknown {col}: {s}").into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_datetimes_sort_chronologically() {
        let early = Utc::now();
        let late = early + chrono::Duration::milliseconds(7);
        assert!(format_datetime(early) < format_datetime(late));
    }

    #[test]
    fn parses_both_timestamp_formats() {
        assert!(parse_datetime("2024-01-15T10:30:00.123456+00:00").is_ok());
        assert!(parse_datetime("2024-01-15 10:30:00").is_ok());
        assert!(parse_datetime("last tuesday").is_err());
    }
}
