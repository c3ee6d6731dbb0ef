use chrono::NaiveDate;

use crate::error::AppError;

/// Parse a `--since`/`--until` argument.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    // Try YYYYMMDD
    if s.len() == 8
        && let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d")
    {
        return Ok(d);
    }
    // Try YYYY-MM-DD
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    Err(AppError::InvalidDate {
        input: s.to_string(),
    })
}

/// Date formats seen in task record exports, tried in order.
const RECORD_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse the `Date` column of a task record. Exports sometimes carry a
/// time-of-day suffix ("2025-01-15 08:30:00"); only the date part is kept.
pub(crate) fn parse_record_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    let date_part = trimmed.split_whitespace().next().unwrap_or(trimmed);
    RECORD_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}
