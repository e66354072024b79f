use crate::error::{AppResult, Error};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Format of an EventGroup title
const GROUP_TITLE_FORMAT: &str = "%a %b %d %Y";

/// Parse an RSS pubDate (RFC-2822 style, e.g. "Wed, 12 Jun 2024 18:00:00 +0000")
pub fn parse_pub_date(raw: &str, guid: &str) -> AppResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(raw.trim()).map_err(|e| Error::DateParse {
        guid: guid.to_string(),
        message: format!("{} ({})", e, raw.trim()),
    })
}

/// Display title for the calendar day of `instant` in the grouping timezone
pub fn day_title(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format(GROUP_TITLE_FORMAT).to_string()
}

/// Parse a group title back into its calendar date
pub fn group_date(title: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(title, GROUP_TITLE_FORMAT).ok()
}

/// Parse a date-range bound supplied by a tool caller.
/// Accepts a plain date (2024-06-14) or a full RFC3339 timestamp.
pub fn parse_range_bound(raw: &str, tz: Tz) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&tz).date_naive());
    }
    // Timestamps without an offset are taken to already be in the grouping zone
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return match tz.from_local_datetime(&naive) {
            chrono::LocalResult::Single(dt) => Some(dt.date_naive()),
            _ => Some(naive.date()),
        };
    }
    None
}
