//! Syndication feed data and the RSS 2.0 / Atom renderers.
//!
//! [`FeedItem`]s are collected on a [`FeedDocument`](crate::document::FeedDocument);
//! the renderers in [`rss`] and [`atom`] turn the document into XML. Dates
//! are kept as strings until render time and parsed with [`parse_feed_date`],
//! which accepts unix seconds, RFC 822/2822 and ISO 8601/RFC 3339.

pub mod atom;
pub mod rss;

pub use atom::AtomRenderer;
pub use rss::RssRenderer;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Unrecognised feed date: {0}")]
    InvalidDate(String),
    #[error("Invalid time zone offset: {0}")]
    InvalidOffset(String),
}

/// One entry of a feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub author: String,
    pub author_email: String,
    pub categories: Vec<String>,
    pub comments: String,
    pub enclosure: Option<FeedEnclosure>,
    pub guid: String,
    /// Unix seconds, RFC 822 or ISO 8601. Empty means "now" for Atom.
    pub date: String,
    /// Link of the feed the item was added to.
    pub source: String,
}

impl FeedItem {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            ..Self::default()
        }
    }
}

/// Channel image (RSS `<image>`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedImage {
    pub title: String,
    pub url: String,
    pub link: String,
    pub width: String,
    pub height: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedEnclosure {
    pub url: String,
    pub length: String,
    #[serde(rename = "type")]
    pub mime: String,
}

/// Parse a configured time zone offset: `UTC`, `Z`, empty, or `±HH:MM`.
pub fn parse_offset(offset: &str) -> Option<FixedOffset> {
    let offset = offset.trim();
    if offset.is_empty() || offset.eq_ignore_ascii_case("utc") || offset == "Z" {
        return FixedOffset::east_opt(0);
    }
    let (sign, rest) = match offset.as_bytes().first()? {
        b'+' => (1, &offset[1..]),
        b'-' => (-1, &offset[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Like [`parse_offset`] but reporting the bad value.
pub fn feed_timezone(offset: &str) -> Result<FixedOffset, FeedError> {
    parse_offset(offset).ok_or_else(|| FeedError::InvalidOffset(offset.to_string()))
}

/// Parse a feed date and express it in `tz`.
///
/// Dates without their own offset (`2024-03-01 10:00:00`, `2024-03-01`) are
/// taken as UTC.
pub fn parse_feed_date(value: &str, tz: &FixedOffset) -> Result<DateTime<FixedOffset>, FeedError> {
    let value = value.trim();
    let invalid = || FeedError::InvalidDate(value.to_string());

    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        let secs: i64 = value.parse().map_err(|_| invalid())?;
        return Utc
            .timestamp_opt(secs, 0)
            .single()
            .map(|d| d.with_timezone(tz))
            .ok_or_else(invalid);
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Ok(date.with_timezone(tz));
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.with_timezone(tz));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Utc.from_utc_datetime(&naive).with_timezone(tz));
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let naive = day.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
        return Ok(Utc.from_utc_datetime(&naive).with_timezone(tz));
    }
    Err(invalid())
}

/// Channel link or item link prefixed by the site URL unless already absolute.
pub(crate) fn absolute_link(site_url: &str, link: &str) -> String {
    let link = crate::escape::encode_link(link);
    if link.starts_with("http://") || link.starts_with("https://") {
        link
    } else {
        format!("{site_url}{link}").replace(' ', "%20")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn parse_offset_accepts_utc_and_signed_offsets() {
        assert_eq!(parse_offset("UTC"), FixedOffset::east_opt(0));
        assert_eq!(parse_offset(""), FixedOffset::east_opt(0));
        assert_eq!(parse_offset("+02:00"), FixedOffset::east_opt(7200));
        assert_eq!(parse_offset("-05:30"), FixedOffset::west_opt(5 * 3600 + 1800));
        assert_eq!(parse_offset("+3"), FixedOffset::east_opt(3 * 3600));
    }

    #[test]
    fn parse_offset_rejects_garbage() {
        assert_eq!(parse_offset("Europe/Berlin"), None);
        assert_eq!(parse_offset("+25:00"), None);
        assert!(matches!(feed_timezone("later"), Err(FeedError::InvalidOffset(_))));
    }

    #[test]
    fn parses_unix_seconds() {
        let date = parse_feed_date("0", &utc()).unwrap();
        assert_eq!(date.to_rfc3339(), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn parses_rfc822_into_target_zone() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let date = parse_feed_date("Tue, 05 Mar 2024 10:00:00 +0000", &tz).unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-05T11:00:00+01:00");
    }

    #[test]
    fn parses_iso_and_plain_dates() {
        assert_eq!(
            parse_feed_date("2024-03-05T10:00:00+02:00", &utc()).unwrap().to_rfc3339(),
            "2024-03-05T08:00:00+00:00"
        );
        assert_eq!(
            parse_feed_date("2024-03-05 10:00:00", &utc()).unwrap().to_rfc3339(),
            "2024-03-05T10:00:00+00:00"
        );
        assert_eq!(
            parse_feed_date("2024-03-05", &utc()).unwrap().to_rfc3339(),
            "2024-03-05T00:00:00+00:00"
        );
    }

    #[test]
    fn rejects_unknown_dates() {
        assert!(matches!(
            parse_feed_date("next tuesday", &utc()),
            Err(FeedError::InvalidDate(_))
        ));
    }

    #[test]
    fn absolute_link_prefixes_relative_links() {
        assert_eq!(
            absolute_link("https://example.org", "/news/first post"),
            "https://example.org/news/first%20post"
        );
        assert_eq!(
            absolute_link("https://example.org", "https://other.org/x"),
            "https://other.org/x"
        );
    }
}
