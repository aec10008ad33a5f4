//! Ordering of merged artwork lists.
//!
//! Museum dates are free text ("c. 1765", "6500-5000 BCE", "5th century BCE",
//! "March 3, 1990"), so date sorting goes through [`date_rank`], which reduces a
//! date string to a signed year. Descending order reverses the ascending
//! result, so ties come out in reverse merge order as well.

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{NormalizedArtwork, SortBy, SortOrder};

const BCE: &str = r"B\.?\s?C\.?(?:\s?E\.?)?";
const CE: &str = r"(?:C\.?\s?E\.?|A\.?\s?D\.?)";
const ORDINAL: &str = r"(?:st|nd|rd|th)?";

static CIRCA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(?:circa\b\.?|ca\.|c\.|c\s)\s*").expect("valid regex"));

static BCE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)(\d+)\s*(?:{BCE})?\s*[-–]\s*(\d+)\s*{BCE}")).expect("valid regex")
});

static BCE_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)(\d+)\s*{BCE}")).expect("valid regex"));

static BCE_MILLENNIUM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)(\d+){ORDINAL}(?:\s*[-–]\s*\d+{ORDINAL})?\s+millenn?ium\s+{BCE}"
    ))
    .expect("valid regex")
});

static BCE_CENTURY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)(\d+){ORDINAL}(?:\s*[-–]\s*\d+{ORDINAL})?\s+century\s+{BCE}"
    ))
    .expect("valid regex")
});

static CE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)(\d+)\s*(?:{CE})?\s*[-–]\s*\d+\s*{CE}")).expect("valid regex")
});

static CE_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)(?:(\d+)\s*{CE}|A\.?\s?D\.?\s*(\d+))")).expect("valid regex")
});

static BARE_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s*[-–]\s*\d+$").expect("valid regex"));

static BARE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)$").expect("valid regex"));

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%m/%d/%Y"];

/// Reduce a free-text date to a signed year for ordering. Unparseable or
/// missing dates rank 0.
pub fn date_rank(date: Option<&str>) -> i64 {
    let Some(raw) = date else {
        return 0;
    };
    let text = CIRCA.replace(raw.trim(), "");
    let text = text.trim();
    if text.is_empty() {
        return 0;
    }

    // BCE ranges rank by the later (smaller) year
    if let Some(caps) = BCE_RANGE.captures(text) {
        return -capture_number(&caps, 2);
    }
    if let Some(caps) = BCE_YEAR.captures(text) {
        return -capture_number(&caps, 1);
    }
    if let Some(caps) = BCE_MILLENNIUM.captures(text) {
        return capture_number(&caps, 1).saturating_mul(1000).saturating_neg();
    }
    if let Some(caps) = BCE_CENTURY.captures(text) {
        return capture_number(&caps, 1).saturating_mul(100).saturating_neg();
    }
    if let Some(caps) = CE_RANGE.captures(text) {
        return capture_number(&caps, 1);
    }
    if let Some(caps) = CE_YEAR.captures(text) {
        let year = caps.get(1).or_else(|| caps.get(2));
        return year.and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
    }
    if let Some(caps) = BARE_RANGE.captures(text) {
        return capture_number(&caps, 1);
    }
    if let Some(caps) = BARE_YEAR.captures(text) {
        return capture_number(&caps, 1);
    }

    parse_calendar_year(text).unwrap_or(0)
}

fn capture_number(caps: &regex::Captures<'_>, group: usize) -> i64 {
    caps.get(group)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(0)
}

fn parse_calendar_year(text: &str) -> Option<i64> {
    use chrono::Datelike;

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.year() as i64);
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date.year() as i64);
        }
    }
    // Month-precision forms: "March 1990", "1990-03"
    if let Ok(date) = NaiveDate::parse_from_str(&format!("1 {text}"), "%d %B %Y") {
        return Some(date.year() as i64);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d") {
        return Some(date.year() as i64);
    }
    None
}

/// Sort in place. Both sorts are stable; `Desc` reverses the whole ascending
/// sequence afterwards.
pub fn sort_artworks(artworks: &mut [NormalizedArtwork], sort_by: SortBy, order: SortOrder) {
    match sort_by {
        SortBy::Medium => artworks.sort_by(|a, b| {
            a.medium
                .as_deref()
                .unwrap_or("")
                .cmp(b.medium.as_deref().unwrap_or(""))
        }),
        SortBy::Date => artworks.sort_by_cached_key(|a| date_rank(a.date.as_deref())),
    }

    if order == SortOrder::Desc {
        artworks.reverse();
    }
}
