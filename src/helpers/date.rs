//! Date helper functions

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;

/// Used when a configured format cannot be rendered
const FALLBACK_FORMAT: &str = "%B %-d, %Y";

/// Format a date using a Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "MMMM D, YYYY") // -> "January 5, 2024"
/// ```
pub fn format_date(date: &NaiveDateTime, format: &str) -> String {
    let chrono_format = moment_to_chrono_format(format);
    let items: Vec<Item> = StrftimeItems::new(&chrono_format).collect();

    if items.iter().any(|item| matches!(item, Item::Error)) {
        tracing::warn!("Unsupported date format {:?}, using default", format);
        return date.format(FALLBACK_FORMAT).to_string();
    }

    date.format_with_items(items.iter()).to_string()
}

/// Format a date in ISO 8601 for `<time datetime="...">`
pub fn date_xml(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest patterns first within each unit
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("D", "%-d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
    ];

    // A literal '%' must not start a chrono specifier
    let mut result = format.replace('%', "%%");

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
