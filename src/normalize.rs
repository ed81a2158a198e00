//! Cleanup helpers for text pulled out of agenda pages.
//!
//! Everything here is pure and idempotent: feeding an already cleaned value
//! back through the same function returns it unchanged.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

/// A parenthesised aside. Non-greedy, so the first `)` closes the match.
static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(.*?\)").expect("bracket pattern is a valid regex"));

/// Date layout used on event pages, e.g. `Sep 19, 2024, 10:30 AM`.
/// Some pages put a weekday name in front of it.
const AGENDA_DATE_FORMAT: &str = "%b %d, %Y, %I:%M %p";

/// Only full weekday names are accepted in front of the date.
const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const NORMALIZED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Heading anchors leave a pilcrow in contribution titles, sometimes mis-decoded as `Â¶`.
const TITLE_ARTIFACTS: [&str; 2] = ["\u{c2}\u{b6}", "\u{b6}"];

/// Remove every `( ... )` group including its content, then trim.
///
/// Used for speaker names, where the brackets hold affiliation notes.
pub fn strip_bracketed(text: &str) -> String {
    BRACKETED.replace_all(text, "").trim().to_string()
}

/// Remove the `(` and `)` characters but keep what they enclose.
///
/// Used for institutions, which the site wraps in brackets.
pub fn strip_parens_chars(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '(' | ')')).collect()
}

/// Collapse runs of whitespace (tabs and newlines included) to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn strip_title_artifacts(text: &str) -> String {
    TITLE_ARTIFACTS
        .iter()
        .fold(text.to_string(), |acc, artifact| acc.replace(artifact, ""))
}

/// Parse an agenda timestamp in either of its two layouts.
///
/// The weekday prefix must be a full day name but is not checked against the date.
pub fn parse_agenda_datetime(cleaned: &str) -> Option<NaiveDateTime> {
    if let Some((first, rest)) = cleaned.split_once(' ') {
        if WEEKDAYS.iter().any(|day| day.eq_ignore_ascii_case(first)) {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(rest, AGENDA_DATE_FORMAT) {
                return Some(parsed);
            }
        }
    }
    NaiveDateTime::parse_from_str(cleaned, AGENDA_DATE_FORMAT).ok()
}

/// Render an event date as `YYYY-MM-DD HH:MM`.
///
/// Input that matches neither layout comes back whitespace-collapsed but otherwise untouched.
pub fn normalize_date(raw: &str) -> String {
    let cleaned = collapse_whitespace(raw);
    match parse_agenda_datetime(&cleaned) {
        Some(parsed) => parsed.format(NORMALIZED_DATE_FORMAT).to_string(),
        None => cleaned,
    }
}
