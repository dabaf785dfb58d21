//! Greenhouse board parser.
//!
//! Current `job-boards.greenhouse.io` pages ship their data in a loader-state
//! script (`window.__remixContext = {...}`) whose route data holds a
//! `jobPosts.data` array. Classic `boards.greenhouse.io` pages render one
//! `.opening` element per job instead. The structured payload wins whenever
//! it yields at least one posting.

use crate::error::ParseError;
use jobhunt_core::{AtsVendor, Posting, PostingSource};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

/// Script marker of the embedded loader state.
pub const EMBEDDED_STATE_MARKER: &str = "__remixContext";

/// Base used to absolutize relative DOM links.
pub const BOARDS_BASE_URL: &str = "https://boards.greenhouse.io";

const UNKNOWN_LOCATION: &str = "Unknown";

static SCRIPT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script").expect("script selector is hardcoded and valid"));
static OPENING: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".opening").expect("opening selector is hardcoded and valid"));
static ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("anchor selector is hardcoded and valid"));
static LOCATION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".location").expect("location selector is hardcoded and valid"));

/// Parse a Greenhouse board page, structured data first.
#[must_use]
pub fn parse_board(html: &str, company: &str) -> Vec<Posting> {
    let document = Html::parse_document(html);

    match parse_embedded(&document, company) {
        Ok(postings) if !postings.is_empty() => return postings,
        Ok(_) => tracing::debug!(company, "embedded job list is empty, falling back to DOM"),
        Err(e) => tracing::debug!(company, reason = %e, "falling back to DOM parsing"),
    }

    parse_openings(&document, company)
}

/// Extract postings from the embedded loader-state script.
pub fn parse_embedded(document: &Html, company: &str) -> Result<Vec<Posting>, ParseError> {
    let script = document
        .select(&SCRIPT)
        .map(|el| el.text().collect::<String>())
        .find(|text| text.contains(EMBEDDED_STATE_MARKER))
        .ok_or(ParseError::MissingPayload)?;

    let state = leading_json_value(&script)?;

    let entries = find_key(&state, "jobPosts")
        .and_then(|posts| posts.get("data"))
        .and_then(Value::as_array)
        .ok_or(ParseError::MissingJobPosts)?;

    Ok(entries
        .iter()
        .filter_map(|entry| posting_from_entry(entry, company))
        .collect())
}

/// Extract postings from classic `.opening` elements.
#[must_use]
pub fn parse_openings(document: &Html, company: &str) -> Vec<Posting> {
    document
        .select(&OPENING)
        .filter_map(|opening| posting_from_opening(&opening, company))
        .collect()
}

fn posting_from_entry(entry: &Value, company: &str) -> Option<Posting> {
    let title = entry.get("title")?.as_str()?.trim();
    let url = entry.get("absolute_url")?.as_str()?.trim();
    if title.is_empty() || url.is_empty() {
        return None;
    }

    let location = match entry.get("location") {
        Some(Value::String(name)) if !name.trim().is_empty() => name.trim(),
        Some(Value::Object(obj)) => obj
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNKNOWN_LOCATION),
        _ => UNKNOWN_LOCATION,
    };

    Some(Posting::new(
        company,
        title,
        location,
        url,
        PostingSource::Ats(AtsVendor::Greenhouse),
    ))
}

fn posting_from_opening(opening: &ElementRef, company: &str) -> Option<Posting> {
    let anchor = opening.select(&ANCHOR).next()?;
    let href = anchor.value().attr("href")?.trim();
    let title = collapse_text(&anchor);
    if title.is_empty() || href.is_empty() {
        return None;
    }

    let location = opening
        .select(&LOCATION)
        .next()
        .map(|el| collapse_text(&el))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

    Some(Posting::new(
        company,
        title,
        location,
        absolutize(href),
        PostingSource::Ats(AtsVendor::Greenhouse),
    ))
}

fn absolutize(href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{BOARDS_BASE_URL}{href}")
    } else {
        format!("{BOARDS_BASE_URL}/{href}")
    }
}

fn collapse_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The JSON object assigned in a script. Statements after it are ignored.
fn leading_json_value(script: &str) -> Result<Value, ParseError> {
    let start = script.find('{').ok_or(ParseError::MissingPayload)?;
    serde_json::Deserializer::from_str(&script[start..])
        .into_iter::<Value>()
        .next()
        .ok_or(ParseError::MissingPayload)?
        .map_err(ParseError::from)
}

/// Depth-first search for the first object member named `key`.
fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map
            .get(key)
            .or_else(|| map.values().find_map(|v| find_key(v, key))),
        Value::Array(items) => items.iter().find_map(|v| find_key(v, key)),
        _ => None,
    }
}
