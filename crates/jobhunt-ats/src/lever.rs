//! Lever board parser.
//!
//! Lever renders every job as a `.posting` element: an `h5` title inside the
//! title anchor, a `.location` label, and usually an "Apply" button
//! (`a.posting-btn-submit`).

use jobhunt_core::{AtsVendor, Posting, PostingSource};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const UNKNOWN_LOCATION: &str = "Unknown";

static POSTING: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".posting").expect("posting selector is hardcoded and valid"));
static HEADING: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h5").expect("heading selector is hardcoded and valid"));
static LOCATION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".location").expect("location selector is hardcoded and valid"));
static SUBMIT_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a.posting-btn-submit").expect("submit selector is hardcoded and valid")
});
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a.posting-title").expect("title link selector is hardcoded and valid")
});

/// Parse a Lever board page.
///
/// Links prefer the apply button, then the title anchor, then the board URL
/// itself.
#[must_use]
pub fn parse_board(html: &str, company: &str, board_url: &str) -> Vec<Posting> {
    let document = Html::parse_document(html);
    let base = Url::parse(board_url).ok();

    document
        .select(&POSTING)
        .filter_map(|posting| parse_posting(&posting, company, board_url, base.as_ref()))
        .collect()
}

fn parse_posting(
    posting: &ElementRef,
    company: &str,
    board_url: &str,
    base: Option<&Url>,
) -> Option<Posting> {
    let title = posting
        .select(&HEADING)
        .next()
        .map(|el| collapse_text(&el))
        .filter(|text| !text.is_empty())?;

    let location = posting
        .select(&LOCATION)
        .next()
        .map(|el| collapse_text(&el))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

    let link = href_of(posting, &SUBMIT_LINK)
        .or_else(|| href_of(posting, &TITLE_LINK))
        .map_or_else(|| board_url.to_string(), |href| resolve_href(base, href));

    Some(Posting::new(
        company,
        title,
        location,
        link,
        PostingSource::Ats(AtsVendor::Lever),
    ))
}

fn href_of<'a>(posting: &ElementRef<'a>, selector: &Selector) -> Option<&'a str> {
    posting
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
}

fn resolve_href(base: Option<&Url>, href: &str) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }
    base.and_then(|base| base.join(href).ok())
        .map_or_else(|| href.to_string(), |url| url.to_string())
}

fn collapse_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
