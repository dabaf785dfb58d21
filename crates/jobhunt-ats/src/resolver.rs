//! ATS identity resolution.
//!
//! Given a URL or a company name, determine the board token, canonical
//! board URL and vendor. Strategies run in a fixed order and the first one
//! that produces an identity wins:
//!
//! 1. [`ResolutionStrategy::UrlPattern`] - parse the URL itself (no network)
//! 2. [`ResolutionStrategy::ContentScan`] - fetch the page and look for an
//!    embedded board token
//! 3. [`ResolutionStrategy::NameProbe`] - guess tokens from a company name
//!    and probe the vendor hosts
//!
//! URL input only ever reaches strategies 1 and 2; the name probe has its
//! own entry point ([`AtsResolver::probe_name`]).

use jobhunt_core::{naming, AtsVendor, ScanningConfig};
use jobhunt_http::HttpFetcher;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Classic Greenhouse board host.
pub const GREENHOUSE_BOARDS_HOST: &str = "boards.greenhouse.io";
/// Current Greenhouse board host.
pub const GREENHOUSE_JOB_BOARDS_HOST: &str = "job-boards.greenhouse.io";
/// Lever board host.
pub const LEVER_HOST: &str = "jobs.lever.co";

/// Path segments after `greenhouse.io/` that are never company tokens.
pub const RESERVED_GREENHOUSE_TOKENS: [&str; 4] = ["api", "embed", "v1", "js"];

static GREENHOUSE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"greenhouse\.io/(?:embed/)?(?:boards/)?([A-Za-z0-9_]+)")
        .expect("Greenhouse token regex is hardcoded and valid")
});

static LEVER_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"jobs\.lever\.co/([A-Za-z0-9_]+)").expect("Lever token regex is hardcoded and valid")
});

/// A resolved ATS board.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtsIdentity {
    /// Company token on the vendor (e.g. `stripe`)
    pub token: String,
    /// Canonical board URL (e.g. `https://boards.greenhouse.io/stripe`)
    pub board_url: String,
    /// Vendor hosting the board
    pub vendor: AtsVendor,
}

impl AtsIdentity {
    /// Identity on the given host, with the canonical `https://host/token` URL.
    #[must_use]
    pub fn new(token: impl Into<String>, host: &str, vendor: AtsVendor) -> Self {
        let token = token.into();
        Self {
            board_url: format!("https://{host}/{token}"),
            token,
            vendor,
        }
    }
}

/// The strategies, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionStrategy {
    /// Host and first path segment of the URL
    UrlPattern,
    /// Token embedded in the fetched page
    ContentScan,
    /// HEAD probes of tokens guessed from a company name
    NameProbe,
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UrlPattern => "url-pattern",
            Self::ContentScan => "content-scan",
            Self::NameProbe => "name-probe",
        })
    }
}

/// Resolves URLs and company names to ATS identities.
#[derive(Clone)]
pub struct AtsResolver {
    fetcher: Arc<dyn HttpFetcher>,
    content_scan_timeout: Duration,
    probe_timeout: Duration,
}

impl AtsResolver {
    /// Create a resolver with the configured probe timeouts.
    #[must_use]
    pub fn new(fetcher: Arc<dyn HttpFetcher>, config: &ScanningConfig) -> Self {
        Self {
            fetcher,
            content_scan_timeout: config.content_scan_timeout(),
            probe_timeout: config.probe_timeout(),
        }
    }

    /// Resolve a URL: pattern match first, then a content scan for `http`
    /// inputs. Malformed input resolves to `None`.
    pub async fn resolve_url(&self, input: &str) -> Option<AtsIdentity> {
        if let Some(identity) = Self::match_url_pattern(input) {
            log_resolved(input, &identity, ResolutionStrategy::UrlPattern);
            return Some(identity);
        }

        if !input.trim_start().starts_with("http") {
            return None;
        }

        let identity = self.scan_content(input.trim()).await?;
        log_resolved(input, &identity, ResolutionStrategy::ContentScan);
        Some(identity)
    }

    /// Resolve a company display name by probing guessed board URLs.
    pub async fn resolve_name(&self, name: &str) -> Option<AtsIdentity> {
        let identity = self.probe_name(name).await?;
        log_resolved(name, &identity, ResolutionStrategy::NameProbe);
        Some(identity)
    }

    /// Strategy 1: read the token straight from a vendor URL.
    ///
    /// The host must be the vendor domain or one of its subdomains, and the
    /// token is the first path segment. Greenhouse URLs keep the `job-boards`
    /// host when the input mentions it; Lever URLs always map to
    /// `jobs.lever.co`.
    #[must_use]
    pub fn match_url_pattern(input: &str) -> Option<AtsIdentity> {
        let url = parse_loose(input)?;
        let host = url.host_str()?;

        if naming::host_on_domain(host, "greenhouse.io") {
            let token = first_path_segment(&url)?;
            let canonical_host = if input
                .to_ascii_lowercase()
                .contains(GREENHOUSE_JOB_BOARDS_HOST)
            {
                GREENHOUSE_JOB_BOARDS_HOST
            } else {
                GREENHOUSE_BOARDS_HOST
            };
            return Some(AtsIdentity::new(token, canonical_host, AtsVendor::Greenhouse));
        }

        if naming::host_on_domain(host, "lever.co") {
            let token = first_path_segment(&url)?;
            return Some(AtsIdentity::new(token, LEVER_HOST, AtsVendor::Lever));
        }

        None
    }

    /// Strategy 2: fetch `url` and scan its body for an embedded board token.
    ///
    /// Any fetch failure or non-2xx answer yields `None`.
    pub async fn scan_content(&self, url: &str) -> Option<AtsIdentity> {
        let page = match self.fetcher.get(url, self.content_scan_timeout).await {
            Ok(page) => page,
            Err(e) => {
                tracing::debug!(url, error = %e, "content scan fetch failed");
                return None;
            }
        };

        if !(200..300).contains(&page.status) {
            tracing::debug!(url, status = page.status, "content scan skipped non-success page");
            return None;
        }

        Self::scan_body(&page.body)
    }

    /// Find the first usable board token in page text, Greenhouse before Lever.
    #[must_use]
    pub fn scan_body(body: &str) -> Option<AtsIdentity> {
        let greenhouse = GREENHOUSE_TOKEN.captures_iter(body).find_map(|caps| {
            let whole = caps.get(0)?;
            let token = caps.get(1)?.as_str();
            if RESERVED_GREENHOUSE_TOKENS
                .iter()
                .any(|reserved| token.eq_ignore_ascii_case(reserved))
            {
                return None;
            }

            let host = if preceded_by(body, whole.start(), "job-boards.") {
                GREENHOUSE_JOB_BOARDS_HOST
            } else {
                GREENHOUSE_BOARDS_HOST
            };
            Some(AtsIdentity::new(token, host, AtsVendor::Greenhouse))
        });

        greenhouse.or_else(|| {
            LEVER_TOKEN
                .captures(body)
                .and_then(|caps| caps.get(1))
                .map(|token| AtsIdentity::new(token.as_str(), LEVER_HOST, AtsVendor::Lever))
        })
    }

    /// Strategy 3: probe board URLs built from tokens guessed from `name`.
    ///
    /// For each candidate token (full, then suffix-stripped) the classic
    /// Greenhouse, current Greenhouse and Lever URLs are tried with HEAD. The
    /// first `200` answer with an HTML content type wins.
    pub async fn probe_name(&self, name: &str) -> Option<AtsIdentity> {
        for token in naming::candidate_tokens(name) {
            for (host, vendor) in [
                (GREENHOUSE_BOARDS_HOST, AtsVendor::Greenhouse),
                (GREENHOUSE_JOB_BOARDS_HOST, AtsVendor::Greenhouse),
                (LEVER_HOST, AtsVendor::Lever),
            ] {
                let candidate = AtsIdentity::new(token.clone(), host, vendor);
                match self
                    .fetcher
                    .head(&candidate.board_url, self.probe_timeout)
                    .await
                {
                    Ok(response) if response.is_ok() && response.is_html() => {
                        return Some(candidate);
                    }
                    Ok(response) => tracing::trace!(
                        url = %candidate.board_url,
                        status = response.status,
                        "probe rejected"
                    ),
                    Err(e) => tracing::trace!(
                        url = %candidate.board_url,
                        error = %e,
                        "probe failed"
                    ),
                }
            }
        }

        tracing::debug!(name, "no ATS board found for company name");
        None
    }
}

fn log_resolved(input: &str, identity: &AtsIdentity, strategy: ResolutionStrategy) {
    tracing::debug!(
        input,
        token = %identity.token,
        vendor = %identity.vendor,
        strategy = %strategy,
        "resolved ATS identity"
    );
}

fn preceded_by(text: &str, at: usize, prefix: &str) -> bool {
    let before = &text.as_bytes()[..at];
    before.len() >= prefix.len()
        && before[before.len() - prefix.len()..].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Parse a URL, accepting scheme-less input such as `jobs.lever.co/acme`.
fn parse_loose(input: &str) -> Option<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    match Url::parse(trimmed) {
        Ok(url) if url.host_str().is_some() => Some(url),
        Ok(_) => None,
        Err(_) if !trimmed.contains("://") => Url::parse(&format!("https://{trimmed}"))
            .ok()
            .filter(|url| url.host_str().is_some_and(|host| host.contains('.'))),
        Err(_) => None,
    }
}

/// First path segment, with leading slashes stripped; query and fragment are
/// already split off by the parser.
fn first_path_segment(url: &Url) -> Option<String> {
    url.path()
        .trim_start_matches('/')
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobhunt_http::stub::StubFetcher;
    use jobhunt_http::FetchResponse;

    fn resolver(fetcher: StubFetcher) -> (AtsResolver, Arc<StubFetcher>) {
        let fetcher = Arc::new(fetcher);
        (
            AtsResolver::new(fetcher.clone(), &ScanningConfig::default()),
            fetcher,
        )
    }

    fn expected(token: &str, url: &str, vendor: AtsVendor) -> Option<AtsIdentity> {
        Some(AtsIdentity {
            token: token.to_string(),
            board_url: url.to_string(),
            vendor,
        })
    }

    fn html_head(url: &str, status: u16) -> FetchResponse {
        FetchResponse {
            status,
            final_url: url.to_string(),
            content_type: Some("text/html".to_string()),
            body: String::new(),
        }
    }

    #[test]
    fn test_url_pattern_vendor_urls() {
        assert_eq!(
            AtsResolver::match_url_pattern("https://boards.greenhouse.io/stripe/jobs/123"),
            expected(
                "stripe",
                "https://boards.greenhouse.io/stripe",
                AtsVendor::Greenhouse
            )
        );
        assert_eq!(
            AtsResolver::match_url_pattern("https://job-boards.greenhouse.io/anthropic/jobs/456"),
            expected(
                "anthropic",
                "https://job-boards.greenhouse.io/anthropic",
                AtsVendor::Greenhouse
            )
        );
        assert_eq!(
            AtsResolver::match_url_pattern("https://jobs.lever.co/netflix/789"),
            expected("netflix", "https://jobs.lever.co/netflix", AtsVendor::Lever)
        );
    }

    #[test]
    fn test_url_pattern_trims_query_and_slashes() {
        assert_eq!(
            AtsResolver::match_url_pattern("https://boards.greenhouse.io//acme?gh_src=abc"),
            expected(
                "acme",
                "https://boards.greenhouse.io/acme",
                AtsVendor::Greenhouse
            )
        );
        assert_eq!(
            AtsResolver::match_url_pattern("https://jobs.lever.co/acme?lever-origin=applied"),
            expected("acme", "https://jobs.lever.co/acme", AtsVendor::Lever)
        );
        // Other Lever hosts canonicalize to jobs.lever.co
        assert_eq!(
            AtsResolver::match_url_pattern("https://jobs.eu.lever.co/acme/1"),
            expected("acme", "https://jobs.lever.co/acme", AtsVendor::Lever)
        );
    }

    #[test]
    fn test_url_pattern_schemeless_input() {
        assert_eq!(
            AtsResolver::match_url_pattern("jobs.lever.co/acme/42"),
            expected("acme", "https://jobs.lever.co/acme", AtsVendor::Lever)
        );
    }

    #[test]
    fn test_url_pattern_rejects_other_input() {
        assert_eq!(
            AtsResolver::match_url_pattern("https://www.google.com/careers"),
            None
        );
        assert_eq!(AtsResolver::match_url_pattern("https://boards.greenhouse.io/"), None);
        assert_eq!(AtsResolver::match_url_pattern("Stripe, Inc."), None);
        assert_eq!(AtsResolver::match_url_pattern(""), None);
        assert_eq!(AtsResolver::match_url_pattern("http://"), None);
    }

    #[test]
    fn test_url_pattern_requires_vendor_domain() {
        assert_eq!(
            AtsResolver::match_url_pattern("https://www.clever.com/careers"),
            None
        );
        assert_eq!(
            AtsResolver::match_url_pattern("https://notgreenhouse.io/acme"),
            None
        );
        assert_eq!(
            AtsResolver::match_url_pattern("https://lever.co.example.com/acme"),
            None
        );
        assert_eq!(
            AtsResolver::match_url_pattern("https://lever.co/acme"),
            expected("acme", "https://jobs.lever.co/acme", AtsVendor::Lever)
        );
    }

    #[tokio::test]
    async fn test_resolve_url_lookalike_host_uses_content_scan() {
        let fetcher = StubFetcher::new().with_page(
            "https://www.clever.com/careers",
            200,
            r#"<a href="https://jobs.lever.co/clever/abc">Apply</a>"#,
        );
        let (resolver, fetcher) = resolver(fetcher);

        assert_eq!(
            resolver.resolve_url("https://www.clever.com/careers").await,
            expected("clever", "https://jobs.lever.co/clever", AtsVendor::Lever)
        );
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[test]
    fn test_url_pattern_job_boards_mentioned_in_input() {
        assert_eq!(
            AtsResolver::match_url_pattern(
                "https://boards.greenhouse.io/acme/jobs/1?ref=job-boards.greenhouse.io"
            ),
            expected(
                "acme",
                "https://job-boards.greenhouse.io/acme",
                AtsVendor::Greenhouse
            )
        );
        assert_eq!(
            AtsResolver::match_url_pattern("https://JOB-BOARDS.greenhouse.io/acme"),
            expected(
                "acme",
                "https://job-boards.greenhouse.io/acme",
                AtsVendor::Greenhouse
            )
        );
    }

    #[test]
    fn test_scan_body_skips_reserved_tokens() {
        let body = r#"
            <script src="https://boards.greenhouse.io/embed/js"></script>
            <script src="https://boards-api.greenhouse.io/v1/boards/ignored"></script>
            <iframe src="https://boards.greenhouse.io/embed/job_board?for=acme"></iframe>
        "#;
        // `embed/` is optional in the pattern, so the first match token is
        // `js` (reserved), then `v1` (reserved), then `job_board`.
        assert_eq!(
            AtsResolver::scan_body(body),
            expected(
                "job_board",
                "https://boards.greenhouse.io/job_board",
                AtsVendor::Greenhouse
            )
        );
    }

    #[test]
    fn test_scan_body_greenhouse_before_lever() {
        let body = r#"<a href="https://jobs.lever.co/other">x</a>
                      <a href="https://job-boards.greenhouse.io/acme">y</a>"#;
        assert_eq!(
            AtsResolver::scan_body(body),
            expected(
                "acme",
                "https://job-boards.greenhouse.io/acme",
                AtsVendor::Greenhouse
            )
        );
    }

    #[test]
    fn test_scan_body_lever_only() {
        let body = r#"<a href="https://jobs.lever.co/acme_bio/apply">Careers</a>"#;
        assert_eq!(
            AtsResolver::scan_body(body),
            expected("acme_bio", "https://jobs.lever.co/acme_bio", AtsVendor::Lever)
        );
        assert_eq!(AtsResolver::scan_body("<p>We are hiring!</p>"), None);
    }

    #[tokio::test]
    async fn test_resolve_url_pattern_needs_no_network() {
        let (resolver, fetcher) = resolver(StubFetcher::new());
        let identity = resolver
            .resolve_url("https://boards.greenhouse.io/stripe/jobs/1")
            .await;
        assert!(identity.is_some());
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_url_falls_back_to_content_scan() {
        let careers = "https://www.acme.com/careers";
        let (resolver, fetcher) = resolver(StubFetcher::new().with_page(
            careers,
            200,
            r#"<div id="grnhse_app"></div><script src="https://boards.greenhouse.io/embed/job_board/js?for=acme"></script>"#,
        ));

        let identity = resolver.resolve_url(careers).await.expect("content scan hit");
        assert_eq!(identity.vendor, AtsVendor::Greenhouse);

        let requests = fetcher.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_resolve_url_not_found() {
        let careers = "https://www.example.com/careers";
        let (resolver, _) = resolver(StubFetcher::new().with_page(careers, 200, "<p>Jobs</p>"));
        assert_eq!(resolver.resolve_url(careers).await, None);
    }

    #[tokio::test]
    async fn test_resolve_url_swallows_network_errors() {
        let (resolver, _) = resolver(StubFetcher::new().with_timeout("https://down.example.com"));
        assert_eq!(resolver.resolve_url("https://down.example.com").await, None);
    }

    #[tokio::test]
    async fn test_resolve_url_ignores_error_pages() {
        let url = "https://www.acme.com/careers";
        let (resolver, _) = resolver(StubFetcher::new().with_page(
            url,
            404,
            r#"<a href="https://jobs.lever.co/acme">old</a>"#,
        ));
        assert_eq!(resolver.resolve_url(url).await, None);
    }

    #[tokio::test]
    async fn test_resolve_url_never_scans_non_http_input() {
        let (resolver, fetcher) = resolver(StubFetcher::new());
        assert_eq!(resolver.resolve_url("not a url at all").await, None);
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_probe_name_first_accepted_candidate_wins() {
        let (resolver, fetcher) = resolver(
            StubFetcher::new()
                .with_response(
                    "https://boards.greenhouse.io/acmeinc",
                    html_head("https://boards.greenhouse.io/acmeinc", 404),
                )
                .with_response(
                    "https://jobs.lever.co/acme",
                    html_head("https://jobs.lever.co/acme", 200),
                ),
        );

        let identity = resolver.resolve_name("Acme, Inc.").await;
        assert_eq!(
            identity,
            expected("acme", "https://jobs.lever.co/acme", AtsVendor::Lever)
        );

        assert_eq!(
            fetcher.requested_urls(),
            vec![
                "https://boards.greenhouse.io/acmeinc",
                "https://job-boards.greenhouse.io/acmeinc",
                "https://jobs.lever.co/acmeinc",
                "https://boards.greenhouse.io/acme",
                "https://job-boards.greenhouse.io/acme",
                "https://jobs.lever.co/acme",
            ]
        );
        assert!(fetcher
            .requests()
            .iter()
            .all(|r| r.method == "HEAD" && r.timeout == Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_probe_name_requires_html() {
        let url = "https://boards.greenhouse.io/widgets";
        let (resolver, _) = resolver(StubFetcher::new().with_response(
            url,
            FetchResponse {
                status: 200,
                final_url: url.to_string(),
                content_type: Some("application/json".to_string()),
                body: String::new(),
            },
        ));
        assert_eq!(resolver.probe_name("Widgets").await, None);
    }

    #[tokio::test]
    async fn test_probe_name_exhausted() {
        let (resolver, fetcher) = resolver(StubFetcher::new());
        assert_eq!(resolver.probe_name("Nobody").await, None);
        assert_eq!(fetcher.requests().len(), 3);

        // Nothing to guess from
        assert_eq!(resolver.probe_name("...").await, None);
        assert_eq!(fetcher.requests().len(), 3);
    }
}
