//! Company-name tokens and registry normalization keys.
//!
//! The same derivation serves two purposes: guessing an ATS board token from
//! a display name, and deciding whether two registry entries name the same
//! company ("Stripe, Inc." and "stripe" must collide).

use once_cell::sync::Lazy;
use regex::Regex;

/// Corporate suffixes stripped before deriving the short token.
pub const CORPORATE_SUFFIXES: [&str; 8] = [
    "Inc",
    "LLC",
    "Corp",
    "Ltd",
    "Therapeutics",
    "Group",
    "Holdings",
    "Technologies",
];

static SUFFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    let alternation = CORPORATE_SUFFIXES.join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
        .expect("corporate suffix regex is built from fixed words and valid")
});

/// All ASCII alphanumeric characters of `name`, lower-cased.
#[must_use]
pub fn full_token(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Remove corporate suffixes (whole words, case-insensitive) from `name`.
#[must_use]
pub fn strip_corporate_suffixes(name: &str) -> String {
    SUFFIX_REGEX.replace_all(name, "").into_owned()
}

/// Token derived after stripping corporate suffixes.
///
/// Only returned when it differs from [`full_token`] and is longer than two
/// characters.
#[must_use]
pub fn short_token(name: &str) -> Option<String> {
    let short = full_token(&strip_corporate_suffixes(name));
    (short != full_token(name) && short.len() > 2).then_some(short)
}

/// Candidate board tokens for a display name, full token first.
#[must_use]
pub fn candidate_tokens(name: &str) -> Vec<String> {
    let full = full_token(name);
    if full.is_empty() {
        return Vec::new();
    }

    let mut tokens = vec![full];
    if let Some(short) = short_token(name) {
        tokens.push(short);
    }
    tokens
}

/// Registry uniqueness key for a company display name.
///
/// Suffixes and punctuation are ignored and case is folded. Names made only
/// of suffixes fall back to their full token so they never collapse to an
/// empty key.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let stripped = full_token(&strip_corporate_suffixes(name));
    if !stripped.is_empty() {
        return stripped;
    }

    let full = full_token(name);
    if full.is_empty() {
        name.trim().to_lowercase()
    } else {
        full
    }
}

/// Registry uniqueness key for a board URL: no trailing slash, lower-cased.
///
/// Only used for comparison; stored URLs keep their original casing.
#[must_use]
pub fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_lowercase()
}

/// Whether `host` is `domain` itself or one of its subdomains
/// (`jobs.lever.co` is on `lever.co`, `clever.com` is not).
#[must_use]
pub fn host_on_domain(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.');
    if host.eq_ignore_ascii_case(domain) {
        return true;
    }
    let Some(split) = host.len().checked_sub(domain.len() + 1) else {
        return false;
    };
    host.as_bytes()[split] == b'.' && host[split + 1..].eq_ignore_ascii_case(domain)
}

/// Upper-case the first character of a token, keeping the rest as-is.
#[must_use]
pub fn capitalize_first(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_token() {
        assert_eq!(full_token("Stripe, Inc."), "stripeinc");
        assert_eq!(full_token("Moderna Therapeutics"), "modernatherapeutics");
        assert_eq!(full_token("  "), "");
    }

    #[test]
    fn test_strip_corporate_suffixes_whole_words_only() {
        assert_eq!(strip_corporate_suffixes("Acme Holdings, LLC"), "Acme , ");
        assert_eq!(strip_corporate_suffixes("acme inc."), "acme .");
        assert_eq!(strip_corporate_suffixes("Incyte Grouping"), "Incyte Grouping");
    }

    #[test]
    fn test_short_token() {
        assert_eq!(short_token("Stripe, Inc."), Some("stripe".to_string()));
        assert_eq!(
            short_token("Moderna Therapeutics"),
            Some("moderna".to_string())
        );
        // Unchanged by stripping
        assert_eq!(short_token("Anthropic"), None);
        // Too short after stripping
        assert_eq!(short_token("AB Holdings"), None);
        // Suffix only matches whole words
        assert_eq!(short_token("Incyte"), None);
    }

    #[test]
    fn test_candidate_tokens_order() {
        assert_eq!(
            candidate_tokens("Acme Technologies LLC"),
            vec!["acmetechnologiesllc".to_string(), "acme".to_string()]
        );
        assert_eq!(candidate_tokens("Netflix"), vec!["netflix".to_string()]);
        assert!(candidate_tokens("!!!").is_empty());
    }

    #[test]
    fn test_normalize_name_collides_on_suffixes() {
        assert_eq!(normalize_name("Stripe, Inc."), normalize_name("stripe"));
        assert_eq!(normalize_name("STRIPE"), "stripe");
        assert_ne!(normalize_name("Stripe"), normalize_name("Stripes"));
    }

    #[test]
    fn test_normalize_name_suffix_only() {
        assert_eq!(normalize_name("Group"), "group");
        assert_eq!(normalize_name("???"), "???");
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("https://Boards.Greenhouse.io/Stripe/"),
            "https://boards.greenhouse.io/stripe"
        );
        assert_eq!(
            normalize_url("https://jobs.lever.co/netflix"),
            "https://jobs.lever.co/netflix"
        );
    }

    #[test]
    fn test_host_on_domain() {
        assert!(host_on_domain("lever.co", "lever.co"));
        assert!(host_on_domain("jobs.lever.co", "lever.co"));
        assert!(host_on_domain("Job-Boards.Greenhouse.io", "greenhouse.io"));
        assert!(!host_on_domain("www.clever.com", "lever.co"));
        assert!(!host_on_domain("clever.co", "lever.co"));
        assert!(!host_on_domain("lever.co.example.com", "lever.co"));
        assert!(!host_on_domain("co", "lever.co"));
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("newcompany"), "Newcompany");
        assert_eq!(capitalize_first("openAI"), "OpenAI");
        assert_eq!(capitalize_first(""), "");
    }
}
