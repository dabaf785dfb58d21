//! Title and company filters.

/// Case-insensitive title filter: a title passes if it contains any keyword.
///
/// An empty filter passes everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    /// Build a filter from raw keywords; blank ones are ignored.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Whether the filter has no keywords.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Whether `title` passes the filter.
    #[must_use]
    pub fn matches(&self, title: &str) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let title = title.to_lowercase();
        self.keywords.iter().any(|k| title.contains(k.as_str()))
    }
}

/// Whether a reported company name loosely refers to `target`.
///
/// Drops aggregator rows where the target only shows up in passing, such as
/// a staffing agency advertising for it under its own name.
#[must_use]
pub fn company_matches(company: &str, target: &str) -> bool {
    let target = target.trim().to_lowercase();
    !target.is_empty() && company.to_lowercase().contains(&target)
}
