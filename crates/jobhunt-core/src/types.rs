//! Shared types used across the jobhunt workspace.
//!
//! Postings are transient scan output; only registry entries are persisted,
//! and those live in `jobhunt-registry`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Applicant Tracking System vendors whose boards can be scraped directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtsVendor {
    /// Greenhouse (`boards.greenhouse.io`, `job-boards.greenhouse.io`)
    Greenhouse,
    /// Lever (`jobs.lever.co`)
    Lever,
}

impl AtsVendor {
    /// All supported vendors.
    pub const ALL: [Self; 2] = [Self::Greenhouse, Self::Lever];

    /// Lowercase identifier used in the registry file and as provenance tag.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greenhouse => "greenhouse",
            Self::Lever => "lever",
        }
    }
}

impl fmt::Display for AtsVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AtsVendor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greenhouse" => Ok(Self::Greenhouse),
            "lever" => Ok(Self::Lever),
            other => Err(format!("unknown ATS vendor '{other}'")),
        }
    }
}

/// Employment type accepted by generic job search providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    /// Full-time
    Fulltime,
    /// Part-time
    Parttime,
    /// Contract
    Contract,
    /// Internship
    Internship,
    /// Temporary
    Temporary,
}

impl JobType {
    /// Identifier understood by search providers.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fulltime => "fulltime",
            Self::Parttime => "parttime",
            Self::Contract => "contract",
            Self::Internship => "internship",
            Self::Temporary => "temporary",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fulltime" => Ok(Self::Fulltime),
            "parttime" => Ok(Self::Parttime),
            "contract" => Ok(Self::Contract),
            "internship" => Ok(Self::Internship),
            "temporary" => Ok(Self::Temporary),
            other => Err(format!("unknown job type '{other}'")),
        }
    }
}

/// Provenance of a posting: which vendor or mechanism produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PostingSource {
    /// Scraped directly from an ATS board
    Ats(AtsVendor),
    /// Found by an aggregator search for a monitored company
    AggregatorMonitor,
    /// Found by a site-restricted web search over ATS hosts
    AtsDiscovery,
    /// Returned by a generic job search on the named site (e.g. "indeed")
    Site(String),
}

impl fmt::Display for PostingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ats(vendor) => f.write_str(vendor.as_str()),
            Self::AggregatorMonitor => f.write_str("Aggregator Monitor"),
            Self::AtsDiscovery => f.write_str("ATS Discovery"),
            Self::Site(site) => f.write_str(site),
        }
    }
}

/// One scraped job posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// Company display name as reported by the source
    pub company: String,
    /// Job title
    pub title: String,
    /// Location text ("Unknown" when the source gives none)
    pub location: String,
    /// Link to the posting
    pub job_url: String,
    /// Which vendor or mechanism produced this posting
    pub source: PostingSource,
    /// Direct application link, when the source distinguishes one
    pub direct_url: Option<String>,
    /// Date the posting went live, when known
    pub date_posted: Option<NaiveDate>,
    /// Registry name of the monitored company this posting was found for
    pub monitored_company: Option<String>,
}

impl Posting {
    /// Create a posting with the required fields.
    #[must_use]
    pub fn new(
        company: impl Into<String>,
        title: impl Into<String>,
        location: impl Into<String>,
        job_url: impl Into<String>,
        source: PostingSource,
    ) -> Self {
        Self {
            company: company.into(),
            title: title.into(),
            location: location.into(),
            job_url: job_url.into(),
            source,
            direct_url: None,
            date_posted: None,
            monitored_company: None,
        }
    }

    /// Set the direct application link.
    #[must_use]
    pub fn with_direct_url(mut self, url: impl Into<String>) -> Self {
        self.direct_url = Some(url.into());
        self
    }

    /// Set the posting date.
    #[must_use]
    pub fn with_date_posted(mut self, date: NaiveDate) -> Self {
        self.date_posted = Some(date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_round_trip_str() {
        for vendor in AtsVendor::ALL {
            assert_eq!(vendor.as_str().parse::<AtsVendor>(), Ok(vendor));
        }
        assert_eq!(" Lever ".parse::<AtsVendor>(), Ok(AtsVendor::Lever));
        assert!("workday".parse::<AtsVendor>().is_err());
    }

    #[test]
    fn test_vendor_serde_lowercase() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            vendor: AtsVendor,
        }

        let toml_str = toml::to_string(&Wrapper {
            vendor: AtsVendor::Greenhouse,
        })
        .expect("serialize vendor");
        assert_eq!(toml_str.trim(), r#"vendor = "greenhouse""#);
    }

    #[test]
    fn test_job_type_parse() {
        assert_eq!("fulltime".parse::<JobType>(), Ok(JobType::Fulltime));
        assert_eq!("Internship".parse::<JobType>(), Ok(JobType::Internship));
        assert!("gig".parse::<JobType>().is_err());
    }

    #[test]
    fn test_source_display() {
        assert_eq!(PostingSource::Ats(AtsVendor::Lever).to_string(), "lever");
        assert_eq!(
            PostingSource::AggregatorMonitor.to_string(),
            "Aggregator Monitor"
        );
        assert_eq!(PostingSource::Site("indeed".to_string()).to_string(), "indeed");
        assert_eq!(PostingSource::AtsDiscovery.to_string(), "ATS Discovery");
    }

    #[test]
    fn test_posting_builder() {
        let posting = Posting::new(
            "Acme",
            "Engineer",
            "Remote",
            "https://jobs.lever.co/acme/1",
            PostingSource::Ats(AtsVendor::Lever),
        )
        .with_direct_url("https://jobs.lever.co/acme/1/apply");

        assert_eq!(
            posting.direct_url.as_deref(),
            Some("https://jobs.lever.co/acme/1/apply")
        );
        assert!(posting.monitored_company.is_none());
        assert!(posting.date_posted.is_none());
    }
}
