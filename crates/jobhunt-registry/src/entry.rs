//! Registry entry records.

use jobhunt_core::AtsVendor;
use serde::{Deserialize, Serialize};

/// A company monitored directly through its ATS board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtsCompany {
    /// Display name
    pub name: String,
    /// Canonical board URL, stored with its original casing
    pub url: String,
    /// Vendor hosting the board
    #[serde(rename = "type")]
    pub vendor: AtsVendor,
    /// Case-insensitive title filters; empty keeps every posting
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl AtsCompany {
    /// Entry without keyword filters.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>, vendor: AtsVendor) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            vendor,
            keywords: Vec::new(),
        }
    }
}

/// A company monitored through generic job search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorCompany {
    /// Display name, also the search term
    pub name: String,
    /// Search location; the configured default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Case-insensitive title filters; empty keeps every posting
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl AggregatorCompany {
    /// Entry with no location and no keyword filters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
            keywords: Vec::new(),
        }
    }
}
