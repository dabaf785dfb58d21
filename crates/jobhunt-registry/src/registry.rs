//! In-memory company registry.
//!
//! Both lists share one namespace: a name may appear only once across ATS and
//! aggregator entries, and an ATS board URL only once. Comparison always goes
//! through [`naming::normalize_name`] and [`naming::normalize_url`]; stored
//! values keep their original spelling.

use crate::entry::{AggregatorCompany, AtsCompany};
use crate::error::{RegistryError, Result};
use jobhunt_core::naming;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The monitored companies, partitioned by monitoring mechanism.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Registry {
    /// Companies scraped directly from their ATS board
    pub ats_companies: Vec<AtsCompany>,
    /// Companies found through generic job search
    pub aggregator_companies: Vec<AggregatorCompany>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries in both lists.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ats_companies.len() + self.aggregator_companies.len()
    }

    /// Whether both lists are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalized names of every entry.
    #[must_use]
    pub fn known_names(&self) -> HashSet<String> {
        self.names().map(naming::normalize_name).collect()
    }

    /// Normalized board URLs of every ATS entry.
    #[must_use]
    pub fn known_urls(&self) -> HashSet<String> {
        self.ats_companies
            .iter()
            .map(|company| naming::normalize_url(&company.url))
            .collect()
    }

    /// Whether any entry has this name, ignoring case and corporate suffixes.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        let key = naming::normalize_name(name);
        self.names().any(|existing| naming::normalize_name(existing) == key)
    }

    /// Whether an ATS entry has this board URL, ignoring case and a trailing
    /// slash.
    #[must_use]
    pub fn contains_url(&self, url: &str) -> bool {
        let key = naming::normalize_url(url);
        self.ats_companies
            .iter()
            .any(|company| naming::normalize_url(&company.url) == key)
    }

    /// Append an ATS entry.
    ///
    /// # Errors
    /// Returns [`RegistryError::Duplicate`] if the name or board URL is
    /// already registered.
    pub fn add_ats(&mut self, company: AtsCompany) -> Result<()> {
        if self.contains_name(&company.name) {
            return Err(RegistryError::Duplicate(company.name));
        }
        if self.contains_url(&company.url) {
            return Err(RegistryError::Duplicate(company.url));
        }

        tracing::debug!(name = %company.name, url = %company.url, "added ATS company");
        self.ats_companies.push(company);
        Ok(())
    }

    /// Append an aggregator entry.
    ///
    /// # Errors
    /// Returns [`RegistryError::Duplicate`] if the name is already registered.
    pub fn add_aggregator(&mut self, company: AggregatorCompany) -> Result<()> {
        if self.contains_name(&company.name) {
            return Err(RegistryError::Duplicate(company.name));
        }

        tracing::debug!(name = %company.name, "added aggregator company");
        self.aggregator_companies.push(company);
        Ok(())
    }

    /// Remove every entry matching `name` from either list.
    ///
    /// # Errors
    /// Returns [`RegistryError::NotFound`] if nothing matched.
    pub fn remove(&mut self, name: &str) -> Result<usize> {
        let key = naming::normalize_name(name);
        let before = self.len();

        self.ats_companies
            .retain(|company| naming::normalize_name(&company.name) != key);
        self.aggregator_companies
            .retain(|company| naming::normalize_name(&company.name) != key);

        let removed = before - self.len();
        if removed == 0 {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        Ok(removed)
    }

    /// Log a warning for every entry that collides with an earlier one.
    ///
    /// Hand-edited files can violate the uniqueness rules; such entries are
    /// kept as-is. Returns the number of collisions found.
    pub fn warn_duplicates(&self) -> usize {
        let mut names = HashSet::new();
        let mut urls = HashSet::new();
        let mut collisions = 0;

        for company in &self.ats_companies {
            if !names.insert(naming::normalize_name(&company.name)) {
                tracing::warn!(name = %company.name, "duplicate company name in registry");
                collisions += 1;
            }
            if !urls.insert(naming::normalize_url(&company.url)) {
                tracing::warn!(url = %company.url, "duplicate board URL in registry");
                collisions += 1;
            }
        }
        for company in &self.aggregator_companies {
            if !names.insert(naming::normalize_name(&company.name)) {
                tracing::warn!(name = %company.name, "duplicate company name in registry");
                collisions += 1;
            }
        }

        collisions
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.ats_companies
            .iter()
            .map(|company| company.name.as_str())
            .chain(
                self.aggregator_companies
                    .iter()
                    .map(|company| company.name.as_str()),
            )
    }
}
