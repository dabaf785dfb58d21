//! Auto-discovery: grow the registry from observed postings.

use crate::entry::AtsCompany;
use crate::error::Result;
use crate::registry::Registry;
use crate::store::RegistryStore;
use jobhunt_ats::{AtsIdentity, AtsResolver};
use jobhunt_core::{naming, Posting};
use std::collections::HashSet;

/// Adds companies behind newly observed postings to the registry.
#[derive(Clone)]
pub struct MergeEngine {
    resolver: AtsResolver,
}

impl MergeEngine {
    /// Create an engine that resolves identities with `resolver`.
    #[must_use]
    pub fn new(resolver: AtsResolver) -> Self {
        Self { resolver }
    }

    /// Resolve the company behind each posting and append the new ones to
    /// `registry`, saving through `store` when anything was added.
    ///
    /// Postings are processed strictly in input order so that the first
    /// posting of a company within a batch is the one that registers it.
    /// Running the same batch again adds nothing.
    ///
    /// # Errors
    /// Only persistence failures are returned; resolution failures just skip
    /// the posting.
    pub async fn merge_new_companies(
        &self,
        registry: &mut Registry,
        store: &RegistryStore,
        postings: &[Posting],
    ) -> Result<usize> {
        let added = self.merge_in_memory(registry, postings).await;

        if added > 0 {
            store.save(registry)?;
            tracing::info!(added, "registered newly discovered companies");
        } else {
            tracing::debug!(postings = postings.len(), "no new companies discovered");
        }

        Ok(added)
    }

    /// The merge without persistence. Returns the number of entries added.
    pub async fn merge_in_memory(&self, registry: &mut Registry, postings: &[Posting]) -> usize {
        let mut known_urls = registry.known_urls();
        let mut known_names = registry.known_names();
        let mut added = 0;

        for posting in postings {
            let Some(identity) = self.identify(posting, &known_names).await else {
                continue;
            };

            if let Some(entry) = accept(&identity, &mut known_urls, &mut known_names) {
                tracing::info!(
                    name = %entry.name,
                    url = %entry.url,
                    vendor = %entry.vendor,
                    "discovered ATS company"
                );
                registry.ats_companies.push(entry);
                added += 1;
            }
        }

        added
    }

    async fn identify(
        &self,
        posting: &Posting,
        known_names: &HashSet<String>,
    ) -> Option<AtsIdentity> {
        if let Some(identity) = self.resolver.resolve_url(&posting.job_url).await {
            return Some(identity);
        }

        let company = posting.company.trim();
        if company.is_empty() || known_names.contains(&naming::normalize_name(company)) {
            return None;
        }

        self.resolver.resolve_name(company).await
    }
}

/// Build the entry for `identity` unless its URL or name is already known,
/// recording both keys when accepted.
fn accept(
    identity: &AtsIdentity,
    known_urls: &mut HashSet<String>,
    known_names: &mut HashSet<String>,
) -> Option<AtsCompany> {
    let name = naming::capitalize_first(&identity.token);
    let url_key = naming::normalize_url(&identity.board_url);
    let name_key = naming::normalize_name(&name);

    if known_urls.contains(&url_key) || known_names.contains(&name_key) {
        return None;
    }

    known_urls.insert(url_key);
    known_names.insert(name_key);
    Some(AtsCompany::new(name, identity.board_url.clone(), identity.vendor))
}
