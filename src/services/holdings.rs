//! Per-evaluation holdings cache

use std::collections::HashMap;

use crate::{error::AppResult, models::HoldingItem, services::catalog::CatalogConnection};

/// Memoized holdings lookups for a single hold evaluation.
///
/// Create one per incoming request; it is never shared between requests, so
/// cached holdings cannot outlive the evaluation that fetched them.
#[derive(Debug, Default)]
pub struct HoldingsCache {
    entries: HashMap<String, Vec<HoldingItem>>,
}

impl HoldingsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holdings for `id`, asking the catalog only on the first call.
    /// Catalog failures are returned as-is and nothing is cached.
    pub async fn fetch(
        &mut self,
        catalog: &dyn CatalogConnection,
        id: &str,
    ) -> AppResult<&[HoldingItem]> {
        if !self.entries.contains_key(id) {
            let holdings = catalog.get_holding(id).await?;
            tracing::debug!("Fetched {} holdings for record {}", holdings.len(), id);
            self.entries.insert(id.to_string(), holdings);
        }
        Ok(self.entries.get(id).map(Vec::as_slice).unwrap_or_default())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
