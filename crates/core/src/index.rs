//! Full catalog index, fetched once per session.
//!
//! The upstream API only paginates in identifier order, so the complete
//! `{id, name, url}` list is the substrate for name ordering and substring
//! search. It is never refreshed or mutated after population.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use crate::catalog::{CatalogError, CatalogGateway, IndexEntry};
use crate::collation::sort_by_name;

/// Immutable view of the populated index.
#[derive(Debug, Clone)]
pub struct IndexSnapshot {
    entries: Vec<IndexEntry>,
    by_name: Vec<IndexEntry>,
}

impl IndexSnapshot {
    /// Build a snapshot, pre-sorting a by-name copy.
    pub fn new(entries: Vec<IndexEntry>) -> Self {
        let mut by_name = entries.clone();
        sort_by_name(&mut by_name, |e| e.name.as_str());
        Self { entries, by_name }
    }

    /// Entries in upstream (identifier) order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Entries ordered by case- and accent-insensitive name.
    pub fn sorted_by_name(&self) -> &[IndexEntry] {
        &self.by_name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry (upstream order) whose name contains `term`, ignoring case.
    pub fn find_containing(&self, term: &str) -> Option<&IndexEntry> {
        let term = term.to_lowercase();
        self.entries
            .iter()
            .find(|e| e.name.to_lowercase().contains(&term))
    }
}

/// Populate-once holder for the session's index.
#[derive(Debug, Default)]
pub struct IndexCache {
    cell: OnceCell<Arc<IndexSnapshot>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache that is ready from the start.
    pub fn with_entries(entries: Vec<IndexEntry>) -> Self {
        Self {
            cell: OnceCell::new_with(Some(Arc::new(IndexSnapshot::new(entries)))),
        }
    }

    /// Fetch the index unless already populated.
    ///
    /// Concurrent callers share one fetch. A failed fetch leaves the cache
    /// empty so a later call may try again.
    pub async fn populate(
        &self,
        gateway: &CatalogGateway,
    ) -> Result<Arc<IndexSnapshot>, CatalogError> {
        let snapshot = self
            .cell
            .get_or_try_init(|| async {
                let entries = gateway.fetch_index().await?;
                let snapshot = IndexSnapshot::new(entries);
                info!("Catalog index ready ({} entries)", snapshot.len());
                Ok::<_, CatalogError>(Arc::new(snapshot))
            })
            .await?;
        Ok(Arc::clone(snapshot))
    }

    /// The populated snapshot, or `None` while population is pending.
    pub fn snapshot(&self) -> Option<Arc<IndexSnapshot>> {
        self.cell.get().cloned()
    }

    pub fn is_ready(&self) -> bool {
        self.cell.initialized()
    }
}
