//! Pagination strategies for the two list orderings.
//!
//! Identifier order maps directly onto the upstream pagination. Name order is
//! served from the sorted index: the offset is a position in that sequence and
//! entries are built without a type lookup, so their badges stay empty until
//! the entry is opened.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{
    AssetUrls, CatalogEntry, CatalogError, CatalogGateway, IndexEntry, Language, Page,
};
use crate::index::IndexCache;

/// List ordering selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "id")]
    ById,
    #[serde(rename = "name")]
    ByName,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::ById => f.write_str("id"),
            SortOrder::ByName => f.write_str("name"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortOrder::ById),
            "name" => Ok(SortOrder::ByName),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Identifier-ordered pages straight from the upstream.
pub struct IdentifierPaginator {
    gateway: Arc<CatalogGateway>,
    page_size: usize,
    language: Language,
}

impl IdentifierPaginator {
    pub async fn fetch_page(&self, offset: usize) -> Result<Page, CatalogError> {
        self.gateway
            .fetch_page(self.page_size, offset, self.language)
            .await
    }
}

/// Name-ordered pages sliced from the sorted index.
pub struct NamePaginator {
    index: Arc<IndexCache>,
    assets: AssetUrls,
    page_size: usize,
}

impl NamePaginator {
    pub fn fetch_page(&self, offset: usize) -> Result<Page, CatalogError> {
        let snapshot = self.index.snapshot().ok_or(CatalogError::IndexNotReady)?;
        Ok(name_page(
            snapshot.sorted_by_name(),
            &self.assets,
            offset,
            self.page_size,
        ))
    }
}

/// Slice `[offset, offset + page_size)` of a name-sorted index.
pub fn name_page(
    sorted: &[IndexEntry],
    assets: &AssetUrls,
    offset: usize,
    page_size: usize,
) -> Page {
    let start = offset.min(sorted.len());
    let end = offset.saturating_add(page_size).min(sorted.len());

    let items = sorted[start..end]
        .iter()
        .map(|e| CatalogEntry {
            id: e.id.clone(),
            name: e.name.clone(),
            image_url: assets.artwork_url(&e.id),
            types: Vec::new(),
            source_url: e.source_url.clone(),
        })
        .collect();

    let next_offset = offset + page_size;
    Page {
        items,
        next_offset,
        has_more: next_offset < sorted.len(),
    }
}

/// The closed set of pagination strategies.
pub enum Paginator {
    ByIdentifier(IdentifierPaginator),
    ByName(NamePaginator),
}

impl Paginator {
    pub fn new(
        order: SortOrder,
        gateway: Arc<CatalogGateway>,
        index: Arc<IndexCache>,
        page_size: usize,
        language: Language,
    ) -> Self {
        match order {
            SortOrder::ById => Paginator::ByIdentifier(IdentifierPaginator {
                gateway,
                page_size,
                language,
            }),
            SortOrder::ByName => Paginator::ByName(NamePaginator {
                index,
                assets: gateway.assets().clone(),
                page_size,
            }),
        }
    }

    pub fn order(&self) -> SortOrder {
        match self {
            Paginator::ByIdentifier(_) => SortOrder::ById,
            Paginator::ByName(_) => SortOrder::ByName,
        }
    }

    /// Whether a page can be requested now. Name order waits for the index.
    pub fn is_ready(&self) -> bool {
        match self {
            Paginator::ByIdentifier(_) => true,
            Paginator::ByName(p) => p.index.is_ready(),
        }
    }

    pub async fn fetch_page(&self, offset: usize) -> Result<Page, CatalogError> {
        match self {
            Paginator::ByIdentifier(p) => p.fetch_page(offset).await,
            Paginator::ByName(p) => p.fetch_page(offset),
        }
    }
}
