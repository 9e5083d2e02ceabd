//! Accumulated list state for the paginated screen.
//!
//! Every fetch is split into a begin step (under the lock, returns a ticket
//! carrying the current generation) and an apply step (under the lock again,
//! dropped when the generation moved on). Resetting bumps the generation, so
//! results of requests started before a sort switch, a refresh or a language
//! change can never land in the new sequence.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::catalog::{CatalogEntry, CatalogError, CatalogGateway, Language, Page};
use crate::index::IndexCache;
use crate::paginator::{Paginator, SortOrder};

/// Read-only copy of the list state.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ListSnapshot {
    pub order: SortOrder,
    /// Entries in arrival order, without duplicates.
    pub items: Vec<CatalogEntry>,
    pub next_offset: usize,
    pub has_more: bool,
    pub loading: bool,
    pub refreshing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

#[derive(Debug)]
struct ListState {
    order: SortOrder,
    items: Vec<CatalogEntry>,
    seen: HashSet<String>,
    next_offset: usize,
    has_more: bool,
    loading: bool,
    refreshing: bool,
    last_error: Option<String>,
    generation: u64,
}

impl ListState {
    fn new(order: SortOrder) -> Self {
        Self {
            order,
            items: Vec::new(),
            seen: HashSet::new(),
            next_offset: 0,
            has_more: true,
            loading: false,
            refreshing: false,
            last_error: None,
            generation: 0,
        }
    }

    /// Drop everything accumulated and invalidate in-flight requests.
    fn reset(&mut self) {
        self.generation += 1;
        self.items.clear();
        self.seen.clear();
        self.next_offset = 0;
        self.has_more = true;
        self.loading = false;
        self.refreshing = false;
        self.last_error = None;
    }

    fn append(&mut self, page: Page) {
        for item in page.items {
            if self.seen.insert(item.id.clone()) {
                self.items.push(item);
            }
        }
        self.next_offset = page.next_offset;
        self.has_more = page.has_more;
    }

    fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            order: self.order,
            items: self.items.clone(),
            next_offset: self.next_offset,
            has_more: self.has_more,
            loading: self.loading,
            refreshing: self.refreshing,
            last_error: self.last_error.clone(),
        }
    }
}

struct Ticket {
    generation: u64,
    offset: usize,
    paginator: Paginator,
}

/// Paginated list of catalog entries under one sort order at a time.
pub struct CatalogList {
    gateway: Arc<CatalogGateway>,
    index: Arc<IndexCache>,
    page_size: usize,
    state: Mutex<ListState>,
}

impl CatalogList {
    pub fn new(
        gateway: Arc<CatalogGateway>,
        index: Arc<IndexCache>,
        page_size: usize,
        order: SortOrder,
    ) -> Self {
        Self {
            gateway,
            index,
            page_size,
            state: Mutex::new(ListState::new(order)),
        }
    }

    pub async fn snapshot(&self) -> ListSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn order(&self) -> SortOrder {
        self.state.lock().await.order
    }

    /// Fetch and append the next page.
    ///
    /// Returns `Ok(false)` without fetching when a load is already running,
    /// the list is exhausted, or name order is still waiting for the index.
    pub async fn load_more(&self, language: Language) -> Result<bool, CatalogError> {
        let ticket = {
            let mut state = self.state.lock().await;
            if state.loading || !state.has_more {
                return Ok(false);
            }
            let paginator = self.paginator(state.order, language);
            if !paginator.is_ready() {
                debug!("Index not ready, deferring {} page", state.order);
                return Ok(false);
            }
            state.loading = true;
            Ticket {
                generation: state.generation,
                offset: state.next_offset,
                paginator,
            }
        };

        let result = ticket.paginator.fetch_page(ticket.offset).await;

        let mut state = self.state.lock().await;
        if state.generation != ticket.generation {
            debug!("Discarding stale page at offset {}", ticket.offset);
            return Ok(false);
        }
        state.loading = false;

        match result {
            Ok(page) => {
                state.last_error = None;
                state.append(page);
                Ok(true)
            }
            Err(e) => {
                warn!("Failed to load page at offset {}: {}", ticket.offset, e);
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Re-run the first page and replace the accumulated sequence with it.
    ///
    /// The current entries stay visible until the fresh page arrives.
    pub async fn refresh(&self, language: Language) -> Result<bool, CatalogError> {
        let ticket = {
            let mut state = self.state.lock().await;
            if state.refreshing {
                return Ok(false);
            }
            let paginator = self.paginator(state.order, language);
            if !paginator.is_ready() {
                return Ok(false);
            }
            state.generation += 1;
            state.refreshing = true;
            state.loading = true;
            Ticket {
                generation: state.generation,
                offset: 0,
                paginator,
            }
        };

        let result = ticket.paginator.fetch_page(0).await;

        let mut state = self.state.lock().await;
        if state.generation != ticket.generation {
            debug!("Discarding stale refresh");
            return Ok(false);
        }
        state.refreshing = false;
        state.loading = false;

        match result {
            Ok(page) => {
                state.items.clear();
                state.seen.clear();
                state.last_error = None;
                state.append(page);
                Ok(true)
            }
            Err(e) => {
                warn!("Refresh failed: {}", e);
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Switch ordering. Pagination restarts from offset 0 with nothing
    /// accumulated. Returns `false` when the order did not change.
    pub async fn set_sort_order(&self, order: SortOrder) -> bool {
        let mut state = self.state.lock().await;
        if state.order == order {
            return false;
        }
        state.order = order;
        state.reset();
        true
    }

    /// Restart pagination under the current ordering.
    pub async fn reset(&self) {
        self.state.lock().await.reset();
    }

    fn paginator(&self, order: SortOrder, language: Language) -> Paginator {
        Paginator::new(
            order,
            Arc::clone(&self.gateway),
            Arc::clone(&self.index),
            self.page_size,
            language,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AssetUrls, CatalogApi};
    use crate::testing::{fixtures, MockCatalogApi};

    async fn seeded_api(count: u32) -> Arc<MockCatalogApi> {
        let api = Arc::new(MockCatalogApi::new());
        for id in 1..=count {
            api.add_pokemon(fixtures::pokemon(id, &format!("mon{:02}", id), &["water"]))
                .await;
        }
        api
    }

    fn list(api: &Arc<MockCatalogApi>, index: Arc<IndexCache>, page_size: usize) -> CatalogList {
        let gateway = Arc::new(CatalogGateway::new(
            Arc::clone(api) as Arc<dyn CatalogApi>,
            AssetUrls::default(),
            20_000,
        ));
        CatalogList::new(gateway, index, page_size, SortOrder::ById)
    }

    #[tokio::test]
    async fn test_load_more_accumulates_until_exhausted() {
        let api = seeded_api(5).await;
        let list = list(&api, Arc::new(IndexCache::new()), 2);

        assert!(list.load_more(Language::En).await.unwrap());
        assert!(list.load_more(Language::En).await.unwrap());
        assert!(list.load_more(Language::En).await.unwrap());
        assert!(!list.load_more(Language::En).await.unwrap());

        let snapshot = list.snapshot().await;
        assert_eq!(snapshot.items.len(), 5);
        assert!(!snapshot.has_more);
        assert_eq!(snapshot.items[4].id, "5");
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_dropped() {
        let mut state = ListState::new(SortOrder::ById);
        let entry = |id: &str| CatalogEntry {
            id: id.to_string(),
            name: id.to_string(),
            image_url: String::new(),
            types: vec![],
            source_url: String::new(),
        };
        state.append(Page {
            items: vec![entry("1"), entry("2")],
            next_offset: 2,
            has_more: true,
        });
        state.append(Page {
            items: vec![entry("2"), entry("3")],
            next_offset: 4,
            has_more: false,
        });

        let ids: Vec<&str> = state.items.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_switching_sort_order_resets_for_all_page_sizes() {
        let api = seeded_api(6).await;
        let index = Arc::new(IndexCache::with_entries(fixtures::index_entries(&[
            "mon01", "mon02", "mon03", "mon04", "mon05", "mon06",
        ])));

        for page_size in 1..=7 {
            let list = list(&api, Arc::clone(&index), page_size);
            list.load_more(Language::En).await.unwrap();
            assert!(!list.snapshot().await.items.is_empty());

            assert!(list.set_sort_order(SortOrder::ByName).await);
            let snapshot = list.snapshot().await;
            assert_eq!(snapshot.order, SortOrder::ByName);
            assert!(snapshot.items.is_empty());
            assert_eq!(snapshot.next_offset, 0);

            list.load_more(Language::En).await.unwrap();
            assert!(list.set_sort_order(SortOrder::ById).await);
            let snapshot = list.snapshot().await;
            assert!(snapshot.items.is_empty());
            assert_eq!(snapshot.next_offset, 0);
            assert!(snapshot.has_more);
        }
    }

    #[tokio::test]
    async fn test_same_sort_order_is_a_no_op() {
        let api = seeded_api(3).await;
        let list = list(&api, Arc::new(IndexCache::new()), 2);
        list.load_more(Language::En).await.unwrap();

        assert!(!list.set_sort_order(SortOrder::ById).await);
        assert_eq!(list.snapshot().await.items.len(), 2);
    }

    #[tokio::test]
    async fn test_name_order_waits_for_index() {
        let api = seeded_api(3).await;
        let list = list(&api, Arc::new(IndexCache::new()), 2);
        list.set_sort_order(SortOrder::ByName).await;

        assert!(!list.load_more(Language::En).await.unwrap());
        assert_eq!(api.query_count().await, 0);
        assert!(!list.snapshot().await.loading);
    }

    #[tokio::test]
    async fn test_stale_page_is_discarded_after_reset() {
        let api = seeded_api(4).await;
        let list = Arc::new(list(&api, Arc::new(IndexCache::new()), 2));
        api.set_latency(std::time::Duration::from_millis(50)).await;

        let pending = {
            let list = Arc::clone(&list);
            tokio::spawn(async move { list.load_more(Language::En).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        list.set_sort_order(SortOrder::ByName).await;

        assert!(!pending.await.unwrap().unwrap());
        let snapshot = list.snapshot().await;
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.order, SortOrder::ByName);
    }

    #[tokio::test]
    async fn test_refresh_replaces_items() {
        let api = seeded_api(4).await;
        let list = list(&api, Arc::new(IndexCache::new()), 2);
        list.load_more(Language::En).await.unwrap();
        list.load_more(Language::En).await.unwrap();
        assert_eq!(list.snapshot().await.items.len(), 4);

        assert!(list.refresh(Language::En).await.unwrap());
        let snapshot = list.snapshot().await;
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.next_offset, 2);
        assert!(!snapshot.refreshing);
    }

    #[tokio::test]
    async fn test_failed_page_keeps_offset_and_records_error() {
        let api = seeded_api(4).await;
        let list = list(&api, Arc::new(IndexCache::new()), 2);
        api.set_next_error(CatalogError::Network("offline".to_string()))
            .await;

        assert!(list.load_more(Language::En).await.is_err());
        let snapshot = list.snapshot().await;
        assert_eq!(snapshot.next_offset, 0);
        assert!(snapshot.last_error.is_some());
        assert!(!snapshot.loading);

        assert!(list.load_more(Language::En).await.unwrap());
        assert!(list.snapshot().await.last_error.is_none());
    }
}
