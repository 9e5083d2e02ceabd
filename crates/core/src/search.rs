//! Search resolver.
//!
//! A query resolves to at most one detail record through three tiers tried
//! in order: numeric identifier, exact name, then the first index entry whose
//! name contains the query. `SearchResolver` debounces keystrokes and guards
//! every state write with a generation number so a superseded resolution can
//! never overwrite a newer one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::catalog::{CatalogDetail, CatalogError, CatalogGateway, Language};
use crate::index::IndexCache;
use crate::metrics::SEARCH_RESOLUTIONS;

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Identifier,
    ExactName,
    Substring,
}

impl MatchTier {
    fn label(&self) -> &'static str {
        match self {
            MatchTier::Identifier => "identifier",
            MatchTier::ExactName => "exact_name",
            MatchTier::Substring => "substring",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub detail: CatalogDetail,
    pub tier: MatchTier,
}

/// Trimmed, lower-cased form of a query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

fn is_identifier(query: &str) -> bool {
    !query.is_empty() && query.bytes().all(|b| b.is_ascii_digit())
}

/// Resolve a query to its best match.
///
/// `Ok(None)` means no tier matched. Transport and upstream failures
/// propagate instead of collapsing into not-found. An all-digit query is
/// only tried as an identifier, since the exact-name lookup would issue the
/// same request again.
pub async fn resolve(
    gateway: &CatalogGateway,
    index: &IndexCache,
    query: &str,
    language: Language,
) -> Result<Option<SearchMatch>, CatalogError> {
    let query = normalize_query(query);
    if query.is_empty() {
        return Ok(None);
    }

    if is_identifier(&query) {
        if let Some(detail) = gateway.fetch_detail(&query, language).await? {
            return Ok(Some(SearchMatch {
                detail,
                tier: MatchTier::Identifier,
            }));
        }
    } else if let Some(detail) = gateway.fetch_detail(&query, language).await? {
        return Ok(Some(SearchMatch {
            detail,
            tier: MatchTier::ExactName,
        }));
    }

    let snapshot = match index.snapshot() {
        Some(snapshot) => snapshot,
        None => index.populate(gateway).await?,
    };
    let Some(entry) = snapshot.find_containing(&query) else {
        return Ok(None);
    };

    debug!("Query '{}' matched index entry '{}'", query, entry.name);
    Ok(gateway
        .fetch_detail(&entry.id, language)
        .await?
        .map(|detail| SearchMatch {
            detail,
            tier: MatchTier::Substring,
        }))
}

/// Where the resolver stands for the current query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchStatus {
    /// Empty query; the paginated list is shown.
    #[default]
    Idle,
    /// Waiting for the quiet period or for the resolution to return.
    Searching,
    Found,
    NotFound,
    Failed { message: String },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchState {
    /// Raw query as typed.
    pub query: String,
    pub status: SearchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SearchMatch>,
    #[serde(skip)]
    pub(crate) generation: u64,
}

impl SearchState {
    /// True while a non-empty query is active, whatever its outcome.
    pub fn is_active(&self) -> bool {
        self.status != SearchStatus::Idle
    }

    pub fn is_searching(&self) -> bool {
        self.status == SearchStatus::Searching
    }

    pub fn is_not_found(&self) -> bool {
        self.status == SearchStatus::NotFound
    }
}

/// Debounced resolver holding the state of the search box.
pub struct SearchResolver {
    gateway: Arc<CatalogGateway>,
    index: Arc<IndexCache>,
    debounce: Duration,
    state: Arc<watch::Sender<SearchState>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl SearchResolver {
    pub fn new(gateway: Arc<CatalogGateway>, index: Arc<IndexCache>, debounce: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            gateway,
            index,
            debounce,
            state: Arc::new(state),
            timer: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Replace the query and schedule its resolution after the quiet period.
    ///
    /// Any pending or in-flight resolution for an earlier query is abandoned.
    /// An empty query returns the resolver to idle immediately.
    pub fn set_query(&self, query: &str, language: Language) {
        let mut generation = 0;
        let active = !normalize_query(query).is_empty();
        self.state.send_modify(|s| {
            s.generation += 1;
            generation = s.generation;
            s.query = query.to_string();
            s.result = None;
            s.status = if active {
                SearchStatus::Searching
            } else {
                SearchStatus::Idle
            };
        });

        let handle = active.then(|| self.spawn_resolution(query.to_string(), language, generation));
        self.replace_timer(handle);
    }

    /// Clear the query.
    pub fn clear(&self) {
        self.set_query("", Language::default());
    }

    /// Re-run the current query, e.g. after a language change.
    pub fn rerun(&self, language: Language) {
        let query = self.state.borrow().query.clone();
        if !normalize_query(&query).is_empty() {
            self.set_query(&query, language);
        }
    }

    /// Wait until the scheduled resolution, if any, has finished.
    pub async fn settled(&self) {
        let handle = self.timer_slot().take();
        if let Some(handle) = handle {
            // A cancelled task means a newer query took over.
            let _ = handle.await;
        }
    }

    fn replace_timer(&self, handle: Option<JoinHandle<()>>) {
        let previous = std::mem::replace(&mut *self.timer_slot(), handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Only a handle is stored, so a poisoned slot is still consistent.
    fn timer_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn_resolution(
        &self,
        query: String,
        language: Language,
        generation: u64,
    ) -> JoinHandle<()> {
        let gateway = Arc::clone(&self.gateway);
        let index = Arc::clone(&self.index);
        let state = Arc::clone(&self.state);
        let debounce = self.debounce;

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if state.borrow().generation != generation {
                return;
            }

            debug!("Resolving query '{}'", query);
            let outcome = resolve(&gateway, &index, &query, language).await;

            let applied = state.send_if_modified(|s| {
                if s.generation != generation {
                    return false;
                }
                match &outcome {
                    Ok(Some(found)) => {
                        s.status = SearchStatus::Found;
                        s.result = Some(found.clone());
                    }
                    Ok(None) => {
                        s.status = SearchStatus::NotFound;
                        s.result = None;
                    }
                    Err(e) => {
                        s.status = SearchStatus::Failed {
                            message: e.to_string(),
                        };
                        s.result = None;
                    }
                }
                true
            });

            if !applied {
                debug!("Dropping stale resolution for '{}'", query);
                return;
            }

            let label = match &outcome {
                Ok(Some(found)) => found.tier.label(),
                Ok(None) => "not_found",
                Err(e) => {
                    warn!("Search for '{}' failed: {}", query, e);
                    "error"
                }
            };
            SEARCH_RESOLUTIONS.with_label_values(&[label]).inc();
        })
    }
}

impl Drop for SearchResolver {
    fn drop(&mut self) {
        self.replace_timer(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AssetUrls, CatalogApi};
    use crate::testing::{fixtures, MockCatalogApi, RecordedApiCall};

    fn gateway(api: &Arc<MockCatalogApi>) -> Arc<CatalogGateway> {
        Arc::new(CatalogGateway::new(
            Arc::clone(api) as Arc<dyn CatalogApi>,
            AssetUrls::default(),
            20_000,
        ))
    }

    async fn seeded_api() -> Arc<MockCatalogApi> {
        let api = Arc::new(MockCatalogApi::new());
        for (id, name, kind) in [
            (1, "bulbasaur", "grass"),
            (4, "charmander", "fire"),
            (5, "charmeleon", "fire"),
            (25, "pikachu", "electric"),
        ] {
            api.add_pokemon(fixtures::pokemon(id, name, &[kind])).await;
        }
        api
    }

    fn index() -> Arc<IndexCache> {
        let mut entries =
            fixtures::index_entries(&["bulbasaur", "charmander", "charmeleon", "pikachu"]);
        for (entry, id) in entries.iter_mut().zip(["1", "4", "5", "25"]) {
            entry.id = id.to_string();
        }
        Arc::new(IndexCache::with_entries(entries))
    }

    fn resolver(api: &Arc<MockCatalogApi>) -> SearchResolver {
        SearchResolver::new(gateway(api), index(), Duration::from_millis(250))
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  PikaChu "), "pikachu");
        assert!(is_identifier("025"));
        assert!(!is_identifier("25a"));
        assert!(!is_identifier(""));
    }

    #[tokio::test]
    async fn test_identifier_tier_short_circuits() {
        let api = seeded_api().await;
        let gw = gateway(&api);

        let found = resolve(&gw, &IndexCache::new(), " 5 ", Language::En)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.tier, MatchTier::Identifier);
        assert_eq!(found.detail.id, "5");

        let calls = api.recorded_calls().await;
        assert!(!calls
            .iter()
            .any(|c| matches!(c, RecordedApiCall::ListPokemon { .. })));
        assert_eq!(
            calls
                .iter()
                .filter(|c| matches!(c, RecordedApiCall::GetPokemon { .. }))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_exact_name_tier() {
        let api = seeded_api().await;
        let found = resolve(&gateway(&api), &index(), "Pikachu", Language::En)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.tier, MatchTier::ExactName);
        assert_eq!(found.detail.id, "25");
    }

    #[tokio::test]
    async fn test_substring_tier_takes_first_in_index_order() {
        let api = seeded_api().await;
        let found = resolve(&gateway(&api), &index(), "charm", Language::En)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.tier, MatchTier::Substring);
        assert_eq!(found.detail.name, "charmander");
    }

    #[tokio::test]
    async fn test_substring_tier_populates_missing_index() {
        let api = seeded_api().await;
        let cache = IndexCache::new();
        let found = resolve(&gateway(&api), &cache, "meleon", Language::En)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.detail.id, "5");
        assert!(cache.is_ready());
    }

    #[tokio::test]
    async fn test_unknown_query_is_not_found() {
        let api = seeded_api().await;
        let gw = gateway(&api);
        assert!(resolve(&gw, &index(), "zubat", Language::En)
            .await
            .unwrap()
            .is_none());
        assert!(resolve(&gw, &index(), "999", Language::En)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let api = seeded_api().await;
        api.fail_pokemon("pikachu").await;

        let result = resolve(&gateway(&api), &index(), "pikachu", Language::En).await;
        assert!(result.unwrap_err().is_transport());
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_waits_after_timer_lock_poisoned() {
        let api = seeded_api().await;
        let resolver = resolver(&api);

        std::thread::scope(|scope| {
            let poisoner = scope.spawn(|| {
                let _slot = resolver.timer.lock();
                panic!("panicked while holding the timer slot");
            });
            assert!(poisoner.join().is_err());
        });
        assert!(resolver.timer.is_poisoned());

        resolver.set_query("pikachu", Language::En);
        resolver.settled().await;

        let state = resolver.state();
        assert_eq!(state.status, SearchStatus::Found);
        assert_eq!(state.result.unwrap().detail.id, "25");
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_only_resolves_latest_query() {
        let api = seeded_api().await;
        let resolver = resolver(&api);

        resolver.set_query("p", Language::En);
        tokio::time::sleep(Duration::from_millis(100)).await;
        resolver.set_query("pi", Language::En);
        tokio::time::sleep(Duration::from_millis(100)).await;
        resolver.set_query("pikachu", Language::En);
        assert!(resolver.state().is_searching());

        resolver.settled().await;

        let state = resolver.state();
        assert_eq!(state.status, SearchStatus::Found);
        assert_eq!(state.result.unwrap().detail.id, "25");

        let looked_up: Vec<RecordedApiCall> = api.recorded_calls().await;
        assert!(looked_up.iter().all(|c| match c {
            RecordedApiCall::GetPokemon { id_or_name } => id_or_name == "pikachu",
            _ => true,
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_fetched_before_quiet_period() {
        let api = seeded_api().await;
        let resolver = resolver(&api);

        resolver.set_query("pikachu", Language::En);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(api.query_count().await, 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        resolver.settled().await;
        assert!(api.query_count().await > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_settles_once() {
        let api = seeded_api().await;
        let resolver = resolver(&api);
        let mut rx = resolver.subscribe();

        resolver.set_query("zubat", Language::En);
        rx.borrow_and_update();
        resolver.settled().await;

        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_not_found());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!rx.has_changed().unwrap());
        assert!(resolver.state().result.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_in_flight_result_is_ignored() {
        let api = seeded_api().await;
        api.set_latency(Duration::from_millis(500)).await;
        let resolver = resolver(&api);

        resolver.set_query("bulbasaur", Language::En);
        tokio::time::sleep(Duration::from_millis(400)).await;
        resolver.set_query("charmander", Language::En);
        resolver.settled().await;

        let state = resolver.state();
        assert_eq!(state.query, "charmander");
        assert_eq!(state.result.unwrap().detail.name, "charmander");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_query_returns_to_idle() {
        let api = seeded_api().await;
        let resolver = resolver(&api);

        resolver.set_query("pikachu", Language::En);
        resolver.clear();
        resolver.settled().await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(resolver.state().status, SearchStatus::Idle);
        assert_eq!(api.query_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_distinct_from_not_found() {
        let api = seeded_api().await;
        api.fail_pokemon("25").await;
        let resolver = resolver(&api);

        resolver.set_query("25", Language::En);
        resolver.settled().await;

        assert!(matches!(
            resolver.state().status,
            SearchStatus::Failed { .. }
        ));
    }
}
