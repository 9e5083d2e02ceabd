//! One browsing session: the list screen, its search box and detail lookups.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::catalog::{
    AssetUrls, CatalogApi, CatalogError, CatalogGateway, Language, PokeApiClient,
};
use crate::config::Config;
use crate::detail::DetailView;
use crate::index::IndexCache;
use crate::list::CatalogList;
use crate::paginator::SortOrder;
use crate::projector::{project, ViewModel};
use crate::search::{SearchResolver, SearchStatus};
use crate::settings::{DisplaySettings, FilePreferenceStore, PreferenceStore, Settings};

/// Wires the gateway, index, list, search and settings together.
pub struct CatalogSession {
    gateway: Arc<CatalogGateway>,
    index: Arc<IndexCache>,
    list: CatalogList,
    search: SearchResolver,
    settings: Settings,
}

impl CatalogSession {
    /// Build a session over any transport and preference store.
    pub async fn build(
        api: Arc<dyn CatalogApi>,
        store: Arc<dyn PreferenceStore>,
        config: &Config,
    ) -> Self {
        let assets = AssetUrls::new(
            &config.catalog.artwork_base_url,
            &config.catalog.cry_base_url,
        );
        let gateway = Arc::new(CatalogGateway::new(
            api,
            assets,
            config.catalog.index_limit,
        ));
        let index = Arc::new(IndexCache::new());

        let list = CatalogList::new(
            Arc::clone(&gateway),
            Arc::clone(&index),
            config.list.page_size,
            config.list.default_sort,
        );
        let search = SearchResolver::new(
            Arc::clone(&gateway),
            Arc::clone(&index),
            Duration::from_millis(config.list.search_debounce_ms),
        );
        let settings = Settings::load(store).await;

        Self {
            gateway,
            index,
            list,
            search,
            settings,
        }
    }

    /// Session against PokeAPI with file-backed preferences.
    pub async fn from_config(config: &Config) -> Result<Self, CatalogError> {
        let api = Arc::new(PokeApiClient::new(&config.catalog)?);
        let store = Arc::new(FilePreferenceStore::new(&config.preferences.path));
        Ok(Self::build(api, store, config).await)
    }

    pub fn gateway(&self) -> &CatalogGateway {
        &self.gateway
    }

    pub fn index(&self) -> &IndexCache {
        &self.index
    }

    pub fn search(&self) -> &SearchResolver {
        &self.search
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Start the session: fetch the index and the first page concurrently.
    ///
    /// Name order needs the index before its first page, so that page is
    /// requested once population completes. An index failure only matters
    /// in name order.
    pub async fn mount(&self) -> Result<(), CatalogError> {
        let language = self.settings.language();
        let (index, page) = tokio::join!(
            self.index.populate(&self.gateway),
            self.list.load_more(language)
        );
        page?;

        match index {
            Ok(snapshot) => info!("Session mounted with {} indexed entries", snapshot.len()),
            Err(e) => {
                warn!("Index population failed: {}", e);
                if self.list.order().await == SortOrder::ByName {
                    return Err(e);
                }
            }
        }

        if self.list.snapshot().await.items.is_empty() {
            self.list.load_more(language).await?;
        }
        Ok(())
    }

    pub async fn view(&self) -> ViewModel {
        project(
            &self.list.snapshot().await,
            &self.search.state(),
            self.settings.language(),
        )
    }

    /// Request the next page. Ignored while a search match is displayed.
    pub async fn load_more(&self) -> Result<bool, CatalogError> {
        if self.search.state().status == SearchStatus::Found {
            return Ok(false);
        }
        self.list.load_more(self.settings.language()).await
    }

    pub async fn refresh(&self) -> Result<bool, CatalogError> {
        if self.list.order().await == SortOrder::ByName {
            self.index.populate(&self.gateway).await?;
        }
        self.list.refresh(self.settings.language()).await
    }

    pub fn set_query(&self, query: &str) {
        self.search.set_query(query, self.settings.language());
    }

    /// Switch ordering: clears the query, restarts pagination and loads the
    /// first page under the new order. Returns `false` if nothing changed.
    pub async fn set_sort_order(&self, order: SortOrder) -> Result<bool, CatalogError> {
        if !self.list.set_sort_order(order).await {
            return Ok(false);
        }
        info!("Sort order changed to {}", order);
        self.search.clear();

        if order == SortOrder::ByName {
            self.index.populate(&self.gateway).await?;
        }
        self.list.load_more(self.settings.language()).await?;
        Ok(true)
    }

    pub async fn detail(&self, id_or_name: &str) -> DetailView {
        let language = self.settings.language();
        let result = self.gateway.fetch_detail(id_or_name, language).await;
        DetailView::from_result(result, |id| self.gateway.cry_url(id), language)
    }

    /// Change the display language. Names are localized, so pagination
    /// restarts under the current order and the active query is resolved
    /// again.
    pub async fn set_language(&self, language: Language) -> Result<bool, CatalogError> {
        if !self.settings.set_language(language).await {
            return Ok(false);
        }
        info!("Language changed to {}", language);

        self.list.reset().await;
        self.search.rerun(language);
        self.list.load_more(language).await?;
        Ok(true)
    }

    pub fn toggle_mute(&self) -> bool {
        self.settings.toggle_mute()
    }

    pub fn display_settings(&self) -> DisplaySettings {
        self.settings.current()
    }
}
