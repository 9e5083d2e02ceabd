pub mod catalog;
pub mod collation;
pub mod config;
pub mod detail;
pub mod index;
pub mod list;
pub mod messages;
pub mod metrics;
pub mod paginator;
pub mod projector;
pub mod search;
pub mod session;
pub mod settings;
pub mod testing;

pub use catalog::{
    AssetUrls, CatalogApi, CatalogDetail, CatalogEntry, CatalogError, CatalogGateway, IndexEntry,
    Language, Page, PokeApiClient,
};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, CatalogConfig,
    Config, ConfigError, ListConfig, PreferencesConfig, ServerConfig,
};
pub use detail::{DetailSummary, DetailView, StatRow};
pub use index::{IndexCache, IndexSnapshot};
pub use list::{CatalogList, ListSnapshot};
pub use paginator::{Paginator, SortOrder};
pub use projector::{project, ListRow, ViewFlags, ViewModel};
pub use search::{MatchTier, SearchMatch, SearchResolver, SearchState, SearchStatus};
pub use session::CatalogSession;
pub use settings::{
    DisplaySettings, FilePreferenceStore, MemoryPreferenceStore, PreferenceError,
    PreferenceStore, Settings,
};
