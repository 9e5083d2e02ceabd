use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::catalog::{DEFAULT_ARTWORK_BASE_URL, DEFAULT_CRY_BASE_URL};
use crate::paginator::SortOrder;

/// Root configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Upstream catalog configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// PokeAPI base URL (e.g., "https://pokeapi.co/api/v2")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Prefix of the official artwork images
    #[serde(default = "default_artwork_base_url")]
    pub artwork_base_url: String,
    /// Prefix of the cry audio clips
    #[serde(default = "default_cry_base_url")]
    pub cry_base_url: String,
    /// `limit` used for the one-shot index request; must exceed the dataset
    #[serde(default = "default_index_limit")]
    pub index_limit: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout. Unset means the transport's own behavior.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            artwork_base_url: default_artwork_base_url(),
            cry_base_url: default_cry_base_url(),
            index_limit: default_index_limit(),
            user_agent: default_user_agent(),
            request_timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "https://pokeapi.co/api/v2".to_string()
}

fn default_artwork_base_url() -> String {
    DEFAULT_ARTWORK_BASE_URL.to_string()
}

fn default_cry_base_url() -> String {
    DEFAULT_CRY_BASE_URL.to_string()
}

fn default_index_limit() -> usize {
    20_000
}

fn default_user_agent() -> String {
    format!("pokedex/{}", env!("CARGO_PKG_VERSION"))
}

/// List screen configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ListConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Quiet period before a query is resolved
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default)]
    pub default_sort: SortOrder,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            default_sort: SortOrder::default(),
        }
    }
}

fn default_page_size() -> usize {
    24
}

fn default_search_debounce_ms() -> u64 {
    250
}

/// Preference storage configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PreferencesConfig {
    #[serde(default = "default_preferences_path")]
    pub path: PathBuf,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: default_preferences_path(),
        }
    }
}

fn default_preferences_path() -> PathBuf {
    PathBuf::from("pokedex-preferences.json")
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    8080
}
