//! Remote catalog gateway for PokeAPI.
//!
//! `CatalogApi` is the raw transport seam (one method per upstream endpoint),
//! implemented over HTTP by `PokeApiClient` and in memory by
//! `testing::MockCatalogApi`. `CatalogGateway` builds the domain view models
//! on top of it.

mod assets;
mod description;
mod gateway;
mod pokeapi;
mod types;

pub use assets::{AssetUrls, DEFAULT_ARTWORK_BASE_URL, DEFAULT_CRY_BASE_URL};
pub use description::{clean_flavor_text, select_description, translated_name, MODERN_VERSIONS};
pub use gateway::{id_from_url, CatalogGateway};
pub use pokeapi::PokeApiClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the upstream catalog.
///
/// A missing resource is not an error: lookups return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Network failure reported without an underlying HTTP error.
    #[error("Network error: {0}")]
    Network(String),

    /// API returned a non-success status other than 404.
    #[error("Upstream error: {status} - {message}")]
    Upstream { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The full index has not been populated yet.
    #[error("Catalog index is not loaded yet")]
    IndexNotReady,
}

impl CatalogError {
    /// True for failures where no response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, CatalogError::Http(_) | CatalogError::Network(_))
    }
}

/// Raw access to the upstream catalog endpoints.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /pokemon?limit=&offset=`.
    async fn list_pokemon(&self, limit: usize, offset: usize)
        -> Result<ResourceList, CatalogError>;

    /// `GET /pokemon/{idOrName}`. `Ok(None)` on 404.
    async fn get_pokemon(&self, id_or_name: &str) -> Result<Option<PokemonRecord>, CatalogError>;

    /// `GET /pokemon-species/{id}`. `Ok(None)` on 404.
    async fn get_species(&self, id: u32) -> Result<Option<SpeciesRecord>, CatalogError>;
}
