//! Mock upstream catalog for testing.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::catalog::{
    CatalogApi, CatalogError, NamedResource, PokemonRecord, ResourceList, SpeciesRecord,
};

/// Base URL used for resource links in mock list responses.
pub const MOCK_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// A recorded upstream call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedApiCall {
    ListPokemon { limit: usize, offset: usize },
    GetPokemon { id_or_name: String },
    GetSpecies { id: u32 },
}

/// Mock implementation of the CatalogApi trait.
///
/// Provides controllable behavior for testing:
/// - Serve an in-memory set of pokemon and species records
/// - Track calls for assertions
/// - Simulate per-record failures, one-shot errors and latency
///
/// # Example
///
/// ```rust,ignore
/// use pokedex_core::testing::{MockCatalogApi, fixtures};
///
/// let api = MockCatalogApi::new();
/// api.add_pokemon(fixtures::pokemon(25, "pikachu", &["electric"])).await;
///
/// let record = api.get_pokemon("pikachu").await?;
/// assert!(record.is_some());
/// ```
#[derive(Debug)]
pub struct MockCatalogApi {
    /// Pokemon records by id.
    pokemon: Arc<RwLock<BTreeMap<u32, PokemonRecord>>>,
    /// Species records by id.
    species: Arc<RwLock<HashMap<u32, SpeciesRecord>>>,
    /// Ids or names whose detail lookup fails with a network error.
    failing_pokemon: Arc<RwLock<HashSet<String>>>,
    /// Species ids whose lookup fails with a network error.
    failing_species: Arc<RwLock<HashSet<u32>>>,
    /// Recorded calls.
    calls: Arc<RwLock<Vec<RecordedApiCall>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
    /// Delay applied before answering each call.
    latency: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockCatalogApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogApi {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self {
            pokemon: Arc::new(RwLock::new(BTreeMap::new())),
            species: Arc::new(RwLock::new(HashMap::new())),
            failing_pokemon: Arc::new(RwLock::new(HashSet::new())),
            failing_species: Arc::new(RwLock::new(HashSet::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            latency: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Record Configuration
    // =========================================================================

    /// Add a pokemon record. List responses follow id order.
    pub async fn add_pokemon(&self, record: PokemonRecord) {
        self.pokemon.write().await.insert(record.id, record);
    }

    /// Add a species record.
    pub async fn add_species(&self, record: SpeciesRecord) {
        self.species.write().await.insert(record.id, record);
    }

    /// Make detail lookups for this id or name fail with a network error.
    pub async fn fail_pokemon(&self, id_or_name: &str) {
        self.failing_pokemon
            .write()
            .await
            .insert(id_or_name.to_lowercase());
    }

    /// Make species lookups for this id fail with a network error.
    pub async fn fail_species(&self, id: u32) {
        self.failing_species.write().await.insert(id);
    }

    /// Delay every subsequent call by `latency`.
    pub async fn set_latency(&self, latency: Duration) {
        *self.latency.write().await = Some(latency);
    }

    // =========================================================================
    // Call Recording
    // =========================================================================

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedApiCall> {
        self.calls.read().await.clone()
    }

    /// Clear recorded calls.
    pub async fn clear_recorded(&self) {
        self.calls.write().await.clear();
    }

    /// Get the number of calls performed.
    pub async fn query_count(&self) -> usize {
        self.calls.read().await.len()
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take()
    }

    async fn record(&self, call: RecordedApiCall) {
        self.calls.write().await.push(call);
    }

    async fn delay(&self) {
        let latency = *self.latency.read().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    async fn find_pokemon(&self, id_or_name: &str) -> Option<PokemonRecord> {
        let pokemon = self.pokemon.read().await;
        match id_or_name.parse::<u32>() {
            Ok(id) => pokemon.get(&id).cloned(),
            Err(_) => pokemon.values().find(|p| p.name == id_or_name).cloned(),
        }
    }
}

#[async_trait]
impl CatalogApi for MockCatalogApi {
    async fn list_pokemon(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<ResourceList, CatalogError> {
        self.record(RecordedApiCall::ListPokemon { limit, offset })
            .await;
        self.delay().await;
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let pokemon = self.pokemon.read().await;
        let count = pokemon.len();
        let results = pokemon
            .values()
            .skip(offset)
            .take(limit)
            .map(|p| NamedResource {
                name: p.name.clone(),
                url: format!("{}/pokemon/{}/", MOCK_BASE_URL, p.id),
            })
            .collect();

        let next = if offset.saturating_add(limit) < count {
            Some(format!(
                "{}/pokemon?offset={}&limit={}",
                MOCK_BASE_URL,
                offset + limit,
                limit
            ))
        } else {
            None
        };

        Ok(ResourceList {
            count,
            next,
            results,
        })
    }

    async fn get_pokemon(&self, id_or_name: &str) -> Result<Option<PokemonRecord>, CatalogError> {
        self.record(RecordedApiCall::GetPokemon {
            id_or_name: id_or_name.to_string(),
        })
        .await;
        self.delay().await;
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let record = self.find_pokemon(id_or_name).await;

        let failing = self.failing_pokemon.read().await;
        let fails = failing.contains(&id_or_name.to_lowercase())
            || record.as_ref().is_some_and(|r| {
                failing.contains(&r.id.to_string()) || failing.contains(&r.name)
            });
        if fails {
            return Err(CatalogError::Network(format!(
                "simulated failure for {}",
                id_or_name
            )));
        }

        Ok(record)
    }

    async fn get_species(&self, id: u32) -> Result<Option<SpeciesRecord>, CatalogError> {
        self.record(RecordedApiCall::GetSpecies { id }).await;
        self.delay().await;
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        if self.failing_species.read().await.contains(&id) {
            return Err(CatalogError::Network(format!(
                "simulated species failure for {}",
                id
            )));
        }

        Ok(self.species.read().await.get(&id).cloned())
    }
}
