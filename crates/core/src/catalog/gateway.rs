//! Domain-level catalog operations built on a `CatalogApi` transport.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::assets::AssetUrls;
use super::description::{select_description, translated_name};
use super::types::{
    Ability, CatalogDetail, CatalogEntry, IndexEntry, Language, Page, PokemonRecord, Sprites,
    Stat, DEFAULT_TYPE,
};
use super::{CatalogApi, CatalogError};
use crate::metrics::ENRICHMENT_FAILURES;

/// Extract the identifier from an upstream resource URL (its last non-empty
/// path segment).
pub fn id_from_url(url: &str) -> Option<&str> {
    url.split('/').filter(|s| !s.is_empty()).last()
}

/// Typed gateway over the upstream catalog.
pub struct CatalogGateway {
    api: Arc<dyn CatalogApi>,
    assets: AssetUrls,
    index_limit: usize,
}

impl CatalogGateway {
    /// Create a gateway. `index_limit` must cover the whole upstream dataset.
    pub fn new(api: Arc<dyn CatalogApi>, assets: AssetUrls, index_limit: usize) -> Self {
        Self {
            api,
            assets,
            index_limit,
        }
    }

    pub fn assets(&self) -> &AssetUrls {
        &self.assets
    }

    pub fn artwork_url(&self, id: &str) -> String {
        self.assets.artwork_url(id)
    }

    pub fn cry_url(&self, id: &str) -> String {
        self.assets.cry_url(id)
    }

    /// Fetch the complete `{id, name, url}` list in a single request.
    pub async fn fetch_index(&self) -> Result<Vec<IndexEntry>, CatalogError> {
        let list = self.api.list_pokemon(self.index_limit, 0).await?;

        let entries: Vec<IndexEntry> = list
            .results
            .into_iter()
            .filter_map(|r| match id_from_url(&r.url) {
                Some(id) => Some(IndexEntry {
                    id: id.to_string(),
                    name: r.name,
                    source_url: r.url,
                }),
                None => {
                    warn!("Skipping index entry '{}' with unusable url '{}'", r.name, r.url);
                    None
                }
            })
            .collect();

        info!("Fetched catalog index: {} entries", entries.len());
        Ok(entries)
    }

    /// Fetch one identifier-ordered page and enrich every entry with its
    /// types.
    ///
    /// Enrichment lookups run concurrently. A failed lookup only degrades its
    /// own entry to `["normal"]` with the raw upstream name.
    pub async fn fetch_page(
        &self,
        page_size: usize,
        offset: usize,
        language: Language,
    ) -> Result<Page, CatalogError> {
        let list = self.api.list_pokemon(page_size, offset).await?;
        let has_more = list.next.is_some();

        let rows: Vec<(String, String, String)> = list
            .results
            .into_iter()
            .filter_map(|r| {
                let id = id_from_url(&r.url)?.to_string();
                Some((id, r.name, r.url))
            })
            .collect();

        let details = join_all(
            rows.iter()
                .map(|(id, _, _)| self.fetch_detail(id, language)),
        )
        .await;

        let items = rows
            .into_iter()
            .zip(details)
            .map(|((id, raw_name, url), detail)| {
                let (name, types) = match detail {
                    Ok(Some(d)) => (d.name, d.types),
                    Ok(None) => {
                        warn!("No detail record for list entry {}, using defaults", id);
                        ENRICHMENT_FAILURES.with_label_values(&["list_types"]).inc();
                        (raw_name, vec![DEFAULT_TYPE.to_string()])
                    }
                    Err(e) => {
                        warn!("Failed to enrich list entry {}: {}", id, e);
                        ENRICHMENT_FAILURES.with_label_values(&["list_types"]).inc();
                        (raw_name, vec![DEFAULT_TYPE.to_string()])
                    }
                };

                CatalogEntry {
                    image_url: self.assets.artwork_url(&id),
                    id,
                    name,
                    types,
                    source_url: url,
                }
            })
            .collect();

        Ok(Page {
            items,
            next_offset: offset + page_size,
            has_more,
        })
    }

    /// Fetch the full detail record for an identifier or exact name.
    ///
    /// Returns `Ok(None)` when the upstream reports the entry absent. The
    /// species lookup (description and translated name) is best-effort.
    pub async fn fetch_detail(
        &self,
        id_or_name: &str,
        language: Language,
    ) -> Result<Option<CatalogDetail>, CatalogError> {
        let record = match self.api.get_pokemon(id_or_name).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("Catalog entry '{}' not found", id_or_name);
                return Ok(None);
            }
            Err(e) => {
                warn!("Failed to fetch catalog entry '{}': {}", id_or_name, e);
                return Err(e);
            }
        };

        let species_id = record.id;
        let mut detail = self.normalize(record);

        match self.api.get_species(species_id).await {
            Ok(Some(species)) => {
                detail.description =
                    Some(select_description(&species.flavor_text_entries, language));
                if let Some(name) = translated_name(&species, language) {
                    detail.name = name;
                }
            }
            Ok(None) => {
                debug!("No species record for {}", detail.id);
                ENRICHMENT_FAILURES.with_label_values(&["species"]).inc();
            }
            Err(e) => {
                warn!("Species lookup failed for {}: {}", detail.id, e);
                ENRICHMENT_FAILURES.with_label_values(&["species"]).inc();
            }
        }

        Ok(Some(detail))
    }

    /// Localized description only. Any failure yields `None`.
    pub async fn fetch_description(&self, id: u32, language: Language) -> Option<String> {
        match self.api.get_species(id).await {
            Ok(Some(species)) => Some(select_description(&species.flavor_text_entries, language)),
            Ok(None) => None,
            Err(e) => {
                warn!("Description lookup failed for {}: {}", id, e);
                None
            }
        }
    }

    fn normalize(&self, record: PokemonRecord) -> CatalogDetail {
        let id = record.id.to_string();
        CatalogDetail {
            name: record.name,
            height: record.height,
            weight: record.weight,
            types: record.types.into_iter().map(|t| t.kind.name).collect(),
            stats: record
                .stats
                .into_iter()
                .map(|s| Stat {
                    name: s.stat.name,
                    base: s.base_stat,
                })
                .collect(),
            abilities: record
                .abilities
                .into_iter()
                .map(|a| Ability {
                    name: a.ability.name,
                    is_hidden: a.is_hidden,
                })
                .collect(),
            description: None,
            sprites: Sprites {
                front_default: record.sprites.front_default,
                artwork: self.assets.artwork_url(&id),
            },
            id,
        }
    }
}
