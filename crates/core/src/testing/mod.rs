//! Testing utilities and mock implementations.
//!
//! `MockCatalogApi` stands in for the upstream HTTP API so the gateway,
//! list, search and session layers can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use pokedex_core::testing::{MockCatalogApi, fixtures};
//!
//! let api = MockCatalogApi::new();
//! api.add_pokemon(fixtures::pokemon(1, "bulbasaur", &["grass", "poison"])).await;
//! api.fail_species(1).await;
//!
//! // Use in a CatalogGateway...
//! ```

mod mock_catalog_api;

pub use mock_catalog_api::{MockCatalogApi, RecordedApiCall, MOCK_BASE_URL};

/// Test fixtures and helper functions.
pub mod fixtures {
    use super::MOCK_BASE_URL;
    use crate::catalog::{
        AbilitySlot, FlavorTextEntry, IndexEntry, LocalizedName, NamedResource, PokemonRecord,
        SpeciesRecord, SpriteSet, StatSlot, TypeSlot,
    };

    /// The six base stats, in upstream order.
    pub const STAT_NAMES: [&str; 6] = [
        "hp",
        "attack",
        "defense",
        "special-attack",
        "special-defense",
        "speed",
    ];

    fn resource(name: &str) -> NamedResource {
        NamedResource {
            name: name.to_string(),
            url: String::new(),
        }
    }

    /// Create a pokemon record with six stats and two abilities (the second
    /// hidden).
    pub fn pokemon(id: u32, name: &str, types: &[&str]) -> PokemonRecord {
        PokemonRecord {
            id,
            name: name.to_string(),
            height: 7,
            weight: 69,
            types: types
                .iter()
                .enumerate()
                .map(|(i, t)| TypeSlot {
                    slot: i as u32 + 1,
                    kind: resource(t),
                })
                .collect(),
            stats: STAT_NAMES
                .iter()
                .enumerate()
                .map(|(i, s)| StatSlot {
                    base_stat: 40 + 5 * i as u32,
                    stat: resource(s),
                })
                .collect(),
            abilities: vec![
                AbilitySlot {
                    ability: resource("overgrow"),
                    is_hidden: false,
                },
                AbilitySlot {
                    ability: resource("chlorophyll"),
                    is_hidden: true,
                },
            ],
            sprites: SpriteSet {
                front_default: Some(format!(
                    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/{}.png",
                    id
                )),
            },
        }
    }

    /// Create a species record from `(text, language, version)` flavor
    /// entries and `(language, name)` localized names.
    pub fn species(
        id: u32,
        flavor: &[(&str, &str, &str)],
        names: &[(&str, &str)],
    ) -> SpeciesRecord {
        SpeciesRecord {
            id,
            flavor_text_entries: flavor
                .iter()
                .map(|(text, language, version)| FlavorTextEntry {
                    flavor_text: text.to_string(),
                    language: resource(language),
                    version: resource(version),
                })
                .collect(),
            names: names
                .iter()
                .map(|(language, name)| LocalizedName {
                    name: name.to_string(),
                    language: resource(language),
                })
                .collect(),
        }
    }

    /// Index entries with ids `1..=n` in the given order.
    pub fn index_entries(names: &[&str]) -> Vec<IndexEntry> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| IndexEntry {
                id: (i + 1).to_string(),
                name: name.to_string(),
                source_url: format!("{}/pokemon/{}/", MOCK_BASE_URL, i + 1),
            })
            .collect()
    }
}
