//! Domain and wire types for the Pokémon catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category substituted when an entry has no type data yet.
pub const DEFAULT_TYPE: &str = "normal";

// ============================================================================
// Display language
// ============================================================================

/// Display language for names and descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl Language {
    /// Language code as used by the upstream API.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }

    /// The other supported language, tried when this one has no data.
    pub fn fallback(&self) -> Language {
        match self {
            Language::Fr => Language::En,
            Language::En => Language::Fr,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fr" => Ok(Language::Fr),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

// ============================================================================
// Domain types
// ============================================================================

/// Identity-only projection of one catalog member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexEntry {
    /// Stable identifier (trailing path segment of the upstream URL).
    pub id: String,
    /// Upstream name slug.
    pub name: String,
    /// Upstream resource URL.
    pub source_url: String,
}

/// One row of the list screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    /// Display name, localized when the detail lookup provided one.
    pub name: String,
    /// Artwork URL derived from `id`.
    pub image_url: String,
    /// Ordered category tags. Empty until enriched.
    #[serde(default)]
    pub types: Vec<String>,
    /// Upstream resource URL. Empty for entries produced by search.
    #[serde(default)]
    pub source_url: String,
}

impl CatalogEntry {
    /// Primary type used for card coloring, `normal` when not yet known.
    pub fn primary_type(&self) -> &str {
        self.types.first().map(String::as_str).unwrap_or(DEFAULT_TYPE)
    }
}

/// A named base stat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stat {
    pub name: String,
    pub base: u32,
}

/// An ability slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ability {
    pub name: String,
    pub is_hidden: bool,
}

/// Image URLs for a detail record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sprites {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_default: Option<String>,
    /// Canonical large artwork.
    pub artwork: String,
}

/// Full attribute set for one catalog member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogDetail {
    pub id: String,
    /// Display name, translated when the species record has one.
    pub name: String,
    /// Height in decimetres.
    pub height: u32,
    /// Weight in hectograms.
    pub weight: u32,
    pub types: Vec<String>,
    /// Base stats in upstream order (hp, attack, defense, special-attack,
    /// special-defense, speed).
    pub stats: Vec<Stat>,
    pub abilities: Vec<Ability>,
    /// Localized flavor text. `None` when the species lookup failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sprites: Sprites,
}

/// One page produced by a paginator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<CatalogEntry>,
    /// Offset to request next.
    pub next_offset: usize,
    pub has_more: bool,
}

// ============================================================================
// PokeAPI wire types
// ============================================================================

/// `{name, url}` reference used all over the upstream API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Response of `GET /pokemon?limit=&offset=`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceList {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

/// Response of `GET /pokemon/{idOrName}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PokemonRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub sprites: SpriteSet,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatSlot {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SpriteSet {
    #[serde(default)]
    pub front_default: Option<String>,
}

/// Response of `GET /pokemon-species/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SpeciesRecord {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorTextEntry>,
    #[serde(default)]
    pub names: Vec<LocalizedName>,
}

/// A versioned, localized description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlavorTextEntry {
    pub flavor_text: String,
    pub language: NamedResource,
    pub version: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalizedName {
    pub name: String,
    pub language: NamedResource,
}
