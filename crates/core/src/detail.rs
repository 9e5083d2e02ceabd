//! Detail screen projection.

use serde::Serialize;

use crate::catalog::{CatalogDetail, CatalogError, Language, DEFAULT_TYPE};
use crate::messages;
use crate::projector::capitalize;

/// Upper bound of the stat bar.
pub const MAX_BASE_STAT: u32 = 255;

/// Short label shown in front of a stat bar.
pub fn stat_abbreviation(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SATK".to_string(),
        "special-defense" => "SDEF".to_string(),
        "speed" => "SPD".to_string(),
        other => other.to_uppercase(),
    }
}

/// `"solar-power"` → `"Solar Power"`.
pub fn labelize(name: &str) -> String {
    name.split('-')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `"25"` → `"#025"`. Non-numeric ids are shown as is.
pub fn display_number(id: &str) -> String {
    match id.parse::<u32>() {
        Ok(n) => format!("#{:03}", n),
        Err(_) => format!("#{}", id),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatRow {
    pub label: String,
    pub value: u32,
    /// Zero-padded value, e.g. `"045"`.
    pub display: String,
    /// Bar fill in `[0, 1]`.
    pub ratio: f64,
}

impl StatRow {
    fn new(name: &str, base: u32) -> Self {
        Self {
            label: stat_abbreviation(name),
            value: base,
            display: format!("{:03}", base),
            ratio: (f64::from(base) / f64::from(MAX_BASE_STAT)).min(1.0),
        }
    }
}

/// Everything the detail screen renders for a loaded record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailSummary {
    pub id: String,
    pub number: String,
    pub name: String,
    pub primary_type: String,
    pub types: Vec<String>,
    pub height: u32,
    pub weight: u32,
    pub description: String,
    pub artwork_url: String,
    pub cry_url: String,
    pub abilities: Vec<String>,
    pub stats: Vec<StatRow>,
}

impl DetailSummary {
    pub fn new(detail: &CatalogDetail, cry_url: String, language: Language) -> Self {
        Self {
            id: detail.id.clone(),
            number: display_number(&detail.id),
            name: capitalize(&detail.name),
            primary_type: detail
                .types
                .first()
                .map(|t| t.to_lowercase())
                .unwrap_or_else(|| DEFAULT_TYPE.to_string()),
            types: detail.types.clone(),
            height: detail.height,
            weight: detail.weight,
            description: detail
                .description
                .clone()
                .unwrap_or_else(|| messages::no_description(language).to_string()),
            artwork_url: detail.sprites.artwork.clone(),
            cry_url,
            abilities: detail
                .abilities
                .iter()
                .map(|a| labelize(&a.name))
                .collect(),
            stats: detail
                .stats
                .iter()
                .map(|s| StatRow::new(&s.name, s.base))
                .collect(),
        }
    }
}

/// Outcome of opening a detail screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetailView {
    Loaded { detail: Box<DetailSummary> },
    NotFound,
    /// Transport or upstream failure, with the localized message to show.
    Unavailable { message: String },
}

impl DetailView {
    pub fn from_result(
        result: Result<Option<CatalogDetail>, CatalogError>,
        cry_url: impl FnOnce(&str) -> String,
        language: Language,
    ) -> Self {
        match result {
            Ok(Some(detail)) => DetailView::Loaded {
                detail: Box::new(DetailSummary::new(&detail, cry_url(&detail.id), language)),
            },
            Ok(None) => DetailView::NotFound,
            Err(_) => DetailView::Unavailable {
                message: messages::unable_to_load(language).to_string(),
            },
        }
    }
}
