//! Deterministic asset URLs derived from an identifier.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ARTWORK_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";
pub const DEFAULT_CRY_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/cries/main/cries/pokemon/latest";

/// URL templates for artwork and cry assets. No I/O is involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetUrls {
    artwork_base_url: String,
    cry_base_url: String,
}

impl Default for AssetUrls {
    fn default() -> Self {
        Self::new(DEFAULT_ARTWORK_BASE_URL, DEFAULT_CRY_BASE_URL)
    }
}

impl AssetUrls {
    pub fn new(artwork_base_url: &str, cry_base_url: &str) -> Self {
        Self {
            artwork_base_url: artwork_base_url.trim_end_matches('/').to_string(),
            cry_base_url: cry_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Official artwork image for `id`.
    pub fn artwork_url(&self, id: &str) -> String {
        format!("{}/{}.png", self.artwork_base_url, id)
    }

    /// Latest cry audio clip for `id`.
    pub fn cry_url(&self, id: &str) -> String {
        format!("{}/{}.ogg", self.cry_base_url, id)
    }
}
