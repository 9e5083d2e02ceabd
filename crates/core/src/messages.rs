//! Localized strings surfaced by the data layer.

use crate::catalog::Language;

/// Placeholder used when a species has no flavor text at all.
pub fn no_description(language: Language) -> &'static str {
    match language {
        Language::Fr => "Aucune description disponible pour ce Pokémon.",
        Language::En => "No description available for this Pokémon.",
    }
}

/// Shown by the detail screen when the record could not be fetched.
pub fn unable_to_load(language: Language) -> &'static str {
    match language {
        Language::Fr => "Impossible de charger ce Pokémon.",
        Language::En => "Unable to load this Pokémon.",
    }
}

/// Shown under the search bar when a query resolved to nothing.
pub fn no_result_for(language: Language, query: &str) -> String {
    match language {
        Language::Fr => format!("Aucun Pokémon trouvé pour \"{}\"", query),
        Language::En => format!("No Pokémon found for \"{}\"", query),
    }
}
