//! Flavor text selection and localized name lookup.

use super::types::{FlavorTextEntry, Language, SpeciesRecord};
use crate::messages;

/// Game versions whose descriptions are preferred, in priority order.
pub const MODERN_VERSIONS: [&str; 7] = [
    "sword",
    "shield",
    "scarlet",
    "violet",
    "legends-arceus",
    "sun",
    "moon",
];

/// Pick the best description for `language`.
///
/// Languages are tried in the order `[language, language.fallback()]`. Within a
/// language the modern versions are searched first, then any entry in that
/// language. With no language match the first entry overall is used, and an
/// empty set yields the localized placeholder.
pub fn select_description(entries: &[FlavorTextEntry], language: Language) -> String {
    for lang in [language, language.fallback()] {
        let code = lang.code();

        let modern = MODERN_VERSIONS.iter().find_map(|version| {
            entries
                .iter()
                .find(|e| e.language.name == code && e.version.name == *version)
        });
        if let Some(entry) = modern {
            return clean_flavor_text(&entry.flavor_text);
        }

        if let Some(entry) = entries.iter().find(|e| e.language.name == code) {
            return clean_flavor_text(&entry.flavor_text);
        }
    }

    match entries.first() {
        Some(entry) => clean_flavor_text(&entry.flavor_text),
        None => messages::no_description(language).to_string(),
    }
}

/// Normalize game text: form feeds and newlines become spaces, soft hyphens
/// are dropped, whitespace runs collapse to one space.
pub fn clean_flavor_text(text: &str) -> String {
    text.replace(['\u{c}', '\n'], " ")
        .replace('\u{ad}', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Species display name in `language`, if the upstream has one.
pub fn translated_name(species: &SpeciesRecord, language: Language) -> Option<String> {
    species
        .names
        .iter()
        .find(|n| n.language.name == language.code())
        .map(|n| n.name.clone())
}
