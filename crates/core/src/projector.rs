//! Merges list and search state into what the list screen renders.

use serde::Serialize;

use crate::catalog::{CatalogDetail, CatalogEntry, Language};
use crate::collation::sort_by_name;
use crate::list::ListSnapshot;
use crate::messages;
use crate::paginator::SortOrder;
use crate::search::{SearchState, SearchStatus};

/// Uppercase the first character, leave the rest unchanged.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// List row for a search hit. It has no upstream list reference.
pub fn entry_from_detail(detail: &CatalogDetail) -> CatalogEntry {
    CatalogEntry {
        id: detail.id.clone(),
        name: detail.name.clone(),
        image_url: detail.sprites.artwork.clone(),
        types: detail.types.clone(),
        source_url: String::new(),
    }
}

/// One rendered list row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRow {
    pub id: String,
    /// Capitalized display name.
    pub name: String,
    pub image_url: String,
    /// Known category tags, possibly empty.
    pub types: Vec<String>,
    /// `types[0]`, or `normal` while the tags are unknown.
    pub primary_type: String,
    pub source_url: String,
}

impl ListRow {
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: capitalize(&entry.name),
            image_url: entry.image_url.clone(),
            types: entry.types.clone(),
            primary_type: entry.primary_type().to_string(),
            source_url: entry.source_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewFlags {
    pub loading: bool,
    pub refreshing: bool,
    /// More pages can be requested. Always false while a match is shown.
    pub has_more: bool,
    pub searching: bool,
    pub not_found: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub entries: Vec<ListRow>,
    pub flags: ViewFlags,
    pub query: String,
    pub sort_order: SortOrder,
    /// Localized status line for the search box, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Build the view model. Pure: no I/O, inputs untouched.
///
/// A resolved search match replaces the paginated sequence entirely.
/// Otherwise the accumulated pages are shown in arrival order, re-sorted by
/// name when that ordering is active.
pub fn project(list: &ListSnapshot, search: &SearchState, language: Language) -> ViewModel {
    let matched = search.result.as_ref().filter(|_| search.status == SearchStatus::Found);

    let entries = match matched {
        Some(found) => vec![ListRow::from_entry(&entry_from_detail(&found.detail))],
        None => {
            let mut entries: Vec<ListRow> = list.items.iter().map(ListRow::from_entry).collect();
            if list.order == SortOrder::ByName {
                sort_by_name(&mut entries, |e| e.name.as_str());
            }
            entries
        }
    };

    let message = match &search.status {
        SearchStatus::NotFound => Some(messages::no_result_for(language, search.query.trim())),
        SearchStatus::Failed { .. } => Some(messages::unable_to_load(language).to_string()),
        _ => None,
    };

    ViewModel {
        entries,
        flags: ViewFlags {
            loading: list.loading && matched.is_none(),
            refreshing: list.refreshing,
            has_more: list.has_more && matched.is_none(),
            searching: search.is_searching(),
            not_found: search.is_not_found(),
        },
        query: search.query.clone(),
        sort_order: list.order,
        message,
    }
}
