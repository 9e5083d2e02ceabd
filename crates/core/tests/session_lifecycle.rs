//! Session lifecycle integration tests.
//!
//! These tests drive a `CatalogSession` the way the list screen does:
//! mount -> scroll -> search -> switch ordering -> change language

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use pokedex_core::{
    collation::compare_names,
    testing::{fixtures, MockCatalogApi, RecordedApiCall},
    CatalogApi, CatalogSession, Config, DetailView, FilePreferenceStore, Language,
    MemoryPreferenceStore, SearchStatus, SortOrder,
};

const NAMES: [&str; 30] = [
    "bulbasaur", "ivysaur", "venusaur", "charmander", "charmeleon", "charizard", "squirtle",
    "wartortle", "blastoise", "caterpie", "metapod", "butterfree", "weedle", "kakuna",
    "beedrill", "pidgey", "pidgeotto", "pidgeot", "rattata", "raticate", "spearow", "fearow",
    "ekans", "arbok", "pikachu", "raichu", "sandshrew", "sandslash", "nidoran-f", "nidorina",
];

/// Test helper holding the mock upstream and a session built on it.
struct TestHarness {
    api: Arc<MockCatalogApi>,
    session: CatalogSession,
}

impl TestHarness {
    async fn new(page_size: usize) -> Self {
        let api = seeded_api().await;
        let mut config = Config::default();
        config.list.page_size = page_size;

        let session = CatalogSession::build(
            Arc::clone(&api) as Arc<dyn CatalogApi>,
            Arc::new(MemoryPreferenceStore::new()),
            &config,
        )
        .await;

        Self { api, session }
    }

    async fn names(&self) -> Vec<String> {
        self.session
            .view()
            .await
            .entries
            .into_iter()
            .map(|e| e.name)
            .collect()
    }

    async fn scroll_to_end(&self) -> usize {
        let mut requests = 0;
        while self.session.view().await.flags.has_more {
            self.session.load_more().await.unwrap();
            requests += 1;
        }
        requests
    }
}

async fn seeded_api() -> Arc<MockCatalogApi> {
    let api = Arc::new(MockCatalogApi::new());
    for (i, name) in NAMES.iter().enumerate() {
        api.add_pokemon(fixtures::pokemon(i as u32 + 1, name, &["normal"]))
            .await;
    }
    api.add_species(fixtures::species(
        25,
        &[
            ("When several of\nthese POKéMON gather.", "en", "red"),
            ("Il lui arrive de remettre\u{c}d'aplomb un Pikachu.", "fr", "sword"),
        ],
        &[("fr", "Pikachu"), ("en", "Pikachu")],
    ))
    .await;
    api
}

#[tokio::test]
async fn test_id_order_scroll_yields_every_entry_once() {
    let harness = TestHarness::new(24).await;
    harness.session.mount().await.unwrap();
    assert_eq!(harness.names().await.len(), 24);

    harness.scroll_to_end().await;

    let names = harness.names().await;
    assert_eq!(names.len(), NAMES.len());
    let unique: HashSet<&String> = names.iter().collect();
    assert_eq!(unique.len(), NAMES.len());
    assert_eq!(names[0], "Bulbasaur");
    assert_eq!(names[29], "Nidorina");

    // Exhausted: further requests are no-ops
    harness.api.clear_recorded().await;
    assert!(!harness.session.load_more().await.unwrap());
    assert_eq!(harness.api.query_count().await, 0);
}

#[tokio::test]
async fn test_name_order_scroll_is_sorted_permutation() {
    for page_size in [1, 4, 7, 24, 30, 31] {
        let harness = TestHarness::new(page_size).await;
        harness.session.mount().await.unwrap();
        harness
            .session
            .set_sort_order(SortOrder::ByName)
            .await
            .unwrap();

        let requests = 1 + harness.scroll_to_end().await;
        assert_eq!(requests, NAMES.len().div_ceil(page_size));

        let names = harness.names().await;
        let mut expected: Vec<String> = NAMES.iter().map(|n| capitalize(n)).collect();
        expected.sort();
        let mut got = names.clone();
        got.sort();
        assert_eq!(got, expected, "page size {}", page_size);

        for pair in names.windows(2) {
            assert_ne!(
                compare_names(&pair[0], &pair[1]),
                std::cmp::Ordering::Greater
            );
        }
    }
}

#[tokio::test]
async fn test_switching_order_back_and_forth_restarts() {
    let harness = TestHarness::new(10).await;
    harness.session.mount().await.unwrap();
    harness.session.load_more().await.unwrap();
    assert_eq!(harness.names().await.len(), 20);

    harness
        .session
        .set_sort_order(SortOrder::ByName)
        .await
        .unwrap();
    assert_eq!(harness.names().await[0], "Arbok");
    assert_eq!(harness.names().await.len(), 10);

    harness
        .session
        .set_sort_order(SortOrder::ById)
        .await
        .unwrap();
    let names = harness.names().await;
    assert_eq!(names.len(), 10);
    assert_eq!(names[0], "Bulbasaur");
}

#[tokio::test]
async fn test_failed_enrichment_degrades_page() {
    let harness = TestHarness::new(2).await;
    harness.api.fail_pokemon("1").await;
    harness.api.fail_pokemon("2").await;

    harness.session.mount().await.unwrap();

    let view = harness.session.view().await;
    assert_eq!(view.entries.len(), 2);
    for entry in &view.entries {
        assert_eq!(entry.types, vec!["normal"]);
    }
    assert_eq!(view.entries[0].name, "Bulbasaur");
    assert!(view.flags.has_more);
}

#[tokio::test(start_paused = true)]
async fn test_numeric_query_skips_index_scan() {
    let harness = TestHarness::new(24).await;
    harness.session.mount().await.unwrap();
    harness.api.clear_recorded().await;

    harness.session.set_query("5");
    harness.session.search().settled().await;

    let view = harness.session.view().await;
    assert_eq!(view.entries.len(), 1);
    assert_eq!(view.entries[0].name, "Charmeleon");
    assert!(!view.flags.has_more);

    let calls = harness.api.recorded_calls().await;
    assert_eq!(
        calls[0],
        RecordedApiCall::GetPokemon {
            id_or_name: "5".to_string()
        }
    );
    assert!(!calls
        .iter()
        .any(|c| matches!(c, RecordedApiCall::ListPokemon { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_substring_query_and_not_found() {
    let harness = TestHarness::new(24).await;
    harness.session.mount().await.unwrap();

    harness.session.set_query("CHU");
    assert!(harness.session.view().await.flags.searching);
    harness.session.search().settled().await;
    assert_eq!(harness.names().await, vec!["Pikachu"]);

    harness.session.set_query("mewthree");
    harness.session.search().settled().await;
    let view = harness.session.view().await;
    assert!(view.flags.not_found);
    assert_eq!(view.entries.len(), 24);
    assert_eq!(
        view.message.as_deref(),
        Some("Aucun Pokémon trouvé pour \"mewthree\"")
    );

    harness.session.set_query("");
    let view = harness.session.view().await;
    assert_eq!(harness.session.search().state().status, SearchStatus::Idle);
    assert!(!view.flags.not_found);
}

#[tokio::test(start_paused = true)]
async fn test_typing_burst_resolves_once() {
    let harness = TestHarness::new(24).await;
    harness.session.mount().await.unwrap();
    harness.api.clear_recorded().await;

    for prefix in ["p", "pi", "pik", "pika", "pikac", "pikachu"] {
        harness.session.set_query(prefix);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    harness.session.search().settled().await;

    let lookups: Vec<String> = harness
        .api
        .recorded_calls()
        .await
        .into_iter()
        .filter_map(|c| match c {
            RecordedApiCall::GetPokemon { id_or_name } => Some(id_or_name),
            _ => None,
        })
        .collect();
    assert_eq!(lookups, vec!["pikachu"]);
}

#[tokio::test]
async fn test_detail_uses_language_and_cleans_text() {
    let harness = TestHarness::new(24).await;

    match harness.session.detail("pikachu").await {
        DetailView::Loaded { detail } => {
            assert_eq!(detail.number, "#025");
            assert_eq!(
                detail.description,
                "Il lui arrive de remettre d'aplomb un Pikachu."
            );
            assert_eq!(detail.stats.len(), 6);
        }
        other => panic!("unexpected view: {:?}", other),
    }

    harness
        .session
        .set_language(Language::En)
        .await
        .unwrap();
    match harness.session.detail("25").await {
        DetailView::Loaded { detail } => {
            assert_eq!(
                detail.description,
                "When several of these POKéMON gather."
            );
        }
        other => panic!("unexpected view: {:?}", other),
    }
}

#[tokio::test]
async fn test_language_survives_restart() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("prefs.json");
    let api = seeded_api().await;
    let config = Config::default();

    let first = CatalogSession::build(
        Arc::clone(&api) as Arc<dyn CatalogApi>,
        Arc::new(FilePreferenceStore::new(&path)),
        &config,
    )
    .await;
    assert_eq!(first.display_settings().language, Language::Fr);
    first.set_language(Language::En).await.unwrap();
    assert!(first.toggle_mute());

    let second = CatalogSession::build(
        Arc::clone(&api) as Arc<dyn CatalogApi>,
        Arc::new(FilePreferenceStore::new(&path)),
        &config,
    )
    .await;
    let settings = second.display_settings();
    assert_eq!(settings.language, Language::En);
    assert!(!settings.muted);
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
