//! Common test utilities for server integration tests.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use pokedex_core::{
    testing::{fixtures, MockCatalogApi},
    CatalogApi, CatalogSession, Config, MemoryPreferenceStore,
};
use pokedex_server::{create_router, AppState};

pub const NAMES: [&str; 8] = [
    "bulbasaur",
    "ivysaur",
    "venusaur",
    "charmander",
    "charmeleon",
    "charizard",
    "squirtle",
    "wartortle",
];

/// Test fixture that sets up a complete test environment.
pub struct TestFixture {
    pub router: Router,
    pub api: Arc<MockCatalogApi>,
    pub state: Arc<AppState>,
}

impl TestFixture {
    /// Mounted session over eight seeded entries, three per page.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    pub async fn with_config(test_config: TestConfig) -> Self {
        let api = Arc::new(MockCatalogApi::new());
        for (i, name) in NAMES.iter().enumerate() {
            let types: &[&str] = if i < 3 { &["grass", "poison"] } else { &["fire"] };
            api.add_pokemon(fixtures::pokemon(i as u32 + 1, name, types))
                .await;
        }
        api.add_species(fixtures::species(
            1,
            &[
                ("A strange seed was\nplanted on its back at birth.", "en", "red"),
                ("Au matin de sa vie, la graine\u{c}sur son dos lui fournit.", "fr", "x"),
            ],
            &[("fr", "Bulbizarre"), ("en", "Bulbasaur")],
        ))
        .await;

        let mut config = Config::default();
        config.list.page_size = test_config.page_size;
        config.list.search_debounce_ms = 0;

        let session = CatalogSession::build(
            Arc::clone(&api) as Arc<dyn CatalogApi>,
            Arc::new(MemoryPreferenceStore::new()),
            &config,
        )
        .await;

        if test_config.mount {
            session.mount().await.expect("Failed to mount session");
        }

        let state = Arc::new(AppState::new(config, session));
        let router = create_router(Arc::clone(&state));

        Self { router, api, state }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    pub async fn post(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    pub async fn put_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("PUT")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Response captured from the router.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// Parsed JSON body, `Null` when empty or not JSON.
    pub body: Value,
    pub text: String,
}

impl TestResponse {
    /// Names of the entries in a view model body.
    pub fn entry_names(&self) -> Vec<String> {
        self.body["entries"]
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| e["name"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct TestConfig {
    pub page_size: usize,
    pub mount: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            page_size: 3,
            mount: true,
        }
    }
}

impl TestConfig {
    pub fn unmounted() -> Self {
        Self {
            mount: false,
            ..Self::default()
        }
    }
}

#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
