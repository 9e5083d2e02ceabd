//! PokeAPI HTTP client.
//!
//! PokeAPI is public and needs no key. It is slow but reliable, so no
//! app-level timeout is applied unless one is configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{PokemonRecord, ResourceList, SpeciesRecord};
use super::{CatalogApi, CatalogError};
use crate::config::CatalogConfig;
use crate::metrics::{UPSTREAM_REQUESTS, UPSTREAM_REQUEST_DURATION};

/// PokeAPI client.
pub struct PokeApiClient {
    client: Client,
    base_url: String,
}

impl PokeApiClient {
    /// Create a new client from the catalog configuration.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and decode its JSON body, recording metrics.
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<Option<T>, CatalogError> {
        let timer = UPSTREAM_REQUEST_DURATION
            .with_label_values(&[endpoint])
            .start_timer();
        let result = Self::send(request).await;
        timer.observe_duration();

        let outcome = match &result {
            Ok(Some(_)) => "ok",
            Ok(None) => "not_found",
            Err(CatalogError::Upstream { .. }) => "upstream_error",
            Err(CatalogError::Parse(_)) => "parse_error",
            Err(_) => "transport_error",
        };
        UPSTREAM_REQUESTS
            .with_label_values(&[endpoint, outcome])
            .inc();

        result
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<Option<T>, CatalogError> {
        let response = request.send().await?;

        let status = response.status();
        if status == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[async_trait]
impl CatalogApi for PokeApiClient {
    async fn list_pokemon(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<ResourceList, CatalogError> {
        let url = format!("{}/pokemon", self.base_url);

        debug!("PokeAPI list: limit={}, offset={}", limit, offset);

        let request = self
            .client
            .get(&url)
            .query(&[("limit", limit), ("offset", offset)]);

        match self.fetch_json::<ResourceList>("list", request).await? {
            Some(list) => Ok(list),
            // The list endpoint never legitimately 404s
            None => Err(CatalogError::Upstream {
                status: 404,
                message: format!("{} not found", url),
            }),
        }
    }

    async fn get_pokemon(&self, id_or_name: &str) -> Result<Option<PokemonRecord>, CatalogError> {
        let url = format!(
            "{}/pokemon/{}",
            self.base_url,
            urlencoding::encode(id_or_name)
        );

        debug!("PokeAPI get pokemon: {}", id_or_name);

        self.fetch_json("pokemon", self.client.get(&url)).await
    }

    async fn get_species(&self, id: u32) -> Result<Option<SpeciesRecord>, CatalogError> {
        let url = format!("{}/pokemon-species/{}", self.base_url, id);

        debug!("PokeAPI get species: {}", id);

        self.fetch_json("species", self.client.get(&url)).await
    }
}
