use pokedex_core::{CatalogSession, Config};

/// Shared application state
pub struct AppState {
    config: Config,
    session: CatalogSession,
}

impl AppState {
    pub fn new(config: Config, session: CatalogSession) -> Self {
        Self { config, session }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &CatalogSession {
        &self.session
    }
}
