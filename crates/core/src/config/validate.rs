use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Catalog URLs are not empty
/// - Index limit and page size are positive
/// - Server port is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Catalog validation
    for (name, value) in [
        ("catalog.base_url", &config.catalog.base_url),
        ("catalog.artwork_base_url", &config.catalog.artwork_base_url),
        ("catalog.cry_base_url", &config.catalog.cry_base_url),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                name
            )));
        }
    }

    if config.catalog.index_limit == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.index_limit must be greater than 0".to_string(),
        ));
    }

    // List validation
    if config.list.page_size == 0 {
        return Err(ConfigError::ValidationError(
            "list.page_size must be greater than 0".to_string(),
        ));
    }

    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    Ok(())
}
