use crate::config::types::{
    Config, CrawlerConfig, FetcherConfig, IndexingConfig, StorageConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_crawler_config(&config.crawler)?;
    validate_indexing_config(&config.indexing)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

/// Validates fetcher timeouts and limits
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if !(100..=120_000).contains(&config.request_timeout_ms) {
        return Err(ConfigError::Validation(format!(
            "request_timeout_ms must be between 100 and 120000, got {}",
            config.request_timeout_ms
        )));
    }

    if config.connect_timeout_ms < 100 || config.connect_timeout_ms > config.request_timeout_ms {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_ms must be between 100 and request_timeout_ms, got {}",
            config.connect_timeout_ms
        )));
    }

    if config.max_body_bytes < 1024 {
        return Err(ConfigError::Validation(format!(
            "max_body_bytes must be >= 1024, got {}",
            config.max_body_bytes
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if !config.name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "user-agent name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates link crawler limits
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_links < 1 || config.max_links > 500 {
        return Err(ConfigError::Validation(format!(
            "max_links must be between 1 and 500, got {}",
            config.max_links
        )));
    }

    if config.concurrency < 1 || config.concurrency > 64 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 64, got {}",
            config.concurrency
        )));
    }

    if config.max_redirect_hops < 1 || config.max_redirect_hops > 20 {
        return Err(ConfigError::Validation(format!(
            "max_redirect_hops must be between 1 and 20, got {}",
            config.max_redirect_hops
        )));
    }

    if let Some(timeout) = config.scan_timeout_ms {
        if timeout < 100 {
            return Err(ConfigError::Validation(format!(
                "scan_timeout_ms must be >= 100ms, got {}ms",
                timeout
            )));
        }
    }

    Ok(())
}

/// Validates the IndexNow endpoint settings
fn validate_indexing_config(config: &IndexingConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid indexing endpoint: {}", e)))?;

    if endpoint.scheme() != "https" && endpoint.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "Indexing endpoint '{}' must use HTTP(S)",
            config.endpoint
        )));
    }

    if let Some(location) = &config.key_location {
        Url::parse(location)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid key-location: {}", e)))?;
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}
