use crate::config::types::{CleanerConfig, Config, FetcherConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Upper bound on automatic 5xx retries; backoff doubles per retry
const MAX_RETRY_LIMIT: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_cleaner_config(&config.cleaner)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates site topology configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)?;
    validate_http_url("index-url", &config.index_url)?;

    for selector in [
        &config.index_container,
        &config.detail_container,
        &config.detail_heading,
    ] {
        validate_selector(selector)?;
    }

    if config.link_pattern.is_empty() {
        return Err(ConfigError::Validation(
            "link-pattern cannot be empty".to_string(),
        ));
    }

    // An empty marker is contained in every title and would exclude everything
    if config.excluded_title_markers.iter().any(|m| m.is_empty()) {
        return Err(ConfigError::Validation(
            "excluded-title-markers cannot contain an empty marker".to_string(),
        ));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.retry_limit > MAX_RETRY_LIMIT {
        return Err(ConfigError::Validation(format!(
            "retry-limit must be <= {}, got {}",
            MAX_RETRY_LIMIT, config.retry_limit
        )));
    }

    if config.timeout_short_ms == 0 {
        return Err(ConfigError::Validation(
            "timeout-short-ms must be > 0".to_string(),
        ));
    }

    if config.timeout_long_ms < config.timeout_short_ms {
        return Err(ConfigError::Validation(format!(
            "timeout-long-ms ({}) must be >= timeout-short-ms ({})",
            config.timeout_long_ms, config.timeout_short_ms
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates cleaner configuration
fn validate_cleaner_config(config: &CleanerConfig) -> Result<(), ConfigError> {
    for selector in &config.selectors {
        validate_selector(selector)?;
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Checks that a URL parses and uses http or https
fn validate_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", key, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            key, value
        )));
    }

    Ok(())
}

/// Checks that a CSS selector parses
fn validate_selector(selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}
