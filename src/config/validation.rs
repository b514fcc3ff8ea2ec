use crate::config::types::CrawlerConfig;
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_timing(config)?;
    validate_limits(config)?;
    validate_site(config)?;
    Ok(())
}

/// Validates interval and timeout values
fn validate_timing(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.interval == Duration::ZERO {
        return Err(ConfigError::Validation(
            "interval must be at least one second".to_string(),
        ));
    }

    if config.request_timeout == Duration::ZERO {
        return Err(ConfigError::Validation(
            "request_timeout must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

/// Validates connection limits
fn validate_limits(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_host_connections < 1 || config.max_host_connections > 100 {
        return Err(ConfigError::Validation(format!(
            "max_host_connections must be between 1 and 100, got {}",
            config.max_host_connections
        )));
    }

    Ok(())
}

/// Validates the site root and the identifying header
fn validate_site(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    let root = Url::parse(&config.site_root)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site_root: {}", e)))?;

    if root.scheme() != "http" && root.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "site_root must use http or https, got '{}'",
            root.scheme()
        )));
    }

    if root.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "site_root '{}' has no host",
            config.site_root
        )));
    }

    Ok(())
}
