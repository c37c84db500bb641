use crate::config::types::{
    Config, CrawlerConfig, SinkConfig, SinkKind, SourceConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Upper bound on the worker pool
pub const MAX_WORKERS: usize = 500;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_sink_config(&config.sink)?;
    Ok(())
}

/// Validates the source site location
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    validate_http_url(&config.base_url, "base-url")?;

    if config.wsea_code.trim().is_empty() {
        return Err(ConfigError::Validation(
            "wsea-code cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_workers < 1 || config.max_concurrent_workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.max_concurrent_workers
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates that the chosen sink has what it needs
fn validate_sink_config(config: &SinkConfig) -> Result<(), ConfigError> {
    match config.kind {
        SinkKind::None => Ok(()),
        SinkKind::Http => {
            let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                ConfigError::Validation("http sink requires an endpoint".to_string())
            })?;
            validate_http_url(endpoint, "endpoint")?;

            match config.worker_key.as_deref() {
                Some(key) if !key.trim().is_empty() => Ok(()),
                _ => Err(ConfigError::Validation(
                    "http sink requires a worker-key (or the WORKER_KEY variable)".to_string(),
                )),
            }
        }
        SinkKind::Sqlite => match config.database_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Ok(()),
            _ => Err(ConfigError::Validation(
                "sqlite sink requires a database-path".to_string(),
            )),
        },
    }
}

/// Validates an absolute http(s) URL
fn validate_http_url(value: &str, field: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact-email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
