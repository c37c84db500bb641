use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable that overrides `sink.worker-key`
pub const WORKER_KEY_ENV: &str = "WORKER_KEY";

/// Loads and parses a configuration file from the given path
///
/// The worker key may be supplied through the `WORKER_KEY` environment
/// variable instead of the file, which keeps the secret out of version control.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use catalog_harvester::config::load_config;
///
/// let config = load_config(Path::new("harvester.toml")).unwrap();
/// println!("Workers: {}", config.crawler.max_concurrent_workers);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Parses configuration text, applies overrides from `env` and validates it
pub fn parse_config<F>(content: &str, env: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: Config = toml::from_str(content)?;

    apply_env_overrides(&mut config, env);

    if !config.source.base_url.ends_with('/') {
        config.source.base_url.push('/');
    }

    validate(&config)?;

    Ok(config)
}

/// Replaces config values with their environment overrides, if set
pub fn apply_env_overrides<F>(config: &mut Config, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = env(WORKER_KEY_ENV).filter(|key| !key.is_empty()) {
        config.sink.worker_key = Some(key);
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a run's records can be traced back to its configuration.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SinkKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const USER_AGENT: &str = r#"
[user-agent]
crawler-name = "TestHarvester"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"
"#;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config = parse_config(USER_AGENT, no_env).unwrap();

        assert_eq!(config.source.base_url, "https://central.carleton.ca/prod/");
        assert_eq!(config.source.wsea_code, "EXT");
        assert_eq!(config.crawler.max_concurrent_workers, 100);
        assert_eq!(config.crawler.request_timeout_secs, 30);
        assert_eq!(config.sink.kind, SinkKind::None);
        assert!(config.output.records_path.is_none());
    }

    #[test]
    fn test_load_full_config() {
        let content = format!(
            r#"
[source]
base-url = "http://localhost:8080/prod"
wsea-code = "EXT"

[crawler]
max-concurrent-workers = 25
request-timeout-secs = 5
connect-timeout-secs = 2

[sink]
kind = "http"
endpoint = "http://localhost:3969/add-course-details"
worker-key = "from-file"

[output]
records-path = "./courses.json"
summary-path = "./summary.md"
{}"#,
            USER_AGENT
        );

        let file = create_temp_config(&content);
        let config = parse_config(&std::fs::read_to_string(file.path()).unwrap(), no_env).unwrap();

        assert_eq!(config.source.base_url, "http://localhost:8080/prod/");
        assert_eq!(config.crawler.max_concurrent_workers, 25);
        assert_eq!(config.sink.kind, SinkKind::Http);
        assert_eq!(config.sink.worker_key.as_deref(), Some("from-file"));
        assert_eq!(config.output.records_path.as_deref(), Some("./courses.json"));
    }

    #[test]
    fn test_worker_key_env_override() {
        let content = format!(
            r#"
[sink]
kind = "http"
endpoint = "http://localhost:3969/add-course-details"
{}"#,
            USER_AGENT
        );

        let config = parse_config(&content, |key| {
            (key == WORKER_KEY_ENV).then(|| "from-env".to_string())
        })
        .unwrap();
        assert_eq!(config.sink.worker_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_http_sink_requires_worker_key() {
        let content = format!(
            r#"
[sink]
kind = "http"
endpoint = "http://localhost:3969/add-course-details"
{}"#,
            USER_AGENT
        );

        let result = parse_config(&content, no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvester.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::Io(_)));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let content = format!("[crawler]\nmax-concurrent-workers = 0\n{}", USER_AGENT);
        let result = parse_config(&content, no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        assert_eq!(hash1, compute_config_hash(file1.path()).unwrap());
        assert_eq!(hash1.len(), 64);
        assert_ne!(hash1, compute_config_hash(file2.path()).unwrap());
    }
}
