use serde::Deserialize;

/// Main configuration structure for Catalog Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Location of the legacy registration site
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Base URL the `bwysched.*` endpoints hang off (normalized to end in '/')
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Value of the `wsea_code` form field
    #[serde(rename = "wsea-code", default = "default_wsea_code")]
    pub wsea_code: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            wsea_code: default_wsea_code(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of detail workers in flight at once
    #[serde(rename = "max-concurrent-workers", default = "default_max_workers")]
    pub max_concurrent_workers: usize,

    /// Total timeout for a single request (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connect timeout for a single request (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_workers: default_max_workers(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Where harvested records are delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SinkKind {
    /// Records are only collected locally
    #[default]
    None,
    /// POST to the catalog service's ingestion endpoint
    Http,
    /// Upsert into a local SQLite database
    Sqlite,
}

/// Ingestion sink configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SinkConfig {
    #[serde(default)]
    pub kind: SinkKind,

    /// Ingestion endpoint URL (http sink)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Shared secret sent with every submission (http sink)
    #[serde(rename = "worker-key", default)]
    pub worker_key: Option<String>,

    /// Path to the SQLite database file (sqlite sink)
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON dump of every harvested record
    #[serde(rename = "records-path", default)]
    pub records_path: Option<String>,

    /// Path of the markdown run summary
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}

fn default_base_url() -> String {
    "https://central.carleton.ca/prod/".to_string()
}

fn default_wsea_code() -> String {
    "EXT".to_string()
}

fn default_max_workers() -> usize {
    100
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}
