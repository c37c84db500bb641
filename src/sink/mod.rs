//! Ingestion sinks for harvested records
//!
//! This module handles:
//! - The [`IngestionSink`] contract (idempotent upsert keyed by `global_id`)
//! - Delivery to the catalog service over HTTP
//! - A local SQLite store with the same contract

mod http;
mod schema;
mod sqlite;
mod traits;

pub use http::{HttpSink, SubmitRequest};
pub use schema::{initialize_schema, SCHEMA_SQL};
pub use sqlite::SqliteSink;
pub use traits::{IngestionSink, SinkError, SinkResult};

use crate::config::{Config, SinkKind};
use crate::{ConfigError, HarvestError};
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;

/// Builds the sink selected by `config.sink.kind`
///
/// Returns `None` for `kind = "none"`. The HTTP sink reuses `client` so it
/// shares the crawler's user agent and timeouts.
pub fn build_sink(
    config: &Config,
    client: Client,
) -> Result<Option<Arc<dyn IngestionSink>>, HarvestError> {
    match config.sink.kind {
        SinkKind::None => Ok(None),
        SinkKind::Http => {
            let endpoint = config.sink.endpoint.clone().ok_or_else(|| {
                ConfigError::Validation("sink.endpoint is required for the http sink".to_string())
            })?;
            let worker_key = config.sink.worker_key.clone().ok_or_else(|| {
                ConfigError::Validation("sink.worker-key is required for the http sink".to_string())
            })?;

            tracing::info!("Submitting records to {}", endpoint);
            Ok(Some(Arc::new(HttpSink::new(client, endpoint, worker_key))))
        }
        SinkKind::Sqlite => {
            let path = config.sink.database_path.as_deref().ok_or_else(|| {
                ConfigError::Validation(
                    "sink.database-path is required for the sqlite sink".to_string(),
                )
            })?;

            tracing::info!("Storing records in {}", path);
            Ok(Some(Arc::new(SqliteSink::new(Path::new(path))?)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    const BASE: &str = r#"
[user-agent]
crawler-name = "TestHarvester"
crawler-version = "1.0"
contact-url = "https://example.com"
contact-email = "test@example.com"
"#;

    #[test]
    fn test_build_no_sink() {
        let config = parse_config(BASE, |_| None).unwrap();
        let sink = build_sink(&config, Client::new()).unwrap();
        assert!(sink.is_none());
    }

    #[test]
    fn test_build_http_sink() {
        let content = format!(
            "{}\n[sink]\nkind = \"http\"\nendpoint = \"http://localhost:3969/add-course-details\"\nworker-key = \"secret\"\n",
            BASE
        );
        let config = parse_config(&content, |_| None).unwrap();
        let sink = build_sink(&config, Client::new()).unwrap().unwrap();
        assert_eq!(sink.name(), "http");
    }

    #[test]
    fn test_build_sqlite_sink() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("catalog.db");
        let content = format!(
            "{}\n[sink]\nkind = \"sqlite\"\ndatabase-path = \"{}\"\n",
            BASE,
            db.display()
        );
        let config = parse_config(&content, |_| None).unwrap();
        let sink = build_sink(&config, Client::new()).unwrap().unwrap();
        assert_eq!(sink.name(), "sqlite");
        assert!(db.exists());
    }
}
