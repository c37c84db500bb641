//! HTTP fetcher implementation
//!
//! This module issues the raw requests against the registration site:
//! - Building the HTTP client with the crawler's user agent
//! - GET requests for the term and detail pages
//! - Form POSTs for the subject and course searches
//! - Classifying failures into [`FetchError`]

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::FetchError;
use reqwest::{Client, Response};
use std::time::Duration;

/// Formats the user agent string: `Name/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// The registration site keeps its session in the `session_id` form value,
/// so no cookie store is needed.
///
/// # Example
///
/// ```no_run
/// use catalog_harvester::config::{CrawlerConfig, UserAgentConfig};
/// use catalog_harvester::crawler::build_http_client;
///
/// let user_agent = UserAgentConfig {
///     crawler_name: "CatalogHarvester".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&user_agent, &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page with GET and returns its body
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FetchError> {
    tracing::trace!("GET {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| transport(url, source))?;

    read_body(url, response).await
}

/// Submits a url-encoded form with POST and returns the response body
///
/// Fields are sent in the given order and repeated keys are kept; the
/// registration site relies on both.
pub async fn post_form(
    client: &Client,
    url: &str,
    form: &[(&str, String)],
) -> Result<String, FetchError> {
    tracing::trace!("POST {} ({} fields)", url, form.len());
    let response = client
        .post(url)
        .form(form)
        .send()
        .await
        .map_err(|source| transport(url, source))?;

    read_body(url, response).await
}

async fn read_body(url: &str, response: Response) -> Result<String, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| transport(url, source))
}

fn transport(url: &str, source: reqwest::Error) -> FetchError {
    FetchError::Transport {
        url: url.to_string(),
        source,
    }
}
