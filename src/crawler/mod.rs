//! Crawler module for the registration site
//!
//! This module contains the crawl pipeline:
//! - HTTP fetching (GET pages, POST ordered forms)
//! - Endpoint URLs and the fixed form payloads the site expects
//! - The session, subject, CRN and detail requests behind [`CatalogSource`]
//! - Bounded fan-out of detail fetches and result collection

mod coordinator;
mod endpoints;
mod fetcher;
mod source;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use endpoints::SourceEndpoints;
pub use fetcher::{build_http_client, fetch_page, post_form, user_agent_string};
pub use source::{CatalogSource, Session, SourceClient};
