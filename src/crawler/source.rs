//! Registration site client
//!
//! [`SourceClient`] performs the four kinds of requests a crawl needs: the
//! session bootstrap, the subject listing, the course (CRN) search and the
//! course detail fetch. The [`CatalogSource`] trait is the seam the
//! coordinator drives, so the crawl loop can run against other sources.

use crate::catalog::{CourseDetailsRecord, Term};
use crate::config::Config;
use crate::crawler::endpoints::SourceEndpoints;
use crate::crawler::fetcher::{build_http_client, fetch_page, post_form};
use crate::extract::{parse_course_details, parse_crns, parse_session_page, parse_subjects};
use crate::{FetchError, HarvestError};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeSet;

/// Run-scoped session state, read-only once bootstrapped
///
/// Every request after the bootstrap carries `token`; the session is passed
/// explicitly to each enumerator and worker call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Value of the site's hidden `session_id` field, empty if none was found
    pub token: String,

    /// Terms offered at bootstrap time
    pub terms: Vec<Term>,
}

impl Session {
    /// A session with no token or no terms yields no work
    pub fn is_empty(&self) -> bool {
        self.token.is_empty() || self.terms.is_empty()
    }
}

/// A course catalog that can be enumerated and fetched
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches the term-selection page and extracts the session token and terms
    ///
    /// A page without a token or without terms yields empty values, not an error.
    async fn bootstrap(&self) -> Result<Session, FetchError>;

    /// Lists the subject codes offered in a term
    async fn list_subjects(&self, term: &Term, session: &Session)
        -> Result<Vec<String>, FetchError>;

    /// Lists the distinct CRNs offered for a subject in a term
    async fn list_crns(
        &self,
        term: &Term,
        subject: &str,
        session: &Session,
    ) -> Result<BTreeSet<String>, FetchError>;

    /// Fetches and parses one course detail page
    ///
    /// `Ok(None)` means the page was not a course details page and is skipped.
    async fn fetch_details(
        &self,
        term: &Term,
        crn: &str,
        session: &Session,
    ) -> Result<Option<CourseDetailsRecord>, FetchError>;
}

/// HTTP client for the legacy registration site
#[derive(Debug, Clone)]
pub struct SourceClient {
    client: Client,
    endpoints: SourceEndpoints,
}

impl SourceClient {
    /// Creates a client for the site described by `config`
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        let endpoints = SourceEndpoints::new(&config.source)?;
        Ok(Self { client, endpoints })
    }

    /// Creates a client around an existing HTTP client
    pub fn with_client(client: Client, endpoints: SourceEndpoints) -> Self {
        Self { client, endpoints }
    }
}

#[async_trait]
impl CatalogSource for SourceClient {
    async fn bootstrap(&self) -> Result<Session, FetchError> {
        let url = self.endpoints.select_term_url();
        let html = fetch_page(&self.client, &url).await?;
        let page = parse_session_page(&html);

        if page.token.is_empty() {
            tracing::warn!("No session token found on {}", url);
        }
        if page.terms.is_empty() {
            tracing::warn!("No terms found on {}", url);
        }

        Ok(Session {
            token: page.token,
            terms: page.terms,
        })
    }

    async fn list_subjects(
        &self,
        term: &Term,
        session: &Session,
    ) -> Result<Vec<String>, FetchError> {
        let url = self.endpoints.search_fields_url();
        let form = self.endpoints.search_fields_form(&term.code, &session.token);
        let html = post_form(&self.client, &url, &form).await?;
        Ok(parse_subjects(&html))
    }

    async fn list_crns(
        &self,
        term: &Term,
        subject: &str,
        session: &Session,
    ) -> Result<BTreeSet<String>, FetchError> {
        let url = self.endpoints.course_search_url();
        let form = self
            .endpoints
            .course_search_form(&term.code, subject, &session.token);
        let html = post_form(&self.client, &url, &form).await?;
        Ok(parse_crns(&html))
    }

    async fn fetch_details(
        &self,
        term: &Term,
        crn: &str,
        session: &Session,
    ) -> Result<Option<CourseDetailsRecord>, FetchError> {
        let url = self
            .endpoints
            .display_course_url(&term.code, &session.token, crn);
        let html = fetch_page(&self.client, &url).await?;
        Ok(parse_course_details(&html))
    }
}
