//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator bootstraps one session, walks terms and subjects serially
//! to enumerate CRNs, and fans the detail fetches out over a bounded pool:
//! - A permit from a counting semaphore is taken before each dispatch and
//!   moved into the spawned worker, so it is released however the worker ends
//! - Workers report outcomes over a channel to a single collector that owns
//!   the record list and the detail counters
//! - The run only returns once every dispatched worker has finished
//! - Cancelling the token stops enumeration and dispatch; in-flight workers
//!   run to completion and their results are kept

use crate::catalog::{CourseDetailsRecord, Term};
use crate::config::Config;
use crate::crawler::endpoints::SourceEndpoints;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::source::{CatalogSource, Session, SourceClient};
use crate::output::CrawlStatistics;
use crate::sink::{build_sink, IngestionSink};
use crate::HarvestError;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Completed units between two progress lines
const PROGRESS_INTERVAL: u64 = 100;

/// Everything a run produced
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Records in completion order
    pub records: Vec<CourseDetailsRecord>,
    pub stats: CrawlStatistics,
}

/// How a record's delivery ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Accepted,
    Rejected,
    Unauthorized,
}

/// Terminal state of one detail unit
#[derive(Debug)]
enum UnitOutcome {
    Record {
        record: CourseDetailsRecord,
        delivery: Option<Delivery>,
    },
    Skipped,
    Failed,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    source: Arc<dyn CatalogSource>,
    sink: Option<Arc<dyn IngestionSink>>,
    cancel: CancellationToken,
    term_filter: Vec<String>,
    subject_filter: Vec<String>,
}

impl Coordinator {
    /// Creates a coordinator for the registration site and sink in `config`
    ///
    /// The source client and the HTTP sink share one HTTP client.
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        let endpoints = SourceEndpoints::new(&config.source)?;
        let source = SourceClient::with_client(client.clone(), endpoints);
        let sink = build_sink(&config, client)?;

        Ok(Self::with_source(config, Arc::new(source)).with_sink(sink))
    }

    /// Creates a coordinator over any catalog source, without a sink
    pub fn with_source(config: Config, source: Arc<dyn CatalogSource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
            sink: None,
            cancel: CancellationToken::new(),
            term_filter: Vec::new(),
            subject_filter: Vec::new(),
        }
    }

    /// Replaces the sink; `None` disables submission
    pub fn with_sink(mut self, sink: Option<Arc<dyn IngestionSink>>) -> Self {
        self.sink = sink;
        self
    }

    /// Restricts the crawl to these term codes (empty means all)
    pub fn with_term_filter(mut self, terms: Vec<String>) -> Self {
        self.term_filter = terms;
        self
    }

    /// Restricts the crawl to these subject codes (empty means all)
    pub fn with_subject_filter(mut self, subjects: Vec<String>) -> Self {
        self.subject_filter = subjects;
        self
    }

    /// Uses an externally owned cancellation token
    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops the run when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Bootstraps a session without crawling
    pub async fn bootstrap(&self) -> Result<Session, HarvestError> {
        Ok(self.source.bootstrap().await?)
    }

    /// Fetches a single course detail page in a fresh session
    pub async fn fetch_one(
        &self,
        term_code: &str,
        crn: &str,
    ) -> Result<Option<CourseDetailsRecord>, HarvestError> {
        let session = self.source.bootstrap().await?;
        let term = session
            .terms
            .iter()
            .find(|t| t.code == term_code)
            .cloned()
            .unwrap_or_else(|| {
                tracing::warn!("Term {} is not offered by the session", term_code);
                Term::new(term_code, term_code)
            });

        Ok(self.source.fetch_details(&term, crn, &session).await?)
    }

    /// Runs the crawl to completion or cancellation
    ///
    /// Only a failed session bootstrap is an error. Every other failure is
    /// logged, counted in the statistics and skipped.
    pub async fn run(&self) -> Result<CrawlReport, HarvestError> {
        let mut stats = CrawlStatistics {
            started_at: Some(Utc::now()),
            ..Default::default()
        };

        let session = Arc::new(self.source.bootstrap().await?);
        let terms = self.select_terms(&session);
        stats.terms = terms.len() as u64;

        if session.is_empty() || terms.is_empty() {
            tracing::warn!("Session has no token or no terms, nothing to crawl");
            stats.finished_at = Some(Utc::now());
            return Ok(CrawlReport {
                records: Vec::new(),
                stats,
            });
        }

        let max_workers = self.config.crawler.max_concurrent_workers.max(1);
        tracing::info!(
            "Crawling {} term(s) with up to {} concurrent workers",
            terms.len(),
            max_workers
        );

        let semaphore = Arc::new(Semaphore::new(max_workers));
        let (tx, rx) = mpsc::channel::<UnitOutcome>(max_workers);
        let collector = tokio::spawn(collect_outcomes(rx));
        let mut workers = JoinSet::new();

        'terms: for term in terms {
            if self.cancel.is_cancelled() {
                break;
            }

            let subjects = match self.source.list_subjects(&term, &session).await {
                Ok(subjects) => self.select_subjects(subjects),
                Err(e) => {
                    tracing::warn!("Failed to list subjects for {}: {}", term, e);
                    stats.subject_list_failures += 1;
                    continue;
                }
            };
            stats.subjects += subjects.len() as u64;
            tracing::info!("{}: {} subject(s)", term, subjects.len());

            for subject in subjects {
                if self.cancel.is_cancelled() {
                    break 'terms;
                }

                let crns = match self.source.list_crns(&term, &subject, &session).await {
                    Ok(crns) => crns,
                    Err(e) => {
                        tracing::warn!("Failed to list CRNs for {} {}: {}", term.code, subject, e);
                        stats.crn_list_failures += 1;
                        continue;
                    }
                };
                tracing::debug!("{} {}: {} CRN(s)", term.code, subject, crns.len());

                for crn in crns {
                    let permit = tokio::select! {
                        biased;
                        _ = self.cancel.cancelled() => None,
                        permit = Arc::clone(&semaphore).acquire_owned() => permit.ok(),
                    };
                    let Some(permit) = permit else {
                        break 'terms;
                    };

                    stats.units_scheduled += 1;

                    let source = Arc::clone(&self.source);
                    let sink = self.sink.clone();
                    let session = Arc::clone(&session);
                    let term = term.clone();
                    let tx = tx.clone();

                    workers.spawn(async move {
                        let _permit = permit;
                        let outcome =
                            process_unit(source.as_ref(), sink.as_deref(), &term, &crn, &session)
                                .await;
                        // The collector outlives every worker
                        let _ = tx.send(outcome).await;
                    });
                }
            }
        }

        if self.cancel.is_cancelled() {
            tracing::warn!(
                "Crawl cancelled, waiting for {} in-flight worker(s)",
                workers.len()
            );
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Detail worker aborted: {}", e);
                stats.detail_failures += 1;
            }
        }

        drop(tx);
        let (records, detail) = collector.await?;

        stats.records = detail.records;
        stats.skipped_pages = detail.skipped_pages;
        stats.detail_failures += detail.detail_failures;
        stats.submitted = detail.submitted;
        stats.submit_failures = detail.submit_failures;
        stats.auth_failures = detail.auth_failures;
        stats.cancelled = self.cancel.is_cancelled();
        stats.finished_at = Some(Utc::now());

        tracing::info!(
            "Crawl finished: {} record(s), {} skipped, {} failed, {} submitted",
            stats.records,
            stats.skipped_pages,
            stats.detail_failures,
            stats.submitted
        );

        Ok(CrawlReport { records, stats })
    }

    fn select_terms(&self, session: &Session) -> Vec<Term> {
        session
            .terms
            .iter()
            .filter(|t| self.term_filter.is_empty() || self.term_filter.contains(&t.code))
            .cloned()
            .collect()
    }

    fn select_subjects(&self, subjects: Vec<String>) -> Vec<String> {
        if self.subject_filter.is_empty() {
            return subjects;
        }
        subjects
            .into_iter()
            .filter(|s| self.subject_filter.contains(s))
            .collect()
    }
}

/// Fetches one detail page and hands the record to the sink
async fn process_unit(
    source: &dyn CatalogSource,
    sink: Option<&dyn IngestionSink>,
    term: &Term,
    crn: &str,
    session: &Session,
) -> UnitOutcome {
    let record = match source.fetch_details(term, crn, session).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            tracing::debug!("{} {}: not a course details page", term.code, crn);
            return UnitOutcome::Skipped;
        }
        Err(e) => {
            tracing::warn!("Failed to fetch details for {} {}: {}", term.code, crn, e);
            return UnitOutcome::Failed;
        }
    };

    let delivery = match sink {
        Some(sink) => Some(match sink.submit(&record).await {
            Ok(()) => Delivery::Accepted,
            Err(e) if e.is_auth() => {
                tracing::warn!("{} sink refused {}: {}", sink.name(), record.global_id, e);
                Delivery::Unauthorized
            }
            Err(e) => {
                tracing::warn!("{} sink failed for {}: {}", sink.name(), record.global_id, e);
                Delivery::Rejected
            }
        }),
        None => None,
    };

    UnitOutcome::Record { record, delivery }
}

/// Sole owner of the record list while workers are running
async fn collect_outcomes(
    mut rx: mpsc::Receiver<UnitOutcome>,
) -> (Vec<CourseDetailsRecord>, CrawlStatistics) {
    let mut records = Vec::new();
    let mut stats = CrawlStatistics::default();
    let start_time = Instant::now();

    while let Some(outcome) = rx.recv().await {
        match outcome {
            UnitOutcome::Record { record, delivery } => {
                stats.records += 1;
                match delivery {
                    Some(Delivery::Accepted) => stats.submitted += 1,
                    Some(Delivery::Rejected) => stats.submit_failures += 1,
                    Some(Delivery::Unauthorized) => stats.auth_failures += 1,
                    None => {}
                }
                records.push(record);
            }
            UnitOutcome::Skipped => stats.skipped_pages += 1,
            UnitOutcome::Failed => stats.detail_failures += 1,
        }

        let completed = stats.units_completed();
        if completed % PROGRESS_INTERVAL == 0 {
            let rate = completed as f64 / start_time.elapsed().as_secs_f64();
            tracing::info!(
                "Progress: {} units completed, {} records, {:.2} units/sec",
                completed,
                stats.records,
                rate
            );
        }
    }

    (records, stats)
}

/// Loads nothing and crawls everything `config` describes
pub async fn run_crawl(config: Config) -> Result<CrawlReport, HarvestError> {
    Coordinator::new(config)?.run().await
}
