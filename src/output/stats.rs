//! Run accounting
//!
//! A single collector owns the [`CrawlStatistics`] of a run; workers report
//! outcomes to it instead of touching shared counters.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrawlStatistics {
    /// Terms offered by the session (after filtering)
    pub terms: u64,

    /// Subjects enumerated across all terms
    pub subjects: u64,

    /// Terms whose subject listing failed
    pub subject_list_failures: u64,

    /// (term, subject) pairs whose CRN search failed
    pub crn_list_failures: u64,

    /// Detail fetches dispatched to the worker pool
    pub units_scheduled: u64,

    /// Records produced
    pub records: u64,

    /// Detail pages that were not course details pages
    pub skipped_pages: u64,

    /// Detail fetches that failed
    pub detail_failures: u64,

    /// Records accepted by the sink
    pub submitted: u64,

    /// Records the sink rejected or could not be reached for
    pub submit_failures: u64,

    /// Records rejected because of the worker key
    pub auth_failures: u64,

    /// Whether the run was cancelled before all work was dispatched
    pub cancelled: bool,

    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlStatistics {
    /// Units that reached a terminal state
    pub fn units_completed(&self) -> u64 {
        self.records + self.skipped_pages + self.detail_failures
    }

    /// Failures at every stage, auth failures included
    pub fn total_failures(&self) -> u64 {
        self.subject_list_failures
            + self.crn_list_failures
            + self.detail_failures
            + self.submit_failures
            + self.auth_failures
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        match (self.started_at, self.finished_at) {
            (Some(started), Some(finished)) => Some((finished - started).num_seconds()),
            _ => None,
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Enumeration:");
    println!("  Terms: {}", stats.terms);
    println!("  Subjects: {}", stats.subjects);
    println!("  Subject list failures: {}", stats.subject_list_failures);
    println!("  CRN list failures: {}", stats.crn_list_failures);
    println!();

    println!("Detail fetches:");
    println!("  Scheduled: {}", stats.units_scheduled);
    println!("  Records: {}", stats.records);
    println!("  Skipped pages: {}", stats.skipped_pages);
    println!("  Failures: {}", stats.detail_failures);
    println!();

    println!("Submission:");
    println!("  Submitted: {}", stats.submitted);
    println!("  Rejected: {}", stats.submit_failures);
    println!("  Unauthorized: {}", stats.auth_failures);
    println!();

    if let Some(duration) = stats.duration_seconds() {
        println!("Duration: {} seconds", duration);
    }

    if stats.cancelled {
        println!(
            "Run was cancelled: {} of {} scheduled units completed",
            stats.units_completed(),
            stats.units_scheduled
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_totals() {
        let stats = CrawlStatistics {
            subject_list_failures: 1,
            crn_list_failures: 2,
            records: 10,
            skipped_pages: 3,
            detail_failures: 4,
            submit_failures: 5,
            auth_failures: 6,
            ..Default::default()
        };

        assert_eq!(stats.units_completed(), 17);
        assert_eq!(stats.total_failures(), 18);
    }

    #[test]
    fn test_duration() {
        let started = Utc::now();
        let stats = CrawlStatistics {
            started_at: Some(started),
            finished_at: Some(started + Duration::seconds(90)),
            ..Default::default()
        };
        assert_eq!(stats.duration_seconds(), Some(90));
        assert_eq!(CrawlStatistics::default().duration_seconds(), None);
    }
}
