//! Markdown summary generation
//!
//! Renders a human-readable report of one crawl run.

use crate::output::stats::CrawlStatistics;
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary of a run to `output_path`
pub fn generate_markdown_summary(stats: &CrawlStatistics, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(stats);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats run statistics as markdown
pub fn format_markdown_summary(stats: &CrawlStatistics) -> String {
    let mut md = String::new();

    md.push_str("# Catalog Harvest Summary\n\n");

    md.push_str("## Run Information\n\n");
    if let Some(started) = stats.started_at {
        md.push_str(&format!("- **Started**: {}\n", started.to_rfc3339()));
    }
    if let Some(finished) = stats.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = stats.duration_seconds() {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    let status = if stats.cancelled { "cancelled" } else { "completed" };
    md.push_str(&format!("- **Status**: {}\n\n", status));

    md.push_str("## Enumeration\n\n");
    md.push_str(&format!("- **Terms**: {}\n", stats.terms));
    md.push_str(&format!("- **Subjects**: {}\n", stats.subjects));
    md.push_str(&format!("- **Detail Fetches Scheduled**: {}\n\n", stats.units_scheduled));

    md.push_str("## Outcomes\n\n");
    md.push_str("| Stage | Outcome | Count |\n");
    md.push_str("|-------|---------|-------|\n");
    md.push_str(&format!(
        "| Subject list | Failed | {} |\n",
        stats.subject_list_failures
    ));
    md.push_str(&format!("| CRN list | Failed | {} |\n", stats.crn_list_failures));
    md.push_str(&format!("| Detail | Record | {} |\n", stats.records));
    md.push_str(&format!("| Detail | Skipped | {} |\n", stats.skipped_pages));
    md.push_str(&format!("| Detail | Failed | {} |\n", stats.detail_failures));
    md.push_str(&format!("| Submit | Accepted | {} |\n", stats.submitted));
    md.push_str(&format!("| Submit | Rejected | {} |\n", stats.submit_failures));
    md.push_str(&format!("| Submit | Unauthorized | {} |\n\n", stats.auth_failures));

    md.push_str(&format!("**Total Failures**: {}\n", stats.total_failures()));

    md
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_markdown_summary() {
        let stats = CrawlStatistics {
            terms: 2,
            subjects: 40,
            units_scheduled: 120,
            records: 118,
            detail_failures: 2,
            submitted: 117,
            auth_failures: 1,
            ..Default::default()
        };

        let md = format_markdown_summary(&stats);
        assert!(md.contains("# Catalog Harvest Summary"));
        assert!(md.contains("- **Terms**: 2"));
        assert!(md.contains("| Detail | Record | 118 |"));
        assert!(md.contains("| Submit | Unauthorized | 1 |"));
        assert!(md.contains("**Total Failures**: 3"));
        assert!(md.contains("- **Status**: completed"));
    }

    #[test]
    fn test_generate_markdown_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");
        let stats = CrawlStatistics {
            cancelled: true,
            ..Default::default()
        };

        generate_markdown_summary(&stats, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("- **Status**: cancelled"));
    }
}
