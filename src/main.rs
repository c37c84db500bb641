//! Catalog Harvester main entry point
//!
//! This is the command-line interface for the course catalog harvester.

use catalog_harvester::config::{load_config_with_hash, Config, SinkKind};
use catalog_harvester::output::{generate_markdown_summary, print_statistics, write_records_json};
use catalog_harvester::Coordinator;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Catalog Harvester: a course catalog crawler
///
/// Enumerates every term, subject and CRN offered by the registration site,
/// fetches each course detail page with a bounded worker pool and submits
/// the normalized records to the configured sink.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvester")]
#[command(version = "1.0.0")]
#[command(about = "A course catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with_all = ["list_terms", "crn"])]
    dry_run: bool,

    /// Bootstrap a session, print the available terms and exit
    #[arg(long, conflicts_with_all = ["dry_run", "crn"])]
    list_terms: bool,

    /// Only crawl this term code (repeatable)
    #[arg(long = "term", value_name = "CODE")]
    terms: Vec<String>,

    /// Only crawl this subject code (repeatable)
    #[arg(long = "subject", value_name = "CODE")]
    subjects: Vec<String>,

    /// Fetch a single CRN of the one given --term and print it as JSON
    #[arg(long, value_name = "CRN")]
    crn: Option<String>,

    /// Write every record to this JSON file (overrides output.records-path)
    #[arg(long, value_name = "PATH")]
    records: Option<PathBuf>,

    /// Do not submit records to the configured sink
    #[arg(long)]
    no_submit: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &config_hash, &cli);
    } else if cli.list_terms {
        handle_list_terms(config).await?;
    } else if let Some(crn) = &cli.crn {
        handle_single_crn(config, &cli.terms, crn).await?;
    } else {
        handle_crawl(config, cli).await?;
    }

    Ok(())
}

/// Sets up logging based on verbosity flags
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_harvester=info,warn"),
            1 => EnvFilter::new("catalog_harvester=debug,info"),
            2 => EnvFilter::new("catalog_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config, config_hash: &str, cli: &Cli) {
    println!("=== Catalog Harvester Dry Run ===\n");

    println!("Source:");
    println!("  Base URL: {}", config.source.base_url);
    println!("  wsea_code: {}", config.source.wsea_code);
    println!();

    println!("Crawler:");
    println!(
        "  Max concurrent workers: {}",
        config.crawler.max_concurrent_workers
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout_secs);
    println!();

    println!("User agent:");
    println!("  {}", catalog_harvester::crawler::user_agent_string(&config.user_agent));
    println!();

    println!("Sink:");
    match (&config.sink.kind, cli.no_submit) {
        (_, true) => println!("  disabled (--no-submit)"),
        (SinkKind::None, _) => println!("  none"),
        (SinkKind::Http, _) => println!(
            "  http -> {}",
            config.sink.endpoint.as_deref().unwrap_or_default()
        ),
        (SinkKind::Sqlite, _) => println!(
            "  sqlite -> {}",
            config.sink.database_path.as_deref().unwrap_or_default()
        ),
    }
    println!();

    if !cli.terms.is_empty() {
        println!("Terms: {}", cli.terms.join(", "));
    }
    if !cli.subjects.is_empty() {
        println!("Subjects: {}", cli.subjects.join(", "));
    }

    println!("Config hash: {}", config_hash);
    println!("\nConfiguration is valid.");
}

/// Handles the --list-terms mode
async fn handle_list_terms(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = Coordinator::new(without_sink(config))?;
    let session = coordinator.bootstrap().await?;

    if session.terms.is_empty() {
        println!("No terms offered.");
    }
    for term in &session.terms {
        println!("{}\t{}", term.code, term.display_name);
    }

    Ok(())
}

/// Handles the --crn mode: fetches one detail page and prints its record
async fn handle_single_crn(
    config: Config,
    terms: &[String],
    crn: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let term = match terms {
        [term] => term,
        _ => return Err("--crn needs exactly one --term".into()),
    };

    let coordinator = Coordinator::new(without_sink(config))?;
    match coordinator.fetch_one(term, crn).await? {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        None => println!("{} {} is not a course details page.", term, crn),
    }

    Ok(())
}

/// Runs a full crawl and writes the configured outputs
async fn handle_crawl(config: Config, cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let records_path = cli
        .records
        .or_else(|| config.output.records_path.as_ref().map(PathBuf::from));
    let summary_path = config.output.summary_path.clone();

    let config = if cli.no_submit {
        without_sink(config)
    } else {
        config
    };
    let coordinator = Coordinator::new(config)?
        .with_term_filter(cli.terms)
        .with_subject_filter(cli.subjects);

    let cancel = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight work");
            cancel.cancel();
        }
    });

    let report = coordinator.run().await?;

    if let Some(path) = records_path {
        write_records_json(&report.records, &path)?;
        tracing::info!(
            "Wrote {} record(s) to {}",
            report.records.len(),
            path.display()
        );
    }

    if let Some(path) = summary_path {
        generate_markdown_summary(&report.stats, Path::new(&path))?;
        tracing::info!("Wrote summary to {}", path);
    }

    println!();
    print_statistics(&report.stats);

    Ok(())
}

/// Modes that never submit should not open the sink either
fn without_sink(mut config: Config) -> Config {
    config.sink.kind = SinkKind::None;
    config
}
