//! Leadtrawl main entry point
//!
//! This is the command-line interface for the leadtrawl contact-email
//! discovery crawler.

use anyhow::Context;
use clap::Parser;
use leadtrawl::config::{load_config, Config};
use leadtrawl::crawler::{run_session, Fetcher, HttpFetcher};
use leadtrawl::leads::LeadClient;
use leadtrawl::sink::{FileSink, Sink, SinkStream};
use leadtrawl::url::ensure_scheme;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Leadtrawl: a contact-email discovery crawler
///
/// Leadtrawl crawls each target website breadth-first, within page and
/// email budgets, and appends every discovered contact address to the
/// results file. Targets come from the command line, the config file, or
/// the configured lead-source pipeline, in that order of preference.
#[derive(Parser, Debug)]
#[command(name = "leadtrawl")]
#[command(version)]
#[command(about = "Discover contact emails by crawling websites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Crawl this URL instead of configured targets (repeatable)
    #[arg(long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&config, &cli.urls);
        return Ok(());
    }

    handle_trawl(config, cli.urls).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("leadtrawl=info,warn"),
            1 => EnvFilter::new("leadtrawl=debug,info"),
            2 => EnvFilter::new("leadtrawl=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the plan
fn handle_dry_run(config: &Config, cli_urls: &[String]) {
    println!("=== Leadtrawl Dry Run ===\n");

    println!("Session:");
    println!("  Concurrency: {}", config.session.concurrency);
    println!("  Chunk size: {}", config.session.chunk_size);
    println!("  Max pages: {}", config.session.max_pages);
    println!("  Max emails: {}", config.session.max_emails);
    println!("  Fetch timeout: {}s", config.session.fetch_timeout_secs);

    println!("\nOutput:");
    println!("  Log: {}", config.output.log_path);
    println!("  Results: {}", config.output.results_path);

    if !cli_urls.is_empty() {
        println!("\nTargets (command line, {}):", cli_urls.len());
        for target in cli_urls {
            println!("  - {}", ensure_scheme(target));
        }
    } else if !config.targets.is_empty() {
        println!("\nTargets (config, {}):", config.targets.len());
        for target in &config.targets {
            println!("  - {}", ensure_scheme(target));
        }
    } else if let Some(leads) = &config.leads {
        println!("\nTargets: from lead source at {}", leads.api_base);
        println!("  Companies: {}", leads.company_count);
        println!("  Sector: {}", leads.sector);
    } else {
        println!("\nTargets: none configured");
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main trawl operation: resolve targets, crawl each one
async fn handle_trawl(config: Config, cli_urls: Vec<String>) -> anyhow::Result<()> {
    let targets = resolve_targets(&config, cli_urls).await?;
    if targets.is_empty() {
        anyhow::bail!("no target websites: pass --url, set `targets`, or configure [leads]");
    }
    tracing::info!("Crawling {} target website(s)", targets.len());

    let sink: Arc<dyn Sink> = Arc::new(FileSink::open(
        Path::new(&config.output.log_path),
        Path::new(&config.output.results_path),
    )?);
    let fetcher: Arc<dyn Fetcher> =
        Arc::new(HttpFetcher::new(&config.fetcher, config.session.fetch_timeout())?);

    for target in targets {
        let with_scheme = ensure_scheme(&target);
        let start_url = match Url::parse(&with_scheme) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Skipping unparseable target '{}': {}", target, e);
                continue;
            }
        };

        // Header line on both streams, the results grouped per website.
        let header = format!("Website: {}", start_url);
        sink.append_line(SinkStream::Log, &header)?;
        sink.append_line(SinkStream::Results, &header)?;

        let report = run_session(
            &start_url,
            &config.session,
            Arc::clone(&fetcher),
            Arc::clone(&sink),
        )
        .await;

        for email in &report.emails {
            sink.append_line(SinkStream::Results, email)?;
        }
        sink.append_line(SinkStream::Results, "")?;

        tracing::info!(
            "{}: {} emails on {} pages ({:?})",
            start_url,
            report.emails.len(),
            report.pages_dispatched,
            report.outcome
        );
    }

    Ok(())
}

/// Resolves the list of target websites for this run
///
/// Priority: explicit --url flags, then the config's `targets` list, then
/// a lead-source run. An empty list falls through to the caller.
async fn resolve_targets(config: &Config, cli_urls: Vec<String>) -> anyhow::Result<Vec<String>> {
    if !cli_urls.is_empty() {
        return Ok(cli_urls);
    }

    if !config.targets.is_empty() {
        return Ok(config.targets.clone());
    }

    if let Some(leads_config) = &config.leads {
        tracing::info!("Fetching target websites from lead source");
        let client = LeadClient::new(leads_config.clone())?;
        let urls = client
            .fetch_lead_urls()
            .await
            .context("lead source did not produce target URLs")?;
        return Ok(urls);
    }

    Ok(Vec::new())
}
