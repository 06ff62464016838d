//! Bizreg main entry point
//!
//! This is the command-line interface for the bizreg registry crawler.

use anyhow::Context;
use bizreg::config::{load_config_with_hash, validate, Config, RecordLimit};
use bizreg::crawler::Crawler;
use bizreg::output::{
    format_detail, format_listing, generate_markdown_summary, load_all_businesses, load_business,
    load_statistics, print_statistics,
};
use bizreg::storage::{SqliteStorage, Storage};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Bizreg: a sequential business-registry crawler
///
/// Bizreg starts at one registry detail page, follows its "Next On List"
/// links one page at a time, and stores each business with its filing
/// details and annual reports in a normalized SQLite database.
#[derive(Parser, Debug)]
#[command(name = "bizreg")]
#[command(version)]
#[command(about = "A sequential business-registry crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// First detail page to visit (overrides the config file)
    #[arg(long, value_name = "URL")]
    start_url: Option<String>,

    /// Number of records to store, or ALL / -1 for no limit
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    limit: Option<String>,

    /// SQLite database path (overrides the config file)
    #[arg(long, value_name = "PATH")]
    database: Option<String>,

    /// Delay after each fetch in milliseconds (overrides the config file)
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["report", "show", "export_summary"])]
    dry_run: bool,

    /// List stored businesses with table statistics and exit
    #[arg(long, conflicts_with_all = ["dry_run", "show", "export_summary"])]
    report: bool,

    /// Show one stored business with its filing details and annual reports
    #[arg(long, value_name = "ID", conflicts_with_all = ["dry_run", "report", "export_summary"])]
    show: Option<i64>,

    /// Generate markdown summary from existing data and exit
    #[arg(long, conflicts_with_all = ["dry_run", "report", "show"])]
    export_summary: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if cli.dry_run {
        validate(&config).context("Invalid configuration")?;
        handle_dry_run(&config);
    } else if cli.report {
        handle_report(&config)?;
    } else if let Some(id) = cli.show {
        handle_show(&config, id)?;
    } else if cli.export_summary {
        handle_export_summary(&config)?;
    } else {
        validate(&config).context("Invalid configuration")?;
        return handle_crawl(config).await;
    }

    Ok(ExitCode::SUCCESS)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bizreg=info,warn"),
            1 => EnvFilter::new("bizreg=debug,info"),
            2 => EnvFilter::new("bizreg=trace,debug"),
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

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::with_start_url(""),
    };

    if let Some(url) = &cli.start_url {
        config.crawler.start_url = url.clone();
    }
    if let Some(limit) = &cli.limit {
        config.crawler.record_limit = RecordLimit::parse_input(limit);
    }
    if let Some(database) = &cli.database {
        config.output.database_path = database.clone();
    }
    if let Some(delay) = cli.delay_ms {
        config.crawler.request_delay = delay;
    }

    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Bizreg Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  Record limit: {}", config.crawler.record_limit);
    println!("  Request delay: {}ms", config.crawler.request_delay);
    println!("  Base origin: {}", config.crawler.base_origin);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Summary: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");
}

fn open_existing(config: &Config) -> anyhow::Result<SqliteStorage> {
    let path = Path::new(&config.output.database_path);
    if !path.exists() {
        anyhow::bail!(
            "Database '{}' not found. Run a crawl first to generate the data.",
            path.display()
        );
    }
    SqliteStorage::new(path)
        .with_context(|| format!("Failed to open database {}", path.display()))
}

/// Handles the --report mode: lists every business and the table counts
fn handle_report(config: &Config) -> anyhow::Result<()> {
    let storage = open_existing(config)?;

    let businesses = storage.list_businesses()?;
    print!("{}", format_listing(&businesses));
    println!();

    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --show mode: prints one business with its child tables
fn handle_show(config: &Config, business_id: i64) -> anyhow::Result<()> {
    let storage = open_existing(config)?;
    let summary = load_business(&storage, business_id)?;
    print!("{}", format_detail(&summary));
    Ok(())
}

/// Handles the --export-summary mode: generates markdown summary
fn handle_export_summary(config: &Config) -> anyhow::Result<()> {
    println!("=== Exporting Registry Summary ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", config.output.summary_path);
    println!();

    let storage = open_existing(config)?;

    tracing::info!("Loading businesses from database...");
    let summaries = load_all_businesses(&storage)?;
    let stats = load_statistics(&storage)?;

    generate_markdown_summary(&summaries, &stats, Path::new(&config.output.summary_path))?;

    println!("✓ Summary exported to: {}", config.output.summary_path);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<ExitCode> {
    let database_path = config.output.database_path.clone();

    let crawler = Crawler::new(config).context("Failed to set up crawler")?;
    let outcome = crawler.run().await;

    tracing::info!("Crawl took {} seconds", outcome.duration_seconds());

    if outcome.is_success() {
        println!(
            "Successfully scraped {} records and saved to {}",
            outcome.records_saved, database_path
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "Crawl stopped: {}. {} records were saved to {} before the failure.",
            outcome.stop_reason, outcome.records_saved, database_path
        );
        Ok(ExitCode::FAILURE)
    }
}
