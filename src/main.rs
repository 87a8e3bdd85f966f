//! solr2cdr main entry point
//!
//! This is the command-line interface for dumping a Solr crawl index as CDR documents.

use anyhow::Context;
use clap::Parser;
use solr2cdr::config::{load_config_with_hash, validate, Config};
use solr2cdr::dump::run_dump;
use solr2cdr::output::print_statistics;
use solr2cdr::transform::TransformConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// solr2cdr: copies an EDR (Solr) index into a CDR dump file
///
/// Pages through a Solr query, remaps every document into the CDR layout
/// and writes one JSON document per line, ready for bulk loading.
#[derive(Parser, Debug)]
#[command(name = "solr2cdr")]
#[command(version)]
#[command(about = "Dumps a Solr crawl index as CDR documents", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: PathBuf,

    /// Write to this file instead of the configured dump filename
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Stop after this many documents
    #[arg(long)]
    limit: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be dumped without querying
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(output) = &cli.output {
        config.dump.filename = output.display().to_string();
    }
    if let Some(limit) = cli.limit {
        config.solr.limit = Some(limit);
    }
    validate(&config).context("Invalid command-line override")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let stats = match run_dump(config).await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("Dump failed: {}", e);
            return Err(e).context("Dump failed");
        }
    };

    if !cli.quiet {
        print_statistics(&stats);
    }
    println!("Total docs imported={}", stats.documents);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("solr2cdr=info,warn"),
            1 => EnvFilter::new("solr2cdr=debug,info"),
            2 => EnvFilter::new("solr2cdr=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    let transform = TransformConfig::from_overrides(&config.transform);

    println!("=== solr2cdr Dry Run ===\n");

    println!("Source:");
    println!("  Solr URL: {}", redact_credentials(&config.solr.url));
    println!("  Query: {}", config.solr.query);
    println!("  Field list: {}", config.solr.fl.as_deref().unwrap_or("(all)"));
    println!("  Start: {}", config.solr.start);
    println!("  Rows per page: {}", config.solr.rows);
    match config.solr.limit {
        Some(limit) => println!("  Limit: {}", limit),
        None => println!("  Limit: none"),
    }

    println!("\nOutput:");
    println!("  Dump file: {}", config.dump.filename);
    println!("  Progress every: {}ms", config.import.log_delay);

    println!("\nTransform:");
    for (from, to) in &transform.mapping {
        println!("  {} -> {}", from, to);
    }
    println!("  Metadata pattern: {}", transform.metadata_pattern);
    println!(
        "  Stored URL: {} -> {}",
        transform.dump_path_prefix, transform.mount_point_prefix
    );
    if !transform.removals.is_empty() {
        let removals: Vec<&str> = transform.removals.iter().map(String::as_str).collect();
        println!("  Removals: {}", removals.join(", "));
    }
    for (field, value) in &transform.additions {
        println!("  + {} = {}", field, value);
    }

    println!("\n✓ Configuration is valid");
}

/// Hides the password of a `user:pass@host` URL
fn redact_credentials(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) if parsed.password().is_some() => {
            let _ = parsed.set_password(Some("***"));
            parsed.to_string()
        }
        _ => raw.to_string(),
    }
}
