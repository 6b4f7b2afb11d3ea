//! Lexicon-Harvest main entry point
//!
//! This is the command-line interface for the Lexicon-Harvest dictionary
//! headword harvester.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use lexicon_harvest::config::{load_config, Config, Dictionary, Overrides};
use lexicon_harvest::crawler::run_crawl;
use lexicon_harvest::index::PageRequest;
use lexicon_harvest::output::print_report;
use lexicon_harvest::{ConfigError, HarvestError};
use std::fmt::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Lexicon-Harvest: download every headword of an online dictionary
///
/// Walks the dictionary's browse index key by key (a-z, then 0), page by
/// page, and writes one headword per line to the output file.
#[derive(Parser, Debug)]
#[command(name = "lexicon-harvest")]
#[command(version)]
#[command(about = "Download all words from an online dictionary", long_about = None)]
struct Cli {
    /// Dictionary to download
    #[arg(short, long, value_enum, value_name = "DICTIONARY")]
    dictionary: Option<DictionaryArg>,

    /// Path to the output file [default: dictionary/<DICTIONARY>_word_list.tsv]
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<PathBuf>,

    /// Delay after each index key in seconds [default: 1]
    #[arg(short, long, value_name = "DELAY_S")]
    wait: Option<u64>,

    /// Verbosity of the logger
    #[arg(short, long, value_enum, ignore_case = true, default_value = "INFO")]
    verbosity: Verbosity,

    /// Suppress non-error output
    #[arg(short, long)]
    quiet: bool,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Index keys to crawl, in order (e.g. "abc0")
    #[arg(long, value_name = "KEYS")]
    keys: Option<String>,

    /// Override the site root requests are built from
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Validate the configuration and show what would be crawled, without crawling
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DictionaryArg {
    /// The medical dictionary
    Medical,
    /// The standard dictionary
    Dictionary,
}

impl From<DictionaryArg> for Dictionary {
    fn from(arg: DictionaryArg) -> Self {
        match arg {
            DictionaryArg::Medical => Dictionary::Medical,
            DictionaryArg::Dictionary => Dictionary::Dictionary,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Verbosity {
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARN")]
    Warn,
    #[value(name = "DEBUG")]
    Debug,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbosity, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbosity: Verbosity, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbosity {
            Verbosity::Warn => EnvFilter::new("warn"),
            Verbosity::Info => EnvFilter::new("lexicon_harvest=info,warn"),
            Verbosity::Debug => EnvFilter::new("lexicon_harvest=debug,info"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Maps fatal errors to process exit codes
///
/// 2: configuration, 3: output destination, 1: anything else.
fn exit_code_for(error: &anyhow::Error) -> u8 {
    if error.downcast_ref::<ConfigError>().is_some() {
        return 2;
    }
    match error.downcast_ref::<HarvestError>() {
        Some(HarvestError::Config(_)) => 2,
        Some(HarvestError::Output { .. }) => 3,
        _ => 1,
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let overrides = Overrides {
        dictionary: cli.dictionary.map(Dictionary::from),
        output: cli.output,
        min_delay_secs: cli.wait,
        base_url: cli.base_url,
        keys: cli.keys,
    };

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config = load_config(cli.config.as_deref(), overrides)?;
    if let Some(hash) = &config.config_hash {
        tracing::info!("Configuration loaded successfully (hash: {})", hash);
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let outcome = run_crawl(config, cancel)
        .await
        .context("Crawl aborted")?;

    if !cli.quiet {
        print_report(&outcome.report);
    }

    Ok(())
}

/// First Ctrl+C stops the crawl after the current page and flushes output.
/// A second Ctrl+C exits immediately.
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, stopping after the current page (press again to force quit)");
            cancel.cancel();

            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nForce quit requested, exiting immediately...");
                std::process::exit(130);
            }
        }
    });
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    print!("{}", dry_run_summary(config));
}

fn dry_run_summary(config: &Config) -> String {
    let mut out = String::from("=== Lexicon-Harvest Dry Run ===\n\n");

    // Writing into a String cannot fail
    let _ = write_dry_run(&mut out, config);
    out
}

fn write_dry_run(out: &mut String, config: &Config) -> fmt::Result {
    writeln!(out, "Dictionary: {}", config.dictionary)?;
    writeln!(out, "Output: {}", config.output.path.display())?;

    writeln!(out, "\nCrawler Configuration:")?;
    writeln!(out, "  Base URL: {}", config.crawler.base_url)?;
    writeln!(out, "  Delay after each key: {}s", config.crawler.min_delay_secs)?;
    writeln!(out, "  Request timeout: {}s", config.crawler.request_timeout_secs)?;
    writeln!(out, "  Connect timeout: {}s", config.crawler.connect_timeout_secs)?;

    writeln!(out, "\nUser Agent: {}", config.user_agent.header_value())?;

    writeln!(out, "\nSelectors:")?;
    writeln!(out, "  Counter: {}", config.selectors.counter)?;
    writeln!(out, "  Entry group: {}", config.selectors.entry_group)?;
    writeln!(out, "  Entry link: {}", config.selectors.entry_link)?;

    let keys: String = config.keys.iter().map(|k| k.as_char()).collect();
    writeln!(out, "\nKeys ({}): {}", config.keys.len(), keys)?;

    if let Some(first) = config.keys.first() {
        let example = PageRequest::new(config.namespace(), *first, 1);
        writeln!(out, "  First request: {}", example.url(&config.crawler.base_url))?;
    }

    writeln!(out, "\n✓ Configuration is valid")
}
