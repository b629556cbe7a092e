//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use vendormetrics_core::pipeline::{self, ProgressReporter};
use vendormetrics_core::summary::SUMMARY_TABLE;
use vendormetrics_shared::{AppConfig, config_file_path, init_config};
use vendormetrics_storage::Store;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// VendorMetrics — vendor sales summaries from inventory exports.
#[derive(Parser)]
#[command(
    name = "vendormetrics",
    version,
    about = "Load inventory exports and build the vendor sales summary table.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Path to the SQLite database (overrides config).
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Load every delimited file in the data directory into the store.
    Ingest {
        /// Directory of delimited source files (defaults to config).
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Build the vendor sales summary from previously loaded tables.
    Summarize,

    /// Run the full pipeline: ingest, then summarize.
    Run {
        /// Directory of delimited source files (defaults to config).
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// The run log is an append-only file at the configured path; console
/// output stays reserved for progress and summaries.
pub(crate) fn init_tracing(cli: &Cli, config: &AppConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let log_path = Path::new(&config.defaults.log_file);
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let log_file = Arc::new(
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?,
    );

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(log_file)
                .init();
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.defaults.database));

    let result = match cli.command {
        Command::Ingest { data_dir } => {
            let data_dir = resolve_data_dir(data_dir, &config);
            cmd_ingest(&db_path, &data_dir, &config).await
        }
        Command::Summarize => cmd_summarize(&db_path, &config).await,
        Command::Run { data_dir } => {
            let data_dir = resolve_data_dir(data_dir, &config);
            cmd_run(&db_path, &data_dir, &config).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    };

    // The store handle is dropped by the handler on both paths; the log
    // still records why a run died before the process exits.
    if let Err(e) = &result {
        tracing::error!(error = %e, "run failed");
    }

    result
}

fn resolve_data_dir(flag: Option<PathBuf>, config: &AppConfig) -> PathBuf {
    flag.unwrap_or_else(|| PathBuf::from(&config.defaults.data_dir))
}

/// Open the store with the configured chunk size.
async fn open_store(db_path: &Path, config: &AppConfig) -> Result<Store> {
    let store = Store::open(db_path)
        .await?
        .with_chunk_size(config.defaults.chunk_size);
    info!(db = %db_path.display(), "database connection established");
    Ok(store)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_ingest(db_path: &Path, data_dir: &Path, config: &AppConfig) -> Result<()> {
    info!(data_dir = %data_dir.display(), "starting raw load");

    let store = open_store(db_path, config).await?;
    let reporter = CliProgress::new();
    let report = pipeline::run_ingest(&store, data_dir, &reporter).await?;
    reporter.finish();

    println!();
    println!("  Raw load complete!");
    println!("  Ingested: {} files", report.files_ingested);
    println!("  Failed:   {} files", report.files_failed);
    println!("  Time:     {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_summarize(db_path: &Path, config: &AppConfig) -> Result<()> {
    info!("starting vendor summary build");

    let store = open_store(db_path, config).await?;
    let reporter = CliProgress::new();
    let report = pipeline::run_summary(&store, &reporter).await?;
    reporter.finish();

    println!();
    println!("  Vendor summary written!");
    println!("  Table: {SUMMARY_TABLE}");
    println!("  Rows:  {}", report.rows);
    println!("  Time:  {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_run(db_path: &Path, data_dir: &Path, config: &AppConfig) -> Result<()> {
    info!(data_dir = %data_dir.display(), "starting full pipeline");

    let store = open_store(db_path, config).await?;
    let reporter = CliProgress::new();
    let report = pipeline::run_full(&store, data_dir, &reporter).await?;
    reporter.finish();

    println!();
    println!("  Pipeline complete!");
    println!("  Ingested: {} files ({} failed)", report.ingest.files_ingested, report.ingest.files_failed);
    println!("  Summary:  {} rows in {SUMMARY_TABLE}", report.summary.rows);
    println!("  Time:     {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("wrote default config to {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    println!("# {}", config_file_path()?.display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .expect("valid template")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }
}
