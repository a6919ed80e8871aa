//! SeasonLab CLI — monthly analysis of daily stock prices.
//!
//! Commands:
//! - `analyze` — resample, decompose and summarize one ticker
//! - `batch` — analyze several tickers in parallel over the same snapshot
//! - `tickers` — list tickers in a source with row counts and date span
//! - `sample` — write a synthetic price file
//! - `config init` — write the default TOML configuration

mod render;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use seasonlab_core::config::SeasonLabConfig;
use seasonlab_core::data::{write_sample, Loader, PriceSource, SampleSpec};
use seasonlab_core::export::{export_json, export_monthly_csv, render_markdown, save_report};
use seasonlab_core::pipeline::{run_analysis, run_batch, AnalysisRequest, DateRange};

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "seasonlab.toml";

#[derive(Parser)]
#[command(
    name = "seasonlab",
    version,
    about = "SeasonLab CLI — monthly resampling, seasonal decomposition and rolling statistics"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by commands that read a price source.
#[derive(clap::Args)]
struct SourceArgs {
    /// Price file (CSV with Ticker, Date, Close). Defaults to `source.path` from the config.
    #[arg(long)]
    source: Option<PathBuf>,

    /// TOML config file. Defaults to ./seasonlab.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one ticker over a date range.
    Analyze {
        /// Ticker to analyze. Defaults to `defaults.ticker` from the config.
        #[arg(long)]
        ticker: Option<String>,

        /// Start date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        start: Option<NaiveDate>,

        /// End date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Rolling window in months. Overrides `analysis.window`.
        #[arg(long)]
        window: Option<usize>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write output to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Analyze several tickers in parallel.
    Batch {
        /// Tickers to analyze. Defaults to `tickers` from the config.
        #[arg(long, num_args = 1..)]
        tickers: Vec<String>,

        #[arg(long)]
        start: Option<NaiveDate>,

        #[arg(long)]
        end: Option<NaiveDate>,

        /// Save report.json and monthly.csv per ticker under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// List tickers in a source.
    Tickers {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Write a deterministic synthetic price file.
    Sample {
        #[arg(long)]
        output: PathBuf,

        /// Tickers to generate. Defaults to `tickers` from the config.
        #[arg(long, num_args = 1..)]
        tickers: Vec<String>,

        #[arg(long)]
        start: Option<NaiveDate>,

        #[arg(long)]
        end: Option<NaiveDate>,

        /// Fraction of rows with a blank Close cell.
        #[arg(long, default_value_t = 0.02)]
        missing: f64,
    },
    /// Configuration file commands.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default configuration as TOML.
    Init {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            ticker,
            start,
            end,
            window,
            format,
            output,
            source,
        } => run_analyze_cmd(ticker, start, end, window, format, output, &source),
        Commands::Batch {
            tickers,
            start,
            end,
            output_dir,
            source,
        } => run_batch_cmd(tickers, start, end, output_dir, &source),
        Commands::Tickers { source } => run_tickers_cmd(&source),
        Commands::Sample {
            output,
            tickers,
            start,
            end,
            missing,
        } => run_sample_cmd(&output, tickers, start, end, missing),
        Commands::Config { action } => match action {
            ConfigAction::Init { output, force } => run_config_init(&output, force),
        },
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load_config(path: Option<&Path>) -> Result<SeasonLabConfig> {
    match path {
        Some(path) => SeasonLabConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            debug!(path = DEFAULT_CONFIG_FILE, "using config from working directory");
            SeasonLabConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))
                .with_context(|| format!("failed to load config {DEFAULT_CONFIG_FILE}"))
        }
        None => Ok(SeasonLabConfig::default()),
    }
}

fn load_source(args: &SourceArgs, config: &SeasonLabConfig) -> Result<PriceSource> {
    let path = args.source.as_deref().unwrap_or(&config.source.path);
    info!(path = %path.display(), "reading price source");
    PriceSource::from_path(path)
        .with_context(|| format!("failed to read price source {}", path.display()))
}

fn run_analyze_cmd(
    ticker: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    window: Option<usize>,
    format: OutputFormat,
    output: Option<PathBuf>,
    source_args: &SourceArgs,
) -> Result<()> {
    let mut config = load_config(source_args.config.as_deref())?;
    if let Some(window) = window {
        config.analysis.window = window;
        config.validate().context("invalid --window")?;
    }

    let ticker = ticker.unwrap_or_else(|| config.defaults.ticker.clone());
    let request = AnalysisRequest::new(
        ticker,
        start.unwrap_or(config.defaults.start),
        end.unwrap_or(config.defaults.end),
    )?;

    let source = load_source(source_args, &config)?;
    let report = run_analysis(&source, &request, &config.analysis)
        .with_context(|| format!("analysis of {} failed", request.ticker))?;

    let rendered = match format {
        OutputFormat::Text => render::report(&report),
        OutputFormat::Json => export_json(&report)?,
        OutputFormat::Csv => export_monthly_csv(&report)?,
        OutputFormat::Markdown => render_markdown(&report),
    };

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Report written to: {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn run_batch_cmd(
    tickers: Vec<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    output_dir: Option<PathBuf>,
    source_args: &SourceArgs,
) -> Result<()> {
    let config = load_config(source_args.config.as_deref())?;
    let tickers = if tickers.is_empty() {
        config.tickers.clone()
    } else {
        tickers
    };
    if tickers.is_empty() {
        bail!("no tickers given and none configured");
    }

    let range = DateRange::new(
        start.unwrap_or(config.defaults.start),
        end.unwrap_or(config.defaults.end),
    )?;

    let source = load_source(source_args, &config)?;
    let entries = run_batch(&source, &tickers, range, &config.analysis)?;

    print!("{}", render::batch(&entries));

    if let Some(dir) = &output_dir {
        for report in entries.iter().filter_map(|e| e.result.as_ref().ok()) {
            let run_dir = save_report(report, dir)?;
            println!("Saved: {}", run_dir.display());
        }
    }

    let failed = entries.iter().filter(|e| e.result.is_err()).count();
    if failed > 0 {
        bail!("{failed} of {} ticker(s) failed", entries.len());
    }
    Ok(())
}

fn run_tickers_cmd(source_args: &SourceArgs) -> Result<()> {
    let config = load_config(source_args.config.as_deref())?;
    let source = load_source(source_args, &config)?;
    let loader = Loader::new(&source)?;
    let summaries = loader.tickers();

    if summaries.is_empty() {
        println!("Source has no rows: {}", source.origin());
        return Ok(());
    }

    println!("Source: {} ({})", source.origin(), source.hash().short());
    print!("{}", render::tickers(&summaries));
    Ok(())
}

fn run_sample_cmd(
    output: &Path,
    tickers: Vec<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    missing: f64,
) -> Result<()> {
    if !(0.0..=1.0).contains(&missing) {
        bail!("--missing must be between 0 and 1, got {missing}");
    }
    let config = SeasonLabConfig::default();
    let spec = SampleSpec {
        tickers: if tickers.is_empty() {
            config.tickers
        } else {
            tickers
        },
        start: start.unwrap_or(config.defaults.start),
        end: end.unwrap_or(config.defaults.end),
        missing_fraction: missing,
    };
    if spec.start > spec.end {
        bail!("start date {} is after end date {}", spec.start, spec.end);
    }

    let file = std::fs::File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let rows = write_sample(file, &spec)
        .with_context(|| format!("failed to write sample to {}", output.display()))?;

    println!(
        "Wrote {rows} rows for {} ticker(s) to {}",
        spec.tickers.len(),
        output.display()
    );
    Ok(())
}

fn run_config_init(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            output.display()
        );
    }
    let toml = SeasonLabConfig::default().to_toml()?;
    std::fs::write(output, toml).with_context(|| format!("failed to write {}", output.display()))?;
    println!("Config written to: {}", output.display());
    Ok(())
}
