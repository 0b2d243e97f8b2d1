//! Renzoku CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use dialoguer::Input;
use log::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use renzoku::error::Result;
use renzoku::prelude::*;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Audit a Kavita library for missing chapters, duplicate files and naming mismatches.
#[derive(Debug, Parser)]
#[command(name = "renzoku", version, about)]
struct Cli {
    /// Kavita OPDS URL (`<server>/api/opds/<api key>`); prompted for when absent
    #[arg(long, env = "KAVITA_OPDS_URL")]
    opds_url: Option<String>,

    /// Library id to audit; repeat to audit several. Skips the interactive loop.
    #[arg(short, long = "library")]
    libraries: Vec<i64>,

    /// Audit a JSON snapshot instead of a live server (takes precedence over --opds-url)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// File the report is written to (truncated on start)
    #[arg(long, default_value = "MissingChapters.log")]
    log_file: PathBuf,

    /// Format of the log file; the terminal always gets text
    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    /// Number of series whose volumes are fetched concurrently
    #[arg(long)]
    concurrency: Option<usize>,

    /// Only audit series whose name matches this regex
    #[arg(long)]
    series_filter: Option<String>,

    /// Skip the `Vol. N Ch. M` file naming check
    #[arg(long)]
    skip_file_names: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

/// Initialize the tracing subscriber, which also receives the library's `log` records.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("renzoku=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("renzoku=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn build_config(cli: &Cli) -> Result<RenzokuConfig> {
    let mut builder = RenzokuConfig::builder();
    builder.check_file_names(!cli.skip_file_names);
    if let Some(concurrency) = cli.concurrency {
        builder.max_concurrent_fetches(concurrency);
    }
    if let Some(filter) = &cli.series_filter {
        builder.series_filter(filter.clone());
    }
    Ok(builder.build()?)
}

fn build_sink(cli: &Cli) -> Result<MultiSink> {
    let sink = MultiSink::new().with(TextSink::new(std::io::stdout()));
    Ok(match OutputFormat::from(cli.format) {
        OutputFormat::Text => sink.with(TextSink::create(&cli.log_file)?),
        OutputFormat::Json => sink.with(JsonSink::create(&cli.log_file)?),
    })
}

async fn open_source(cli: &Cli, config: &RenzokuConfig) -> Result<Box<dyn LibrarySource>> {
    if let Some(path) = &cli.snapshot {
        return Ok(Box::new(SnapshotSource::from_path(path).await?));
    }

    let opds_url = match &cli.opds_url {
        Some(url) => url.clone(),
        None => Input::<String>::new()
            .with_prompt("Enter the Kavita OPDS URL")
            .interact_text()?,
    };
    Ok(Box::new(config.connect(&opds_url)?))
}

async fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    debug!("Configuration: {:?}", config);

    let source = open_source(&cli, &config).await?;
    let mut sink = build_sink(&cli)?;

    if cli.libraries.is_empty() {
        let mut session = Session::new(&config, source.as_ref(), TerminalPrompter::new());
        session.run(&mut sink).await?;
        return Ok(());
    }

    source.authenticate().await?;
    for library_id in &cli.libraries {
        config.audit_library(source.as_ref(), *library_id, &mut sink).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
