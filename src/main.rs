//! floe: A standalone tool for exporting GCS bucket object metadata to Avro.
//!
//! This tool enumerates every object in a bucket (optionally including
//! noncurrent versions), normalizes the metadata into a flat record shape,
//! and streams the records into a single self-describing Avro container
//! file suitable for loading into an analytical warehouse.

use clap::Parser;
use snafu::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use floe::config::{
    Config, DEFAULT_BUFFER_CAPACITY, DEFAULT_CONCURRENCY, DEFAULT_PAGE_SIZE, SchemaSource,
};
use floe::error::{AddressParseSnafu, ConfigSnafu, MetricsSnafu, PipelineError, RuntimeSnafu};
use floe::pipeline::{PipelineStats, run_pipeline};

/// Exit status for a run that produced partial output after a listing error.
const EXIT_PARTIAL: u8 = 3;

/// GCS bucket object metadata to Avro exporter.
#[derive(Parser, Debug)]
#[command(name = "floe")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source bucket name.
    #[arg(short, long)]
    bucket: String,

    /// Output file path.
    #[arg(short, long, default_value = "gcs.avro")]
    output: PathBuf,

    /// Include noncurrent object versions.
    #[arg(long)]
    versions: bool,

    /// Record buffer capacity between enumeration and encoding.
    #[arg(long, default_value_t = DEFAULT_BUFFER_CAPACITY)]
    buffer_capacity: usize,

    /// Listing page size.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Runtime worker threads.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Avro schema: "embedded" or a path to an .avsc file.
    #[arg(long, default_value = "embedded")]
    schema: String,

    /// Listing endpoint override (storage emulators).
    #[arg(long)]
    endpoint: Option<String>,

    /// Address for the Prometheus metrics endpoint (e.g. "0.0.0.0:9090").
    #[arg(long)]
    metrics_address: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("floe starting");

    match run(&args) {
        Ok(stats) if stats.listing_failed => ExitCode::from(EXIT_PARTIAL),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", snafu::Report::from_error(e));
            ExitCode::FAILURE
        }
    }
}

/// Build the configuration and drive the pipeline to completion.
fn run(args: &Args) -> Result<PipelineStats, PipelineError> {
    let config = build_config(args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.concurrency)
        .enable_all()
        .build()
        .context(RuntimeSnafu)?;

    let stats = runtime.block_on(async {
        // The metrics server needs the runtime, so it starts in here.
        if let Some(addr) = config.metrics_address {
            floe::metrics::init(addr).context(MetricsSnafu)?;
            info!("Metrics endpoint listening on http://{}/metrics", addr);
        }

        run_pipeline(config.clone()).await
    })?;

    info!("Pipeline completed");
    info!("  Pages fetched: {}", stats.pages_fetched);
    info!("  Objects listed: {}", stats.objects_listed);
    info!("  Records written: {}", stats.records_written);
    info!("  Bytes written: {}", stats.bytes_written);

    Ok(stats)
}

/// Build and validate configuration from arguments.
fn build_config(args: &Args) -> Result<Config, PipelineError> {
    let metrics_address = args
        .metrics_address
        .as_deref()
        .map(|addr| addr.parse().context(AddressParseSnafu))
        .transpose()?;

    let config = Config {
        bucket: args.bucket.clone(),
        output: args.output.clone(),
        include_versions: args.versions,
        buffer_capacity: args.buffer_capacity,
        page_size: args.page_size,
        concurrency: args.concurrency,
        schema: SchemaSource::parse(&args.schema),
        endpoint: args.endpoint.clone(),
        metrics_address,
    };
    config.validate().context(ConfigSnafu)?;
    Ok(config)
}
