//! mtc: chunked multithreaded LZ77 compressor
//!
//!   mtc compress <input> <output> [chunk_size_bytes]   (alias: c)
//!   mtc decompress <input> <output>                    (alias: d)
//!
//! Exit status is 0 on success and 1 on any failure, argument errors included.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind as ClapErrorKind;
use clap::{Args, Parser, Subcommand, ValueEnum};

use mtc_core::compression::LzParams;
use mtc_core::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_MATCH_LEN, DEFAULT_WINDOW_SIZE};
use mtc_core::pipeline::{ApiConfig, ParallelismProfile, PipelineConfig, SizeCheck};
use mtc_core::pipeline::{compress_file, decompress_file};
use mtc_core::telemetry::TelemetrySnapshot;
use mtc_core::utils::human_bytes;

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "mtc",
    version,
    about = "Chunked multithreaded LZ77 compressor (MTC1 container)"
)]
struct Cli {
    /// Worker threads (default: one per hardware thread)
    #[arg(long, short = 'w', global = true, env = "MTC_WORKERS")]
    workers: Option<usize>,

    /// Log format on stderr
    #[arg(long, global = true, env = "MTC_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Print the run's telemetry as JSON on stdout
    #[arg(long, global = true)]
    stats: bool,

    /// Debug-level logging (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compress a file into an MTC1 container
    #[command(visible_alias = "c", alias = "C")]
    Compress {
        input: PathBuf,
        output: PathBuf,
        /// Bytes per chunk
        #[arg(default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
        #[command(flatten)]
        lz: LzArgs,
        /// Chunks outstanding at once (default: 4 per worker)
        #[arg(long, env = "MTC_MAX_INFLIGHT")]
        max_inflight: Option<usize>,
    },

    /// Restore the original file from an MTC1 container
    #[command(visible_alias = "d", alias = "D")]
    Decompress {
        input: PathBuf,
        output: PathBuf,
        /// Fail on size mismatches and trailing data instead of warning
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Args, Debug)]
struct LzArgs {
    /// Maximum match distance in bytes (1-65535)
    #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
    window: usize,
    /// Maximum match length in bytes (3-255)
    #[arg(long, default_value_t = DEFAULT_MAX_MATCH_LEN)]
    max_match: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
enum LogFormat {
    Json,
    Text,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    init_logging(if cli.verbose { "debug" } else { "info" }, cli.log_format);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let parallelism = match cli.workers {
        Some(0) => anyhow::bail!("argument error: --workers must be at least 1"),
        Some(n) => ParallelismProfile::with_workers(n),
        None => ParallelismProfile::dynamic(),
    };

    match cli.command {
        Commands::Compress { input, output, chunk_size, lz, max_inflight } => {
            let lz = LzParams::new(lz.window, lz.max_match)?;
            let mut pipeline = PipelineConfig::default().with_chunk_size(chunk_size).with_lz(lz);
            pipeline.max_inflight = max_inflight;
            let config = ApiConfig::new(pipeline, parallelism);

            let snapshot = compress_file(&input, &output, &config)
                .with_context(|| format!("compressing {}", input.display()))?;
            report(&snapshot, cli.stats, Direction::Compress, &output)
        }
        Commands::Decompress { input, output, strict } => {
            let mut pipeline = PipelineConfig::default();
            if strict {
                pipeline.size_check = SizeCheck::Strict;
            }
            let config = ApiConfig::new(pipeline, parallelism);

            let snapshot = decompress_file(&input, &output, &config)
                .with_context(|| format!("decompressing {}", input.display()))?;
            report(&snapshot, cli.stats, Direction::Decompress, &output)
        }
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Compress,
    Decompress,
}

fn report(snapshot: &TelemetrySnapshot, stats: bool, dir: Direction, output: &Path) -> Result<()> {
    if stats {
        println!("{}", snapshot.to_json().context("serializing telemetry")?);
        return Ok(());
    }

    let (verb, from, to) = match dir {
        Direction::Compress => ("compressed", snapshot.bytes_original, snapshot.container_bytes()),
        Direction::Decompress => ("decompressed", snapshot.container_bytes(), snapshot.bytes_original),
    };
    println!(
        "{verb} {} -> {} in {} chunk(s), {} worker(s), {:.1} ms: {}",
        human_bytes(from),
        human_bytes(to),
        snapshot.chunks,
        snapshot.workers,
        snapshot.elapsed.as_secs_f64() * 1000.0,
        output.display()
    );
    if snapshot.size_mismatches > 0 {
        println!("warning: {} chunk(s) decoded to an unexpected size", snapshot.size_mismatches);
    }
    Ok(())
}

fn init_logging(level: &str, format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
