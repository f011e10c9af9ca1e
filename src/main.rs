//! # Main — CLI Entry Point
//!
//! Routes subcommands to the library: prime generation, the 64-bit primality
//! oracle, squarefree counting, and cross-checking generators against each
//! other and against an OEIS catalog.
//!
//! ## Global Options
//!
//! - `--config`: TOML file with per-type verification limits.
//! - `--catalog` / `SEQVERIFY_CATALOG`: OEIS `stripped` file for reference terms.
//! - `--threads`: rayon pool size for running pair checks in parallel.
//!
//! Logging goes to stderr. `LOG_FORMAT=json` switches to JSON lines and
//! `RUST_LOG` sets the level (default `info`).

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "seqverify",
    about = "Generate integer sequences and cross-check them against each other and OEIS"
)]
struct Cli {
    /// TOML file with verification limits per element type
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// OEIS stripped file (or set SEQVERIFY_CATALOG env var)
    #[arg(long, env = "SEQVERIFY_CATALOG", global = true)]
    catalog: Option<PathBuf>,

    /// Number of rayon worker threads for `check` (defaults to all logical cores)
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

/// Integer width the prime generator runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Width {
    #[value(name = "32")]
    W32,
    #[value(name = "64")]
    W64,
    /// Arbitrary precision
    Big,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the first primes from the incremental sieve
    Primes {
        /// How many primes to print
        #[arg(long, default_value_t = 10)]
        count: usize,
        /// Integer width to generate in
        #[arg(long, value_enum, default_value_t = Width::W64)]
        width: Width,
    },
    /// Deterministic primality test for a 64-bit integer
    IsPrime { n: u64 },
    /// Smallest prime greater than N
    NextPrime { n: u64 },
    /// Count squarefree integers in [1, X]
    Squarefree {
        x: i64,
        /// Largest X the Möbius table must cover (defaults to X)
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Cross-check the built-in generators for an OEIS sequence
    Check {
        /// Sequence id: A000040, A000290 or A013928
        id: String,
        /// Keep scanning past each disagreement
        #[arg(long)]
        all: bool,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize structured logging: LOG_FORMAT=json for log shippers, human-readable otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    cli::configure_rayon(cli.threads);

    match &cli.command {
        Commands::Primes { count, width } => cli::run_primes(*count, *width),
        Commands::IsPrime { n } => cli::run_is_prime(*n),
        Commands::NextPrime { n } => cli::run_next_prime(*n),
        Commands::Squarefree { x, limit } => cli::run_squarefree(*x, *limit),
        Commands::Check { id, all, json } => cli::run_check(&cli, id, *all, *json),
    }
}
