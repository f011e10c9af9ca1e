//! # CLI Execution Functions
//!
//! Kept out of `main.rs` so the entry point stays a thin router. Results go to
//! stdout, logs to stderr.

use anyhow::{bail, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt::Display;
use tracing::{info, warn};

use seqverify::catalog::{reference_sequence, SequenceId, StrippedCatalog};
use seqverify::config::{self, Config};
use seqverify::generators::{
    squares_up_to, Squares, SquarefreeCounts, SquarefreeCountsBruteForce, TrialDivisionPrimes,
};
use seqverify::primality::{is_prime_64, next_prime_64};
use seqverify::primes::Primes;
use seqverify::sequence::VectorSequence;
use seqverify::squarefree::SquarefreeCounter;
use seqverify::verify::{VerificationReport, Verifier};
use seqverify::{Sequence, Term};

use super::{Cli, Width};

/// Upper end of the filtered square list used by `check A000290`.
const SQUARES_LIST_LIMIT: i64 = 1_000_000;

/// Möbius table size used by `check A013928`.
const SQUAREFREE_CHECK_LIMIT: i64 = 1_000_000;

// ── Thread Pool ──

/// Size the global rayon pool used by `check`. `None` uses all cores.
pub fn configure_rayon(threads: Option<usize>) {
    let result = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.unwrap_or(0))
        .build_global();
    if let Err(e) = result {
        warn!(error = %e, "Could not configure rayon thread pool");
    }
}

// ── Generation ──────────────────────────────────────────────────

pub fn run_primes(count: usize, width: Width) -> Result<()> {
    info!(count, width = ?width, "generating primes");
    match width {
        Width::W32 => print_terms(Primes::<u32>::new().take_terms(count)),
        Width::W64 => print_terms(Primes::<u64>::new().take_terms(count)),
        Width::Big => print_terms(Primes::<rug::Integer>::new().take_terms(count)),
    }
    Ok(())
}

fn print_terms<T: Display>(terms: Vec<T>) {
    for t in terms {
        println!("{}", t);
    }
}

pub fn run_is_prime(n: u64) -> Result<()> {
    println!("{}", if is_prime_64(n) { "prime" } else { "composite" });
    Ok(())
}

pub fn run_next_prime(n: u64) -> Result<()> {
    match next_prime_64(n) {
        Some(p) => {
            println!("{}", p);
            Ok(())
        }
        None => bail!("no prime above {} fits in 64 bits", n),
    }
}

pub fn run_squarefree(x: i64, limit: Option<i64>) -> Result<()> {
    let limit = limit.unwrap_or(x).max(1);
    let counter = SquarefreeCounter::new(limit)?;
    println!("{}", counter.count_squarefree_up_to(x)?);
    Ok(())
}

// ── Cross-Checking ──────────────────────────────────────────────

/// Outcome of comparing one pair of sequences.
#[derive(Serialize)]
struct PairResult {
    left: &'static str,
    right: &'static str,
    agrees: bool,
    results: Vec<VerificationReport>,
    #[serde(skip)]
    lines: Vec<String>,
}

/// One pair comparison, ready to run on the rayon pool.
type PairJob<'a> = Box<dyn Fn() -> PairResult + Send + Sync + 'a>;

/// Run independent pair comparisons in parallel, keeping their order.
fn run_pairs(jobs: Vec<PairJob<'_>>) -> Vec<PairResult> {
    jobs.par_iter().map(|job| job()).collect()
}

fn check_pair<S, T, L, R>(
    verifier: &Verifier,
    all: bool,
    (left_name, left): (&'static str, &L),
    (right_name, right): (&'static str, &R),
) -> PairResult
where
    S: Term,
    T: Term,
    L: Sequence<S> + ?Sized,
    R: Sequence<T> + ?Sized,
{
    let results = if all {
        verifier.all_disagreements(left, right)
    } else {
        vec![verifier.verify(left, right)]
    };
    PairResult {
        left: left_name,
        right: right_name,
        agrees: results.iter().all(|r| r.agrees()),
        lines: results.iter().map(|r| r.to_string()).collect(),
        results: results.iter().map(|r| r.report()).collect(),
    }
}

/// Compare every built-in generator for `id` with the others and with the
/// catalog, if one is configured. Fails if any pair disagrees.
pub fn run_check(cli: &Cli, id: &str, all: bool, json: bool) -> Result<()> {
    let id: SequenceId = id.parse()?;
    let config = match &cli.config {
        Some(path) => config::parse_toml_file(path)?,
        None => Config::default(),
    };
    let verifier = Verifier::with_limits(config.limit_registry()?);

    let catalog = cli.catalog.clone().or_else(|| config.catalog.clone());
    let reference = match &catalog {
        Some(path) => Some(reference_sequence(&StrippedCatalog::new(path), id)?),
        None => {
            warn!(sequence = %id, "no catalog configured, comparing generators only");
            None
        }
    };

    let verifier = &verifier;
    let pairs = match id {
        SequenceId::PRIMES => {
            let sieve = &Primes::<u64>::new();
            let naive = &TrialDivisionPrimes::new();
            let mut jobs: Vec<PairJob> = Vec::new();
            if let Some(oeis) = &reference {
                jobs.push(Box::new(move || {
                    check_pair(verifier, all, ("oeis", oeis), ("sieve", sieve))
                }));
                jobs.push(Box::new(move || {
                    check_pair(verifier, all, ("oeis", oeis), ("trial-division", naive))
                }));
            }
            jobs.push(Box::new(move || {
                check_pair(verifier, all, ("sieve", sieve), ("trial-division", naive))
            }));
            run_pairs(jobs)
        }
        SequenceId::SQUARES => {
            let direct = &Squares::new();
            let filtered = &VectorSequence::new(squares_up_to(SQUARES_LIST_LIMIT));
            let mut jobs: Vec<PairJob> = Vec::new();
            if let Some(oeis) = &reference {
                jobs.push(Box::new(move || {
                    check_pair(verifier, all, ("oeis", oeis), ("n-squared", direct))
                }));
                jobs.push(Box::new(move || {
                    check_pair(verifier, all, ("oeis", oeis), ("filtered", filtered))
                }));
            }
            jobs.push(Box::new(move || {
                check_pair(verifier, all, ("n-squared", direct), ("filtered", filtered))
            }));
            run_pairs(jobs)
        }
        SequenceId::SQUAREFREE_COUNTS => {
            let mobius = SquarefreeCounts::new(SQUAREFREE_CHECK_LIMIT)?;
            let mobius = &mobius;
            let brute = &SquarefreeCountsBruteForce::new();
            let mut jobs: Vec<PairJob> = Vec::new();
            if let Some(oeis) = &reference {
                jobs.push(Box::new(move || {
                    check_pair(verifier, all, ("oeis", oeis), ("mobius", mobius))
                }));
                jobs.push(Box::new(move || {
                    check_pair(verifier, all, ("oeis", oeis), ("brute-force", brute))
                }));
            }
            jobs.push(Box::new(move || {
                check_pair(verifier, all, ("mobius", mobius), ("brute-force", brute))
            }));
            run_pairs(jobs)
        }
        other => bail!(
            "no generators for {}; supported: {}, {}, {}",
            other,
            SequenceId::PRIMES,
            SequenceId::SQUARES,
            SequenceId::SQUAREFREE_COUNTS
        ),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&pairs)?);
    } else {
        for pair in &pairs {
            for line in &pair.lines {
                println!("{} vs {}: {}", pair.left, pair.right, line);
            }
        }
    }

    let failed = pairs.iter().filter(|p| !p.agrees).count();
    info!(sequence = %id, pairs = pairs.len(), failed, "check finished");
    if failed > 0 {
        bail!("{} of {} pairs disagree for {}", failed, pairs.len(), id);
    }
    Ok(())
}
