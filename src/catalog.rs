//! # Catalog — OEIS Reference Terms
//!
//! Loads known terms of a sequence from a local copy of the OEIS `stripped`
//! file, so generators can be checked against published data.
//!
//! ## Format
//!
//! ```text
//! # OEIS stripped file, comment lines start with '#'
//! A000040 ,2,3,5,7,11,13,17,19,23,29,
//! A000290 ,0,1,4,9,16,25,36,49,64,81,
//! ```
//!
//! One line per sequence: the A-number, a space, then the terms, each
//! preceded and the last one followed by a comma. Terms can exceed 64 bits,
//! so they are parsed as `rug::Integer`.

use anyhow::{anyhow, bail, ensure, Context, Result};
use rug::Integer;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::sequence::VectorSequence;

/// The catalog's terms for one sequence, as a finite sequence.
pub type CatalogSequence = VectorSequence<Integer>;

/// An OEIS A-number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceId(pub u32);

impl SequenceId {
    pub const PRIMES: SequenceId = SequenceId(40);
    pub const SQUARES: SequenceId = SequenceId(290);
    pub const SQUAREFREE_COUNTS: SequenceId = SequenceId(13928);

    pub fn number(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{:06}", self.0)
    }
}

/// Accepts `A000040`, `a40` and `40`.
impl FromStr for SequenceId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let digits = s
            .strip_prefix('A')
            .or_else(|| s.strip_prefix('a'))
            .unwrap_or(s);
        ensure!(
            !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
            "invalid OEIS sequence id '{}'",
            s
        );
        let number = digits
            .parse::<u32>()
            .with_context(|| format!("OEIS sequence id '{}' is out of range", s))?;
        Ok(SequenceId(number))
    }
}

/// Somewhere to look up published terms.
pub trait ReferenceSource {
    /// All known terms of `id`, in order. Fails if `id` is not present.
    fn terms(&self, id: SequenceId) -> Result<Vec<Integer>>;
}

/// An OEIS `stripped` file on disk.
#[derive(Clone, Debug)]
pub struct StrippedCatalog {
    path: PathBuf,
}

impl StrippedCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StrippedCatalog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReferenceSource for StrippedCatalog {
    fn terms(&self, id: SequenceId) -> Result<Vec<Integer>> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed to open catalog {}", self.path.display()))?;
        let terms = find_terms(BufReader::new(file), id)
            .with_context(|| format!("while reading catalog {}", self.path.display()))?;
        debug!(sequence = %id, terms = terms.len(), "loaded reference terms");
        Ok(terms)
    }
}

/// Scan stripped-format lines for `id` and parse its terms.
pub fn find_terms<R: BufRead>(reader: R, id: SequenceId) -> Result<Vec<Integer>> {
    let wanted = id.to_string();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.starts_with('#') {
            continue;
        }
        let Some((name, data)) = line.split_once(' ') else {
            continue;
        };
        if name == wanted {
            return parse_terms(data).with_context(|| format!("line {}: {}", line_no + 1, wanted));
        }
    }
    bail!("sequence {} not found in catalog", wanted)
}

/// Parse `,t0,t1,...,tn,` into integers.
fn parse_terms(data: &str) -> Result<Vec<Integer>> {
    let data = data.trim();
    let inner = data
        .strip_prefix(',')
        .ok_or_else(|| anyhow!("term list must start with ','"))?;
    let inner = inner.strip_suffix(',').unwrap_or(inner);
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|t| {
            t.trim()
                .parse::<Integer>()
                .map_err(|e| anyhow!("bad term '{}': {}", t, e))
        })
        .collect()
}

/// The catalog's terms for `id`, ready to verify against.
pub fn reference_sequence(source: &dyn ReferenceSource, id: SequenceId) -> Result<CatalogSequence> {
    Ok(VectorSequence::new(source.terms(id)?))
}
