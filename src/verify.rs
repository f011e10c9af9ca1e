//! # Verify — Bounded Pairwise Comparison of Sequences
//!
//! Compares two sequences term by term until a contradiction is found or a
//! resource ceiling is reached. Either sequence may be finite, truncated, or
//! expensive, so "agreement" means no contradiction was found within the
//! budget. Running out of budget is a terminal status, never an error.
//!
//! ## Loop
//!
//! Each round pulls one entry from each side, timing the two pulls separately
//! and charging each to its own sequence. Then, in order:
//!
//! 1. Either side over its timeout → `TIMEOUT` (BOTH).
//! 2. Either value missing → `AGREE_TO_EMPTY`, naming the side that ran out.
//! 3. Either index beyond the shared max index → `AGREE_TO_INDEX` (BOTH).
//! 4. Left magnitude over its bound → `AGREE_TO_VALUE` (LEFT).
//! 5. Right magnitude over its bound → `AGREE_TO_VALUE` (RIGHT).
//! 6. Values differ → `DISAGREE` (BOTH).
//! 7. Otherwise continue.
//!
//! Timeouts are checked once per round; a single slow term cannot be
//! interrupted.
//!
//! ## Limits
//!
//! Each sequence carries an instance [`VerificationLimit`]. A [`LimitRegistry`]
//! holds one limit per element type for the whole run. The effective bound is
//! the smaller of the two wherever both are set. Without any timeout, each
//! side gets [`DEFAULT_TIMEOUT`] of accumulated computing time.

use serde::Serialize;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::sequence::{min_present, Entry, Sequence, Term, VerificationLimit};

/// Computing time allowed per side when no timeout is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationSide {
    Both,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Disagree,
    AgreeToValue,
    AgreeToIndex,
    Timeout,
    AgreeToEmpty,
}

impl VerificationSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationSide::Both => "BOTH",
            VerificationSide::Left => "LEFT",
            VerificationSide::Right => "RIGHT",
        }
    }
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Disagree => "DISAGREE",
            VerificationStatus::AgreeToValue => "AGREE_TO_VALUE",
            VerificationStatus::AgreeToIndex => "AGREE_TO_INDEX",
            VerificationStatus::Timeout => "TIMEOUT",
            VerificationStatus::AgreeToEmpty => "AGREE_TO_EMPTY",
        }
    }

    pub fn is_agreement(&self) -> bool {
        *self != VerificationStatus::Disagree
    }
}

impl fmt::Display for VerificationSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one comparison run, with the entries that ended it.
#[derive(Clone, Debug, PartialEq)]
pub struct Verification<S, T> {
    pub which_side: VerificationSide,
    pub status: VerificationStatus,
    pub left: Entry<S>,
    pub right: Entry<T>,
}

/// Serializable form of a [`Verification`], values as decimal strings.
#[derive(Clone, Debug, Serialize)]
pub struct VerificationReport {
    pub which_side: VerificationSide,
    pub status: VerificationStatus,
    pub left_index: usize,
    pub left_value: Option<String>,
    pub right_index: usize,
    pub right_value: Option<String>,
}

impl<S: Term, T: Term> Verification<S, T> {
    pub fn agrees(&self) -> bool {
        self.status.is_agreement()
    }

    pub fn report(&self) -> VerificationReport {
        VerificationReport {
            which_side: self.which_side,
            status: self.status,
            left_index: self.left.index,
            left_value: self.left.value.as_ref().map(|v| v.to_string()),
            right_index: self.right.index,
            right_value: self.right.value.as_ref().map(|v| v.to_string()),
        }
    }
}

impl<S: Term, T: Term> fmt::Display for Verification<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: A{}, B{}",
            self.which_side, self.status, self.left, self.right
        )
    }
}

/// Verification limits per element type, applied to every sequence of that
/// type in a run.
#[derive(Default)]
pub struct LimitRegistry {
    limits: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl LimitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: Term>(&mut self, limit: VerificationLimit<T>) {
        self.limits.insert(TypeId::of::<T>(), Box::new(limit));
    }

    pub fn with<T: Term>(mut self, limit: VerificationLimit<T>) -> Self {
        self.set(limit);
        self
    }

    pub fn get<T: Term>(&self) -> Option<&VerificationLimit<T>> {
        self.limits
            .get(&TypeId::of::<T>())
            .and_then(|limit| limit.downcast_ref::<VerificationLimit<T>>())
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// Instance limit combined with the registered limit for `T`.
    pub fn effective<T: Term>(&self, instance: &VerificationLimit<T>) -> VerificationLimit<T> {
        match self.get::<T>() {
            Some(registered) => instance.merge(registered),
            None => instance.clone(),
        }
    }
}

/// Runs comparisons under a fixed [`LimitRegistry`].
#[derive(Default)]
pub struct Verifier {
    limits: LimitRegistry,
}

impl Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: LimitRegistry) -> Self {
        Verifier { limits }
    }

    pub fn limits(&self) -> &LimitRegistry {
        &self.limits
    }

    /// Compare clones of `left` and `right`. The inputs are not advanced.
    pub fn verify<S, T, L, R>(&self, left: &L, right: &R) -> Verification<S, T>
    where
        S: Term,
        T: Term,
        L: Sequence<S> + ?Sized,
        R: Sequence<T> + ?Sized,
    {
        let mut left = left.clone_box();
        let mut right = right.clone_box();
        self.compare(left.as_mut(), right.as_mut())
    }

    /// True unless the comparison finds a contradiction.
    pub fn agree<S, T, L, R>(&self, left: &L, right: &R) -> bool
    where
        S: Term,
        T: Term,
        L: Sequence<S> + ?Sized,
        R: Sequence<T> + ?Sized,
    {
        self.verify(left, right).agrees()
    }

    /// Hand every disagreement, then the terminal non-disagreeing result, to
    /// `on_result` as soon as each is found. Scanning resumes after each
    /// mismatch on the same pair of clones and stops at the first error
    /// `on_result` returns.
    pub fn scan_disagreements<S, T, L, R, E, F>(
        &self,
        left: &L,
        right: &R,
        mut on_result: F,
    ) -> Result<(), E>
    where
        S: Term,
        T: Term,
        L: Sequence<S> + ?Sized,
        R: Sequence<T> + ?Sized,
        F: FnMut(Verification<S, T>) -> Result<(), E>,
    {
        let mut left = left.clone_box();
        let mut right = right.clone_box();
        loop {
            let result = self.compare(left.as_mut(), right.as_mut());
            let terminal = result.agrees();
            if !terminal {
                info!(
                    index = result.left.index,
                    left = %display_value(&result.left),
                    right = %display_value(&result.right),
                    "sequences disagree"
                );
            }
            on_result(result)?;
            if terminal {
                return Ok(());
            }
        }
    }

    /// Every disagreement between the two sequences, in index order, followed
    /// by the terminal non-disagreeing result.
    pub fn all_disagreements<S, T, L, R>(&self, left: &L, right: &R) -> Vec<Verification<S, T>>
    where
        S: Term,
        T: Term,
        L: Sequence<S> + ?Sized,
        R: Sequence<T> + ?Sized,
    {
        let mut results = Vec::new();
        let scanned: Result<(), Infallible> = self.scan_disagreements(left, right, |result| {
            results.push(result);
            Ok(())
        });
        match scanned {
            Ok(()) => results,
            Err(never) => match never {},
        }
    }

    /// Write every disagreement and the terminal result, one per line, as
    /// each is found.
    pub fn print_all_disagreements<S, T, L, R, W>(
        &self,
        left: &L,
        right: &R,
        out: &mut W,
    ) -> io::Result<()>
    where
        S: Term,
        T: Term,
        L: Sequence<S> + ?Sized,
        R: Sequence<T> + ?Sized,
        W: Write,
    {
        self.scan_disagreements(left, right, |result| writeln!(out, "{}", result))
    }

    /// The comparison loop. Advances `left` and `right` in place.
    pub fn compare<S: Term, T: Term>(
        &self,
        left: &mut dyn Sequence<S>,
        right: &mut dyn Sequence<T>,
    ) -> Verification<S, T> {
        let left_limit = self.limits.effective(left.limit());
        let right_limit = self.limits.effective(right.limit());
        let max_index = min_present(left_limit.max_index, right_limit.max_index);
        let left_timeout = left_limit.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let right_timeout = right_limit.timeout.unwrap_or(DEFAULT_TIMEOUT);

        loop {
            let started = Instant::now();
            let l = left.next_entry();
            left.cursor_mut().add_computing_time(started.elapsed());

            let started = Instant::now();
            let r = right.next_entry();
            right.cursor_mut().add_computing_time(started.elapsed());

            let outcome = if left.cursor().computing_time() > left_timeout
                || right.cursor().computing_time() > right_timeout
            {
                Some((VerificationSide::Both, VerificationStatus::Timeout))
            } else {
                classify(&l, &r, max_index, &left_limit, &right_limit)
            };

            if let Some((which_side, status)) = outcome {
                debug!(
                    side = %which_side,
                    status = %status,
                    left_index = l.index,
                    right_index = r.index,
                    "verification finished"
                );
                return Verification {
                    which_side,
                    status,
                    left: l,
                    right: r,
                };
            }
        }
    }
}

/// Decide whether a freshly pulled pair ends the comparison.
fn classify<S: Term, T: Term>(
    l: &Entry<S>,
    r: &Entry<T>,
    max_index: Option<usize>,
    left_limit: &VerificationLimit<S>,
    right_limit: &VerificationLimit<T>,
) -> Option<(VerificationSide, VerificationStatus)> {
    let (lv, rv) = match (&l.value, &r.value) {
        (Some(lv), Some(rv)) => (lv, rv),
        (None, None) => return Some((VerificationSide::Both, VerificationStatus::AgreeToEmpty)),
        (None, Some(_)) => return Some((VerificationSide::Left, VerificationStatus::AgreeToEmpty)),
        (Some(_), None) => return Some((VerificationSide::Right, VerificationStatus::AgreeToEmpty)),
    };
    if max_index.is_some_and(|max| l.index > max || r.index > max) {
        return Some((VerificationSide::Both, VerificationStatus::AgreeToIndex));
    }
    if left_limit.exceeded_by(lv) {
        return Some((VerificationSide::Left, VerificationStatus::AgreeToValue));
    }
    if right_limit.exceeded_by(rv) {
        return Some((VerificationSide::Right, VerificationStatus::AgreeToValue));
    }
    if lv.to_integer() != rv.to_integer() {
        return Some((VerificationSide::Both, VerificationStatus::Disagree));
    }
    None
}

fn display_value<T: Term>(entry: &Entry<T>) -> String {
    entry
        .value
        .as_ref()
        .map_or_else(|| "_".to_string(), |v| v.to_string())
}

/// [`Verifier::verify`] with no registered limits.
pub fn verify_sequences<S, T, L, R>(left: &L, right: &R) -> Verification<S, T>
where
    S: Term,
    T: Term,
    L: Sequence<S> + ?Sized,
    R: Sequence<T> + ?Sized,
{
    Verifier::new().verify(left, right)
}

/// True unless the sequences are shown to differ within the default budget.
pub fn sequences_agree<S, T, L, R>(left: &L, right: &R) -> bool
where
    S: Term,
    T: Term,
    L: Sequence<S> + ?Sized,
    R: Sequence<T> + ?Sized,
{
    Verifier::new().agree(left, right)
}

/// [`Verifier::all_disagreements`] with no registered limits.
pub fn all_disagreements<S, T, L, R>(left: &L, right: &R) -> Vec<Verification<S, T>>
where
    S: Term,
    T: Term,
    L: Sequence<S> + ?Sized,
    R: Sequence<T> + ?Sized,
{
    Verifier::new().all_disagreements(left, right)
}

/// [`Verifier::print_all_disagreements`] with no registered limits.
pub fn print_all_disagreements<S, T, L, R, W>(left: &L, right: &R, out: &mut W) -> io::Result<()>
where
    S: Term,
    T: Term,
    L: Sequence<S> + ?Sized,
    R: Sequence<T> + ?Sized,
    W: Write,
{
    Verifier::new().print_all_disagreements(left, right, out)
}
