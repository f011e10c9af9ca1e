//! # Sequence — Lazy, Resumable, Cloneable Integer Sequences
//!
//! The substrate every generator and reference list plugs into. A sequence
//! produces one term per pull, tracks its own cursor, and can be deep-copied
//! behind `Box<dyn Sequence<T>>` so a verification run never advances the
//! caller's instance.
//!
//! ## Cursor State
//!
//! Every sequence owns a [`Cursor`]:
//!
//! - `index`: the index of the next term, starting at 0. Grows by exactly one
//!   per pull, including pulls after exhaustion.
//! - `done`: once set, every further pull yields `None`.
//! - `computing_time`: wall-clock time spent producing terms during
//!   verification, never decreasing.
//! - `limit`: the instance [`VerificationLimit`].
//!
//! ## Implementing a Sequence
//!
//! Derive `Clone`, expose the cursor, and override [`Sequence::term`].
//! Returning `None` from `term` marks the sequence exhausted. The default
//! `term` is the zero sequence: `T::default()` forever.

use rug::Integer;
use std::fmt;
use std::time::Duration;

/// Element type of a sequence.
///
/// Terms of different element types are compared through their exact
/// arbitrary-precision value, so a `u64` generator can be checked against an
/// `Integer` reference list.
pub trait Term:
    Clone + Default + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Key used for this type in configuration files.
    const TAG: &'static str;

    fn to_integer(&self) -> Integer;

    /// Convert from an exact value, `None` when it does not fit.
    fn from_integer(value: &Integer) -> Option<Self>;

    /// True if `|self| > bound`.
    fn exceeds_magnitude(&self, bound: &Self) -> bool {
        self.to_integer().abs() > bound.to_integer()
    }
}

macro_rules! impl_term {
    ($($t:ty => $tag:literal, $to:ident);* $(;)?) => {$(
        impl Term for $t {
            const TAG: &'static str = $tag;

            fn to_integer(&self) -> Integer {
                Integer::from(*self)
            }
            fn from_integer(value: &Integer) -> Option<Self> {
                value.$to()
            }
        }
    )*};
}

impl_term! {
    u8 => "u8", to_u8;
    u16 => "u16", to_u16;
    u32 => "u32", to_u32;
    u64 => "u64", to_u64;
    u128 => "u128", to_u128;
    i32 => "i32", to_i32;
    i64 => "i64", to_i64;
    i128 => "i128", to_i128;
}

impl Term for Integer {
    const TAG: &'static str = "integer";

    fn to_integer(&self) -> Integer {
        self.clone()
    }
    fn from_integer(value: &Integer) -> Option<Self> {
        Some(value.clone())
    }
    fn exceeds_magnitude(&self, bound: &Self) -> bool {
        self.cmp_abs(bound) == std::cmp::Ordering::Greater
    }
}

/// Bounds applied while verifying a sequence. `None` means unbounded.
#[derive(Clone, Debug, PartialEq)]
pub struct VerificationLimit<T> {
    pub max_abs_value: Option<T>,
    pub max_index: Option<usize>,
    pub timeout: Option<Duration>,
}

impl<T> Default for VerificationLimit<T> {
    fn default() -> Self {
        VerificationLimit {
            max_abs_value: None,
            max_index: None,
            timeout: None,
        }
    }
}

impl<T: Term> VerificationLimit<T> {
    /// Combine two limits bound by bound, keeping the more restrictive one
    /// wherever both are present.
    pub fn merge(&self, other: &VerificationLimit<T>) -> VerificationLimit<T> {
        let max_abs_value = match (&self.max_abs_value, &other.max_abs_value) {
            (Some(a), Some(b)) => Some(if b < a { b.clone() } else { a.clone() }),
            (a, b) => a.clone().or_else(|| b.clone()),
        };
        VerificationLimit {
            max_abs_value,
            max_index: min_present(self.max_index, other.max_index),
            timeout: min_present(self.timeout, other.timeout),
        }
    }

    /// True if `value` lies beyond `max_abs_value`.
    pub fn exceeded_by(&self, value: &T) -> bool {
        self.max_abs_value
            .as_ref()
            .is_some_and(|bound| value.exceeds_magnitude(bound))
    }
}

/// The smaller of two optional bounds; a missing bound never wins.
pub fn min_present<U: Ord>(a: Option<U>, b: Option<U>) -> Option<U> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// One pulled term. `value` is `None` when the sequence was exhausted.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry<T> {
    pub index: usize,
    pub value: Option<T>,
}

impl<T: fmt::Display> fmt::Display for Entry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "[{}] = {}", self.index, v),
            None => write!(f, "[{}] = _", self.index),
        }
    }
}

/// Position, exhaustion flag, accumulated compute time, and instance limit.
#[derive(Clone, Debug)]
pub struct Cursor<T> {
    index: usize,
    done: bool,
    computing_time: Duration,
    limit: VerificationLimit<T>,
}

impl<T> Default for Cursor<T> {
    fn default() -> Self {
        Cursor {
            index: 0,
            done: false,
            computing_time: Duration::ZERO,
            limit: VerificationLimit::default(),
        }
    }
}

impl<T> Cursor<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Mark the sequence exhausted. There is no way back.
    #[inline]
    pub fn finish(&mut self) {
        self.done = true;
    }

    pub fn computing_time(&self) -> Duration {
        self.computing_time
    }

    pub fn add_computing_time(&mut self, spent: Duration) {
        self.computing_time += spent;
    }

    pub fn limit(&self) -> &VerificationLimit<T> {
        &self.limit
    }

    pub fn limit_mut(&mut self) -> &mut VerificationLimit<T> {
        &mut self.limit
    }
}

/// Object-safe deep copy for sequences. Implemented for every `Clone`
/// sequence, so implementors only derive `Clone`.
pub trait SequenceClone<T: Term> {
    fn clone_box(&self) -> Box<dyn Sequence<T>>;
}

impl<T: Term, S: Sequence<T> + Clone + 'static> SequenceClone<T> for S {
    fn clone_box(&self) -> Box<dyn Sequence<T>> {
        Box::new(self.clone())
    }
}

/// A lazily evaluated, possibly infinite sequence of `T`.
pub trait Sequence<T: Term>: SequenceClone<T> {
    fn cursor(&self) -> &Cursor<T>;
    fn cursor_mut(&mut self) -> &mut Cursor<T>;

    /// Produce the term at `self.index()`. `None` ends the sequence.
    fn term(&mut self) -> Option<T> {
        Some(T::default())
    }

    /// The current term, advancing the cursor. `None` once exhausted.
    fn next_term(&mut self) -> Option<T> {
        let next = if self.cursor().is_done() {
            None
        } else {
            let produced = self.term();
            if produced.is_none() {
                self.cursor_mut().finish();
            }
            produced
        };
        self.cursor_mut().index += 1;
        next
    }

    /// The current term paired with its index.
    fn next_entry(&mut self) -> Entry<T> {
        let index = self.index();
        Entry {
            index,
            value: self.next_term(),
        }
    }

    /// Index of the next term to be produced.
    fn index(&self) -> usize {
        self.cursor().index()
    }

    fn is_empty(&self) -> bool {
        self.cursor().is_done()
    }

    fn limit(&self) -> &VerificationLimit<T> {
        self.cursor().limit()
    }

    fn set_limit(&mut self, limit: VerificationLimit<T>) {
        *self.cursor_mut().limit_mut() = limit;
    }

    /// Pull up to `count` terms, stopping early at exhaustion.
    fn take_terms(&mut self, count: usize) -> Vec<T> {
        let mut terms = Vec::with_capacity(count);
        for _ in 0..count {
            match self.next_term() {
                Some(t) => terms.push(t),
                None => break,
            }
        }
        terms
    }
}

impl<T: Term> Clone for Box<dyn Sequence<T>> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// `T::default()` at every index, forever.
#[derive(Clone, Debug, Default)]
pub struct ZeroSequence<T> {
    cursor: Cursor<T>,
}

impl<T: Term> ZeroSequence<T> {
    pub fn new() -> Self {
        ZeroSequence {
            cursor: Cursor::new(),
        }
    }
}

impl<T: Term> Sequence<T> for ZeroSequence<T> {
    fn cursor(&self) -> &Cursor<T> {
        &self.cursor
    }
    fn cursor_mut(&mut self) -> &mut Cursor<T> {
        &mut self.cursor
    }
}

/// A finite sequence over a precomputed list.
#[derive(Clone, Debug)]
pub struct VectorSequence<T> {
    cursor: Cursor<T>,
    values: Vec<T>,
}

impl<T: Term> VectorSequence<T> {
    pub fn new(values: Vec<T>) -> Self {
        let mut cursor = Cursor::new();
        if values.is_empty() {
            cursor.finish();
        }
        VectorSequence { cursor, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl<T: Term> From<Vec<T>> for VectorSequence<T> {
    fn from(values: Vec<T>) -> Self {
        VectorSequence::new(values)
    }
}

impl<T: Term> Sequence<T> for VectorSequence<T> {
    fn cursor(&self) -> &Cursor<T> {
        &self.cursor
    }
    fn cursor_mut(&mut self) -> &mut Cursor<T> {
        &mut self.cursor
    }
    fn term(&mut self) -> Option<T> {
        let index = self.cursor.index();
        let value = self.values.get(index).cloned();
        if index + 1 >= self.values.len() {
            self.cursor.finish();
        }
        value
    }
}
