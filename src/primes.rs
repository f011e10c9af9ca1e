//! # Primes — Incremental Map-Based Sieve
//!
//! Produces 2, 3, 5, 7, ... lazily for any integer width. Unlike the bitmap
//! sieve of Eratosthenes there is no upper limit fixed in advance: memory
//! grows with the number of primes emitted, not with the largest candidate.
//!
//! ## Algorithm
//!
//! A candidate cursor q starts at 2. A map sends each upcoming composite to
//! the primes known to divide it.
//!
//! - q not in the map: q is prime. Record q² as the first composite q will
//!   cross off, emit q.
//! - q in the map: q is composite. Move each listed prime p forward to its
//!   next multiple p + q, drop the entry for q, and try q + 1.
//!
//! Every prime emitted so far sits in exactly one list in the map, so the
//! map never holds more keys than primes found.
//!
//! ## Overflow
//!
//! Composite markers that do not fit in `T` are never recorded: they lie
//! beyond every candidate the cursor can reach. When the cursor itself
//! would overflow, the sequence ends.
//!
//! ## References
//!
//! - Melissa E. O'Neill, "The Genuine Sieve of Eratosthenes", Journal of
//!   Functional Programming, 19(1):95–106, 2009.

use rug::Integer;
use std::collections::HashMap;
use std::hash::Hash;

use crate::modular::ModInt;
use crate::sequence::{Cursor, Sequence, Term};

/// Element types the incremental sieve can run over.
pub trait PrimeInt: Term + ModInt + Eq + Hash {}

impl PrimeInt for u8 {}
impl PrimeInt for u16 {}
impl PrimeInt for u32 {}
impl PrimeInt for u64 {}
impl PrimeInt for u128 {}
impl PrimeInt for i64 {}
impl PrimeInt for Integer {}

/// The primes in increasing order.
#[derive(Clone, Debug)]
pub struct Primes<T: PrimeInt> {
    cursor: Cursor<T>,
    candidate: Option<T>,
    composites: HashMap<T, Vec<T>>,
}

impl<T: PrimeInt> Default for Primes<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PrimeInt> Primes<T> {
    pub fn new() -> Self {
        Primes {
            cursor: Cursor::new(),
            candidate: Some(T::from_u32(2)),
            composites: HashMap::new(),
        }
    }

    /// Number of pending composite markers.
    pub fn pending_composites(&self) -> usize {
        self.composites.len()
    }
}

impl<T: PrimeInt> Sequence<T> for Primes<T> {
    fn cursor(&self) -> &Cursor<T> {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut Cursor<T> {
        &mut self.cursor
    }

    fn term(&mut self) -> Option<T> {
        loop {
            let q = self.candidate.take()?;
            self.candidate = q.checked_add(&T::one());
            match self.composites.remove(&q) {
                None => {
                    if let Some(square) = q.checked_mul(&q) {
                        self.composites.insert(square, vec![q.clone()]);
                    }
                    return Some(q);
                }
                Some(factors) => {
                    for p in factors {
                        if let Some(next) = p.checked_add(&q) {
                            self.composites.entry(next).or_default().push(p);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primality::{is_prime_32, is_prime_64};
    use crate::sequence::VerificationLimit;
    use crate::verify::{sequences_agree, verify_sequences, VerificationStatus};

    #[test]
    fn first_eight_primes() {
        let mut primes = Primes::<u64>::new();
        assert_eq!(primes.take_terms(8), vec![2, 3, 5, 7, 11, 13, 17, 19]);
        assert_eq!(primes.index(), 8);
    }

    /// pi(10^4) = 1229, and every emitted value passes the 64-bit oracle.
    #[test]
    fn matches_primality_oracle_below_10000() {
        let mut primes = Primes::<u64>::new();
        let mut emitted = Vec::new();
        loop {
            let p = primes.next_term().unwrap();
            if p >= 10_000 {
                break;
            }
            emitted.push(p);
        }
        assert_eq!(emitted.len(), 1229);
        let expected: Vec<u64> = (0..10_000).filter(|&n| is_prime_64(n)).collect();
        assert_eq!(emitted, expected);
    }

    /// One marker per emitted prime, some sharing a key.
    #[test]
    fn memory_tracks_primes_not_magnitude() {
        let mut primes = Primes::<u64>::new();
        primes.take_terms(1000);
        assert!(primes.pending_composites() <= 1000);
        // primes above sqrt(7919) still sit at their own squares
        assert!(primes.pending_composites() >= 1000 - 24);
    }

    /// u8 runs out after 251, the largest prime below 256.
    #[test]
    fn narrow_width_exhausts_after_last_prime() {
        let mut primes = Primes::<u8>::new();
        let all = primes.take_terms(100);
        assert_eq!(all.len(), 54);
        assert_eq!(all.last(), Some(&251));
        assert!(primes.is_empty());
        assert_eq!(primes.next_term(), None);
        assert!(all.iter().all(|&p| is_prime_32(p as u32)));
    }

    #[test]
    fn widths_agree_with_each_other() {
        let mut small = Primes::<u32>::new();
        small.set_limit(VerificationLimit {
            max_index: Some(20_000),
            ..Default::default()
        });
        let mut big = Primes::<Integer>::new();
        let result = verify_sequences(&small, &big);
        assert_eq!(result.status, VerificationStatus::AgreeToIndex);
        assert_eq!(result.left.index, 20_001);
        assert_eq!(big.take_terms(5), vec![2, 3, 5, 7, 11]);
    }

    /// A clone resumes from the same point and reproduces the same terms.
    #[test]
    fn clone_continues_identically() {
        let mut primes = Primes::<u64>::new();
        primes.take_terms(50);
        let mut copy = primes.clone();
        assert_eq!(copy.take_terms(100), primes.take_terms(100));
        primes.set_limit(VerificationLimit {
            max_index: Some(10_000),
            ..Default::default()
        });
        assert!(sequences_agree(&primes, &primes.clone()));
    }

    /// A generator that runs out agrees with a longer one up to its end.
    #[test]
    fn exhausted_generator_agrees_to_empty() {
        let short = Primes::<u8>::new();
        let long = Primes::<u64>::new();
        let result = verify_sequences(&short, &long);
        assert_eq!(result.status, VerificationStatus::AgreeToEmpty);
        assert_eq!(result.left.index, 54);
        assert_eq!(result.right.value, Some(257));
    }
}
