//! # Primality — Deterministic Miller–Rabin for Fixed-Width Integers
//!
//! Strong-probable-prime testing over the modular kernel, made deterministic
//! for the whole u32 and u64 range by fixed witness sets:
//!
//! - **u32**: bases {2, 7, 61} (Jaeschke, 1993).
//! - **u64**: the first twelve primes {2, 3, ..., 37} (Sorenson & Webster, 2017).
//!
//! Small inputs short-circuit through a literal small-prime set, and
//! multiples of the witness primes are rejected before any exponentiation.
//!
//! ## Algorithm: Strong Probable Prime Test
//!
//! Write x - 1 = d·2^s with d odd. x is a strong probable prime to base b if
//! b^d ≡ 1 (mod x) or b^(d·2^r) ≡ -1 (mod x) for some 0 ≤ r < s. Every
//! squaring goes through `mulmod`, so no intermediate overflows the width.
//!
//! ## References
//!
//! - Gerhard Jaeschke, "On strong pseudoprimes to several bases",
//!   Mathematics of Computation, 61(204):915–926, 1993.
//! - Jonathan Sorenson and Jonathan Webster, "Strong pseudoprimes to twelve
//!   prime bases", Mathematics of Computation, 86(304):985–1003, 2017.

use anyhow::{ensure, Result};

use crate::modular::{expmod_safe, gcd, mulmod, DoubleWidth, ModInt};

/// Witnesses that make the sprp test deterministic below 2^32.
const WITNESSES_32: [u32; 3] = [2, 7, 61];

/// Witnesses that make the sprp test deterministic below 2^64.
const WITNESSES_64: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Primes up to 61, the short-circuit range of `is_prime_32`.
const SMALL_PRIMES_32: [u32; 18] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61,
];

/// Returns true if `x` is a strong probable prime to `base`.
///
/// Preconditions: `x > 2`, `x` odd, `gcd(x, base) = 1`. Violations are
/// returned as errors rather than answered.
pub fn is_sprp_to_base<T: DoubleWidth>(x: T, base: T) -> Result<bool> {
    let two = T::from_u32(2);
    ensure!(x > two, "is_sprp_to_base requires x > 2");
    ensure!(x.is_odd(), "is_sprp_to_base requires odd x");
    ensure!(
        gcd(&x, &base) == T::one(),
        "is_sprp_to_base requires a base coprime to x"
    );
    Ok(sprp_unchecked(x, base))
}

/// The sprp test without precondition checks. Callers in this module only
/// pass odd x > 2 that are not divisible by the witness.
fn sprp_unchecked<T: DoubleWidth>(x: T, base: T) -> bool {
    let x_minus_one = x.pred();
    let mut d = x_minus_one.clone();
    let mut s = 0u32;
    while !d.is_odd() {
        d = d.half();
        s += 1;
    }
    let mut bpow = expmod_safe(base, d, x.clone());
    if bpow == T::one() {
        return true;
    }
    for _ in 0..s {
        if bpow == x_minus_one {
            return true;
        }
        bpow = mulmod(bpow.clone(), bpow, x.clone());
    }
    false
}

/// Deterministic primality test for the full u32 range.
pub fn is_prime_32(n: u32) -> bool {
    if n <= 61 {
        return SMALL_PRIMES_32.contains(&n);
    }
    if n % 2 == 0 || n % 7 == 0 || n % 61 == 0 {
        return false;
    }
    WITNESSES_32.iter().all(|&b| sprp_unchecked(n, b))
}

/// Deterministic primality test for the full u64 range.
pub fn is_prime_64(n: u64) -> bool {
    if n <= 37 {
        return WITNESSES_64.contains(&n);
    }
    if WITNESSES_64.iter().any(|&p| n % p == 0) {
        return false;
    }
    WITNESSES_64.iter().all(|&b| sprp_unchecked(n, b))
}

/// The first prime p > n, or `None` if no such prime fits in a u32.
pub fn next_prime_32(n: u32) -> Option<u32> {
    let mut candidate = n;
    loop {
        candidate = candidate.checked_add(1)?;
        if is_prime_32(candidate) {
            return Some(candidate);
        }
    }
}

/// The first prime p > n, or `None` if no such prime fits in a u64.
pub fn next_prime_64(n: u64) -> Option<u64> {
    let mut candidate = n;
    loop {
        candidate = candidate.checked_add(1)?;
        if is_prime_64(candidate) {
            return Some(candidate);
        }
    }
}

/// Width-dispatched access to the deterministic test.
pub trait Primality: Sized {
    fn is_prime(self) -> bool;
    fn next_prime(self) -> Option<Self>;
}

impl Primality for u32 {
    fn is_prime(self) -> bool {
        is_prime_32(self)
    }
    fn next_prime(self) -> Option<u32> {
        next_prime_32(self)
    }
}

impl Primality for u64 {
    fn is_prime(self) -> bool {
        is_prime_64(self)
    }
    fn next_prime(self) -> Option<u64> {
        next_prime_64(self)
    }
}
