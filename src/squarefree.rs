//! # Squarefree — Counting Squarefree Integers with a Möbius Table
//!
//! Counts n in [1, x] with no square factor > 1, for any x up to a limit L
//! fixed at construction.
//!
//! ## Algorithm: Möbius Inclusion–Exclusion
//!
//! Q(x) = Σ_{d=1}^{⌊√x⌋} μ(d)·⌊x / d²⌋
//!
//! μ is tabulated once for d ≤ √L. Each query is then O(√x).
//!
//! ## Algorithm: Product-Encoded Möbius Sieve
//!
//! Seed μ = 1 on [1, √L]. For each i from 2 to L^(1/4) with μ[i] still 1
//! (i is prime), multiply μ at every multiple of i by -i and zero μ at every
//! multiple of i². Afterwards a squarefree d holds ±(product of its small
//! prime factors). Since d ≤ √L, at most one prime factor of d exceeds
//! L^(1/4), and it is present exactly when |μ[d]| < d. Normalizing:
//!
//! | entry | meaning | μ(d) |
//! |---|---|---|
//! | d | even number of primes, all small | 1 |
//! | -d | odd number of primes, all small | -1 |
//! | negative, ≠ -d | odd small + one large | 1 |
//! | positive, ≠ d | even small + one large | -1 |
//! | 0 | square factor | 0 |
//!
//! Construction: O(√L log log √L) time, O(√L) space.

use anyhow::{ensure, Result};
use tracing::debug;

/// Exact ⌊√x⌋ for x ≥ 0, and 0 for negative x.
pub fn isqrt(x: i64) -> i64 {
    if x <= 0 {
        return 0;
    }
    let mut r = (x as f64).sqrt() as i64;
    while (r as i128) * (r as i128) > x as i128 {
        r -= 1;
    }
    while ((r + 1) as i128) * ((r + 1) as i128) <= x as i128 {
        r += 1;
    }
    r
}

/// Squarefree counting up to a fixed limit.
#[derive(Clone, Debug)]
pub struct SquarefreeCounter {
    limit: i64,
    sqrt_limit: i64,
    /// μ(d) at index d; index 0 unused.
    mu: Vec<i8>,
}

impl SquarefreeCounter {
    /// Tabulate μ up to √limit. Requires `limit >= 1`.
    pub fn new(limit: i64) -> Result<Self> {
        ensure!(limit >= 1, "squarefree counter limit must be at least 1, got {}", limit);
        let sqrt_limit = isqrt(limit);
        let quartic_root = isqrt(sqrt_limit);
        let size = sqrt_limit as usize;

        let mut product = vec![1i64; size + 1];
        product[0] = 0;
        for i in 2..=quartic_root as usize {
            if product[i] != 1 {
                continue;
            }
            let minus_i = -(i as i64);
            for j in (i..=size).step_by(i) {
                product[j] *= minus_i;
            }
            for j in (i * i..=size).step_by(i * i) {
                product[j] = 0;
            }
        }

        let mu = product
            .iter()
            .enumerate()
            .map(|(d, &p)| normalize(d as i64, p))
            .collect();

        debug!(limit, sqrt_limit, "built Möbius table");
        Ok(SquarefreeCounter {
            limit,
            sqrt_limit,
            mu,
        })
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// μ(d) for 1 ≤ d ≤ √limit.
    pub fn mobius(&self, d: i64) -> Option<i8> {
        if d < 1 || d > self.sqrt_limit {
            return None;
        }
        Some(self.mu[d as usize])
    }

    /// Number of squarefree n with 1 ≤ n ≤ x. Zero is not squarefree.
    /// Fails if `x` exceeds the limit given at construction.
    pub fn count_squarefree_up_to(&self, x: i64) -> Result<i64> {
        ensure!(
            x <= self.limit,
            "count_squarefree_up_to({}) is out of range: limit is {}",
            x,
            self.limit
        );
        let mut count = 0i64;
        for d in 1..=isqrt(x) {
            count += self.mu[d as usize] as i64 * (x / (d * d));
        }
        Ok(count)
    }
}

/// Turn a product-encoded sieve entry for d into μ(d).
fn normalize(d: i64, product: i64) -> i8 {
    if d == 1 {
        1
    } else if product == 0 {
        0
    } else if product == d {
        1
    } else if product == -d {
        -1
    } else if product < 0 {
        1
    } else {
        -1
    }
}
