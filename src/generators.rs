//! # Generators — Independent Implementations for Cross-Validation
//!
//! Second and third opinions for the sequences the engines produce, written
//! the slow, obvious way so that agreement with the fast engines means
//! something:
//!
//! | Sequence | Fast engine | Here |
//! |---|---|---|
//! | A000040 primes | `Primes` (incremental sieve) | `TrialDivisionPrimes` |
//! | A000290 squares | none | `Squares`, `squares_up_to` |
//! | A013928 squarefree counts | `SquarefreeCounts` (Möbius) | `SquarefreeCountsBruteForce` |

use std::sync::Arc;

use anyhow::Result;

use crate::sequence::{Cursor, Sequence};
use crate::squarefree::SquarefreeCounter;

/// a(n) = n², ending when the square no longer fits in an i64.
#[derive(Clone, Debug, Default)]
pub struct Squares {
    cursor: Cursor<i64>,
}

impl Squares {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sequence<i64> for Squares {
    fn cursor(&self) -> &Cursor<i64> {
        &self.cursor
    }
    fn cursor_mut(&mut self) -> &mut Cursor<i64> {
        &mut self.cursor
    }
    fn term(&mut self) -> Option<i64> {
        let n = i64::try_from(self.cursor.index()).ok()?;
        n.checked_mul(n)
    }
}

/// All perfect squares in [0, limit], found by testing every integer.
pub fn squares_up_to(limit: i64) -> Vec<i64> {
    (0..=limit)
        .filter(|&x| {
            let r = crate::squarefree::isqrt(x);
            r * r == x
        })
        .collect()
}

/// Primes by trial division of every candidate.
#[derive(Clone, Debug)]
pub struct TrialDivisionPrimes {
    cursor: Cursor<i64>,
    current: i64,
}

impl Default for TrialDivisionPrimes {
    fn default() -> Self {
        TrialDivisionPrimes {
            cursor: Cursor::new(),
            current: 1,
        }
    }
}

impl TrialDivisionPrimes {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_prime(x: i64) -> bool {
        if x < 2 {
            return false;
        }
        let mut d = 2;
        while d * d <= x {
            if x % d == 0 {
                return false;
            }
            d += 1;
        }
        true
    }
}

impl Sequence<i64> for TrialDivisionPrimes {
    fn cursor(&self) -> &Cursor<i64> {
        &self.cursor
    }
    fn cursor_mut(&mut self) -> &mut Cursor<i64> {
        &mut self.cursor
    }
    fn term(&mut self) -> Option<i64> {
        loop {
            self.current = self.current.checked_add(1)?;
            if Self::is_prime(self.current) {
                return Some(self.current);
            }
        }
    }
}

/// a(n) = number of squarefree k ≤ n, through the Möbius counter. Ends once
/// n passes the counter's limit.
#[derive(Clone, Debug)]
pub struct SquarefreeCounts {
    cursor: Cursor<i64>,
    counter: Arc<SquarefreeCounter>,
}

impl SquarefreeCounts {
    pub fn new(limit: i64) -> Result<Self> {
        Ok(Self::with_counter(Arc::new(SquarefreeCounter::new(limit)?)))
    }

    /// Share an existing table. Clones share it too; the table is immutable.
    pub fn with_counter(counter: Arc<SquarefreeCounter>) -> Self {
        SquarefreeCounts {
            cursor: Cursor::new(),
            counter,
        }
    }
}

impl Sequence<i64> for SquarefreeCounts {
    fn cursor(&self) -> &Cursor<i64> {
        &self.cursor
    }
    fn cursor_mut(&mut self) -> &mut Cursor<i64> {
        &mut self.cursor
    }
    fn term(&mut self) -> Option<i64> {
        let n = i64::try_from(self.cursor.index()).ok()?;
        if n > self.counter.limit() {
            return None;
        }
        self.counter.count_squarefree_up_to(n).ok()
    }
}

/// a(n) = number of squarefree k ≤ n, keeping a running count and testing
/// each k against the squares seen so far.
#[derive(Clone, Debug)]
pub struct SquarefreeCountsBruteForce {
    cursor: Cursor<i64>,
    current: i64,
    count: i64,
    next_root: i64,
    squares: Vec<i64>,
}

impl Default for SquarefreeCountsBruteForce {
    fn default() -> Self {
        SquarefreeCountsBruteForce {
            cursor: Cursor::new(),
            current: 0,
            count: 0,
            next_root: 2,
            squares: Vec::new(),
        }
    }
}

impl SquarefreeCountsBruteForce {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_squarefree(&self, x: i64) -> bool {
        x != 0 && self.squares.iter().all(|s| x % s != 0)
    }
}

impl Sequence<i64> for SquarefreeCountsBruteForce {
    fn cursor(&self) -> &Cursor<i64> {
        &self.cursor
    }
    fn cursor_mut(&mut self) -> &mut Cursor<i64> {
        &mut self.cursor
    }
    fn term(&mut self) -> Option<i64> {
        if self.next_root * self.next_root == self.current {
            self.squares.push(self.current);
            self.next_root += 1;
        }
        if self.is_squarefree(self.current) {
            self.count += 1;
        }
        self.current = self.current.checked_add(1)?;
        Some(self.count)
    }
}
