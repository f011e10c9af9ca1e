//! # Modular — Overflow-Safe Modular Arithmetic Kernel
//!
//! Width-doubling modular multiplication and exponentiation shared by the
//! primality oracle and the prime generator. Provides:
//!
//! 1. **`ModInt`**: the small set of integer operations the kernel needs,
//!    implemented for native integers and `rug::Integer`.
//! 2. **`DoubleWidth`**: maps each type to a representation at least twice as
//!    wide (u32 → u64, u64 → u128, u128 → `Integer`, `Integer` → `Integer`).
//! 3. **`mulmod`** / **`expmod_safe`**: promote operands before multiplying,
//!    so a product of two residues never overflows, then narrow back.
//! 4. **`expmod_unsafe`**: square-and-multiply in the caller's own width.
//!
//! ## Algorithm: Square-and-Multiply
//!
//! Scans the exponent from the least significant bit. Each step squares the
//! running base and multiplies it into the result when the bit is set.
//! Complexity: O(log e) multiplications, each followed by one reduction.
//! Intermediate products are bounded by m², which is why `expmod_safe`
//! evaluates the loop in the doubled width.

use rug::Integer;
use std::cmp::Ordering;

/// Integer operations required by the modular kernel and the incremental sieve.
///
/// Operands are assumed non-negative. `mul_rem` multiplies in the type's own
/// width; use [`mulmod`] when the product may not fit.
pub trait ModInt: Clone + PartialEq + PartialOrd {
    fn zero() -> Self;
    fn one() -> Self;
    fn from_u32(value: u32) -> Self;
    fn is_zero(&self) -> bool;
    fn is_odd(&self) -> bool;
    /// `self / 2`, rounding down.
    fn half(&self) -> Self;
    /// `self - 1`. Callers guarantee `self > 0`.
    fn pred(&self) -> Self;
    fn rem(&self, modulus: &Self) -> Self;
    fn mul_rem(&self, rhs: &Self, modulus: &Self) -> Self;
    fn checked_add(&self, rhs: &Self) -> Option<Self>;
    fn checked_mul(&self, rhs: &Self) -> Option<Self>;
}

/// Width-doubling promotion used to keep products of residues exact.
pub trait DoubleWidth: ModInt {
    type Wide: ModInt;

    fn widen(&self) -> Self::Wide;

    /// Narrow a value that is known to fit back into `Self` (a residue
    /// modulo some `m: Self`).
    fn narrow(wide: &Self::Wide) -> Self;
}

macro_rules! impl_mod_int {
    ($($t:ty),*) => {$(
        impl ModInt for $t {
            #[inline]
            fn zero() -> Self {
                0
            }
            #[inline]
            fn one() -> Self {
                1
            }
            #[inline]
            fn from_u32(value: u32) -> Self {
                value as $t
            }
            #[inline]
            fn is_zero(&self) -> bool {
                *self == 0
            }
            #[inline]
            fn is_odd(&self) -> bool {
                *self % 2 != 0
            }
            #[inline]
            fn half(&self) -> Self {
                *self / 2
            }
            #[inline]
            fn pred(&self) -> Self {
                *self - 1
            }
            #[inline]
            fn rem(&self, modulus: &Self) -> Self {
                *self % *modulus
            }
            #[inline]
            fn mul_rem(&self, rhs: &Self, modulus: &Self) -> Self {
                (*self * *rhs) % *modulus
            }
            #[inline]
            fn checked_add(&self, rhs: &Self) -> Option<Self> {
                <$t>::checked_add(*self, *rhs)
            }
            #[inline]
            fn checked_mul(&self, rhs: &Self) -> Option<Self> {
                <$t>::checked_mul(*self, *rhs)
            }
        }
    )*};
}

impl_mod_int!(u8, u16, u32, u64, u128, i32, i64, i128);

impl ModInt for Integer {
    fn zero() -> Self {
        Integer::new()
    }
    fn one() -> Self {
        Integer::from(1u32)
    }
    fn from_u32(value: u32) -> Self {
        Integer::from(value)
    }
    fn is_zero(&self) -> bool {
        self.cmp0() == Ordering::Equal
    }
    fn is_odd(&self) -> bool {
        Integer::is_odd(self)
    }
    fn half(&self) -> Self {
        self.clone() >> 1u32
    }
    fn pred(&self) -> Self {
        self.clone() - 1u32
    }
    fn rem(&self, modulus: &Self) -> Self {
        self.clone() % modulus
    }
    fn mul_rem(&self, rhs: &Self, modulus: &Self) -> Self {
        Integer::from(self * rhs) % modulus
    }
    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        Some(Integer::from(self + rhs))
    }
    fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        Some(Integer::from(self * rhs))
    }
}

macro_rules! impl_double_width {
    ($($narrow:ty => $wide:ty),*) => {$(
        impl DoubleWidth for $narrow {
            type Wide = $wide;

            #[inline]
            fn widen(&self) -> $wide {
                *self as $wide
            }
            #[inline]
            fn narrow(wide: &$wide) -> Self {
                *wide as $narrow
            }
        }
    )*};
}

impl_double_width!(u8 => u16, u16 => u32, u32 => u64, u64 => u128, i32 => i64, i64 => i128);

impl DoubleWidth for u128 {
    type Wide = Integer;

    fn widen(&self) -> Integer {
        Integer::from(*self)
    }
    fn narrow(wide: &Integer) -> Self {
        wide.to_u128_wrapping()
    }
}

impl DoubleWidth for i128 {
    type Wide = Integer;

    fn widen(&self) -> Integer {
        Integer::from(*self)
    }
    fn narrow(wide: &Integer) -> Self {
        wide.to_i128_wrapping()
    }
}

impl DoubleWidth for Integer {
    type Wide = Integer;

    fn widen(&self) -> Integer {
        self.clone()
    }
    fn narrow(wide: &Integer) -> Self {
        wide.clone()
    }
}

/// Compute `a * b mod m` without overflow. Requires `m > 0`.
pub fn mulmod<T: DoubleWidth>(a: T, b: T, m: T) -> T {
    let product = a.widen().mul_rem(&b.widen(), &m.widen());
    T::narrow(&product)
}

/// Compute `b^e mod m` by square-and-multiply in `T` itself.
///
/// Intermediate products reach (m-1)², so this is only correct when that
/// fits in `T`. `e = 0` yields 1.
pub fn expmod_unsafe<T: ModInt>(b: &T, e: &T, m: &T) -> T {
    if e.is_zero() {
        return T::one();
    }
    let mut result = T::one().rem(m);
    let mut base = b.rem(m);
    let mut exp = e.clone();
    while !exp.is_zero() {
        if exp.is_odd() {
            result = result.mul_rem(&base, m);
        }
        exp = exp.half();
        if !exp.is_zero() {
            base = base.mul_rem(&base, m);
        }
    }
    result
}

/// Compute `b^e mod m` without overflow: runs [`expmod_unsafe`] in the
/// doubled width, where every square of a residue fits. Requires `m > 0`.
pub fn expmod_safe<T: DoubleWidth>(b: T, e: T, m: T) -> T {
    let wide = expmod_unsafe(&b.widen(), &e.widen(), &m.widen());
    T::narrow(&wide)
}

/// Greatest common divisor (Euclid).
pub fn gcd<T: ModInt>(a: &T, b: &T) -> T {
    let mut a = a.clone();
    let mut b = b.clone();
    while !b.is_zero() {
        let t = a.rem(&b);
        a = b;
        b = t;
    }
    a
}
