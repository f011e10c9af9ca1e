use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rug::Integer;

use seqverify::generators::TrialDivisionPrimes;
use seqverify::modular::{expmod_safe, mulmod};
use seqverify::primality::{is_prime_32, is_prime_64};
use seqverify::primes::Primes;
use seqverify::sequence::VectorSequence;
use seqverify::squarefree::SquarefreeCounter;
use seqverify::{verify_sequences, Sequence};

fn bench_mulmod_u64(c: &mut Criterion) {
    c.bench_function("mulmod(u64, near 2^64)", |b| {
        b.iter(|| {
            mulmod(
                black_box(0xFFFF_FFFF_FFFF_FFC4u64),
                black_box(0xFFFF_FFFF_FFFF_FF9Du64),
                black_box(18_446_744_073_709_551_557u64),
            )
        });
    });
}

fn bench_expmod_u64(c: &mut Criterion) {
    c.bench_function("expmod_safe(u64)", |b| {
        b.iter(|| {
            expmod_safe(
                black_box(123_456_789u64),
                black_box(987_654_321u64),
                black_box(1_000_000_007u64),
            )
        });
    });
}

fn bench_is_prime_32(c: &mut Criterion) {
    // 2^31 - 1
    c.bench_function("is_prime_32(M31)", |b| {
        b.iter(|| is_prime_32(black_box(2_147_483_647)));
    });
}

fn bench_is_prime_64(c: &mut Criterion) {
    // largest prime below 2^64
    c.bench_function("is_prime_64(2^64 - 59)", |b| {
        b.iter(|| is_prime_64(black_box(18_446_744_073_709_551_557)));
    });
}

fn bench_gmp_is_probably_prime(c: &mut Criterion) {
    let n = Integer::from(18_446_744_073_709_551_557u64);
    c.bench_function("Integer::is_probably_prime(2^64 - 59, 30)", |b| {
        b.iter(|| black_box(&n).is_probably_prime(30));
    });
}

fn bench_primes_u64(c: &mut Criterion) {
    c.bench_function("Primes::<u64> first 10_000", |b| {
        b.iter(|| Primes::<u64>::new().take_terms(black_box(10_000)));
    });
}

fn bench_primes_integer(c: &mut Criterion) {
    c.bench_function("Primes::<Integer> first 10_000", |b| {
        b.iter(|| Primes::<Integer>::new().take_terms(black_box(10_000)));
    });
}

fn bench_trial_division(c: &mut Criterion) {
    c.bench_function("TrialDivisionPrimes first 10_000", |b| {
        b.iter(|| TrialDivisionPrimes::new().take_terms(black_box(10_000)));
    });
}

fn bench_squarefree_table(c: &mut Criterion) {
    c.bench_function("SquarefreeCounter::new(10^12)", |b| {
        b.iter(|| SquarefreeCounter::new(black_box(1_000_000_000_000)));
    });
}

fn bench_squarefree_query(c: &mut Criterion) {
    let counter = SquarefreeCounter::new(1_000_000_000_000).unwrap();
    c.bench_function("count_squarefree_up_to(10^12)", |b| {
        b.iter(|| counter.count_squarefree_up_to(black_box(1_000_000_000_000)));
    });
}

fn bench_verify_primes(c: &mut Criterion) {
    let reference = VectorSequence::new(Primes::<u64>::new().take_terms(5_000));
    let sieve = Primes::<u64>::new();
    c.bench_function("verify sieve against 5_000 listed primes", |b| {
        b.iter(|| verify_sequences(black_box(&sieve), black_box(&reference)));
    });
}

criterion_group!(
    benches,
    bench_mulmod_u64,
    bench_expmod_u64,
    bench_is_prime_32,
    bench_is_prime_64,
    bench_gmp_is_probably_prime,
    bench_primes_u64,
    bench_primes_integer,
    bench_trial_division,
    bench_squarefree_table,
    bench_squarefree_query,
    bench_verify_primes,
);
criterion_main!(benches);
