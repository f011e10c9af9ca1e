//! CLI integration tests using assert_cmd.
//!
//! Every test runs the real binary. Checks that read reference terms use a
//! temporary stripped catalog, and a temporary config caps the index so
//! infinite-vs-infinite comparisons end quickly.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::{path_str, temp_file, FAST_CONFIG, STRIPPED_SAMPLE};

#[allow(deprecated)]
fn seqverify() -> Command {
    let mut cmd = Command::cargo_bin("seqverify").unwrap();
    cmd.env_remove("SEQVERIFY_CATALOG")
        .env_remove("LOG_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

// --- Help and arg validation ---

#[test]
fn help_shows_all_subcommands() {
    seqverify().arg("--help").assert().success().stdout(
        predicate::str::contains("primes")
            .and(predicate::str::contains("is-prime"))
            .and(predicate::str::contains("next-prime"))
            .and(predicate::str::contains("squarefree"))
            .and(predicate::str::contains("check")),
    );
}

#[test]
fn help_check_shows_args() {
    seqverify()
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--all")
                .and(predicate::str::contains("--json"))
                .and(predicate::str::contains("--catalog")),
        );
}

#[test]
fn unknown_subcommand_fails() {
    seqverify()
        .arg("nonexistent")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn invalid_width_fails() {
    seqverify()
        .args(["primes", "--width", "16"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

// --- Generation ---

#[test]
fn primes_prints_first_terms() {
    seqverify()
        .args(["primes", "--count", "5"])
        .assert()
        .success()
        .stdout("2\n3\n5\n7\n11\n");
}

#[test]
fn primes_in_every_width_agree() {
    for width in ["32", "64", "big"] {
        seqverify()
            .args(["primes", "--count", "8", "--width", width])
            .assert()
            .success()
            .stdout("2\n3\n5\n7\n11\n13\n17\n19\n");
    }
}

#[test]
fn is_prime_answers() {
    seqverify()
        .args(["is-prime", "2147483647"])
        .assert()
        .success()
        .stdout("prime\n");
    // strong pseudoprime to bases 2, 3, 5 and 7
    seqverify()
        .args(["is-prime", "3215031751"])
        .assert()
        .success()
        .stdout("composite\n");
}

#[test]
fn next_prime_scans_forward() {
    seqverify()
        .args(["next-prime", "100"])
        .assert()
        .success()
        .stdout("101\n");
}

#[test]
fn next_prime_past_largest_u64_prime_fails() {
    seqverify()
        .args(["next-prime", "18446744073709551557"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fits in 64 bits"));
}

#[test]
fn squarefree_counts() {
    seqverify()
        .args(["squarefree", "1000000"])
        .assert()
        .success()
        .stdout("607926\n");
    seqverify()
        .args(["squarefree", "10", "--limit", "100"])
        .assert()
        .success()
        .stdout("7\n");
}

#[test]
fn squarefree_beyond_limit_fails() {
    seqverify()
        .args(["squarefree", "10", "--limit", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

// --- Cross-checking ---

#[test]
fn check_primes_against_catalog() {
    let catalog = temp_file(STRIPPED_SAMPLE);
    let config = temp_file(FAST_CONFIG);
    seqverify()
        .args(["--catalog", &path_str(catalog.path())])
        .args(["--config", &path_str(config.path())])
        .args(["check", "A000040"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("oeis vs sieve: LEFT AGREE_TO_EMPTY: A[20] = _")
                .and(predicate::str::contains("oeis vs trial-division: LEFT AGREE_TO_EMPTY"))
                .and(predicate::str::contains("sieve vs trial-division: BOTH AGREE_TO_INDEX")),
        );
}

#[test]
fn check_reads_catalog_from_env() {
    let catalog = temp_file(STRIPPED_SAMPLE);
    let config = temp_file(FAST_CONFIG);
    seqverify()
        .env("SEQVERIFY_CATALOG", catalog.path())
        .args(["--config", &path_str(config.path())])
        .args(["check", "290"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("oeis vs n-squared")
                .and(predicate::str::contains("n-squared vs filtered: BOTH AGREE_TO_INDEX")),
        );
}

#[test]
fn check_squarefree_counts() {
    let catalog = temp_file(STRIPPED_SAMPLE);
    let config = temp_file(FAST_CONFIG);
    seqverify()
        .args(["--catalog", &path_str(catalog.path())])
        .args(["--config", &path_str(config.path())])
        .args(["check", "a13928"])
        .assert()
        .success()
        .stdout(predicate::str::contains("oeis vs mobius: LEFT AGREE_TO_EMPTY: A[21] = _"));
}

#[test]
fn check_without_catalog_compares_generators_only() {
    let config = temp_file(FAST_CONFIG);
    seqverify()
        .args(["--config", &path_str(config.path())])
        .args(["check", "A000040"])
        .assert()
        .success()
        .stdout(predicate::str::contains("oeis").not())
        .stderr(predicate::str::contains("no catalog configured"));
}

#[test]
fn check_wrong_catalog_fails() {
    let catalog = temp_file("A000040 ,2,3,5,7,9,11,13,15,\n");
    let config = temp_file(FAST_CONFIG);
    seqverify()
        .args(["--catalog", &path_str(catalog.path())])
        .args(["--config", &path_str(config.path())])
        .args(["check", "A000040", "--all"])
        .assert()
        .failure()
        .stdout(
            predicate::str::contains("oeis vs sieve: BOTH DISAGREE: A[4] = 9, B[4] = 11")
                .and(predicate::str::contains("oeis vs sieve: BOTH DISAGREE: A[5] = 11, B[5] = 13")),
        )
        .stderr(predicate::str::contains("2 of 3 pairs disagree for A000040"));
}

#[test]
fn check_json_output() {
    let catalog = temp_file(STRIPPED_SAMPLE);
    let config = temp_file(FAST_CONFIG);
    let output = seqverify()
        .args(["--catalog", &path_str(catalog.path())])
        .args(["--config", &path_str(config.path())])
        .args(["check", "A000290", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let pairs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let pairs = pairs.as_array().unwrap();
    assert_eq!(pairs.len(), 3);
    assert_eq!(pairs[0]["left"], "oeis");
    assert_eq!(pairs[0]["agrees"], true);
    assert_eq!(pairs[0]["results"][0]["status"], "AGREE_TO_EMPTY");
    assert_eq!(pairs[0]["results"][0]["which_side"], "LEFT");
    assert_eq!(pairs[2]["results"][0]["status"], "AGREE_TO_INDEX");
}

#[test]
fn check_unknown_sequence_fails() {
    seqverify()
        .args(["check", "A000001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no generators for A000001"));
}

#[test]
fn check_sequence_missing_from_catalog_fails() {
    let catalog = temp_file("A000290 ,0,1,4,\n");
    seqverify()
        .args(["--catalog", &path_str(catalog.path())])
        .args(["check", "A000040"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in catalog"));
}

#[test]
fn check_invalid_config_fails() {
    let config = temp_file("[limits.float]\nmax_index = 1\n");
    seqverify()
        .args(["--config", &path_str(config.path())])
        .args(["check", "A000040"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown element type 'float'"));
}

#[test]
fn check_on_single_thread_keeps_pair_order() {
    let catalog = temp_file(STRIPPED_SAMPLE);
    let config = temp_file(FAST_CONFIG);
    let output = seqverify()
        .args(["--catalog", &path_str(catalog.path())])
        .args(["--config", &path_str(config.path())])
        .args(["--threads", "1", "check", "A000040"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lefts: Vec<&str> = stdout.lines().map(|l| l.split(':').next().unwrap()).collect();
    assert_eq!(
        lefts,
        vec!["oeis vs sieve", "oeis vs trial-division", "sieve vs trial-division"]
    );
}
