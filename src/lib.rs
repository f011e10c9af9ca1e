pub mod catalog;
pub mod config;
pub mod generators;
pub mod modular;
pub mod primality;
pub mod primes;
pub mod sequence;
pub mod squarefree;
pub mod verify;

pub use sequence::{Entry, Sequence, Term, VerificationLimit};
pub use verify::{
    all_disagreements, print_all_disagreements, sequences_agree, verify_sequences, LimitRegistry,
    Verification, VerificationSide, VerificationStatus, Verifier,
};
