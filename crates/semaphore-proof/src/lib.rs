//! Semaphore proof generation for a fixed test identity, with the output ABI-encoded for the
//! airdrop contract.

pub mod cli;
mod error;
pub mod hashing;
pub mod identity;
pub mod merkle;
pub mod prover;
pub mod solidity;
pub mod verification_key;
pub mod witness;

pub use error::{ProofError, VerificationKeyError};
pub use identity::{Identity, TEST_IDENTITY_MESSAGE};
pub use merkle::{MerkleProof, TREE_DEPTH};
pub use prover::{
    generate_proof, verify, CircomProver, GeneratedProof, ProofSystem, PublicSignals,
};
pub use solidity::{encode_output, pack_proof, write_hex};
pub use witness::SemaphoreWitness;
