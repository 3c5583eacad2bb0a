use std::path::PathBuf;

use ark_relations::r1cs::SynthesisError;
use light_poseidon::PoseidonError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProofError {
    #[error("Couldn't read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Poseidon hashing failed")]
    Poseidon(#[from] PoseidonError),

    #[error("Couldn't load the proving key: {0}")]
    ProvingKey(String),

    #[error("Witness calculation failed: {0}")]
    WitnessCalculation(String),

    #[error("Groth16 backend failed")]
    Synthesis(#[from] SynthesisError),

    #[error("Circuit has {expected} variables, the witness assigns {actual}")]
    AssignmentLength { expected: usize, actual: usize },

    #[error("Expected {expected} public signals, the circuit has {actual}")]
    PublicSignalCount { expected: usize, actual: usize },

    #[error("Invalid verification key")]
    VerificationKey(#[from] VerificationKeyError),

    #[error("Couldn't write the proof")]
    Output(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VerificationKeyError {
    #[error("Malformed verification key JSON")]
    Malformed(#[from] serde_json::Error),

    #[error("Unsupported proving system `{protocol}` on curve `{curve}`")]
    Unsupported { protocol: String, curve: String },

    #[error("Invalid field element `{0}`")]
    InvalidCoordinate(String),

    #[error("Point `{0}` is not a valid curve point")]
    InvalidPoint(&'static str),

    #[error("Key declares {declared} public inputs but has {actual} IC points")]
    PublicInputCount { declared: usize, actual: usize },
}
