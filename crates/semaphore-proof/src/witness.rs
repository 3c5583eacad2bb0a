use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use light_poseidon::PoseidonError;
use num_bigint::{BigInt, Sign};
use serde::Serialize;

use crate::{
    hashing::{field_to_decimal, hash_bytes, poseidon},
    identity::{commitment, Identity},
    merkle::{fold_path, MerkleProof, TREE_DEPTH},
    prover::PublicSignals,
};

/// Private and public inputs of the Semaphore circuit.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct SemaphoreWitness {
    pub identity_nullifier: Fr,
    pub identity_trapdoor: Fr,
    pub tree_path_indices: Vec<u8>,
    pub tree_siblings: Vec<Fr>,
    pub external_nullifier: Fr,
    pub signal_hash: Fr,
}

/// Circuit input in the shape the circom witness calculator expects.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CircomInput {
    identity_nullifier: String,
    identity_trapdoor: String,
    tree_path_indices: Vec<u8>,
    tree_siblings: Vec<String>,
    external_nullifier: String,
    signal_hash: String,
}

impl SemaphoreWitness {
    pub fn build(
        identity: &Identity,
        merkle_proof: &MerkleProof,
        external_nullifier: &[u8],
        signal: &[u8],
    ) -> Self {
        Self {
            identity_nullifier: identity.nullifier(),
            identity_trapdoor: identity.trapdoor(),
            tree_path_indices: merkle_proof.path_indices.clone(),
            tree_siblings: merkle_proof.siblings.clone(),
            external_nullifier: hash_bytes(external_nullifier),
            signal_hash: hash_bytes(signal),
        }
    }

    /// Witness for the test identity, being the only member of an otherwise empty group.
    pub fn for_test_identity(
        external_nullifier: &[u8],
        signal: &[u8],
    ) -> Result<Self, PoseidonError> {
        let identity = Identity::test_identity();
        let merkle_proof =
            MerkleProof::single_leaf(TREE_DEPTH, Fr::from(0u64), identity.commitment()?)?;
        Ok(Self::build(&identity, &merkle_proof, external_nullifier, signal))
    }

    pub fn nullifier_hash(&self) -> Result<Fr, PoseidonError> {
        poseidon(&[self.external_nullifier, self.identity_nullifier])
    }

    pub fn merkle_root(&self) -> Result<Fr, PoseidonError> {
        let leaf = commitment(self.identity_nullifier, self.identity_trapdoor)?;
        fold_path(leaf, &self.tree_siblings, &self.tree_path_indices)
    }

    /// Public signals a correct proof for this witness must carry.
    pub fn expected_public_signals(&self) -> Result<PublicSignals, PoseidonError> {
        Ok(PublicSignals {
            merkle_root: self.merkle_root()?,
            nullifier_hash: self.nullifier_hash()?,
            signal_hash: self.signal_hash,
            external_nullifier: self.external_nullifier,
        })
    }

    /// Named inputs for the witness calculator.
    pub fn circom_inputs(&self) -> Vec<(String, Vec<BigInt>)> {
        let scalar = |name: &str, value: &Fr| (name.to_string(), vec![field_to_bigint(value)]);
        vec![
            scalar("identityNullifier", &self.identity_nullifier),
            scalar("identityTrapdoor", &self.identity_trapdoor),
            (
                "treePathIndices".to_string(),
                self.tree_path_indices.iter().map(|&i| BigInt::from(i)).collect(),
            ),
            (
                "treeSiblings".to_string(),
                self.tree_siblings.iter().map(field_to_bigint).collect(),
            ),
            scalar("externalNullifier", &self.external_nullifier),
            scalar("signalHash", &self.signal_hash),
        ]
    }

    /// Circom input JSON, with field elements as decimal strings.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&CircomInput {
            identity_nullifier: field_to_decimal(&self.identity_nullifier),
            identity_trapdoor: field_to_decimal(&self.identity_trapdoor),
            tree_path_indices: self.tree_path_indices.clone(),
            tree_siblings: self.tree_siblings.iter().map(field_to_decimal).collect(),
            external_nullifier: field_to_decimal(&self.external_nullifier),
            signal_hash: field_to_decimal(&self.signal_hash),
        })
    }
}

fn field_to_bigint(value: &Fr) -> BigInt {
    BigInt::from_bytes_be(Sign::Plus, &value.into_bigint().to_bytes_be())
}
