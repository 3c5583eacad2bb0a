use ark_bn254::Fr;
use ark_ff::PrimeField;
use light_poseidon::PoseidonError;
use sha2::{Digest, Sha256};

use crate::hashing::poseidon;

/// Message the test identity is derived from.
pub const TEST_IDENTITY_MESSAGE: &str = "test-identity";

/// Semaphore identity: a trapdoor and a nullifier, both private.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Identity {
    trapdoor: Fr,
    nullifier: Fr,
}

impl Identity {
    /// Deterministically derives an identity from `message`. The message is hashed first, and
    /// each secret is the SHA-256 of the hex digest followed by a domain tag.
    pub fn from_message(message: &str) -> Self {
        let message_hash = hex::encode(Sha256::digest(message.as_bytes()));
        Self {
            trapdoor: derive_secret(&message_hash, "identity_trapdoor"),
            nullifier: derive_secret(&message_hash, "identity_nullifier"),
        }
    }

    pub fn test_identity() -> Self {
        Self::from_message(TEST_IDENTITY_MESSAGE)
    }

    pub fn trapdoor(&self) -> Fr {
        self.trapdoor
    }

    pub fn nullifier(&self) -> Fr {
        self.nullifier
    }

    pub fn secret(&self) -> Result<Fr, PoseidonError> {
        secret(self.nullifier, self.trapdoor)
    }

    /// Public commitment, the leaf inserted into the group tree.
    pub fn commitment(&self) -> Result<Fr, PoseidonError> {
        commitment(self.nullifier, self.trapdoor)
    }
}

pub fn secret(nullifier: Fr, trapdoor: Fr) -> Result<Fr, PoseidonError> {
    poseidon(&[nullifier, trapdoor])
}

pub fn commitment(nullifier: Fr, trapdoor: Fr) -> Result<Fr, PoseidonError> {
    poseidon(&[secret(nullifier, trapdoor)?])
}

fn derive_secret(message_hash: &str, tag: &str) -> Fr {
    let digest = Sha256::digest(format!("{message_hash}{tag}").as_bytes());
    Fr::from_be_bytes_mod_order(&digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_deterministic() {
        assert_eq!(Identity::test_identity(), Identity::test_identity());
    }

    #[test]
    fn different_messages_give_different_identities() {
        let first = Identity::from_message("test-identity");
        let second = Identity::from_message("other-identity");

        assert_ne!(first.trapdoor(), second.trapdoor());
        assert_ne!(first.nullifier(), second.nullifier());
    }

    #[test]
    fn trapdoor_and_nullifier_are_domain_separated() {
        let identity = Identity::test_identity();
        assert_ne!(identity.trapdoor(), identity.nullifier());
    }

    #[test]
    fn commitment_hashes_the_secret() {
        let identity = Identity::test_identity();
        let secret = poseidon(&[identity.nullifier(), identity.trapdoor()]).unwrap();

        assert_eq!(identity.secret().unwrap(), secret);
        assert_eq!(identity.commitment().unwrap(), poseidon(&[secret]).unwrap());
    }
}
