use alloy_primitives::{keccak256, U256};
use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use light_poseidon::{Poseidon, PoseidonError, PoseidonHasher};
use num_bigint::BigUint;

/// Hashes arbitrary bytes into the scalar field the way the Semaphore contracts do:
/// `keccak256(bytes) >> 8`. The shift keeps the value below 2^248, so no reduction happens.
pub fn hash_bytes(bytes: &[u8]) -> Fr {
    let hash = U256::from_be_bytes(keccak256(bytes).0) >> 8;
    u256_to_field(hash)
}

/// Circom-compatible Poseidon over BN254, with as many inputs as given.
pub fn poseidon(inputs: &[Fr]) -> Result<Fr, PoseidonError> {
    let mut hasher = Poseidon::<Fr>::new_circom(inputs.len())?;
    hasher.hash(inputs)
}

pub fn u256_to_field(value: U256) -> Fr {
    Fr::from_be_bytes_mod_order(&value.to_be_bytes::<32>())
}

pub fn field_to_u256<F: PrimeField>(value: &F) -> U256 {
    U256::from_be_slice(&value.into_bigint().to_bytes_be())
}

/// Decimal representation, as used in circom inputs and snarkjs files.
pub fn field_to_decimal<F: PrimeField>(value: &F) -> String {
    BigUint::from_bytes_be(&value.into_bigint().to_bytes_be()).to_string()
}
