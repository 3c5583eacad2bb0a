use std::io::{self, Write};

use alloy_primitives::U256;
use alloy_sol_types::SolValue;
use ark_bn254::{Bn254, Fr};
use ark_groth16::Proof;

use crate::hashing::field_to_u256;

/// Proof as the Solidity verifier takes it. G2 coordinates go imaginary part first.
pub fn pack_proof(proof: &Proof<Bn254>) -> [U256; 8] {
    [
        field_to_u256(&proof.a.x),
        field_to_u256(&proof.a.y),
        field_to_u256(&proof.b.x.c1),
        field_to_u256(&proof.b.x.c0),
        field_to_u256(&proof.b.y.c1),
        field_to_u256(&proof.b.y.c0),
        field_to_u256(&proof.c.x),
        field_to_u256(&proof.c.y),
    ]
}

/// `abi.encode(uint256 nullifierHash, uint256[8] proof)`.
pub fn encode_output(nullifier_hash: &Fr, proof: &Proof<Bn254>) -> Vec<u8> {
    (field_to_u256(nullifier_hash), pack_proof(proof)).abi_encode_params()
}

/// Writes `output` as a single `0x`-prefixed hex string, without a trailing newline.
pub fn write_hex(output: &[u8], out: &mut impl Write) -> io::Result<()> {
    write!(out, "0x{}", hex::encode(output))?;
    out.flush()
}
