use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use ark_bn254::{Bn254, Fr};
use ark_circom::{read_zkey, CircomReduction, WitnessCalculator};
use ark_ff::PrimeField;
use ark_groth16::{prepare_verifying_key, Groth16, Proof, ProvingKey, VerifyingKey};
use ark_relations::r1cs::ConstraintMatrices;
use ark_std::UniformRand;
use num_bigint::{BigInt, Sign};
use tracing::{debug, error, info, warn};
use wasmer::Store;

use crate::{error::ProofError, solidity::encode_output, witness::SemaphoreWitness};

/// Public signals of the Semaphore circuit, in circuit order.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct PublicSignals {
    pub merkle_root: Fr,
    pub nullifier_hash: Fr,
    pub signal_hash: Fr,
    pub external_nullifier: Fr,
}

impl PublicSignals {
    pub const COUNT: usize = 4;

    pub fn from_slice(signals: &[Fr]) -> Result<Self, ProofError> {
        match signals {
            [merkle_root, nullifier_hash, signal_hash, external_nullifier] => Ok(Self {
                merkle_root: *merkle_root,
                nullifier_hash: *nullifier_hash,
                signal_hash: *signal_hash,
                external_nullifier: *external_nullifier,
            }),
            _ => Err(ProofError::PublicSignalCount {
                expected: Self::COUNT,
                actual: signals.len(),
            }),
        }
    }

    pub fn to_vec(&self) -> Vec<Fr> {
        vec![
            self.merkle_root,
            self.nullifier_hash,
            self.signal_hash,
            self.external_nullifier,
        ]
    }
}

pub trait ProofSystem {
    fn prove(
        &self,
        witness: &SemaphoreWitness,
    ) -> Result<(Proof<Bn254>, PublicSignals), ProofError>;
}

/// Groth16 prover for a circom circuit: the witness comes from the compiled wasm, the proving key
/// and constraint matrices from the zkey.
pub struct CircomProver {
    wasm: PathBuf,
    proving_key: ProvingKey<Bn254>,
    matrices: ConstraintMatrices<Fr>,
}

impl CircomProver {
    pub fn load(wasm: &Path, zkey: &Path) -> Result<Self, ProofError> {
        let file = File::open(zkey).map_err(|source| ProofError::Read {
            path: zkey.to_path_buf(),
            source,
        })?;
        let (proving_key, matrices) = read_zkey(&mut BufReader::new(file))
            .map_err(|err| ProofError::ProvingKey(err.to_string()))?;
        debug!(
            constraints = matrices.num_constraints,
            public_inputs = matrices.num_instance_variables.saturating_sub(1),
            "Loaded proving key"
        );

        Ok(Self {
            wasm: wasm.to_path_buf(),
            proving_key,
            matrices,
        })
    }

    fn calculate_assignment(&self, witness: &SemaphoreWitness) -> Result<Vec<Fr>, ProofError> {
        let mut store = Store::default();
        let mut calculator = WitnessCalculator::new(&mut store, &self.wasm)
            .map_err(|err| ProofError::WitnessCalculation(err.to_string()))?;
        let assignment = calculator
            .calculate_witness(&mut store, witness.circom_inputs(), false)
            .map_err(|err| ProofError::WitnessCalculation(err.to_string()))?;

        Ok(assignment.iter().map(bigint_to_field).collect())
    }
}

impl ProofSystem for CircomProver {
    fn prove(
        &self,
        witness: &SemaphoreWitness,
    ) -> Result<(Proof<Bn254>, PublicSignals), ProofError> {
        let assignment = self.calculate_assignment(witness)?;
        let inputs = public_inputs(
            self.matrices.num_instance_variables,
            self.matrices.num_witness_variables,
            &assignment,
        )?;
        let num_inputs = self.matrices.num_instance_variables;

        let mut rng = rand::thread_rng();
        let r = Fr::rand(&mut rng);
        let s = Fr::rand(&mut rng);
        let proof = Groth16::<Bn254, CircomReduction>::create_proof_with_reduction_and_matrices(
            &self.proving_key,
            r,
            s,
            &self.matrices,
            num_inputs,
            self.matrices.num_constraints,
            &assignment,
        )?;

        Ok((proof, PublicSignals::from_slice(inputs)?))
    }
}

pub fn verify(
    verifying_key: &VerifyingKey<Bn254>,
    proof: &Proof<Bn254>,
    public_signals: &PublicSignals,
) -> Result<bool, ProofError> {
    let prepared = prepare_verifying_key(verifying_key);
    Ok(Groth16::<Bn254>::verify_proof(
        &prepared,
        proof,
        &public_signals.to_vec(),
    )?)
}

/// Proof together with what the circuit exposed about it.
#[derive(Clone, Debug)]
pub struct GeneratedProof {
    pub proof: Proof<Bn254>,
    pub public_signals: PublicSignals,
    pub verified: bool,
}

impl GeneratedProof {
    /// Nullifier hash and packed proof, ABI-encoded for the airdrop contract.
    pub fn abi_encode(&self) -> Vec<u8> {
        encode_output(&self.public_signals.nullifier_hash, &self.proof)
    }
}

/// Proves `witness` and checks the result against `verifying_key`. A proof that doesn't verify is
/// still returned: the failure is only logged.
pub fn generate_proof(
    prover: &impl ProofSystem,
    verifying_key: &VerifyingKey<Bn254>,
    witness: &SemaphoreWitness,
) -> Result<GeneratedProof, ProofError> {
    let expected = witness.expected_public_signals()?;
    let (proof, public_signals) = prover.prove(witness)?;
    if public_signals != expected {
        warn!(
            ?public_signals,
            ?expected,
            "Circuit public signals differ from the locally computed ones"
        );
    }

    let verified = verify(verifying_key, &proof, &public_signals)?;
    if verified {
        info!("Proof verified");
    } else {
        error!("Generated proof failed to verify");
    }

    Ok(GeneratedProof {
        proof,
        public_signals,
        verified,
    })
}

/// Public inputs of a full assignment, after checking it covers every variable of the circuit the
/// proving key was made for. A wasm and zkey of different circuits fail here.
fn public_inputs(
    num_instance_variables: usize,
    num_witness_variables: usize,
    assignment: &[Fr],
) -> Result<&[Fr], ProofError> {
    let expected = num_instance_variables + num_witness_variables;
    let mismatch = ProofError::AssignmentLength {
        expected,
        actual: assignment.len(),
    };
    if assignment.len() < expected {
        return Err(mismatch);
    }
    // The first assignment entry is the constant one.
    assignment
        .get(1..num_instance_variables)
        .ok_or(mismatch)
}

/// Witness values may come back negative; those are taken modulo the field order.
fn bigint_to_field(value: &BigInt) -> Fr {
    let (sign, magnitude) = value.to_bytes_be();
    let element = Fr::from_be_bytes_mod_order(&magnitude);
    match sign {
        Sign::Minus => -element,
        _ => element,
    }
}
