use std::{fs, path::Path, str::FromStr};

use ark_bn254::{Bn254, Fq, Fq2, G1Affine, G2Affine};
use ark_groth16::VerifyingKey;
use serde::Deserialize;

use crate::error::{ProofError, VerificationKeyError};

/// `verification_key.json` as exported by snarkjs. Points are projective with decimal coordinates;
/// G2 coordinates are `[c0, c1]` pairs.
#[derive(Deserialize)]
struct SnarkjsVerificationKey {
    protocol: String,
    curve: String,
    #[serde(rename = "nPublic")]
    n_public: usize,
    vk_alpha_1: [String; 3],
    vk_beta_2: [[String; 2]; 3],
    vk_gamma_2: [[String; 2]; 3],
    vk_delta_2: [[String; 2]; 3],
    #[serde(rename = "IC")]
    ic: Vec<[String; 3]>,
}

pub fn load(path: &Path) -> Result<VerifyingKey<Bn254>, ProofError> {
    let json = fs::read_to_string(path).map_err(|source| ProofError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&json)?)
}

pub fn parse(json: &str) -> Result<VerifyingKey<Bn254>, VerificationKeyError> {
    let key: SnarkjsVerificationKey = serde_json::from_str(json)?;

    if key.protocol != "groth16" || key.curve != "bn128" {
        return Err(VerificationKeyError::Unsupported {
            protocol: key.protocol,
            curve: key.curve,
        });
    }
    if key.ic.len() != key.n_public + 1 {
        return Err(VerificationKeyError::PublicInputCount {
            declared: key.n_public,
            actual: key.ic.len(),
        });
    }

    Ok(VerifyingKey {
        alpha_g1: g1_point(&key.vk_alpha_1, "vk_alpha_1")?,
        beta_g2: g2_point(&key.vk_beta_2, "vk_beta_2")?,
        gamma_g2: g2_point(&key.vk_gamma_2, "vk_gamma_2")?,
        delta_g2: g2_point(&key.vk_delta_2, "vk_delta_2")?,
        gamma_abc_g1: key
            .ic
            .iter()
            .map(|point| g1_point(point, "IC"))
            .collect::<Result<_, _>>()?,
    })
}

fn fq(value: &str) -> Result<Fq, VerificationKeyError> {
    Fq::from_str(value).map_err(|_| VerificationKeyError::InvalidCoordinate(value.to_string()))
}

fn fq2([c0, c1]: &[String; 2]) -> Result<Fq2, VerificationKeyError> {
    Ok(Fq2::new(fq(c0)?, fq(c1)?))
}

fn g1_point(
    [x, y, z]: &[String; 3],
    name: &'static str,
) -> Result<G1Affine, VerificationKeyError> {
    let point = match z.as_str() {
        "0" => G1Affine::identity(),
        "1" => G1Affine::new_unchecked(fq(x)?, fq(y)?),
        _ => return Err(VerificationKeyError::InvalidPoint(name)),
    };
    if point.is_on_curve() && point.is_in_correct_subgroup_assuming_on_curve() {
        Ok(point)
    } else {
        Err(VerificationKeyError::InvalidPoint(name))
    }
}

fn g2_point(
    [x, y, z]: &[[String; 2]; 3],
    name: &'static str,
) -> Result<G2Affine, VerificationKeyError> {
    let point = match [z[0].as_str(), z[1].as_str()] {
        ["0", "0"] => G2Affine::identity(),
        ["1", "0"] => G2Affine::new_unchecked(fq2(x)?, fq2(y)?),
        _ => return Err(VerificationKeyError::InvalidPoint(name)),
    };
    if point.is_on_curve() && point.is_in_correct_subgroup_assuming_on_curve() {
        Ok(point)
    } else {
        Err(VerificationKeyError::InvalidPoint(name))
    }
}
