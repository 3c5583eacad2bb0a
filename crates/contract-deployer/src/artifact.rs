use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy_dyn_abi::{DynSolValue, Specifier};
use alloy_json_abi::JsonAbi;
use alloy_primitives::Bytes;
use serde::Deserialize;
use thiserror::Error;

/// Where `forge build` puts the artifact of `src/Contract.sol`.
pub const DEFAULT_ARTIFACT_PATH: &str = "./out/Contract.sol/Contract.json";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Couldn't read artifact file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact")]
    Malformed(#[from] serde_json::Error),

    #[error("Constructor expects {expected} arguments, but {actual} were provided")]
    ArgumentCount { expected: usize, actual: usize },

    #[error("Invalid value `{value}` for constructor parameter `{name}`")]
    InvalidArgument {
        name: String,
        value: String,
        #[source]
        source: alloy_dyn_abi::Error,
    },
}

/// Compiled contract, as emitted by the build step.
#[derive(Clone, Debug, Deserialize)]
pub struct ContractArtifact {
    pub abi: JsonAbi,
    pub bytecode: BytecodeObject,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BytecodeObject {
    pub object: Bytes,
}

/// Raw constructor arguments, in the order of the constructor parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstructorArgs(Vec<String>);

impl ConstructorArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.0.push(value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for ConstructorArgs {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl ContractArtifact {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let json = fs::read_to_string(path).map_err(|source| ArtifactError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Creation code of the contract: the bytecode followed by the ABI-encoded constructor
    /// arguments. Every raw argument is coerced to the type of its constructor parameter.
    pub fn deployment_code(&self, args: &ConstructorArgs) -> Result<Bytes, ArtifactError> {
        let params = self
            .abi
            .constructor()
            .map(|constructor| constructor.inputs.as_slice())
            .unwrap_or_default();

        if params.len() != args.len() {
            return Err(ArtifactError::ArgumentCount {
                expected: params.len(),
                actual: args.len(),
            });
        }

        let values = params
            .iter()
            .zip(args.as_slice())
            .map(|(param, value)| {
                let invalid = |source| ArtifactError::InvalidArgument {
                    name: param.name.clone(),
                    value: value.clone(),
                    source,
                };
                param
                    .resolve()
                    .and_then(|ty| ty.coerce_str(value))
                    .map_err(invalid)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let encoded_args = DynSolValue::Tuple(values).abi_encode_params();
        Ok([self.bytecode.object.as_ref(), encoded_args.as_slice()]
            .concat()
            .into())
    }
}
