use std::path::PathBuf;

use alloy_primitives::Bytes;
use clap::{Parser, ValueEnum};

pub const DEFAULT_WASM_PATH: &str =
    "./lib/world-id-example-airdrop/lib/semaphore/build/snark/semaphore.wasm";
pub const DEFAULT_ZKEY_PATH: &str =
    "./lib/world-id-example-airdrop/lib/semaphore/build/snark/semaphore_final.zkey";
pub const DEFAULT_VERIFICATION_KEY_PATH: &str =
    "./lib/world-id-example-airdrop/lib/semaphore/build/snark/verification_key.json";

#[derive(Clone, Eq, PartialEq, Debug, Parser)]
#[clap(
    name = "generate-proof",
    about = "Generate a Semaphore proof for the test identity, ABI-encoded for Solidity"
)]
pub struct CliConfig {
    /// Signal the proof commits to, as hex bytes (usually the receiver address).
    #[clap(value_parser = parsing::parse_bytes)]
    pub signal: Bytes,

    /// External nullifier, as hex bytes (usually the contract address).
    #[clap(value_parser = parsing::parse_bytes)]
    pub external_nullifier: Bytes,

    /// Compiled circuit used for witness calculation.
    #[clap(long, default_value = DEFAULT_WASM_PATH, value_parser = parsing::parse_path)]
    pub wasm: PathBuf,

    /// Groth16 proving key in the zkey format.
    #[clap(long, default_value = DEFAULT_ZKEY_PATH, value_parser = parsing::parse_path)]
    pub zkey: PathBuf,

    /// Verification key exported by snarkjs.
    #[clap(long, default_value = DEFAULT_VERIFICATION_KEY_PATH, value_parser = parsing::parse_path)]
    pub verification_key: PathBuf,

    /// Logging configuration. Logs always go to standard error.
    #[clap(short = 'l', value_enum, default_value = "text")]
    pub logging_format: LoggingFormat,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, ValueEnum)]
pub enum LoggingFormat {
    #[default]
    Text,
    Json,
}

mod parsing {
    use std::{path::PathBuf, str::FromStr};

    use alloy_primitives::Bytes;
    use anyhow::{anyhow, Result};

    pub fn parse_path(path: &str) -> Result<PathBuf> {
        let expanded_path =
            shellexpand::full(path).map_err(|e| anyhow!("Failed to expand path: {e:?}"))?;
        PathBuf::from_str(expanded_path.as_ref())
            .map_err(|e| anyhow!("Failed to interpret path: {e:?}"))
    }

    pub fn parse_bytes(value: &str) -> Result<Bytes> {
        Bytes::from_str(value).map_err(|e| anyhow!("Expected hex bytes: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        CliConfig::command().debug_assert()
    }

    #[test]
    fn positional_arguments_are_hex_bytes() {
        let config = CliConfig::try_parse_from([
            "generate-proof",
            "0x163b09b4fe21177c455d850bd815b6d583732432",
            "5fbdb2315678afecb367f032d93f642f64180aa3",
        ])
        .unwrap();

        assert_eq!(config.signal.len(), 20);
        assert_eq!(config.external_nullifier[0], 0x5f);
        assert_eq!(config.zkey, PathBuf::from(DEFAULT_ZKEY_PATH));
    }

    #[test]
    fn non_hex_signal_is_rejected() {
        assert!(CliConfig::try_parse_from(["generate-proof", "alice", "0x01"]).is_err());
    }

    #[test]
    fn both_inputs_are_required() {
        assert!(CliConfig::try_parse_from(["generate-proof", "0x01"]).is_err());
    }
}
