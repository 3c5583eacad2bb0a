use std::{fmt, path::PathBuf, str::FromStr};

use alloy_signer_local::PrivateKeySigner;
use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::{artifact::DEFAULT_ARTIFACT_PATH, registry::DEFAULT_REGISTRY_URL, Chain};

pub const RPC_URL_ENV: &str = "RPC_URL";
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

#[derive(Clone, Eq, PartialEq, Debug, Parser)]
#[clap(name = "deploy", about = "Deploy a World ID integrated contract")]
pub struct CliConfig {
    /// Path to the compiled contract artifact (`{ abi, bytecode: { object } }`).
    #[clap(long, default_value = DEFAULT_ARTIFACT_PATH, value_parser = parsing::parse_path)]
    pub artifact: PathBuf,

    /// RPC endpoint of the node to deploy through.
    ///
    /// If not provided, `RPC_URL` environment variable is used.
    #[clap(long)]
    pub rpc_url: Option<String>,

    /// Private key of the deployer account.
    ///
    /// If not provided, `PRIVATE_KEY` environment variable is used.
    #[clap(long)]
    pub private_key: Option<String>,

    /// Id of the chain to deploy to.
    ///
    /// If not provided, will be prompted.
    #[clap(long, value_parser = parsing::parse_chain)]
    pub chain: Option<Chain>,

    /// Endpoint of the registry with World ID contract addresses.
    #[clap(long, default_value = DEFAULT_REGISTRY_URL)]
    pub registry_url: String,

    /// Logging configuration.
    #[clap(short = 'l', value_enum, default_value = "text")]
    pub logging_format: LoggingFormat,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, ValueEnum)]
pub enum LoggingFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{}", missing_lines(.0))]
    Missing(Vec<&'static str>),

    #[error("Invalid {PRIVATE_KEY_ENV}: {0}")]
    InvalidPrivateKey(String),
}

fn missing_lines(fields: &[&'static str]) -> String {
    fields
        .iter()
        .map(|field| format!("Missing {field}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Connection and signing configuration of a single deployment.
#[derive(Clone, Eq, PartialEq)]
pub struct DeploymentConfig {
    pub rpc_url: String,
    pub private_key: String,
}

impl DeploymentConfig {
    /// Resolves the configuration from the command line arguments, falling back to the process
    /// environment.
    pub fn resolve(cli_config: &CliConfig) -> Result<Self, ConfigError> {
        Self::resolve_with(
            cli_config.rpc_url.clone(),
            cli_config.private_key.clone(),
            |name| std::env::var(name).ok(),
        )
    }

    /// Resolves the configuration with `env` as the source of environment variables. Every
    /// missing field is reported, not only the first one.
    pub fn resolve_with(
        rpc_url: Option<String>,
        private_key: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let rpc_url = rpc_url.or_else(|| env(RPC_URL_ENV));
        let private_key = private_key.or_else(|| env(PRIVATE_KEY_ENV));

        match (rpc_url, private_key) {
            (Some(rpc_url), Some(private_key)) => Ok(Self {
                rpc_url,
                private_key,
            }),
            (rpc_url, private_key) => {
                let mut missing = vec![];
                if rpc_url.is_none() {
                    missing.push(RPC_URL_ENV);
                }
                if private_key.is_none() {
                    missing.push(PRIVATE_KEY_ENV);
                }
                Err(ConfigError::Missing(missing))
            }
        }
    }

    pub fn signer(&self) -> Result<PrivateKeySigner, ConfigError> {
        PrivateKeySigner::from_str(&self.private_key)
            .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))
    }
}

// Keeps the private key out of the logs.
impl fmt::Debug for DeploymentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeploymentConfig")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

mod parsing {
    use std::{path::PathBuf, str::FromStr};

    use anyhow::{anyhow, Result};

    use crate::Chain;

    pub fn parse_path(path: &str) -> Result<PathBuf> {
        let expanded_path =
            shellexpand::full(path).map_err(|e| anyhow!("Failed to expand path: {e:?}"))?;
        PathBuf::from_str(expanded_path.as_ref())
            .map_err(|e| anyhow!("Failed to interpret path: {e:?}"))
    }

    pub fn parse_chain(id: &str) -> Result<Chain> {
        let id = u64::from_str(id).map_err(|e| anyhow!("Chain id must be a number: {e}"))?;
        Chain::try_from(id).map_err(|e| anyhow!(e))
    }
}
