use alloy_primitives::TxHash;
use alloy_provider::PendingTransactionError;
use alloy_transport::TransportError;
use inquire::InquireError;
use thiserror::Error;

use crate::{ArtifactError, ConfigError, RegistryError};

/// Exit status for a missing or malformed configuration.
pub const CONFIG_ERROR_EXIT_CODE: u8 = 1;
/// Exit status for every failure after the configuration has been accepted.
pub const FAILURE_EXIT_CODE: u8 = 2;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeployError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Error while handling the contract artifact")]
    Artifact(#[from] ArtifactError),

    #[error("Error while resolving the World ID address")]
    Registry(#[from] RegistryError),

    #[error("Prompt failed")]
    Prompt(#[from] InquireError),

    #[error("RPC error")]
    Rpc(#[from] TransportError),

    #[error("Couldn't track the deployment transaction")]
    Watch(#[from] PendingTransactionError),

    #[error("Deployment transaction {0} reverted")]
    Reverted(TxHash),

    #[error("Receipt of transaction {0} does not contain a contract address")]
    MissingContractAddress(TxHash),

    #[error("Couldn't write the deployment report")]
    Report(#[from] std::io::Error),
}

impl DeployError {
    pub fn is_config_error(&self) -> bool {
        matches!(self, DeployError::Config(_))
    }

    /// Process exit status for this error.
    pub fn exit_status(&self) -> u8 {
        match self.is_config_error() {
            true => CONFIG_ERROR_EXIT_CODE,
            false => FAILURE_EXIT_CODE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_told_apart() {
        let config = DeployError::from(ConfigError::Missing(vec![crate::RPC_URL_ENV]));
        let runtime = DeployError::Reverted(TxHash::ZERO);

        assert!(config.is_config_error());
        assert!(!runtime.is_config_error());
        assert_eq!(config.exit_status(), CONFIG_ERROR_EXIT_CODE);
        assert_eq!(runtime.exit_status(), FAILURE_EXIT_CODE);
    }
}
