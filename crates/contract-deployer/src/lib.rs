//! One-shot deployment of a World ID integrated contract.
//!
//! The `deploy` binary wires the pieces together; everything it needs is exposed here so that the
//! deployment sequence can be driven against fake chains, registries and prompts in tests.

pub use artifact::{ArtifactError, ConstructorArgs, ContractArtifact, DEFAULT_ARTIFACT_PATH};
pub use chain::{Chain, UnknownChain};
pub use config::{ConfigError, DeploymentConfig, PRIVATE_KEY_ENV, RPC_URL_ENV};
pub use error::{DeployError, CONFIG_ERROR_EXIT_CODE, FAILURE_EXIT_CODE};
pub use progress::Progress;
pub use prompt::{Prompter, TerminalPrompter};
pub use registry::{AddressRegistry, RegistryClient, RegistryEntry, RegistryError};
pub use sequencer::{deploy, ChainClient, DeploymentResult};

pub mod artifact;
pub mod chain;
pub mod config;
mod error;
mod progress;
pub mod prompt;
pub mod providers;
pub mod registry;
pub mod sequencer;
