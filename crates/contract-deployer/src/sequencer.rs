//! The deployment sequence: chain selection, World ID address resolution, constructor parameter
//! collection, submission and confirmation. Every step is awaited in order and the first failure
//! ends the whole deployment.

use std::io::Write;

use alloy_primitives::{Address, Bytes, TxHash};
use tracing::{info, warn};

use crate::{
    prompt::CONSTRUCTOR_PROMPTS, AddressRegistry, Chain, ConstructorArgs, ContractArtifact,
    DeployError, Progress, Prompter,
};

pub const CHAIN_MISMATCH_WARNING: &str = "The chain of your RPC_URL does not match the chain you \
     selected. Please check your RPC_URL and try again.";

/// Access to the chain the contract is deployed to.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// Chain id reported by the endpoint.
    async fn chain_id(&self) -> Result<u64, DeployError>;

    /// Signs and broadcasts a contract creation transaction.
    async fn submit(&self, init_code: Bytes) -> Result<TxHash, DeployError>;

    /// Waits until the transaction is mined and returns the address of the created contract.
    async fn confirm(&self, tx_hash: TxHash) -> Result<Address, DeployError>;
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct DeploymentResult {
    pub transaction_hash: TxHash,
    pub contract_address: Address,
}

/// Deploys `artifact` and writes the resulting address to `report`. Warnings meant for the user
/// go to `warnings`, independently of the logging configuration.
///
/// `chain` skips the interactive chain selection when given.
#[allow(clippy::too_many_arguments)]
pub async fn deploy<C: ChainClient, R: AddressRegistry, P: Prompter>(
    artifact: &ContractArtifact,
    chain: Option<Chain>,
    client: &C,
    registry: &R,
    prompter: &mut P,
    progress: &Progress,
    report: &mut impl Write,
    warnings: &mut impl Write,
) -> Result<DeploymentResult, DeployError> {
    let chain = select_target_chain(client, prompter, chain, warnings).await?;
    let args = collect_constructor_args(registry, prompter, chain).await?;
    let init_code = artifact.deployment_code(&args)?;

    let result = submit_and_confirm(client, init_code, progress).await;
    match &result {
        Ok(_) => progress.finish(),
        Err(_) => progress.abandon(),
    }
    let result = result?;

    writeln!(
        report,
        "✅ Deployed your contract to {}",
        result.contract_address
    )?;
    Ok(result)
}

/// Picks the chain to deploy to and checks it against the endpoint. A mismatch is only reported
/// to `warnings`: the explicit selection wins.
pub async fn select_target_chain<C: ChainClient, P: Prompter>(
    client: &C,
    prompter: &mut P,
    preselected: Option<Chain>,
    warnings: &mut impl Write,
) -> Result<Chain, DeployError> {
    let endpoint_chain_id = client.chain_id().await?;

    let chain = match preselected {
        Some(chain) => chain,
        None => prompter.select_chain(&Chain::ALL)?,
    };

    if chain.id() != endpoint_chain_id {
        warn!(
            selected = chain.id(),
            endpoint = endpoint_chain_id,
            "{}",
            CHAIN_MISMATCH_WARNING
        );
        writeln!(warnings, "{CHAIN_MISMATCH_WARNING}")?;
    }
    Ok(chain)
}

/// Builds the constructor arguments: the World ID address registered for `chain`, followed by
/// the answers to `CONSTRUCTOR_PROMPTS`. Prompts are only shown once the address is resolved.
pub async fn collect_constructor_args<R: AddressRegistry, P: Prompter>(
    registry: &R,
    prompter: &mut P,
    chain: Chain,
) -> Result<ConstructorArgs, DeployError> {
    let world_id_address = registry.lookup(chain.registry_key()).await?;
    info!(chain = %chain, %world_id_address, "Resolved World ID address");

    let mut args = ConstructorArgs::new();
    args.push(world_id_address);
    for question in CONSTRUCTOR_PROMPTS {
        args.push(prompter.ask(question)?);
    }
    Ok(args)
}

async fn submit_and_confirm<C: ChainClient>(
    client: &C,
    init_code: Bytes,
    progress: &Progress,
) -> Result<DeploymentResult, DeployError> {
    progress.start("Deploying your contract...");
    let transaction_hash = client.submit(init_code).await?;

    progress.update(format!(
        "Waiting for deploy transaction (tx: {transaction_hash})"
    ));
    let contract_address = client.confirm(transaction_hash).await?;

    Ok(DeploymentResult {
        transaction_hash,
        contract_address,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use alloy_primitives::{address, b256};
    use inquire::InquireError;

    use super::*;
    use crate::RegistryError;

    const WORLD_ID_ROUTER: &str = "0x163b09b4fE21177c455D850BD815B6D583732432";

    struct FakeChain {
        chain_id: u64,
        submitted: RefCell<Vec<Bytes>>,
    }

    impl FakeChain {
        fn new(chain_id: u64) -> Self {
            Self {
                chain_id,
                submitted: RefCell::new(vec![]),
            }
        }
    }

    impl ChainClient for FakeChain {
        async fn chain_id(&self) -> Result<u64, DeployError> {
            Ok(self.chain_id)
        }

        async fn submit(&self, init_code: Bytes) -> Result<TxHash, DeployError> {
            self.submitted.borrow_mut().push(init_code);
            Ok(b256!("1111111111111111111111111111111111111111111111111111111111111111"))
        }

        async fn confirm(&self, _tx_hash: TxHash) -> Result<Address, DeployError> {
            Ok(address!("5fbdb2315678afecb367f032d93f642f64180aa3"))
        }
    }

    struct StaticRegistry(Vec<(&'static str, &'static str)>);

    impl AddressRegistry for StaticRegistry {
        async fn lookup(&self, key: &str) -> Result<String, RegistryError> {
            self.0
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
                .ok_or_else(|| RegistryError::KeyNotFound(key.to_string()))
        }
    }

    /// Answers questions from a script and records what was asked.
    #[derive(Default)]
    struct ScriptedPrompter {
        chain: Option<Chain>,
        answers: Vec<&'static str>,
        asked: Vec<String>,
        chain_selections: usize,
    }

    impl Prompter for ScriptedPrompter {
        fn select_chain(&mut self, _chains: &[Chain]) -> Result<Chain, InquireError> {
            self.chain_selections += 1;
            self.chain.ok_or(InquireError::OperationCanceled)
        }

        fn ask(&mut self, question: &str) -> Result<String, InquireError> {
            let answer = self.answers.get(self.asked.len()).copied();
            self.asked.push(question.to_string());
            answer
                .map(str::to_string)
                .ok_or(InquireError::OperationCanceled)
        }
    }

    #[tokio::test]
    async fn preselected_chain_skips_the_prompt() {
        let mut prompter = ScriptedPrompter::default();
        let mut warnings: Vec<u8> = vec![];

        let chain = select_target_chain(
            &FakeChain::new(137),
            &mut prompter,
            Some(Chain::PolygonMainnet),
            &mut warnings,
        )
        .await
        .unwrap();

        assert_eq!(chain, Chain::PolygonMainnet);
        assert_eq!(prompter.chain_selections, 0);
        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn chain_mismatch_is_reported_but_not_fatal() {
        let mut prompter = ScriptedPrompter {
            chain: Some(Chain::Mumbai),
            ..Default::default()
        };
        let mut warnings: Vec<u8> = vec![];

        let chain = select_target_chain(&FakeChain::new(1), &mut prompter, None, &mut warnings)
            .await
            .unwrap();

        assert_eq!(chain, Chain::Mumbai);
        assert_eq!(prompter.chain_selections, 1);
        assert_eq!(
            String::from_utf8(warnings).unwrap(),
            format!("{CHAIN_MISMATCH_WARNING}\n")
        );
    }

    #[tokio::test]
    async fn matching_chain_is_not_reported() {
        let mut prompter = ScriptedPrompter {
            chain: Some(Chain::OptimismMainnet),
            ..Default::default()
        };
        let mut warnings: Vec<u8> = vec![];

        select_target_chain(&FakeChain::new(10), &mut prompter, None, &mut warnings)
            .await
            .unwrap();

        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn answers_follow_the_resolved_address_in_prompt_order() {
        let registry = StaticRegistry(vec![("id.worldcoin.eth", "0xABC")]);
        let mut prompter = ScriptedPrompter {
            answers: vec!["app_staging_1234", "  claim airdrop "],
            ..Default::default()
        };

        let args = collect_constructor_args(&registry, &mut prompter, Chain::EthereumMainnet)
            .await
            .unwrap();

        assert_eq!(prompter.asked, vec!["App ID:", "Action:"]);
        assert_eq!(
            args.as_slice(),
            ["0xABC", "app_staging_1234", "  claim airdrop "]
        );
    }

    #[tokio::test]
    async fn registry_miss_stops_before_any_prompt() {
        let registry = StaticRegistry(vec![("goerli.id.worldcoin.eth", "0xABC")]);
        let mut prompter = ScriptedPrompter::default();

        let result =
            collect_constructor_args(&registry, &mut prompter, Chain::EthereumMainnet).await;

        assert!(matches!(
            result,
            Err(DeployError::Registry(RegistryError::KeyNotFound(_)))
        ));
        assert!(prompter.asked.is_empty());
    }

    #[tokio::test]
    async fn cancelled_prompt_aborts_the_deployment() {
        let registry = StaticRegistry(vec![("id.worldcoin.eth", WORLD_ID_ROUTER)]);
        let mut prompter = ScriptedPrompter {
            answers: vec!["app_staging_1234"],
            ..Default::default()
        };

        let result =
            collect_constructor_args(&registry, &mut prompter, Chain::EthereumMainnet).await;

        assert!(matches!(result, Err(DeployError::Prompt(_))));
    }

    #[tokio::test]
    async fn progress_tracks_the_pending_transaction() {
        let progress = Progress::hidden();
        let chain = FakeChain::new(1);

        let result = submit_and_confirm(&chain, Bytes::from_static(&[0x60]), &progress)
            .await
            .unwrap();

        assert_eq!(*chain.submitted.borrow(), vec![Bytes::from_static(&[0x60])]);
        assert_eq!(
            progress.message(),
            format!(
                "Waiting for deploy transaction (tx: {})",
                result.transaction_hash
            )
        );
    }
}
