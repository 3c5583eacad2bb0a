use alloy_network::{Ethereum, EthereumWallet, Network, ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, Bytes, TxHash};
use alloy_provider::{
    fillers::{FillerControlFlow, TxFiller, WalletFiller},
    PendingTransactionBuilder, Provider, ProviderBuilder, SendableTx,
};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::{Transport, TransportResult};
use tracing::{debug, info};

use crate::{sequencer::ChainClient, DeployError};

/// Creates a provider for the given RPC URL, with the given signer. Gas, nonce and chain id are
/// filled from the node before the transaction is signed.
pub async fn create_provider_with_signer(
    rpc_url: &str,
    signer: PrivateKeySigner,
) -> Result<impl Provider + Clone, DeployError> {
    Ok(ProviderBuilder::new()
        .with_recommended_fillers()
        .filler(WalletFiller::new(EthereumWallet::from(signer)))
        .filler(LoggingFiller::default())
        .on_builtin(rpc_url)
        .await?)
}

/// A noop filler that reports transaction details once it is prepared, just before sending.
#[derive(Copy, Clone, Debug, Default)]
pub struct LoggingFiller {}

impl TxFiller for LoggingFiller {
    type Fillable = ();

    fn status(&self, _tx: &<Ethereum as Network>::TransactionRequest) -> FillerControlFlow {
        FillerControlFlow::Finished
    }

    fn fill_sync(&self, tx: &mut SendableTx<Ethereum>) {
        match tx {
            SendableTx::Builder(tx) => {
                info!(
                    sender = ?tx.from,
                    nonce = tx.nonce,
                    chain_id = tx.chain_id,
                    init_code_len = tx.input.input().map(|code| code.len()),
                    "Sending a deployment transaction"
                );
            }
            SendableTx::Envelope(_) => {} // Transactions are always built, never pre-signed.
        }
    }

    async fn prepare<P: Provider<T, Ethereum>, T: Transport + Clone>(
        &self,
        _provider: &P,
        _tx: &<Ethereum as Network>::TransactionRequest,
    ) -> TransportResult<Self::Fillable> {
        Ok(())
    }

    async fn fill(
        &self,
        _fillable: Self::Fillable,
        tx: SendableTx<Ethereum>,
    ) -> TransportResult<SendableTx<Ethereum>> {
        Ok(tx)
    }
}

/// Deploys contracts through a signing provider.
#[derive(Clone)]
pub struct RpcDeploymentClient<P> {
    provider: P,
    deployer: Address,
}

impl<P: Provider + Clone> RpcDeploymentClient<P> {
    pub fn new(provider: P, deployer: Address) -> Self {
        Self { provider, deployer }
    }
}

impl<P: Provider + Clone> ChainClient for RpcDeploymentClient<P> {
    async fn chain_id(&self) -> Result<u64, DeployError> {
        Ok(self.provider.get_chain_id().await?)
    }

    async fn submit(&self, init_code: Bytes) -> Result<TxHash, DeployError> {
        let tx = TransactionRequest::default()
            .with_from(self.deployer)
            .with_deploy_code(init_code);
        let pending = self.provider.send_transaction(tx).await?;
        Ok(*pending.tx_hash())
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<Address, DeployError> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await?;
        debug!(%tx_hash, block = ?receipt.block_number(), "Deployment transaction mined");

        if !receipt.status() {
            return Err(DeployError::Reverted(tx_hash));
        }
        receipt
            .contract_address()
            .ok_or(DeployError::MissingContractAddress(tx_hash))
    }
}
