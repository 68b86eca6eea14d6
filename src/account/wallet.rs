//! Wallet interface and the default PXE-backed wallet.
//!
//! A wallet is an account identity plus a way to authorize things for it.
//! Everything else (sending, simulating, receipts) is the same for every
//! wallet and lives in the trait's provided methods.

use alloy::primitives::TxHash;
use async_trait::async_trait;
use serde_json::Value;

use crate::account::auth::{AuthRequest, AuthWitness};
use crate::account::identity::CompleteAddress;
use crate::account::types::WalletResult;
use crate::observability::metrics;
use crate::pxe::client::{PxeClient, SentTx};
use crate::pxe::types::{AztecAddress, EntrypointPayload, FunctionCall, NodeInfo, TxExecutionRequest, TxReceipt};

#[async_trait]
pub trait Wallet: Send + Sync + std::fmt::Debug {
    /// Client used to reach the node.
    fn pxe(&self) -> &PxeClient;

    fn complete_address(&self) -> &CompleteAddress;

    /// Produce a witness approving `request` for this account.
    async fn create_auth_wit(&self, request: AuthRequest) -> WalletResult<AuthWitness>;

    fn address(&self) -> AztecAddress {
        self.complete_address().address
    }

    async fn get_node_info(&self) -> WalletResult<NodeInfo> {
        Ok(self.pxe().get_node_info().await?)
    }

    async fn get_block_number(&self) -> WalletResult<u64> {
        Ok(self.pxe().get_block_number().await?)
    }

    /// Simulate `call` from this account and return its output.
    async fn simulate(&self, call: &FunctionCall) -> WalletResult<Value> {
        Ok(self.pxe().simulate(self.address(), call).await?)
    }

    /// Send `calls` through this account's entrypoint.
    async fn send_tx(&self, calls: Vec<FunctionCall>) -> WalletResult<SentTx> {
        self.send_tx_with_auth(calls, Vec::new()).await
    }

    /// Send `calls` with extra witnesses for intents other accounts approved.
    ///
    /// The entrypoint witness is always produced by `create_auth_wit`, so a
    /// signing failure aborts the send.
    async fn send_tx_with_auth(
        &self,
        calls: Vec<FunctionCall>,
        extra_witnesses: Vec<AuthWitness>,
    ) -> WalletResult<SentTx> {
        let payload = EntrypointPayload::new(calls);
        let entrypoint = self.create_auth_wit(AuthRequest::Hash(payload.hash())).await?;

        let mut auth_witnesses = Vec::with_capacity(1 + extra_witnesses.len());
        auth_witnesses.push(entrypoint);
        auth_witnesses.extend(extra_witnesses);

        let request = TxExecutionRequest {
            origin: self.address(),
            payload,
            auth_witnesses,
        };
        let tx_hash = self.pxe().send_tx(&request).await?;
        Ok(SentTx::new(self.pxe().clone(), tx_hash))
    }

    async fn get_tx_receipt(&self, tx_hash: TxHash) -> WalletResult<TxReceipt> {
        Ok(self.pxe().get_tx_receipt(tx_hash).await?)
    }
}

/// Wallet for an account whose keys the PXE itself manages.
///
/// Authorization is delegated to the node via `pxe_createAuthWit`.
#[derive(Debug, Clone)]
pub struct PxeWallet {
    pxe: PxeClient,
    account: CompleteAddress,
}

impl PxeWallet {
    pub fn new(pxe: PxeClient, account: CompleteAddress) -> Self {
        Self { pxe, account }
    }
}

#[async_trait]
impl Wallet for PxeWallet {
    fn pxe(&self) -> &PxeClient {
        &self.pxe
    }

    fn complete_address(&self) -> &CompleteAddress {
        &self.account
    }

    async fn create_auth_wit(&self, request: AuthRequest) -> WalletResult<AuthWitness> {
        let message_hash = request.message_hash()?;
        let witness = self.pxe.create_auth_wit(self.account.address, message_hash).await?;
        metrics::record_auth_witness("node");
        Ok(witness)
    }
}

/// Wallets for the node's pre-funded test accounts, in node order.
pub async fn test_wallets(pxe: &PxeClient) -> WalletResult<Vec<PxeWallet>> {
    let accounts = pxe.get_test_accounts().await?;
    Ok(accounts
        .into_iter()
        .map(|account| PxeWallet::new(pxe.clone(), account))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::keys::KeyPair;
    use crate::account::types::WalletError;
    use alloy::primitives::B256;

    #[tokio::test]
    async fn test_malformed_digest_fails_before_network() {
        // Nothing listens on port 1; a network call would surface as a PXE error.
        let pxe = PxeClient::connect("http://127.0.0.1:1").unwrap();
        let wallet = PxeWallet::new(pxe, CompleteAddress::new(KeyPair::random().public_key(), B256::ZERO));

        let err = wallet.create_auth_wit(AuthRequest::Raw(vec![1, 2, 3])).await.unwrap_err();
        assert!(matches!(err, WalletError::SigningFailure(_)));
    }

    #[tokio::test]
    async fn test_node_errors_propagate() {
        let pxe = PxeClient::connect("http://127.0.0.1:1").unwrap();
        let wallet = PxeWallet::new(pxe, CompleteAddress::new(KeyPair::random().public_key(), B256::ZERO));

        let err = wallet.create_auth_wit(AuthRequest::message("x")).await.unwrap_err();
        assert!(matches!(err, WalletError::Pxe(_)));
    }
}
