//! Account deployment.
//!
//! An account contract deploys itself: its constructor call is the first
//! transaction sent through its own entrypoint, authorized by its own key.

use alloy::primitives::{TxHash, B256};
use serde_json::json;

use crate::account::authorized::AuthorizedWallet;
use crate::account::identity::CompleteAddress;
use crate::account::keys::KeyPair;
use crate::account::types::{WalletError, WalletResult};
use crate::account::wallet::{PxeWallet, Wallet};
use crate::contract::artifact::{ContractArtifact, FunctionAbi, FunctionType};
use crate::contract::deploy::ContractInstance;
use crate::pxe::client::{PxeClient, SentTx};
use crate::pxe::types::AztecAddress;

/// ABI of the signature-checking account contract.
pub fn schnorr_account_artifact() -> ContractArtifact {
    ContractArtifact::new("SchnorrAccount")
        .with_function(
            FunctionAbi::new("constructor", FunctionType::Private)
                .initializer()
                .param("signing_public_key", "PublicKey"),
        )
        .with_function(
            FunctionAbi::new("entrypoint", FunctionType::Private)
                .param("app_payload", "EntrypointPayload"),
        )
        .with_function(
            FunctionAbi::new("verify_private_authwit", FunctionType::Private)
                .view()
                .param("inner_hash", "Field"),
        )
}

pub struct AccountManager {
    pxe: PxeClient,
    keys: KeyPair,
    artifact: ContractArtifact,
    salt: B256,
    complete_address: CompleteAddress,
}

impl AccountManager {
    /// Prepare an account for `keys`; a random salt is used when none is given.
    pub fn new(pxe: PxeClient, keys: KeyPair, artifact: ContractArtifact, salt: Option<B256>) -> Self {
        let salt = salt.unwrap_or_else(|| B256::from(rand::random::<[u8; 32]>()));
        let complete_address = CompleteAddress::from_artifact(keys.public_key(), &artifact.hash(), &salt);
        Self {
            pxe,
            keys,
            artifact,
            salt,
            complete_address,
        }
    }

    pub fn complete_address(&self) -> &CompleteAddress {
        &self.complete_address
    }

    pub fn address(&self) -> AztecAddress {
        self.complete_address.address
    }

    /// The account contract instance; its address is the account address.
    pub fn instance(&self) -> ContractInstance {
        let deployed = ContractInstance::compute(&self.artifact, AztecAddress::ZERO, self.salt, &[]);
        ContractInstance {
            address: self.complete_address.address,
            ..deployed
        }
    }

    /// Wallet for this account. Does not touch the network.
    pub fn wallet(&self) -> WalletResult<AuthorizedWallet> {
        AuthorizedWallet::from_key_pair(
            PxeWallet::new(self.pxe.clone(), self.complete_address),
            self.keys.clone(),
        )
    }

    /// Register the identity and contract instance with the PXE.
    pub async fn register(&self) -> WalletResult<AuthorizedWallet> {
        self.pxe.register_account(&self.complete_address).await?;
        self.pxe.register_contract(&self.instance(), &self.artifact).await?;
        tracing::info!(address = %self.address(), "Account registered");
        self.wallet()
    }

    /// Register and send the account's constructor.
    pub async fn deploy(&self) -> WalletResult<DeployAccountTx> {
        let wallet = self.register().await?;

        let constructor = self
            .artifact
            .initializer()
            .and_then(|abi| abi.call(self.address(), vec![json!(self.keys.public_key())]))
            .map_err(|e| WalletError::Artifact(e.to_string()))?;

        let sent = wallet.send_tx(vec![constructor]).await?;
        tracing::info!(address = %self.address(), tx_hash = %sent.tx_hash(), "Account deployment sent");
        Ok(DeployAccountTx { sent, wallet })
    }
}

impl std::fmt::Debug for AccountManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountManager")
            .field("address", &self.complete_address.address)
            .field("artifact", &self.artifact.name)
            .finish_non_exhaustive()
    }
}

/// Account deployment in flight.
#[derive(Debug)]
pub struct DeployAccountTx {
    sent: SentTx,
    wallet: AuthorizedWallet,
}

impl DeployAccountTx {
    pub fn tx_hash(&self) -> TxHash {
        self.sent.tx_hash()
    }

    /// Wait for the deployment and hand back the account's wallet.
    pub async fn wait(self) -> WalletResult<AuthorizedWallet> {
        let receipt = self.sent.wait().await?;
        tracing::info!(
            address = %self.wallet.address(),
            block_number = ?receipt.block_number,
            "Account deployed"
        );
        Ok(self.wallet)
    }
}
