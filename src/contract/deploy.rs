//! Contract deployment.
//!
//! # Flow
//! ```text
//! DeployMethod (artifact + constructor args + salt)
//!     → ContractInstance (deterministic address)
//!     → pxe_registerContract
//!     → initializer call sent through the deployer's wallet
//!     → DeploySentTx::deployed (wait for receipt, return Contract)
//! ```

use std::sync::Arc;

use alloy::primitives::{keccak256, TxHash, B256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::account::wallet::Wallet;
use crate::contract::artifact::ContractArtifact;
use crate::contract::interaction::Contract;
use crate::contract::types::ContractResult;
use crate::pxe::client::SentTx;
use crate::pxe::types::AztecAddress;

/// A deployed (or about to be deployed) contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInstance {
    pub address: AztecAddress,
    pub artifact_hash: B256,
    pub salt: B256,
    pub deployer: AztecAddress,
    /// Hash of the constructor arguments.
    pub initialization_hash: B256,
}

impl ContractInstance {
    /// Instance for `artifact` deployed by `deployer` with `salt` and `init_args`.
    pub fn compute(artifact: &ContractArtifact, deployer: AztecAddress, salt: B256, init_args: &[Value]) -> Self {
        let artifact_hash = artifact.hash();
        let initialization_hash = keccak256(Value::Array(init_args.to_vec()).to_string().as_bytes());

        let mut preimage = Vec::with_capacity(8 + 32 * 4);
        preimage.extend_from_slice(b"contract");
        preimage.extend_from_slice(deployer.as_slice());
        preimage.extend_from_slice(artifact_hash.as_slice());
        preimage.extend_from_slice(salt.as_slice());
        preimage.extend_from_slice(initialization_hash.as_slice());

        Self {
            address: AztecAddress::from_preimage(&preimage),
            artifact_hash,
            salt,
            deployer,
            initialization_hash,
        }
    }
}

/// Pending deployment of a contract from a wallet.
#[derive(Debug)]
pub struct DeployMethod {
    wallet: Arc<dyn Wallet>,
    artifact: ContractArtifact,
    args: Vec<Value>,
    salt: B256,
}

impl DeployMethod {
    /// Prepare a deployment; the initializer and its arity are checked now.
    pub fn new(wallet: Arc<dyn Wallet>, artifact: ContractArtifact, args: Vec<Value>) -> ContractResult<Self> {
        let initializer = artifact.initializer()?;
        // Validates arity without keeping the call.
        initializer.call(AztecAddress::ZERO, args.clone())?;
        Ok(Self {
            wallet,
            artifact,
            args,
            salt: B256::from(rand::random::<[u8; 32]>()),
        })
    }

    /// Use a fixed salt, making the address predictable.
    pub fn with_salt(mut self, salt: B256) -> Self {
        self.salt = salt;
        self
    }

    pub fn instance(&self) -> ContractInstance {
        ContractInstance::compute(&self.artifact, self.wallet.address(), self.salt, &self.args)
    }

    /// Register the instance with the PXE and send the initializer.
    pub async fn send(self) -> ContractResult<DeploySentTx> {
        let instance = self.instance();
        let pxe = self.wallet.pxe();
        pxe.register_contract(&instance, &self.artifact).await?;

        let call = self.artifact.initializer()?.call(instance.address, self.args)?;
        let sent = self.wallet.send_tx(vec![call]).await?;

        tracing::info!(
            contract = %self.artifact.name,
            address = %instance.address,
            deployer = %instance.deployer,
            tx_hash = %sent.tx_hash(),
            "Deployment sent"
        );

        Ok(DeploySentTx {
            sent,
            instance,
            artifact: self.artifact,
            wallet: self.wallet,
        })
    }
}

/// A deployment transaction in flight.
#[derive(Debug)]
pub struct DeploySentTx {
    sent: SentTx,
    instance: ContractInstance,
    artifact: ContractArtifact,
    wallet: Arc<dyn Wallet>,
}

impl DeploySentTx {
    pub fn tx_hash(&self) -> TxHash {
        self.sent.tx_hash()
    }

    pub fn instance(&self) -> &ContractInstance {
        &self.instance
    }

    /// Wait for the deployment to be mined and return the live contract.
    pub async fn deployed(self) -> ContractResult<Contract> {
        let receipt = self.sent.wait().await?;
        tracing::info!(
            contract = %self.artifact.name,
            address = %self.instance.address,
            block_number = ?receipt.block_number,
            "Contract deployed"
        );
        Ok(Contract::new(self.instance.address, self.artifact, self.wallet))
    }
}
