//! Calling functions on deployed contracts.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::account::auth::AuthWitness;
use crate::account::wallet::Wallet;
use crate::contract::artifact::{ContractArtifact, FunctionType};
use crate::contract::types::{ContractError, ContractResult};
use crate::pxe::client::SentTx;
use crate::pxe::types::{AztecAddress, FunctionCall};

/// A contract instance bound to a wallet that pays for and authorizes calls.
#[derive(Debug, Clone)]
pub struct Contract {
    address: AztecAddress,
    artifact: Arc<ContractArtifact>,
    wallet: Arc<dyn Wallet>,
}

impl Contract {
    pub(crate) fn new(address: AztecAddress, artifact: ContractArtifact, wallet: Arc<dyn Wallet>) -> Self {
        Self {
            address,
            artifact: Arc::new(artifact),
            wallet,
        }
    }

    /// Attach to an already deployed contract.
    ///
    /// Fails with [`ContractError::NotRegistered`] if the PXE does not know
    /// an instance at `address`.
    pub async fn at(address: AztecAddress, artifact: ContractArtifact, wallet: Arc<dyn Wallet>) -> ContractResult<Self> {
        if wallet.pxe().get_contract_instance(address).await?.is_none() {
            return Err(ContractError::NotRegistered(address));
        }
        Ok(Self::new(address, artifact, wallet))
    }

    pub fn address(&self) -> AztecAddress {
        self.address
    }

    pub fn artifact(&self) -> &ContractArtifact {
        &self.artifact
    }

    pub fn wallet(&self) -> &Arc<dyn Wallet> {
        &self.wallet
    }

    /// Same contract, calls made from another wallet.
    pub fn with_wallet(&self, wallet: Arc<dyn Wallet>) -> Self {
        Self {
            address: self.address,
            artifact: self.artifact.clone(),
            wallet,
        }
    }

    /// Prepare a call to `name` with `args`.
    pub fn method(&self, name: &str, args: Vec<Value>) -> ContractResult<ContractFunctionInteraction> {
        let call = self.artifact.function(name)?.call(self.address, args)?;
        Ok(ContractFunctionInteraction {
            wallet: self.wallet.clone(),
            call,
        })
    }
}

/// A prepared function call that can be sent or simulated.
#[derive(Debug, Clone)]
pub struct ContractFunctionInteraction {
    wallet: Arc<dyn Wallet>,
    call: FunctionCall,
}

impl ContractFunctionInteraction {
    pub fn request(&self) -> &FunctionCall {
        &self.call
    }

    /// Send the call as a transaction from the bound wallet.
    pub async fn send(&self) -> ContractResult<SentTx> {
        self.send_with_auth(Vec::new()).await
    }

    /// Send with witnesses from other accounts approving parts of the call.
    pub async fn send_with_auth(&self, witnesses: Vec<AuthWitness>) -> ContractResult<SentTx> {
        if self.call.function_type == FunctionType::Utility {
            return Err(ContractError::NotSendable(self.call.name.clone()));
        }
        let sent = self
            .wallet
            .send_tx_with_auth(vec![self.call.clone()], witnesses)
            .await?;
        tracing::debug!(function = %self.call.name, to = %self.call.to, tx_hash = %sent.tx_hash(), "Call sent");
        Ok(sent)
    }

    /// Simulate the call and decode its output.
    pub async fn simulate<T: DeserializeOwned>(&self) -> ContractResult<T> {
        let output = self.wallet.simulate(&self.call).await?;
        serde_json::from_value(output).map_err(|e| ContractError::Decode {
            function: self.call.name.clone(),
            reason: e.to_string(),
        })
    }
}
