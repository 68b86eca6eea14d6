//! Typed wrapper around the token contract.
//!
//! Amounts are `u128` on the Rust side and travel as 256-bit hex strings.

use std::sync::Arc;

use alloy::primitives::U256;
use serde_json::json;

use crate::account::wallet::Wallet;
use crate::contract::artifact::{ContractArtifact, FunctionAbi, FunctionType};
use crate::contract::deploy::DeployMethod;
use crate::contract::interaction::{Contract, ContractFunctionInteraction};
use crate::contract::types::{ContractError, ContractResult};
use crate::pxe::types::AztecAddress;

pub const TOKEN_CONTRACT_NAME: &str = "Token";

#[derive(Debug, Clone)]
pub struct TokenContract {
    contract: Contract,
}

impl TokenContract {
    /// ABI of the token contract.
    pub fn artifact() -> ContractArtifact {
        use FunctionType::*;

        ContractArtifact::new(TOKEN_CONTRACT_NAME)
            .with_function(
                FunctionAbi::new("constructor", Public)
                    .initializer()
                    .param("admin", "AztecAddress")
                    .param("name", "str")
                    .param("symbol", "str")
                    .param("decimals", "u8"),
            )
            .with_function(
                FunctionAbi::new("mint_to_private", Private)
                    .param("from", "AztecAddress")
                    .param("to", "AztecAddress")
                    .param("amount", "u128"),
            )
            .with_function(
                FunctionAbi::new("mint_to_public", Public)
                    .param("to", "AztecAddress")
                    .param("amount", "u128"),
            )
            .with_function(
                FunctionAbi::new("transfer", Private)
                    .param("to", "AztecAddress")
                    .param("amount", "u128"),
            )
            .with_function(
                FunctionAbi::new("transfer_in_private", Private)
                    .param("from", "AztecAddress")
                    .param("to", "AztecAddress")
                    .param("amount", "u128")
                    .param("nonce", "Field"),
            )
            .with_function(
                FunctionAbi::new("transfer_in_public", Public)
                    .param("from", "AztecAddress")
                    .param("to", "AztecAddress")
                    .param("amount", "u128")
                    .param("nonce", "Field"),
            )
            .with_function(
                FunctionAbi::new("balance_of_private", Utility)
                    .view()
                    .param("owner", "AztecAddress"),
            )
            .with_function(
                FunctionAbi::new("balance_of_public", Public)
                    .view()
                    .param("owner", "AztecAddress"),
            )
            .with_function(FunctionAbi::new("total_supply", Public).view())
    }

    /// Prepare a deployment with `admin` as minter.
    pub fn deploy(
        wallet: Arc<dyn Wallet>,
        admin: AztecAddress,
        name: &str,
        symbol: &str,
        decimals: u8,
    ) -> ContractResult<DeployMethod> {
        DeployMethod::new(
            wallet,
            Self::artifact(),
            vec![json!(admin), json!(name), json!(symbol), json!(decimals)],
        )
    }

    /// Attach to a deployed token.
    pub async fn at(address: AztecAddress, wallet: Arc<dyn Wallet>) -> ContractResult<Self> {
        Ok(Self {
            contract: Contract::at(address, Self::artifact(), wallet).await?,
        })
    }

    /// Wrap a generic contract handle, e.g. the result of a deployment.
    pub fn from_contract(contract: Contract) -> ContractResult<Self> {
        if contract.artifact().name != TOKEN_CONTRACT_NAME {
            return Err(ContractError::Artifact(format!(
                "expected a {} artifact, got {}",
                TOKEN_CONTRACT_NAME,
                contract.artifact().name
            )));
        }
        Ok(Self { contract })
    }

    pub fn address(&self) -> AztecAddress {
        self.contract.address()
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn with_wallet(&self, wallet: Arc<dyn Wallet>) -> Self {
        Self {
            contract: self.contract.with_wallet(wallet),
        }
    }

    pub fn mint_to_private(&self, from: AztecAddress, to: AztecAddress, amount: u128) -> ContractResult<ContractFunctionInteraction> {
        self.contract
            .method("mint_to_private", vec![json!(from), json!(to), amount_arg(amount)])
    }

    pub fn mint_to_public(&self, to: AztecAddress, amount: u128) -> ContractResult<ContractFunctionInteraction> {
        self.contract.method("mint_to_public", vec![json!(to), amount_arg(amount)])
    }

    /// Private transfer from the calling wallet.
    pub fn transfer(&self, to: AztecAddress, amount: u128) -> ContractResult<ContractFunctionInteraction> {
        self.contract.method("transfer", vec![json!(to), amount_arg(amount)])
    }

    /// Private transfer out of `from`; needs `from`'s witness unless `from` sends it.
    pub fn transfer_in_private(
        &self,
        from: AztecAddress,
        to: AztecAddress,
        amount: u128,
        nonce: u64,
    ) -> ContractResult<ContractFunctionInteraction> {
        self.contract.method(
            "transfer_in_private",
            vec![json!(from), json!(to), amount_arg(amount), json!(U256::from(nonce))],
        )
    }

    /// Public transfer out of `from`; needs `from`'s witness unless `from` sends it.
    pub fn transfer_in_public(
        &self,
        from: AztecAddress,
        to: AztecAddress,
        amount: u128,
        nonce: u64,
    ) -> ContractResult<ContractFunctionInteraction> {
        self.contract.method(
            "transfer_in_public",
            vec![json!(from), json!(to), amount_arg(amount), json!(U256::from(nonce))],
        )
    }

    pub fn balance_of_private(&self, owner: AztecAddress) -> ContractResult<ContractFunctionInteraction> {
        self.contract.method("balance_of_private", vec![json!(owner)])
    }

    pub fn balance_of_public(&self, owner: AztecAddress) -> ContractResult<ContractFunctionInteraction> {
        self.contract.method("balance_of_public", vec![json!(owner)])
    }

    pub async fn private_balance(&self, owner: AztecAddress) -> ContractResult<u128> {
        let raw: U256 = self.balance_of_private(owner)?.simulate().await?;
        to_amount("balance_of_private", raw)
    }

    pub async fn public_balance(&self, owner: AztecAddress) -> ContractResult<u128> {
        let raw: U256 = self.balance_of_public(owner)?.simulate().await?;
        to_amount("balance_of_public", raw)
    }

    pub async fn total_supply(&self) -> ContractResult<u128> {
        let raw: U256 = self.contract.method("total_supply", vec![])?.simulate().await?;
        to_amount("total_supply", raw)
    }
}

fn amount_arg(amount: u128) -> serde_json::Value {
    json!(U256::from(amount))
}

fn to_amount(function: &str, raw: U256) -> ContractResult<u128> {
    u128::try_from(raw).map_err(|_| ContractError::Decode {
        function: function.to_string(),
        reason: format!("{} does not fit in u128", raw),
    })
}
