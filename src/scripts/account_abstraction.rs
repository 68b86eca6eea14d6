//! Custom account walkthrough.
//!
//! 1. Connect to the PXE and wait until it answers
//! 2. Deploy a signature-checking account with a fresh (or configured) key
//! 3. From that account, deploy a token with itself as admin
//! 4. Mint privately to itself and check the private balance

use std::sync::Arc;

use alloy::primitives::B256;

use crate::account::keys::KeyPair;
use crate::account::manager::{schnorr_account_artifact, AccountManager};
use crate::account::wallet::Wallet;
use crate::config::schema::AppConfig;
use crate::contract::token::TokenContract;
use crate::pxe::client::PxeClient;
use crate::pxe::types::{AztecAddress, NodeInfo};
use crate::scripts::{ScriptError, ScriptResult};

pub const MINT_AMOUNT: u128 = 100;

/// What the walkthrough produced.
#[derive(Debug, Clone)]
pub struct AccountAbstractionReport {
    pub node_info: NodeInfo,
    pub account: AztecAddress,
    pub token: AztecAddress,
    pub private_balance: u128,
}

pub async fn run(config: &AppConfig) -> ScriptResult<AccountAbstractionReport> {
    let pxe = PxeClient::new(&config.pxe)?.with_wait_config(config.wait.clone());
    let node_info = pxe.wait_for_pxe().await?;
    tracing::info!(
        node_version = %node_info.node_version,
        l1_chain_id = node_info.l1_chain_id,
        rollup_version = node_info.rollup_version,
        "Sandbox info"
    );

    let keys = KeyPair::from_env_or_random(&config.account.secret_key_env)?;
    let salt = parse_salt(config.account.salt.as_deref())?;
    let manager = AccountManager::new(pxe.clone(), keys, schnorr_account_artifact(), salt);

    tracing::info!(address = %manager.address(), "Deploying custom account contract");
    let wallet: Arc<dyn Wallet> = Arc::new(manager.deploy().await?.wait().await?);
    tracing::info!(address = %wallet.address(), "Custom account deployed");

    tracing::info!("Deploying token contract with custom account");
    let deployed = TokenContract::deploy(
        wallet.clone(),
        wallet.address(),
        &config.token.name,
        &config.token.symbol,
        config.token.decimals,
    )?
    .send()
    .await?
    .deployed()
    .await?;
    let token = TokenContract::from_contract(deployed)?;
    tracing::info!(address = %token.address(), "Token contract deployed");

    tracing::info!(amount = MINT_AMOUNT, "Minting tokens to own account");
    token
        .mint_to_private(wallet.address(), wallet.address(), MINT_AMOUNT)?
        .send()
        .await?
        .wait()
        .await?;

    let balance = token.private_balance(wallet.address()).await?;
    tracing::info!(account = %wallet.address(), balance, "Private balance of custom account");

    if balance != MINT_AMOUNT {
        return Err(ScriptError::BalanceMismatch {
            account: wallet.address(),
            expected: MINT_AMOUNT,
            actual: balance,
        });
    }

    tracing::info!("Custom account deployed and used a contract");
    Ok(AccountAbstractionReport {
        node_info,
        account: wallet.address(),
        token: token.address(),
        private_balance: balance,
    })
}

fn parse_salt(salt: Option<&str>) -> ScriptResult<Option<B256>> {
    salt.map(|s| {
        s.parse::<B256>()
            .map_err(|e| ScriptError::InvalidInput(format!("account salt '{}': {}", s, e)))
    })
    .transpose()
}
