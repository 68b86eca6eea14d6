//! Token flows with the node's pre-funded test accounts.
//!
//! The first test account owns the token; the token address is kept in the
//! configured `addresses.json` so separate invocations share one deployment.

use std::path::Path;
use std::sync::Arc;

use crate::account::wallet::{test_wallets, PxeWallet, Wallet};
use crate::config::schema::AppConfig;
use crate::contract::addresses::DeployedAddresses;
use crate::contract::token::TokenContract;
use crate::pxe::client::PxeClient;
use crate::pxe::types::{AztecAddress, LogFilter, TxReceipt};
use crate::scripts::{Balance, ScriptError, ScriptResult};

pub const PRIVATE_MINT_AMOUNT: u128 = 20;
pub const PUBLIC_MINT_AMOUNT: u128 = 100;
pub const TRANSFER_AMOUNT: u128 = 1;

const LOG_PREVIEW_CHARS: usize = 200;

/// Client for the configured node, once it answers.
pub async fn connect(config: &AppConfig) -> ScriptResult<PxeClient> {
    let pxe = PxeClient::new(&config.pxe)?.with_wait_config(config.wait.clone());
    pxe.wait_for_pxe().await?;
    Ok(pxe)
}

/// The first `needed` test account wallets.
pub async fn owner_wallets(pxe: &PxeClient, needed: usize) -> ScriptResult<Vec<Arc<dyn Wallet>>> {
    let wallets = test_wallets(pxe).await?;
    if wallets.len() < needed {
        return Err(ScriptError::NotEnoughTestAccounts {
            needed,
            found: wallets.len(),
        });
    }
    Ok(wallets
        .into_iter()
        .take(needed)
        .map(|w| Arc::new(w) as Arc<dyn Wallet>)
        .collect())
}

/// The token recorded in the address book, bound to `wallet`.
pub async fn load_token(config: &AppConfig, wallet: Arc<dyn Wallet>) -> ScriptResult<TokenContract> {
    let addresses = DeployedAddresses::load(Path::new(&config.token.addresses_path))?;
    Ok(TokenContract::at(addresses.token()?, wallet).await?)
}

/// Deploy a token owned by the first test account and record its address.
pub async fn deploy_token(config: &AppConfig, pxe: &PxeClient) -> ScriptResult<TokenContract> {
    let owner = owner_wallets(pxe, 1).await?.remove(0);

    tracing::info!(owner = %owner.address(), name = %config.token.name, "Deploying token contract");
    let deployed = TokenContract::deploy(
        owner.clone(),
        owner.address(),
        &config.token.name,
        &config.token.symbol,
        config.token.decimals,
    )?
    .send()
    .await?
    .deployed()
    .await?;
    let token = TokenContract::from_contract(deployed)?;

    let addresses = DeployedAddresses {
        token: Some(token.address()),
    };
    addresses.save(Path::new(&config.token.addresses_path))?;
    tracing::info!(address = %token.address(), "Token contract deployed");
    Ok(token)
}

/// Private balance of every registered account.
pub async fn show_private_balances(config: &AppConfig, pxe: &PxeClient) -> ScriptResult<Vec<Balance>> {
    collect_balances(config, pxe, BalanceKind::Private).await
}

/// Public balance of every registered account.
pub async fn show_public_balances(config: &AppConfig, pxe: &PxeClient) -> ScriptResult<Vec<Balance>> {
    collect_balances(config, pxe, BalanceKind::Public).await
}

#[derive(Debug, Clone, Copy)]
enum BalanceKind {
    Private,
    Public,
}

async fn collect_balances(config: &AppConfig, pxe: &PxeClient, kind: BalanceKind) -> ScriptResult<Vec<Balance>> {
    let accounts = pxe.get_registered_accounts().await?;
    let mut balances = Vec::with_capacity(accounts.len());

    for account in accounts {
        let wallet: Arc<dyn Wallet> = Arc::new(PxeWallet::new(pxe.clone(), account));
        let token = load_token(config, wallet).await?;
        let amount = match kind {
            BalanceKind::Private => token.private_balance(account.address).await?,
            BalanceKind::Public => token.public_balance(account.address).await?,
        };
        tracing::info!(account = %account.address, balance = amount, kind = ?kind, "Balance");
        balances.push(Balance {
            account: account.address,
            amount,
        });
    }

    Ok(balances)
}

/// A transaction together with the balances around it.
#[derive(Debug, Clone)]
pub struct BalanceChange {
    pub receipt: TxReceipt,
    pub before: Vec<Balance>,
    pub after: Vec<Balance>,
}

/// Mint `amount` privately to the token owner.
pub async fn mint_private_funds(config: &AppConfig, pxe: &PxeClient, amount: u128) -> ScriptResult<BalanceChange> {
    let owner = owner_wallets(pxe, 1).await?.remove(0);
    let token = load_token(config, owner.clone()).await?;

    let before = show_private_balances(config, pxe).await?;
    let receipt = token
        .mint_to_private(owner.address(), owner.address(), amount)?
        .send()
        .await?
        .wait()
        .await?;
    tracing::info!(owner = %owner.address(), amount, "Minted private funds");
    let after = show_private_balances(config, pxe).await?;

    Ok(BalanceChange { receipt, before, after })
}

/// Result of a public mint: the receipt, the logs it emitted and the public
/// balances around it.
#[derive(Debug, Clone)]
pub struct PublicMintReport {
    pub receipt: TxReceipt,
    pub logs: Vec<String>,
    pub before: Vec<Balance>,
    pub after: Vec<Balance>,
}

/// Mint `amount` publicly to the token owner and read back the emitted logs.
pub async fn mint_public_funds(config: &AppConfig, pxe: &PxeClient, amount: u128) -> ScriptResult<PublicMintReport> {
    let owner = owner_wallets(pxe, 1).await?.remove(0);
    let token = load_token(config, owner.clone()).await?;

    let before = show_public_balances(config, pxe).await?;
    let receipt = token
        .mint_to_public(owner.address(), amount)?
        .send()
        .await?
        .wait()
        .await?;
    tracing::info!(owner = %owner.address(), amount, "Minted public funds");

    let block_number = pxe.get_block_number().await?;
    let filter = LogFilter::from_block(block_number.saturating_sub(1));
    let logs: Vec<String> = pxe
        .get_public_logs(&filter)
        .await?
        .iter()
        .map(|log| log.to_human_readable().chars().take(LOG_PREVIEW_CHARS).collect())
        .collect();
    for log in &logs {
        tracing::info!(log = %log, "Public log");
    }

    let after = show_public_balances(config, pxe).await?;
    Ok(PublicMintReport {
        receipt,
        logs,
        before,
        after,
    })
}

/// Move `amount` privately from the first test account to the second.
pub async fn transfer_private_funds(config: &AppConfig, pxe: &PxeClient, amount: u128) -> ScriptResult<BalanceChange> {
    let wallets = owner_wallets(pxe, 2).await?;
    let (sender, recipient) = (wallets[0].clone(), wallets[1].address());
    let token = load_token(config, sender.clone()).await?;

    let before = show_private_balances(config, pxe).await?;
    let receipt = token.transfer(recipient, amount)?.send().await?.wait().await?;
    tracing::info!(from = %sender.address(), to = %recipient, amount, "Transferred private funds");
    let after = show_private_balances(config, pxe).await?;

    Ok(BalanceChange { receipt, before, after })
}

/// Balances before and after the full token walkthrough.
#[derive(Debug, Clone)]
pub struct TokenDappReport {
    pub token: AztecAddress,
    pub initial_private: Vec<Balance>,
    pub public_mint: PublicMintReport,
    pub final_private: Vec<Balance>,
}

/// Deploy a fresh token and run every flow against it.
pub async fn run_all(config: &AppConfig) -> ScriptResult<TokenDappReport> {
    let pxe = connect(config).await?;
    let token = deploy_token(config, &pxe).await?;

    let initial_private = show_private_balances(config, &pxe).await?;
    mint_private_funds(config, &pxe, PRIVATE_MINT_AMOUNT).await?;
    let public_mint = mint_public_funds(config, &pxe, PUBLIC_MINT_AMOUNT).await?;
    transfer_private_funds(config, &pxe, TRANSFER_AMOUNT).await?;
    let final_private = show_private_balances(config, &pxe).await?;

    Ok(TokenDappReport {
        token: token.address(),
        initial_private,
        public_mint,
        final_private,
    })
}
