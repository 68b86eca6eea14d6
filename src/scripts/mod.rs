//! End-to-end flows driven by the binaries.
//!
//! # Flows
//! - `account_abstraction`: deploy a custom account, deploy a token from it,
//!   mint privately, check the balance
//! - `token_dapp`: mint and transfer with the node's test accounts, print
//!   balances and public logs

pub mod account_abstraction;
pub mod token_dapp;

use thiserror::Error;

use crate::account::types::WalletError;
use crate::config::ConfigError;
use crate::contract::types::ContractError;
use crate::pxe::types::{AztecAddress, PxeError};

/// Errors that abort a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pxe(#[from] PxeError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Expected balance of {expected} for {account} but got {actual}")]
    BalanceMismatch {
        account: AztecAddress,
        expected: u128,
        actual: u128,
    },

    #[error("Need {needed} test accounts, node has {found}")]
    NotEnoughTestAccounts { needed: usize, found: usize },
}

pub type ScriptResult<T> = Result<T, ScriptError>;

/// A token balance of one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    pub account: AztecAddress,
    pub amount: u128,
}
