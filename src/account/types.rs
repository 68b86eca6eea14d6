//! Wallet error definitions.

use thiserror::Error;

use crate::account::keys::PublicKey;
use crate::pxe::types::{AztecAddress, PxeError};

/// Errors that can occur while building wallets or producing witnesses.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The private key does not belong to the account identity.
    #[error("Invalid key binding for {address}: identity expects public key {expected}, private key derives {derived}")]
    InvalidKeyBinding {
        address: AztecAddress,
        expected: PublicKey,
        derived: PublicKey,
    },

    /// The signature primitive could not produce a witness.
    #[error("Signing failed: {0}")]
    SigningFailure(String),

    /// Private key could not be parsed or is not a valid scalar.
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Identity record is internally inconsistent.
    #[error("Invalid account identity: {0}")]
    InvalidIdentity(String),

    /// Account artifact lacks something deployment needs.
    #[error("Account artifact error: {0}")]
    Artifact(String),

    #[error(transparent)]
    Pxe(#[from] PxeError),
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;
