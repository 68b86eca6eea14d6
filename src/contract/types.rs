//! Contract error definitions.

use thiserror::Error;

use crate::account::types::WalletError;
use crate::pxe::types::{AztecAddress, PxeError};

/// Errors that can occur while deploying or calling contracts.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Artifact JSON could not be parsed.
    #[error("Invalid contract artifact: {0}")]
    Artifact(String),

    #[error("Contract {contract} has no function named {function}")]
    UnknownFunction { contract: String, function: String },

    #[error("Function {function} expects {expected} arguments, got {actual}")]
    ArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("Contract {0} has no initializer")]
    NoInitializer(String),

    /// Utility functions can only be simulated.
    #[error("Function {0} is a utility function and cannot be sent")]
    NotSendable(String),

    #[error("Contract {0} is not registered with the PXE")]
    NotRegistered(AztecAddress),

    #[error("Failed to decode output of {function}: {reason}")]
    Decode { function: String, reason: String },

    /// Address book is missing an entry or is malformed.
    #[error("Address book error: {0}")]
    AddressBook(String),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Pxe(#[from] PxeError),
}

/// Result type for contract operations.
pub type ContractResult<T> = Result<T, ContractError>;
