//! Account identities.

use alloy::primitives::{keccak256, B256};
use serde::{Deserialize, Serialize};

use crate::account::keys::PublicKey;
use crate::account::types::{WalletError, WalletResult};
use crate::pxe::types::AztecAddress;

/// An address bound to its public key and deployment commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompleteAddress {
    pub address: AztecAddress,
    pub public_key: PublicKey,
    /// Commitment to the account contract artifact and deployment salt.
    pub partial_address: B256,
}

impl CompleteAddress {
    pub fn new(public_key: PublicKey, partial_address: B256) -> Self {
        Self {
            address: compute_address(&public_key, &partial_address),
            public_key,
            partial_address,
        }
    }

    /// Identity for an account contract deployed from `artifact_hash` with `salt`.
    pub fn from_artifact(public_key: PublicKey, artifact_hash: &B256, salt: &B256) -> Self {
        Self::new(public_key, compute_partial_address(artifact_hash, salt))
    }

    /// Check the address really is derived from the key and partial address.
    pub fn validate(&self) -> WalletResult<()> {
        let expected = compute_address(&self.public_key, &self.partial_address);
        if expected != self.address {
            return Err(WalletError::InvalidIdentity(format!(
                "address {} does not match derived address {}",
                self.address, expected
            )));
        }
        Ok(())
    }
}

pub fn compute_partial_address(artifact_hash: &B256, salt: &B256) -> B256 {
    let mut data = Vec::with_capacity(8 + 64);
    data.extend_from_slice(b"partial");
    data.extend_from_slice(artifact_hash.as_slice());
    data.extend_from_slice(salt.as_slice());
    keccak256(&data)
}

pub fn compute_address(public_key: &PublicKey, partial_address: &B256) -> AztecAddress {
    let mut data = Vec::with_capacity(8 + 33 + 32);
    data.extend_from_slice(b"address");
    data.extend_from_slice(public_key.as_slice());
    data.extend_from_slice(partial_address.as_slice());
    AztecAddress::from_preimage(&data)
}
