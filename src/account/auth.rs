//! Authorization requests and witnesses.

use alloy::primitives::{keccak256, Bytes, Signature, B256};
use serde::{Deserialize, Serialize};

use crate::account::keys::PublicKey;
use crate::account::types::{WalletError, WalletResult};
use crate::pxe::types::{AztecAddress, FunctionCall};

const AUTHWIT_DOMAIN: &[u8] = b"pxe-wallet/authwit/v1";

/// Proof that an account approved `request_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthWitness {
    pub request_hash: B256,
    /// 65-byte recoverable signature (r, s, v).
    pub witness: Bytes,
}

impl AuthWitness {
    pub fn from_signature(request_hash: B256, signature: &Signature) -> Self {
        Self {
            request_hash,
            witness: Bytes::copy_from_slice(&signature.as_bytes()),
        }
    }

    /// True if `public_key` signed this witness's request hash.
    pub fn verify(&self, public_key: &PublicKey) -> bool {
        public_key.verify(&self.request_hash, self)
    }
}

/// Something an account is asked to approve.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthRequest {
    /// A ready 32-byte digest.
    Hash(B256),
    /// Caller-supplied digest bytes; anything but 32 bytes is rejected.
    Raw(Vec<u8>),
    /// Arbitrary message, hashed with keccak-256.
    Message(Vec<u8>),
    /// Permission for `caller` to perform `call` on the account's behalf.
    Intent { caller: AztecAddress, call: FunctionCall },
}

impl AuthRequest {
    pub fn message(message: impl AsRef<[u8]>) -> Self {
        Self::Message(message.as_ref().to_vec())
    }

    pub fn intent(caller: AztecAddress, call: FunctionCall) -> Self {
        Self::Intent { caller, call }
    }

    /// The digest that gets signed.
    pub fn message_hash(&self) -> WalletResult<B256> {
        match self {
            Self::Hash(hash) => Ok(*hash),
            Self::Raw(bytes) => {
                if bytes.len() != 32 {
                    return Err(WalletError::SigningFailure(format!(
                        "authorization digest must be 32 bytes, got {}",
                        bytes.len()
                    )));
                }
                Ok(B256::from_slice(bytes))
            }
            Self::Message(message) => Ok(keccak256(message)),
            Self::Intent { caller, call } => Ok(compute_auth_wit_message_hash(*caller, call)),
        }
    }
}

impl From<B256> for AuthRequest {
    fn from(hash: B256) -> Self {
        Self::Hash(hash)
    }
}

/// Digest an account signs to let `caller` execute `call` for it.
///
/// Binds the caller so a witness handed to one contract cannot be replayed by
/// another; the call's own arguments (usually a nonce) bind it to one use.
pub fn compute_auth_wit_message_hash(caller: AztecAddress, call: &FunctionCall) -> B256 {
    let mut data = Vec::with_capacity(AUTHWIT_DOMAIN.len() + 64);
    data.extend_from_slice(AUTHWIT_DOMAIN);
    data.extend_from_slice(caller.as_slice());
    data.extend_from_slice(call.hash().as_slice());
    keccak256(&data)
}
