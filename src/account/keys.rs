//! Key pairs and public keys.
//!
//! # Security
//! - Secret keys come from the caller, an environment variable, or the OS RNG
//! - Keys are never logged, serialized or written to disk
//! - `Debug` output shows the public key only

use std::fmt;

use alloy::primitives::{hex, FixedBytes, Signature, B256};
use alloy::signers::k256::ecdsa::VerifyingKey;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use serde::{Deserialize, Serialize};

use crate::account::auth::AuthWitness;
use crate::account::types::{WalletError, WalletResult};

/// Compressed SEC1 encoding of a secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey(pub FixedBytes<33>);

impl PublicKey {
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(true);
        Self(FixedBytes::from_slice(point.as_bytes()))
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Check that `witness` authorizes `message_hash` under this key.
    ///
    /// The witness must carry the same request hash, and the signer recovered
    /// from its signature must be this key.
    pub fn verify(&self, message_hash: &B256, witness: &AuthWitness) -> bool {
        if witness.request_hash != *message_hash {
            return false;
        }
        let Ok(signature) = Signature::from_raw(witness.witness.as_ref()) else {
            return false;
        };
        match signature.recover_from_prehash(message_hash) {
            Ok(recovered) => Self::from_verifying_key(&recovered) == *self,
            Err(_) => false,
        }
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

/// A secret signing key and its public key.
#[derive(Clone)]
pub struct KeyPair {
    signer: PrivateKeySigner,
    public_key: PublicKey,
}

impl KeyPair {
    /// Generate a fresh key pair from the OS RNG.
    pub fn random() -> Self {
        Self::from_signer(PrivateKeySigner::random())
    }

    /// Build from a 32-byte secret scalar.
    pub fn from_secret(secret: &B256) -> WalletResult<Self> {
        let signer = PrivateKeySigner::from_bytes(secret)
            .map_err(|e| WalletError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self::from_signer(signer))
    }

    /// Build from a hex-encoded secret, with or without `0x`.
    pub fn from_hex(secret_hex: &str) -> WalletResult<Self> {
        let key_hex = secret_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);
        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| WalletError::InvalidPrivateKey(format!("Invalid private key format: {}", e)))?;
        Ok(Self::from_signer(signer))
    }

    /// Read the secret from `var`, generating a random key if it is unset.
    ///
    /// A set but malformed variable is an error, never silently replaced.
    pub fn from_env_or_random(var: &str) -> WalletResult<Self> {
        match std::env::var(var) {
            Ok(secret) => {
                let keys = Self::from_hex(&secret)?;
                tracing::info!(env_var = var, public_key = %keys.public_key, "Loaded account key from environment");
                Ok(keys)
            }
            Err(_) => {
                let keys = Self::random();
                tracing::info!(public_key = %keys.public_key, "Generated random account key");
                Ok(keys)
            }
        }
    }

    fn from_signer(signer: PrivateKeySigner) -> Self {
        let public_key = PublicKey::from_verifying_key(signer.credential().verifying_key());
        Self { signer, public_key }
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// Sign a 32-byte message hash.
    pub async fn sign(&self, message_hash: B256) -> WalletResult<Signature> {
        self.signer
            .sign_hash(&message_hash)
            .await
            .map_err(|e| WalletError::SigningFailure(e.to_string()))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}
