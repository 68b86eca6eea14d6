//! Wallet that authorizes with a locally held key.
//!
//! `AuthorizedWallet` wraps a [`PxeWallet`] and replaces exactly one
//! behaviour: witnesses are signed in-process with the account's own key
//! instead of being requested from the node. Sending, simulation and queries
//! go through the wrapped wallet's defaults untouched.

use alloy::primitives::B256;
use async_trait::async_trait;

use crate::account::auth::{AuthRequest, AuthWitness};
use crate::account::identity::CompleteAddress;
use crate::account::keys::{KeyPair, PublicKey};
use crate::account::types::{WalletError, WalletResult};
use crate::account::wallet::{PxeWallet, Wallet};
use crate::observability::metrics;
use crate::pxe::client::PxeClient;

#[derive(Debug, Clone)]
pub struct AuthorizedWallet {
    inner: PxeWallet,
    keys: KeyPair,
}

impl AuthorizedWallet {
    /// Bind `private_key` to `account`.
    ///
    /// Fails with [`WalletError::InvalidKeyBinding`] if the key's public key is
    /// not the one recorded in the identity. No network calls are made.
    pub fn new(pxe: PxeClient, account: CompleteAddress, private_key: &B256) -> WalletResult<Self> {
        let keys = KeyPair::from_secret(private_key)?;
        Self::from_key_pair(PxeWallet::new(pxe, account), keys)
    }

    /// Wrap an existing default wallet with a key pair.
    ///
    /// The identity must be internally consistent (its address derived from
    /// its public key) before the key is compared against it.
    pub fn from_key_pair(inner: PxeWallet, keys: KeyPair) -> WalletResult<Self> {
        let account = inner.complete_address();
        account.validate()?;
        if account.public_key != keys.public_key() {
            return Err(WalletError::InvalidKeyBinding {
                address: account.address,
                expected: account.public_key,
                derived: keys.public_key(),
            });
        }
        Ok(Self { inner, keys })
    }

    pub fn public_key(&self) -> PublicKey {
        self.keys.public_key()
    }
}

#[async_trait]
impl Wallet for AuthorizedWallet {
    fn pxe(&self) -> &PxeClient {
        self.inner.pxe()
    }

    fn complete_address(&self) -> &CompleteAddress {
        self.inner.complete_address()
    }

    async fn create_auth_wit(&self, request: AuthRequest) -> WalletResult<AuthWitness> {
        let message_hash = request.message_hash()?;
        let signature = self.keys.sign(message_hash).await?;
        metrics::record_auth_witness("local");
        tracing::debug!(account = %self.address(), message_hash = %message_hash, "Authorization witness created");
        Ok(AuthWitness::from_signature(message_hash, &signature))
    }
}
