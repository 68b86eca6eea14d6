//! Account subsystem.
//!
//! # Data Flow
//! ```text
//! secret key (env var or random)
//!     → keys.rs (KeyPair, PublicKey)
//!     → identity.rs (CompleteAddress binding key + artifact + salt)
//!     → manager.rs (register + self-deploy the account contract)
//!     → authorized.rs (AuthorizedWallet: local witness signing)
//!     → wallet.rs (Wallet trait: send / simulate via the PXE)
//! ```
//!
//! # Security Constraints
//! - A wallet only ever signs with the key bound at construction
//! - Signing failures are returned, never replaced by an unsigned request
//! - Keys are never logged

pub mod auth;
pub mod authorized;
pub mod identity;
pub mod keys;
pub mod manager;
pub mod types;
pub mod wallet;

pub use auth::{compute_auth_wit_message_hash, AuthRequest, AuthWitness};
pub use authorized::AuthorizedWallet;
pub use identity::CompleteAddress;
pub use keys::{KeyPair, PublicKey};
pub use manager::{schnorr_account_artifact, AccountManager, DeployAccountTx};
pub use types::{WalletError, WalletResult};
pub use wallet::{test_wallets, PxeWallet, Wallet};
