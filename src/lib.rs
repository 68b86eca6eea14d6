//! Client-side tooling for a private execution environment (PXE) node.
//!
//! Wallets, account deployment, contract interaction and the token scripts
//! driven by the `pxe-wallet` and `token-cli` binaries.

pub mod config;
pub mod observability;
pub mod resilience;

pub mod pxe;
pub mod account;
pub mod contract;
pub mod scripts;

pub use account::{AuthorizedWallet, Wallet, WalletError};
pub use config::AppConfig;
pub use pxe::PxeClient;
