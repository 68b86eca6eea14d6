//! Contract subsystem.
//!
//! # Data Flow
//! ```text
//! ContractArtifact (ABI, from JSON or built in)
//!     → deploy.rs (instance address, registration, initializer tx)
//!     → interaction.rs (Contract::method → send / simulate through a Wallet)
//!     → token.rs (typed token calls)
//! addresses.rs records what scripts deployed.
//! ```

pub mod addresses;
pub mod artifact;
pub mod deploy;
pub mod interaction;
pub mod token;
pub mod types;

pub use addresses::DeployedAddresses;
pub use artifact::{ContractArtifact, FunctionAbi, FunctionType};
pub use deploy::{ContractInstance, DeployMethod, DeploySentTx};
pub use interaction::{Contract, ContractFunctionInteraction};
pub use token::TokenContract;
pub use types::{ContractError, ContractResult};
