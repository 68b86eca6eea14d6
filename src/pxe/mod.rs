//! PXE integration subsystem.
//!
//! # Data Flow
//! ```text
//! PxeConfig (URL, failovers, timeout)
//!     → client.rs (JSON-RPC over HTTP with timeouts and failover)
//!     → types.rs (addresses, calls, payloads, receipts, logs)
//!     → SentTx::wait (receipt polling until mined)
//! ```
//!
//! # Constraints
//! - Every call carries a deadline
//! - Constructing a client never touches the network
//! - Node-side errors are surfaced verbatim, never retried

pub mod client;
pub mod types;

pub use client::{PxeClient, SentTx};
pub use types::{
    AztecAddress, EntrypointPayload, ExtendedPublicLog, FunctionCall, FunctionSelector, LogFilter,
    NodeInfo, PxeError, PxeResult, TxExecutionRequest, TxReceipt, TxStatus,
};
