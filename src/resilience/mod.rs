//! Resilience helpers for talking to the PXE.
//!
//! # Data Flow
//! ```text
//! RPC call:
//!     → tokio::time::timeout (per-request deadline, in pxe::client)
//!     → on failure: next failover endpoint
//! Readiness probe:
//!     → retries.rs (bounded attempts, exponential delay with jitter)
//! ```

pub mod retries;

pub use retries::RetryPolicy;
