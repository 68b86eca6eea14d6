//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, gauges, histograms via `metrics`)
//!
//! Consumers:
//!     → stdout/stderr (fmt layer)
//!     → whatever recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - Structured fields, never formatted strings, for addresses and hashes
//! - Secrets never reach a log line
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
