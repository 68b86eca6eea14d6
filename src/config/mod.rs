//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse, apply PXE_URL override)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → passed by reference into the client and scripts
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so no file is needed against a local sandbox
//! - No global state: every consumer receives the config explicitly

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_or_default, ConfigError};
pub use schema::{AccountConfig, AppConfig, ObservabilityConfig, PxeConfig, TokenConfig, WaitConfig};
