//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client
//! tooling. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration handed to the scripts and binaries at startup.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// PXE node connection settings.
    pub pxe: PxeConfig,

    /// Node readiness and transaction polling.
    pub wait: WaitConfig,

    /// Custom account settings.
    pub account: AccountConfig,

    /// Token deployment parameters.
    pub token: TokenConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// PXE node connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PxeConfig {
    /// JSON-RPC endpoint URL of the PXE.
    pub url: String,

    /// Failover endpoint URLs, tried in order after the primary.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for PxeConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            failover_urls: Vec::new(),
            request_timeout_secs: 30,
        }
    }
}

/// Polling configuration for node readiness and transaction receipts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WaitConfig {
    /// Maximum `get_node_info` attempts before giving up on the node.
    pub ready_max_attempts: u32,

    /// Base delay between readiness probes in milliseconds.
    pub ready_base_delay_ms: u64,

    /// Upper bound for the readiness backoff in milliseconds.
    pub ready_max_delay_ms: u64,

    /// Maximum time to wait for a transaction to be mined.
    pub tx_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub tx_poll_interval_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            ready_max_attempts: 30,
            ready_base_delay_ms: 250,
            ready_max_delay_ms: 5_000,
            tx_timeout_secs: 120,
            tx_poll_interval_ms: 1_000,
        }
    }
}

/// Custom account configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Environment variable holding the account secret key (hex).
    /// A random key is generated when the variable is unset.
    pub secret_key_env: String,

    /// Optional deployment salt (hex, 32 bytes). Random when absent.
    pub salt: Option<String>,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            secret_key_env: "PXE_ACCOUNT_SECRET_KEY".to_string(),
            salt: None,
        }
    }
}

/// Token contract deployment parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,

    /// File recording deployed contract addresses.
    pub addresses_path: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "TestToken".to_string(),
            symbol: "TKN".to_string(),
            decimals: 18,
            addresses_path: "addresses.json".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
