//! PXE-facing types and error definitions.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{hex, keccak256, FixedBytes, TxHash, B256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::auth::AuthWitness;
use crate::contract::artifact::FunctionType;

/// Domain separator mixed into every entrypoint payload hash.
const ENTRYPOINT_DOMAIN: &[u8] = b"pxe-wallet/entrypoint/v1";

/// Errors that can occur while talking to a PXE.
#[derive(Debug, Error)]
pub enum PxeError {
    /// Endpoint URL could not be parsed.
    #[error("Invalid PXE URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport failed on every configured endpoint.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The node answered with a JSON-RPC error object.
    #[error("PXE returned error {code}: {message}")]
    Remote { code: i64, message: String },

    /// The response could not be decoded into the expected type.
    #[error("Failed to decode PXE response for {method}: {reason}")]
    Decode { method: String, reason: String },

    /// The node never became ready.
    #[error("PXE unavailable after {attempts} attempts: {last_error}")]
    Unavailable { attempts: u32, last_error: String },

    /// Transaction was mined but reverted.
    #[error("Transaction {tx_hash} reverted: {reason}")]
    TxReverted { tx_hash: TxHash, reason: String },

    /// Transaction was dropped by the node.
    #[error("Transaction {0} was dropped")]
    TxDropped(TxHash),

    /// Transaction was not mined in time.
    #[error("Transaction {tx_hash} not mined after {secs} seconds")]
    TxTimeout { tx_hash: TxHash, secs: u64 },
}

/// Result type for PXE operations.
pub type PxeResult<T> = Result<T, PxeError>;

/// A 32-byte account or contract address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AztecAddress(pub B256);

impl AztecAddress {
    pub const ZERO: Self = Self(B256::ZERO);

    /// Address derived from arbitrary preimage bytes.
    pub fn from_preimage(data: &[u8]) -> Self {
        Self(keccak256(data))
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Display for AztecAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AztecAddress {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<B256>().map(Self)
    }
}

impl From<B256> for AztecAddress {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

/// First four bytes of the keccak hash of a function signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionSelector(pub FixedBytes<4>);

impl FunctionSelector {
    /// Selector for a signature such as `transfer(AztecAddress,u128)`.
    pub fn from_signature(signature: &str) -> Self {
        let hash = keccak256(signature.as_bytes());
        Self(FixedBytes::from_slice(&hash[..4]))
    }
}

impl fmt::Display for FunctionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// A single contract function invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Target contract.
    pub to: AztecAddress,
    pub selector: FunctionSelector,
    /// Function name, carried for readability on the node side.
    pub name: String,
    pub function_type: FunctionType,
    /// View calls must not change state.
    #[serde(default)]
    pub is_static: bool,
    /// ABI arguments in JSON form.
    pub args: Vec<serde_json::Value>,
}

impl FunctionCall {
    /// Hash committing to target, selector and arguments.
    pub fn hash(&self) -> B256 {
        let args = serde_json::Value::Array(self.args.clone()).to_string();
        let mut data = Vec::with_capacity(32 + 4 + 32);
        data.extend_from_slice(self.to.as_slice());
        data.extend_from_slice(self.selector.0.as_slice());
        data.extend_from_slice(keccak256(args.as_bytes()).as_slice());
        keccak256(&data)
    }
}

/// Calls executed by an account entrypoint in one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrypointPayload {
    /// Random nonce so identical call lists hash differently.
    pub nonce: u64,
    pub calls: Vec<FunctionCall>,
}

impl EntrypointPayload {
    pub fn new(calls: Vec<FunctionCall>) -> Self {
        Self {
            nonce: fastrand::u64(..),
            calls,
        }
    }

    /// Digest the account must authorize for this payload to execute.
    pub fn hash(&self) -> B256 {
        let mut data = Vec::with_capacity(ENTRYPOINT_DOMAIN.len() + 8 + self.calls.len() * 32);
        data.extend_from_slice(ENTRYPOINT_DOMAIN);
        data.extend_from_slice(&self.nonce.to_be_bytes());
        for call in &self.calls {
            data.extend_from_slice(call.hash().as_slice());
        }
        keccak256(&data)
    }
}

/// Everything the PXE needs to prove and submit a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxExecutionRequest {
    /// Account whose entrypoint runs the payload.
    pub origin: AztecAddress,
    pub payload: EntrypointPayload,
    /// Entrypoint witness first, then any extra witnesses for authorized intents.
    pub auth_witnesses: Vec<AuthWitness>,
}

/// Transaction lifecycle as reported by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Success,
    Reverted,
    Dropped,
}

/// Receipt for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub status: TxStatus,
    #[serde(default)]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Node identification returned by `pxe_getNodeInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub node_version: String,
    pub l1_chain_id: u64,
    pub rollup_version: u64,
    #[serde(default)]
    pub enr: Option<String>,
}

/// Filter for `pxe_getPublicLogs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    #[serde(default)]
    pub from_block: Option<u64>,
    #[serde(default)]
    pub to_block: Option<u64>,
    #[serde(default)]
    pub contract_address: Option<AztecAddress>,
}

impl LogFilter {
    pub fn from_block(block: u64) -> Self {
        Self {
            from_block: Some(block),
            ..Default::default()
        }
    }
}

/// A public log together with where it was emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedPublicLog {
    pub block_number: u64,
    pub tx_hash: TxHash,
    pub contract_address: AztecAddress,
    pub fields: Vec<U256>,
}

impl ExtendedPublicLog {
    /// One-line rendering for terminal output.
    pub fn to_human_readable(&self) -> String {
        let fields = self
            .fields
            .iter()
            .map(|f| format!("0x{:x}", f))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "block {} tx {} contract {}: [{}]",
            self.block_number, self.tx_hash, self.contract_address, fields
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(amount: u64) -> FunctionCall {
        FunctionCall {
            to: AztecAddress::from_preimage(b"token"),
            selector: FunctionSelector::from_signature("mint_to_public(AztecAddress,u128)"),
            name: "mint_to_public".to_string(),
            function_type: FunctionType::Public,
            is_static: false,
            args: vec![json!(AztecAddress::ZERO), json!(U256::from(amount))],
        }
    }

    #[test]
    fn test_address_display_roundtrip() {
        let address = AztecAddress::from_preimage(b"alice");
        let text = address.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 66);
        assert_eq!(text.parse::<AztecAddress>().unwrap(), address);
        assert!("0xzz".parse::<AztecAddress>().is_err());
    }

    #[test]
    fn test_selector_is_keccak_prefix() {
        let selector = FunctionSelector::from_signature("transfer(address,uint256)");
        // Same preimage as the well-known ERC-20 selector.
        assert_eq!(selector.to_string(), "0xa9059cbb");
    }

    #[test]
    fn test_call_hash_commits_to_args() {
        assert_eq!(call(100).hash(), call(100).hash());
        assert_ne!(call(100).hash(), call(101).hash());
    }

    #[test]
    fn test_payload_hash_depends_on_nonce() {
        let mut a = EntrypointPayload::new(vec![call(1)]);
        let mut b = a.clone();
        a.nonce = 1;
        b.nonce = 2;
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn test_receipt_serde() {
        let receipt: TxReceipt = serde_json::from_value(json!({
            "tx_hash": TxHash::ZERO,
            "status": "success",
            "block_number": 7
        }))
        .unwrap();
        assert_eq!(receipt.status, TxStatus::Success);
        assert_eq!(receipt.block_number, Some(7));
        assert_eq!(receipt.error, None);
    }

    #[test]
    fn test_log_human_readable() {
        let log = ExtendedPublicLog {
            block_number: 3,
            tx_hash: TxHash::ZERO,
            contract_address: AztecAddress::ZERO,
            fields: vec![U256::from(255)],
        };
        let text = log.to_human_readable();
        assert!(text.starts_with("block 3 tx 0x"));
        assert!(text.ends_with("[0xff]"));
    }

    #[test]
    fn test_error_display() {
        let err = PxeError::Remote {
            code: -32000,
            message: "insufficient balance".to_string(),
        };
        assert_eq!(err.to_string(), "PXE returned error -32000: insufficient balance");
    }
}
