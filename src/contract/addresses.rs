//! `addresses.json`: where scripts record deployed contract addresses.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::contract::types::{ContractError, ContractResult};
use crate::pxe::types::AztecAddress;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedAddresses {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<AztecAddress>,
}

impl DeployedAddresses {
    pub fn load(path: &Path) -> ContractResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ContractError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content)
            .map_err(|e| ContractError::AddressBook(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> ContractResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ContractError::AddressBook(e.to_string()))?;
        fs::write(path, content).map_err(|source| ContractError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Saved deployed addresses");
        Ok(())
    }

    /// The token address, or an error naming the missing entry.
    pub fn token(&self) -> ContractResult<AztecAddress> {
        self.token
            .ok_or_else(|| ContractError::AddressBook("no token address recorded".to_string()))
    }
}
