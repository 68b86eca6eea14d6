//! Contract artifacts: the ABI a client needs to call a compiled contract.

use std::fs;
use std::path::Path;

use alloy::primitives::{keccak256, B256};
use serde::{Deserialize, Serialize};

use crate::contract::types::{ContractError, ContractResult};
use crate::pxe::types::{AztecAddress, FunctionCall, FunctionSelector};

/// Where a function executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionType {
    /// Executed and proven on the client.
    Private,
    /// Executed by the sequencer.
    Public,
    /// Off-chain helper, simulation only.
    Utility,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionAbi {
    pub name: String,
    pub function_type: FunctionType,
    #[serde(default)]
    pub is_initializer: bool,
    /// View functions may be simulated but must not change state.
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub parameters: Vec<AbiParameter>,
}

impl FunctionAbi {
    pub fn new(name: &str, function_type: FunctionType) -> Self {
        Self {
            name: name.to_string(),
            function_type,
            is_initializer: false,
            is_static: false,
            parameters: Vec::new(),
        }
    }

    pub fn initializer(mut self) -> Self {
        self.is_initializer = true;
        self
    }

    pub fn view(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn param(mut self, name: &str, kind: &str) -> Self {
        self.parameters.push(AbiParameter {
            name: name.to_string(),
            kind: kind.to_string(),
        });
        self
    }

    /// Canonical signature, e.g. `transfer(AztecAddress,u128)`.
    pub fn signature(&self) -> String {
        let types = self
            .parameters
            .iter()
            .map(|p| p.kind.as_str())
            .collect::<Vec<_>>()
            .join(",");
        format!("{}({})", self.name, types)
    }

    pub fn selector(&self) -> FunctionSelector {
        FunctionSelector::from_signature(&self.signature())
    }

    /// Build a call to this function on `to`, checking the argument count.
    pub fn call(&self, to: AztecAddress, args: Vec<serde_json::Value>) -> ContractResult<FunctionCall> {
        if args.len() != self.parameters.len() {
            return Err(ContractError::ArgumentCount {
                function: self.name.clone(),
                expected: self.parameters.len(),
                actual: args.len(),
            });
        }
        Ok(FunctionCall {
            to,
            selector: self.selector(),
            name: self.name.clone(),
            function_type: self.function_type,
            is_static: self.is_static,
            args,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractArtifact {
    pub name: String,
    pub functions: Vec<FunctionAbi>,
}

impl ContractArtifact {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            functions: Vec::new(),
        }
    }

    pub fn with_function(mut self, function: FunctionAbi) -> Self {
        self.functions.push(function);
        self
    }

    /// Parse an artifact from JSON text.
    pub fn from_json(json: &str) -> ContractResult<Self> {
        serde_json::from_str(json).map_err(|e| ContractError::Artifact(e.to_string()))
    }

    /// Load an artifact JSON file produced by the contract compiler.
    pub fn load(path: &Path) -> ContractResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ContractError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let artifact = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), name = %artifact.name, "Loaded contract artifact");
        Ok(artifact)
    }

    /// Commitment to the artifact's name and ABI.
    pub fn hash(&self) -> B256 {
        let mut preimage = self.name.clone();
        for function in &self.functions {
            let kind = match function.function_type {
                FunctionType::Private => "private",
                FunctionType::Public => "public",
                FunctionType::Utility => "utility",
            };
            preimage.push_str(&format!(
                ";{}:{}:{}:{}",
                kind,
                function.signature(),
                function.is_initializer,
                function.is_static
            ));
        }
        keccak256(preimage.as_bytes())
    }

    pub fn function(&self, name: &str) -> ContractResult<&FunctionAbi> {
        self.functions
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| ContractError::UnknownFunction {
                contract: self.name.clone(),
                function: name.to_string(),
            })
    }

    pub fn initializer(&self) -> ContractResult<&FunctionAbi> {
        self.functions
            .iter()
            .find(|f| f.is_initializer)
            .ok_or_else(|| ContractError::NoInitializer(self.name.clone()))
    }
}
