//! Loading of compiled contract artifacts
//!
//! Artifacts are read in the format the Solidity toolchain writes them:
//! one `<ContractName>.json` per contract, holding its ABI and creation bytecode.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::{json_abi::JsonAbi, primitives::Bytes};
use serde::Deserialize;

use crate::{constants::JSON_EXTENSION, errors::ScriptError};

/// A compiled contract
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// The name of the contract
    pub contract_name: String,
    /// The contract's ABI
    pub abi: JsonAbi,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
}

/// A directory of compiled contract artifacts
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    /// The root of the artifacts directory
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root of the artifacts directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the artifact of the named contract
    pub fn load(&self, contract_name: &str) -> Result<ContractArtifact, ScriptError> {
        let path = self.find(contract_name)?.ok_or_else(|| {
            ScriptError::ArtifactParsing(format!(
                "no artifact for \"{contract_name}\" under {}",
                self.root.display()
            ))
        })?;

        let contents = fs::read_to_string(&path)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", path.display())))?;
        let artifact: ContractArtifact = serde_json::from_str(&contents)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", path.display())))?;

        if artifact.bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "\"{contract_name}\" has no bytecode, is it abstract or an interface?"
            )));
        }

        Ok(artifact)
    }

    /// Find the artifact file of the named contract anywhere below the root
    ///
    /// A name defined by more than one source is ambiguous
    fn find(&self, contract_name: &str) -> Result<Option<PathBuf>, ScriptError> {
        let file_name = format!("{contract_name}.{JSON_EXTENSION}");
        let mut pending = vec![self.root.clone()];
        let mut matches = Vec::new();

        while let Some(dir) = pending.pop() {
            let entries = fs::read_dir(&dir)
                .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", dir.display())))?;

            for entry in entries {
                let path = entry
                    .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?
                    .path();

                if path.is_dir() {
                    pending.push(path);
                } else if path.file_name().and_then(|n| n.to_str()) == Some(file_name.as_str()) {
                    matches.push(path);
                }
            }
        }

        if matches.len() > 1 {
            matches.sort();
            let paths: Vec<String> = matches.iter().map(|p| p.display().to_string()).collect();
            return Err(ScriptError::ArtifactParsing(format!(
                "ambiguous artifact \"{contract_name}\", found in {}",
                paths.join(", ")
            )));
        }

        Ok(matches.pop())
    }
}
