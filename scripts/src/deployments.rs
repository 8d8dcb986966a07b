//! Persistence of named deployments
//!
//! Each network gets its own directory holding one `<Name>.json` record per
//! deployment, so that later runs can reuse what is already on chain.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

use crate::{constants::JSON_EXTENSION, errors::ScriptError};

/// The persisted record of a named deployment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    /// The address of the deployed contract
    pub address: Address,
    /// The artifact the contract was deployed from
    pub contract_name: String,
    /// The hash of the deployment transaction
    pub transaction_hash: Option<B256>,
    /// The ABI-encoded constructor arguments
    pub args: Bytes,
    /// The keccak hash of the creation code including constructor arguments
    pub bytecode_hash: B256,
    /// The block the deployment was included in
    #[serde(default)]
    pub block_number: Option<u64>,
    /// The gas used by the deployment transaction
    #[serde(default)]
    pub gas_used: Option<u64>,
}

/// The deployment records of a single network
#[derive(Clone, Debug)]
pub struct DeploymentStore {
    /// The directory holding this network's records
    dir: PathBuf,
}

impl DeploymentStore {
    /// The store of `network` below the deployments directory `base`
    pub fn new(base: impl AsRef<Path>, network: &str) -> Self {
        Self {
            dir: base.as_ref().join(network),
        }
    }

    /// The directory holding this network's records
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The path of a named record
    fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{JSON_EXTENSION}"))
    }

    /// Read a named record, if one exists
    pub fn get(&self, name: &str) -> Result<Option<DeploymentRecord>, ScriptError> {
        let path = self.record_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| ScriptError::ReadDeployments(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| ScriptError::ReadDeployments(format!("{}: {e}", path.display())))
    }

    /// The address of a named deployment, if one exists
    pub fn address_of(&self, name: &str) -> Result<Option<Address>, ScriptError> {
        Ok(self.get(name)?.map(|r| r.address))
    }

    /// Write a named record, replacing any previous one
    pub fn save(&self, name: &str, record: &DeploymentRecord) -> Result<(), ScriptError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| ScriptError::WriteDeployments(format!("{}: {e}", self.dir.display())))?;

        let path = self.record_path(name);
        let contents = serde_json::to_string_pretty(record)
            .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
        fs::write(&path, contents)
            .map_err(|e| ScriptError::WriteDeployments(format!("{}: {e}", path.display())))
    }

    /// All records of the network, sorted by name
    pub fn all(&self) -> Result<Vec<(String, DeploymentRecord)>, ScriptError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir)
            .map_err(|e| ScriptError::ReadDeployments(format!("{}: {e}", self.dir.display())))?;

        let mut records = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some(JSON_EXTENSION) {
                continue;
            }

            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some(record) = self.get(name)? {
                records.push((name.to_string(), record));
            }
        }

        records.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(byte: u8) -> DeploymentRecord {
        DeploymentRecord {
            address: Address::repeat_byte(byte),
            contract_name: "UpgradeableBeacon".to_string(),
            transaction_hash: Some(B256::repeat_byte(byte)),
            args: Bytes::from(vec![byte; 32]),
            bytecode_hash: B256::repeat_byte(byte),
            block_number: Some(7),
            gas_used: Some(21_000),
        }
    }

    #[test]
    fn test_records_are_per_network() {
        let base = tempfile::tempdir().unwrap();
        let bsc = DeploymentStore::new(base.path(), "bsc");
        let localhost = DeploymentStore::new(base.path(), "localhost");

        assert_eq!(bsc.get("UpBeaconVoteMelos").unwrap(), None);
        bsc.save("UpBeaconVoteMelos", &record(1)).unwrap();

        assert_eq!(bsc.get("UpBeaconVoteMelos").unwrap(), Some(record(1)));
        assert_eq!(localhost.get("UpBeaconVoteMelos").unwrap(), None);
        assert!(base.path().join("bsc").join("UpBeaconVoteMelos.json").exists());
    }

    #[test]
    fn test_all_sorted_and_overwritten() {
        let base = tempfile::tempdir().unwrap();
        let store = DeploymentStore::new(base.path(), "localhost");
        assert!(store.all().unwrap().is_empty());

        store.save("VoteMelosProxy", &record(1)).unwrap();
        store.save("ImplVoteMelos", &record(2)).unwrap();
        store.save("VoteMelosProxy", &record(3)).unwrap();
        fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

        let names: Vec<_> = store.all().unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["ImplVoteMelos", "VoteMelosProxy"]);
        assert_eq!(
            store.address_of("VoteMelosProxy").unwrap(),
            Some(Address::repeat_byte(3))
        );
    }

    #[test]
    fn test_corrupt_record() {
        let base = tempfile::tempdir().unwrap();
        let store = DeploymentStore::new(base.path(), "localhost");
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.dir().join("VoteMelos.json"), "not json").unwrap();

        assert!(matches!(
            store.get("VoteMelos"),
            Err(ScriptError::ReadDeployments(_))
        ));
    }
}
