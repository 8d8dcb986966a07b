//! Type definitions used throughout the scripts

use std::collections::BTreeMap;

use alloy::primitives::{Address, B256};
use serde::Deserialize;

use crate::{
    constants::{IMPL_PREFIX, PROXY_CONTRACTS, PROXY_SUFFIX, UPBEACON_PREFIX, UPGRADEABLE_CONTRACTS},
    errors::ScriptError,
};

// ------------------
// | Contract Lists |
// ------------------

/// An entry in a list of upgradeable contracts
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawContractEntry")]
pub enum ContractEntry {
    /// A contract with its own implementation, beacon and proxy
    Single(String),
    /// One implementation shared by several beacons and proxies
    Shared {
        /// The contract the implementation is deployed from
        implementation: String,
        /// The names under which beacons and proxies are deployed
        children: Vec<String>,
    },
}

/// An ordered list of upgradeable contracts
pub type ContractList = Vec<ContractEntry>;

impl ContractEntry {
    /// An entry for a contract that is its own only child
    pub fn single(name: &str) -> Self {
        ContractEntry::Single(name.to_string())
    }

    /// The contract name the implementation is deployed from
    pub fn key(&self) -> &str {
        match self {
            ContractEntry::Single(name) => name,
            ContractEntry::Shared { implementation, .. } => implementation,
        }
    }

    /// The names beacons and proxies are deployed under
    pub fn children(&self) -> Vec<&str> {
        match self {
            ContractEntry::Single(name) => vec![name.as_str()],
            ContractEntry::Shared { children, .. } => children.iter().map(String::as_str).collect(),
        }
    }
}

/// The JSON shape of a contract entry, either `"Name"` or `{ "Name": ["ChildA"] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawContractEntry {
    /// A bare contract name
    Single(String),
    /// A single-key object mapping the implementation to its children
    Shared(BTreeMap<String, Vec<String>>),
}

impl TryFrom<RawContractEntry> for ContractEntry {
    type Error = String;

    fn try_from(raw: RawContractEntry) -> Result<Self, Self::Error> {
        match raw {
            RawContractEntry::Single(name) => Ok(ContractEntry::Single(name)),
            RawContractEntry::Shared(map) => {
                if map.len() != 1 {
                    return Err(format!(
                        "expected exactly one implementation per entry, found {}",
                        map.len()
                    ));
                }

                let (implementation, children) = map.into_iter().next().unwrap_or_default();
                Ok(ContractEntry::Shared {
                    implementation,
                    children,
                })
            }
        }
    }
}

/// The contracts deployed behind an implementation and beacon
pub fn upgradeable_contracts() -> ContractList {
    UPGRADEABLE_CONTRACTS.iter().map(|c| ContractEntry::single(c)).collect()
}

/// The contracts that receive a beacon proxy
pub fn proxy_contracts() -> ContractList {
    PROXY_CONTRACTS.iter().map(|c| ContractEntry::single(c)).collect()
}

/// The deployment name of a contract's implementation
pub fn impl_name(key: &str) -> String {
    format!("{IMPL_PREFIX}{key}")
}

/// The deployment name of a contract's upgradeable beacon
pub fn beacon_name(key: &str) -> String {
    format!("{UPBEACON_PREFIX}{key}")
}

/// The deployment name of a contract's beacon proxy
pub fn proxy_name(key: &str) -> String {
    format!("{key}{PROXY_SUFFIX}")
}

// ---------------
// | Deployments |
// ---------------

/// The outcome of deploying (or reusing) a named contract
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployResult {
    /// The deployment name
    pub name: String,
    /// The artifact the deployment was created from
    pub contract: String,
    /// The address of the deployed contract
    pub address: Address,
    /// The hash of the deployment transaction
    pub transaction_hash: Option<B256>,
    /// The gas used by the deployment transaction
    pub gas_used: Option<u64>,
    /// Whether this run sent a deployment transaction
    pub newly_deployed: bool,
}

/// Named deployment results, in the order they were deployed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deployments(Vec<DeployResult>);

impl Deployments {
    /// Record a deployment, replacing an earlier one with the same name
    pub fn insert(&mut self, result: DeployResult) {
        match self.0.iter_mut().find(|r| r.name == result.name) {
            Some(existing) => *existing = result,
            None => self.0.push(result),
        }
    }

    /// Record all deployments of another set
    pub fn extend(&mut self, other: Deployments) {
        for result in other.0 {
            self.insert(result);
        }
    }

    /// Look up a deployment by name
    pub fn get(&self, name: &str) -> Option<&DeployResult> {
        self.0.iter().find(|r| r.name == name)
    }

    /// The address of a named deployment, which must already exist
    pub fn address_of(&self, name: &str) -> Result<Address, ScriptError> {
        self.get(name)
            .map(|r| r.address)
            .ok_or_else(|| ScriptError::MissingDependency(name.to_string()))
    }

    /// The deployment names in deployment order
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|r| r.name.as_str()).collect()
    }

    /// Iterate over the deployments in deployment order
    pub fn iter(&self) -> impl Iterator<Item = &DeployResult> {
        self.0.iter()
    }

    /// The number of deployments
    pub fn len(&self) -> usize {
        self.0.len()
    }
}
