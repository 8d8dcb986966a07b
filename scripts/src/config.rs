//! Per-network deploy configuration

use std::{collections::BTreeMap, fs, path::Path};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{constants::PRODUCTION_NETWORKS, errors::ScriptError};

/// The deploy parameters of a single network
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployConfig {
    /// The address of an already-deployed Melos token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub melos_token: Option<Address>,
}

/// Deploy configurations keyed by network name
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeployConfigTable(BTreeMap<String, DeployConfig>);

impl Default for DeployConfigTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DeployConfigTable {
    /// The networks configured out of the box
    ///
    /// The production token address is not known ahead of time, it must come
    /// from a config file or the command line
    pub fn builtin() -> Self {
        let networks = ["mainnet", "rinkeby", "bsc"];
        Self(
            networks
                .iter()
                .map(|n| (n.to_string(), DeployConfig::default()))
                .collect(),
        )
    }

    /// The builtin table, extended and overridden by the JSON file at `path`
    pub fn load(path: Option<&Path>) -> Result<Self, ScriptError> {
        let mut table = Self::builtin();
        let Some(path) = path else {
            return Ok(table);
        };

        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::Config(format!("{}: {e}", path.display())))?;
        let overrides: DeployConfigTable = serde_json::from_str(&contents)
            .map_err(|e| ScriptError::Config(format!("{}: {e}", path.display())))?;

        table.0.extend(overrides.0);
        Ok(table)
    }

    /// Set the configuration of a network
    pub fn insert(&mut self, network: &str, config: DeployConfig) {
        self.0.insert(network.to_string(), config);
    }

    /// The configuration of a network
    pub fn for_network(&self, network: &str) -> Result<&DeployConfig, ScriptError> {
        self.0
            .get(network)
            .ok_or_else(|| ScriptError::Config(format!("Unconfigured network: \"{network}\"")))
    }
}

/// Whether a network is a test network, on which the test token is deployed
pub fn is_testnet(network: &str) -> bool {
    !PRODUCTION_NETWORKS.contains(&network)
}
