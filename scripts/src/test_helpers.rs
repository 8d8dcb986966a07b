//! Helpers shared by the unit tests

use std::sync::Mutex;

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{keccak256, Address},
};

use crate::{deployer::ContractDeployer, errors::ScriptError, types::DeployResult};

/// The deterministic address the mock deployer assigns to a deployment name
pub fn mock_address(deploy_name: &str) -> Address {
    Address::from_word(keccak256(deploy_name.as_bytes()))
}

/// A deploy call captured by the [`MockDeployer`]
#[derive(Clone, Debug, PartialEq)]
pub struct DeployCall {
    /// The deployment name
    pub name: String,
    /// The artifact deployed
    pub contract: String,
    /// The constructor arguments
    pub args: Vec<DynSolValue>,
}

/// A deployer that records calls instead of sending transactions
#[derive(Default)]
pub struct MockDeployer {
    /// The calls made, in order
    calls: Mutex<Vec<DeployCall>>,
}

impl MockDeployer {
    /// The deployment names in call order
    pub fn names(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    /// The call that deployed the given name
    pub fn call(&self, name: &str) -> Option<DeployCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name == name)
            .cloned()
    }
}

impl ContractDeployer for MockDeployer {
    async fn deploy(
        &self,
        deploy_name: &str,
        contract_name: &str,
        args: Vec<DynSolValue>,
    ) -> Result<DeployResult, ScriptError> {
        self.calls.lock().unwrap().push(DeployCall {
            name: deploy_name.to_string(),
            contract: contract_name.to_string(),
            args,
        });

        Ok(DeployResult {
            name: deploy_name.to_string(),
            contract: contract_name.to_string(),
            address: mock_address(deploy_name),
            transaction_hash: None,
            gas_used: None,
            newly_deployed: true,
        })
    }
}
