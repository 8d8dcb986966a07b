//! The primitive every deployment goes through: deploy a named contract from
//! an artifact, or reuse the recorded deployment when nothing changed

use alloy::{
    dyn_abi::DynSolValue,
    network::TransactionBuilder,
    primitives::{keccak256, Address, Bytes},
    providers::{DynProvider, Provider},
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use tracing::info;

use crate::{
    artifacts::ArtifactStore,
    deployments::{DeploymentRecord, DeploymentStore},
    errors::ScriptError,
    types::DeployResult,
};

/// Deploys named contracts
#[allow(async_fn_in_trait)]
pub trait ContractDeployer {
    /// Deploy `contract_name` under `deploy_name` with the given constructor arguments
    async fn deploy(
        &self,
        deploy_name: &str,
        contract_name: &str,
        args: Vec<DynSolValue>,
    ) -> Result<DeployResult, ScriptError>;
}

/// ABI-encode constructor arguments as they are appended to creation code
pub fn encode_constructor_args(args: Vec<DynSolValue>) -> Bytes {
    if args.is_empty() {
        return Bytes::new();
    }

    DynSolValue::Tuple(args).abi_encode_params().into()
}

/// Deploys contracts to a chain, recording each deployment in a [`DeploymentStore`]
#[derive(Clone)]
pub struct ChainDeployer {
    /// The provider transactions are sent through
    provider: DynProvider,
    /// The account deployments are sent from
    from: Address,
    /// Where contract artifacts are read from
    artifacts: ArtifactStore,
    /// Where deployments are recorded
    store: DeploymentStore,
    /// The gas limit of each deployment transaction
    gas_limit: u64,
}

impl ChainDeployer {
    /// Create a new deployer
    pub fn new(
        provider: DynProvider,
        from: Address,
        artifacts: ArtifactStore,
        store: DeploymentStore,
        gas_limit: u64,
    ) -> Self {
        Self {
            provider,
            from,
            artifacts,
            store,
            gas_limit,
        }
    }

    /// Whether a recorded deployment can be reused as is
    async fn is_reusable(
        &self,
        record: &DeploymentRecord,
        contract_name: &str,
        bytecode_hash: &[u8],
    ) -> Result<bool, ScriptError> {
        if record.contract_name != contract_name || record.bytecode_hash.as_slice() != bytecode_hash
        {
            return Ok(false);
        }

        // The record may belong to a chain that has since been reset
        let code = self
            .provider
            .get_code_at(record.address)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        Ok(!code.is_empty())
    }

    /// Log the outcome of a deployment
    fn log_result(&self, result: &DeployResult) {
        let status = if result.newly_deployed {
            "[New]"
        } else {
            "[Reused]"
        };

        info!(
            "{} contract \"{}\" (\"{}\") deployed at \"{:#x}\"\n - tx: \"{}\"\n - gas: {}\n - deployer: \"{:#x}\"",
            status,
            result.name,
            result.contract,
            result.address,
            result
                .transaction_hash
                .map(|h| format!("{h:#x}"))
                .unwrap_or_default(),
            result.gas_used.map(|g| g.to_string()).unwrap_or_default(),
            self.from,
        );
    }
}

/// The address a deployment receipt created, failing on a reverted deployment
fn deployed_address(
    deploy_name: &str,
    receipt: &TransactionReceipt,
) -> Result<Address, ScriptError> {
    if !receipt.status() {
        return Err(ScriptError::ContractDeployment(format!(
            "{deploy_name}: transaction {:#x} reverted",
            receipt.transaction_hash
        )));
    }

    receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!("{deploy_name}: receipt has no contract address"))
    })
}

impl ContractDeployer for ChainDeployer {
    async fn deploy(
        &self,
        deploy_name: &str,
        contract_name: &str,
        args: Vec<DynSolValue>,
    ) -> Result<DeployResult, ScriptError> {
        info!("Deploying contract \"{deploy_name}\" (\"{contract_name}\")...");

        let artifact = self.artifacts.load(contract_name)?;
        let args = encode_constructor_args(args);
        let init_code: Bytes = [artifact.bytecode.as_ref(), args.as_ref()].concat().into();
        let bytecode_hash = keccak256(&init_code);

        if let Some(record) = self.store.get(deploy_name)? {
            if self
                .is_reusable(&record, contract_name, bytecode_hash.as_slice())
                .await?
            {
                let result = DeployResult {
                    name: deploy_name.to_string(),
                    contract: contract_name.to_string(),
                    address: record.address,
                    transaction_hash: record.transaction_hash,
                    gas_used: record.gas_used,
                    newly_deployed: false,
                };
                self.log_result(&result);
                return Ok(result);
            }
        }

        let tx = TransactionRequest::default()
            .with_from(self.from)
            .with_deploy_code(init_code)
            .with_gas_limit(self.gas_limit);

        let receipt = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(format!("{deploy_name}: {e}")))?
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(format!("{deploy_name}: {e}")))?;

        let address = deployed_address(deploy_name, &receipt)?;

        let record = DeploymentRecord {
            address,
            contract_name: contract_name.to_string(),
            transaction_hash: Some(receipt.transaction_hash),
            args,
            bytecode_hash,
            block_number: receipt.block_number,
            gas_used: Some(receipt.gas_used),
        };
        self.store.save(deploy_name, &record)?;

        let result = DeployResult {
            name: deploy_name.to_string(),
            contract: contract_name.to_string(),
            address,
            transaction_hash: record.transaction_hash,
            gas_used: record.gas_used,
            newly_deployed: true,
        };
        self.log_result(&result);
        Ok(result)
    }
}
