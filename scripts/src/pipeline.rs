//! The full deployment of the governance system
//!
//! Deploys the token (on test networks), the plain contracts and the
//! upgradeable triples, then initializes the proxies. Every step reuses
//! deployments recorded by earlier runs, so the pipeline can be re-run after a
//! partial failure.

use alloy::primitives::Address;
use tracing::info;

use crate::{
    config::DeployConfig,
    constants::{MELOS_GOVERNOR_V1, TEST_MELOS, VOTE_MELOS},
    contracts::{
        MelosGovernorContract, MelosGovernorV1, MelosToken, MelosTokenContract, VoteMelos,
        VoteMelosContract,
    },
    deployer::ContractDeployer,
    deployments::DeploymentStore,
    errors::ScriptError,
    prompt::prompt_for_address,
    transactions::{try_initialize, InitializeOutcome},
    types::{proxy_contracts, proxy_name, upgradeable_contracts, Deployments},
    upgradeable::{deploy_beacon_proxy, deploy_impl, deploy_up_beacon},
    utils::{log_setup, ScriptEnv},
};

// --------------
// | Deployment |
// --------------

/// Deploy every contract of the system, in dependency order
///
/// The test token is only deployed on test networks
pub async fn deploy_contracts<D: ContractDeployer>(
    deployer: &D,
    is_testnet: bool,
) -> Result<Deployments, ScriptError> {
    let mut deployments = Deployments::default();

    if is_testnet {
        deployments.insert(deployer.deploy(TEST_MELOS, TEST_MELOS, vec![]).await?);
    }

    deployments.insert(deployer.deploy(VOTE_MELOS, VOTE_MELOS, vec![]).await?);
    deployments.insert(deployer.deploy(MELOS_GOVERNOR_V1, MELOS_GOVERNOR_V1, vec![]).await?);

    let contracts = upgradeable_contracts();
    let impls = deploy_impl(deployer, &contracts).await?;
    let beacons = deploy_up_beacon(deployer, &contracts, &impls).await?;
    let proxies = deploy_beacon_proxy(deployer, &proxy_contracts(), &beacons).await?;

    deployments.extend(impls);
    deployments.extend(beacons);
    deployments.extend(proxies);
    Ok(deployments)
}

// --------------
// | Resolution |
// --------------

/// The address a logical contract name resolves to
///
/// The `<name>Proxy` deployment is preferred over the plain `<name>` deployment
pub fn resolve_address(store: &DeploymentStore, name: &str) -> Result<Option<Address>, ScriptError> {
    match store.address_of(&proxy_name(name))? {
        Some(address) => Ok(Some(address)),
        None => store.address_of(name),
    }
}

/// Resolve a contract from the deployment records, asking the operator when
/// it was never recorded
pub fn address_or_prompt(store: &DeploymentStore, name: &str) -> Result<Address, ScriptError> {
    info!("Getting contract \"{name}\"...");
    match resolve_address(store, name)? {
        Some(address) => Ok(address),
        None => prompt_for_address(&format!(
            "Unable to find \"{name}\" in the deployments, please enter its address"
        )),
    }
}

/// The Melos token of the network
///
/// Test networks use the deployed test token, other networks the configured one
pub fn melos_token_address(
    is_testnet: bool,
    store: &DeploymentStore,
    config: Option<&DeployConfig>,
) -> Result<Address, ScriptError> {
    if is_testnet {
        return resolve_address(store, TEST_MELOS)?
            .ok_or_else(|| ScriptError::MissingDependency(TEST_MELOS.to_string()));
    }

    config.and_then(|c| c.melos_token).ok_or_else(|| {
        ScriptError::Config("no melosToken configured for a production network".to_string())
    })
}

/// Handles to the deployed contracts
pub struct DeployedContracts {
    /// The token locked for votes
    pub melos_token: MelosTokenContract,
    /// The vote-escrow token, through its proxy
    pub vote_melos: VoteMelosContract,
    /// The governor, through its proxy
    pub governor: MelosGovernorContract,
}

/// Bind the deployed contracts of the environment
pub fn get_deployed_contracts(env: &ScriptEnv) -> Result<DeployedContracts, ScriptError> {
    info!("Getting deployed contracts...");

    let config = if env.is_testnet() {
        None
    } else {
        Some(env.config()?)
    };
    let token = melos_token_address(env.is_testnet(), &env.store, config)?;
    info!("Melos token: {token:#x}");

    let vote_melos = address_or_prompt(&env.store, VOTE_MELOS)?;
    let governor = address_or_prompt(&env.store, MELOS_GOVERNOR_V1)?;

    Ok(DeployedContracts {
        melos_token: MelosToken::new(token, env.provider.clone()),
        vote_melos: VoteMelos::new(vote_melos, env.provider.clone()),
        governor: MelosGovernorV1::new(governor, env.provider.clone()),
    })
}

// ---------
// | Setup |
// ---------

/// The result of a full deployment
#[derive(Clone, Debug)]
pub struct DeploySummary {
    /// Every deployment of the run, in order
    pub deployments: Deployments,
    /// The token the vote-escrow token locks
    pub melos_token: Address,
    /// The resolved vote-escrow token
    pub vote_melos: Address,
    /// The resolved governor
    pub governor: Address,
    /// The outcome of initializing the vote-escrow token
    pub vote_melos_init: InitializeOutcome,
    /// The outcome of initializing the governor
    pub governor_init: InitializeOutcome,
}

/// Deploy the whole system and initialize the proxies
pub async fn deploy_and_setup_contracts(env: &ScriptEnv) -> Result<DeploySummary, ScriptError> {
    log_setup(env).await?;

    let deployer = env.chain_deployer();
    let deployments = deploy_contracts(&deployer, env.is_testnet()).await?;

    let contracts = get_deployed_contracts(env)?;
    let melos_token = *contracts.melos_token.address();
    let vote_melos = *contracts.vote_melos.address();
    let governor = *contracts.governor.address();

    let vote_melos_init =
        try_initialize(VOTE_MELOS, contracts.vote_melos.initialize(melos_token)).await?;
    let governor_init =
        try_initialize(MELOS_GOVERNOR_V1, contracts.governor.initialize(vote_melos)).await?;

    let reused = deployments.iter().filter(|r| !r.newly_deployed).count();
    info!("{} deployments, {reused} reused", deployments.len());
    Ok(DeploySummary {
        deployments,
        melos_token,
        vote_melos,
        governor,
        vote_melos_init,
        governor_init,
    })
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Bytes, B256};

    use super::*;
    use crate::{deployments::DeploymentRecord, test_helpers::MockDeployer};

    fn record(address: Address, contract_name: &str) -> DeploymentRecord {
        DeploymentRecord {
            address,
            contract_name: contract_name.to_string(),
            transaction_hash: None,
            args: Bytes::new(),
            bytecode_hash: B256::ZERO,
            block_number: None,
            gas_used: None,
        }
    }

    #[tokio::test]
    async fn test_deploy_order_testnet() {
        let deployer = MockDeployer::default();
        let deployments = deploy_contracts(&deployer, true).await.unwrap();

        let expected = vec![
            "TestMelos",
            "VoteMelos",
            "MelosGovernorV1",
            "ImplVoteMelos",
            "ImplMelosGovernorV1",
            "UpBeaconVoteMelos",
            "UpBeaconMelosGovernorV1",
            "VoteMelosProxy",
            "MelosGovernorV1Proxy",
        ];
        assert_eq!(deployer.names(), expected);
        assert_eq!(deployments.names(), expected);
    }

    #[tokio::test]
    async fn test_production_skips_test_token() {
        let deployer = MockDeployer::default();
        let deployments = deploy_contracts(&deployer, false).await.unwrap();

        assert!(deployments.get(TEST_MELOS).is_none());
        assert_eq!(deployments.names()[0], "VoteMelos");
        assert_eq!(deployments.len(), 8);
    }

    #[test]
    fn test_resolve_prefers_proxy() {
        let base = tempfile::tempdir().unwrap();
        let store = DeploymentStore::new(base.path(), "localhost");
        assert_eq!(resolve_address(&store, VOTE_MELOS).unwrap(), None);

        store
            .save(VOTE_MELOS, &record(Address::repeat_byte(1), VOTE_MELOS))
            .unwrap();
        assert_eq!(
            resolve_address(&store, VOTE_MELOS).unwrap(),
            Some(Address::repeat_byte(1))
        );

        store
            .save("VoteMelosProxy", &record(Address::repeat_byte(2), "BeaconProxy"))
            .unwrap();
        assert_eq!(
            resolve_address(&store, VOTE_MELOS).unwrap(),
            Some(Address::repeat_byte(2))
        );
    }

    #[test]
    fn test_melos_token_on_testnet() {
        let base = tempfile::tempdir().unwrap();
        let store = DeploymentStore::new(base.path(), "rinkeby");

        let res = melos_token_address(true, &store, None);
        assert!(matches!(res, Err(ScriptError::MissingDependency(name)) if name == TEST_MELOS));

        store
            .save(TEST_MELOS, &record(Address::repeat_byte(9), TEST_MELOS))
            .unwrap();
        assert_eq!(
            melos_token_address(true, &store, None).unwrap(),
            Address::repeat_byte(9)
        );
    }

    #[test]
    fn test_melos_token_on_production() {
        let base = tempfile::tempdir().unwrap();
        let store = DeploymentStore::new(base.path(), "bsc");
        store
            .save(TEST_MELOS, &record(Address::repeat_byte(9), TEST_MELOS))
            .unwrap();

        let res = melos_token_address(false, &store, Some(&DeployConfig::default()));
        assert!(matches!(res, Err(ScriptError::Config(_))));

        let config = DeployConfig {
            melos_token: Some(Address::repeat_byte(4)),
        };
        assert_eq!(
            melos_token_address(false, &store, Some(&config)).unwrap(),
            Address::repeat_byte(4)
        );
    }
}
