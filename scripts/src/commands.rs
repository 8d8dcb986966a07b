//! Implementations of the various deploy scripts

use alloy::primitives::utils::format_ether;
use tracing::info;

use crate::{
    cli::{DeployUpgradeableArgs, UpgradeArgs},
    constants::{MELOS_GOVERNOR_V1, VOTE_MELOS},
    contracts::{UpgradeableBeacon, UpgradeableBeaconContract},
    deployer::ContractDeployer,
    errors::ScriptError,
    pipeline::deploy_and_setup_contracts,
    transactions::{send_tx, InitializeOutcome},
    types::{beacon_name, impl_name},
    upgradeable::deploy_upgradeable_contract,
    utils::{log_setup, ScriptEnv},
};

/// Deploy and initialize the whole system
pub async fn deploy(env: &ScriptEnv) -> Result<(), ScriptError> {
    let summary = deploy_and_setup_contracts(env).await?;

    for result in summary.deployments.iter().filter(|r| r.newly_deployed) {
        info!("New deployment: {} at {:#x}", result.name, result.address);
    }

    for (name, outcome) in [
        (VOTE_MELOS, &summary.vote_melos_init),
        (MELOS_GOVERNOR_V1, &summary.governor_init),
    ] {
        match outcome {
            InitializeOutcome::Initialized { transaction_hash } => {
                info!("{name} initialized in {transaction_hash:#x}")
            }
            InitializeOutcome::Skipped { .. } => info!("{name} was not initialized"),
        }
    }

    info!("Melos token: {:#x}", summary.melos_token);
    info!("{VOTE_MELOS}: {:#x}", summary.vote_melos);
    info!("{MELOS_GOVERNOR_V1}: {:#x}", summary.governor);
    Ok(())
}

/// Deploy a single upgradeable contract without initializing it
pub async fn deploy_upgradeable(
    args: DeployUpgradeableArgs,
    env: &ScriptEnv,
) -> Result<(), ScriptError> {
    log_setup(env).await?;

    let deployer = env.chain_deployer();
    let deployment =
        deploy_upgradeable_contract(&deployer, &args.contract, args.rename.as_deref()).await?;

    info!(
        "{} deployed behind proxy {:#x} (beacon {:#x}, implementation {:#x})",
        args.contract,
        deployment.proxy.address,
        deployment.beacon.address,
        deployment.implementation.address
    );
    Ok(())
}

/// Point a contract's beacon at a new implementation
pub async fn upgrade(args: UpgradeArgs, env: &ScriptEnv) -> Result<(), ScriptError> {
    log_setup(env).await?;

    let beacon_deployment = beacon_name(&args.contract);
    let beacon_address = env
        .store
        .address_of(&beacon_deployment)?
        .ok_or(ScriptError::MissingDependency(beacon_deployment))?;

    let implementation = match args.implementation {
        Some(address) => address,
        None => {
            let artifact = args.artifact.as_deref().unwrap_or(&args.contract);
            env.chain_deployer()
                .deploy(&impl_name(&args.contract), artifact, vec![])
                .await?
                .address
        }
    };

    let beacon: UpgradeableBeaconContract =
        UpgradeableBeacon::new(beacon_address, env.provider.clone());
    let current = beacon
        .implementation()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    if current == implementation {
        info!(
            "Beacon of {} already points at {:#x}",
            args.contract, implementation
        );
        return Ok(());
    }

    info!(
        "Upgrading {} from {:#x} to {:#x}...",
        args.contract, current, implementation
    );
    send_tx(beacon.upgradeTo(implementation)).await?;
    Ok(())
}

/// Print the recorded deployments of the network
pub fn show(env: &ScriptEnv) -> Result<(), ScriptError> {
    let records = env.store.all()?;
    if records.is_empty() {
        info!("No deployments recorded for {}", env.network);
        return Ok(());
    }

    for (name, record) in records {
        info!(
            "{name}: {:#x} ({}, block {})",
            record.address,
            record.contract_name,
            record
                .block_number
                .map(|b| b.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
    }

    Ok(())
}

/// Print the named accounts of the network and their balances
pub async fn accounts(env: &ScriptEnv) -> Result<(), ScriptError> {
    for (role, address) in env.accounts.iter() {
        let balance = env.balance(address).await?;
        info!("{role}: {address:#x} ({} ETH)", format_ether(balance));
    }

    Ok(())
}
