//! Utilities for the deploy scripts.

use std::str::FromStr;

use alloy::{
    network::EthereumWallet,
    primitives::{utils::format_ether, Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::info;

use crate::{
    artifacts::ArtifactStore,
    cli::EnvArgs,
    config::{is_testnet, DeployConfig, DeployConfigTable},
    constants::NAMED_ACCOUNTS,
    contracts::Wallet,
    deployer::ChainDeployer,
    deployments::DeploymentStore,
    errors::ScriptError,
    network::{node_url, AccountSource, NamedAccounts, NetworkSpec},
};

/// Everything a command needs to act on a network
#[derive(Clone)]
pub struct ScriptEnv {
    /// The name of the network
    pub network: String,
    /// The chain id reported by the node
    pub chain_id: u64,
    /// A provider signing with every named account, sending from the deployer by default
    pub provider: Wallet,
    /// The named accounts of the network
    pub accounts: NamedAccounts,
    /// The network's deployment records
    pub store: DeploymentStore,
    /// The compiled contract artifacts
    pub artifacts: ArtifactStore,
    /// The per-network deploy configuration
    pub deploy_config: DeployConfigTable,
    /// The gas limit of deployment transactions
    pub gas_limit: u64,
}

impl ScriptEnv {
    /// The address that signs deployments
    pub fn deployer(&self) -> Address {
        self.accounts.deployer()
    }

    /// Whether the network is a test network
    pub fn is_testnet(&self) -> bool {
        is_testnet(&self.network)
    }

    /// The deploy configuration of this network
    pub fn config(&self) -> Result<&DeployConfig, ScriptError> {
        self.deploy_config.for_network(&self.network)
    }

    /// A deployer sending from the deployer account
    pub fn chain_deployer(&self) -> ChainDeployer {
        ChainDeployer::new(
            self.provider.clone(),
            self.deployer(),
            self.artifacts.clone(),
            self.store.clone(),
            self.gas_limit,
        )
    }

    /// The ether balance of an address
    pub async fn balance(&self, address: Address) -> Result<U256, ScriptError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
    }
}

/// Resolve the network and its accounts, and connect to its node
pub async fn setup_env(args: &EnvArgs) -> Result<ScriptEnv, ScriptError> {
    let spec = NetworkSpec::resolve(&args.network);

    let rpc_url = match &args.rpc_url {
        Some(url) => url.clone(),
        None => node_url(spec.url_network)?.ok_or_else(|| {
            ScriptError::ClientInitialization(format!(
                "no node url configured for network \"{}\"",
                args.network
            ))
        })?,
    };
    let url = Url::parse(&rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let source = AccountSource::from_env(spec.accounts_network);
    let mut signers = match &args.priv_key {
        Some(_) if source.is_empty() => Vec::new(),
        _ => source.signers(NAMED_ACCOUNTS.len())?,
    };
    if let Some(priv_key) = &args.priv_key {
        let deployer = PrivateKeySigner::from_str(priv_key)
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
        match signers.first_mut() {
            Some(first) => *first = deployer,
            None => signers.push(deployer),
        }
    }

    let addresses: Vec<Address> = signers.iter().map(|s| s.address()).collect();
    let accounts = NamedAccounts::from_addresses(&addresses)?;

    let mut signers = signers.into_iter();
    let deployer = signers
        .next()
        .ok_or_else(|| ScriptError::ClientInitialization("no deployer account".to_string()))?;
    let mut wallet = EthereumWallet::from(deployer);
    for signer in signers {
        wallet.register_signer(signer);
    }

    let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);
    let provider = DynProvider::new(provider);

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    spec.check_chain_id(chain_id)?;

    let mut deploy_config = DeployConfigTable::load(args.config.as_deref())?;
    if let Some(melos_token) = args.melos_token {
        deploy_config.insert(
            &args.network,
            DeployConfig {
                melos_token: Some(melos_token),
            },
        );
    }

    Ok(ScriptEnv {
        network: args.network.clone(),
        chain_id,
        provider,
        accounts,
        store: DeploymentStore::new(&args.deployments, &args.network),
        artifacts: ArtifactStore::new(args.artifacts.clone()),
        deploy_config,
        gas_limit: args.gas_limit,
    })
}

/// Log the network and the deployer's balance before deploying
pub async fn log_setup(env: &ScriptEnv) -> Result<(), ScriptError> {
    let deployer = env.deployer();
    let balance = env.balance(deployer).await?;

    info!("Network: {} (chain id {})", env.network, env.chain_id);
    info!("Signer: {:#x}", deployer);
    info!("Signer balance: {} ETH", format_ether(balance));
    info!("Artifacts: {}", env.artifacts.root().display());
    Ok(())
}

/// Scale a whole token amount by the token's decimals
pub fn to_token_amount(amount: u64, decimals: u8) -> U256 {
    U256::from(amount) * U256::from(10).pow(U256::from(decimals))
}
