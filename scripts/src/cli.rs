//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use alloy::primitives::Address;
use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{accounts, deploy, deploy_upgradeable, show, upgrade},
    constants::{DEFAULT_NETWORK, GAS_LIMIT},
    errors::ScriptError,
    utils::ScriptEnv,
};

/// Deploy and manage the Melos governance contracts
#[derive(Parser)]
pub struct Cli {
    /// The network to act on
    #[command(flatten)]
    pub env: EnvArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Arguments describing the network and local state the scripts act on
#[derive(Args, Clone, Debug)]
pub struct EnvArgs {
    /// The name of the network, e.g. `localhost`, `rinkeby` or `bsc`
    #[arg(short, long, env = "NETWORK", default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Network RPC URL, overrides the `ETH_NODE_URI*` variables
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Private key of the deployer, overrides the network's first account
    #[arg(short, long, env = "PKEY")]
    pub priv_key: Option<String>,

    /// Directory holding the compiled contract artifacts
    #[arg(long, env = "ARTIFACTS_PATH", default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// Directory deployment records are written to, one subdirectory per network
    #[arg(short, long, env = "DEPLOYMENTS_PATH", default_value = "deployments")]
    pub deployments: PathBuf,

    /// JSON file of per-network deploy configuration
    #[arg(short, long, env = "DEPLOY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address of the Melos token, overrides the network's configured token
    #[arg(long, env = "MELOS_TOKEN")]
    pub melos_token: Option<Address>,

    /// Gas limit of each deployment transaction
    #[arg(long, env = "GAS_LIMIT", default_value_t = GAS_LIMIT)]
    pub gas_limit: u64,
}

/// The deploy script commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy every contract and initialize the proxies
    Deploy,
    /// Deploy the implementation, beacon and proxy of a single contract
    DeployUpgradeable(DeployUpgradeableArgs),
    /// Point a contract's beacon at a new implementation
    Upgrade(UpgradeArgs),
    /// Print the recorded deployments of the network
    Show,
    /// Print the named accounts of the network and their balances
    Accounts,
}

impl Command {
    /// Run the command against the given environment
    pub async fn run(self, env: &ScriptEnv) -> Result<(), ScriptError> {
        match self {
            Command::Deploy => deploy(env).await,
            Command::DeployUpgradeable(args) => deploy_upgradeable(args, env).await,
            Command::Upgrade(args) => upgrade(args, env).await,
            Command::Show => show(env),
            Command::Accounts => accounts(env).await,
        }
    }
}

/// Deploy a single upgradeable contract.
///
/// The contract is deployed as `Impl<name>`, then an `UpgradeableBeacon` named
/// `UpBeacon<name>` and a `BeaconProxy` named `<name>Proxy`. The proxy is not
/// initialized.
#[derive(Args)]
pub struct DeployUpgradeableArgs {
    /// The contract to deploy the implementation from
    #[arg(short, long)]
    pub contract: String,

    /// The name to deploy under instead of the contract name
    #[arg(long)]
    pub rename: Option<String>,
}

/// Upgrade a contract's implementation
#[derive(Args)]
pub struct UpgradeArgs {
    /// The deployment name of the upgradeable contract
    #[arg(short, long)]
    pub contract: String,

    /// Address of an already-deployed implementation.
    /// When omitted, the implementation is deployed from the contract's artifact
    #[arg(short, long)]
    pub implementation: Option<Address>,

    /// The artifact to deploy the new implementation from, if it is not named
    /// after the contract
    #[arg(long)]
    pub artifact: Option<String>,
}
