//! Constants used in the deploy scripts

/// The gas limit attached to every deployment transaction
pub const GAS_LIMIT: u64 = 5_500_000;

/// The prefix of an implementation contract's deployment name
pub const IMPL_PREFIX: &str = "Impl";

/// The prefix of an upgradeable beacon's deployment name
pub const UPBEACON_PREFIX: &str = "UpBeacon";

/// The suffix of a beacon proxy's deployment name
pub const PROXY_SUFFIX: &str = "Proxy";

/// The artifact name of the OpenZeppelin `UpgradeableBeacon` contract
pub const UPGRADEABLE_BEACON_CONTRACT: &str = "UpgradeableBeacon";

/// The artifact name of the OpenZeppelin `BeaconProxy` contract
pub const BEACON_PROXY_CONTRACT: &str = "BeaconProxy";

/// The vote-escrowed Melos token contract
pub const VOTE_MELOS: &str = "VoteMelos";

/// The Melos governor contract
pub const MELOS_GOVERNOR_V1: &str = "MelosGovernorV1";

/// The mintable Melos token deployed on test networks
pub const TEST_MELOS: &str = "TestMelos";

/// The contracts deployed behind an implementation / beacon pair
pub const UPGRADEABLE_CONTRACTS: [&str; 2] = [VOTE_MELOS, MELOS_GOVERNOR_V1];

/// The contracts that receive a beacon proxy
pub const PROXY_CONTRACTS: [&str; 2] = [VOTE_MELOS, MELOS_GOVERNOR_V1];

/// Networks on which real funds live. Every other network is treated as a testnet
pub const PRODUCTION_NETWORKS: [&str; 2] = ["bsc", "mainnet"];

/// The named accounts and the index of the account each role maps to
pub const NAMED_ACCOUNTS: [(&str, usize); 3] = [("deployer", 0), ("user1", 1), ("user2", 2)];

/// The role of the account that signs deployments
pub const DEPLOYER_ROLE: &str = "deployer";

/// The network used when none is given
pub const DEFAULT_NETWORK: &str = "localhost";

/// The RPC url of a node running on the local machine
pub const LOCALHOST_RPC_URL: &str = "http://localhost:8545";

/// The name of the local network, which never reads `ETH_NODE_URI`
pub const LOCALHOST_NETWORK: &str = "localhost";

/// The placeholder substituted with the network name in `ETH_NODE_URI`
pub const NETWORK_NAME_PLACEHOLDER: &str = "{{networkName}}";

/// The environment variable holding a per-network node url, suffixed with the network name
pub const ETH_NODE_URI_PREFIX: &str = "ETH_NODE_URI_";

/// The environment variable holding the node url template
pub const ETH_NODE_URI_ENV_VAR: &str = "ETH_NODE_URI";

/// The environment variable holding a per-network mnemonic, suffixed with the network name
pub const MNEMONIC_PREFIX: &str = "MNEMONIC_";

/// The environment variable holding the fallback mnemonic
pub const MNEMONIC_ENV_VAR: &str = "MNEMONIC";

/// The environment variable holding comma-separated private keys, suffixed with the network name
pub const PRIV_KEYS_PREFIX: &str = "PRIV_KEYS_";

/// The environment variable holding comma-separated private keys when no network is given
pub const PRIV_KEYS_ENV_VAR: &str = "PRIV_KEYS";

/// The mnemonic used by local development nodes
pub const DEFAULT_MNEMONIC: &str = "test test test test test test test test test test test junk";

/// The number of accounts derived from a mnemonic
pub const DEFAULT_ACCOUNT_COUNT: usize = 50;

/// The number of decimals of the Melos token
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// The extension of deployment records and contract artifacts
pub const JSON_EXTENSION: &str = "json";
