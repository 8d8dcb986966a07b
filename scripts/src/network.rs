//! Resolution of node urls, accounts and named accounts for a network
//!
//! Node urls and keys are read from the environment so that the same command
//! can target a local node, a testnet or a production network.

use std::{env, str::FromStr};

use alloy::{
    primitives::Address,
    signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner},
};

use crate::{
    constants::{
        DEFAULT_ACCOUNT_COUNT, DEFAULT_MNEMONIC, DEPLOYER_ROLE, ETH_NODE_URI_ENV_VAR,
        ETH_NODE_URI_PREFIX, LOCALHOST_NETWORK, LOCALHOST_RPC_URL, MNEMONIC_ENV_VAR,
        MNEMONIC_PREFIX, NAMED_ACCOUNTS, NETWORK_NAME_PLACEHOLDER, PRIV_KEYS_ENV_VAR,
        PRIV_KEYS_PREFIX,
    },
    errors::ScriptError,
};

// ------------
// | Networks |
// ------------

/// A network the scripts know how to reach
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkSpec<'a> {
    /// The name the network is selected by
    pub name: &'a str,
    /// The network whose node url is used
    pub url_network: &'a str,
    /// The network whose keys are used, `None` for the unsuffixed variables
    pub accounts_network: Option<&'a str>,
    /// The chain id the node must report
    pub chain_id: Option<u64>,
}

/// The networks with a fixed url source, key source and chain id
pub const NETWORKS: &[NetworkSpec<'static>] = &[
    NetworkSpec {
        name: "hardhat",
        url_network: LOCALHOST_NETWORK,
        accounts_network: None,
        chain_id: Some(31337),
    },
    NetworkSpec {
        name: LOCALHOST_NETWORK,
        url_network: LOCALHOST_NETWORK,
        accounts_network: None,
        chain_id: None,
    },
    NetworkSpec {
        name: "staging",
        url_network: "rinkeby",
        accounts_network: Some("rinkeby"),
        chain_id: None,
    },
    NetworkSpec {
        name: "production",
        url_network: "mainnet",
        accounts_network: Some("mainnet"),
        chain_id: None,
    },
    NetworkSpec {
        name: "mainnet",
        url_network: "mainnet",
        accounts_network: Some("mainnet"),
        chain_id: Some(1),
    },
    NetworkSpec {
        name: "rinkeby",
        url_network: "rinkeby",
        accounts_network: Some("rinkeby"),
        chain_id: Some(4),
    },
    NetworkSpec {
        name: "bscTestnet",
        url_network: "bscTestnet",
        accounts_network: Some("bscTestnet"),
        chain_id: Some(97),
    },
    NetworkSpec {
        name: "bsc",
        url_network: "bsc",
        accounts_network: Some("bsc"),
        chain_id: Some(56),
    },
];

impl<'a> NetworkSpec<'a> {
    /// Look up a network by name
    ///
    /// Unknown networks read their own url and keys and accept any chain id
    pub fn resolve(name: &'a str) -> NetworkSpec<'a> {
        NETWORKS
            .iter()
            .find(|n| n.name == name)
            .copied()
            .unwrap_or(NetworkSpec {
                name,
                url_network: name,
                accounts_network: Some(name),
                chain_id: None,
            })
    }

    /// Check the chain id reported by the node against the expected one
    pub fn check_chain_id(&self, actual: u64) -> Result<(), ScriptError> {
        match self.chain_id {
            Some(expected) if expected != actual => Err(ScriptError::ClientInitialization(
                format!(
                    "network \"{}\" expects chain id {} but the node reports {}",
                    self.name, expected, actual
                ),
            )),
            _ => Ok(()),
        }
    }
}

/// Read a non-empty environment variable
fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

/// The node url of a network, read from the process environment
pub fn node_url(network: &str) -> Result<Option<String>, ScriptError> {
    node_url_with(network, env_lookup)
}

/// The node url of a network, reading variables through `lookup`
///
/// `ETH_NODE_URI_<NETWORK>` wins, `localhost` never reads the template, and
/// otherwise `ETH_NODE_URI` is used with `{{networkName}}` substituted
pub fn node_url_with(
    network: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<String>, ScriptError> {
    if !network.is_empty() {
        let key = format!("{ETH_NODE_URI_PREFIX}{}", network.to_uppercase());
        if let Some(uri) = lookup(&key).filter(|u| !u.is_empty()) {
            return Ok(Some(uri));
        }
    }

    if network == LOCALHOST_NETWORK {
        return Ok(Some(LOCALHOST_RPC_URL.to_string()));
    }

    let uri = match lookup(ETH_NODE_URI_ENV_VAR).filter(|u| !u.is_empty()) {
        Some(template) => template.replace(NETWORK_NAME_PLACEHOLDER, network),
        None => return Ok(None),
    };

    if uri.contains("{{") {
        return Err(ScriptError::ClientInitialization(format!(
            "invalid uri or network not supported by node provider: {uri}"
        )));
    }

    Ok(Some(uri))
}

// ------------
// | Accounts |
// ------------

/// Where the signing keys of a network come from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountSource {
    /// An explicit list of hex private keys
    PrivateKeys(Vec<String>),
    /// Keys derived from a mnemonic along the standard Ethereum path
    Mnemonic {
        /// The mnemonic phrase
        phrase: String,
        /// How many accounts the phrase provides
        count: usize,
    },
}

impl AccountSource {
    /// The account source of a network, read from the process environment
    pub fn from_env(network: Option<&str>) -> Self {
        Self::from_lookup(network, env_lookup)
    }

    /// The account source of a network, reading variables through `lookup`
    pub fn from_lookup(network: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let keys_var = match network {
            Some(n) => format!("{PRIV_KEYS_PREFIX}{}", n.to_uppercase()),
            None => PRIV_KEYS_ENV_VAR.to_string(),
        };

        if let Some(keys) = lookup(&keys_var) {
            let keys = keys
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
            return AccountSource::PrivateKeys(keys);
        }

        AccountSource::Mnemonic {
            phrase: mnemonic_with(network, lookup),
            count: DEFAULT_ACCOUNT_COUNT,
        }
    }

    /// The number of accounts this source provides
    pub fn len(&self) -> usize {
        match self {
            AccountSource::PrivateKeys(keys) => keys.len(),
            AccountSource::Mnemonic { count, .. } => *count,
        }
    }

    /// Whether the source provides no accounts
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the signer of the account at `index`
    pub fn signer(&self, index: usize) -> Result<PrivateKeySigner, ScriptError> {
        if index >= self.len() {
            return Err(ScriptError::ClientInitialization(format!(
                "no account at index {index}, only {} configured",
                self.len()
            )));
        }

        match self {
            AccountSource::PrivateKeys(keys) => PrivateKeySigner::from_str(&keys[index])
                .map_err(|e| ScriptError::ClientInitialization(e.to_string())),
            AccountSource::Mnemonic { phrase, .. } => MnemonicBuilder::<English>::default()
                .phrase(phrase.as_str())
                .index(index as u32)
                .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
                .build()
                .map_err(|e| ScriptError::ClientInitialization(e.to_string())),
        }
    }

    /// Build the signers of the first `count` accounts
    pub fn signers(&self, count: usize) -> Result<Vec<PrivateKeySigner>, ScriptError> {
        if self.is_empty() {
            return Err(ScriptError::ClientInitialization(
                "no accounts configured for the network".to_string(),
            ));
        }

        (0..count.min(self.len())).map(|i| self.signer(i)).collect()
    }
}

/// The mnemonic of a network, falling back to `MNEMONIC` and then the development mnemonic
pub fn mnemonic_with(network: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> String {
    network
        .and_then(|n| lookup(&format!("{MNEMONIC_PREFIX}{}", n.to_uppercase())))
        .or_else(|| lookup(MNEMONIC_ENV_VAR))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_MNEMONIC.to_string())
}

// ------------------
// | Named Accounts |
// ------------------

/// A role to address mapping used to parameterize transactions across networks
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedAccounts(Vec<(&'static str, Address)>);

impl NamedAccounts {
    /// Map each named role to the address at its index in `accounts`
    ///
    /// Roles past the end of `accounts` are left unset, only the deployer is required
    pub fn from_addresses(accounts: &[Address]) -> Result<Self, ScriptError> {
        if accounts.is_empty() {
            return Err(ScriptError::ClientInitialization(format!(
                "no account configured for the \"{DEPLOYER_ROLE}\" role"
            )));
        }

        let named = NAMED_ACCOUNTS
            .iter()
            .filter_map(|(role, index)| accounts.get(*index).map(|a| (*role, *a)))
            .collect();
        Ok(NamedAccounts(named))
    }

    /// The address of a role
    pub fn get(&self, role: &str) -> Option<Address> {
        self.0.iter().find(|(r, _)| *r == role).map(|(_, a)| *a)
    }

    /// The address that signs deployments
    pub fn deployer(&self) -> Address {
        // `from_addresses` guarantees the deployer is present
        self.get(DEPLOYER_ROLE).unwrap_or_default()
    }

    /// Iterate over roles and their addresses
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Address)> + '_ {
        self.0.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use alloy::primitives::address;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_node_url_prefers_network_variable() {
        let vars = lookup(&[
            ("ETH_NODE_URI_BSC", "https://bsc.example"),
            ("ETH_NODE_URI", "https://{{networkName}}.provider"),
        ]);
        assert_eq!(
            node_url_with("bsc", vars).unwrap(),
            Some("https://bsc.example".to_string())
        );
    }

    #[test]
    fn test_node_url_localhost_ignores_template() {
        let vars = lookup(&[("ETH_NODE_URI", "https://{{networkName}}.provider")]);
        assert_eq!(
            node_url_with("localhost", vars).unwrap(),
            Some(LOCALHOST_RPC_URL.to_string())
        );
    }

    #[test]
    fn test_node_url_substitutes_template() {
        let vars = lookup(&[("ETH_NODE_URI", "https://{{networkName}}.provider/v3")]);
        assert_eq!(
            node_url_with("rinkeby", vars).unwrap(),
            Some("https://rinkeby.provider/v3".to_string())
        );
    }

    #[test]
    fn test_node_url_unset() {
        assert_eq!(node_url_with("rinkeby", lookup(&[])).unwrap(), None);
    }

    #[test]
    fn test_node_url_rejects_unknown_placeholder() {
        let vars = lookup(&[("ETH_NODE_URI", "https://{{chain}}.provider")]);
        assert!(node_url_with("rinkeby", vars).is_err());
    }

    #[test]
    fn test_account_source_private_keys() {
        let vars = lookup(&[("PRIV_KEYS_BSC", "0x01, 0x02,")]);
        let source = AccountSource::from_lookup(Some("bsc"), vars);
        assert_eq!(
            source,
            AccountSource::PrivateKeys(vec!["0x01".to_string(), "0x02".to_string()])
        );
    }

    #[test]
    fn test_account_source_mnemonic_fallbacks() {
        let vars = lookup(&[("MNEMONIC", "fallback phrase")]);
        assert_eq!(
            AccountSource::from_lookup(Some("bsc"), vars),
            AccountSource::Mnemonic {
                phrase: "fallback phrase".to_string(),
                count: DEFAULT_ACCOUNT_COUNT
            }
        );

        assert_eq!(
            AccountSource::from_lookup(None, lookup(&[])),
            AccountSource::Mnemonic {
                phrase: DEFAULT_MNEMONIC.to_string(),
                count: DEFAULT_ACCOUNT_COUNT
            }
        );
    }

    #[test]
    fn test_development_mnemonic_accounts() {
        let source = AccountSource::from_lookup(None, lookup(&[]));
        let signers = source.signers(2).unwrap();

        assert_eq!(
            signers[0].address(),
            address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
        assert_eq!(
            signers[1].address(),
            address!("70997970C51812dc3A010C7d01b50e0d17dc79C8")
        );
    }

    #[test]
    fn test_signer_out_of_range() {
        let source = AccountSource::PrivateKeys(vec![]);
        assert!(source.is_empty());
        assert!(source.signer(0).is_err());
        assert!(matches!(
            source.signers(3),
            Err(ScriptError::ClientInitialization(_))
        ));
    }

    #[test]
    fn test_named_accounts() {
        let accounts: Vec<Address> = (1..=3).map(Address::repeat_byte).collect();
        let named = NamedAccounts::from_addresses(&accounts).unwrap();

        assert_eq!(named.deployer(), Address::repeat_byte(1));
        assert_eq!(named.get("user2"), Some(Address::repeat_byte(3)));
        assert_eq!(named.get("admin"), None);

        let partial = NamedAccounts::from_addresses(&accounts[..1]).unwrap();
        assert_eq!(partial.deployer(), Address::repeat_byte(1));
        assert_eq!(partial.get("user1"), None);

        assert!(NamedAccounts::from_addresses(&[]).is_err());
    }

    #[test]
    fn test_chain_id_check() {
        let bsc = NetworkSpec::resolve("bsc");
        assert!(bsc.check_chain_id(56).is_ok());
        assert!(bsc.check_chain_id(97).is_err());
        assert!(NetworkSpec::resolve("devnet").check_chain_id(1234).is_ok());
    }
}
