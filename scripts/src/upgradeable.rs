//! Deployment of beacon-proxy triples
//!
//! Every upgradeable contract is deployed as an implementation, an
//! `UpgradeableBeacon` pointing at the implementation, and a `BeaconProxy`
//! pointing at the beacon. A beacon is only deployed once its implementation
//! exists, and a proxy only once its beacon exists.

use alloy::dyn_abi::DynSolValue;

use crate::{
    constants::{BEACON_PROXY_CONTRACT, UPGRADEABLE_BEACON_CONTRACT},
    deployer::ContractDeployer,
    errors::ScriptError,
    types::{beacon_name, impl_name, proxy_name, ContractList, DeployResult, Deployments},
};

/// Deploy the implementation of every entry as `Impl<key>`
pub async fn deploy_impl<D: ContractDeployer>(
    deployer: &D,
    contracts: &ContractList,
) -> Result<Deployments, ScriptError> {
    let mut results = Deployments::default();
    for entry in contracts {
        let key = entry.key();
        results.insert(deployer.deploy(&impl_name(key), key, vec![]).await?);
    }

    Ok(results)
}

/// Deploy an `UpBeacon<child>` for every child, pointing at its entry's implementation
pub async fn deploy_up_beacon<D: ContractDeployer>(
    deployer: &D,
    contracts: &ContractList,
    impl_deployments: &Deployments,
) -> Result<Deployments, ScriptError> {
    let mut results = Deployments::default();
    for entry in contracts {
        let implementation = impl_deployments.address_of(&impl_name(entry.key()))?;
        for child in entry.children() {
            let result = deployer
                .deploy(
                    &beacon_name(child),
                    UPGRADEABLE_BEACON_CONTRACT,
                    vec![DynSolValue::Address(implementation)],
                )
                .await?;
            results.insert(result);
        }
    }

    Ok(results)
}

/// Deploy a `<child>Proxy` for every child, pointing at the child's beacon
///
/// Proxies are deployed without initialization data, initializers are called
/// separately so that an already-initialized proxy does not abort the run
pub async fn deploy_beacon_proxy<D: ContractDeployer>(
    deployer: &D,
    contracts: &ContractList,
    up_beacon_deployments: &Deployments,
) -> Result<Deployments, ScriptError> {
    let mut results = Deployments::default();
    for entry in contracts {
        for child in entry.children() {
            let beacon = up_beacon_deployments.address_of(&beacon_name(child))?;
            let result = deployer
                .deploy(
                    &proxy_name(child),
                    BEACON_PROXY_CONTRACT,
                    vec![DynSolValue::Address(beacon), DynSolValue::Bytes(vec![])],
                )
                .await?;
            results.insert(result);
        }
    }

    Ok(results)
}

/// The three deployments making up one upgradeable contract
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpgradeableDeployment {
    /// The implementation contract
    pub implementation: DeployResult,
    /// The beacon pointing at the implementation
    pub beacon: DeployResult,
    /// The proxy pointing at the beacon
    pub proxy: DeployResult,
}

/// Deploy the implementation, beacon and proxy of a single contract
///
/// The deployments are named after `rename` when given, otherwise after the contract
pub async fn deploy_upgradeable_contract<D: ContractDeployer>(
    deployer: &D,
    contract_name: &str,
    rename: Option<&str>,
) -> Result<UpgradeableDeployment, ScriptError> {
    let key = rename.unwrap_or(contract_name);

    let implementation = deployer.deploy(&impl_name(key), contract_name, vec![]).await?;
    let beacon = deployer
        .deploy(
            &beacon_name(key),
            UPGRADEABLE_BEACON_CONTRACT,
            vec![DynSolValue::Address(implementation.address)],
        )
        .await?;
    let proxy = deployer
        .deploy(
            &proxy_name(key),
            BEACON_PROXY_CONTRACT,
            vec![DynSolValue::Address(beacon.address), DynSolValue::Bytes(vec![])],
        )
        .await?;

    Ok(UpgradeableDeployment {
        implementation,
        beacon,
        proxy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_helpers::{mock_address, MockDeployer},
        types::{proxy_contracts, upgradeable_contracts, ContractEntry},
    };

    #[tokio::test]
    async fn test_triples_reference_dependencies() {
        let deployer = MockDeployer::default();
        let contracts = upgradeable_contracts();

        let impls = deploy_impl(&deployer, &contracts).await.unwrap();
        let beacons = deploy_up_beacon(&deployer, &contracts, &impls).await.unwrap();
        let proxies = deploy_beacon_proxy(&deployer, &proxy_contracts(), &beacons)
            .await
            .unwrap();

        assert_eq!(
            deployer.names(),
            vec![
                "ImplVoteMelos",
                "ImplMelosGovernorV1",
                "UpBeaconVoteMelos",
                "UpBeaconMelosGovernorV1",
                "VoteMelosProxy",
                "MelosGovernorV1Proxy",
            ]
        );

        let beacon_call = deployer.call("UpBeaconVoteMelos").unwrap();
        assert_eq!(beacon_call.contract, "UpgradeableBeacon");
        assert_eq!(
            beacon_call.args,
            vec![DynSolValue::Address(mock_address("ImplVoteMelos"))]
        );

        let proxy_call = deployer.call("MelosGovernorV1Proxy").unwrap();
        assert_eq!(proxy_call.contract, "BeaconProxy");
        assert_eq!(
            proxy_call.args,
            vec![
                DynSolValue::Address(mock_address("UpBeaconMelosGovernorV1")),
                DynSolValue::Bytes(vec![])
            ]
        );

        assert_eq!(impls.len(), 2);
        assert_eq!(
            proxies.address_of("VoteMelosProxy").unwrap(),
            mock_address("VoteMelosProxy")
        );
    }

    #[tokio::test]
    async fn test_shared_implementation() {
        let deployer = MockDeployer::default();
        let contracts = vec![ContractEntry::Shared {
            implementation: "MelosGovernorV1".to_string(),
            children: vec!["CouncilGovernor".to_string(), "TreasuryGovernor".to_string()],
        }];

        let impls = deploy_impl(&deployer, &contracts).await.unwrap();
        let beacons = deploy_up_beacon(&deployer, &contracts, &impls).await.unwrap();
        deploy_beacon_proxy(&deployer, &contracts, &beacons)
            .await
            .unwrap();

        assert_eq!(
            deployer.names(),
            vec![
                "ImplMelosGovernorV1",
                "UpBeaconCouncilGovernor",
                "UpBeaconTreasuryGovernor",
                "CouncilGovernorProxy",
                "TreasuryGovernorProxy",
            ]
        );

        // Each child gets its own beacon over the shared implementation
        let implementation = DynSolValue::Address(mock_address("ImplMelosGovernorV1"));
        assert_eq!(
            deployer.call("UpBeaconTreasuryGovernor").unwrap().args,
            vec![implementation]
        );
        assert_eq!(
            deployer.call("TreasuryGovernorProxy").unwrap().args[0],
            DynSolValue::Address(mock_address("UpBeaconTreasuryGovernor"))
        );
    }

    #[tokio::test]
    async fn test_beacon_requires_implementation() {
        let deployer = MockDeployer::default();
        let res = deploy_up_beacon(&deployer, &upgradeable_contracts(), &Deployments::default()).await;

        assert!(matches!(res, Err(ScriptError::MissingDependency(name)) if name == "ImplVoteMelos"));
        assert!(deployer.names().is_empty());
    }

    #[tokio::test]
    async fn test_proxy_requires_beacon() {
        let deployer = MockDeployer::default();
        let contracts = upgradeable_contracts();
        let impls = deploy_impl(&deployer, &contracts).await.unwrap();

        let res = deploy_beacon_proxy(&deployer, &contracts, &impls).await;
        assert!(
            matches!(res, Err(ScriptError::MissingDependency(name)) if name == "UpBeaconVoteMelos")
        );
    }

    #[tokio::test]
    async fn test_deploy_upgradeable_contract_renamed() {
        let deployer = MockDeployer::default();
        let deployment = deploy_upgradeable_contract(&deployer, "VoteMelos", Some("vMelos"))
            .await
            .unwrap();

        assert_eq!(
            deployer.names(),
            vec!["ImplvMelos", "UpBeaconvMelos", "vMelosProxy"]
        );
        assert_eq!(deployer.call("ImplvMelos").unwrap().contract, "VoteMelos");
        assert_eq!(deployment.proxy.address, mock_address("vMelosProxy"));
        assert_eq!(
            deployer.call("vMelosProxy").unwrap().args[0],
            DynSolValue::Address(deployment.beacon.address)
        );
    }
}
