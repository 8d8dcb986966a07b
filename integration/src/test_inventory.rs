//! Defines types and utilities for managing the inventory of integration tests

use std::{future::Future, pin::Pin};

use alloy::primitives::Address;
use eyre::Result;
use melos_scripts::{
    contracts::{MelosGovernorContract, MelosTokenContract, VoteMelosContract, Wallet},
    utils::ScriptEnv,
};

/// The arguments provided to each integration test
#[derive(Clone)]
pub struct TestArgs {
    /// The environment the contracts were deployed with
    pub env: ScriptEnv,
    /// The token locked for votes
    pub melos_token: MelosTokenContract,
    /// The vote-escrow token proxy
    pub vote_melos: VoteMelosContract,
    /// The governor proxy
    pub governor: MelosGovernorContract,
}

impl TestArgs {
    /// The provider, sending from the deployer
    pub fn provider(&self) -> &Wallet {
        &self.env.provider
    }

    /// The address of the deployer
    pub fn deployer(&self) -> Address {
        self.env.deployer()
    }

    /// The address of a named account
    pub fn account(&self, role: &str) -> Result<Address> {
        self.env
            .accounts
            .get(role)
            .ok_or_else(|| eyre::eyre!("no named account \"{role}\""))
    }
}

/// The signature of an integration test
type TestFn = fn(TestArgs) -> Pin<Box<dyn Future<Output = Result<()>>>>;

/// A struct representing an integration test
pub struct IntegrationTest {
    /// The name of the test
    pub name: &'static str,
    /// The test function
    pub test_fn: TestFn,
}

// Collect the integration tests into an iterable
inventory::collect!(IntegrationTest);

/// Macro to register an integration test
#[macro_export]
macro_rules! integration_test {
    ($test_fn:ident) => {
        inventory::submit!($crate::test_inventory::IntegrationTest {
            name: stringify!($test_fn),
            test_fn: move |args| std::boxed::Box::pin($test_fn(args)),
        });
    };
}

/// Return an error from the enclosing test if the two values differ
#[macro_export]
macro_rules! assert_eq_result {
    ($left:expr, $right:expr $(,)?) => {{
        let left = $left;
        let right = $right;
        if left == right {
            Ok(())
        } else {
            Err(eyre::eyre!(
                "assertion failed: `{}` == `{}`\n  left: {:?}\n right: {:?}",
                stringify!($left),
                stringify!($right),
                left,
                right
            ))
        }
    }};
}
