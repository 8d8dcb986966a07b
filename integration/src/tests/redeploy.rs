//! Tests of re-running the deployment against an existing system

use eyre::Result;
use melos_scripts::{pipeline::deploy_and_setup_contracts, transactions::InitializeOutcome};

use crate::{assert_eq_result, integration_test, test_inventory::TestArgs};

/// Tests that a second run reuses every deployment and leaves the proxies' state alone
async fn test_redeploy_reuses_everything(args: TestArgs) -> Result<()> {
    let summary = deploy_and_setup_contracts(&args.env).await?;

    let redeployed: Vec<&str> = summary
        .deployments
        .iter()
        .filter(|r| r.newly_deployed)
        .map(|r| r.name.as_str())
        .collect();
    assert_eq_result!(redeployed, Vec::<&str>::new())?;

    assert_eq_result!(summary.vote_melos, *args.vote_melos.address())?;
    assert_eq_result!(summary.governor, *args.governor.address())?;
    for outcome in [summary.vote_melos_init, summary.governor_init] {
        if !matches!(outcome, InitializeOutcome::Skipped { .. }) {
            eyre::bail!("expected the initializer to be skipped, got {outcome:?}");
        }
    }

    Ok(())
}
integration_test!(test_redeploy_reuses_everything);
