//! Integration tests for the Melos governance contracts. These assume that a
//! dev node (anvil or a hardhat node) is already running.

#![deny(missing_docs)]

mod test_inventory;
mod tests;

use alloy::providers::ext::AnvilApi;
use clap::Parser;
use colored::Colorize;
use eyre::Result;
use melos_scripts::{
    cli::EnvArgs,
    contracts::{MelosGovernorV1, MelosToken, VoteMelos},
    pipeline::deploy_and_setup_contracts,
    utils::setup_env,
};
use test_inventory::{IntegrationTest, TestArgs};
use tracing_subscriber::EnvFilter;

/// The CLI arguments for the integration tests
#[derive(Debug, Clone, Parser)]
struct CliArgs {
    /// The network the dev node runs
    #[command(flatten)]
    env: EnvArgs,

    // --- Test Harness Args --- //
    /// Only run tests whose name contains this string
    #[arg(short, long)]
    test: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let env = setup_env(&args.env).await?;
    let summary = deploy_and_setup_contracts(&env).await?;

    let test_args = TestArgs {
        env: env.clone(),
        melos_token: MelosToken::new(summary.melos_token, env.provider.clone()),
        vote_melos: VoteMelos::new(summary.vote_melos, env.provider.clone()),
        governor: MelosGovernorV1::new(summary.governor, env.provider.clone()),
    };

    let mut run = 0;
    let mut failed = Vec::new();
    for test in inventory::iter::<IntegrationTest> {
        if let Some(filter) = &args.test {
            if !test.name.contains(filter.as_str()) {
                continue;
            }
        }

        // Every test starts from the freshly deployed state
        let snapshot = env.provider.anvil_snapshot().await?;
        let res = (test.test_fn)(test_args.clone()).await;
        if !env.provider.anvil_revert(snapshot).await? {
            eyre::bail!("could not revert to the snapshot taken before {}", test.name);
        }

        run += 1;
        match res {
            Ok(()) => println!("{} {}", "PASS".green().bold(), test.name),
            Err(e) => {
                println!("{} {}: {e:?}", "FAIL".red().bold(), test.name);
                failed.push(test.name);
            }
        }
    }

    if !failed.is_empty() {
        eyre::bail!("{} of {run} tests failed: {}", failed.len(), failed.join(", "));
    }

    println!("{}", format!("{run} tests passed").green().bold());
    Ok(())
}
