use clap::Parser;
use melos_scripts::{cli::Cli, errors::ScriptError, utils::setup_env};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli { env, command } = Cli::parse();

    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let env = setup_env(&env).await?;
    command.run(&env).await
}
