//! Block and clock helpers for development nodes

use alloy::{
    eips::BlockNumberOrTag,
    providers::{ext::AnvilApi, Provider},
    rpc::types::Block,
};

use crate::{contracts::Wallet, errors::ScriptError};

/// The number of the latest block
pub async fn block_number(provider: &Wallet) -> Result<u64, ScriptError> {
    provider
        .get_block_number()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
}

/// The latest block
pub async fn latest_block(provider: &Wallet) -> Result<Block, ScriptError> {
    provider
        .get_block_by_number(BlockNumberOrTag::Latest)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        .ok_or_else(|| ScriptError::ContractInteraction("latest block not found".to_string()))
}

/// Mine a single block
pub async fn next_block(provider: &Wallet) -> Result<(), ScriptError> {
    provider
        .evm_mine(None)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    Ok(())
}

/// Set the timestamp of the next block and mine it
pub async fn set_block_time(provider: &Wallet, timestamp: u64) -> Result<(), ScriptError> {
    provider
        .anvil_set_next_block_timestamp(timestamp)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    next_block(provider).await
}

/// Advance the clock by `seconds` and mine a block
pub async fn inc_block_time(provider: &Wallet, seconds: u64) -> Result<(), ScriptError> {
    provider
        .anvil_increase_time(seconds)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    next_block(provider).await
}
