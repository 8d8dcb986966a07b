//! Scripts for deploying and initializing the Melos governance contracts.

#![deny(missing_docs)]

pub mod artifacts;
pub mod chain;
pub mod cli;
mod commands;
pub mod config;
pub mod constants;
pub mod contracts;
pub mod deployer;
pub mod deployments;
pub mod errors;
pub mod network;
pub mod pipeline;
pub mod prompt;
pub mod transactions;
pub mod types;
pub mod upgradeable;
pub mod utils;

#[cfg(test)]
mod test_helpers;
