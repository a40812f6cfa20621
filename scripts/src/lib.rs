//! Scripts for deploying and initializing the Zikuani contracts behind upgradeable proxies.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod deployer;
pub mod errors;
pub mod params;
pub mod registry;
#[allow(missing_docs, clippy::missing_docs_in_private_items)]
pub mod solidity;
