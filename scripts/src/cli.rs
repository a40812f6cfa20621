//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy_blacklist_transfer, deploy_vote, show_networks, show_params},
    config::Network,
    constants::{DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_PATH, DEFAULT_DEPLOY_CONFIRMATIONS},
    errors::ScriptError,
};

/// Deploy the Zikuani contracts behind upgradeable proxies
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

/// The available scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the ZikuaniVote contract behind a proxy
    DeployVote(DeployArgs),
    /// Deploy the ZikuaniBlacklistTransfer contract behind a proxy
    DeployBlacklistTransfer(DeployArgs),
    /// Print the eligibility parameters a policy produces, without deploying
    Params(PolicyArgs),
    /// Print the known network and compiler profiles
    Networks,
}

impl Command {
    /// Run the selected script
    pub async fn run(self) -> Result<(), ScriptError> {
        match self {
            Command::DeployVote(args) => deploy_vote(args).await,
            Command::DeployBlacklistTransfer(args) => deploy_blacklist_transfer(args).await,
            Command::Params(args) => show_params(args),
            Command::Networks => {
                show_networks();
                Ok(())
            }
        }
    }
}

/// Arguments shared by the proxy deployment scripts
#[derive(Args, Clone, Debug)]
pub struct DeployArgs {
    /// The network to deploy to
    #[arg(short, long, env = "DEPLOY_NETWORK")]
    pub network: Network,

    /// Network RPC URL, overriding the network's default endpoint
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Private key of the deployer
    #[arg(short, long, env = "ETHEREUM_ADDRESS_PRIVATE_KEY", hide_env_values = true)]
    pub priv_key: Option<String>,

    /// Path to the address registry of previously deployed contracts
    #[arg(short, long, env = "DEPLOYMENTS_PATH", default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    /// Directory holding the Hardhat compilation artifacts
    ///
    /// Besides the Zikuani contract it must hold an artifact for OpenZeppelin's
    /// `TransparentUpgradeableProxy`, e.g. compiled through
    /// `hardhat-dependency-compiler`.
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Source file of the contract, for when more than one source defines it
    #[arg(short, long)]
    pub source: Option<String>,

    /// The number of confirmations to wait for on each deployment transaction
    #[arg(short, long, default_value_t = DEFAULT_DEPLOY_CONFIRMATIONS)]
    pub confirmations: u64,

    /// Write the deployed proxy address back into the address registry
    #[arg(long, conflicts_with = "dry_run")]
    pub record: bool,

    /// Resolve addresses and encode the initializer call, but do not deploy
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub policy: PolicyArgs,
}

/// Arguments selecting the eligibility policy
#[derive(Args, Clone, Debug)]
pub struct PolicyArgs {
    /// Path to a JSON policy file; the example policy is used if omitted
    #[arg(long, env = "ZIKUANI_POLICY")]
    pub policy: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::config::Network;

    use super::{Cli, Command};

    #[test]
    fn test_parse_deploy_vote() {
        let cli = Cli::try_parse_from([
            "zikuani-scripts",
            "deploy-vote",
            "--network",
            "blockdag-testnet",
            "--dry-run",
        ])
        .unwrap();

        let Command::DeployVote(args) = cli.command else { panic!("expected deploy-vote") };
        assert_eq!(args.network, Network::BlockdagTestnet);
        assert!(args.dry_run);
        assert!(!args.record);
        assert_eq!(args.confirmations, 1);
        assert_eq!(args.deployments_path.to_str(), Some("deployed-contracts/ethereum.json"));
        assert!(args.policy.policy.is_none());
        assert!(args.source.is_none());
    }

    #[test]
    fn test_record_conflicts_with_dry_run() {
        let res = Cli::try_parse_from([
            "zikuani-scripts",
            "deploy-vote",
            "--network",
            "amoy",
            "--dry-run",
            "--record",
        ]);
        assert!(res.is_err());

        let cli = Cli::try_parse_from([
            "zikuani-scripts",
            "deploy-blacklist-transfer",
            "--network",
            "amoy",
            "--record",
            "--source",
            "contracts/ZikuaniBlacklistTransfer.sol",
        ])
        .unwrap();
        let Command::DeployBlacklistTransfer(args) = cli.command else {
            panic!("expected deploy-blacklist-transfer")
        };
        assert!(args.record);
        assert_eq!(args.source.as_deref(), Some("contracts/ZikuaniBlacklistTransfer.sol"));
    }

    #[test]
    fn test_reject_unknown_network() {
        let res = Cli::try_parse_from(["zikuani-scripts", "deploy-vote", "--network", "mainnet"]);
        assert!(res.is_err());
    }
}
