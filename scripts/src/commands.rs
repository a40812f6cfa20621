//! Implementations of the deploy scripts

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use tracing::{info, warn};

use crate::{
    cli::{DeployArgs, PolicyArgs},
    config::{Network, CONTRACT_SOURCES_PATH, SOLC_PROFILES},
    constants::{
        CREDENTIAL_ISSUER_KEY, DEFAULT_PRIVATE_KEY, PROXY_KEY_SUFFIX, QUALIFIED_NAME_SEPARATOR,
        REGISTRATION_SMT_KEY, SELECTOR_BITMASK, VERIFIER_KEY, ZIKUANI_BLACKLIST_TRANSFER_CONTRACT,
        ZIKUANI_BLACKLIST_TRANSFER_INITIALIZER, ZIKUANI_VOTE_CONTRACT, ZIKUANI_VOTE_INITIALIZER,
    },
    deployer::{setup_client, AlloyDeployer, InitializerCall, ProxyDeployer, ProxyDeployment},
    errors::ScriptError,
    params::{current_timestamp, EligibilityParams, PolicyConfig, TransferLists},
    registry::{record_deployment, AddressRegistry},
    solidity::{__ZikuaniBlacklistTransfer_initCall, __ZikuaniVote_initCall},
};

/// The Zikuani contracts deployed behind proxies
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ZikuaniContract {
    /// The identity-gated voting contract
    Vote,
    /// The identity-gated blacklist transfer contract
    BlacklistTransfer,
}

impl ZikuaniContract {
    /// The name of the contract, as compiled
    pub fn name(self) -> &'static str {
        match self {
            ZikuaniContract::Vote => ZIKUANI_VOTE_CONTRACT,
            ZikuaniContract::BlacklistTransfer => ZIKUANI_BLACKLIST_TRANSFER_CONTRACT,
        }
    }

    /// The key under which the contract's proxy is recorded in the registry
    pub fn proxy_key(self) -> String {
        format!("{}{}", self.name(), PROXY_KEY_SUFFIX)
    }

    /// The name to look the contract's artifact up by, qualified by its source
    /// file if one is given
    pub fn artifact_name(self, source: Option<&str>) -> String {
        match source {
            Some(source) => format!("{}{}{}", source, QUALIFIED_NAME_SEPARATOR, self.name()),
            None => self.name().to_string(),
        }
    }
}

/// The addresses a Zikuani contract is initialized with
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DependencyAddresses {
    /// The credential issuer contract
    pub credential_issuer: Address,
    /// The TD3 query proof verifier contract
    pub verifier: Address,
    /// The registration SMT replicator contract
    pub registration_smt: Address,
}

impl DependencyAddresses {
    /// Resolve the dependency addresses for a network, failing if any is missing
    pub fn resolve(registry: &AddressRegistry, network: Network) -> Result<Self, ScriptError> {
        let addresses = registry.network(network.profile().registry_key)?;

        Ok(Self {
            credential_issuer: addresses.address(CREDENTIAL_ISSUER_KEY)?,
            verifier: addresses.address(VERIFIER_KEY)?,
            registration_smt: addresses.address(REGISTRATION_SMT_KEY)?,
        })
    }
}

// ------------
// | Calldata |
// ------------

/// Encode the call to the Zikuani vote initializer
pub fn vote_initializer(params: &EligibilityParams, deps: &DependencyAddresses) -> InitializerCall {
    let call = __ZikuaniVote_initCall {
        params: params.into(),
        credentialIssuer: deps.credential_issuer,
        registrationSMT: deps.registration_smt,
        verifier: deps.verifier,
        selector: U256::from(SELECTOR_BITMASK),
    };

    InitializerCall { name: ZIKUANI_VOTE_INITIALIZER, calldata: Bytes::from(call.abi_encode()) }
}

/// Encode the call to the Zikuani blacklist transfer initializer
pub fn blacklist_transfer_initializer(
    params: &EligibilityParams,
    lists: &TransferLists,
    deps: &DependencyAddresses,
) -> InitializerCall {
    let call = __ZikuaniBlacklistTransfer_initCall {
        params: params.into(),
        lists: lists.into(),
        credentialIssuer: deps.credential_issuer,
        registrationSMT: deps.registration_smt,
        verifier: deps.verifier,
        selector: U256::from(SELECTOR_BITMASK),
    };

    InitializerCall {
        name: ZIKUANI_BLACKLIST_TRANSFER_INITIALIZER,
        calldata: Bytes::from(call.abi_encode()),
    }
}

// --------------
// | Deployment |
// --------------

/// Deploy a Zikuani contract behind a new proxy, initializing it with `initializer`
///
/// Every invocation creates a new proxy, nothing is reused.
pub async fn deploy_zikuani_proxy<D: ProxyDeployer>(
    deployer: &D,
    contract: ZikuaniContract,
    source: Option<&str>,
    initializer: &InitializerCall,
) -> Result<ProxyDeployment, ScriptError> {
    let factory = deployer.contract_factory(&contract.artifact_name(source)).await?;
    info!("deploying {} proxy via {}", factory.name, initializer.name);

    deployer.deploy_proxy(&factory, initializer).await
}

/// The line reporting a finished deployment
pub fn deployment_report(contract: ZikuaniContract, deployment: &ProxyDeployment) -> String {
    format!("{} proxy deployed at {:#x}", contract.name(), deployment.proxy)
}

/// Load the policy named in the arguments, falling back to the example policy
fn load_policy(args: &PolicyArgs) -> Result<PolicyConfig, ScriptError> {
    match &args.policy {
        Some(path) => PolicyConfig::load(path),
        None => {
            warn!("no policy file given, using EXAMPLE policy values - NOT FOR PRODUCTION USE");
            Ok(PolicyConfig::example())
        }
    }
}

/// Build and print the eligibility parameters
fn build_params(policy: &PolicyConfig) -> Result<EligibilityParams, ScriptError> {
    let params = EligibilityParams::build(policy, current_timestamp())?;
    println!("Vote params: {}", params.to_pretty_json()?);
    Ok(params)
}

/// Deploy the contract, print the report and record the proxy if requested
pub async fn deploy_and_report<D: ProxyDeployer>(
    deployer: &D,
    args: &DeployArgs,
    contract: ZikuaniContract,
    initializer: &InitializerCall,
) -> Result<ProxyDeployment, ScriptError> {
    let deployment =
        deploy_zikuani_proxy(deployer, contract, args.source.as_deref(), initializer).await?;
    println!("{}", deployment_report(contract, &deployment));

    if args.record {
        let registry_key = args.network.profile().registry_key;
        record_deployment(
            &args.deployments_path,
            registry_key,
            &contract.proxy_key(),
            deployment.proxy,
        )?;
        info!("recorded {} in {}", contract.proxy_key(), args.deployments_path.display());
    }

    Ok(deployment)
}

/// Connect to the network and deploy the given initializer's contract
async fn connect_and_deploy(
    args: &DeployArgs,
    contract: ZikuaniContract,
    initializer: &InitializerCall,
) -> Result<(), ScriptError> {
    if args.dry_run {
        info!("dry run, not deploying");
        println!("{} calldata: {}", initializer.name, initializer.calldata);
        return Ok(());
    }

    let profile = args.network.profile();
    let priv_key = args.priv_key.clone().unwrap_or_else(|| {
        warn!("no private key supplied, falling back to the placeholder key");
        DEFAULT_PRIVATE_KEY.to_string()
    });
    let rpc_url = args.rpc_url.as_deref().unwrap_or(profile.rpc_url);
    info!("deploying to {} via {}", args.network, rpc_url);

    let (provider, deployer_address) = setup_client(&priv_key, rpc_url, &profile).await?;
    let deployer = AlloyDeployer::new(
        provider,
        deployer_address,
        args.artifacts_dir.clone(),
        profile.gas_price,
        args.confirmations,
    );

    deploy_and_report(&deployer, args, contract, initializer).await?;
    Ok(())
}

/// Resolve the dependencies and policy of a vote deployment and encode its
/// initializer call
pub fn prepare_vote(args: &DeployArgs) -> Result<InitializerCall, ScriptError> {
    let registry = AddressRegistry::load(&args.deployments_path)?;
    let deps = DependencyAddresses::resolve(&registry, args.network)?;

    let policy = load_policy(&args.policy)?;
    let params = build_params(&policy)?;
    println!("verifier contract deployed to {:#x}", deps.verifier);

    Ok(vote_initializer(&params, &deps))
}

/// Resolve the dependencies and policy of a blacklist transfer deployment and
/// encode its initializer call
pub fn prepare_blacklist_transfer(args: &DeployArgs) -> Result<InitializerCall, ScriptError> {
    let registry = AddressRegistry::load(&args.deployments_path)?;
    let deps = DependencyAddresses::resolve(&registry, args.network)?;

    let policy = load_policy(&args.policy)?;
    let params = build_params(&policy)?;
    let lists = TransferLists::build(&policy)?;
    println!("Initial lists: {}", lists.to_pretty_json()?);
    println!("verifier contract deployed to {:#x}", deps.verifier);

    Ok(blacklist_transfer_initializer(&params, &lists, &deps))
}

/// Deploy the Zikuani vote contract behind a proxy
pub async fn deploy_vote(args: DeployArgs) -> Result<(), ScriptError> {
    let initializer = prepare_vote(&args)?;
    connect_and_deploy(&args, ZikuaniContract::Vote, &initializer).await
}

/// Deploy the Zikuani blacklist transfer contract behind a proxy
pub async fn deploy_blacklist_transfer(args: DeployArgs) -> Result<(), ScriptError> {
    let initializer = prepare_blacklist_transfer(&args)?;
    connect_and_deploy(&args, ZikuaniContract::BlacklistTransfer, &initializer).await
}

/// Print the eligibility parameters a policy produces right now
pub fn show_params(args: PolicyArgs) -> Result<(), ScriptError> {
    let policy = load_policy(&args)?;
    build_params(&policy)?;
    println!("Initial lists: {}", TransferLists::build(&policy)?.to_pretty_json()?);
    Ok(())
}

/// Print the network and compiler profiles
pub fn show_networks() {
    println!("Networks:");
    for network in Network::ALL {
        println!("\t{}", network.profile());
    }

    println!("Compilers (sources: {}):", CONTRACT_SOURCES_PATH);
    for profile in SOLC_PROFILES.iter() {
        println!("\t{}", profile);
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, U256};
    use alloy_sol_types::SolCall;

    use crate::{
        constants::SELECTOR_BITMASK,
        params::{EligibilityParams, PolicyConfig, TransferLists},
        solidity::{__ZikuaniBlacklistTransfer_initCall, __ZikuaniVote_initCall},
    };

    use super::{
        blacklist_transfer_initializer, vote_initializer, DependencyAddresses, ZikuaniContract,
    };

    fn deps() -> DependencyAddresses {
        DependencyAddresses {
            credential_issuer: address!("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
            verifier: address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"),
            registration_smt: address!("0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0"),
        }
    }

    #[test]
    fn test_selector_shared_by_initializers() {
        let policy = PolicyConfig::example();
        let params = EligibilityParams::build(&policy, 1_750_000_000).unwrap();
        let lists = TransferLists::build(&policy).unwrap();

        let vote = vote_initializer(&params, &deps());
        let transfer = blacklist_transfer_initializer(&params, &lists, &deps());

        let vote = __ZikuaniVote_initCall::abi_decode(&vote.calldata).unwrap();
        let transfer = __ZikuaniBlacklistTransfer_initCall::abi_decode(&transfer.calldata).unwrap();
        assert_eq!(SELECTOR_BITMASK, 0xA21);
        assert_eq!(vote.selector, U256::from(2593));
        assert_eq!(transfer.selector, vote.selector);
    }

    #[test]
    fn test_transfer_initializer_lists() {
        let policy = PolicyConfig::example();
        let params = EligibilityParams::build(&policy, 1_750_000_000).unwrap();
        let lists = TransferLists::build(&policy).unwrap();

        let call = blacklist_transfer_initializer(&params, &lists, &deps());
        assert_eq!(call.name, "__ZikuaniBlacklistTransfer_init");

        let decoded = __ZikuaniBlacklistTransfer_initCall::abi_decode(&call.calldata).unwrap();
        assert_eq!(decoded.lists.whitelist, policy.transfer_whitelist);
        assert_eq!(decoded.lists.blacklist, policy.transfer_blacklist);
        assert_eq!(decoded.lists.nationalityWhitelist, vec![U256::from(0x435249)]);
        assert_eq!(decoded.verifier, deps().verifier);
    }

    #[test]
    fn test_artifact_names() {
        assert_eq!(ZikuaniContract::Vote.artifact_name(None), "ZikuaniVote");
        assert_eq!(
            ZikuaniContract::BlacklistTransfer.artifact_name(Some("contracts/Transfer.sol")),
            "contracts/Transfer.sol:ZikuaniBlacklistTransfer"
        );
    }

    #[test]
    fn test_proxy_keys() {
        assert_eq!(ZikuaniContract::Vote.proxy_key(), "ZikuaniVoteProxy");
        assert_eq!(
            ZikuaniContract::BlacklistTransfer.proxy_key(),
            "ZikuaniBlacklistTransferProxy"
        );
    }
}
