//! Deployment of upgradeable proxies
//!
//! Concretely, each proxy is a [`TransparentUpgradeableProxy`](https://docs.openzeppelin.com/contracts/5.x/api/proxy#transparent_proxy),
//! which itself deploys a `ProxyAdmin` contract owned by the deployer.
//!
//! Calls made directly to the `TransparentUpgradeableProxy` contract will be forwarded to the implementation contract.
//! Upgrade calls can only be made to the `TransparentUpgradeableProxy` through the `ProxyAdmin`.

use std::{future::Future, path::PathBuf, str::FromStr};

use alloy::{
    network::{Ethereum, TransactionBuilder},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use tracing::{debug, info};

use crate::{
    artifacts::{load_contract_factory, ContractFactory},
    config::NetworkProfile,
    constants::{PROXY_ADMIN_STORAGE_SLOT, TRANSPARENT_PROXY_CONTRACT},
    errors::ScriptError,
};

/// An encoded call to a proxy initializer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitializerCall {
    /// The name of the initializer function
    pub name: &'static str,
    /// The ABI-encoded call, selector included
    pub calldata: Bytes,
}

/// The contracts created by a proxy deployment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProxyDeployment {
    /// The proxy contract, through which the contract is used
    pub proxy: Address,
    /// The implementation contract the proxy forwards to
    pub implementation: Address,
    /// The admin contract through which the proxy is upgraded
    pub proxy_admin: Address,
}

/// Something able to deploy upgradeable proxies
pub trait ProxyDeployer {
    /// Resolve a compiled contract by name
    fn contract_factory(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<ContractFactory, ScriptError>>;

    /// Deploy `factory` behind a new proxy, invoking `initializer` on it,
    /// and wait for the deployment to be confirmed
    fn deploy_proxy(
        &self,
        factory: &ContractFactory,
        initializer: &InitializerCall,
    ) -> impl Future<Output = Result<ProxyDeployment, ScriptError>>;
}

/// Sets up the client with which to deploy contracts, checking the chain ID
/// reported by the RPC endpoint against the network profile
pub async fn setup_client(
    priv_key: &str,
    rpc_url: &str,
    profile: &NetworkProfile,
) -> Result<(DynProvider<Ethereum>, Address), ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(format!("invalid private key: {}", e)))?;
    let deployer = signer.address();

    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);
    let provider = DynProvider::new(provider);

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    if let Some(expected) = profile.chain_id {
        if chain_id != expected {
            return Err(ScriptError::Configuration(format!(
                "{} reports chain id {}, but {} expects {}",
                rpc_url, chain_id, profile.network, expected
            )));
        }
    }
    debug!("connected to {} (chain id {}) as {:#x}", rpc_url, chain_id, deployer);

    Ok((provider, deployer))
}

/// Deploys proxies over an RPC connection, reading contracts from Hardhat artifacts
pub struct AlloyDeployer {
    /// The signing provider
    provider: DynProvider<Ethereum>,
    /// The deployer address, which becomes the initial proxy owner
    deployer: Address,
    /// The directory holding compilation artifacts
    artifacts_dir: PathBuf,
    /// A fixed gas price override, in wei
    gas_price: Option<u128>,
    /// The number of confirmations to wait for on each transaction
    confirmations: u64,
}

impl AlloyDeployer {
    /// Create a new deployer
    pub fn new(
        provider: DynProvider<Ethereum>,
        deployer: Address,
        artifacts_dir: PathBuf,
        gas_price: Option<u128>,
        confirmations: u64,
    ) -> Self {
        Self { provider, deployer, artifacts_dir, gas_price, confirmations }
    }

    /// Send a contract creation transaction and return the created address
    async fn deploy_code(&self, code: Bytes) -> Result<Address, ScriptError> {
        let mut tx = TransactionRequest::default().with_from(self.deployer).with_deploy_code(code);
        if let Some(gas_price) = self.gas_price {
            tx = tx.with_gas_price(gas_price);
        }

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
        debug!("sent deployment tx {:#x}", pending.tx_hash());

        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        if !receipt.status() {
            return Err(ScriptError::ContractDeployment(format!(
                "deployment tx {:#x} reverted",
                receipt.transaction_hash
            )));
        }

        receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "no contract address in receipt of {:#x}",
                receipt.transaction_hash
            ))
        })
    }

    /// Load the proxy contract, which must be compiled alongside the Zikuani contracts
    fn proxy_factory(&self) -> Result<ContractFactory, ScriptError> {
        load_contract_factory(&self.artifacts_dir, TRANSPARENT_PROXY_CONTRACT).map_err(|e| {
            ScriptError::ArtifactParsing(format!(
                "{}; compile @openzeppelin/contracts' {} into {} \
                 (e.g. with hardhat-dependency-compiler)",
                e,
                TRANSPARENT_PROXY_CONTRACT,
                self.artifacts_dir.display()
            ))
        })
    }

    /// Read the proxy admin address out of the proxy's EIP-1967 admin slot
    ///
    /// This is the recommended way to get the proxy admin address:
    /// https://github.com/OpenZeppelin/openzeppelin-contracts/blob/v5.0.0/contracts/proxy/ERC1967/ERC1967Utils.sol#L104-L106
    async fn proxy_admin(&self, proxy: Address) -> Result<Address, ScriptError> {
        let slot = U256::from_be_bytes(PROXY_ADMIN_STORAGE_SLOT.0);
        let word = self
            .provider
            .get_storage_at(proxy, slot)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        Ok(Address::from_word(B256::from(word.to_be_bytes::<32>())))
    }
}

impl ProxyDeployer for AlloyDeployer {
    async fn contract_factory(&self, name: &str) -> Result<ContractFactory, ScriptError> {
        load_contract_factory(&self.artifacts_dir, name)
    }

    async fn deploy_proxy(
        &self,
        factory: &ContractFactory,
        initializer: &InitializerCall,
    ) -> Result<ProxyDeployment, ScriptError> {
        if !factory.has_function(initializer.name) {
            return Err(ScriptError::CalldataConstruction(format!(
                "{} has no initializer named {}",
                factory.name, initializer.name
            )));
        }
        let proxy_factory = self.proxy_factory()?;

        // Deploy the implementation contract
        let implementation = self.deploy_code(factory.bytecode.clone()).await?;
        info!("{} implementation deployed at {:#x}", factory.name, implementation);

        // Deploy the proxy, initializing it in its constructor
        let constructor_args =
            (implementation, self.deployer, initializer.calldata.clone()).abi_encode_params();
        let proxy_code = [proxy_factory.bytecode.as_ref(), constructor_args.as_slice()].concat();
        let proxy = self.deploy_code(proxy_code.into()).await?;

        let proxy_admin = self.proxy_admin(proxy).await?;
        info!("proxy admin deployed at {:#x}", proxy_admin);

        Ok(ProxyDeployment { proxy, implementation, proxy_admin })
    }
}

#[cfg(test)]
mod tests {
    use alloy::{
        json_abi::JsonAbi,
        providers::{DynProvider, ProviderBuilder},
        transports::http::reqwest::Url,
    };
    use alloy_primitives::{Address, Bytes};

    use crate::{artifacts::ContractFactory, errors::ScriptError};

    use super::{AlloyDeployer, InitializerCall, ProxyDeployer};

    /// A deployer whose RPC endpoint refuses connections
    fn offline_deployer(artifacts_dir: &std::path::Path) -> AlloyDeployer {
        let url = Url::parse("http://127.0.0.1:1").unwrap();
        let provider = DynProvider::new(ProviderBuilder::new().connect_http(url));
        AlloyDeployer::new(provider, Address::ZERO, artifacts_dir.to_path_buf(), None, 1)
    }

    fn factory(abi: &str) -> ContractFactory {
        ContractFactory {
            name: "ZikuaniVote".to_string(),
            abi: serde_json::from_str::<JsonAbi>(abi).unwrap(),
            bytecode: Bytes::from_static(&[0x60, 0x80]),
        }
    }

    fn initializer() -> InitializerCall {
        InitializerCall { name: "__ZikuaniVote_init", calldata: Bytes::new() }
    }

    #[tokio::test]
    async fn test_missing_initializer_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let deployer = offline_deployer(dir.path());

        let err = deployer.deploy_proxy(&factory("[]"), &initializer()).await.unwrap_err();
        assert!(matches!(err, ScriptError::CalldataConstruction(_)));
    }

    #[tokio::test]
    async fn test_missing_proxy_artifact_explained() {
        let dir = tempfile::tempdir().unwrap();
        let deployer = offline_deployer(dir.path());
        let abi = r#"[{
            "type": "function",
            "name": "__ZikuaniVote_init",
            "inputs": [],
            "outputs": [],
            "stateMutability": "nonpayable"
        }]"#;

        // Fails on the artifact lookup, before anything is sent
        let err = deployer.deploy_proxy(&factory(abi), &initializer()).await.unwrap_err();
        let ScriptError::ArtifactParsing(msg) = err else { panic!("expected artifact error") };
        assert!(msg.contains("TransparentUpgradeableProxy"));
        assert!(msg.contains("@openzeppelin/contracts"));
    }
}
