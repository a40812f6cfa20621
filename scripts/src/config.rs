//! Network and compiler profiles for the deploy scripts

use std::fmt::{self, Display};

use clap::ValueEnum;

/// The networks the scripts may deploy to
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Network {
    /// A local development node
    Localhost,
    /// The Polygon Amoy testnet
    Amoy,
    /// The BlockDAG primordial testnet
    BlockdagTestnet,
}

impl Network {
    /// All networks, in display order
    pub const ALL: [Network; 3] = [Network::Localhost, Network::Amoy, Network::BlockdagTestnet];

    /// The connection profile for this network
    pub fn profile(self) -> NetworkProfile {
        match self {
            Network::Localhost => NetworkProfile {
                network: self,
                rpc_url: "http://127.0.0.1:8545",
                chain_id: None,
                gas_price: None,
                registry_key: "localhostAddresses",
            },
            Network::Amoy => NetworkProfile {
                network: self,
                rpc_url: "https://rpc-amoy.polygon.technology/",
                chain_id: None,
                gas_price: None,
                registry_key: "amoyAddresses",
            },
            // Official alternative RPC: https://test-rpc.primordial.bdagscan.com/
            Network::BlockdagTestnet => NetworkProfile {
                network: self,
                rpc_url: "https://rpc.primordial.bdagscan.com/",
                chain_id: Some(1043),
                gas_price: Some(1_000_000_000), // 1 gwei
                registry_key: "blockdagTestnetAddresses",
            },
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Localhost => write!(f, "localhost"),
            Network::Amoy => write!(f, "amoy"),
            Network::BlockdagTestnet => write!(f, "blockdag-testnet"),
        }
    }
}

/// How to reach a network and where its addresses live in the registry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkProfile {
    /// The network this profile describes
    pub network: Network,
    /// The default RPC endpoint
    pub rpc_url: &'static str,
    /// The chain ID the RPC endpoint must report, if pinned
    pub chain_id: Option<u64>,
    /// A fixed gas price override, in wei
    pub gas_price: Option<u128>,
    /// The key of this network's section in the address registry
    pub registry_key: &'static str,
}

impl Display for NetworkProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.network, self.rpc_url)?;
        if let Some(chain_id) = self.chain_id {
            write!(f, " (chain id {})", chain_id)?;
        }
        if let Some(gas_price) = self.gas_price {
            write!(f, " (gas price {} wei)", gas_price)?;
        }
        write!(f, " [registry: {}]", self.registry_key)
    }
}

/// A Solidity compiler profile used to build the contracts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolcProfile {
    /// The compiler version
    pub version: &'static str,
    /// Whether the optimizer is enabled
    pub optimizer_enabled: bool,
    /// The optimizer's expected number of contract runs
    pub optimizer_runs: u32,
}

impl Display for SolcProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let optimizer = if self.optimizer_enabled { "on" } else { "off" };
        write!(
            f,
            "solc {} (optimizer {}, {} runs)",
            self.version, optimizer, self.optimizer_runs
        )
    }
}

/// The contract sources directory the compiler profiles apply to
pub const CONTRACT_SOURCES_PATH: &str = "./src";

/// The compiler profiles the contracts are built with
pub const SOLC_PROFILES: [SolcProfile; 3] = [
    SolcProfile { version: "0.8.20", optimizer_enabled: true, optimizer_runs: 100 },
    SolcProfile { version: "0.8.16", optimizer_enabled: true, optimizer_runs: 100 },
    SolcProfile { version: "0.8.28", optimizer_enabled: true, optimizer_runs: 100 },
];

#[cfg(test)]
mod tests {
    use clap::ValueEnum;

    use super::{Network, SOLC_PROFILES};

    #[test]
    fn test_only_blockdag_pins_chain() {
        assert_eq!(Network::BlockdagTestnet.profile().chain_id, Some(1043));
        assert_eq!(Network::BlockdagTestnet.profile().gas_price, Some(1_000_000_000));
        assert_eq!(Network::Amoy.profile().chain_id, None);
        assert_eq!(Network::Localhost.profile().gas_price, None);
    }

    #[test]
    fn test_network_names_parse() {
        for network in Network::ALL {
            let parsed = Network::from_str(&network.to_string(), false /* ignore_case */).unwrap();
            assert_eq!(parsed, network);
        }
        assert!(Network::from_str("mainnet", false /* ignore_case */).is_err());
    }

    #[test]
    fn test_solc_profiles() {
        let versions: Vec<_> = SOLC_PROFILES.iter().map(|p| p.version).collect();
        assert_eq!(versions, ["0.8.20", "0.8.16", "0.8.28"]);
        assert!(SOLC_PROFILES.iter().all(|p| p.optimizer_enabled && p.optimizer_runs == 100));
    }
}
