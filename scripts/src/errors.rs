//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Invalid or inconsistent configuration (network, policy, credentials)
    Configuration(String),
    /// Error reading the address registry file
    ReadRegistry(String),
    /// Error writing the address registry file
    WriteRegistry(String),
    /// A network section is missing from the address registry
    MissingNetwork(String),
    /// A contract entry is missing from a network section of the registry
    MissingContract {
        /// The registry section that was searched
        network: String,
        /// The contract name that was not found
        contract: String,
    },
    /// Error reading or parsing a compilation artifact
    ArtifactParsing(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method or reading contract state
    ContractInteraction(String),
    /// Error de/serializing a value
    Serde(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Configuration(s) => write!(f, "configuration error: {}", s),
            ScriptError::ReadRegistry(s) => write!(f, "error reading address registry: {}", s),
            ScriptError::WriteRegistry(s) => write!(f, "error writing address registry: {}", s),
            ScriptError::MissingNetwork(s) => {
                write!(f, "network `{}` not found in address registry", s)
            }
            ScriptError::MissingContract { network, contract } => write!(
                f,
                "contract `{}` not found in address registry section `{}`",
                contract, network
            ),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::Serde(s) => write!(f, "error de/serializing value: {}", s),
        }
    }
}

impl Error for ScriptError {}
