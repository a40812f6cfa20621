//! Reading and writing the address registry, a JSON file mapping
//! network sections to contract names to deployed addresses:
//!
//! ```json
//! { "amoyAddresses": { "TD3QueryProofVerifier": "0x..." } }
//! ```

use std::{fs, path::Path, str::FromStr};

use alloy_primitives::Address;
use serde_json::{Map, Value};

use crate::errors::ScriptError;

/// An address registry loaded from disk
#[derive(Clone, Debug)]
pub struct AddressRegistry {
    /// The parsed registry contents
    json: Value,
}

impl AddressRegistry {
    /// Read the registry at the given path
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScriptError::ReadRegistry(format!("failed to read {}: {}", path.display(), e))
        })?;
        let json: Value = serde_json::from_str(&content).map_err(|e| {
            ScriptError::ReadRegistry(format!("failed to parse {}: {}", path.display(), e))
        })?;
        if !json.is_object() {
            return Err(ScriptError::ReadRegistry(format!(
                "{} does not contain a JSON object",
                path.display()
            )));
        }

        Ok(Self { json })
    }

    /// Select the section for a network, failing if it is absent
    pub fn network<'a>(
        &'a self,
        registry_key: &'a str,
    ) -> Result<NetworkAddresses<'a>, ScriptError> {
        let section = self
            .json
            .get(registry_key)
            .and_then(Value::as_object)
            .ok_or_else(|| ScriptError::MissingNetwork(registry_key.to_string()))?;

        Ok(NetworkAddresses { registry_key, section })
    }
}

/// The addresses deployed on a single network
#[derive(Clone, Copy, Debug)]
pub struct NetworkAddresses<'a> {
    /// The key of this section in the registry
    registry_key: &'a str,
    /// The section contents
    section: &'a Map<String, Value>,
}

impl NetworkAddresses<'_> {
    /// Look up the address of a contract by name
    pub fn address(&self, contract: &str) -> Result<Address, ScriptError> {
        let addr_str = self.section.get(contract).and_then(Value::as_str).ok_or_else(|| {
            ScriptError::MissingContract {
                network: self.registry_key.to_string(),
                contract: contract.to_string(),
            }
        })?;

        Address::from_str(addr_str).map_err(|e| {
            ScriptError::ReadRegistry(format!(
                "failed to parse address {} for {}: {}",
                addr_str, contract, e
            ))
        })
    }
}

/// Write a deployed address into the registry at the given path, creating
/// the file and the network section if they do not exist
pub fn record_deployment(
    path: &Path,
    registry_key: &str,
    contract: &str,
    address: Address,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !path.exists() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ScriptError::WriteRegistry(e.to_string()))?;
        }
        fs::write(path, "{}").map_err(|e| ScriptError::WriteRegistry(e.to_string()))?;
    }
    let mut json = AddressRegistry::load(path)?.json;

    let section = json
        .as_object_mut()
        .ok_or_else(|| ScriptError::WriteRegistry("registry is not a JSON object".to_string()))?
        .entry(registry_key)
        .or_insert_with(|| Value::Object(Map::new()));
    let section = section.as_object_mut().ok_or_else(|| {
        ScriptError::WriteRegistry(format!("registry section {} is not an object", registry_key))
    })?;
    section.insert(contract.to_string(), Value::String(address.to_checksum(None)));

    let content =
        serde_json::to_string_pretty(&json).map_err(|e| ScriptError::Serde(e.to_string()))?;
    fs::write(path, content).map_err(|e| ScriptError::WriteRegistry(e.to_string()))
}
