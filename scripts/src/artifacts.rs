//! Loading Hardhat compilation artifacts

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::json_abi::JsonAbi;
use alloy_primitives::Bytes;
use serde::Deserialize;

use crate::{
    constants::{ARTIFACT_EXTENSION, QUALIFIED_NAME_SEPARATOR},
    errors::ScriptError,
};

/// A compiled contract, ready to be deployed
#[derive(Clone, Debug)]
pub struct ContractFactory {
    /// The contract name
    pub name: String,
    /// The contract ABI
    pub abi: JsonAbi,
    /// The contract creation bytecode
    pub bytecode: Bytes,
}

impl ContractFactory {
    /// Whether the contract ABI defines a function with the given name
    pub fn has_function(&self, name: &str) -> bool {
        self.abi.function(name).is_some_and(|overloads| !overloads.is_empty())
    }
}

/// The subset of a Hardhat artifact we read
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifact {
    /// The contract name
    contract_name: String,
    /// The contract ABI
    abi: JsonAbi,
    /// The contract creation bytecode
    bytecode: Bytes,
}

/// Load the artifact for the named contract from anywhere under `artifacts_dir`
///
/// `name` is either a bare contract name or qualified by its source file, as in
/// `src/mocks/ZikuaniVote.sol:ZikuaniVote`. A bare name compiled from more than
/// one source is rejected.
pub fn load_contract_factory(
    artifacts_dir: &Path,
    name: &str,
) -> Result<ContractFactory, ScriptError> {
    let (source, contract) = match name.rsplit_once(QUALIFIED_NAME_SEPARATOR) {
        Some((source, contract)) => (Some(Path::new(source)), contract),
        None => (None, name),
    };

    let file_name = format!("{}.{}", contract, ARTIFACT_EXTENSION);
    let mut matches = Vec::new();
    collect_artifacts(artifacts_dir, &file_name, &mut matches)?;
    // Hardhat nests each artifact under a directory named after its source file
    matches.retain(|path| {
        source.is_none_or(|source| path.parent().is_some_and(|dir| dir.ends_with(source)))
    });
    matches.sort();

    let path = match matches.as_slice() {
        [] => {
            return Err(ScriptError::ArtifactParsing(format!(
                "no artifact for {} under {}",
                name,
                artifacts_dir.display()
            )))
        }
        [path] => path,
        _ => {
            let paths: Vec<_> = matches.iter().map(|p| p.display().to_string()).collect();
            return Err(ScriptError::ArtifactParsing(format!(
                "{} is ambiguous, qualify it as <source.sol>:{} (found {})",
                name,
                contract,
                paths.join(", ")
            )));
        }
    };

    let content =
        fs::read_to_string(path).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
    let artifact: HardhatArtifact = serde_json::from_str(&content)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;

    if artifact.bytecode.is_empty() {
        return Err(ScriptError::ArtifactParsing(format!(
            "{} has no creation bytecode, is it abstract?",
            artifact.contract_name
        )));
    }

    Ok(ContractFactory {
        name: artifact.contract_name,
        abi: artifact.abi,
        bytecode: artifact.bytecode,
    })
}

/// Recursively collect every file named `file_name` under `dir`
fn collect_artifacts(
    dir: &Path,
    file_name: &str,
    matches: &mut Vec<PathBuf>,
) -> Result<(), ScriptError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        ScriptError::ArtifactParsing(format!("failed to read {}: {}", dir.display(), e))
    })?;

    for entry in entries {
        let path = entry.map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?.path();
        if path.is_dir() {
            collect_artifacts(&path, file_name, matches)?;
        } else if path.file_name().is_some_and(|f| f.to_string_lossy() == file_name) {
            matches.push(path);
        }
    }

    Ok(())
}
