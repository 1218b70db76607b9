//! Module for loading the build artifact of the compiled game contract.

use crate::bytecode::Bytecode;
use crate::errors::ArtifactError;
use ethabi::Contract as Abi;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// Represents a Hardhat build artifact.
#[derive(Clone, Debug, Deserialize)]
#[serde(default = "Artifact::empty")]
pub struct Artifact {
    /// The contract name.
    #[serde(rename = "contractName")]
    pub contract_name: String,
    /// The contract ABI.
    pub abi: Abi,
    /// The contract deployment bytecode.
    pub bytecode: Bytecode,
}

impl Artifact {
    /// Creates an empty artifact instance.
    pub fn empty() -> Self {
        Artifact {
            contract_name: String::new(),
            abi: Abi {
                constructor: None,
                functions: BTreeMap::new(),
                events: BTreeMap::new(),
                errors: BTreeMap::new(),
                fallback: false,
                receive: false,
            },
            bytecode: Default::default(),
        }
    }

    /// Parse an artifact from JSON.
    pub fn from_json<S>(json: S) -> Result<Self, ArtifactError>
    where
        S: AsRef<str>,
    {
        let artifact = serde_json::from_str(json.as_ref())?;
        Ok(artifact)
    }

    /// Loads the artifact for the named contract from a Hardhat build
    /// directory. Hardhat lays build output out one directory per source
    /// file, so the artifact for a contract lives at
    /// `<root>/<name>.sol/<name>.json`.
    pub fn load<P>(root: P, name: &str) -> Result<Self, ArtifactError>
    where
        P: AsRef<Path>,
    {
        let path = root
            .as_ref()
            .join(format!("{name}.sol"))
            .join(format!("{name}.json"));
        let json = File::open(path)?;
        let artifact = serde_json::from_reader(json)?;
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parse_empty() {
        if let Err(err) = Artifact::from_json("{}") {
            panic!("error parsing empty artifact: {:?}", err);
        }
    }

    #[test]
    fn parse_hardhat_output() {
        let artifact = Artifact::from_json(
            r#"{
                "_format": "hh-sol-artifact-1",
                "contractName": "GuessTheNumberGameWithPot",
                "sourceName": "contracts/GuessTheNumberGameWithPot.sol",
                "abi": [
                    {
                        "type": "constructor",
                        "stateMutability": "nonpayable",
                        "inputs": [{ "name": "token", "type": "address" }]
                    },
                    {
                        "type": "function",
                        "name": "endRound",
                        "stateMutability": "nonpayable",
                        "inputs": [],
                        "outputs": []
                    }
                ],
                "bytecode": "0x60806040",
                "deployedBytecode": "0x6080",
                "linkReferences": {}
            }"#,
        )
        .unwrap();

        assert_eq!(artifact.contract_name, "GuessTheNumberGameWithPot");
        assert_eq!(artifact.abi.constructor.as_ref().unwrap().inputs.len(), 1);
        assert!(artifact.abi.functions.contains_key("endRound"));
        assert_eq!(artifact.bytecode, Bytecode::from_hex_str("0x60806040").unwrap());
    }

    #[test]
    fn rejects_malformed_bytecode() {
        let result = Artifact::from_json(r#"{ "bytecode": "0xabc" }"#);
        assert!(matches!(result, Err(ArtifactError::Json(_))));
    }

    #[test]
    fn load_resolves_hardhat_layout() {
        let root = std::env::temp_dir().join(format!("artifact-load-test-{}", std::process::id()));
        let dir = root.join("Game.sol");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("Game.json"),
            r#"{ "contractName": "Game", "abi": [], "bytecode": "0x6080" }"#,
        )
        .unwrap();

        let artifact = Artifact::load(&root, "Game").unwrap();
        assert_eq!(artifact.contract_name, "Game");

        let missing = Artifact::load(&root, "Other");
        assert!(matches!(missing, Err(ArtifactError::Io(_))));

        fs::remove_dir_all(&root).unwrap();
    }
}
