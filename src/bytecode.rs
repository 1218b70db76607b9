//! Representation of the deployment code of a compiled contract.

use crate::errors::BytecodeError;
use serde::de::{Deserialize, Deserializer, Error as DeserializeError};
use web3::types::Bytes;

/// The hex encoded deployment bytecode of a compiled contract.
///
/// The string is validated on construction so that later decoding into raw
/// bytes cannot fail on malformed input from an artifact file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bytecode(String);

impl Bytecode {
    /// Creates bytecode from a hex string, with or without a leading `"0x"`.
    pub fn from_hex_str<S: AsRef<str>>(s: S) -> Result<Self, BytecodeError> {
        let s = s.as_ref();
        let hex = s.strip_prefix("0x").unwrap_or(s);

        if hex.len() % 2 != 0 {
            return Err(BytecodeError::InvalidLength);
        }
        if let Some(digit) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(BytecodeError::InvalidHexDigit(digit));
        }

        Ok(Bytecode(hex.to_string()))
    }

    /// Returns true if the bytecode is empty. Artifacts compiled from
    /// interfaces and abstract contracts have no deployment code.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the length of the bytecode in bytes.
    pub fn len(&self) -> usize {
        self.0.len() / 2
    }

    /// Decodes the bytecode into its raw bytes.
    pub fn to_bytes(&self) -> Result<Bytes, BytecodeError> {
        Ok(Bytes(hex::decode(&self.0)?))
    }
}

impl<'de> Deserialize<'de> for Bytecode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Bytecode::from_hex_str(raw).map_err(D::Error::custom)
    }
}
