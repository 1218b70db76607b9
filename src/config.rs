//! Run configuration for a deployment.

use crate::errors::InvalidAddress;
use crate::secret::PrivateKey;
use std::path::PathBuf;
use url::Url;
use web3::types::{Address, U256};

/// Everything a deployment run needs to know. Collected and validated once
/// at startup and passed around explicitly; nothing reads the environment
/// after this struct has been built.
#[derive(Clone, Debug)]
pub struct Config {
    /// URL of the JSON-RPC endpoint of the target network node.
    pub rpc_url: Url,
    /// Key of the account that signs and pays for the deployment.
    pub private_key: PrivateKey,
    /// Address of the token the game pays its pot out in, passed to the
    /// contract constructor.
    pub token_address: Address,
    /// Directory containing the Hardhat build output.
    pub artifacts_root: PathBuf,
    /// Name of the compiled contract inside the build output.
    pub contract_name: String,
    /// Fixed gas ceiling for the creation transaction.
    pub gas_limit: U256,
    /// Number of blocks to wait for the creation transaction to be mined
    /// before giving up.
    pub block_timeout: u64,
}

/// Parses an on-chain address, accepting an optional `"0x"` prefix.
///
/// Empty input is rejected explicitly so that a variable that is set but
/// blank fails with the same clear message as a malformed one.
pub fn parse_address(value: &str) -> Result<Address, InvalidAddress> {
    let trimmed = value.trim();
    let hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if hex.is_empty() {
        return Err(InvalidAddress(value.to_string()));
    }

    hex.parse()
        .map_err(|_| InvalidAddress(value.to_string()))
}
