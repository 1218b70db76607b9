//! Module with common error types.

use serde_json::Error as JsonError;
use std::io::Error as IoError;
use thiserror::Error;
use web3::error::Error as Web3Error;
use web3::types::{Address, TransactionReceipt, H256};

/// An error indicating an invalid private key. Private keys for the
/// `secp256k1` curve must be exactly 32 bytes and lie on the curve.
#[derive(Debug, Error)]
#[error("invalid private key: {0}")]
pub struct InvalidPrivateKey(#[from] secp256k1::Error);

/// An error indicating a malformed on-chain address.
#[derive(Clone, Debug, Error)]
#[error("'{0}' is not a valid address")]
pub struct InvalidAddress(pub String);

/// An error reading bytecode string representation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BytecodeError {
    /// Bytecode string is not an even length.
    #[error("invalid bytecode length")]
    InvalidLength,

    /// Invalid hex digit.
    #[error("invalid hex digit '{0}'")]
    InvalidHexDigit(char),
}

impl From<hex::FromHexError> for BytecodeError {
    fn from(err: hex::FromHexError) -> Self {
        match err {
            hex::FromHexError::InvalidHexCharacter { c, .. } => {
                BytecodeError::InvalidHexDigit(c)
            }
            _ => BytecodeError::InvalidLength,
        }
    }
}

/// An error in loading or parsing a contract artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// An IO error occurred when loading the artifact from disk.
    #[error("failed to open contract artifact file: {0}")]
    Io(#[from] IoError),

    /// A JSON error occurred while parsing the artifact.
    #[error("failed to parse contract artifact JSON: {0}")]
    Json(#[from] JsonError),
}

/// An error that can occur while signing, sending or confirming a
/// transaction.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// An error occured while performing a web3 call.
    #[error("web3 error: {0}")]
    Web3(#[from] Web3Error),

    /// The node reported a different hash for the submitted raw transaction
    /// than the one computed locally when signing it.
    #[error("transaction hash reported by the node does not match the signed transaction")]
    UnexpectedTransactionHash,

    /// The transaction was not mined within the configured number of blocks.
    /// It may still be mined later; re-running the deployment uses a fresh
    /// nonce.
    #[error("transaction {0:?} was not mined within the block timeout")]
    ConfirmTimeout(H256),

    /// Transaction was mined but reverted (e.g. out of gas).
    #[error("transaction {:?} failed on chain", .0.transaction_hash)]
    Failure(Box<TransactionReceipt>),
}

/// An error that can occur while deploying the contract.
#[derive(Debug, Error)]
pub enum DeployError {
    /// An error occured while performing a web3 call.
    #[error("web3 error: {0}")]
    Web3(#[from] Web3Error),

    /// The deployment account holds no native currency to pay for gas.
    #[error("deployer account {0:?} has no funds, top it up before deploying")]
    Unfunded(Address),

    /// The contract artifact could not be loaded.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// The contract artifact contains no deployment bytecode, e.g. because
    /// it was compiled from an interface or abstract contract.
    #[error("contract artifact contains no deployment bytecode")]
    EmptyBytecode,

    /// The contract artifact bytecode is malformed.
    #[error("invalid contract bytecode: {0}")]
    Bytecode(#[from] BytecodeError),

    /// An error occured encoding the constructor argument with the contract
    /// ABI.
    #[error("error ABI encoding deployment parameters: {0}")]
    Abi(#[from] ethabi::Error),

    /// Error executing the contract deployment transaction.
    #[error("error executing contract deployment transaction: {0}")]
    Tx(#[from] ExecutionError),
}
