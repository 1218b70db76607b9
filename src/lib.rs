#![deny(missing_docs, unsafe_code)]

//! Deployment tooling for the `GuessTheNumberGameWithPot` contract.
//!
//! The crate wraps the one-shot deployment procedure in a small library so
//! that it can be exercised in tests without a node: load the Hardhat build
//! artifact, assemble the creation transaction with the pot token address as
//! the single constructor argument, sign it offline with the deployment key,
//! broadcast it and wait for it to be mined.
//!
//! The `deploy` binary in this package drives [`Deployer`] from environment
//! configuration and reports the resulting contract address together with
//! the manual steps required to put the game into operation.

#[cfg(test)]
#[allow(missing_docs)]
#[macro_use]
#[path = "test/macros.rs"]
mod test_macros;

pub mod artifact;
pub mod bytecode;
pub mod config;
pub mod deployer;
pub mod errors;
pub mod secret;
pub mod transaction;

pub use crate::artifact::Artifact;
pub use crate::bytecode::Bytecode;
pub use crate::config::Config;
pub use crate::deployer::{Deployer, Deployment};
pub use crate::secret::PrivateKey;
pub use web3;
