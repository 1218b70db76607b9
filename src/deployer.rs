//! Implementation of the contract deployment procedure.

use crate::artifact::Artifact;
use crate::config::Config;
use crate::errors::{DeployError, ExecutionError};
use crate::transaction::confirm::ConfirmParams;
use crate::transaction::TransactionBuilder;
use ethabi::Token;
use web3::api::Web3;
use web3::types::{Address, Bytes, TransactionReceipt, H256, U256};
use web3::Transport;

/// The result of a successful deployment.
#[derive(Clone, Debug)]
pub struct Deployment {
    /// The address of the newly created contract.
    pub address: Address,
    /// The hash of the transaction that created the contract.
    pub transaction_hash: H256,
    /// The receipt of the mined creation transaction.
    pub receipt: TransactionReceipt,
}

/// Drives a single contract deployment from start to finish: checks the
/// on-chain preconditions, loads the compiled artifact and sends the
/// creation transaction through signing, broadcast and confirmation.
pub struct Deployer<T: Transport> {
    web3: Web3<T>,
    config: Config,
}

impl<T: Transport> Deployer<T> {
    /// Creates a new deployer over the given node connection.
    pub fn new(web3: Web3<T>, config: Config) -> Self {
        Deployer { web3, config }
    }

    /// Runs the deployment, returning the address of the created contract.
    pub async fn deploy(self) -> Result<Deployment, DeployError> {
        let account = self.config.private_key.public_address();
        let chain_id = self.web3.eth().chain_id().await?;
        tracing::info!("deploying from {:?} on chain {}", account, chain_id);

        let balance = self.web3.eth().balance(account, None).await?;
        tracing::info!("account balance: {}", balance);
        if balance.is_zero() {
            return Err(DeployError::Unfunded(account));
        }

        let artifact = Artifact::load(&self.config.artifacts_root, &self.config.contract_name)?;
        tracing::info!(
            "loaded artifact for {} ({} bytes of code)",
            self.config.contract_name,
            artifact.bytecode.len(),
        );
        let data = creation_code(&artifact, self.config.token_address)?;

        // The fee estimate is advisory: without one the transaction is
        // assembled without an explicit gas price and the signing layer
        // falls back to the client default.
        let gas_price = match self.web3.eth().gas_price().await {
            Ok(gas_price) => {
                tracing::info!("current gas price: {}", gas_price);
                Some(gas_price)
            }
            Err(err) => {
                tracing::warn!("gas price unavailable, using client default: {}", err);
                None
            }
        };

        let mut tx = TransactionBuilder::new(
            self.web3.clone(),
            self.config.private_key.clone(),
            chain_id.as_u64(),
        )
        .data(data)
        .gas(self.config.gas_limit)
        // The game constructor is non-payable; the value is pinned to zero
        // explicitly instead of relying on a default.
        .value(U256::zero())
        .confirm(ConfirmParams::mined().block_timeout(Some(self.config.block_timeout)));
        if let Some(gas_price) = gas_price {
            tx = tx.gas_price(gas_price);
        }

        tracing::info!("sending deployment transaction");
        let receipt = tx.send().await?;
        tracing::info!(
            "deployment transaction {:?} mined in block {:?}",
            receipt.transaction_hash,
            receipt.block_number,
        );

        let transaction_hash = receipt.transaction_hash;
        let address = match receipt.contract_address {
            Some(address) => address,
            None => return Err(ExecutionError::Failure(Box::new(receipt)).into()),
        };

        Ok(Deployment {
            address,
            transaction_hash,
            receipt,
        })
    }
}

/// Builds the contract creation code: the deployment bytecode followed by
/// the ABI encoded constructor argument, the address of the pot token.
fn creation_code(artifact: &Artifact, token: Address) -> Result<Bytes, DeployError> {
    if artifact.bytecode.is_empty() {
        return Err(DeployError::EmptyBytecode);
    }

    let code = artifact.bytecode.to_bytes()?;
    let constructor = artifact
        .abi
        .constructor()
        .ok_or(ethabi::Error::InvalidData)?;

    Ok(Bytes(
        constructor.encode_input(code.0, &[Token::Address(token)])?,
    ))
}
