//! Implementation for setting up, signing and sending transactions to the
//! network. Only offline signing with a raw private key is supported since
//! that is the only form the deployment account is ever held in.

pub mod confirm;

use self::confirm::ConfirmParams;
use crate::errors::ExecutionError;
use crate::secret::PrivateKey;
use web3::api::Web3;
use web3::types::{
    Address, Bytes, CallRequest, SignedTransaction, TransactionParameters, TransactionReceipt,
    U256, U64,
};
use web3::Transport;

/// Data used for building a transaction that is signed locally with the
/// deployment key before being submitted to the node as a raw transaction.
#[derive(Clone, Debug)]
#[must_use = "transactions do nothing unless you `.build()` or `.send()` them"]
pub struct TransactionBuilder<T: Transport> {
    web3: Web3<T>,
    /// The key used for signing. It determines the sender address.
    key: PrivateKey,
    /// The chain ID used for replay protected signatures.
    chain_id: u64,
    /// The receiver of the transaction. `None` creates a contract.
    pub to: Option<Address>,
    /// Optional gas amount to use for the transaction. Defaults to
    /// estimated gas.
    pub gas: Option<U256>,
    /// Optional gas price to use for the transaction. Defaults to the
    /// node's recommendation, queried while signing.
    pub gas_price: Option<U256>,
    /// The ETH value to send with the transaction. Defaults to 0.
    pub value: Option<U256>,
    /// The data for the transaction. Defaults to empty data.
    pub data: Option<Bytes>,
    /// Optional nonce to use. Defaults to the signing account's current
    /// transaction count.
    pub nonce: Option<U256>,
    /// Parameters controlling how the sent transaction gets confirmed.
    pub confirm: ConfirmParams,
}

impl<T: Transport> TransactionBuilder<T> {
    /// Creates a new builder for a transaction signed by `key` and replay
    /// protected for the chain with the given ID.
    pub fn new(web3: Web3<T>, key: PrivateKey, chain_id: u64) -> Self {
        TransactionBuilder {
            web3,
            key,
            chain_id,
            to: None,
            gas: None,
            gas_price: None,
            value: None,
            data: None,
            nonce: None,
            confirm: ConfirmParams::mined(),
        }
    }

    /// Specify the recipient of the transaction, if not specified the
    /// transaction will be sent to the 0 address (for deploying contracts).
    pub fn to(mut self, value: Address) -> Self {
        self.to = Some(value);
        self
    }

    /// Specify amount of gas to use, if not specified then a gas estimate
    /// will be used.
    pub fn gas(mut self, value: U256) -> Self {
        self.gas = Some(value);
        self
    }

    /// Specify the gas price to use, if not specified then the node's
    /// recommended gas price will be used.
    pub fn gas_price(mut self, value: U256) -> Self {
        self.gas_price = Some(value);
        self
    }

    /// Specify how much ETH to transfer with the transaction, if not
    /// specified then no ETH will be sent.
    pub fn value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// Specify the data to use for the transaction, if not specified, then
    /// empty data will be used.
    pub fn data(mut self, value: Bytes) -> Self {
        self.data = Some(value);
        self
    }

    /// Specify the nonce for the transaction, if not specified will use the
    /// current transaction count for the signing account.
    pub fn nonce(mut self, value: U256) -> Self {
        self.nonce = Some(value);
        self
    }

    /// Specify the confirmation parameters to use when waiting for the sent
    /// transaction to be mined.
    pub fn confirm(mut self, value: ConfirmParams) -> Self {
        self.confirm = value;
        self
    }

    /// Returns the address of the signing account.
    pub fn from_address(&self) -> Address {
        self.key.public_address()
    }

    /// Estimate the gas required for this transaction.
    pub async fn estimate_gas(&self) -> Result<U256, ExecutionError> {
        self.web3
            .eth()
            .estimate_gas(
                CallRequest {
                    from: Some(self.from_address()),
                    to: self.to,
                    gas: None,
                    gas_price: self.gas_price,
                    value: self.value,
                    data: self.data.clone(),
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(From::from)
    }

    /// Sign the transaction, resolving unspecified parameters against the
    /// node: a missing gas amount is estimated, a missing nonce is read
    /// from the account's transaction count and a missing gas price is
    /// filled in with the node's recommendation by the signing layer.
    pub async fn build(&self) -> Result<SignedTransaction, ExecutionError> {
        let gas = match self.gas {
            Some(gas) => gas,
            None => self.estimate_gas().await?,
        };
        let nonce = match self.nonce {
            Some(nonce) => nonce,
            None => {
                self.web3
                    .eth()
                    .transaction_count(self.from_address(), None)
                    .await?
            }
        };

        let tx = TransactionParameters {
            nonce: Some(nonce),
            to: self.to,
            gas,
            gas_price: self.gas_price,
            value: self.value.unwrap_or_default(),
            data: self.data.clone().unwrap_or_default(),
            chain_id: Some(self.chain_id),
            ..Default::default()
        };
        let signed = self.web3.accounts().sign_transaction(tx, &self.key).await?;

        Ok(signed)
    }

    /// Sign and send the transaction, then wait for it to be mined. Returns
    /// the receipt of the mined transaction; a mined transaction whose
    /// status reports failure is an `ExecutionError::Failure`.
    pub async fn send(self) -> Result<TransactionReceipt, ExecutionError> {
        let web3 = self.web3.clone();
        let confirm = self.confirm.clone();

        let tx = self.build().await?;
        let node_hash = web3.eth().send_raw_transaction(tx.raw_transaction).await?;
        if node_hash != tx.transaction_hash {
            return Err(ExecutionError::UnexpectedTransactionHash);
        }

        let tx_receipt = confirm::wait_for_confirmation(&web3, node_hash, confirm).await?;
        match tx_receipt.status {
            Some(U64([1])) => Ok(tx_receipt),
            _ => Err(ExecutionError::Failure(Box::new(tx_receipt))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::*;
    use web3::types::{H2048, H256};

    fn test_key() -> PrivateKey {
        key!("0x0102030405060708091011121314151617181920212223242526272829303132")
    }

    #[test]
    fn tx_builder_estimate_gas() {
        let mut transport = TestTransport::new();
        let web3 = Web3::new(transport.clone());

        let to = addr!("0x0123456789012345678901234567890123456789");

        transport.add_response(json!("0x42")); // estimate gas response
        let estimate_gas = TransactionBuilder::new(web3, test_key(), 77777)
            .to(to)
            .value(42.into())
            .estimate_gas()
            .immediate()
            .expect("success");

        assert_eq!(estimate_gas, 0x42.into());
        transport.assert_request(
            "eth_estimateGas",
            &[json!({
                "from": test_key().public_address(),
                "to": to,
                "value": "0x2a",
            })],
        );
        transport.assert_no_more_requests();
    }

    #[test]
    fn tx_build_resolves_nonce_and_gas_price() {
        let mut transport = TestTransport::new();
        let web3 = Web3::new(transport.clone());

        transport.add_response(json!("0x2a")); // transaction count
        transport.add_response(json!("0x3b9aca00")); // gas price, queried by signing
        let signed = TransactionBuilder::new(web3, test_key(), 77777)
            .gas(0x1337.into())
            .data(Bytes(vec![0x13, 0x37]))
            .build()
            .wait()
            .expect("failed to sign transaction");

        assert!(!signed.raw_transaction.0.is_empty());
        transport.assert_request(
            "eth_getTransactionCount",
            &[json!(test_key().public_address()), json!("latest")],
        );
        transport.assert_request("eth_gasPrice", &[]);
        transport.assert_no_more_requests();
    }

    #[test]
    fn tx_build_fully_specified_is_offline() {
        let transport = TestTransport::new();
        let web3 = Web3::new(transport.clone());

        let signed = TransactionBuilder::new(web3, test_key(), 77777)
            .gas(0x1337.into())
            .gas_price(0x00ba_b10c.into())
            .value(0.into())
            .data(Bytes(vec![0x13, 0x37]))
            .nonce(0x42.into())
            .build()
            .immediate()
            .expect("failed to sign transaction");

        assert_eq!(
            signed.transaction_hash,
            H256(crate::secret::keccak256(&signed.raw_transaction.0)),
        );
        transport.assert_no_more_requests();
    }

    #[test]
    fn tx_send_with_confirmation() {
        let mut transport = TestTransport::new();
        let web3 = Web3::new(transport.clone());

        let builder = TransactionBuilder::new(web3, test_key(), 77777)
            .gas(0x1337.into())
            .gas_price(0x00ba_b10c.into())
            .nonce(0x42.into());
        // Signing is deterministic, so the raw transaction and its hash can
        // be computed up front to queue the node responses.
        let signed = builder.clone().build().immediate().expect("signing failed");

        transport.add_response(json!(signed.transaction_hash));
        transport.add_response(json!("0x1")); // block number
        transport.add_response(json!({
            "transactionHash": signed.transaction_hash,
            "transactionIndex": "0x1",
            "blockNumber": "0x2",
            "blockHash": H256::repeat_byte(3),
            "from": builder.from_address(),
            "cumulativeGasUsed": "0x1337",
            "gasUsed": "0x1337",
            "logsBloom": H2048::zero(),
            "logs": [],
            "status": "0x1",
        }));

        let tx_receipt = builder.send().wait().expect("send failed");

        assert_eq!(tx_receipt.transaction_hash, signed.transaction_hash);
        transport.assert_request("eth_sendRawTransaction", &[json!(signed.raw_transaction)]);
        transport.assert_request("eth_blockNumber", &[]);
        transport.assert_request("eth_getTransactionReceipt", &[json!(signed.transaction_hash)]);
        transport.assert_no_more_requests();
    }

    #[test]
    fn tx_send_checks_node_hash() {
        let mut transport = TestTransport::new();
        let web3 = Web3::new(transport.clone());

        transport.add_response(json!(H256::repeat_byte(0xff))); // bogus node hash
        let result = TransactionBuilder::new(web3, test_key(), 77777)
            .gas(0x1337.into())
            .gas_price(0x00ba_b10c.into())
            .nonce(0x42.into())
            .send()
            .wait();

        assert!(matches!(
            result,
            Err(ExecutionError::UnexpectedTransactionHash)
        ));
    }

    #[test]
    fn tx_failure() {
        let mut transport = TestTransport::new();
        let web3 = Web3::new(transport.clone());

        let builder = TransactionBuilder::new(web3, test_key(), 77777)
            .gas(0x1337.into())
            .gas_price(0x00ba_b10c.into())
            .nonce(0x42.into());
        let signed = builder.clone().build().immediate().expect("signing failed");

        transport.add_response(json!(signed.transaction_hash));
        transport.add_response(json!("0x1"));
        transport.add_response(json!({
            "transactionHash": signed.transaction_hash,
            "transactionIndex": "0x1",
            "blockNumber": "0x1",
            "blockHash": H256::repeat_byte(1),
            "from": builder.from_address(),
            "cumulativeGasUsed": "0x1337",
            "gasUsed": "0x1337",
            "logsBloom": H2048::zero(),
            "logs": [],
            "status": "0x0",
        }));

        let result = builder.send().wait();

        assert!(
            matches!(
                &result,
                Err(ExecutionError::Failure(tx)) if tx.transaction_hash == signed.transaction_hash
            ),
            "expected transaction failure but got {:?}",
            result,
        );
    }
}
