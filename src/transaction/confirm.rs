//! Transaction confirmation implementation. The node is polled for the
//! transaction receipt with exponential backoff until the transaction is
//! mined, or until the chain has advanced past the configured block timeout
//! without mining it.

use crate::errors::ExecutionError;
use futures_timer::Delay;
use std::cmp;
use std::time::Duration;
use web3::api::Web3;
use web3::types::{TransactionReceipt, H256, U64};
use web3::Transport;

/// A struct with the confirmation parameters.
#[derive(Clone, Debug)]
#[must_use = "confirm parameters do nothing unless waited for"]
pub struct ConfirmParams {
    /// Minimal delay between consecutive node polls.
    pub poll_interval_min: Duration,
    /// Maximal delay between consecutive node polls.
    pub poll_interval_max: Duration,
    /// Factor by which the delay between consecutive node polls is
    /// multiplied after each poll.
    pub poll_interval_factor: f32,
    /// The maximum number of blocks to wait for the transaction to be
    /// mined, counted from the block height at which waiting started.
    /// `None` waits indefinitely.
    pub block_timeout: Option<u64>,
}

/// Default minimal delay between polling the node for a receipt.
#[cfg(not(test))]
const DEFAULT_POLL_INTERVAL_MIN: Duration = Duration::from_millis(250);
#[cfg(test)]
const DEFAULT_POLL_INTERVAL_MIN: Duration = Duration::from_millis(0);

/// Default maximal delay between polling the node for a receipt.
#[cfg(not(test))]
const DEFAULT_POLL_INTERVAL_MAX: Duration = Duration::from_millis(7000);
#[cfg(test)]
const DEFAULT_POLL_INTERVAL_MAX: Duration = Duration::from_millis(0);

/// Default factor for increasing delays between node polls.
#[cfg(not(test))]
const DEFAULT_POLL_INTERVAL_FACTOR: f32 = 1.7;
#[cfg(test)]
const DEFAULT_POLL_INTERVAL_FACTOR: f32 = 0.0;

/// The default block timeout to use for confirming transactions.
pub const DEFAULT_BLOCK_TIMEOUT: Option<u64> = Some(25);

impl ConfirmParams {
    /// Create new confirmation parameters for waiting for the transaction
    /// to be mined with the default poll intervals and block timeout.
    pub fn mined() -> Self {
        ConfirmParams {
            poll_interval_min: DEFAULT_POLL_INTERVAL_MIN,
            poll_interval_max: DEFAULT_POLL_INTERVAL_MAX,
            poll_interval_factor: DEFAULT_POLL_INTERVAL_FACTOR,
            block_timeout: DEFAULT_BLOCK_TIMEOUT,
        }
    }

    /// Set new value for [`block_timeout`].
    ///
    /// [`block_timeout`]: #structfield.block_timeout
    #[inline]
    pub fn block_timeout(mut self, block_timeout: Option<u64>) -> Self {
        self.block_timeout = block_timeout;
        self
    }
}

impl Default for ConfirmParams {
    fn default() -> Self {
        ConfirmParams::mined()
    }
}

/// Waits for a transaction to be mined. Returns the receipt once the
/// transaction has a block number, and an error once the chain has advanced
/// `block_timeout` blocks past the height at which waiting started without
/// the transaction being mined.
pub async fn wait_for_confirmation<T: Transport>(
    web3: &Web3<T>,
    tx: H256,
    params: ConfirmParams,
) -> Result<TransactionReceipt, ExecutionError> {
    let mut starting_block: Option<U64> = None;
    let mut poll_interval = params.poll_interval_min;

    loop {
        let latest_block = web3.eth().block_number().await?;
        if let Some(tx_receipt) = web3.eth().transaction_receipt(tx).await? {
            // A receipt for a pending transaction has no block number yet.
            if tx_receipt.block_number.is_some() {
                return Ok(tx_receipt);
            }
        }

        let first_block = *starting_block.get_or_insert(latest_block);
        if let Some(block_timeout) = params.block_timeout {
            if latest_block.as_u64() > first_block.as_u64() + block_timeout {
                return Err(ExecutionError::ConfirmTimeout(tx));
            }
        }

        Delay::new(poll_interval).await;
        poll_interval = cmp::min(
            poll_interval.mul_f32(params.poll_interval_factor),
            params.poll_interval_max,
        );
    }
}
