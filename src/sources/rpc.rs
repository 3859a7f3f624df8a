//! RPC-backed block source.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcBlockConfig;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_transaction_status::{TransactionDetails, UiConfirmedBlock, UiTransactionEncoding};

use super::BlockSource;
use crate::common::error::{IndexerError, Result};
use crate::common::logging::{self, LogLevel};

/// Fetches confirmed blocks over JSON-RPC.
///
/// Blocks are requested base64-encoded with full transaction details, so the
/// pipeline can decode compiled instructions and read the balance metadata.
pub struct RpcBlockSource {
    client: RpcClient,
}

impl RpcBlockSource {
    /// Creates a source against `rpc_url` (e.g. "https://api.mainnet-beta.solana.com").
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            client: RpcClient::new(rpc_url.into()),
        }
    }
}

#[async_trait]
impl BlockSource for RpcBlockSource {
    async fn fetch_block(&self, slot: u64) -> Result<UiConfirmedBlock> {
        logging::log(LogLevel::Info, &format!("Fetching block for slot {slot}"));

        let config = RpcBlockConfig {
            encoding: Some(UiTransactionEncoding::Base64),
            transaction_details: Some(TransactionDetails::Full),
            rewards: Some(false),
            commitment: Some(CommitmentConfig::confirmed()),
            max_supported_transaction_version: Some(0),
        };

        let block = self
            .client
            .get_block_with_config(slot, config)
            .await
            .map_err(|e| IndexerError::RpcError(format!("getBlock({slot}) failed: {e}")))?;

        logging::log(
            LogLevel::Success,
            &format!(
                "Fetched block {slot} with {} transactions",
                block.transactions.as_ref().map_or(0, Vec::len)
            ),
        );

        Ok(block)
    }

    fn source_name(&self) -> &'static str {
        "RPC"
    }
}
