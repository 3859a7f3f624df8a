//! Block sources.
//!
//! The pipeline itself never touches the network; it consumes a block that
//! was fetched up front. Sources are the pluggable fetch side.

mod rpc;

use async_trait::async_trait;
use solana_transaction_status::UiConfirmedBlock;

use crate::common::error::Result;

pub use rpc::RpcBlockSource;

/// Anything that can produce a confirmed block for a slot.
#[async_trait]
pub trait BlockSource {
    /// Fetches the confirmed block at `slot`.
    async fn fetch_block(&self, slot: u64) -> Result<UiConfirmedBlock>;

    /// Human-readable source name for logging.
    fn source_name(&self) -> &'static str;
}
