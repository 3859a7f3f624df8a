//! Raydium swap extraction from confirmed Solana blocks.
//!
//! This crate filters a fetched block for transactions that invoke a
//! configured AMM program (Raydium AMM v4 by default) and reconstructs each
//! swap's economic effect purely from the pre/post token balance snapshots in
//! the transaction metadata. Instruction data payloads are never decoded.
//!
//! ```no_run
//! use raydium_swap_indexer::{BlockParser, BlockSource, RpcBlockSource, RAYDIUM_AMM_V4_PROGRAM_ID};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = RpcBlockSource::new("https://api.mainnet-beta.solana.com");
//! let block = source.fetch_block(316719543).await?;
//!
//! let parser = BlockParser::new(RAYDIUM_AMM_V4_PROGRAM_ID)?;
//! for swap in parser.parse_block(&block, 316719543)? {
//!     println!("{swap:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod core;
pub mod sources;
pub mod types;

pub use crate::common::error::{IndexerError, Result};
pub use crate::core::balances::{ReconcilePolicy, DEFAULT_LIMIT_DECIMALS};
pub use crate::core::pipeline::{BlockParser, BlockSwaps, RAYDIUM_AMM_V4_PROGRAM_ID};
pub use crate::sources::{BlockSource, RpcBlockSource};
pub use crate::types::swap::{LimitSide, RaydiumSwap};
