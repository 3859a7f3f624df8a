//! Demo runner: fetch one confirmed block and print every swap routed
//! through the configured AMM program.
//!
//! Configuration comes from environment variables (a `.env` file is honored):
//! `RPC_URL`, `SLOT`, and optionally `PROGRAM_ID` (defaults to Raydium AMM v4).

use raydium_swap_indexer::common::logging::{self, LogLevel};
use raydium_swap_indexer::{BlockParser, BlockSource, RpcBlockSource, RAYDIUM_AMM_V4_PROGRAM_ID};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let rpc_url =
        env::var("RPC_URL").unwrap_or_else(|_| "https://api.mainnet-beta.solana.com".to_string());
    let program_id =
        env::var("PROGRAM_ID").unwrap_or_else(|_| RAYDIUM_AMM_V4_PROGRAM_ID.to_string());
    let slot: u64 = env::var("SLOT")?.parse()?;

    logging::log(LogLevel::Info, &format!("RPC URL: {rpc_url}"));
    logging::log(LogLevel::Info, &format!("Program ID: {program_id}"));

    let source = RpcBlockSource::new(rpc_url);
    let block = source.fetch_block(slot).await?;

    let parser = BlockParser::new(&program_id)?;
    let mut count = 0usize;
    for swap in parser.parse_block(&block, slot)? {
        count += 1;
        println!("{}", serde_json::to_string_pretty(&swap)?);
    }

    logging::log(
        LogLevel::Success,
        &format!("Extracted {count} swap(s) from slot {slot}"),
    );

    Ok(())
}
