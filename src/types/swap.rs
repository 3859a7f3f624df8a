//! Output event emitted by the block swap pipeline.

use serde::Serialize;

/// Side of the swap the limit amount applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitSide {
    MintIn,
    MintOut,
}

/// One swap routed through the target AMM program, reconstructed from the
/// transaction's pre/post token balance snapshots.
///
/// A transaction containing several matching instructions yields one event
/// per instruction. Balance metadata is transaction-scoped, so those events
/// all carry the same amounts and balances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaydiumSwap {
    /// Slot of the block this swap was found in (caller-supplied).
    pub slot: u64,
    /// Position of the transaction within the block.
    pub index_in_slot: usize,
    /// Position of the matching instruction within the transaction.
    pub index_in_tx: usize,
    /// First transaction signature, or "unknown" if the list is empty.
    pub signature: String,
    /// Whether the transaction executed without an error.
    pub was_successful: bool,
    /// Mint whose pool-side balance decreased, if one was found.
    pub mint_in: Option<String>,
    /// Mint whose pool-side balance increased, if one was found.
    pub mint_out: Option<String>,
    /// Magnitude of the input leg in human-scaled units; zero if unresolved.
    pub amount_in: f64,
    /// Magnitude of the output leg in human-scaled units; zero if unresolved.
    pub amount_out: f64,
    /// Signed raw-precision delta for the limit-side mint, scaled by its
    /// decimal exponent.
    pub limit_amount: f64,
    /// Side the limit amount applies to (currently always `MintIn`).
    pub limit_side: LimitSide,
    /// Final pool balance for the input mint, if a post snapshot carried one.
    pub post_pool_balance_mint_in: Option<f64>,
    /// Final pool balance for the output mint, if a post snapshot carried one.
    pub post_pool_balance_mint_out: Option<f64>,
}
