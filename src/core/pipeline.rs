//! Block swap pipeline.
//!
//! Walks a fetched block transaction by transaction, gates on the configured
//! program id, and emits one [`RaydiumSwap`] per matching top-level
//! instruction. Extraction never decodes instruction data; everything is
//! reconstructed from the pre/post token balance snapshots in the
//! transaction metadata.

use solana_sdk::pubkey::Pubkey;
use solana_transaction_status::option_serializer::OptionSerializer;
use solana_transaction_status::{
    EncodedTransactionWithStatusMeta, UiConfirmedBlock, UiTransactionStatusMeta,
    UiTransactionTokenBalance,
};
use std::str::FromStr;

use crate::common::error::{IndexerError, Result};
use crate::core::balances::{
    limit_amount, locate_post_balances, reconcile, resolve_decimals, ReconcilePolicy, SwapLegs,
    DEFAULT_LIMIT_DECIMALS,
};
use crate::core::filter::{matching_instruction_indices, transaction_has_program};
use crate::types::swap::{LimitSide, RaydiumSwap};

/// Raydium AMM v4 program address, the default extraction target.
pub const RAYDIUM_AMM_V4_PROGRAM_ID: &str = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8";

/// Extracts swap events for one AMM program from confirmed blocks.
///
/// The target program id is fixed per parser instance; build a second parser
/// to track a different program.
#[derive(Debug, Clone)]
pub struct BlockParser {
    program_id: Pubkey,
    policy: ReconcilePolicy,
}

impl BlockParser {
    /// Creates a parser targeting `program_id`, with the default
    /// [`ReconcilePolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::InvalidProgramId`] if the id is not a valid
    /// base58 pubkey.
    pub fn new(program_id: impl AsRef<str>) -> Result<Self> {
        let program_id = Pubkey::from_str(program_id.as_ref())
            .map_err(|_| IndexerError::InvalidProgramId(program_id.as_ref().to_string()))?;
        Ok(Self {
            program_id,
            policy: ReconcilePolicy::default(),
        })
    }

    /// Sets the balance reconciliation policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Lazily yields one swap event per (transaction, matching instruction)
    /// pair, in (transaction order, instruction order). Nothing is computed
    /// until the iterator is advanced, and nothing is buffered.
    ///
    /// `slot` identifies the block and must be the slot it was fetched for;
    /// it is copied into every event as-is.
    ///
    /// Malformed individual transactions degrade to "skipped" and malformed
    /// fields to `None`/zero; they never abort the block. When several
    /// instructions in one transaction match, each event repeats the same
    /// transaction-level deltas — amounts are not partitioned between
    /// instructions.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::MalformedBlock`] if the block carries no
    /// transaction list at all.
    pub fn parse_block<'a>(
        &'a self,
        block: &'a UiConfirmedBlock,
        slot: u64,
    ) -> Result<BlockSwaps<'a>> {
        let transactions = block
            .transactions
            .as_deref()
            .ok_or_else(|| IndexerError::MalformedBlock("block has no transaction list".into()))?;

        Ok(BlockSwaps {
            parser: self,
            slot,
            transactions,
            next_tx_index: 0,
            current: None,
        })
    }
}

/// Lazy iterator over the swaps in one block. Finite, non-restartable; call
/// [`BlockParser::parse_block`] again to replay.
#[derive(Debug)]
pub struct BlockSwaps<'a> {
    parser: &'a BlockParser,
    slot: u64,
    transactions: &'a [EncodedTransactionWithStatusMeta],
    next_tx_index: usize,
    current: Option<TxSwaps>,
}

/// Extraction results for one gated transaction, shared by every matching
/// instruction in it.
#[derive(Debug)]
struct TxSwaps {
    tx_index: usize,
    signature: String,
    was_successful: bool,
    legs: SwapLegs,
    limit_amount: f64,
    post_balance_in: Option<f64>,
    post_balance_out: Option<f64>,
    matches: std::vec::IntoIter<usize>,
}

impl Iterator for BlockSwaps<'_> {
    type Item = RaydiumSwap;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tx) = &mut self.current {
                if let Some(ix_index) = tx.matches.next() {
                    return Some(RaydiumSwap {
                        slot: self.slot,
                        index_in_slot: tx.tx_index,
                        index_in_tx: ix_index,
                        signature: tx.signature.clone(),
                        was_successful: tx.was_successful,
                        mint_in: tx.legs.mint_in.clone(),
                        mint_out: tx.legs.mint_out.clone(),
                        amount_in: tx.legs.amount_in,
                        amount_out: tx.legs.amount_out,
                        limit_amount: tx.limit_amount,
                        limit_side: LimitSide::MintIn,
                        post_pool_balance_mint_in: tx.post_balance_in,
                        post_pool_balance_mint_out: tx.post_balance_out,
                    });
                }
                self.current = None;
            }

            let tx = self.transactions.get(self.next_tx_index)?;
            let tx_index = self.next_tx_index;
            self.next_tx_index += 1;
            self.current = self.prepare_transaction(tx, tx_index);
        }
    }
}

impl BlockSwaps<'_> {
    /// Runs the skip/gate/match/extract stages for one transaction. `None`
    /// means the whole transaction is skipped.
    fn prepare_transaction(
        &self,
        tx: &EncodedTransactionWithStatusMeta,
        tx_index: usize,
    ) -> Option<TxSwaps> {
        let meta = tx.meta.as_ref()?;
        let decoded = tx.transaction.decode()?;

        // Conservative precondition carried over from the source behavior:
        // transactions without inner-instruction records are not extracted,
        // even though extraction itself never reads them.
        if !has_inner_instructions(meta) {
            return None;
        }

        let account_keys = decoded.message.static_account_keys();
        let instructions = decoded.message.instructions();

        if !transaction_has_program(instructions, account_keys, &self.parser.program_id) {
            return None;
        }
        let matches =
            matching_instruction_indices(instructions, account_keys, &self.parser.program_id);

        let pre = token_balances(&meta.pre_token_balances);
        let post = token_balances(&meta.post_token_balances);

        let legs = reconcile(pre, post, self.parser.policy);
        let (post_balance_in, post_balance_out) =
            locate_post_balances(post, legs.mint_in.as_deref(), legs.mint_out.as_deref());

        let limit = legs.mint_in.as_deref().map_or(0.0, |mint| {
            let decimals = resolve_decimals(pre, post, mint).unwrap_or(DEFAULT_LIMIT_DECIMALS);
            limit_amount(pre, post, mint, decimals)
        });

        let signature = decoded
            .signatures
            .first()
            .map(ToString::to_string)
            .unwrap_or_else(|| "unknown".to_string());

        Some(TxSwaps {
            tx_index,
            signature,
            was_successful: meta.err.is_none(),
            legs,
            limit_amount: limit,
            post_balance_in,
            post_balance_out,
            matches: matches.into_iter(),
        })
    }
}

fn has_inner_instructions(meta: &UiTransactionStatusMeta) -> bool {
    match &meta.inner_instructions {
        OptionSerializer::Some(inner) => !inner.is_empty(),
        _ => false,
    }
}

fn token_balances(
    balances: &OptionSerializer<Vec<UiTransactionTokenBalance>>,
) -> &[UiTransactionTokenBalance] {
    match balances {
        OptionSerializer::Some(balances) => balances,
        _ => &[],
    }
}
