//! Token balance reconciliation.
//!
//! Everything here works off the pre/post `UiTransactionTokenBalance` lists
//! in transaction metadata. The reconciler infers swap direction from the
//! sign of per-account deltas, the locator reports final pool balances for
//! the resolved mints, and the limit calculator differences the raw
//! (undivided) amounts for one mint.

use solana_transaction_status::UiTransactionTokenBalance;

use crate::common::logging::{self, LogLevel};

/// Decimal exponent assumed for the limit calculation when no snapshot
/// carries the mint's own decimals.
pub const DEFAULT_LIMIT_DECIMALS: u8 = 6;

/// How the reconciler picks a winner when several account pairs move in the
/// same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcilePolicy {
    /// The last qualifying (pre, post) pair in pre-list x post-list order
    /// wins. Matches the historical behavior; does not sum multiple legs.
    #[default]
    LastWins,
    /// Sum deltas per mint across all matching account pairs; the mint with
    /// the most negative total is the input leg, the most positive total the
    /// output leg. First-seen mint wins ties.
    Aggregate,
}

/// Swap legs inferred from balance deltas. Either side may be unresolved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SwapLegs {
    pub mint_in: Option<String>,
    pub mint_out: Option<String>,
    pub amount_in: f64,
    pub amount_out: f64,
}

/// Joins pre and post snapshots on `account_index` and classifies each pair
/// by the sign of its human-scaled delta: negative means the account's token
/// left the pool side (input leg), positive means it entered (output leg).
///
/// A missing `ui_amount` counts as zero, not unknown, so a null paired
/// against a value produces a real delta. Amounts are always non-negative;
/// sign is consumed to decide direction only.
pub fn reconcile(
    pre: &[UiTransactionTokenBalance],
    post: &[UiTransactionTokenBalance],
    policy: ReconcilePolicy,
) -> SwapLegs {
    match policy {
        ReconcilePolicy::LastWins => reconcile_last_wins(pre, post),
        ReconcilePolicy::Aggregate => reconcile_aggregate(pre, post),
    }
}

fn reconcile_last_wins(
    pre: &[UiTransactionTokenBalance],
    post: &[UiTransactionTokenBalance],
) -> SwapLegs {
    let mut legs = SwapLegs::default();

    for p in pre {
        for q in post {
            if p.account_index != q.account_index {
                continue;
            }
            let delta = ui_amount(q) - ui_amount(p);
            if delta < 0.0 {
                legs.mint_in = Some(p.mint.clone());
                legs.amount_in = -delta;
            } else if delta > 0.0 {
                legs.mint_out = Some(q.mint.clone());
                legs.amount_out = delta;
            }
        }
    }

    legs
}

fn reconcile_aggregate(
    pre: &[UiTransactionTokenBalance],
    post: &[UiTransactionTokenBalance],
) -> SwapLegs {
    // Per-mint totals in first-seen order, so ties resolve deterministically.
    let mut totals: Vec<(String, f64)> = Vec::new();

    for p in pre {
        for q in post {
            if p.account_index != q.account_index {
                continue;
            }
            let delta = ui_amount(q) - ui_amount(p);
            if delta == 0.0 {
                continue;
            }
            match totals.iter_mut().find(|(mint, _)| *mint == q.mint) {
                Some((_, total)) => *total += delta,
                None => totals.push((q.mint.clone(), delta)),
            }
        }
    }

    let mut legs = SwapLegs::default();
    for (mint, total) in &totals {
        if *total < 0.0 && -*total > legs.amount_in {
            legs.mint_in = Some(mint.clone());
            legs.amount_in = -*total;
        } else if *total > 0.0 && *total > legs.amount_out {
            legs.mint_out = Some(mint.clone());
            legs.amount_out = *total;
        }
    }

    legs
}

/// Final pool balances for the two resolved mints: a single scan of the post
/// snapshots, skipping null `ui_amount` entries, last match in list order
/// wins. Assumes (does not verify) that the relevant pool account is the
/// last or only holder of the mint; multi-account pools must be pre-filtered
/// by the caller.
pub fn locate_post_balances(
    post: &[UiTransactionTokenBalance],
    mint_in: Option<&str>,
    mint_out: Option<&str>,
) -> (Option<f64>, Option<f64>) {
    let mut balance_in = None;
    let mut balance_out = None;

    for snapshot in post {
        let Some(amount) = snapshot.ui_token_amount.ui_amount else {
            continue;
        };
        if Some(snapshot.mint.as_str()) == mint_in {
            balance_in = Some(amount);
        } else if Some(snapshot.mint.as_str()) == mint_out {
            balance_out = Some(amount);
        }
    }

    (balance_in, balance_out)
}

/// Raw-precision balance delta for one mint, scaled by `decimals`.
///
/// Uses the first snapshot carrying the mint in each list (unlike the
/// locator, which keeps the last) and the raw undivided `amount` field, so
/// the result is immune to any pre-scaling inconsistency in `ui_amount`. A
/// missing or unparsable amount counts as zero.
pub fn limit_amount(
    pre: &[UiTransactionTokenBalance],
    post: &[UiTransactionTokenBalance],
    token_mint: &str,
    decimals: u8,
) -> f64 {
    let pre_raw = raw_amount(pre, token_mint);
    let post_raw = raw_amount(post, token_mint);
    (post_raw - pre_raw) as f64 / 10f64.powi(i32::from(decimals))
}

/// Decimal exponent recorded in the mint's own snapshots, post preferred.
/// A pre/post disagreement is logged and resolved in favor of post.
pub fn resolve_decimals(
    pre: &[UiTransactionTokenBalance],
    post: &[UiTransactionTokenBalance],
    token_mint: &str,
) -> Option<u8> {
    let from_post = snapshot_decimals(post, token_mint);
    let from_pre = snapshot_decimals(pre, token_mint);

    if let (Some(a), Some(b)) = (from_post, from_pre) {
        if a != b {
            logging::log(
                LogLevel::Warning,
                &format!("decimals mismatch for mint {token_mint}: pre={b}, post={a}"),
            );
        }
    }

    from_post.or(from_pre)
}

fn snapshot_decimals(snapshots: &[UiTransactionTokenBalance], mint: &str) -> Option<u8> {
    snapshots
        .iter()
        .find(|b| b.mint == mint)
        .map(|b| b.ui_token_amount.decimals)
}

fn ui_amount(snapshot: &UiTransactionTokenBalance) -> f64 {
    snapshot.ui_token_amount.ui_amount.unwrap_or(0.0)
}

fn raw_amount(snapshots: &[UiTransactionTokenBalance], mint: &str) -> i128 {
    snapshots
        .iter()
        .find(|b| b.mint == mint)
        .and_then(|b| b.ui_token_amount.amount.parse::<i128>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_account_decoder::parse_token::UiTokenAmount;
    use solana_transaction_status::option_serializer::OptionSerializer;

    fn snapshot(
        account_index: u8,
        mint: &str,
        ui_amount: Option<f64>,
        amount: &str,
        decimals: u8,
    ) -> UiTransactionTokenBalance {
        UiTransactionTokenBalance {
            account_index,
            mint: mint.to_string(),
            ui_token_amount: UiTokenAmount {
                ui_amount,
                decimals,
                amount: amount.to_string(),
                ui_amount_string: ui_amount.map(|a| a.to_string()).unwrap_or_default(),
            },
            owner: OptionSerializer::None,
            program_id: OptionSerializer::None,
        }
    }

    #[test]
    fn test_reconcile_classifies_direction() {
        let pre = vec![
            snapshot(3, "X", Some(100.0), "100000000", 6),
            snapshot(7, "Y", Some(0.0), "0", 6),
        ];
        let post = vec![
            snapshot(3, "X", Some(40.0), "40000000", 6),
            snapshot(7, "Y", Some(2.0), "2000000", 6),
        ];

        let legs = reconcile(&pre, &post, ReconcilePolicy::LastWins);
        assert_eq!(legs.mint_in.as_deref(), Some("X"));
        assert_eq!(legs.amount_in, 60.0);
        assert_eq!(legs.mint_out.as_deref(), Some("Y"));
        assert_eq!(legs.amount_out, 2.0);
    }

    #[test]
    fn test_reconcile_treats_null_ui_amount_as_zero() {
        let pre = vec![snapshot(1, "X", None, "0", 6)];
        let post = vec![snapshot(1, "X", Some(5.0), "5000000", 6)];

        let legs = reconcile(&pre, &post, ReconcilePolicy::LastWins);
        assert_eq!(legs.mint_out.as_deref(), Some("X"));
        assert_eq!(legs.amount_out, 5.0);
        assert!(legs.mint_in.is_none());
        assert_eq!(legs.amount_in, 0.0);
    }

    #[test]
    fn test_reconcile_ignores_zero_deltas() {
        let pre = vec![snapshot(1, "X", Some(9.0), "9000000", 6)];
        let post = vec![snapshot(1, "X", Some(9.0), "9000000", 6)];

        let legs = reconcile(&pre, &post, ReconcilePolicy::LastWins);
        assert_eq!(legs, SwapLegs::default());
    }

    #[test]
    fn test_last_wins_keeps_last_pair_per_direction() {
        let pre = vec![
            snapshot(1, "A", Some(10.0), "10000000", 6),
            snapshot(2, "B", Some(10.0), "10000000", 6),
        ];
        let post = vec![
            snapshot(1, "A", Some(4.0), "4000000", 6),
            snapshot(2, "B", Some(7.0), "7000000", 6),
        ];

        let legs = reconcile(&pre, &post, ReconcilePolicy::LastWins);
        // Both accounts decreased; the later pair overwrites the earlier one.
        assert_eq!(legs.mint_in.as_deref(), Some("B"));
        assert_eq!(legs.amount_in, 3.0);
    }

    #[test]
    fn test_aggregate_sums_deltas_per_mint() {
        let pre = vec![
            snapshot(1, "A", Some(10.0), "10000000", 6),
            snapshot(2, "A", Some(10.0), "10000000", 6),
            snapshot(3, "B", Some(1.0), "1000000", 6),
        ];
        let post = vec![
            snapshot(1, "A", Some(4.0), "4000000", 6),
            snapshot(2, "A", Some(7.0), "7000000", 6),
            snapshot(3, "B", Some(3.5), "3500000", 6),
        ];

        let legs = reconcile(&pre, &post, ReconcilePolicy::Aggregate);
        assert_eq!(legs.mint_in.as_deref(), Some("A"));
        assert_eq!(legs.amount_in, 9.0);
        assert_eq!(legs.mint_out.as_deref(), Some("B"));
        assert_eq!(legs.amount_out, 2.5);
    }

    #[test]
    fn test_locator_last_match_wins_and_skips_nulls() {
        let post = vec![
            snapshot(1, "X", Some(11.0), "11000000", 6),
            snapshot(2, "X", None, "0", 6),
            snapshot(3, "X", Some(99.0), "99000000", 6),
            snapshot(4, "Y", Some(2.0), "2000000", 6),
        ];

        let (balance_in, balance_out) = locate_post_balances(&post, Some("X"), Some("Y"));
        assert_eq!(balance_in, Some(99.0));
        assert_eq!(balance_out, Some(2.0));
    }

    #[test]
    fn test_locator_unresolved_mints() {
        let post = vec![snapshot(1, "X", Some(11.0), "11000000", 6)];

        let (balance_in, balance_out) = locate_post_balances(&post, None, Some("Z"));
        assert_eq!(balance_in, None);
        assert_eq!(balance_out, None);
    }

    #[test]
    fn test_limit_amount_scaling() {
        let pre = vec![snapshot(1, "X", Some(1000.0), "1000000000", 6)];
        let post = vec![snapshot(1, "X", Some(1000.123456), "1000123456", 6)];

        assert_eq!(limit_amount(&pre, &post, "X", 6), 0.123456);
    }

    #[test]
    fn test_limit_amount_first_match_wins() {
        let pre = vec![
            snapshot(1, "X", Some(1.0), "1000000", 6),
            snapshot(2, "X", Some(500.0), "500000000", 6),
        ];
        let post = vec![
            snapshot(1, "X", Some(3.0), "3000000", 6),
            snapshot(2, "X", Some(0.0), "0", 6),
        ];

        // Only the first snapshot per list counts: (3000000 - 1000000) / 1e6.
        assert_eq!(limit_amount(&pre, &post, "X", 6), 2.0);
    }

    #[test]
    fn test_limit_amount_missing_mint_is_zero() {
        let pre = vec![snapshot(1, "X", Some(1.0), "1000000", 6)];
        let post = vec![snapshot(1, "X", Some(2.0), "2000000", 6)];

        assert_eq!(limit_amount(&pre, &post, "Z", 6), 0.0);
    }

    #[test]
    fn test_limit_amount_can_be_negative() {
        let pre = vec![snapshot(1, "X", Some(2.0), "2000000", 6)];
        let post = vec![snapshot(1, "X", Some(1.0), "1000000", 6)];

        assert_eq!(limit_amount(&pre, &post, "X", 6), -1.0);
    }

    #[test]
    fn test_resolve_decimals_prefers_post() {
        let pre = vec![snapshot(1, "X", Some(1.0), "1000000000", 9)];
        let post = vec![snapshot(1, "X", Some(1.0), "1000000", 6)];

        assert_eq!(resolve_decimals(&pre, &post, "X"), Some(6));
        assert_eq!(resolve_decimals(&pre, &[], "X"), Some(9));
        assert_eq!(resolve_decimals(&pre, &post, "Z"), None);
    }
}
