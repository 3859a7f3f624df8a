//! Program instruction filter.
//!
//! Decides whether a compiled instruction targets the configured program by
//! resolving its `program_id_index` through the transaction's static account
//! key table. An out-of-range index is treated as non-matching rather than an
//! error: ledger data may be malformed, and for versioned transactions the
//! index can point past the static keys into a lookup table.

use solana_sdk::instruction::CompiledInstruction;
use solana_sdk::pubkey::Pubkey;

/// Returns true if the instruction's resolved program id equals `program_id`.
/// Fails closed when `program_id_index` is out of bounds.
pub fn instruction_targets_program(
    instruction: &CompiledInstruction,
    account_keys: &[Pubkey],
    program_id: &Pubkey,
) -> bool {
    account_keys
        .get(instruction.program_id_index as usize)
        .is_some_and(|key| key == program_id)
}

/// Cheap transaction-level gate: true if any top-level instruction targets
/// the program. Short-circuits on the first match, so callers can skip the
/// per-instruction balance work for unrelated transactions.
pub fn transaction_has_program(
    instructions: &[CompiledInstruction],
    account_keys: &[Pubkey],
    program_id: &Pubkey,
) -> bool {
    instructions
        .iter()
        .any(|ix| instruction_targets_program(ix, account_keys, program_id))
}

/// Indices of the top-level instructions that target the program, in
/// instruction order.
pub fn matching_instruction_indices(
    instructions: &[CompiledInstruction],
    account_keys: &[Pubkey],
    program_id: &Pubkey,
) -> Vec<usize> {
    instructions
        .iter()
        .enumerate()
        .filter(|(_, ix)| instruction_targets_program(ix, account_keys, program_id))
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ix(program_id_index: u8) -> CompiledInstruction {
        CompiledInstruction {
            program_id_index,
            accounts: vec![],
            data: vec![],
        }
    }

    #[test]
    fn test_matches_resolved_program() {
        let target = Pubkey::new_unique();
        let keys = vec![Pubkey::new_unique(), target];

        assert!(instruction_targets_program(&ix(1), &keys, &target));
        assert!(!instruction_targets_program(&ix(0), &keys, &target));
    }

    #[test]
    fn test_out_of_bounds_index_fails_closed() {
        let target = Pubkey::new_unique();
        let keys = vec![target];

        assert!(!instruction_targets_program(&ix(7), &keys, &target));
    }

    #[test]
    fn test_transaction_gate() {
        let target = Pubkey::new_unique();
        let keys = vec![Pubkey::new_unique(), target];

        let instructions = vec![ix(0), ix(1), ix(0)];
        assert!(transaction_has_program(&instructions, &keys, &target));

        let unrelated = vec![ix(0), ix(0)];
        assert!(!transaction_has_program(&unrelated, &keys, &target));
    }

    #[test]
    fn test_enumerates_matching_indices_in_order() {
        let target = Pubkey::new_unique();
        let keys = vec![Pubkey::new_unique(), target];

        let instructions = vec![ix(0), ix(1), ix(9), ix(1)];
        assert_eq!(
            matching_instruction_indices(&instructions, &keys, &target),
            vec![1, 3]
        );
    }
}
