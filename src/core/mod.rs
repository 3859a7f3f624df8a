pub mod balances;
pub mod filter;
pub mod pipeline;
