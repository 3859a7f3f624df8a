//! Error types for the swap indexer.
//!
//! Data-quality problems inside a block (missing metadata, unresolvable
//! balance directions, out-of-range account indices) are absorbed by the
//! pipeline and surface as skipped transactions or `None`/zero event fields.
//! Only caller-input violations and transport failures become errors.

use thiserror::Error;

/// Errors that can surface to the caller.
#[derive(Error, Debug)]
pub enum IndexerError {
    /// The RPC endpoint failed or returned an unusable response.
    #[error("RPC error: {0}")]
    RpcError(String),

    /// The configured program id is not a valid base58 pubkey.
    #[error("invalid program id '{0}'")]
    InvalidProgramId(String),

    /// The block structure violates the input contract (e.g. no transaction
    /// list at all). Distinct from per-transaction data-quality faults, which
    /// never abort a block.
    #[error("malformed block: {0}")]
    MalformedBlock(String),
}

/// Convenience result type used throughout the crate.
pub type Result<T> = std::result::Result<T, IndexerError>;
