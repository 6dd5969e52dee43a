use thiserror::Error;

/// Shared error type for the data-model conversions that live in this
/// crate (fixed-width parsing, scheme validation). Crates further up
/// the stack (`gtos-signer`, `gtos-transition`, ...) define their own
/// richer error enums and wrap these via `#[from]`, the same layering
/// the teacher uses between `ethrex_common` and `ethrex_vm`.
#[derive(Debug, Error)]
pub enum CommonError {
    #[error("invalid fixed-width value: expected {expected} bytes, got {got}")]
    InvalidFixedWidth { expected: usize, got: usize },

    #[error("unknown signer scheme id: {0}")]
    UnknownScheme(String),

    #[error("rlp decode error: {0}")]
    Rlp(#[from] gtos_rlp::RLPDecodeError),
}
