//! Block-level error taxonomy (`spec.md` §7): every variant here is
//! consensus-fatal — the whole block fails to import and produces no
//! receipts, as opposed to `gtos_transition::ExecutionError` which only
//! fails a single transaction.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockExecutionError {
    #[error("transaction {index}: sender resolution failed")]
    InvalidSender {
        index: usize,
        #[source]
        source: gtos_signer::SignerError,
    },

    #[error("transaction {index}: pre-check failed")]
    InvalidTransaction {
        index: usize,
        #[source]
        source: gtos_transition::PreCheckError,
    },
}
