use thiserror::Error;

/// Errors from component A (capability dispatch) and component B
/// (sender resolution). Names mirror `spec.md` §4.A/§4.B exactly so a
/// reader can trace failure modes back to the spec's error table.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("invalid public key for scheme")]
    InvalidPublicKey,

    #[error("transaction chain_id does not match ambient chain_id")]
    ErrInvalidChainId,

    #[error("signer scheme is not supported by this transaction format")]
    ErrUnsupportedAccountSignerType,

    #[error("account has no registered signer metadata and scheme is not the bootstrap scheme")]
    ErrAccountSignerRequiredMeta,

    #[error("registered signer metadata does not match the transaction's claimed scheme/key")]
    ErrAccountSignerMismatch,

    #[error("signature verification failed for the registered signer")]
    ErrInvalidAccountSignerSignature,

    #[error(transparent)]
    Crypto(#[from] gtos_crypto::CryptoError),
}
