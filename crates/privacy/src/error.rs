use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrivacyError {
    #[error("malformed private-action envelope")]
    ErrMalformedEnvelope,

    #[error("unknown private action tag")]
    ErrUnknownPrivateAction,

    #[error("sender has no registered Elgamal signer metadata")]
    ErrSenderNotElgamal,

    #[error("private balance version counter would overflow")]
    ErrVersionOverflow,

    #[error("public balance insufficient for shield amount")]
    ErrInsufficientFundsForTransfer,

    #[error("proof did not verify, or is not implemented for this payload")]
    ErrProofNotImplemented,

    #[error("unshield proof's embedded amount does not match the envelope amount")]
    ErrAmountMismatch,
}
