use thiserror::Error;

#[derive(Debug, Error)]
pub enum SystemActionExecError {
    #[error("unknown system action kind")]
    ErrUnknownSysAction,

    #[error("AccountSetSigner payload does not derive to the sending account")]
    ErrAccountSignerMismatch,

    #[error(transparent)]
    Decode(#[from] gtos_common::SystemActionError),

    #[error(transparent)]
    Signer(#[from] gtos_signer::SignerError),
}
