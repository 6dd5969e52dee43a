use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("malformed public key for this scheme")]
    MalformedPublicKey,

    #[error("malformed signature for this scheme")]
    MalformedSignature,

    #[error("signature verification failed")]
    VerificationFailed,

    #[error("ecdsa recovery failed")]
    RecoveryFailed,

    #[error("aggregate verification requires at least one signer")]
    EmptyAggregate,
}
