//! Cryptographic primitives for the execution core: digests, the six
//! signer schemes (`spec.md` §4.A), and the scripted-contract host
//! primitives (`keccak256`, `sha256`, `ripemd160`, `ecrecover`,
//! `addmod`, `mulmod`).

pub mod bls;
pub mod ciphertext;
pub mod ed25519;
pub mod elgamal;
pub mod error;
pub mod hash;
pub mod keccak;
pub mod modmath;
pub mod schnorr;
pub mod secp256k1;
pub mod secp256r1;
pub mod tx_hash;

pub use ciphertext::add_points;
pub use error::CryptoError;
pub use keccak::keccak256;
pub use modmath::{addmod, mulmod};
pub use tx_hash::tx_hash;
