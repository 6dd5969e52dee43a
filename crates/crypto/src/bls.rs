//! BLS12-381 signatures (`spec.md` §4.A row 6: "pairing-based verify;
//! aggregate pubkey/signature supported (R=48,S=48)"). Public keys
//! live in G1, signatures in G2, hash-to-curve via the standard
//! `hash_to_curve` suite — the minimal-pubkey-size convention.

use bls12_381::{pairing, G1Affine, G2Affine, G2Projective};

use crate::error::CryptoError;

const DST: &[u8] = b"GTOS_BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_NUL_";

fn hash_to_g2(digest: &[u8; 32]) -> G2Projective {
    G2Projective::hash_to_curve(digest, DST)
}

/// `r || s` here is the 96-byte compressed G2 signature point, split
/// across this scheme's fixed 48-byte halves (`spec.md`'s R/S-width
/// convention, resolved in `DESIGN.md` to mean "first/second half of
/// the serialized signature" for this pairing-based scheme rather than
/// a literal (R, S) pair).
pub fn verify(pubkey_g1: &[u8], digest: &[u8; 32], r: &[u8], s: &[u8]) -> Result<(), CryptoError> {
    if pubkey_g1.len() != 48 || r.len() != 48 || s.len() != 48 {
        return Err(CryptoError::MalformedPublicKey);
    }
    let mut pk_bytes = [0u8; 48];
    pk_bytes.copy_from_slice(pubkey_g1);
    let pubkey = Option::<G1Affine>::from(G1Affine::from_compressed(&pk_bytes))
        .ok_or(CryptoError::MalformedPublicKey)?;

    let mut sig_bytes = [0u8; 96];
    sig_bytes[..48].copy_from_slice(r);
    sig_bytes[48..].copy_from_slice(s);
    let signature = Option::<G2Affine>::from(G2Affine::from_compressed(&sig_bytes))
        .ok_or(CryptoError::MalformedSignature)?;

    let hashed = G2Affine::from(hash_to_g2(digest));

    let lhs = pairing(&G1Affine::generator(), &signature);
    let rhs = pairing(&pubkey, &hashed);
    if lhs == rhs {
        Ok(())
    } else {
        Err(CryptoError::VerificationFailed)
    }
}

/// Aggregate verification: one message, many (pubkey, signature-half)
/// pairs, combined by point addition before the single pairing check
/// (`spec.md` §4.A: "aggregate pubkey/signature supported").
pub fn verify_aggregate(pubkeys_g1: &[[u8; 48]], digest: &[u8; 32], aggregate_sig: &[u8; 96]) -> Result<(), CryptoError> {
    if pubkeys_g1.is_empty() {
        return Err(CryptoError::EmptyAggregate);
    }
    let mut aggregate_pubkey = bls12_381::G1Projective::identity();
    for pk_bytes in pubkeys_g1 {
        let pk = Option::<G1Affine>::from(G1Affine::from_compressed(pk_bytes))
            .ok_or(CryptoError::MalformedPublicKey)?;
        aggregate_pubkey += G1Affine::from(pk);
    }
    let aggregate_pubkey = G1Affine::from(aggregate_pubkey);

    let signature = Option::<G2Affine>::from(G2Affine::from_compressed(aggregate_sig))
        .ok_or(CryptoError::MalformedSignature)?;

    let hashed = G2Affine::from(hash_to_g2(digest));
    let lhs = pairing(&G1Affine::generator(), &signature);
    let rhs = pairing(&aggregate_pubkey, &hashed);
    if lhs == rhs {
        Ok(())
    } else {
        Err(CryptoError::VerificationFailed)
    }
}
