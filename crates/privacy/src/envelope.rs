//! Private-action envelope (`spec.md` §6): `action_tag(u8) || body`.
//! Bodies are fixed-layout byte strings with fixed-width 32-byte
//! ciphertext fields followed by a variable-length proof bundle whose
//! size is a module-level constant from [`gtos_config::PrivacyProofSizes`],
//! per `spec.md` §9's instruction that proof-body sizes be part of the
//! consensus digest rather than self-describing/length-prefixed.

use gtos_common::{Address, Ciphertext, Digest};
use gtos_config::PrivacyProofSizes;

use crate::error::PrivacyError;

const SHIELD_TAG: u8 = 0x01;
const TRANSFER_TAG: u8 = 0x02;
const UNSHIELD_TAG: u8 = 0x03;

pub struct ShieldBody {
    pub amount: u64,
    pub new_sender_ciphertext: Ciphertext,
    pub proof: Vec<u8>,
}

pub struct TransferBody {
    pub to: Address,
    pub new_sender_ciphertext: Ciphertext,
    pub receiver_delta_ciphertext: Ciphertext,
    pub proof: Vec<u8>,
}

pub struct UnshieldBody {
    pub to: Address,
    pub amount: u64,
    pub new_sender_ciphertext: Ciphertext,
    pub proof: Vec<u8>,
}

pub enum PrivateAction {
    Shield(ShieldBody),
    Transfer(TransferBody),
    Unshield(UnshieldBody),
}

fn take<'a>(buf: &'a [u8], cursor: &mut usize, len: usize) -> Result<&'a [u8], PrivacyError> {
    let end = cursor.checked_add(len).ok_or(PrivacyError::ErrMalformedEnvelope)?;
    let slice = buf.get(*cursor..end).ok_or(PrivacyError::ErrMalformedEnvelope)?;
    *cursor = end;
    Ok(slice)
}

fn take_digest(buf: &[u8], cursor: &mut usize) -> Result<Digest, PrivacyError> {
    let slice = take(buf, cursor, 32)?;
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(slice);
    Ok(Digest(bytes))
}

fn take_address(buf: &[u8], cursor: &mut usize) -> Result<Address, PrivacyError> {
    let slice = take(buf, cursor, 32)?;
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(slice);
    Ok(Address(bytes))
}

fn take_u64(buf: &[u8], cursor: &mut usize) -> Result<u64, PrivacyError> {
    let slice = take(buf, cursor, 8)?;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(slice);
    Ok(u64::from_be_bytes(bytes))
}

fn take_ciphertext(buf: &[u8], cursor: &mut usize) -> Result<Ciphertext, PrivacyError> {
    Ok(Ciphertext {
        commitment: take_digest(buf, cursor)?,
        handle: take_digest(buf, cursor)?,
    })
}

/// Parses the envelope and rejects any trailing bytes past the
/// fixed-size proof bundle — the envelope is not self-describing, so a
/// length mismatch in either direction is malformed rather than
/// silently truncated or padded.
pub fn decode(payload: &[u8], sizes: PrivacyProofSizes) -> Result<PrivateAction, PrivacyError> {
    let (&tag, body) = payload.split_first().ok_or(PrivacyError::ErrMalformedEnvelope)?;
    let mut cursor = 0usize;
    let action = match tag {
        SHIELD_TAG => {
            let amount = take_u64(body, &mut cursor)?;
            let new_sender_ciphertext = take_ciphertext(body, &mut cursor)?;
            let proof = take(body, &mut cursor, sizes.shield_proof_size)?.to_vec();
            PrivateAction::Shield(ShieldBody {
                amount,
                new_sender_ciphertext,
                proof,
            })
        }
        TRANSFER_TAG => {
            let to = take_address(body, &mut cursor)?;
            let new_sender_ciphertext = take_ciphertext(body, &mut cursor)?;
            let receiver_delta_ciphertext = take_ciphertext(body, &mut cursor)?;
            let proof = take(body, &mut cursor, sizes.transfer_proof_size)?.to_vec();
            PrivateAction::Transfer(TransferBody {
                to,
                new_sender_ciphertext,
                receiver_delta_ciphertext,
                proof,
            })
        }
        UNSHIELD_TAG => {
            let to = take_address(body, &mut cursor)?;
            let amount = take_u64(body, &mut cursor)?;
            let new_sender_ciphertext = take_ciphertext(body, &mut cursor)?;
            let proof = take(body, &mut cursor, sizes.unshield_proof_size)?.to_vec();
            PrivateAction::Unshield(UnshieldBody {
                to,
                amount,
                new_sender_ciphertext,
                proof,
            })
        }
        _ => return Err(PrivacyError::ErrUnknownPrivateAction),
    };
    if cursor != body.len() {
        return Err(PrivacyError::ErrMalformedEnvelope);
    }
    Ok(action)
}
