//! RLP prefix-byte constants, per the canonical recursive length-prefix
//! encoding used for the on-wire transaction shapes (`spec.md` §6).

/// Encodes the empty string / `nil` (used for `TxKind::Create`, i.e.
/// `to == nil` in `spec.md` §4.E's `applySetCode` dispatch arm).
pub const RLP_NULL: u8 = 0x80;

pub const RLP_EMPTY_LIST: u8 = 0xc0;

pub const STRING_OFFSET: u8 = 0x80;
pub const STRING_LONG_OFFSET: u8 = 0xb7;
pub const LIST_OFFSET: u8 = 0xc0;
pub const LIST_LONG_OFFSET: u8 = 0xf7;

/// Strings/lists longer than this use the "long form" length-of-length
/// prefix.
pub const SHORT_FORM_MAX_LEN: usize = 55;
