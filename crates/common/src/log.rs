//! Event logs emitted by script execution (`spec.md` §3, §4.G `emit`).

use serde::{Deserialize, Serialize};

use crate::fixed::{Address, Digest};

/// `{ address, topics: 0..4, data }`. Topic 0 is the keccak digest of
/// the canonical event signature `name(type1,type2,...)`; indexed
/// value-type topics are the 32-byte ABI encoding, indexed
/// reference-type topics are the keccak of the ABI encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<Digest>,
    pub data: Vec<u8>,
}

impl Log {
    pub fn topic0(&self) -> Option<Digest> {
        self.topics.first().copied()
    }
}
