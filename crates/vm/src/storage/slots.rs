//! Byte-exact storage-slot derivation (`spec.md` §6 "Storage-slot
//! derivation (bit-exact, across implementations)"). Every function
//! here is covered by a test asserting the precise keccak preimage.

use gtos_common::StorageSlot;
use gtos_crypto::keccak256;

const SCALAR_NS: &[u8] = b"gtos.lua.storage.";
const STR_NS: &[u8] = b"gtos.lua.str.";
const ARR_NS: &[u8] = b"gtos.lua.arr.";
const MAP_NS: &[u8] = b"gtos.lua.map.";
const STRUCT_NS: &[u8] = b"gtos.lua.struct.";

fn slot_from_preimage(preimage: &[u8]) -> StorageSlot {
    StorageSlot(keccak256(preimage).0)
}

/// `keccak("gtos.lua.storage." || key)`.
pub fn scalar_slot(key: &[u8]) -> StorageSlot {
    let mut preimage = Vec::with_capacity(SCALAR_NS.len() + key.len());
    preimage.extend_from_slice(SCALAR_NS);
    preimage.extend_from_slice(key);
    slot_from_preimage(&preimage)
}

/// `keccak("gtos.lua.str." || key)` — the length slot; chunk `i` lives
/// at `keccak(len_slot || u32_be(i))`.
pub fn string_len_slot(key: &[u8]) -> StorageSlot {
    let mut preimage = Vec::with_capacity(STR_NS.len() + key.len());
    preimage.extend_from_slice(STR_NS);
    preimage.extend_from_slice(key);
    slot_from_preimage(&preimage)
}

pub fn string_chunk_slot(len_slot: StorageSlot, index: u32) -> StorageSlot {
    let mut preimage = Vec::with_capacity(32 + 4);
    preimage.extend_from_slice(len_slot.as_bytes());
    preimage.extend_from_slice(&index.to_be_bytes());
    slot_from_preimage(&preimage)
}

/// `keccak("gtos.lua.arr." || key)` — the length slot; element `i`
/// lives at `keccak(len_slot || u64_be(i))`.
pub fn array_len_slot(key: &[u8]) -> StorageSlot {
    let mut preimage = Vec::with_capacity(ARR_NS.len() + key.len());
    preimage.extend_from_slice(ARR_NS);
    preimage.extend_from_slice(key);
    slot_from_preimage(&preimage)
}

pub fn array_elem_slot(len_slot: StorageSlot, index: u64) -> StorageSlot {
    let mut preimage = Vec::with_capacity(32 + 8);
    preimage.extend_from_slice(len_slot.as_bytes());
    preimage.extend_from_slice(&index.to_be_bytes());
    slot_from_preimage(&preimage)
}

/// `keccak("gtos.lua.map." || name)` — the map base; per-key mix
/// `keccak(keccak(key_i) || prev)`, folded left-to-right over the key
/// tuple so that injecting a crafted key cannot collide with a
/// differently-shaped key path (each key is hashed before mixing).
pub fn map_base_slot(name: &[u8]) -> StorageSlot {
    let mut preimage = Vec::with_capacity(MAP_NS.len() + name.len());
    preimage.extend_from_slice(MAP_NS);
    preimage.extend_from_slice(name);
    slot_from_preimage(&preimage)
}

pub fn map_slot(name: &[u8], keys: &[&[u8]]) -> StorageSlot {
    let mut acc = map_base_slot(name);
    for key in keys {
        let key_hash = keccak256(key);
        let mut preimage = Vec::with_capacity(64);
        preimage.extend_from_slice(&key_hash.0);
        preimage.extend_from_slice(acc.as_bytes());
        acc = slot_from_preimage(&preimage);
    }
    acc
}

/// `keccak("gtos.lua.struct." || typeName || 0x00 || instanceKey || 0x00 || fieldName)`.
pub fn struct_field_slot(type_name: &[u8], instance_key: &[u8], field_name: &[u8]) -> StorageSlot {
    let mut preimage = Vec::with_capacity(
        STRUCT_NS.len() + type_name.len() + 1 + instance_key.len() + 1 + field_name.len(),
    );
    preimage.extend_from_slice(STRUCT_NS);
    preimage.extend_from_slice(type_name);
    preimage.push(0x00);
    preimage.extend_from_slice(instance_key);
    preimage.push(0x00);
    preimage.extend_from_slice(field_name);
    slot_from_preimage(&preimage)
}
