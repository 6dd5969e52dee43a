//! Storage primitives for scalars, strings, dynamic arrays, mappings
//! and structs (`spec.md` §4.G), built on [`slots`]'s byte-exact slot
//! derivation and `gtos_state::StateDb`'s flat storage map.

pub mod slots;

use gtos_common::{Address, StorageWord, U256};
use gtos_state::StateDb;

fn word_to_u256(word: StorageWord) -> U256 {
    U256::from_big_endian(word.as_bytes())
}

fn u256_to_word(value: U256) -> StorageWord {
    StorageWord(value.to_big_endian())
}

pub fn scalar_get(state: &StateDb, contract: Address, key: &[u8]) -> Option<U256> {
    let slot = slots::scalar_slot(key).into();
    let word = state.get_storage(contract, slot);
    if word == StorageWord::ZERO {
        None
    } else {
        Some(word_to_u256(word))
    }
}

pub fn scalar_set(state: &mut StateDb, contract: Address, key: &[u8], value: U256) {
    let slot = slots::scalar_slot(key).into();
    state.set_storage(contract, slot, u256_to_word(value));
}

/// String get/set: length slot carries `len+1` (zero means unset);
/// chunks are 32-byte-aligned and preserve bytes exactly.
pub fn string_get(state: &StateDb, contract: Address, key: &[u8]) -> Option<Vec<u8>> {
    let len_slot = slots::string_len_slot(key);
    let encoded_len = word_to_u256(state.get_storage(contract, len_slot.into())).as_u64();
    if encoded_len == 0 {
        return None;
    }
    let len = (encoded_len - 1) as usize;
    let mut out = Vec::with_capacity(len);
    let mut index = 0u32;
    while out.len() < len {
        let chunk_slot = slots::string_chunk_slot(len_slot, index);
        let chunk = state.get_storage(contract, chunk_slot.into());
        let remaining = len - out.len();
        let take = remaining.min(32);
        out.extend_from_slice(&chunk.0[..take]);
        index += 1;
    }
    Some(out)
}

pub fn string_set(state: &mut StateDb, contract: Address, key: &[u8], value: &[u8]) {
    let len_slot = slots::string_len_slot(key);
    let encoded_len = (value.len() as u64).saturating_add(1);
    state.set_storage(contract, len_slot.into(), u256_to_word(U256::from(encoded_len)));
    for (index, chunk) in value.chunks(32).enumerate() {
        let mut word = [0u8; 32];
        word[..chunk.len()].copy_from_slice(chunk);
        let chunk_slot = slots::string_chunk_slot(len_slot, index as u32);
        state.set_storage(contract, chunk_slot.into(), StorageWord(word));
    }
}

pub fn array_len(state: &StateDb, contract: Address, key: &[u8]) -> u64 {
    let len_slot = slots::array_len_slot(key);
    word_to_u256(state.get_storage(contract, len_slot.into())).as_u64()
}

/// 1-based, returns `None` on out-of-bounds.
pub fn array_get(state: &StateDb, contract: Address, key: &[u8], index: u64) -> Option<U256> {
    let len = array_len(state, contract, key);
    if index == 0 || index > len {
        return None;
    }
    let len_slot = slots::array_len_slot(key);
    let elem_slot = slots::array_elem_slot(len_slot, index - 1);
    Some(word_to_u256(state.get_storage(contract, elem_slot.into())))
}

/// 1-based; returns `false` on out-of-bounds (caller raises).
pub fn array_set(state: &mut StateDb, contract: Address, key: &[u8], index: u64, value: U256) -> bool {
    let len = array_len(state, contract, key);
    if index == 0 || index > len {
        return false;
    }
    let len_slot = slots::array_len_slot(key);
    let elem_slot = slots::array_elem_slot(len_slot, index - 1);
    state.set_storage(contract, elem_slot.into(), u256_to_word(value));
    true
}

pub fn array_push(state: &mut StateDb, contract: Address, key: &[u8], value: U256) {
    let len = array_len(state, contract, key);
    let len_slot = slots::array_len_slot(key);
    let elem_slot = slots::array_elem_slot(len_slot, len);
    state.set_storage(contract, elem_slot.into(), u256_to_word(value));
    state.set_storage(contract, len_slot.into(), u256_to_word(U256::from(len + 1)));
}

/// Returns `None` if the array is empty.
pub fn array_pop(state: &mut StateDb, contract: Address, key: &[u8]) -> Option<U256> {
    let len = array_len(state, contract, key);
    if len == 0 {
        return None;
    }
    let len_slot = slots::array_len_slot(key);
    let elem_slot = slots::array_elem_slot(len_slot, len - 1);
    let value = word_to_u256(state.get_storage(contract, elem_slot.into()));
    state.set_storage(contract, elem_slot.into(), StorageWord::ZERO);
    state.set_storage(contract, len_slot.into(), u256_to_word(U256::from(len - 1)));
    Some(value)
}

pub fn map_get(state: &StateDb, contract: Address, name: &[u8], keys: &[&[u8]]) -> Option<U256> {
    let slot = slots::map_slot(name, keys).into();
    let word = state.get_storage(contract, slot);
    if word == StorageWord::ZERO {
        None
    } else {
        Some(word_to_u256(word))
    }
}

pub fn map_set(state: &mut StateDb, contract: Address, name: &[u8], keys: &[&[u8]], value: U256) {
    let slot = slots::map_slot(name, keys).into();
    state.set_storage(contract, slot, u256_to_word(value));
}

pub fn struct_get(state: &StateDb, contract: Address, type_name: &[u8], instance_key: &[u8], field: &[u8]) -> U256 {
    let slot = slots::struct_field_slot(type_name, instance_key, field).into();
    word_to_u256(state.get_storage(contract, slot))
}

pub fn struct_set(
    state: &mut StateDb,
    contract: Address,
    type_name: &[u8],
    instance_key: &[u8],
    field: &[u8],
    value: U256,
) {
    let slot = slots::struct_field_slot(type_name, instance_key, field).into();
    state.set_storage(contract, slot, u256_to_word(value));
}
