//! Chain configuration: the ambient constants every other crate reads
//! instead of hard-coding (`chain_id`, the gas schedule, the
//! private-balance proof-body sizes). TOML-loadable, following the
//! `serde` + `toml` config-struct convention used across the example
//! pack — the teacher's own `crates/common/config` was filtered out of
//! the retrieval pack, so this crate has no single teacher file to
//! mirror line for line (see `DESIGN.md`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gas schedule for host primitives (`spec.md` §4.G), additional to the
/// flat 1-gas-per-opcode base cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasSchedule {
    pub sload: u64,
    pub sstore: u64,
    pub balance: u64,
    pub extcodesize: u64,
    pub call_base_transfer: u64,
    pub log_base: u64,
    pub log_topic: u64,
    pub log_byte: u64,
    pub create_base: u64,
    pub create_byte: u64,
    /// `setCode`'s per-TTL-block surcharge (`spec.md` §4.I).
    pub set_code_ttl_block_gas: u64,
    /// Per-byte intrinsic gas, zero vs. non-zero (`spec.md` §4.D).
    pub tx_data_zero_byte: u64,
    pub tx_data_nonzero_byte: u64,
    pub tx_base: u64,
    pub max_call_depth: u32,
}

impl Default for GasSchedule {
    fn default() -> Self {
        Self {
            sload: 100,
            sstore: 5_000,
            balance: 400,
            extcodesize: 700,
            call_base_transfer: 2_300,
            log_base: 375,
            log_topic: 375,
            log_byte: 8,
            create_base: 32_000,
            create_byte: 200,
            set_code_ttl_block_gas: 20,
            tx_data_zero_byte: 4,
            tx_data_nonzero_byte: 16,
            tx_base: 21_000,
            max_call_depth: 8,
        }
    }
}

/// Fixed private-action proof-body sizes (`spec.md` §6, §9 Open
/// Question — resolved in `DESIGN.md`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyProofSizes {
    pub shield_proof_size: usize,
    pub transfer_proof_size: usize,
    pub unshield_proof_size: usize,
}

impl Default for PrivacyProofSizes {
    fn default() -> Self {
        Self {
            shield_proof_size: 128,
            transfer_proof_size: 192,
            unshield_proof_size: 128,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    /// In the chain's smallest unit; `Shield`/`Unshield` scale by this
    /// factor (`spec.md` §4.H: "amount · base_unit").
    pub private_balance_base_unit: u64,
    pub gas_schedule: GasSchedule,
    pub privacy_proof_sizes: PrivacyProofSizes,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: 1,
            private_balance_base_unit: 1,
            gas_schedule: GasSchedule::default(),
            privacy_proof_sizes: PrivacyProofSizes::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config toml: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ChainConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
