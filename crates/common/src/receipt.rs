//! Transaction receipts (`spec.md` §3).

use serde::{Deserialize, Serialize};

use crate::fixed::Digest;
use crate::log::Log;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    Success,
    Failed,
}

impl TxStatus {
    pub fn as_u8(self) -> u8 {
        match self {
            TxStatus::Success => 1,
            TxStatus::Failed => 0,
        }
    }
}

/// `{ status, cumulative_gas_used, gas_used, tx_hash, logs,
/// post_state_or_status_indicator }`. Cumulative gas is monotonic
/// within a block (`spec.md` §3, §5 ordering guarantee ii).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub status: TxStatus,
    pub cumulative_gas_used: u64,
    pub gas_used: u64,
    pub tx_hash: Digest,
    pub logs: Vec<Log>,
}

impl Receipt {
    /// A failed-transaction receipt carries no logs (`spec.md` §7:
    /// "failed txs yield a receipt with `status=0` and `logs=[]`").
    pub fn failed(tx_hash: Digest, gas_used: u64, cumulative_gas_used: u64) -> Self {
        Self {
            status: TxStatus::Failed,
            cumulative_gas_used,
            gas_used,
            tx_hash,
            logs: Vec::new(),
        }
    }

    pub fn success(tx_hash: Digest, gas_used: u64, cumulative_gas_used: u64, logs: Vec<Log>) -> Self {
        Self {
            status: TxStatus::Success,
            cumulative_gas_used,
            gas_used,
            tx_hash,
            logs,
        }
    }
}
