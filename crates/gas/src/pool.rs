//! Block gas pool (`spec.md` §4.D, §5): a single integer guarded by the
//! outer executor, reserved from up front and credited back on refund.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GasPoolError {
    #[error("block gas pool exhausted")]
    ErrGasLimitReached,
}

#[derive(Debug)]
pub struct GasPool {
    remaining: u64,
}

impl GasPool {
    pub fn new(block_gas_limit: u64) -> Self {
        Self {
            remaining: block_gas_limit,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Reserves `gas` up front for a transaction about to execute.
    pub fn reserve(&mut self, gas: u64) -> Result<(), GasPoolError> {
        if gas > self.remaining {
            return Err(GasPoolError::ErrGasLimitReached);
        }
        self.remaining -= gas;
        Ok(())
    }

    /// Credits back unused/refunded gas after a transaction completes.
    pub fn refund(&mut self, gas: u64) {
        self.remaining = self.remaining.saturating_add(gas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_then_refund_restores_capacity() {
        let mut pool = GasPool::new(100);
        pool.reserve(60).expect("fits");
        assert_eq!(pool.remaining(), 40);
        pool.refund(20);
        assert_eq!(pool.remaining(), 60);
    }

    #[test]
    fn reserve_rejects_over_capacity() {
        let mut pool = GasPool::new(100);
        assert_eq!(pool.reserve(101), Err(GasPoolError::ErrGasLimitReached));
    }
}
