//! Gas pool and fee arithmetic (component D — `spec.md` §4.D).

pub mod fees;
pub mod pool;

pub use fees::{capped_refund, effective_gas_price, intrinsic_gas, set_code_surcharge, upfront_cost};
pub use pool::{GasPool, GasPoolError};
