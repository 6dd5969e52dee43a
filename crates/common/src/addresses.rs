//! Reserved destination addresses (`spec.md` §4.E dispatch table).

use crate::fixed::Address;

/// Destination that routes to the system action handler (component F).
pub const SYSTEM_ACTION_ADDRESS: Address = Address([0xff; 32]);

/// Destination that routes to the private-balance engine (component H).
pub const PRIVACY_ROUTER_ADDRESS: Address = Address({
    let mut bytes = [0xee; 32];
    bytes[0] = 0x01;
    bytes
});
