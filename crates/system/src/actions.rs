//! Component F: the system action handler (`spec.md` §4.F). Dispatches
//! the tagged `SystemAction` payload (decoded in `gtos-common`, since
//! the sender resolver's bootstrap exception also needs to recognise
//! it) to its effect on state.

use gtos_common::{Address, SystemAction, TtlRecord};
use gtos_signer::capability;
use gtos_state::StateDb;
use tracing::instrument;

use crate::error::SystemActionExecError;

#[instrument(skip(state, data), fields(from = %from))]
pub fn apply_system_action(
    state: &mut StateDb,
    from: Address,
    data: &[u8],
    current_block: u64,
) -> Result<(), SystemActionExecError> {
    let action = SystemAction::decode(data)?;
    match action {
        SystemAction::AccountSetSigner { scheme, public_key } => {
            let canonical = capability::normalise(scheme, &public_key)?;
            if capability::derive_address(scheme, &canonical) != from {
                return Err(SystemActionExecError::ErrAccountSignerMismatch);
            }
            state.set_signer_metadata(from, scheme, canonical);
            Ok(())
        }
        SystemAction::KvPut {
            namespace,
            key,
            value,
            ttl_blocks,
        } => {
            let record = TtlRecord::new(value, current_block, ttl_blocks);
            state.put_ttl_kv(from, namespace, key, record);
            Ok(())
        }
        SystemAction::KvDelete { namespace, key } => {
            state.delete_ttl_kv(from, namespace, key, current_block);
            Ok(())
        }
    }
}
