//! Bitcoin as a source chain
//!
//! Bitcoin is a valid destination, but locking from Bitcoin and its base
//! network fee are not available yet.

use num_bigint::BigUint;

use rosen_core::{Chain, ChainError};

use super::{LockRequest, UnsignedLockTx};

fn not_implemented(operation: &'static str) -> ChainError {
    ChainError::NotImplemented {
        chain: Chain::Bitcoin.to_string(),
        operation,
    }
}

pub fn base_network_fee() -> Result<BigUint, ChainError> {
    Err(not_implemented("base_network_fee"))
}

pub fn generate_lock_transaction(_request: &LockRequest) -> Result<UnsignedLockTx, ChainError> {
    Err(not_implemented("generate_lock_transaction"))
}
