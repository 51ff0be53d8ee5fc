//! Ergo lock transactions
//!
//! The lock box goes to the lock address with the transfer metadata in R4:
//! ```text
//! R4: Coll[Coll[SByte]] = [
//!   toChain,       // e.g. "cardano"
//!   toAddress,     // e.g. "addr1q..."
//!   networkFee,    // decimal string
//!   bridgeFee,     // decimal string
//!   fromAddress    // sender's Ergo address
//! ]
//! ```
//! Outputs are the lock box, the change box and the miner fee box.

use std::collections::{HashMap, HashSet};

use futures::Stream;
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::debug;

use ergo_tx::constants::MIN_BOX_VALUE;
use ergo_tx::sigma::encode_sigma_coll_coll_byte;
use ergo_tx::{address_to_ergo_tree, Eip12InputBox, Eip12Output, Eip12UnsignedTx};
use rosen_core::balance;
use rosen_core::{select_boxes, AssetBalance, ChainError, TokenInfo, UtxoInfo};

use super::LockRequest;
use crate::constants::{LOCK_MIN_BOX_VALUE, LOCK_TX_FEE};

fn ergo_tree(address: &str) -> Result<String, ChainError> {
    address_to_ergo_tree(address).map_err(|e| ChainError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// Assets moved into the lock box
pub fn lock_assets(request: &LockRequest) -> AssetBalance {
    if request.token.is_native() {
        AssetBalance::native(request.amount.clone())
    } else {
        AssetBalance::new(
            LOCK_MIN_BOX_VALUE,
            vec![TokenInfo::new(request.token.token_id.clone(), request.amount.clone())],
        )
    }
}

/// Serialized R4 of the lock box
pub fn lock_register(request: &LockRequest) -> String {
    let values = request.metadata_values();
    let bytes: Vec<&[u8]> = values.iter().map(|v| v.as_bytes()).collect();
    encode_sigma_coll_coll_byte(&bytes)
}

/// Build an unsigned Ergo lock transaction from boxes pulled off `utxos`
pub async fn generate_lock_transaction<S>(
    request: &LockRequest,
    lock_address: &str,
    height: u32,
    utxos: S,
) -> Result<Eip12UnsignedTx, ChainError>
where
    S: Stream<Item = Eip12InputBox> + Unpin,
{
    if request.amount.is_zero() {
        return Err(ChainError::invalid_argument("Amount must be positive"));
    }

    let lock = lock_assets(request);
    let lock_box = Eip12Output::from_balance(&lock, ergo_tree(lock_address)?, height)
        .with_register("R4", lock_register(request));
    let change_tree = ergo_tree(&request.change_address)?;

    // change box floor plus the miner fee
    let reserve = AssetBalance::native(MIN_BOX_VALUE + LOCK_TX_FEE);
    let required = balance::sum(&lock, &reserve);

    let selection = select_boxes(&required, &HashSet::new(), &HashMap::new(), utxos).await;
    if !selection.covered {
        return Err(ChainError::InsufficientAssets {
            message: format!(
                "Selected {} boxes, not enough to cover {} nanoERG and {} tokens",
                selection.boxes.len(),
                required.native_token,
                required.tokens.len()
            ),
        });
    }

    let mut inputs = AssetBalance::default();
    for input in &selection.boxes {
        inputs = balance::sum(&inputs, &input.asset_balance()?);
    }

    let change = balance::subtract(&inputs, &lock, &BigUint::zero(), false)?;
    let change = balance::subtract(
        &change,
        &AssetBalance::native(LOCK_TX_FEE),
        &BigUint::zero(),
        false,
    )?;
    let change_box = Eip12Output::from_balance(&change, change_tree, height);

    debug!(
        inputs = selection.boxes.len(),
        change = %change.native_token,
        height,
        "Assembled Ergo lock transaction"
    );

    Ok(Eip12UnsignedTx {
        inputs: selection.boxes,
        data_inputs: vec![],
        outputs: vec![lock_box, change_box, Eip12Output::fee(LOCK_TX_FEE, height)],
    })
}
