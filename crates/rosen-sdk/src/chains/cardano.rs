//! Cardano lock transactions
//!
//! The transfer metadata travels as auxiliary data (label 0). The lock output
//! holds the locked ADA, or the locked asset plus its minimum ADA. Fees are
//! the ledger's linear fee over the fully witnessed size, estimated first
//! against a provisional change output and then settled on the minimum fee
//! of the final body.

use std::collections::{HashMap, HashSet};

use futures::Stream;
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::debug;

use cardano_tx::{
    build_output, min_ada_required, AuxiliaryData, CardanoProtocolParams, CardanoTxBuilder,
    CardanoUtxo, LockMetadata, TxInput, TxOutput, UnsignedCardanoTx, ADA_POLICY_ID,
};
use rosen_core::balance;
use rosen_core::{select_boxes, AssetBalance, ChainError, TokenInfo, UtxoInfo};

use super::LockRequest;
use crate::constants::FEE_AND_MIN_BOX_VALUE;

/// Auxiliary data carrying the lock metadata of `request`
pub fn lock_auxiliary_data(request: &LockRequest) -> Result<AuxiliaryData, ChainError> {
    let metadata = LockMetadata {
        to_chain: request.to_chain.to_string(),
        to_address: request.to_address.clone(),
        from_address: request.change_address.clone(),
        network_fee: request.network_fee.to_string(),
        bridge_fee: request.bridge_fee.to_string(),
    };
    Ok(AuxiliaryData::for_lock(&metadata)?)
}

/// Build an unsigned Cardano lock transaction and return its CBOR hex
pub async fn generate_lock_transaction<S>(
    request: &LockRequest,
    lock_address: &str,
    params: &CardanoProtocolParams,
    utxos: S,
) -> Result<String, ChainError>
where
    S: Stream<Item = CardanoUtxo> + Unpin,
{
    let auxiliary_data = lock_auxiliary_data(request)?;
    let (policy_id, asset_name) = if request.token.is_native() {
        (ADA_POLICY_ID, "")
    } else {
        let policy_id = request
            .token
            .policy_id
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                ChainError::invalid_argument(format!(
                    "Token {} has no Cardano policy id",
                    request.token.token_id
                ))
            })?;
        (
            policy_id,
            request.token.asset_name.as_deref().unwrap_or_default(),
        )
    };

    let tx = build_lock_transaction(
        &request.change_address,
        lock_address,
        utxos,
        policy_id,
        asset_name,
        &request.amount,
        auxiliary_data,
        params,
    )
    .await?;
    Ok(tx.to_hex())
}

/// Assemble the lock transaction for `amount` of `policy_id.asset_name`
/// (ADA when `policy_id` is empty)
#[allow(clippy::too_many_arguments)]
pub async fn build_lock_transaction<S>(
    change_address: &str,
    lock_address: &str,
    utxos: S,
    policy_id: &str,
    asset_name: &str,
    amount: &BigUint,
    auxiliary_data: AuxiliaryData,
    params: &CardanoProtocolParams,
) -> Result<UnsignedCardanoTx, ChainError>
where
    S: Stream<Item = CardanoUtxo> + Unpin,
{
    if amount.is_zero() {
        return Err(ChainError::invalid_argument("Amount must be positive"));
    }

    let coins_per_byte = params.coins_per_utxo_size;
    let mut builder = CardanoTxBuilder::new(params.clone());

    let mut lock = if policy_id == ADA_POLICY_ID {
        AssetBalance::native(amount.clone())
    } else {
        AssetBalance::new(
            0u64,
            vec![TokenInfo::new(format!("{policy_id}.{asset_name}"), amount.clone())],
        )
    };
    let lock_output = build_output(&lock, lock_address, coins_per_byte)?;
    lock.native_token = BigUint::from(lock_output.coin);
    builder.add_output(lock_output);

    let required = balance::sum(&lock, &AssetBalance::native(FEE_AND_MIN_BOX_VALUE));
    let selection = select_boxes(&required, &HashSet::new(), &HashMap::new(), utxos).await;
    if !selection.covered {
        return Err(ChainError::InsufficientAssets {
            message: format!(
                "Selected {} UTXOs, not enough to cover {} lovelace and {} tokens",
                selection.boxes.len(),
                required.native_token,
                required.tokens.len()
            ),
        });
    }

    let mut inputs = AssetBalance::default();
    for utxo in &selection.boxes {
        inputs = balance::sum(&inputs, &utxo.asset_balance()?);
        builder.add_input(TxInput::from_utxo(utxo)?);
    }
    builder.set_auxiliary_data(auxiliary_data);

    let change = balance::subtract(&inputs, &lock, &BigUint::zero(), false)?;
    let provisional = build_output(&change, change_address, coins_per_byte)?;
    let estimate = builder
        .min_fee()?
        .checked_add(builder.fee_for_output(&provisional)?)
        .ok_or(cardano_tx::CardanoTxError::FeeOverflow)?;

    let settled = builder.settle_fee(estimate, |candidate, fee| {
        let output = change_output(&change, fee, change_address, coins_per_byte)?;
        candidate.add_output(output);
        Ok::<_, ChainError>(())
    })?;
    let tx = settled.build()?;

    debug!(
        inputs = tx.inputs.len(),
        fee = tx.fee,
        change = tx.outputs.last().map(|o| o.coin).unwrap_or_default(),
        "Assembled Cardano lock transaction"
    );
    Ok(tx)
}

/// Change output once `fee` is paid out of `change`. It must still hold the
/// ledger's minimum ADA for its own size.
fn change_output(
    change: &AssetBalance,
    fee: u64,
    change_address: &str,
    coins_per_byte: u64,
) -> Result<TxOutput, ChainError> {
    let fee = BigUint::from(fee);
    if change.native_token <= fee {
        return Err(ChainError::InsufficientAssets {
            message: format!(
                "Change of {} lovelace cannot pay the {fee} lovelace fee",
                change.native_token
            ),
        });
    }

    let mut after_fee = change.clone();
    after_fee.native_token -= fee;
    let output = build_output(&after_fee, change_address, coins_per_byte)?;

    let min_ada = min_ada_required(&output, coins_per_byte);
    if output.coin < min_ada {
        return Err(ChainError::InsufficientAssets {
            message: format!(
                "Change output holds {} lovelace but its {} tokens need at least {min_ada}",
                output.coin,
                change.tokens.len()
            ),
        });
    }
    Ok(output)
}
