//! Lock transaction assembly per source chain
//!
//! A lock transaction moves the transferred asset to the bridge's lock
//! address on the source chain, tagged with where it should be released:
//! `{toChain, toAddress, networkFee, bridgeFee, fromAddress}`. Ergo carries
//! this in R4 of the lock box, Cardano in transaction metadata.

pub mod bitcoin;
pub mod cardano;
pub mod ergo;

use futures::{future, Stream, StreamExt};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cardano_tx::CardanoUtxo;
use ergo_tx::{Eip12InputBox, Eip12UnsignedTx};
use rosen_core::{Chain, ChainError, UtxoInfo};

use crate::config::RosenConfig;
use crate::constants::{CARDANO_BASE_NETWORK_FEE, ERGO_BASE_NETWORK_FEE};
use crate::network::{resolve_height, HeightProvider};
use crate::token_map::RosenChainToken;
use crate::utxo::Utxo;
use crate::validate::validate_target_address;

/// Everything needed to lock one transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRequest {
    /// Token being bridged, as seen on the source chain
    pub token: RosenChainToken,
    pub to_chain: Chain,
    pub to_address: String,
    /// Receives the change; recorded as `fromAddress` in the lock metadata
    pub change_address: String,
    pub amount: BigUint,
    pub bridge_fee: BigUint,
    pub network_fee: BigUint,
    /// Overrides the configured lock address of the source chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_address: Option<String>,
    /// Ergo only; fetched from the height provider when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl LockRequest {
    /// The five metadata values in the order the bridge reads them
    pub fn metadata_values(&self) -> [String; 5] {
        [
            self.to_chain.to_string(),
            self.to_address.clone(),
            self.network_fee.to_string(),
            self.bridge_fee.to_string(),
            self.change_address.clone(),
        ]
    }
}

/// Unsigned lock transaction in the source chain's native form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "chain", content = "tx", rename_all = "lowercase")]
pub enum UnsignedLockTx {
    /// EIP-12 object for the wallet connector
    Ergo(Eip12UnsignedTx),
    /// CBOR hex of the full transaction with an empty witness set
    Cardano(String),
}

/// Narrow a mixed UTXO stream to one chain's boxes
fn only<S, T>(utxos: S, pick: fn(Utxo) -> Result<T, Utxo>) -> impl Stream<Item = T> + Unpin + Send
where
    S: Stream<Item = Utxo> + Unpin + Send,
    T: Send,
{
    utxos.filter_map(move |utxo| {
        future::ready(match pick(utxo) {
            Ok(item) => Some(item),
            Err(other) => {
                warn!(utxo_id = %other.utxo_id(), "Skipping UTXO from another chain");
                None
            }
        })
    })
}

fn pick_ergo(utxo: Utxo) -> Result<Eip12InputBox, Utxo> {
    match utxo {
        Utxo::Ergo(b) => Ok(b),
        other => Err(other),
    }
}

fn pick_cardano(utxo: Utxo) -> Result<CardanoUtxo, Utxo> {
    match utxo {
        Utxo::Cardano(u) => Ok(u),
        other => Err(other),
    }
}

/// Dispatches lock assembly to the source chain
pub struct RosenChains<H> {
    config: RosenConfig,
    heights: H,
}

impl<H: HeightProvider> RosenChains<H> {
    pub fn new(config: RosenConfig, heights: H) -> Self {
        Self { config, heights }
    }

    pub fn config(&self) -> &RosenConfig {
        &self.config
    }

    /// Base network fee of a transfer to `chain`, in its native unit
    pub fn base_network_fee(chain: Chain) -> Result<BigUint, ChainError> {
        match chain {
            Chain::Ergo => Ok(ERGO_BASE_NETWORK_FEE.into()),
            Chain::Cardano => Ok(CARDANO_BASE_NETWORK_FEE.into()),
            Chain::Bitcoin => bitcoin::base_network_fee(),
        }
    }

    /// Same as [`Self::base_network_fee`] for a chain name
    pub fn base_network_fee_by_name(chain: &str) -> Result<BigUint, ChainError> {
        Self::base_network_fee(chain.parse()?)
    }

    /// Build the unsigned lock transaction for `request` on `from_chain`.
    ///
    /// `utxos` is pulled lazily and only until the lock is covered. Boxes
    /// belonging to another chain are skipped.
    pub async fn generate_unsigned_bridge_tx<S>(
        &self,
        from_chain: Chain,
        request: &LockRequest,
        utxos: S,
    ) -> Result<UnsignedLockTx, ChainError>
    where
        S: Stream<Item = Utxo> + Unpin + Send,
    {
        validate_target_address(request.to_chain, &request.to_address)?;

        let lock_address = request
            .lock_address
            .as_deref()
            .unwrap_or_else(|| self.config.lock_addresses.for_chain(from_chain));

        let tx = match from_chain {
            Chain::Ergo => {
                let height =
                    resolve_height(&self.heights, Chain::Ergo, request.height.map(u64::from))
                        .await?;
                let height = u32::try_from(height).map_err(|_| {
                    ChainError::invalid_argument(format!("Ergo height {height} out of range"))
                })?;
                let tx = ergo::generate_lock_transaction(
                    request,
                    lock_address,
                    height,
                    only(utxos, pick_ergo),
                )
                .await?;
                UnsignedLockTx::Ergo(tx)
            }
            Chain::Cardano => {
                let tx = cardano::generate_lock_transaction(
                    request,
                    lock_address,
                    &self.config.cardano_params,
                    only(utxos, pick_cardano),
                )
                .await?;
                UnsignedLockTx::Cardano(tx)
            }
            Chain::Bitcoin => bitcoin::generate_lock_transaction(request)?,
        };

        info!(
            from_chain = %from_chain,
            to_chain = %request.to_chain,
            amount = %request.amount,
            "Built unsigned lock transaction"
        );
        Ok(tx)
    }
}
