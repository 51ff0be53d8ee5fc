//! Transaction outputs and the minimum-ADA requirement

use std::cmp::Ordering;
use std::collections::BTreeMap;

use num_traits::ToPrimitive;

use rosen_core::AssetBalance;

use crate::address::address_bytes;
use crate::cbor::CborEncoder;
use crate::error::CardanoTxError;

/// Constant overhead the ledger adds to every output when costing UTXO storage
const UTXO_ENTRY_OVERHEAD: u64 = 160;

/// Asset name ordered canonically: shorter names first, then bytewise
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetName(pub Vec<u8>);

impl Ord for AssetName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for AssetName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// policy id bytes -> asset name -> quantity
pub type MultiAsset = BTreeMap<Vec<u8>, BTreeMap<AssetName, u64>>;

/// A transaction output in the legacy `[address, value]` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutput {
    pub address: Vec<u8>,
    pub coin: u64,
    pub multi_asset: MultiAsset,
}

impl TxOutput {
    pub fn encode(&self, enc: &mut CborEncoder) {
        enc.array(2).bytes(&self.address);
        self.encode_value(enc);
    }

    fn encode_value(&self, enc: &mut CborEncoder) {
        if self.multi_asset.is_empty() {
            enc.unsigned(self.coin);
            return;
        }

        enc.array(2).unsigned(self.coin).map(self.multi_asset.len());
        for (policy_id, assets) in &self.multi_asset {
            enc.bytes(policy_id).map(assets.len());
            for (name, quantity) in assets {
                enc.bytes(&name.0).unsigned(*quantity);
            }
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut enc = CborEncoder::new();
        self.encode(&mut enc);
        enc.into_bytes()
    }

    /// Serialized size of the value (coin plus multi-asset), the part the
    /// ledger bounds by `maxValueSize`
    pub fn value_size(&self) -> usize {
        let mut enc = CborEncoder::new();
        self.encode_value(&mut enc);
        enc.len()
    }

    /// Quantity of `policy_id.asset_name` held by this output
    pub fn asset_quantity(&self, policy_id: &[u8], asset_name: &[u8]) -> u64 {
        self.multi_asset
            .get(policy_id)
            .and_then(|assets| assets.get(&AssetName(asset_name.to_vec())))
            .copied()
            .unwrap_or(0)
    }
}

fn required_coin(output: &TxOutput, coins_per_utxo_byte: u64) -> u64 {
    let size = output.to_bytes().len() as u64;
    (size + UTXO_ENTRY_OVERHEAD).saturating_mul(coins_per_utxo_byte)
}

/// Minimum lovelace `output` must hold: `(160 + size) * coinsPerUtxoByte`.
///
/// The size depends on the encoded coin, so the coin is raised until it
/// stops changing.
pub fn min_ada_required(output: &TxOutput, coins_per_utxo_byte: u64) -> u64 {
    let mut sized = output.clone();
    for _ in 0..3 {
        let required = required_coin(&sized, coins_per_utxo_byte);
        if sized.coin < required {
            sized.coin = required;
        } else {
            return required;
        }
    }
    sized.coin = u64::MAX;
    required_coin(&sized, coins_per_utxo_byte)
}

/// Split a `policyId.assetName` id into raw bytes
fn parse_asset_id(id: &str) -> Result<(Vec<u8>, AssetName), CardanoTxError> {
    let (policy_hex, name_hex) = id
        .split_once('.')
        .ok_or_else(|| CardanoTxError::InvalidAssetId(id.to_string()))?;

    let policy_id = hex::decode(policy_hex).map_err(|_| CardanoTxError::InvalidHex {
        field: "policyId",
        value: policy_hex.to_string(),
    })?;
    if policy_id.len() != 28 {
        return Err(CardanoTxError::InvalidAssetId(id.to_string()));
    }
    let name = hex::decode(name_hex).map_err(|_| CardanoTxError::InvalidHex {
        field: "assetName",
        value: name_hex.to_string(),
    })?;
    if name.len() > 32 {
        return Err(CardanoTxError::InvalidAssetId(id.to_string()));
    }

    Ok((policy_id, AssetName(name)))
}

/// Build an output at `address` holding `balance`.
///
/// A zero native amount means "just enough ADA": the coin is set to the
/// output's minimum-ADA requirement.
pub fn build_output(
    balance: &AssetBalance,
    address: &str,
    coins_per_utxo_byte: u64,
) -> Result<TxOutput, CardanoTxError> {
    let mut multi_asset = MultiAsset::new();
    for token in &balance.tokens {
        let (policy_id, name) = parse_asset_id(&token.id)?;
        let quantity = token
            .value
            .to_u64()
            .ok_or_else(|| CardanoTxError::AmountOverflow(token.value.to_string()))?;
        let entry = multi_asset.entry(policy_id).or_default().entry(name).or_default();
        *entry = entry
            .checked_add(quantity)
            .ok_or_else(|| CardanoTxError::AmountOverflow(token.value.to_string()))?;
    }

    let coin = balance
        .native_token
        .to_u64()
        .ok_or_else(|| CardanoTxError::AmountOverflow(balance.native_token.to_string()))?;

    let mut output = TxOutput {
        address: address_bytes(address)?,
        coin,
        multi_asset,
    };
    if coin == 0 {
        output.coin = min_ada_required(&output, coins_per_utxo_byte);
    }
    Ok(output)
}
