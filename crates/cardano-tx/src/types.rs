//! Cardano UTXO and protocol parameter types

use serde::{Deserialize, Deserializer, Serialize};

use rosen_core::{AssetBalance, BalanceError, TokenInfo, UtxoInfo};

/// Policy id used for ADA itself
pub const ADA_POLICY_ID: &str = "";

/// Explorers report quantities either as JSON numbers or decimal strings
fn de_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(u64),
        Str(String),
    }

    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Native asset held by a UTXO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardanoAsset {
    pub policy_id: String,
    pub asset_name: String,
    #[serde(deserialize_with = "de_u64")]
    pub quantity: u64,
}

impl CardanoAsset {
    /// Composite `policyId.assetName` id
    pub fn unit(&self) -> String {
        format!("{}.{}", self.policy_id, self.asset_name)
    }
}

/// Unspent Cardano output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardanoUtxo {
    pub tx_id: String,
    pub index: u32,
    /// Bech32 address holding the output
    pub address: String,
    /// Lovelace
    #[serde(deserialize_with = "de_u64")]
    pub value: u64,
    #[serde(default)]
    pub assets: Vec<CardanoAsset>,
}

impl UtxoInfo for CardanoUtxo {
    fn utxo_id(&self) -> String {
        format!("{}.{}", self.tx_id, self.index)
    }

    fn asset_balance(&self) -> Result<AssetBalance, BalanceError> {
        let native = AssetBalance::native(self.value);
        Ok(self.assets.iter().fold(native, |acc, asset| {
            let token = AssetBalance::new(0u64, vec![TokenInfo::new(asset.unit(), asset.quantity)]);
            rosen_core::balance::sum(&acc, &token)
        }))
    }
}

/// Protocol parameters needed to size and fee a transaction.
///
/// Lock transactions carry no certificates, so deposits are not kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardanoProtocolParams {
    #[serde(deserialize_with = "de_u64")]
    pub min_fee_a: u64,
    #[serde(deserialize_with = "de_u64")]
    pub min_fee_b: u64,
    #[serde(alias = "max_val_size", deserialize_with = "de_u64")]
    pub max_value_size: u64,
    #[serde(deserialize_with = "de_u64")]
    pub max_tx_size: u64,
    #[serde(deserialize_with = "de_u64")]
    pub coins_per_utxo_size: u64,
}

impl Default for CardanoProtocolParams {
    /// Mainnet parameters
    fn default() -> Self {
        Self {
            min_fee_a: 44,
            min_fee_b: 155_381,
            max_value_size: 5000,
            max_tx_size: 16384,
            coins_per_utxo_size: 4310,
        }
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::*;

    #[test]
    fn test_utxo_from_json() {
        let json = r#"{
            "txId": "e1227af0cd22abecd5c6439bc5d558bfae7643af7d300f2fe95cff723138dc52",
            "index": 1,
            "address": "addr1q8hmp5zjzvv7s7pmgemz3mvrkd2nu7609hwgsqa0auf6h7h3r6x6jn2zrt8xs3enc53f4aqks7v5g5t254fu2n8sz2wsla293a",
            "value": "183845802",
            "assets": [
                {
                    "policyId": "3122541486c983d637e7ed9330c94e490e1fe4a1758725fab7f6d9e0",
                    "assetName": "72734254432d6c6f656e",
                    "quantity": 5000
                }
            ]
        }"#;
        let utxo: CardanoUtxo = serde_json::from_str(json).unwrap();

        assert_eq!(
            utxo.utxo_id(),
            "e1227af0cd22abecd5c6439bc5d558bfae7643af7d300f2fe95cff723138dc52.1"
        );

        let balance = utxo.asset_balance().unwrap();
        assert_eq!(balance.native_token, BigUint::from(183_845_802u64));
        assert_eq!(
            balance.token_amount(
                "3122541486c983d637e7ed9330c94e490e1fe4a1758725fab7f6d9e0.72734254432d6c6f656e"
            ),
            BigUint::from(5000u64)
        );
    }

    #[test]
    fn test_protocol_params_from_koios() {
        let json = r#"{
            "min_fee_a": 44,
            "min_fee_b": 155381,
            "pool_deposit": "500000000",
            "key_deposit": "2000000",
            "max_val_size": 5000,
            "max_tx_size": 16384,
            "coins_per_utxo_size": "4310"
        }"#;
        // deposit fields are accepted and ignored
        let params: CardanoProtocolParams = serde_json::from_str(json).unwrap();
        assert_eq!(params, CardanoProtocolParams::default());
    }
}
