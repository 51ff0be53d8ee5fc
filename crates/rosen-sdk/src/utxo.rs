//! UTXOs from either source chain
//!
//! Wallets and explorers hand over boxes as loose JSON. The shape is checked
//! by the presence of each chain's required fields before decoding.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use cardano_tx::CardanoUtxo;
use ergo_tx::Eip12InputBox;
use rosen_core::{AssetBalance, BalanceError, ChainError, UtxoInfo};

const CARDANO_FIELDS: &[&str] = &["txId", "index", "address", "value", "assets"];

const ERGO_FIELDS: &[&str] = &[
    "boxId",
    "transactionId",
    "value",
    "ergoTree",
    "assets",
    "creationHeight",
    "additionalRegisters",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Utxo {
    Ergo(Eip12InputBox),
    Cardano(CardanoUtxo),
}

fn has_fields(value: &Value, fields: &[&str]) -> bool {
    fields
        .iter()
        .all(|f| value.get(f).is_some_and(|v| !v.is_null()))
}

impl Utxo {
    /// Decode a box, choosing the chain by which required fields are present
    pub fn from_json(value: &Value) -> Result<Self, ChainError> {
        let decode_err =
            |e: serde_json::Error| ChainError::invalid_argument(format!("Malformed UTXO: {e}"));

        if has_fields(value, CARDANO_FIELDS) {
            CardanoUtxo::deserialize(value).map(Utxo::Cardano).map_err(decode_err)
        } else if has_fields(value, ERGO_FIELDS) {
            Eip12InputBox::deserialize(value).map(Utxo::Ergo).map_err(decode_err)
        } else {
            Err(ChainError::invalid_argument(
                "Expect ErgoBoxProxy or CardanoUtxo only",
            ))
        }
    }
}

impl UtxoInfo for Utxo {
    fn utxo_id(&self) -> String {
        match self {
            Utxo::Ergo(b) => b.utxo_id(),
            Utxo::Cardano(u) => u.utxo_id(),
        }
    }

    fn asset_balance(&self) -> Result<AssetBalance, BalanceError> {
        match self {
            Utxo::Ergo(b) => b.asset_balance(),
            Utxo::Cardano(u) => u.asset_balance(),
        }
    }
}

impl From<Eip12InputBox> for Utxo {
    fn from(b: Eip12InputBox) -> Self {
        Utxo::Ergo(b)
    }
}

impl From<CardanoUtxo> for Utxo {
    fn from(u: CardanoUtxo) -> Self {
        Utxo::Cardano(u)
    }
}

/// Asset balance of a JSON box from either chain
pub fn asset_balance_from_json(value: &Value) -> Result<AssetBalance, ChainError> {
    Ok(Utxo::from_json(value)?.asset_balance()?)
}

/// Id and assets of an Ergo box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxInfo {
    pub id: String,
    pub assets: AssetBalance,
}

pub fn box_info(value: &Value) -> Result<BoxInfo, ChainError> {
    if !has_fields(value, ERGO_FIELDS) {
        return Err(ChainError::invalid_argument("Box is not an ErgoBoxProxy type"));
    }
    let ergo_box = Eip12InputBox::deserialize(value)
        .map_err(|e| ChainError::invalid_argument(format!("Malformed Ergo box: {e}")))?;

    Ok(BoxInfo {
        id: ergo_box.box_id.clone(),
        assets: ergo_box.asset_balance()?,
    })
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use serde_json::json;

    use super::*;

    fn ergo_box() -> Value {
        json!({
            "boxId": "b0",
            "transactionId": "t0",
            "index": 0,
            "value": "2000000",
            "ergoTree": "0008cd03",
            "assets": [{ "tokenId": "tok", "amount": "15" }],
            "creationHeight": 1000,
            "additionalRegisters": {}
        })
    }

    fn cardano_utxo() -> Value {
        json!({
            "txId": "e1227af0cd22abecd5c6439bc5d558bfae7643af7d300f2fe95cff723138dc52",
            "index": 1,
            "address": "addr1q8hmp5zjzvv7s7pmgemz3mvrkd2nu7609hwgsqa0auf6h7h3r6x6jn2zrt8xs3enc53f4aqks7v5g5t254fu2n8sz2wsla293a",
            "value": 183845802u64,
            "assets": [{
                "policyId": "3122541486c983d637e7ed9330c94e490e1fe4a1758725fab7f6d9e0",
                "assetName": "72734254432d6c6f656e",
                "quantity": "100"
            }]
        })
    }

    #[test]
    fn test_ergo_balance() {
        let balance = asset_balance_from_json(&ergo_box()).unwrap();
        assert_eq!(balance.native_token, BigUint::from(2_000_000u64));
        assert_eq!(balance.token_amount("tok"), BigUint::from(15u64));
    }

    #[test]
    fn test_cardano_balance_uses_composite_ids() {
        let balance = asset_balance_from_json(&cardano_utxo()).unwrap();
        assert_eq!(balance.native_token, BigUint::from(183_845_802u64));
        assert_eq!(
            balance.token_amount(
                "3122541486c983d637e7ed9330c94e490e1fe4a1758725fab7f6d9e0.72734254432d6c6f656e"
            ),
            BigUint::from(100u64)
        );
    }

    #[test]
    fn test_unknown_shape_rejected() {
        let err = asset_balance_from_json(&json!({ "value": 1 })).unwrap_err();
        assert_eq!(err.error_code(), "invalid_argument");

        let mut partial = ergo_box();
        partial.as_object_mut().unwrap().remove("ergoTree");
        assert!(asset_balance_from_json(&partial).is_err());
    }

    #[test]
    fn test_box_info() {
        let info = box_info(&ergo_box()).unwrap();
        assert_eq!(info.id, "b0");
        assert_eq!(info.assets.tokens.len(), 1);

        assert!(box_info(&cardano_utxo()).is_err());
    }

    #[test]
    fn test_utxo_ids() {
        let ergo = Utxo::from_json(&ergo_box()).unwrap();
        assert!(matches!(ergo, Utxo::Ergo(_)));
        assert_eq!(ergo.utxo_id(), "b0");

        let cardano = Utxo::from_json(&cardano_utxo()).unwrap();
        assert_eq!(
            cardano.utxo_id(),
            "e1227af0cd22abecd5c6439bc5d558bfae7643af7d300f2fe95cff723138dc52.1"
        );
    }
}
