//! EIP-12 Transaction Structures
//!
//! Defines the JSON structure expected by EIP-12 wallets for signing.
//! Reference: EIP-12 dApp Connector specification

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use rosen_core::balance;
use rosen_core::{parse_amount, AssetBalance, BalanceError, TokenInfo, UtxoInfo};

use crate::constants::MINER_FEE_ERGO_TREE;

/// EIP-12 token/asset in a box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip12Asset {
    pub token_id: String,
    pub amount: String,
}

impl Eip12Asset {
    pub fn new(token_id: impl Into<String>, amount: impl fmt::Display) -> Self {
        Self {
            token_id: token_id.into(),
            amount: amount.to_string(),
        }
    }
}

/// EIP-12 input box - FULL box data required for wallet to sign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip12InputBox {
    pub box_id: String,
    /// Transaction ID where this box was created
    pub transaction_id: String,
    /// Output index in that transaction
    pub index: u16,
    pub value: String,
    pub ergo_tree: String,
    pub assets: Vec<Eip12Asset>,
    pub creation_height: u32,
    pub additional_registers: HashMap<String, String>,
    /// Context extension - always present for signing, can be empty
    #[serde(default)]
    pub extension: HashMap<String, String>,
}

impl UtxoInfo for Eip12InputBox {
    fn utxo_id(&self) -> String {
        self.box_id.clone()
    }

    fn asset_balance(&self) -> Result<AssetBalance, BalanceError> {
        let native = AssetBalance::native(parse_amount(&self.value)?);
        self.assets.iter().try_fold(native, |acc, asset| {
            let token = TokenInfo::new(asset.token_id.clone(), parse_amount(&asset.amount)?);
            Ok(balance::sum(&acc, &AssetBalance::new(0u64, vec![token])))
        })
    }
}

/// EIP-12 data input reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip12DataInput {
    pub box_id: String,
}

/// EIP-12 output box candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip12Output {
    pub value: String,
    pub ergo_tree: String,
    pub assets: Vec<Eip12Asset>,
    pub creation_height: u32,
    pub additional_registers: HashMap<String, String>,
}

impl Eip12Output {
    /// Output holding every asset of `balance`
    pub fn from_balance(balance: &AssetBalance, ergo_tree: impl Into<String>, height: u32) -> Self {
        Self {
            value: balance.native_token.to_string(),
            ergo_tree: ergo_tree.into(),
            assets: balance
                .tokens
                .iter()
                .map(|t| Eip12Asset::new(t.id.clone(), &t.value))
                .collect(),
            creation_height: height,
            additional_registers: HashMap::new(),
        }
    }

    /// Create a fee output to the miner
    pub fn fee(value: u64, height: u32) -> Self {
        Self::from_balance(&AssetBalance::native(value), MINER_FEE_ERGO_TREE, height)
    }

    /// Attach a serialized register value (e.g. `"R4"`)
    pub fn with_register(mut self, register: &str, value_hex: impl Into<String>) -> Self {
        self.additional_registers
            .insert(register.to_string(), value_hex.into());
        self
    }
}

/// Complete EIP-12 unsigned transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip12UnsignedTx {
    pub inputs: Vec<Eip12InputBox>,
    pub data_inputs: Vec<Eip12DataInput>,
    pub outputs: Vec<Eip12Output>,
}

impl Eip12UnsignedTx {
    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
