//! Core type definitions shared by every chain

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::errors::{BalanceError, ChainError};

/// Chains the SDK can build lock transactions on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ergo,
    Cardano,
    Bitcoin,
}

impl Chain {
    /// Every supported chain, in declaration order
    pub const ALL: [Chain; 3] = [Chain::Ergo, Chain::Cardano, Chain::Bitcoin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ergo => "ergo",
            Self::Cardano => "cardano",
            Self::Bitcoin => "bitcoin",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Chain {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ergo" => Ok(Self::Ergo),
            "cardano" => Ok(Self::Cardano),
            "bitcoin" => Ok(Self::Bitcoin),
            other => Err(ChainError::ChainNotSupported {
                chain: other.to_string(),
            }),
        }
    }
}

/// Amount of a single token, keyed by its chain-specific composite id
/// (`policyId.assetName` on Cardano, bare token id on Ergo)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub id: String,
    pub value: BigUint,
}

impl TokenInfo {
    pub fn new(id: impl Into<String>, value: impl Into<BigUint>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// Native-unit balance plus a list of token balances.
///
/// Holds at most one entry per token id. This is a plain value: the
/// arithmetic in [`crate::balance`] never mutates its arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetBalance {
    pub native_token: BigUint,
    pub tokens: Vec<TokenInfo>,
}

impl AssetBalance {
    pub fn new(native_token: impl Into<BigUint>, tokens: Vec<TokenInfo>) -> Self {
        Self {
            native_token: native_token.into(),
            tokens,
        }
    }

    /// Balance with only a native amount
    pub fn native(native_token: impl Into<BigUint>) -> Self {
        Self::new(native_token, vec![])
    }

    /// Amount held of `token_id`, zero when absent
    pub fn token_amount(&self, token_id: &str) -> BigUint {
        self.tokens
            .iter()
            .find(|t| t.id == token_id)
            .map(|t| t.value.clone())
            .unwrap_or_default()
    }

    /// True when `self` holds at least `other` in every dimension
    pub fn covers(&self, other: &AssetBalance) -> bool {
        self.native_token >= other.native_token
            && other
                .tokens
                .iter()
                .all(|t| self.token_amount(&t.id) >= t.value)
    }
}

/// Common view over chain-specific UTXO representations.
pub trait UtxoInfo {
    /// Unique id of the UTXO (box id on Ergo, `txId.index` on Cardano)
    fn utxo_id(&self) -> String;

    /// Native and token amounts held by the UTXO
    fn asset_balance(&self) -> Result<AssetBalance, BalanceError>;
}

/// Parse a decimal amount string as used by JSON box formats
pub fn parse_amount(value: &str) -> Result<BigUint, BalanceError> {
    value.parse::<BigUint>().map_err(|_| BalanceError::InvalidAmount {
        value: value.to_string(),
    })
}
