//! Token mapping between bridged chains
//!
//! Parsed from the Rosen `tokensMap` JSON: a list of entries, each mapping a
//! chain name to that chain's view of one bridged asset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rosen_core::TokenError;

use crate::constants::NATIVE_TOKEN_TYPE;

/// Classification of a token on one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Token standard, or `native` for the chain's own coin
    #[serde(rename = "type")]
    pub token_type: String,
    /// `native` or `wrapped`
    pub residency: String,
}

/// A token as seen on one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosenChainToken {
    #[serde(alias = "tokenID")]
    pub token_id: String,
    pub name: String,
    pub decimals: u32,
    #[serde(rename = "metaData")]
    pub metadata: TokenMetadata,
    /// Cardano only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<String>,
    /// Cardano only, hex encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_name: Option<String>,
}

impl RosenChainToken {
    /// True for the chain's own coin (ERG, ADA, BTC)
    pub fn is_native(&self) -> bool {
        self.metadata.token_type == NATIVE_TOKEN_TYPE
    }
}

/// One bridged asset: chain name -> token on that chain
pub type TokenEntry = BTreeMap<String, RosenChainToken>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenMap {
    pub tokens: Vec<TokenEntry>,
}

impl TokenMap {
    pub fn new(tokens: Vec<TokenEntry>) -> Self {
        Self { tokens }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Entries present on `chain`, optionally narrowed to one token id there
    pub fn search(&self, chain: &str, token_id: Option<&str>) -> Vec<&TokenEntry> {
        self.tokens
            .iter()
            .filter(|entry| match (entry.get(chain), token_id) {
                (Some(token), Some(id)) => token.token_id == id,
                (Some(_), None) => true,
                (None, _) => false,
            })
            .collect()
    }

    /// Id of `entry` on `chain`
    pub fn get_id<'a>(entry: &'a TokenEntry, chain: &str) -> Result<&'a str, TokenError> {
        entry
            .get(chain)
            .map(|token| token.token_id.as_str())
            .ok_or_else(|| TokenError::ChainNotSupported {
                chain: chain.to_string(),
            })
    }

    /// First entry for `token_id` on `chain`
    pub fn find(&self, chain: &str, token_id: &str) -> Result<&TokenEntry, TokenError> {
        self.search(chain, Some(token_id))
            .into_iter()
            .next()
            .ok_or_else(|| TokenError::TokenNotFound {
                chain: chain.to_string(),
                token_id: token_id.to_string(),
            })
    }

    /// Every chain named by at least one entry, sorted
    pub fn supported_chains(&self) -> Vec<String> {
        let mut chains: Vec<String> = self
            .tokens
            .iter()
            .flat_map(|entry| entry.keys().cloned())
            .collect();
        chains.sort();
        chains.dedup();
        chains
    }
}
