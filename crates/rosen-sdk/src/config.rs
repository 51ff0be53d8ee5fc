//! Bridge configuration
//!
//! Defaults are the mainnet contracts. A Rosen contracts release JSON can
//! override the Ergo lock address and the MinFeeNFT.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cardano_tx::CardanoProtocolParams;
use rosen_core::{Chain, Error, NetworkConfig};

use crate::constants::{CARDANO_LOCK_ADDRESS, ERGO_LOCK_ADDRESS, MIN_FEE_NFT_ID};

/// Lock address per source chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockAddresses {
    pub ergo: String,
    pub cardano: String,
    #[serde(default)]
    pub bitcoin: String,
}

impl Default for LockAddresses {
    fn default() -> Self {
        Self {
            ergo: ERGO_LOCK_ADDRESS.to_string(),
            cardano: CARDANO_LOCK_ADDRESS.to_string(),
            bitcoin: String::new(),
        }
    }
}

impl LockAddresses {
    pub fn for_chain(&self, chain: Chain) -> &str {
        match chain {
            Chain::Ergo => &self.ergo,
            Chain::Cardano => &self.cardano,
            Chain::Bitcoin => &self.bitcoin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosenConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub lock_addresses: LockAddresses,
    /// Token id of the NFT marking minimum-fee boxes
    #[serde(default = "default_min_fee_nft")]
    pub min_fee_nft_id: String,
    #[serde(default)]
    pub cardano_params: CardanoProtocolParams,
}

fn default_min_fee_nft() -> String {
    MIN_FEE_NFT_ID.to_string()
}

impl Default for RosenConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            lock_addresses: LockAddresses::default(),
            min_fee_nft_id: default_min_fee_nft(),
            cardano_params: CardanoProtocolParams::default(),
        }
    }
}

/// Contract JSON structure from the release asset
#[derive(Debug, Deserialize)]
struct ContractJson {
    ergo: Option<ErgoSection>,
    tokens: Option<TokensSection>,
}

#[derive(Debug, Deserialize)]
struct ErgoSection {
    addresses: Option<AddressesSection>,
}

#[derive(Debug, Deserialize)]
struct AddressesSection {
    lock: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokensSection {
    #[serde(rename = "MinFeeNFT")]
    min_fee_nft: Option<String>,
}

impl RosenConfig {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Take the lock address and MinFeeNFT from a contracts release JSON.
    ///
    /// Missing sections leave the current values in place.
    pub fn apply_contracts_json(&mut self, json: &str) -> Result<(), Error> {
        let contracts: ContractJson =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;

        match contracts.ergo.and_then(|e| e.addresses).and_then(|a| a.lock) {
            Some(lock) => self.lock_addresses.ergo = lock,
            None => warn!("Missing ergo.addresses.lock in contracts JSON, keeping current"),
        }

        match contracts.tokens.and_then(|t| t.min_fee_nft) {
            Some(nft) => self.min_fee_nft_id = nft,
            None => warn!("Missing tokens.MinFeeNFT in contracts JSON, keeping current"),
        }

        info!(
            lock_address = %self.lock_addresses.ergo,
            min_fee_nft = %self.min_fee_nft_id,
            "Applied Rosen contracts config"
        );
        Ok(())
    }
}
