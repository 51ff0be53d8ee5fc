//! Network configuration shared by the chain crates

use serde::{Deserialize, Serialize};

/// Network the addresses and contracts belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

/// Explorer endpoints used by callers that resolve boxes and heights
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    #[serde(default)]
    pub network: Network,

    #[serde(default = "default_cardano_koios_url")]
    pub cardano_koios_url: String,

    #[serde(default = "default_ergo_explorer_url")]
    pub ergo_explorer_url: String,

    #[serde(default = "default_bitcoin_esplora_url")]
    pub bitcoin_esplora_url: String,
}

fn default_cardano_koios_url() -> String {
    "https://api.koios.rest/api/v1".to_string()
}

fn default_ergo_explorer_url() -> String {
    "https://api.ergoplatform.com/".to_string()
}

fn default_bitcoin_esplora_url() -> String {
    "https://blockstream.info/".to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            cardano_koios_url: default_cardano_koios_url(),
            ergo_explorer_url: default_ergo_explorer_url(),
            bitcoin_esplora_url: default_bitcoin_esplora_url(),
        }
    }
}
