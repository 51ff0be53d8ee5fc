//! Explorer links for submitted transactions

use rosen_core::Chain;

use crate::constants::{CARDANO_BASE_TX_URL, ERGO_BASE_TX_URL};

/// Explorer URL prefix for transaction ids on `chain`; empty when the chain
/// has no explorer configured
pub fn base_tx_url(chain: Chain) -> &'static str {
    match chain {
        Chain::Ergo => ERGO_BASE_TX_URL,
        Chain::Cardano => CARDANO_BASE_TX_URL,
        Chain::Bitcoin => "",
    }
}

/// Full explorer link for `tx_id`
pub fn tx_url(chain: Chain, tx_id: &str) -> Option<String> {
    let base = base_tx_url(chain);
    (!base.is_empty()).then(|| format!("{base}{tx_id}"))
}
