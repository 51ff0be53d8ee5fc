//! Ergo address utilities

use ergo_lib::ergotree_ir::chain::address::{AddressEncoder, NetworkPrefix};
use ergo_lib::ergotree_ir::serialization::SigmaSerializable;

use rosen_core::Network;

#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("Invalid Ergo address: {0}")]
    InvalidAddress(String),

    #[error("Failed to serialize ErgoTree for {address}: {reason}")]
    Serialization { address: String, reason: String },
}

fn prefixes(network: Option<Network>) -> &'static [NetworkPrefix] {
    match network {
        Some(Network::Mainnet) => &[NetworkPrefix::Mainnet],
        Some(Network::Testnet) => &[NetworkPrefix::Testnet],
        None => &[NetworkPrefix::Mainnet, NetworkPrefix::Testnet],
    }
}

/// Convert an Ergo address (base58) to its ErgoTree hex representation.
///
/// Tries both mainnet and testnet prefixes.
pub fn address_to_ergo_tree(address: &str) -> Result<String, AddressError> {
    address_to_ergo_tree_on(address, None)
}

/// Same as [`address_to_ergo_tree`], restricted to one network when given
pub fn address_to_ergo_tree_on(
    address: &str,
    network: Option<Network>,
) -> Result<String, AddressError> {
    for prefix in prefixes(network) {
        let encoder = AddressEncoder::new(*prefix);
        let Ok(addr) = encoder.parse_address_from_str(address) else {
            continue;
        };

        let tree = addr.script().map_err(|e| AddressError::Serialization {
            address: address.to_string(),
            reason: format!("{e:?}"),
        })?;
        let bytes = tree
            .sigma_serialize_bytes()
            .map_err(|e| AddressError::Serialization {
                address: address.to_string(),
                reason: format!("{e:?}"),
            })?;
        return Ok(hex::encode(bytes));
    }

    Err(AddressError::InvalidAddress(address.to_string()))
}

/// True when `address` parses as an Ergo address on `network` (or either network)
pub fn is_valid_address(address: &str, network: Option<Network>) -> bool {
    prefixes(network).iter().any(|prefix| {
        AddressEncoder::new(*prefix)
            .parse_address_from_str(address)
            .is_ok()
    })
}
