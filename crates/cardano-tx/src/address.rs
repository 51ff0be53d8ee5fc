//! Cardano address decoding

use bech32::Hrp;

use crate::error::CardanoTxError;

const MAINNET_HRP: &str = "addr";
const TESTNET_HRP: &str = "addr_test";

fn invalid(address: &str, reason: impl Into<String>) -> CardanoTxError {
    CardanoTxError::InvalidAddress {
        address: address.to_string(),
        reason: reason.into(),
    }
}

/// Decode a Shelley bech32 address (`addr1...`/`addr_test1...`) to its raw
/// bytes as they appear in transaction outputs
pub fn address_bytes(address: &str) -> Result<Vec<u8>, CardanoTxError> {
    let (hrp, data) = bech32::decode(address).map_err(|e| invalid(address, e.to_string()))?;

    if hrp != Hrp::parse_unchecked(MAINNET_HRP) && hrp != Hrp::parse_unchecked(TESTNET_HRP) {
        return Err(invalid(address, format!("unexpected prefix '{hrp}'")));
    }

    // header byte plus at least one 28-byte credential
    if data.len() < 29 {
        return Err(invalid(address, format!("payload too short ({} bytes)", data.len())));
    }

    Ok(data)
}

/// Payment credential of a Shelley address (28 bytes after the header)
pub fn payment_credential(address_bytes: &[u8]) -> Option<&[u8]> {
    address_bytes.get(1..29)
}
