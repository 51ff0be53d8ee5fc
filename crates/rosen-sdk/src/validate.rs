//! Destination address checks run before a lock is built

use rosen_core::{Chain, ChainError};

fn invalid(address: &str, reason: impl Into<String>) -> ChainError {
    ChainError::InvalidAddress {
        address: address.to_string(),
        reason: reason.into(),
    }
}

/// Validate a destination address for `chain`.
///
/// Ergo and Cardano addresses are fully decoded; Bitcoin gets prefix and
/// length checks only.
pub fn validate_target_address(chain: Chain, address: &str) -> Result<(), ChainError> {
    if address.is_empty() {
        return Err(invalid(address, "Address cannot be empty"));
    }

    match chain {
        Chain::Ergo => {
            if !ergo_tx::address::is_valid_address(address, None) {
                return Err(invalid(address, "Not a valid Ergo address"));
            }
        }
        Chain::Cardano => {
            if !address.starts_with("addr1") {
                return Err(invalid(address, "Cardano address must start with 'addr1'"));
            }
            cardano_tx::address::address_bytes(address)?;
        }
        Chain::Bitcoin => {
            if !address.starts_with("bc1q") {
                return Err(invalid(
                    address,
                    "Bitcoin address must start with 'bc1q' (SegWit bech32)",
                ));
            }
            if address.len() < 40 || address.len() > 62 {
                return Err(invalid(address, "Invalid Bitcoin address length"));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardano_valid() {
        let addr = "addr1qydwtxthz2nmgjl4cuajhdjfwggdr4kajcwnksxqtsad42psz7up3krtt688fcwzj4le8k7dp5hnsur300h5af9h3fcs2fm358";
        assert!(validate_target_address(Chain::Cardano, addr).is_ok());
    }

    #[test]
    fn test_cardano_invalid() {
        assert!(validate_target_address(Chain::Cardano, "stake1u8test").is_err());
        // right prefix, broken checksum
        assert!(validate_target_address(
            Chain::Cardano,
            "addr1v8kqhz5lkdxqm8qtkn4lgd9f4890v0j6advjfmk5k9amu4c535lsa"
        )
        .is_err());
    }

    #[test]
    fn test_ergo() {
        assert!(validate_target_address(
            Chain::Ergo,
            "9hY16vzHmmfyVBwKeFGHvb2bMFsG94A1u7To1QWtUokACyFVENQ"
        )
        .is_ok());
        assert!(validate_target_address(Chain::Ergo, "9notAnAddress").is_err());
    }

    #[test]
    fn test_bitcoin() {
        assert!(validate_target_address(
            Chain::Bitcoin,
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
        )
        .is_ok());
        assert!(validate_target_address(Chain::Bitcoin, "1A1zP1test").is_err());
    }

    #[test]
    fn test_empty_address() {
        let err = validate_target_address(Chain::Cardano, "").unwrap_err();
        assert_eq!(err.error_code(), "invalid_argument");
    }
}
