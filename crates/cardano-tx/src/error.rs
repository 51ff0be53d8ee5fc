//! Errors from Cardano transaction building

use rosen_core::ChainError;

#[derive(Debug, thiserror::Error)]
pub enum CardanoTxError {
    #[error("Invalid Cardano address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Invalid hex in {field}: {value}")]
    InvalidHex { field: &'static str, value: String },

    #[error("Invalid asset id: {0}")]
    InvalidAssetId(String),

    #[error("Amount {0} does not fit a 64-bit ledger value")]
    AmountOverflow(String),

    #[error("Metadata text is longer than 64 bytes: {0}")]
    MetadataTextTooLong(String),

    #[error("Transaction fee is not set")]
    MissingFee,

    #[error("Transaction size {size} exceeds maximum {max}")]
    TransactionTooLarge { size: usize, max: usize },

    #[error("Output value size {size} exceeds maximum {max}")]
    ValueTooLarge { size: usize, max: usize },

    #[error("Fee arithmetic overflow")]
    FeeOverflow,

    #[error("Transaction fee did not settle on the minimum fee")]
    FeeNotSettled,
}

impl From<CardanoTxError> for ChainError {
    fn from(e: CardanoTxError) -> Self {
        match e {
            CardanoTxError::InvalidAddress { address, reason } => {
                ChainError::InvalidAddress { address, reason }
            }
            CardanoTxError::AmountOverflow(value) => ChainError::AmountOverflow { value },
            CardanoTxError::TransactionTooLarge { size, max } => {
                ChainError::TransactionTooLarge { size, max }
            }
            other => ChainError::invalid_argument(other.to_string()),
        }
    }
}
