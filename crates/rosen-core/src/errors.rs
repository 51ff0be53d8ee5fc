//! Error types for the Rosen SDK

use thiserror::Error;

/// Boxed cause kept by the fee entry points for diagnostics
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync>;

/// Top-level errors returned by the SDK
#[derive(Debug, Error)]
pub enum Error {
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Fee error: {0}")]
    Fee(#[from] FeeError),

    #[error("Balance error: {0}")]
    Balance(#[from] BalanceError),

    #[error("Math error: {0}")]
    Math(#[from] MathError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Chain dispatch and transaction assembly errors
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Chain not supported: {chain}")]
    ChainNotSupported { chain: String },

    #[error("{operation} is not implemented for {chain}")]
    NotImplemented {
        chain: String,
        operation: &'static str,
    },

    #[error("Insufficient assets: {message}")]
    InsufficientAssets { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Amount {value} does not fit the ledger's value type")]
    AmountOverflow { value: String },

    #[error("Transaction size {size} exceeds maximum {max}")]
    TransactionTooLarge { size: usize, max: usize },

    #[error(transparent)]
    Balance(#[from] BalanceError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Token identity lookups
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token {token_id} not found on {chain}")]
    TokenNotFound { chain: String, token_id: String },

    #[error("Token is not supported on chain {chain}")]
    ChainNotSupported { chain: String },
}

/// Fee protocol failures. Each public fee operation reports one of these and
/// keeps the underlying error as its `source`.
#[derive(Debug, Error)]
pub enum FeeError {
    #[error("Failed to retrieve fee: {message}")]
    FeeRetrievalFailure { message: String, source: BoxedCause },

    #[error("Failed to convert fee: {message}")]
    FeeConversionFailure { message: String, source: BoxedCause },
}

/// Balance arithmetic errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("Cannot reduce native token: [{available}] is less than [{required} + {minimum}]")]
    InsufficientNativeBalance {
        available: String,
        required: String,
        minimum: String,
    },

    #[error("Cannot reduce token [{token_id}]: Token not found")]
    TokenNotFound { token_id: String },

    #[error("Cannot reduce token [{token_id}]: [{available}] is less than [{required}]")]
    InsufficientTokenBalance {
        token_id: String,
        available: String,
        required: String,
    },

    #[error("Invalid amount: {value}")]
    InvalidAmount { value: String },

    #[error("Invalid input: The value has {places} decimal places, but only {allowed} are allowed. Please enter a value with {allowed} decimal places.")]
    TooManyDecimalPlaces { places: usize, allowed: usize },
}

/// Integer math errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("Division by zero")]
    DivisionByZero,
}

/// Errors from external network collaborators (height, explorers)
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Network unreachable at {url}")]
    Unreachable { url: String },

    #[error("Network returned error: {message}")]
    ApiError { message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Chain(e) => e.error_code(),
            Self::Token(e) => e.error_code(),
            Self::Fee(e) => e.error_code(),
            Self::Balance(_) => "balance_error",
            Self::Math(_) => "math_error",
            Self::Network(_) => "network_error",
            Self::Config(_) => "config_error",
        }
    }
}

impl ChainError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ChainNotSupported { .. } => "chain_not_supported",
            Self::NotImplemented { .. } => "not_implemented",
            Self::InsufficientAssets { .. } => "insufficient_assets",
            Self::InvalidArgument { .. }
            | Self::InvalidAddress { .. }
            | Self::AmountOverflow { .. } => "invalid_argument",
            Self::TransactionTooLarge { .. } => "transaction_too_large",
            Self::Balance(_) => "balance_error",
            Self::Network(_) => "network_error",
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

impl TokenError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TokenNotFound { .. } => "token_not_found",
            Self::ChainNotSupported { .. } => "chain_not_supported",
        }
    }
}

impl FeeError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FeeRetrievalFailure { .. } => "fee_retrieval_failure",
            Self::FeeConversionFailure { .. } => "fee_conversion_failure",
        }
    }

    pub fn retrieval(message: impl Into<String>, source: impl Into<BoxedCause>) -> Self {
        Self::FeeRetrievalFailure {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn conversion(message: impl Into<String>, source: impl Into<BoxedCause>) -> Self {
        Self::FeeConversionFailure {
            message: message.into(),
            source: source.into(),
        }
    }
}
