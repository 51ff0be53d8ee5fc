//! Rosen Bridge protocol constants

/// Minimum value of an Ergo lock box carrying tokens (0.002 ERG)
pub const LOCK_MIN_BOX_VALUE: u64 = 2_000_000;

/// Standard miner fee for Ergo lock transactions (0.0011 ERG)
pub const LOCK_TX_FEE: u64 = ergo_tx::constants::TX_FEE;

/// ADA reserved on top of the lock output for the fee and change output
pub const FEE_AND_MIN_BOX_VALUE: u64 = 2_000_000;

/// Divisor applied to fee ratios stored in the fee box
pub const FEE_RATIO_DIVISOR: u64 = 10_000;

/// Base network fee of a transfer to Ergo, in nanoERG
pub const ERGO_BASE_NETWORK_FEE: u64 = 1_300_000;

/// Base network fee of a transfer to Cardano, in lovelace
pub const CARDANO_BASE_NETWORK_FEE: u64 = 3_400_000;

/// Token id of the NFT marking minimum-fee configuration boxes
pub const MIN_FEE_NFT_ID: &str =
    "405cb1483b46340ee1a111aa42eaaffa53451cab3220fe9deb752a03f2ab0b85";

pub const ERGO_LOCK_ADDRESS: &str = "nB3L2PD3J4rMmyGk7nnNdESpPXxhPRQ4t1chF8LTXtceMQjKCEgL2pFjPY6cehGjyEFZyHEomBTFXZyqfonvxDozrTtK5JzatD8SdmcPeJNWPvdRb5UxEMXE4WQtpAFzt2veT8Z6bmoWN";

pub const CARDANO_LOCK_ADDRESS: &str = "addr1v8kqhz5lkdxqm8qtkn4lgd9f4890v0j6advjfmk5k9amu4c535lsu";

pub const ERGO_BASE_TX_URL: &str = "https://explorer.ergoplatform.com/transactions/";

pub const CARDANO_BASE_TX_URL: &str = "https://cardanoscan.io/transaction/";

/// `metaData.type` of a chain's own coin in the token map
pub const NATIVE_TOKEN_TYPE: &str = "native";

/// Chain whose token ids anchor fee configuration lookups
pub const FEE_ANCHOR_CHAIN: &str = "ergo";
