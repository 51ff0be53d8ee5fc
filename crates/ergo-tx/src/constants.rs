//! Ergo protocol constants

/// Standard transaction fee (0.0011 ERG)
pub const TX_FEE: u64 = 1_100_000;

/// Minimum box value (0.001 ERG)
pub const MIN_BOX_VALUE: u64 = 1_000_000;

/// Miner fee ErgoTree (standard P2PK to miner)
pub const MINER_FEE_ERGO_TREE: &str = "1005040004000e36100204a00b08cd0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798ea02d192a39a8cc7a701730073011001020402d19683030193a38cc7b2a57300000193c2b2a57301007473027303830108cdeeac93b1a57304";
