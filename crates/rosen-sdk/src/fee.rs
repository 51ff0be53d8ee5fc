//! Minimum-fee configuration
//!
//! The bridge stores fee configuration in "minimum fee" boxes on Ergo, one
//! per bridged token, each marked by the MinFeeNFT. Registers hold a list of
//! schedules indexed `[schedule][chain]`:
//! - R4: `Coll[Coll[SByte]]` -- chain names
//! - R5: `Coll[Coll[SInt]]` (or `SLong`) -- activation height per source chain
//! - R6: `Coll[Coll[SLong]]` -- bridge fees per target chain
//! - R7: `Coll[Coll[SLong]]` -- network fees per target chain
//! - R8: `Coll[Coll[Coll[SLong]]]` -- RSN ratio `[ratio, divisor]` pairs
//! - R9: `Coll[Coll[SLong]]` -- fee ratios (divisor 10000)
//!
//! A negative height means the chain is not active in that schedule, and a
//! negative bridge fee means the target chain is not configured.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use ergo_tx::sigma::{
    parse_coll_coll_byte, parse_coll_coll_coll_long, parse_coll_coll_long, RegisterError,
};

use crate::constants::FEE_RATIO_DIVISOR;

/// Errors from fee configuration lookup and parsing
#[derive(Debug, thiserror::Error)]
pub enum FeeConfigError {
    #[error("No minimum fee box found for token {token_id}")]
    NoFeeBox { token_id: String },

    #[error("Failed to parse register {register}: {reason}")]
    RegisterParse { register: String, reason: String },

    #[error("No fee configuration for chain [{chain}] at height [{height}]")]
    NoFeeForHeight { chain: String, height: u64 },

    #[error("Chain [{chain}] is not configured in the fee box")]
    ChainNotConfigured { chain: String },

    #[error("Fee provider error: {0}")]
    Provider(String),
}

/// Effective fee parameters for one transfer direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainMinimumFee {
    pub bridge_fee: BigInt,
    pub network_fee: BigInt,
    pub fee_ratio: BigInt,
    pub fee_ratio_divisor: BigInt,
    pub rsn_ratio: BigInt,
    pub rsn_ratio_divisor: BigInt,
}

/// Configured fees for one target chain in one schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainFee {
    pub bridge_fee: BigInt,
    pub network_fee: BigInt,
    pub fee_ratio: BigInt,
    pub rsn_ratio: BigInt,
    pub rsn_ratio_divisor: BigInt,
}

/// Fees that take effect once each source chain reaches its height
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// source chain -> activation height
    pub heights: BTreeMap<String, u64>,
    /// target chain -> fees
    pub configs: BTreeMap<String, ChainFee>,
}

/// Every schedule of one token's fee box, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimumFeeConfig {
    pub token_id: String,
    pub schedules: Vec<FeeSchedule>,
}

fn register<'a>(
    registers: &'a HashMap<String, String>,
    id: &str,
) -> Result<&'a str, FeeConfigError> {
    registers
        .get(id)
        .map(String::as_str)
        .ok_or_else(|| FeeConfigError::RegisterParse {
            register: id.to_string(),
            reason: "Register is empty".to_string(),
        })
}

fn parse_err(id: &str) -> impl Fn(RegisterError) -> FeeConfigError + '_ {
    move |e| FeeConfigError::RegisterParse {
        register: id.to_string(),
        reason: e.to_string(),
    }
}

/// Value at `[schedule][chain]`, failing on a ragged register
fn cell<'a, T>(rows: &'a [Vec<T>], id: &str, i: usize, j: usize) -> Result<&'a T, FeeConfigError> {
    rows.get(i)
        .and_then(|row| row.get(j))
        .ok_or_else(|| FeeConfigError::RegisterParse {
            register: id.to_string(),
            reason: format!("missing entry [{i}][{j}]"),
        })
}

impl MinimumFeeConfig {
    /// Decode a fee box from its serialized R4-R9 register values
    pub fn from_box_registers(
        token_id: impl Into<String>,
        registers: &HashMap<String, String>,
    ) -> Result<Self, FeeConfigError> {
        let chains = parse_coll_coll_byte(register(registers, "R4")?)
            .map_err(parse_err("R4"))?
            .into_iter()
            .map(|bytes| {
                String::from_utf8(bytes).map_err(|e| FeeConfigError::RegisterParse {
                    register: "R4".to_string(),
                    reason: format!("Invalid UTF-8 in chain name: {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let heights =
            parse_coll_coll_long(register(registers, "R5")?).map_err(parse_err("R5"))?;
        let bridge_fees =
            parse_coll_coll_long(register(registers, "R6")?).map_err(parse_err("R6"))?;
        let network_fees =
            parse_coll_coll_long(register(registers, "R7")?).map_err(parse_err("R7"))?;
        let rsn_ratios = parse_coll_coll_coll_long(register(registers, "R8")?)
            .map_err(parse_err("R8"))?;
        let fee_ratios =
            parse_coll_coll_long(register(registers, "R9")?).map_err(parse_err("R9"))?;

        let mut schedules = Vec::with_capacity(heights.len());
        for i in 0..heights.len() {
            let mut schedule = FeeSchedule::default();

            for (j, chain) in chains.iter().enumerate() {
                let height = *cell(&heights, "R5", i, j)?;
                if let Ok(height) = u64::try_from(height) {
                    schedule.heights.insert(chain.clone(), height);
                }

                let bridge_fee = *cell(&bridge_fees, "R6", i, j)?;
                if bridge_fee < 0 {
                    continue;
                }
                let ratio = cell(&rsn_ratios, "R8", i, j)?;
                let (rsn_ratio, rsn_ratio_divisor) = match ratio.as_slice() {
                    [ratio, divisor] => (*ratio, *divisor),
                    _ => {
                        return Err(FeeConfigError::RegisterParse {
                            register: "R8".to_string(),
                            reason: format!("expected [ratio, divisor] at [{i}][{j}]"),
                        })
                    }
                };

                schedule.configs.insert(
                    chain.clone(),
                    ChainFee {
                        bridge_fee: bridge_fee.into(),
                        network_fee: (*cell(&network_fees, "R7", i, j)?).into(),
                        fee_ratio: (*cell(&fee_ratios, "R9", i, j)?).into(),
                        rsn_ratio: rsn_ratio.into(),
                        rsn_ratio_divisor: rsn_ratio_divisor.into(),
                    },
                );
            }

            schedules.push(schedule);
        }

        let token_id = token_id.into();
        debug!(token_id = %token_id, schedules = schedules.len(), "Parsed minimum fee box");
        Ok(Self {
            token_id,
            schedules,
        })
    }

    /// Fees for a transfer from `from_chain` at `height` to `to_chain`.
    ///
    /// The effective schedule is the last one already active on `from_chain`.
    pub fn get_fee(
        &self,
        from_chain: &str,
        height: u64,
        to_chain: &str,
    ) -> Result<ChainMinimumFee, FeeConfigError> {
        let index = self
            .schedules
            .iter()
            .rposition(|s| s.heights.get(from_chain).is_some_and(|&h| h <= height))
            .ok_or_else(|| FeeConfigError::NoFeeForHeight {
                chain: from_chain.to_string(),
                height,
            })?;

        let fee = self.schedules[index].configs.get(to_chain).ok_or_else(|| {
            FeeConfigError::ChainNotConfigured {
                chain: to_chain.to_string(),
            }
        })?;

        Ok(ChainMinimumFee {
            bridge_fee: fee.bridge_fee.clone(),
            network_fee: fee.network_fee.clone(),
            fee_ratio: fee.fee_ratio.clone(),
            fee_ratio_divisor: BigInt::from(FEE_RATIO_DIVISOR),
            rsn_ratio: fee.rsn_ratio.clone(),
            rsn_ratio_divisor: fee.rsn_ratio_divisor.clone(),
        })
    }
}

/// Source of minimum-fee configuration, typically an explorer lookup of the
/// box holding both `minimum_fee_nft` and the token
#[async_trait]
pub trait FeeConfigProvider: Send + Sync {
    async fn fetch_fee_config(
        &self,
        token_id: &str,
        minimum_fee_nft: &str,
    ) -> Result<MinimumFeeConfig, FeeConfigError>;
}

#[cfg(test)]
mod tests {
    use ergo_tx::sigma::{
        encode_sigma_coll_coll_byte, encode_sigma_coll_coll_coll_long, encode_sigma_coll_coll_int,
        encode_sigma_coll_coll_long,
    };

    use super::*;

    /// Two schedules over [ergo, cardano]; cardano only joins the second
    fn registers() -> HashMap<String, String> {
        let mut registers = HashMap::new();
        registers.insert(
            "R4".to_string(),
            encode_sigma_coll_coll_byte(&[&b"ergo"[..], &b"cardano"[..]]),
        );
        registers.insert(
            "R5".to_string(),
            encode_sigma_coll_coll_int(&[vec![100, -1], vec![200, 5000]]),
        );
        registers.insert(
            "R6".to_string(),
            encode_sigma_coll_coll_long(&[vec![1000, -1], vec![2000, 3000]]),
        );
        registers.insert(
            "R7".to_string(),
            encode_sigma_coll_coll_long(&[vec![10, -1], vec![20, 30]]),
        );
        registers.insert(
            "R8".to_string(),
            encode_sigma_coll_coll_coll_long(&[
                vec![vec![1, 1], vec![0, 0]],
                vec![vec![5, 10], vec![7, 100]],
            ]),
        );
        registers.insert(
            "R9".to_string(),
            encode_sigma_coll_coll_long(&[vec![15, -1], vec![25, 35]]),
        );
        registers
    }

    #[test]
    fn test_parse_fee_box() {
        let config = MinimumFeeConfig::from_box_registers("erg", &registers()).unwrap();
        assert_eq!(config.schedules.len(), 2);

        let first = &config.schedules[0];
        assert_eq!(first.heights.get("ergo"), Some(&100));
        assert!(!first.heights.contains_key("cardano"));
        assert!(first.configs.contains_key("ergo"));
        assert!(!first.configs.contains_key("cardano"));

        let cardano = &config.schedules[1].configs["cardano"];
        assert_eq!(cardano.bridge_fee, BigInt::from(3000));
        assert_eq!(cardano.rsn_ratio, BigInt::from(7));
        assert_eq!(cardano.rsn_ratio_divisor, BigInt::from(100));
    }

    #[test]
    fn test_effective_schedule_by_height() {
        let config = MinimumFeeConfig::from_box_registers("erg", &registers()).unwrap();

        let early = config.get_fee("ergo", 150, "ergo").unwrap();
        assert_eq!(early.bridge_fee, BigInt::from(1000));
        assert_eq!(early.fee_ratio_divisor, BigInt::from(10_000));

        let late = config.get_fee("ergo", 200, "cardano").unwrap();
        assert_eq!(late.bridge_fee, BigInt::from(3000));
        assert_eq!(late.network_fee, BigInt::from(30));
        assert_eq!(late.fee_ratio, BigInt::from(35));
    }

    #[test]
    fn test_no_schedule_before_first_height() {
        let config = MinimumFeeConfig::from_box_registers("erg", &registers()).unwrap();
        assert!(matches!(
            config.get_fee("ergo", 99, "ergo"),
            Err(FeeConfigError::NoFeeForHeight { height: 99, .. })
        ));
        // cardano heights only exist in the second schedule
        assert!(config.get_fee("cardano", 4999, "ergo").is_err());
        assert!(config.get_fee("cardano", 5000, "ergo").is_ok());
    }

    #[test]
    fn test_unconfigured_target_chain() {
        let config = MinimumFeeConfig::from_box_registers("erg", &registers()).unwrap();
        assert!(matches!(
            config.get_fee("ergo", 150, "cardano"),
            Err(FeeConfigError::ChainNotConfigured { .. })
        ));
    }

    #[test]
    fn test_missing_or_ragged_registers() {
        let mut missing = registers();
        missing.remove("R8");
        assert!(matches!(
            MinimumFeeConfig::from_box_registers("erg", &missing),
            Err(FeeConfigError::RegisterParse { ref register, .. }) if register == "R8"
        ));

        let mut ragged = registers();
        ragged.insert(
            "R7".to_string(),
            encode_sigma_coll_coll_long(&[vec![10, -1], vec![20]]),
        );
        assert!(MinimumFeeConfig::from_box_registers("erg", &ragged).is_err());
    }

    #[test]
    fn test_register_of_wrong_type() {
        let mut wrong = registers();
        wrong.insert(
            "R6".to_string(),
            encode_sigma_coll_coll_byte(&[&b"1000"[..], &b"-1"[..]]),
        );
        assert!(matches!(
            MinimumFeeConfig::from_box_registers("erg", &wrong),
            Err(FeeConfigError::RegisterParse { ref register, .. }) if register == "R6"
        ));
    }
}
