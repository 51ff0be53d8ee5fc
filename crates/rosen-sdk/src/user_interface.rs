//! Token lookups and fee computation for bridge front-ends
//!
//! Fee configuration is keyed by a token's Ergo id, so every fee entry point
//! first resolves the token through the token map. Causes are kept as the
//! `source()` of the returned [`FeeError`].

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use rosen_core::math;
use rosen_core::{BoxedCause, Chain, FeeError, MathError, TokenError};

use crate::constants::{FEE_ANCHOR_CHAIN, NATIVE_TOKEN_TYPE};
use crate::fee::{ChainMinimumFee, FeeConfigProvider};
use crate::network::{resolve_height, HeightProvider};
use crate::token_map::{RosenChainToken, TokenEntry, TokenMap};

/// Fees charged on one transfer, in units of the transferred token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fees {
    pub bridge_fee: BigInt,
    pub network_fee: BigInt,
}

/// RSN price and precision of one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUnit {
    pub rsn_ratio: BigInt,
    pub rsn_ratio_divisor: BigInt,
    pub decimals: u32,
}

impl AssetUnit {
    fn new(fee: &ChainMinimumFee, decimals: u32) -> Self {
        Self {
            rsn_ratio: fee.rsn_ratio.clone(),
            rsn_ratio_divisor: fee.rsn_ratio_divisor.clone(),
            decimals,
        }
    }
}

/// Express `base_network_fee`, given in the native token, in units of `asset`:
/// `base * 10^assetDec * nativeRsn * assetRsnDiv / (assetRsn * 10^nativeDec * nativeRsnDiv)`
pub fn calculate_fee_to_asset_unit(
    native: &AssetUnit,
    asset: &AssetUnit,
    base_network_fee: &BigInt,
) -> Result<BigInt, MathError> {
    let ten = BigInt::from(10);
    let numerator = base_network_fee
        * math::pow(&ten, asset.decimals)
        * &native.rsn_ratio
        * &asset.rsn_ratio_divisor;
    let denominator =
        &asset.rsn_ratio * math::pow(&ten, native.decimals) * &native.rsn_ratio_divisor;
    math::floor(&numerator, &denominator)
}

fn on_chain<'a>(entry: &'a TokenEntry, chain: &str) -> Result<&'a RosenChainToken, TokenError> {
    entry.get(chain).ok_or_else(|| TokenError::ChainNotSupported {
        chain: chain.to_string(),
    })
}

pub struct RosenUserInterface<F, H> {
    token_map: TokenMap,
    minimum_fee_nft: String,
    fee_provider: F,
    heights: H,
}

impl<F: FeeConfigProvider, H: HeightProvider> RosenUserInterface<F, H> {
    pub fn new(
        token_map: TokenMap,
        minimum_fee_nft: impl Into<String>,
        fee_provider: F,
        heights: H,
    ) -> Self {
        Self {
            token_map,
            minimum_fee_nft: minimum_fee_nft.into(),
            fee_provider,
            heights,
        }
    }

    pub fn token_map(&self) -> &TokenMap {
        &self.token_map
    }

    pub fn minimum_fee_nft(&self) -> &str {
        &self.minimum_fee_nft
    }

    pub fn get_supported_chains(&self) -> Vec<&'static str> {
        Chain::ALL.iter().map(|c| c.as_str()).collect()
    }

    /// Every token the map knows on `chain`
    pub fn get_chain_supported_tokens(&self, chain: &str) -> Vec<&RosenChainToken> {
        self.token_map
            .search(chain, None)
            .into_iter()
            .filter_map(|entry| entry.get(chain))
            .collect()
    }

    /// Chains `token_id` (an id on `chain`) can be bridged between
    pub fn get_available_chains_for_token(
        &self,
        chain: &str,
        token_id: &str,
    ) -> Result<Vec<String>, TokenError> {
        let entry = self.token_map.find(chain, token_id)?;
        Ok(entry.keys().cloned().collect())
    }

    /// The token on `target_chain` matching `token_id` on `chain`
    pub fn get_token_details_on_target_chain(
        &self,
        chain: &str,
        token_id: &str,
        target_chain: &str,
    ) -> Result<&RosenChainToken, TokenError> {
        let entry = self.token_map.find(chain, token_id)?;
        on_chain(entry, target_chain)
    }

    /// Ergo id of a token registered on both chains
    fn check_token_supported(
        &self,
        from_chain: Chain,
        token_id: &str,
        to_chain: Chain,
    ) -> Result<&str, TokenError> {
        let entry = self.token_map.find(from_chain.as_str(), token_id)?;
        TokenMap::get_id(entry, to_chain.as_str())?;
        TokenMap::get_id(entry, FEE_ANCHOR_CHAIN)
    }

    async fn effective_fee(
        &self,
        ergo_token_id: &str,
        from_chain: Chain,
        height: u64,
        to_chain: Chain,
    ) -> Result<ChainMinimumFee, BoxedCause> {
        let config = self
            .fee_provider
            .fetch_fee_config(ergo_token_id, &self.minimum_fee_nft)
            .await?;
        Ok(config.get_fee(from_chain.as_str(), height, to_chain.as_str())?)
    }

    async fn transfer_fee(
        &self,
        from_chain: Chain,
        token_id: &str,
        to_chain: Chain,
        height: Option<u64>,
    ) -> Result<ChainMinimumFee, BoxedCause> {
        let ergo_token_id = self.check_token_supported(from_chain, token_id, to_chain)?;
        let height = resolve_height(&self.heights, from_chain, height).await?;
        self.effective_fee(ergo_token_id, from_chain, height, to_chain)
            .await
    }

    /// Bridge and network fee for moving `amount` of `token_id` (an id on
    /// `from_chain`) to `to_chain`.
    ///
    /// `height` is a `from_chain` height; the current one is fetched when
    /// absent. `recommended_network_fee` raises the configured network fee.
    pub async fn get_fee_by_transfer_amount(
        &self,
        from_chain: Chain,
        token_id: &str,
        to_chain: Chain,
        amount: &BigInt,
        recommended_network_fee: Option<&BigInt>,
        height: Option<u64>,
    ) -> Result<Fees, FeeError> {
        let fees = async {
            let fee = self
                .transfer_fee(from_chain, token_id, to_chain, height)
                .await?;

            let variable = math::ceil(&(amount * &fee.fee_ratio), &fee.fee_ratio_divisor)?;
            let bridge_fee = math::max(&fee.bridge_fee, &variable);
            let network_fee = match recommended_network_fee {
                Some(recommended) => math::max(recommended, &fee.network_fee),
                None => fee.network_fee,
            };
            Ok::<_, BoxedCause>(Fees {
                bridge_fee,
                network_fee,
            })
        }
        .await
        .map_err(|e| FeeError::retrieval("Failed to retrieve fee", e))?;

        debug!(
            from_chain = %from_chain,
            to_chain = %to_chain,
            token_id,
            bridge_fee = %fees.bridge_fee,
            network_fee = %fees.network_fee,
            "Computed transfer fees"
        );
        Ok(fees)
    }

    /// Smallest amount of `token_id` worth transferring from `from_chain` to
    /// `to_chain` at `height`
    pub async fn get_minimum_transfer_amount_for_token(
        &self,
        from_chain: Chain,
        token_id: &str,
        to_chain: Chain,
        height: Option<u64>,
    ) -> Result<BigInt, FeeError> {
        async {
            let fee = self
                .transfer_fee(from_chain, token_id, to_chain, height)
                .await?;

            let minimum_fees = &fee.bridge_fee + &fee.network_fee;
            let network_fee_ratio =
                math::ceil(&fee.network_fee, &(BigInt::from(1) - &fee.fee_ratio))?;
            Ok::<_, BoxedCause>(math::max(&minimum_fees, &network_fee_ratio))
        }
        .await
        .map_err(|e| FeeError::retrieval("Failed to retrieve minimum fee", e))
    }

    /// Convert `base_network_fee`, in `to_chain`'s native token, to units of
    /// `token_id` (an id on `to_chain`). `height` is a `to_chain` height.
    pub async fn convert_fee_to_asset_unit(
        &self,
        token_id: &str,
        to_chain: Chain,
        height: Option<u64>,
        base_network_fee: &BigInt,
    ) -> Result<BigInt, FeeError> {
        async {
            let chain = to_chain.as_str();
            let entry = self.token_map.find(chain, token_id)?;
            let asset = on_chain(entry, chain)?;
            let asset_ergo_id = TokenMap::get_id(entry, FEE_ANCHOR_CHAIN)?;

            let native_entry = self
                .token_map
                .search(chain, None)
                .into_iter()
                .find(|e| {
                    e.get(chain)
                        .is_some_and(|t| t.metadata.token_type == NATIVE_TOKEN_TYPE)
                })
                .ok_or_else(|| TokenError::TokenNotFound {
                    chain: chain.to_string(),
                    token_id: NATIVE_TOKEN_TYPE.to_string(),
                })?;
            let native = on_chain(native_entry, chain)?;
            let native_ergo_id = TokenMap::get_id(native_entry, FEE_ANCHOR_CHAIN)?;

            let height = resolve_height(&self.heights, to_chain, height).await?;
            let asset_fee = self
                .effective_fee(asset_ergo_id, to_chain, height, to_chain)
                .await?;
            let native_fee = self
                .effective_fee(native_ergo_id, to_chain, height, to_chain)
                .await?;

            Ok::<_, BoxedCause>(calculate_fee_to_asset_unit(
                &AssetUnit::new(&native_fee, native.decimals),
                &AssetUnit::new(&asset_fee, asset.decimals),
                base_network_fee,
            )?)
        }
        .await
        .map_err(|e| FeeError::conversion("Failed to convert fee to asset unit", e))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::error::Error as _;

    use async_trait::async_trait;

    use super::*;
    use crate::fee::{ChainFee, FeeConfigError, FeeSchedule, MinimumFeeConfig};
    use crate::network::tests::FixedHeight;
    use crate::token_map::tests::{sample_map, RS_BTC_ASSET, RS_BTC_ERGO_ID, RS_BTC_POLICY};

    struct StaticFees(HashMap<String, MinimumFeeConfig>);

    #[async_trait]
    impl FeeConfigProvider for StaticFees {
        async fn fetch_fee_config(
            &self,
            token_id: &str,
            _minimum_fee_nft: &str,
        ) -> Result<MinimumFeeConfig, FeeConfigError> {
            self.0
                .get(token_id)
                .cloned()
                .ok_or_else(|| FeeConfigError::NoFeeBox {
                    token_id: token_id.to_string(),
                })
        }
    }

    /// One schedule from height 100 with the same fees towards every chain
    fn fee_config(token_id: &str, fee_ratio: i64, rsn_ratio: i64, rsn_divisor: i64) -> MinimumFeeConfig {
        let chains = ["bitcoin", "cardano", "ergo"];
        let fee = ChainFee {
            bridge_fee: BigInt::from(2_000_000),
            network_fee: BigInt::from(1_300_000),
            fee_ratio: BigInt::from(fee_ratio),
            rsn_ratio: BigInt::from(rsn_ratio),
            rsn_ratio_divisor: BigInt::from(rsn_divisor),
        };
        MinimumFeeConfig {
            token_id: token_id.to_string(),
            schedules: vec![FeeSchedule {
                heights: chains.iter().map(|c| (c.to_string(), 100)).collect(),
                configs: chains
                    .iter()
                    .map(|c| (c.to_string(), fee.clone()))
                    .collect::<BTreeMap<_, _>>(),
            }],
        }
    }

    fn ui_with(configs: Vec<MinimumFeeConfig>) -> RosenUserInterface<StaticFees, FixedHeight> {
        let provider = StaticFees(
            configs
                .into_iter()
                .map(|c| (c.token_id.clone(), c))
                .collect(),
        );
        RosenUserInterface::new(sample_map(), "nft", provider, FixedHeight::new(1_000))
    }

    fn ui() -> RosenUserInterface<StaticFees, FixedHeight> {
        ui_with(vec![
            fee_config("erg", 10, 1, 1),
            fee_config("adaerg", 0, 500_000, 100_000_000),
            fee_config(RS_BTC_ERGO_ID, 1, 200_000, 10_000_000_000),
        ])
    }

    fn big(n: i64) -> BigInt {
        BigInt::from(n)
    }

    #[test]
    fn test_token_lookups() {
        let ui = ui();
        assert_eq!(ui.get_supported_chains(), vec!["ergo", "cardano", "bitcoin"]);
        assert_eq!(ui.get_chain_supported_tokens("ergo").len(), 3);
        assert_eq!(ui.get_chain_supported_tokens("bitcoin")[0].token_id, "btc");

        assert_eq!(
            ui.get_available_chains_for_token("ergo", RS_BTC_ERGO_ID).unwrap(),
            vec!["bitcoin", "cardano", "ergo"]
        );
        assert!(matches!(
            ui.get_available_chains_for_token("ergo", "unknown"),
            Err(TokenError::TokenNotFound { .. })
        ));

        let on_cardano = ui
            .get_token_details_on_target_chain("ergo", RS_BTC_ERGO_ID, "cardano")
            .unwrap();
        assert_eq!(on_cardano.policy_id.as_deref(), Some(RS_BTC_POLICY));
        assert_eq!(on_cardano.asset_name.as_deref(), Some(RS_BTC_ASSET));

        assert!(matches!(
            ui.get_token_details_on_target_chain("ergo", "erg", "bitcoin"),
            Err(TokenError::ChainNotSupported { .. })
        ));
    }

    #[tokio::test]
    async fn test_fee_by_transfer_amount() {
        let ui = ui();

        let fees = ui
            .get_fee_by_transfer_amount(Chain::Ergo, "erg", Chain::Cardano, &big(1_000_000_000), None, None)
            .await
            .unwrap();
        assert_eq!(fees.bridge_fee, big(2_000_000));
        assert_eq!(fees.network_fee, big(1_300_000));

        // ratio fee exceeds the flat fee, rounded up
        let fees = ui
            .get_fee_by_transfer_amount(
                Chain::Ergo,
                "erg",
                Chain::Cardano,
                &big(5_000_000_001),
                Some(&big(3_000_000)),
                Some(500),
            )
            .await
            .unwrap();
        assert_eq!(fees.bridge_fee, big(5_000_001));
        assert_eq!(fees.network_fee, big(3_000_000));
    }

    #[tokio::test]
    async fn test_fee_monotonic_in_amount() {
        let ui = ui();
        let mut previous = BigInt::from(0);
        for amount in [0i64, 1, 1_999_999_999, 2_000_000_000, 2_000_000_001, 9_999_999_999] {
            let fees = ui
                .get_fee_by_transfer_amount(
                    Chain::Ergo,
                    "erg",
                    Chain::Cardano,
                    &big(amount),
                    Some(&big(1)),
                    Some(100),
                )
                .await
                .unwrap();
            assert!(fees.bridge_fee >= previous);
            assert!(fees.network_fee >= big(1_300_000));
            previous = fees.bridge_fee;
        }
    }

    #[tokio::test]
    async fn test_fee_height_before_first_schedule() {
        let err = ui()
            .get_fee_by_transfer_amount(Chain::Ergo, "erg", Chain::Cardano, &big(1), None, Some(99))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "fee_retrieval_failure");
        assert!(err
            .source()
            .and_then(|s| s.downcast_ref::<FeeConfigError>())
            .is_some());
    }

    #[tokio::test]
    async fn test_unsupported_pair_wraps_token_error() {
        let err = ui()
            .get_fee_by_transfer_amount(Chain::Ergo, "erg", Chain::Bitcoin, &big(1), None, None)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "fee_retrieval_failure");
        assert!(matches!(
            err.source().and_then(|s| s.downcast_ref::<TokenError>()),
            Some(TokenError::ChainNotSupported { .. })
        ));
    }

    #[tokio::test]
    async fn test_minimum_transfer_amount() {
        let ui = ui();

        // 1 - feeRatio is negative, so the flat fees win
        let minimum = ui
            .get_minimum_transfer_amount_for_token(Chain::Ergo, "erg", Chain::Cardano, Some(100))
            .await
            .unwrap();
        assert_eq!(minimum, big(3_300_000));

        let minimum = ui
            .get_minimum_transfer_amount_for_token(Chain::Ergo, "adaerg", Chain::Cardano, None)
            .await
            .unwrap();
        assert_eq!(minimum, big(3_300_000));
    }

    #[tokio::test]
    async fn test_minimum_transfer_division_by_zero() {
        let err = ui()
            .get_minimum_transfer_amount_for_token(Chain::Ergo, RS_BTC_ERGO_ID, Chain::Cardano, Some(100))
            .await
            .unwrap_err();
        assert!(matches!(err, FeeError::FeeRetrievalFailure { .. }));
        assert!(err
            .source()
            .and_then(|s| s.downcast_ref::<MathError>())
            .is_some());
    }

    #[test]
    fn test_rsn_conversion_reference() {
        let native = AssetUnit {
            rsn_ratio: big(500_000),
            rsn_ratio_divisor: big(100_000_000),
            decimals: 6,
        };
        let asset = AssetUnit {
            rsn_ratio: big(200_000),
            rsn_ratio_divisor: big(10_000_000_000),
            decimals: 9,
        };
        assert_eq!(
            calculate_fee_to_asset_unit(&native, &asset, &big(3_400_000)).unwrap(),
            big(850_000_000_000)
        );

        let zero = AssetUnit {
            rsn_ratio: big(0),
            ..asset
        };
        assert!(calculate_fee_to_asset_unit(&native, &zero, &big(3_400_000)).is_err());
    }

    #[tokio::test]
    async fn test_convert_fee_to_asset_unit() {
        let ui = ui();
        let rs_btc = format!("{RS_BTC_POLICY}.{RS_BTC_ASSET}");

        // rsBTC has 8 decimals on cardano, ADA has 6
        let converted = ui
            .convert_fee_to_asset_unit(&rs_btc, Chain::Cardano, None, &big(3_400_000))
            .await
            .unwrap();
        assert_eq!(converted, big(85_000_000_000));

        let err = ui
            .convert_fee_to_asset_unit("unknown", Chain::Cardano, None, &big(3_400_000))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "fee_conversion_failure");
    }

    #[tokio::test]
    async fn test_convert_without_native_fee_box() {
        let ui = ui_with(vec![fee_config(RS_BTC_ERGO_ID, 1, 200_000, 10_000_000_000)]);
        let rs_btc = format!("{RS_BTC_POLICY}.{RS_BTC_ASSET}");

        let err = ui
            .convert_fee_to_asset_unit(&rs_btc, Chain::Cardano, Some(100), &big(3_400_000))
            .await
            .unwrap_err();
        assert!(matches!(
            err.source().and_then(|s| s.downcast_ref::<FeeConfigError>()),
            Some(FeeConfigError::NoFeeBox { .. })
        ));
    }
}
