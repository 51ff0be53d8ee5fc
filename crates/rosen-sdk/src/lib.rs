//! Rosen Bridge SDK
//!
//! Computes bridge and network fees for cross-chain transfers and assembles
//! the unsigned lock transaction on the source chain (Ergo or Cardano).
//! Bridge watchers and guards pick up the lock and release on the target chain.
//!
//! Chain heights and fee configuration come from caller-supplied providers
//! ([`HeightProvider`], [`FeeConfigProvider`]); UTXOs are pulled lazily from
//! a [`futures::Stream`].

pub mod chains;
pub mod config;
pub mod constants;
pub mod fee;
pub mod network;
pub mod token_map;
pub mod tx_urls;
pub mod user_interface;
pub mod utxo;
pub mod validate;

pub use chains::{LockRequest, RosenChains, UnsignedLockTx};
pub use config::{LockAddresses, RosenConfig};
pub use fee::{ChainMinimumFee, FeeConfigError, FeeConfigProvider, MinimumFeeConfig};
pub use network::HeightProvider;
pub use token_map::{RosenChainToken, TokenEntry, TokenMap, TokenMetadata};
pub use tx_urls::{base_tx_url, tx_url};
pub use user_interface::{calculate_fee_to_asset_unit, AssetUnit, Fees, RosenUserInterface};
pub use utxo::{asset_balance_from_json, box_info, BoxInfo, Utxo};
pub use validate::validate_target_address;
