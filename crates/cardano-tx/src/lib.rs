//! cardano-tx: Transaction building utilities for Cardano
//!
//! Provides the UTXO and protocol parameter types, a minimal CBOR encoder,
//! output/min-ADA computation, lock metadata and an unsigned transaction
//! builder with linear fee estimation.

pub mod address;
pub mod builder;
pub mod cbor;
pub mod error;
pub mod metadata;
pub mod output;
pub mod types;

pub use builder::{CardanoTxBuilder, TxInput, UnsignedCardanoTx};
pub use error::CardanoTxError;
pub use metadata::{AuxiliaryData, LockMetadata};
pub use output::{build_output, min_ada_required, TxOutput};
pub use types::{CardanoAsset, CardanoProtocolParams, CardanoUtxo, ADA_POLICY_ID};
