//! ergo-tx: Transaction building utilities for Ergo
//!
//! Provides EIP-12 transaction structures, Sigma register encoding/decoding
//! and address conversion.

pub mod address;
pub mod constants;
pub mod eip12;
pub mod sigma;

pub use address::{address_to_ergo_tree, AddressError};
pub use eip12::*;
pub use sigma::*;
