//! Rosen-core: shared types, balance arithmetic, coin selection and errors
//!
//! This crate provides the foundational types used across the Rosen SDK workspace.

pub mod balance;
pub mod box_selector;
pub mod config;
pub mod decimals;
pub mod errors;
pub mod math;
pub mod types;

pub use box_selector::{select_boxes, CoveringResult};
pub use config::*;
pub use errors::*;
pub use types::*;
