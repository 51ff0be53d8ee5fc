//! Chain height lookup

use async_trait::async_trait;

use rosen_core::{Chain, NetworkError};

/// Current block height of a chain, usually backed by an explorer client
#[async_trait]
pub trait HeightProvider: Send + Sync {
    async fn get_height(&self, chain: Chain) -> Result<u64, NetworkError>;
}

/// Use `height` when given, otherwise ask `provider`
pub async fn resolve_height<H: HeightProvider + ?Sized>(
    provider: &H,
    chain: Chain,
    height: Option<u64>,
) -> Result<u64, NetworkError> {
    match height {
        Some(height) => Ok(height),
        None => provider.get_height(chain).await,
    }
}
