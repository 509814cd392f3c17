// Shared trait for market data adapters

use crate::error::FeedResult;
use dexscreener_types::DexPair;

/// Anything that can hand back the raw provider pairs for the watch-list.
#[async_trait::async_trait]
pub trait PairSource: Send + Sync {
    async fn fetch_pairs(&self) -> FeedResult<Vec<DexPair>>;

    fn name(&self) -> &str;
}

pub mod dexscreener;
pub mod dexscreener_types;
