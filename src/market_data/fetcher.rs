use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{FeedError, FeedResult};
use crate::market_data::adapters::PairSource;
use crate::market_data::fallback::fallback_snapshots;
use crate::market_data::normaliser::Normaliser;
use crate::market_data::types::Snapshot;
use crate::telemetry::FETCH_TOTAL;

/// Pulls pairs from a [`PairSource`] and normalises them. Never fails: any
/// transport, status, decode or empty outcome resolves to the fallback set.
pub struct Fetcher {
    source: Arc<dyn PairSource>,
    normaliser: Normaliser,
}

impl Fetcher {
    pub fn new(source: Arc<dyn PairSource>, normaliser: Normaliser) -> Self {
        Self { source, normaliser }
    }

    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn fetch(&self) -> Vec<Snapshot> {
        match self.try_fetch().await {
            Ok(snaps) => {
                metrics::counter!(FETCH_TOTAL, "outcome" => "ok").increment(1);
                info!(tokens = snaps.len(), "refreshed token snapshots");
                snaps
            }
            Err(e) => {
                metrics::counter!(FETCH_TOTAL, "outcome" => e.kind()).increment(1);
                warn!(error = %e, "fetch failed, serving fallback dataset");
                fallback_snapshots()
            }
        }
    }

    async fn try_fetch(&self) -> FeedResult<Vec<Snapshot>> {
        let pairs = self.source.fetch_pairs().await?;
        let now_ms = chrono::Utc::now().timestamp_millis();
        let snaps = self.normaliser.normalise(&pairs, now_ms);
        if snaps.is_empty() {
            return Err(FeedError::Empty);
        }
        Ok(snaps)
    }
}
