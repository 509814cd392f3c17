use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Canonical per-token record handed to observers.
///
/// Built once by the normaliser (or the fallback table) and replaced wholesale on
/// every refresh or tick; nothing edits a `Snapshot` that has been published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub price_display: String,
    pub market_cap_display: String,
    pub volume_display: String,
    pub liquidity_display: String,
    #[serde(rename = "change1hPercent")]
    pub change_1h_percent: f64,
    #[serde(rename = "change24hPercent")]
    pub change_24h_percent: Option<f64>,
    pub transaction_count: u64,
    pub age_display: String,
    pub icon_url: Option<String>,
    pub pair_address: Option<String>,
    pub dex_id: Option<String>,
    pub chain_id: Option<String>,
}

/// Immutable, cheaply clonable snapshot sequence shared with every observer.
pub type SnapshotSet = Arc<[Snapshot]>;
