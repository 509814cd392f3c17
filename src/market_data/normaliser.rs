// Convert provider pairs into canonical snapshots.
// One row per base symbol (first listing wins), capped, formatted once.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::market_data::adapters::dexscreener_types::DexPair;
use crate::market_data::format::{format_compact_currency, format_elapsed, format_price};
use crate::market_data::types::Snapshot;

pub const DEFAULT_MAX_SNAPSHOTS: usize = 24;
pub const DEFAULT_PRICE_FLOOR: f64 = 1e-8;
pub const UNKNOWN_NAME: &str = "Unknown";
pub const UNKNOWN_SYMBOL: &str = "???";

pub struct Normaliser {
    pub max_snapshots: usize,
    /// Stand-in for a missing, non-positive or unparsable provider price.
    pub price_floor: f64,
}

impl Default for Normaliser {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SNAPSHOTS)
    }
}

impl Normaliser {
    pub fn new(max_snapshots: usize) -> Self {
        Self { max_snapshots, price_floor: DEFAULT_PRICE_FLOOR }
    }

    pub fn with_price_floor(mut self, price_floor: f64) -> Self {
        if price_floor.is_finite() && price_floor > 0.0 {
            self.price_floor = price_floor;
        }
        self
    }

    /// Normalise a provider batch. `now_ms` is the wall clock used for ages.
    ///
    /// A symbol or id only counts as taken once its row is emitted, so a pair
    /// rejected for one key does not shadow a later pair on the other.
    pub fn normalise(&self, pairs: &[DexPair], now_ms: i64) -> Vec<Snapshot> {
        let mut seen_symbols = HashSet::new();
        let mut seen_ids = HashSet::new();

        let out: Vec<Snapshot> = pairs
            .iter()
            .enumerate()
            .map(|(idx, pair)| self.to_snapshot(idx, pair, now_ms))
            .filter(|snap| {
                if seen_symbols.contains(&snap.symbol) || seen_ids.contains(&snap.id) {
                    trace!(id = %snap.id, symbol = %snap.symbol, "dropping duplicate pair");
                    return false;
                }
                seen_symbols.insert(snap.symbol.clone());
                seen_ids.insert(snap.id.clone());
                true
            })
            .take(self.max_snapshots)
            .collect();

        debug!(input = pairs.len(), output = out.len(), "normalised pairs");
        out
    }

    pub fn to_snapshot(&self, idx: usize, pair: &DexPair, now_ms: i64) -> Snapshot {
        let base = pair.base_token.as_ref();
        let name = base
            .and_then(|t| t.name.as_deref())
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_NAME);
        let symbol = base
            .and_then(|t| t.symbol.as_deref())
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SYMBOL);

        let id = pair
            .pair_address
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| base.and_then(|t| t.address.clone()).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| format!("pair-{idx}"));

        let price = pair
            .price_usd
            .as_deref()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|p| p.is_finite() && *p > 0.0)
            .unwrap_or(self.price_floor);

        // market cap is absent for many fresh pairs; FDV is the next best figure
        let market_cap = pair.market_cap.filter(|v| *v > 0.0).or(pair.fdv).unwrap_or(0.0);
        let volume = pair.volume.and_then(|v| v.h1).unwrap_or(0.0);
        let liquidity = pair.liquidity.and_then(|l| l.usd).unwrap_or(0.0);

        let h1_txns = pair.txns.as_ref().and_then(|t| t.h1).unwrap_or_default();
        let transaction_count = h1_txns.buys.saturating_add(h1_txns.sells);

        let change_1h = pair.price_change.and_then(|c| c.h1).unwrap_or(0.0);
        let change_24h = pair.price_change.and_then(|c| c.h24);

        let age_ms = pair
            .pair_created_at
            .map(|created| now_ms.saturating_sub(created).max(0) as u64)
            .unwrap_or(0);

        Snapshot {
            id,
            name: name.to_string(),
            symbol: symbol.to_string(),
            price,
            price_display: format_price(price),
            market_cap_display: format_compact_currency(market_cap),
            volume_display: format_compact_currency(volume),
            liquidity_display: format_compact_currency(liquidity),
            change_1h_percent: change_1h,
            change_24h_percent: change_24h,
            transaction_count,
            age_display: format_elapsed(age_ms),
            icon_url: pair.info.as_ref().and_then(|i| i.image_url.clone()),
            pair_address: pair.pair_address.clone(),
            dex_id: pair.dex_id.clone(),
            chain_id: pair.chain_id.clone(),
        }
    }
}
