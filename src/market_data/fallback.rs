// Static dataset served whenever the provider is unreachable or returns nothing.

use crate::market_data::format::{format_compact_currency, format_elapsed, format_price};
use crate::market_data::types::Snapshot;

const DAY_MS: u64 = 24 * 3_600_000;

struct Seed {
    id: &'static str,
    name: &'static str,
    symbol: &'static str,
    price: f64,
    market_cap: f64,
    volume: f64,
    change_1h: f64,
    transactions: u64,
    liquidity: f64,
    age_days: u64,
}

const SEEDS: [Seed; 8] = [
    Seed {
        id: "1",
        name: "Bonk",
        symbol: "BONK",
        price: 0.00002145,
        market_cap: 1.4e9,
        volume: 89e6,
        change_1h: -1.2,
        transactions: 8234,
        liquidity: 45e6,
        age_days: 365,
    },
    Seed {
        id: "2",
        name: "Jupiter",
        symbol: "JUP",
        price: 0.89,
        market_cap: 1.2e9,
        volume: 45e6,
        change_1h: 0.8,
        transactions: 3421,
        liquidity: 32e6,
        age_days: 180,
    },
    Seed {
        id: "3",
        name: "Raydium",
        symbol: "RAY",
        price: 4.56,
        market_cap: 1.1e9,
        volume: 34e6,
        change_1h: 3.1,
        transactions: 2156,
        liquidity: 28e6,
        age_days: 730,
    },
    Seed {
        id: "4",
        name: "Orca",
        symbol: "ORCA",
        price: 3.21,
        market_cap: 320e6,
        volume: 12e6,
        change_1h: 1.5,
        transactions: 1234,
        liquidity: 18e6,
        age_days: 365,
    },
    Seed {
        id: "5",
        name: "Marinade",
        symbol: "MNDE",
        price: 0.12,
        market_cap: 98e6,
        volume: 4e6,
        change_1h: -0.5,
        transactions: 567,
        liquidity: 8e6,
        age_days: 365,
    },
    Seed {
        id: "6",
        name: "Jito",
        symbol: "JTO",
        price: 2.34,
        market_cap: 780e6,
        volume: 28e6,
        change_1h: 4.2,
        transactions: 2890,
        liquidity: 22e6,
        age_days: 90,
    },
    Seed {
        id: "7",
        name: "WEN",
        symbol: "WEN",
        price: 0.00008,
        market_cap: 56e6,
        volume: 8e6,
        change_1h: -2.1,
        transactions: 1567,
        liquidity: 5e6,
        age_days: 60,
    },
    Seed {
        id: "8",
        name: "USD Coin",
        symbol: "USDC",
        price: 1.00,
        market_cap: 32e9,
        volume: 1.2e9,
        change_1h: 0.0,
        transactions: 45000,
        liquidity: 500e6,
        age_days: 1095,
    },
];

pub const FALLBACK_LEN: usize = SEEDS.len();

/// The fixed fallback sequence, in watch-list order.
pub fn fallback_snapshots() -> Vec<Snapshot> {
    SEEDS
        .iter()
        .map(|s| Snapshot {
            id: s.id.to_string(),
            name: s.name.to_string(),
            symbol: s.symbol.to_string(),
            price: s.price,
            price_display: format_price(s.price),
            market_cap_display: format_compact_currency(s.market_cap),
            volume_display: format_compact_currency(s.volume),
            liquidity_display: format_compact_currency(s.liquidity),
            change_1h_percent: s.change_1h,
            change_24h_percent: None,
            transaction_count: s.transactions,
            age_display: format_elapsed(s.age_days * DAY_MS),
            icon_url: None,
            pair_address: None,
            dex_id: None,
            chain_id: None,
        })
        .collect()
}
