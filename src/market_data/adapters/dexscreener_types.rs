// Source: https://api.dexscreener.com/latest/dex/tokens/{addresses}
// Every field is optional: the provider omits sub-objects for thin pairs and we
// would rather show placeholders than lose the batch.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct TokensResponse {
    #[serde(default)]
    pub pairs: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DexPair {
    pub chain_id: Option<String>,
    pub dex_id: Option<String>,
    pub pair_address: Option<String>,
    pub base_token: Option<TokenInfo>,
    pub quote_token: Option<TokenInfo>,
    pub price_native: Option<String>,
    pub price_usd: Option<String>,
    pub txns: Option<Txns>,
    pub volume: Option<Windowed>,
    pub price_change: Option<Windowed>,
    pub liquidity: Option<Liquidity>,
    pub fdv: Option<f64>,
    pub market_cap: Option<f64>,
    /// Unix milliseconds.
    pub pair_created_at: Option<i64>,
    pub info: Option<PairInfo>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct TokenInfo {
    pub address: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Txns {
    pub h1: Option<BuySell>,
    pub h24: Option<BuySell>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct BuySell {
    pub buys: u64,
    pub sells: u64,
}

/// Shape shared by `volume` and `priceChange`: one number per window.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Windowed {
    pub m5: Option<f64>,
    pub h1: Option<f64>,
    pub h6: Option<f64>,
    pub h24: Option<f64>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Liquidity {
    pub usd: Option<f64>,
    pub base: Option<f64>,
    pub quote: Option<f64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PairInfo {
    pub image_url: Option<String>,
}

impl DexPair {
    /// Stand-in for an entry that would not deserialize. Keeps whatever
    /// identity can still be read so the normaliser can emit a placeholder row.
    pub fn placeholder(raw: &serde_json::Value) -> Self {
        let text = |key: &str| raw.get(key).and_then(|v| v.as_str()).map(str::to_string);
        DexPair {
            chain_id: text("chainId"),
            dex_id: text("dexId"),
            pair_address: text("pairAddress"),
            ..DexPair::default()
        }
    }
}
