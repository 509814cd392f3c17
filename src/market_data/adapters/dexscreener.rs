// DexScreener REST adapter: one GET per refresh for the whole watch-list.

use reqwest::header::{ACCEPT, CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::dexscreener_types::{DexPair, TokensResponse};
use super::PairSource;
use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};

pub struct DexScreenerAdapter {
    client: Client,
    url: String,
}

impl DexScreenerAdapter {
    pub fn new(config: &FeedConfig) -> FeedResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client, url: config.tokens_url() })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Decode a `/tokens` response body. Entries that do not match the expected
/// shape become placeholders instead of failing the batch.
pub fn decode_pairs(body: &[u8]) -> FeedResult<Vec<DexPair>> {
    let response: TokensResponse = serde_json::from_slice(body)?;
    let raw_pairs = response.pairs.unwrap_or_default();

    let pairs = raw_pairs
        .iter()
        .enumerate()
        .map(|(idx, raw)| match DexPair::deserialize(raw) {
            Ok(pair) => pair,
            Err(e) => {
                warn!(index = idx, error = %e, "malformed pair, keeping placeholder");
                DexPair::placeholder(raw)
            }
        })
        .collect();
    Ok(pairs)
}

#[async_trait::async_trait]
impl PairSource for DexScreenerAdapter {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_pairs(&self) -> FeedResult<Vec<DexPair>> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status { status: status.as_u16() });
        }

        let body = response.bytes().await?;
        let pairs = decode_pairs(&body)?;
        debug!(pairs = pairs.len(), bytes = body.len(), "received dexscreener pairs");
        Ok(pairs)
    }

    fn name(&self) -> &str {
        "dexscreener"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    pub(crate) const THREE_PAIRS: &str = r#"{
        "schemaVersion": "1.0.0",
        "pairs": [
            {
                "chainId": "solana", "dexId": "raydium", "pairAddress": "PAIR_BONK_1",
                "baseToken": {"address": "DezX", "name": "Bonk", "symbol": "BONK"},
                "quoteToken": {"address": "So11", "name": "Wrapped SOL", "symbol": "SOL"},
                "priceNative": "0.0000001", "priceUsd": "0.00002145",
                "txns": {"h1": {"buys": 120, "sells": 80}, "h24": {"buys": 5000, "sells": 4000}},
                "volume": {"h1": 1500000, "h24": 89000000},
                "priceChange": {"h1": -1.2, "h24": 3.4},
                "liquidity": {"usd": 45000000, "base": 1, "quote": 2},
                "fdv": 1600000000, "marketCap": 1400000000,
                "pairCreatedAt": 1700000000000,
                "info": {"imageUrl": "https://cdn.example/bonk.png"}
            },
            {
                "chainId": "solana", "dexId": "orca", "pairAddress": "PAIR_BONK_2",
                "baseToken": {"address": "DezX", "name": "Bonk", "symbol": "BONK"},
                "priceUsd": "0.00002150",
                "fdv": 1600000000, "pairCreatedAt": 1700000000000
            },
            {
                "chainId": "solana", "dexId": "raydium", "pairAddress": "PAIR_JUP",
                "baseToken": {"address": "JUPy", "name": "Jupiter", "symbol": "JUP"},
                "priceUsd": "0.89",
                "txns": {"h1": {"buys": 10, "sells": 5}},
                "volume": {"h1": 2500},
                "priceChange": {"h1": 0.8},
                "liquidity": {"usd": 32000000},
                "fdv": 1200000000,
                "pairCreatedAt": 1710000000000
            }
        ]
    }"#;

    /// Answer exactly one HTTP request with `status_line` and `body`.
    pub(crate) async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = sock.read(&mut buf).await;
            let reply = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            sock.write_all(reply.as_bytes()).await.unwrap();
            let _ = sock.shutdown().await;
        });
        format!("http://{addr}")
    }

    pub(crate) fn adapter_for(endpoint: String) -> DexScreenerAdapter {
        let cfg = FeedConfig {
            endpoint,
            watch_list: vec!["MINT_A".into(), "MINT_B".into()],
            ..FeedConfig::default()
        };
        DexScreenerAdapter::new(&cfg).unwrap()
    }

    #[test]
    fn test_decode_full_pair() {
        let pairs = decode_pairs(THREE_PAIRS.as_bytes()).unwrap();
        assert_eq!(pairs.len(), 3);

        let bonk = &pairs[0];
        assert_eq!(bonk.pair_address.as_deref(), Some("PAIR_BONK_1"));
        assert_eq!(bonk.base_token.as_ref().unwrap().symbol.as_deref(), Some("BONK"));
        assert_eq!(bonk.txns.as_ref().unwrap().h1.unwrap().buys, 120);
        assert_eq!(bonk.volume.unwrap().h1, Some(1_500_000.0));
        assert_eq!(bonk.market_cap, Some(1_400_000_000.0));
        let image = bonk.info.as_ref().and_then(|i| i.image_url.as_deref());
        assert_eq!(image, Some("https://cdn.example/bonk.png"));

        // sparse pair still decodes
        assert!(pairs[1].txns.is_none());
        assert!(pairs[1].market_cap.is_none());
    }

    #[test]
    fn test_decode_null_pairs_is_empty() {
        let pairs = decode_pairs(br#"{"schemaVersion":"1.0.0","pairs":null}"#).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let err = decode_pairs(b"<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, FeedError::Decode(_)));
    }

    #[test]
    fn test_malformed_entry_becomes_placeholder() {
        let body =
            br#"{"pairs":[{"pairAddress":"BROKEN","dexId":"x","priceUsd":12,"baseToken":"nope"}]}"#;
        let pairs = decode_pairs(body).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].pair_address.as_deref(), Some("BROKEN"));
        assert!(pairs[0].base_token.is_none());
        assert!(pairs[0].price_usd.is_none());
    }

    #[test]
    fn test_url_is_comma_joined() {
        let adapter = adapter_for("https://api.example/latest/dex/tokens".into());
        assert_eq!(adapter.url(), "https://api.example/latest/dex/tokens/MINT_A,MINT_B");
        assert_eq!(adapter.name(), "dexscreener");
    }

    #[tokio::test]
    async fn test_fetch_pairs_over_http() {
        let endpoint = serve_once("200 OK", THREE_PAIRS).await;
        let pairs = adapter_for(endpoint).fetch_pairs().await.unwrap();
        assert_eq!(pairs.len(), 3);
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let endpoint = serve_once("503 Service Unavailable", "{}").await;
        let err = adapter_for(endpoint).fetch_pairs().await.unwrap_err();
        assert!(matches!(err, FeedError::Status { status: 503 }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = adapter_for(format!("http://{addr}")).fetch_pairs().await.unwrap_err();
        assert!(matches!(err, FeedError::Transport(_)));
        assert_eq!(err.kind(), "transport");
    }
}
