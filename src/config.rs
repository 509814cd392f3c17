// Runtime configuration: defaults, optional file, TOKENFEED__* env overrides.

use std::path::Path;
use std::time::Duration;

use ::config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

use crate::error::{FeedError, FeedResult};

pub const DEFAULT_ENDPOINT: &str = "https://api.dexscreener.com/latest/dex/tokens";
pub const DEFAULT_CONFIG_FILE: &str = "tokenfeed.toml";
const ENV_PREFIX: &str = "TOKENFEED";

/// Popular Solana mints: BONK, JUP, RAY, ORCA, MNDE, JTO, WEN, USDC.
pub const DEFAULT_WATCH_LIST: [&str; 8] = [
    "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263",
    "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN",
    "4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R",
    "orcaEKTdK7LKz57vaAYr9QeNsVEPfiu6QeMU1kektZE",
    "MNDEFzGvMt87ueuHvVU9VcTqsAP5b3fTGPsHuuPA5ey",
    "jtojtomepa8beP8AuQc6eXt5FriJwfFMwQx2v2f9mCL",
    "WENWENvqqNya429ubCdR81ZmD69brwQaaBYY6p3LCpk",
    "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Base URL; the comma-joined watch-list is appended as the last path segment.
    pub endpoint: String,
    pub watch_list: Vec<String>,
    pub refresh_interval_ms: u64,
    pub tick_interval_ms: u64,
    /// Upper bound on snapshots kept after normalisation.
    pub max_snapshots: usize,
    pub user_agent: String,
    pub simulator: SimulatorConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Half-width of the multiplicative price step (0.02 => ±2%).
    pub price_jitter: f64,
    /// Half-width of the additive 1h change step, in percentage points.
    pub change_jitter: f64,
    /// Chance that a tick adds one transaction.
    pub txn_probability: f64,
    pub price_floor: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            watch_list: DEFAULT_WATCH_LIST.iter().map(|s| s.to_string()).collect(),
            refresh_interval_ms: 15_000,
            tick_interval_ms: 800,
            max_snapshots: 24,
            user_agent: concat!("tokenfeed-rs/", env!("CARGO_PKG_VERSION")).to_string(),
            simulator: SimulatorConfig::default(),
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            price_jitter: 0.02,
            change_jitter: 0.15,
            txn_probability: 0.3,
            price_floor: 1e-8,
        }
    }
}

impl FeedConfig {
    /// Layer defaults, an optional TOML/JSON/YAML file and `TOKENFEED__*` env vars.
    ///
    /// With `path == None` the loader looks for `tokenfeed.toml` in the working
    /// directory and silently skips it when absent. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> FeedResult<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let cfg: FeedConfig = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("watch_list")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        cfg.validate()?;
        debug!(?cfg, "loaded feed configuration");
        Ok(cfg)
    }

    pub fn validate(&self) -> FeedResult<()> {
        if self.refresh_interval_ms == 0 || self.tick_interval_ms == 0 {
            return Err(FeedError::Config("timer intervals must be non-zero".into()));
        }
        if self.max_snapshots == 0 {
            return Err(FeedError::Config("max_snapshots must be at least 1".into()));
        }
        if self.watch_list.is_empty() {
            return Err(FeedError::Config("watch_list is empty".into()));
        }
        let sim = &self.simulator;
        if sim.price_floor.is_nan() || sim.price_floor <= 0.0 {
            return Err(FeedError::Config("simulator.price_floor must be positive".into()));
        }
        if !(0.0..=1.0).contains(&sim.txn_probability) {
            return Err(FeedError::Config(
                "simulator.txn_probability must be within [0, 1]".into(),
            ));
        }
        let change_ok = sim.change_jitter.is_finite() && sim.change_jitter >= 0.0;
        if !(0.0..1.0).contains(&sim.price_jitter) || !change_ok {
            return Err(FeedError::Config("simulator jitter out of range".into()));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Full request URL for the watch-list.
    pub fn tokens_url(&self) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), self.watch_list.join(","))
    }
}
