use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use itertools::Itertools;
use tokenfeed_rs::market_data::adapters::dexscreener::DexScreenerAdapter;
use tokenfeed_rs::market_data::fetcher::Fetcher;
use tokenfeed_rs::market_data::normaliser::Normaliser;
use tokenfeed_rs::market_data::simulator::Simulator;
use tokenfeed_rs::{telemetry, FeedConfig, FeedService, SnapshotObserver, SnapshotSet};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "tokenfeed", about = "Live DexScreener token feed with simulated ticks")]
struct Args {
    /// Config file (TOML/JSON/YAML). Defaults to ./tokenfeed.toml when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many seconds instead of waiting for Ctrl-C.
    #[arg(long)]
    run_for: Option<u64>,

    /// Default tracing filter when RUST_LOG is unset.
    #[arg(long, default_value = "info,tokenfeed_rs=debug")]
    log: String,

    /// Prometheus exporter port (only with the `metrics-exporter` feature).
    #[arg(long, default_value_t = 9000)]
    metrics_port: u16,
}

// Prints a one-line summary of each published set
struct ConsoleObserver;

impl SnapshotObserver for ConsoleObserver {
    fn on_snapshots(&self, snapshots: SnapshotSet) {
        let line = snapshots
            .iter()
            .take(6)
            .map(|s| format!("{} {} ({:+.2}%)", s.symbol, s.price_display, s.change_1h_percent))
            .join(" | ");
        println!("[{} tokens] {}", snapshots.len(), line);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env
    let args = Args::parse();

    telemetry::init_tracing(&args.log);
    telemetry::init_metrics(args.metrics_port)?;

    let config = FeedConfig::load(args.config.as_deref())?;
    info!(
        endpoint = %config.endpoint,
        tokens = config.watch_list.len(),
        refresh_ms = config.refresh_interval_ms,
        tick_ms = config.tick_interval_ms,
        "starting token feed"
    );

    let adapter = DexScreenerAdapter::new(&config)?;
    let normaliser =
        Normaliser::new(config.max_snapshots).with_price_floor(config.simulator.price_floor);
    let fetcher = Fetcher::new(Arc::new(adapter), normaliser);
    let simulator = Simulator::new(config.simulator.clone());
    let feed = FeedService::new(fetcher, simulator, &config);

    let console: Arc<dyn SnapshotObserver> = Arc::new(ConsoleObserver);
    feed.register(Arc::clone(&console));

    match args.run_for {
        Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
        None => tokio::signal::ctrl_c().await?,
    }

    feed.unregister(&console);
    let stats = feed.stats();
    info!(
        refreshes = stats.refreshes,
        ticks = stats.ticks,
        state = ?feed.state(),
        "token feed stopped"
    );
    Ok(())
}
