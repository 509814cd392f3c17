use tracing_subscriber::EnvFilter;

pub const FETCH_TOTAL: &str = "tokenfeed_fetch_total";
pub const TICKS_TOTAL: &str = "tokenfeed_ticks_total";
pub const REFRESH_TOTAL: &str = "tokenfeed_refresh_total";
pub const SUBSCRIBERS: &str = "tokenfeed_subscribers";
pub const SNAPSHOTS: &str = "tokenfeed_snapshots";
pub const OBSERVER_PANICS: &str = "tokenfeed_observer_panics_total";

pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    // try_init so tests and embedding hosts can call this more than once
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init();
}

#[cfg(feature = "metrics-exporter")]
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()?;

    tracing::info!(port, "prometheus exporter listening on /metrics");
    metrics::gauge!("tokenfeed_up").set(1.0);
    Ok(())
}

#[cfg(not(feature = "metrics-exporter"))]
pub fn init_metrics(_port: u16) -> anyhow::Result<()> {
    Ok(())
}
