// Synthetic tick: small random walk applied between network refreshes.

use rand::Rng;

use crate::config::SimulatorConfig;
use crate::market_data::format::format_price;
use crate::market_data::types::Snapshot;

#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// New sequence, same length and order. Only `price`, `price_display`,
    /// `change_1h_percent` and `transaction_count` move.
    pub fn tick<R: Rng>(&self, rng: &mut R, current: &[Snapshot]) -> Vec<Snapshot> {
        current.iter().map(|snap| self.step(rng, snap)).collect()
    }

    fn step<R: Rng>(&self, rng: &mut R, snap: &Snapshot) -> Snapshot {
        let cfg = &self.config;

        let factor = 1.0 + symmetric(rng, cfg.price_jitter);
        let mut price = snap.price * factor;
        if !price.is_finite() || price < cfg.price_floor {
            price = cfg.price_floor;
        }

        // The 1h change is a free random walk; it is not pulled back toward
        // the provider value and can leave the ±100 band over long sessions.
        let drifted = snap.change_1h_percent + symmetric(rng, cfg.change_jitter);
        let change_1h = (drifted * 100.0).round() / 100.0;

        let p = cfg.txn_probability;
        let bump = !p.is_nan() && rng.gen_bool(p.clamp(0.0, 1.0));

        Snapshot {
            price,
            price_display: format_price(price),
            change_1h_percent: change_1h,
            transaction_count: snap.transaction_count.saturating_add(u64::from(bump)),
            ..snap.clone()
        }
    }
}

/// Uniform draw from `[-half_width, half_width]`; zero for a non-finite or
/// non-positive width.
fn symmetric<R: Rng>(rng: &mut R, half_width: f64) -> f64 {
    if !half_width.is_finite() || half_width <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-half_width..=half_width)
}
