//! Live token market-data feed.
//!
//! Polls DexScreener for a fixed watch-list, normalises the pairs into
//! [`Snapshot`](market_data::types::Snapshot)s, jitters them between refreshes
//! and fans every new set out to registered observers.

pub mod config;
pub mod error;
pub mod market_data;
pub mod telemetry;

pub use config::FeedConfig;
pub use error::{FeedError, FeedResult};
pub use market_data::feed::{FeedService, FeedState, SnapshotObserver};
pub use market_data::types::{Snapshot, SnapshotSet};
