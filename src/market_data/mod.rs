// Market data module entrypoint
pub mod adapters;   // provider fetchers (DexScreener)
pub mod fallback;   // static dataset served when the provider fails
pub mod feed;       // observer registry + refresh/tick timers
pub mod fetcher;    // adapter -> normaliser, never fails
pub mod format;     // display strings
pub mod normaliser; // provider pairs -> snapshots
pub mod simulator;  // synthetic ticks between refreshes
pub mod types;
