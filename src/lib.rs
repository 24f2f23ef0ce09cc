//! Holder Snapshot Library
//!
//! Point-in-time holder snapshots for Bifrost liquid-staking derivatives.
//! LP-token and farming-pool positions are converted into the base
//! derivative token through exact per-share ratios, and the results are
//! written as JSON reports.

// Public modules - these are the API surface
pub mod builder;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod traits;
pub mod utils;

// Re-export commonly used items for easier access
pub use builder::{PerShareRatio, SnapshotBuilder};
pub use config::{ConfigOverrides, PriceSource, SnapshotConfig, TrackedPool, TrackedToken};
pub use error::SnapshotError;
pub use handlers::{CompositeHandler, ConsoleHandler, JsonFileHandler};
pub use models::{AccountRecord, Amount, CurrencyId, HoldingsLedger, Snapshot};
pub use providers::{JsonStateProvider, SubstrateChain, SubstrateStateProvider};
pub use traits::{BlockResolver, ChainStateProvider, SnapshotHandler};
