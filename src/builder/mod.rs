//! The snapshot pipeline: ratios, scans, totals, price and partition

pub mod price;
pub mod ratio;
pub mod scan;
pub mod snapshot_builder;

pub use price::{compute_global_price, fixed_ratio};
pub use ratio::{compute_pool_ratios, compute_token_ratios, PerShareRatio, PoolRatio, TokenRatio};
pub use scan::{partition_system_accounts, raw_holdings, scan_balances, scan_farming};
pub use snapshot_builder::SnapshotBuilder;
