//! Data models for holder snapshots

pub mod amount;
pub mod chain;
pub mod currency;
pub mod ledger;
pub mod snapshot;

// Re-export for convenience
pub use amount::{Amount, AmountError};
pub use chain::{FarmingPoolInfo, FarmingShareEntry, ResolvedBlock, TokenAccountEntry};
pub use currency::{CurrencyArg, CurrencyId, CurrencyIdError};
pub use ledger::{AccountRecord, HoldingsLedger};
pub use snapshot::{
    FarmingShareRecord, GlobalPrice, PrimaryRow, RawHoldingRecord, Snapshot, SnapshotSummary,
};
