//! Core traits for the snapshot pipeline

pub mod snapshot_handler;
pub mod state_provider;

// Re-export for convenience
pub use snapshot_handler::SnapshotHandler;
pub use state_provider::{BlockResolver, ChainStateProvider};
