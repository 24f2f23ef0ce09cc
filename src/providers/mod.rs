//! Chain state providers

pub mod json_provider;
pub mod substrate_provider;

// Re-export for convenience
pub use json_provider::{JsonStateProvider, StateDump};
pub use substrate_provider::{SubstrateChain, SubstrateStateProvider};
