use std::sync::Arc;

use async_trait::async_trait;

use crate::models::snapshot::Snapshot;
use crate::traits::snapshot_handler::SnapshotHandler;

/// Composite handler that runs several handlers in order
pub struct CompositeHandler {
    handlers: Vec<Arc<dyn SnapshotHandler>>,
}

impl CompositeHandler {
    /// Create a new composite handler
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Add a handler to the composite
    pub fn add_handler(&mut self, handler: Arc<dyn SnapshotHandler>) {
        self.handlers.push(handler);
    }

    /// Check if there are any handlers
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Number of handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for CompositeHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotHandler for CompositeHandler {
    /// Stops at the first failing handler
    async fn handle_snapshot(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        for handler in &self.handlers {
            handler.handle_snapshot(snapshot).await?;
        }
        Ok(())
    }
}
