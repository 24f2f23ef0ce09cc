use async_trait::async_trait;

use crate::models::snapshot::Snapshot;

/// Consumer of a finished snapshot
#[async_trait]
pub trait SnapshotHandler: Send + Sync {
    /// Handle a completed snapshot. Errors abort the run.
    async fn handle_snapshot(&self, snapshot: &Snapshot) -> anyhow::Result<()>;
}
