use thiserror::Error;

/// Fatal conditions of a snapshot run
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("block #{height} not found on the node (head is #{head})")]
    BlockNotFound { height: u64, head: u64 },

    #[error("malformed farming share {raw:?} for account {account} in pool {pool_id}")]
    MalformedShare {
        pool_id: u32,
        account: String,
        raw: String,
    },

    #[error("farming pool {0} has no pool info at this block")]
    UnknownPool(u32),

    #[error("unexpected shape for {what}: {detail}")]
    UnexpectedValue { what: &'static str, detail: String },
}

impl SnapshotError {
    pub fn unexpected(what: &'static str, detail: impl Into<String>) -> Self {
        Self::UnexpectedValue { what, detail: detail.into() }
    }
}
