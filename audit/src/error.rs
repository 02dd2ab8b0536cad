use accord_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("snapshot serialization failed: {0}")]
    Snapshot(String),
}
