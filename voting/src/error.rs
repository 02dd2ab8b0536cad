use accord_audit::AuditError;
use accord_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VotingError {
    #[error("proposal {0} not found")]
    ProposalNotFound(String),

    #[error("voting session {0} not found")]
    SessionNotFound(String),

    #[error("voting session {0} is not active")]
    SessionNotActive(String),

    #[error("voting deadline {deadline} has passed for session {session}")]
    DeadlinePassed { session: String, deadline: String },

    #[error("agent {0} is not eligible to vote in this session")]
    NotEligible(String),

    #[error("agent {0} has already voted in this session")]
    DuplicateVote(String),

    #[error("voting session {0} is already finalized")]
    AlreadyFinalized(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("invalid voting configuration: {0}")]
    InvalidConfig(String),

    #[error("audit ledger error: {0}")]
    Audit(#[from] AuditError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
