use accord_store::StoreError;
use accord_voting::VotingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("proposal {0} not found")]
    ProposalNotFound(String),

    #[error("invalid transition for proposal {id}: {reason}")]
    InvalidTransition { id: String, reason: String },

    #[error("invalid state for proposal {id}: {reason}")]
    InvalidState { id: String, reason: String },

    #[error("voting error: {0}")]
    Voting(#[from] VotingError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
