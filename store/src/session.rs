//! Voting session and vote storage trait.

use crate::StoreError;
use accord_types::{AgentId, ProposalId, SessionId, Vote, VotingSession};

/// Trait for storing voting sessions and their votes.
///
/// Votes are append-only: `put_vote` must fail with `Duplicate` if the agent
/// already has a vote in the session, and nothing ever removes a vote.
pub trait SessionStore {
    /// Store or overwrite a session record.
    fn put_session(&self, session: &VotingSession) -> Result<(), StoreError>;

    /// Get a session by id.
    fn get_session(&self, id: &SessionId) -> Result<VotingSession, StoreError>;

    /// The active session for a proposal, if one exists.
    ///
    /// At most one session per proposal is active at a time.
    fn active_session_for_proposal(
        &self,
        proposal: &ProposalId,
    ) -> Result<Option<VotingSession>, StoreError>;

    /// Append a vote. Fails with `Duplicate` if the agent already voted.
    fn put_vote(&self, vote: &Vote) -> Result<(), StoreError>;

    /// A specific agent's vote in a session, if cast.
    fn get_vote(&self, session: &SessionId, agent: &AgentId)
        -> Result<Option<Vote>, StoreError>;

    /// All votes in a session, in cast order.
    fn votes_for_session(&self, session: &SessionId) -> Result<Vec<Vote>, StoreError>;
}
