//! Individual votes.

use crate::id::{AgentId, SessionId, VoteId};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The decision expressed by a vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteDecision {
    Approve,
    Reject,
    Abstain,
}

impl VoteDecision {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Abstain => "abstain",
        }
    }
}

impl fmt::Display for VoteDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single cast vote. Immutable once written.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    pub session: SessionId,
    pub agent: AgentId,
    pub decision: VoteDecision,
    /// Influence multiplier, always within `[0.1, 2.0]`.
    pub weight: f64,
    pub justification: Option<String>,
    pub cast_at: Timestamp,
}

impl Vote {
    pub fn new(
        session: SessionId,
        agent: AgentId,
        decision: VoteDecision,
        weight: f64,
        justification: Option<String>,
        cast_at: Timestamp,
    ) -> Self {
        Self {
            id: VoteId::for_cast(&session, &agent),
            session,
            agent,
            decision,
            weight,
            justification,
            cast_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_id_derived_from_session_and_agent() {
        let v = Vote::new(
            SessionId::new("vs-P001-100"),
            AgentId::new("alice"),
            VoteDecision::Approve,
            1.0,
            None,
            Timestamp::new(150),
        );
        assert_eq!(v.id.as_str(), "vote-vs-P001-100-alice");
        assert_eq!(v.decision.name(), "approve");
    }
}
