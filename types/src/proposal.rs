//! Proposals and their status/phase pairs.

use crate::id::{AgentId, ProposalId};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The disposition of a proposal within (or after) its pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    Draft,
    Discussion,
    Revision,
    Voting,
    Approved,
    Rejected,
    Executed,
}

/// The pipeline stage a proposal is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalPhase {
    Proposal,
    Discussion,
    Revision,
    Voting,
    Resolution,
    Execution,
}

impl ProposalStatus {
    /// The phase implied by this status.
    ///
    /// Every status maps to exactly one phase, so storing a proposal with a
    /// status/phase pair outside the transition table is impossible by
    /// construction.
    pub fn phase(&self) -> ProposalPhase {
        match self {
            Self::Draft => ProposalPhase::Proposal,
            Self::Discussion => ProposalPhase::Discussion,
            Self::Revision => ProposalPhase::Revision,
            Self::Voting => ProposalPhase::Voting,
            Self::Approved | Self::Rejected => ProposalPhase::Resolution,
            Self::Executed => ProposalPhase::Execution,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Discussion => "discussion",
            Self::Revision => "revision",
            Self::Voting => "voting",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Executed => "executed",
        }
    }
}

impl ProposalPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Proposal => "proposal",
            Self::Discussion => "discussion",
            Self::Revision => "revision",
            Self::Voting => "voting",
            Self::Resolution => "resolution",
            Self::Execution => "execution",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for ProposalPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A governance proposal.
///
/// Created in (draft, proposal) and mutated only through the named phase
/// transitions; never deleted once it leaves draft.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub title: String,
    pub author: AgentId,
    pub status: ProposalStatus,
    pub phase: ProposalPhase,
    pub content: String,
    pub metadata: BTreeMap<String, String>,
    /// Deadline of the current/most recent voting round.
    pub voting_deadline: Option<Timestamp>,
    /// Free-form execution record, set when the proposal is marked executed.
    pub execution_data: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Proposal {
    /// Create a new draft proposal.
    pub fn new(
        id: impl Into<ProposalId>,
        title: impl Into<String>,
        author: impl Into<AgentId>,
        content: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            status: ProposalStatus::Draft,
            phase: ProposalPhase::Proposal,
            content: content.into(),
            metadata: BTreeMap::new(),
            voting_deadline: None,
            execution_data: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the status, keeping the phase in lockstep.
    pub fn set_status(&mut self, status: ProposalStatus, now: Timestamp) {
        self.status = status;
        self.phase = status.phase();
        self.updated_at = now;
    }

    /// Whether this proposal has reached a terminal disposition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            ProposalStatus::Rejected | ProposalStatus::Executed
        )
    }
}
