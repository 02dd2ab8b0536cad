//! Identifier newtypes for proposals, sessions, votes, and agents.
//!
//! All identifiers are human-readable strings. Proposal ids are assigned by
//! the caller (`P001`-style sequential ids are conventional); session and
//! vote ids are derived deterministically from their parent records.

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id! {
    /// A proposal identifier, assigned by the caller.
    ProposalId
}

string_id! {
    /// A voting session identifier.
    SessionId
}

string_id! {
    /// A vote identifier.
    VoteId
}

string_id! {
    /// An agent identifier.
    AgentId
}

impl SessionId {
    /// Derive the session id for a proposal's voting session.
    ///
    /// At most one active session exists per proposal, and the start time is
    /// part of the id, so re-votes after a revision round get distinct ids.
    pub fn for_proposal(proposal: &ProposalId, started_at: Timestamp) -> Self {
        Self(format!("vs-{}-{}", proposal, started_at.as_secs()))
    }
}

impl VoteId {
    /// Derive the vote id for an agent's vote in a session.
    ///
    /// One vote per agent per session, so this is unique by construction.
    pub fn for_cast(session: &SessionId, agent: &AgentId) -> Self {
        Self(format!("vote-{}-{}", session, agent))
    }
}
